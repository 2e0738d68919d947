//! The DocumentSplitter trait for splitting specification documents.

use serde::Serialize;

use super::SplitResult;
use crate::{SpecDocument, SplitError};

/// Trait for splitting a specification document into multiple files.
///
/// Implementations decide how the document is cut and how each piece is named. Splitting
/// only builds the fragments in memory; [`SplitResult::write_to`] puts them on disk.
///
/// # Implementing Custom Splitters
///
/// ```rust
/// use serde_json::Value;
/// use split_openapi_core::split::{DocumentSplitter, Fragment, SplitResult};
/// use split_openapi_core::{SpecDocument, SplitError};
///
/// /// Writes the whole `paths` map to a single file.
/// struct AllPaths;
///
/// impl DocumentSplitter for AllPaths {
///     type Fragment = Value;
///
///     fn split(&self, doc: &SpecDocument) -> Result<SplitResult<Value>, SplitError> {
///         let mut result = SplitResult::new();
///         let paths = serde_json::to_value(&doc.paths).unwrap_or_default();
///         result.add_fragment(Fragment::new("paths.yaml", paths));
///         Ok(result)
///     }
/// }
/// ```
///
/// # Built-in Implementations
///
/// * [`SplitByPath`](super::SplitByPath) - one fragment per entry of `paths`
pub trait DocumentSplitter {
    /// The type of content written to each fragment file.
    type Fragment: Serialize;

    /// Builds the fragments of `doc`, leaving the document untouched.
    ///
    /// # Errors
    ///
    /// Implementations may reject documents they cannot split unambiguously.
    fn split(&self, doc: &SpecDocument) -> Result<SplitResult<Self::Fragment>, SplitError>;
}

/// Extension trait for convenient splitting of specification documents.
pub trait SplitExt {
    /// Splits this document using the provided splitter.
    ///
    /// This is a convenience method that calls `splitter.split(self)`.
    ///
    /// # Errors
    ///
    /// Propagates the splitter error.
    fn split_with<S: DocumentSplitter>(
        &self,
        splitter: &S,
    ) -> Result<SplitResult<S::Fragment>, SplitError>;
}

impl SplitExt for SpecDocument {
    fn split_with<S: DocumentSplitter>(
        &self,
        splitter: &S,
    ) -> Result<SplitResult<S::Fragment>, SplitError> {
        splitter.split(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoOpSplitter;

    impl DocumentSplitter for NoOpSplitter {
        type Fragment = String;

        fn split(&self, _doc: &SpecDocument) -> Result<SplitResult<Self::Fragment>, SplitError> {
            Ok(SplitResult::new())
        }
    }

    #[test]
    fn should_implement_split_ext() {
        let doc = SpecDocument::default();
        let result = doc.split_with(&NoOpSplitter).expect("no-op split");

        assert!(result.is_empty());
    }
}
