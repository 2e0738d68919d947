//! Obtaining the raw specification text.
//!
//! Three strategies implement [`SpecSource`]:
//!
//! - [`FileSource`] reads a file from disk,
//! - [`ProcessSource`] runs a generator that writes the file, then reads it,
//! - [`HttpSource`] fetches the document from a running server.
//!
//! [`SourceConfig`] also implements [`SpecSource`] by dispatching to the matching strategy.

use std::time::Duration;

use crate::SplitError;
use crate::config::{SourceConfig, SpecFormat};

mod file;
pub use self::file::*;

mod http;
pub use self::http::*;

mod process;
pub use self::process::*;

/// Raw specification text together with what the source knows about its format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSpec {
    /// The document text.
    pub content: String,
    /// Format suggested by the source: file extension or HTTP content type.
    pub format_hint: Option<SpecFormat>,
}

impl RawSpec {
    /// Wraps document text without a format hint.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            format_hint: None,
        }
    }

    /// Sets the format hint.
    #[must_use]
    pub fn with_format_hint(mut self, format_hint: Option<SpecFormat>) -> Self {
        self.format_hint = format_hint;
        self
    }

    /// Resolves the format: explicit choice first, then the source hint, then the content.
    pub fn resolve_format(&self, explicit: Option<SpecFormat>) -> SpecFormat {
        explicit
            .or(self.format_hint)
            .unwrap_or_else(|| SpecFormat::sniff(&self.content))
    }
}

/// A place a specification document can be acquired from.
pub trait SpecSource {
    /// Produces the raw specification text.
    ///
    /// # Errors
    ///
    /// Depends on the strategy: [`SplitError::NotFound`] and [`SplitError::Io`] for files,
    /// [`SplitError::ExternalTool`] for generators, [`SplitError::Network`] for HTTP.
    fn acquire(&self) -> impl Future<Output = Result<RawSpec, SplitError>> + Send;
}

impl SpecSource for SourceConfig {
    async fn acquire(&self) -> Result<RawSpec, SplitError> {
        match self {
            Self::File { path } => FileSource::new(path).acquire().await,
            Self::Process {
                command,
                args,
                output,
            } => {
                ProcessSource::new(command, output)
                    .with_args(args.iter().cloned())
                    .acquire()
                    .await
            }
            Self::Http {
                url,
                verify_tls,
                timeout_secs,
            } => {
                HttpSource::new(url.clone())
                    .with_verify_tls(*verify_tls)
                    .with_timeout(Duration::from_secs(*timeout_secs))
                    .acquire()
                    .await
            }
        }
    }
}
