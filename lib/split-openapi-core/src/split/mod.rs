//! Splitting a specification into per-path fragment documents.
//!
//! # Overview
//!
//! Each entry of the `paths` map becomes its own minimal specification: the source version
//! marker and `info` block, plus that single path item. Fragments are named after the path:
//!
//! | path            | file            |
//! |-----------------|-----------------|
//! | `/users/{id}`   | `users_id.yaml` |
//! | `/`             | `root.yaml`     |
//! | `/a/b`, `/a_b`  | `a_b.yaml`      |
//!
//! When two paths map to the same file, the later one in document order wins unless
//! [`CollisionPolicy::Fail`] is selected.
//!
//! # Example
//!
//! ```rust,no_run
//! use split_openapi_core::split::{SplitByPath, SplitExt};
//! use split_openapi_core::{SpecDocument, SpecFormat};
//!
//! # async fn example() -> Result<(), split_openapi_core::SplitError> {
//! let content = "openapi: 3.0.0\npaths:\n  /ping:\n    get: {}\n";
//! let doc = SpecDocument::parse(content, SpecFormat::Yaml)?;
//!
//! let result = doc.split_with(&SplitByPath::new())?;
//! let report = result.write_to("output/dev").await?;
//!
//! println!("{} fragment(s) written", report.fragment_count);
//! # Ok(())
//! # }
//! ```

mod by_path;
mod fragment;
mod splitter;

pub use by_path::{CollisionPolicy, FragmentDocument, SplitByPath, fragment_file_name};
pub use fragment::{Collision, Fragment, SplitReport, SplitResult};
pub use splitter::{DocumentSplitter, SplitExt};
