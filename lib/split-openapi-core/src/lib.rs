//! # Split OpenAPI Core
//!
//! Split an OpenAPI or Swagger specification into one YAML document per API path.
//!
//! A run has three stages:
//!
//! 1. **Acquire** the raw document from a file, an external generator, or an HTTP server
//!    (see [`acquire`]),
//! 2. **Parse** it as JSON or YAML into a [`SpecDocument`],
//! 3. **Split** it with [`SplitByPath`](split::SplitByPath) and write every fragment to
//!    `{output_root}/{environment}/{file}.yaml` (see [`split`]).
//!
//! [`SpecSplitter`] chains the three stages from a [`SplitterConfig`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use split_openapi_core::{Environment, SourceConfig, SpecSplitter, SplitterConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let url = url::Url::parse("http://localhost:5000/swagger/v1/swagger.json")?;
//! let config = SplitterConfig::new(SourceConfig::http(url)).with_output_root("output");
//!
//! let report = SpecSplitter::new(config)
//!     .run(&Environment::new("dev")?)
//!     .await?;
//!
//! for file in &report.files {
//!     println!("{}", file.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Splitting a document already in memory
//!
//! ```rust
//! use split_openapi_core::split::{DocumentSplitter, SplitByPath};
//! use split_openapi_core::{SpecDocument, SpecFormat};
//!
//! let doc = SpecDocument::parse(
//!     r#"{"openapi": "3.0.0", "paths": {"/users/{id}": {}, "/": {}}}"#,
//!     SpecFormat::Json,
//! )?;
//!
//! let result = SplitByPath::new().split(&doc)?;
//! let names: Vec<_> = result.fragments.iter().map(|fragment| fragment.path.clone()).collect();
//!
//! assert_eq!(names, ["users_id.yaml", "root.yaml"].map(std::path::PathBuf::from));
//! # Ok::<(), split_openapi_core::SplitError>(())
//! ```
//!
//! ## TLS verification
//!
//! HTTP sources validate certificates by default. `verify_tls: false` accepts any
//! certificate and should be limited to local development servers using self-signed
//! certificates; a warning is logged whenever it is in effect.

pub mod acquire;
pub mod split;

mod config;
pub use self::config::*;

mod document;
pub use self::document::*;

mod error;
pub use self::error::*;

mod runner;
pub use self::runner::*;

mod yaml;
pub use self::yaml::*;
