use std::path::PathBuf;

use tracing::info;

use crate::acquire::SpecSource;
use crate::split::{SplitByPath, SplitExt, SplitReport};
use crate::{Environment, SpecDocument, SplitError, SplitterConfig};

/// Runs the whole pipeline: acquire, parse, then split into the environment directory.
///
/// Stages run one after another and the first error aborts the run. Nothing is written
/// before the document has been parsed and split in memory, so a malformed document
/// leaves no output directory behind.
///
/// ```rust,no_run
/// use split_openapi_core::{Environment, SourceConfig, SpecSplitter, SplitterConfig};
///
/// # async fn example() -> Result<(), split_openapi_core::SplitError> {
/// let config = SplitterConfig::new(SourceConfig::file("swagger.yaml"));
/// let environment = Environment::new("qa")?;
///
/// let report = SpecSplitter::new(config).run(&environment).await?;
/// println!("{} fragment(s) written", report.fragment_count);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SpecSplitter {
    config: SplitterConfig,
}

impl SpecSplitter {
    /// Creates a splitter for the given configuration.
    pub fn new(config: SplitterConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Directory the fragments of `environment` are written to.
    pub fn output_dir(&self, environment: &Environment) -> PathBuf {
        self.config.output_dir(environment)
    }

    /// Acquires and parses the specification document.
    ///
    /// # Errors
    ///
    /// Acquisition errors of the configured source, or [`SplitError::Parse`].
    pub async fn load_document(&self) -> Result<SpecDocument, SplitError> {
        let raw = self.config.source.acquire().await?;
        let format = raw.resolve_format(self.config.format);
        info!(mode = %self.config.source.mode(), %format, "parsing specification");

        SpecDocument::parse(&raw.content, format)
    }

    /// Runs the pipeline for `environment`.
    ///
    /// # Errors
    ///
    /// Any [`SplitError`] raised by a stage.
    pub async fn run(&self, environment: &Environment) -> Result<SplitReport, SplitError> {
        let doc = self.load_document().await?;
        info!(paths = doc.path_count(), %environment, "splitting specification");

        let splitter = SplitByPath::new().with_collision_policy(self.config.collision_policy);
        let result = doc.split_with(&splitter)?;

        result.write_to(self.output_dir(environment)).await
    }
}
