use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{RawSpec, SpecSource};
use crate::SplitError;
use crate::config::SpecFormat;

/// Reads the specification from a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// A source reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SpecSource for FileSource {
    async fn acquire(&self) -> Result<RawSpec, SplitError> {
        debug!(path = %self.path.display(), "reading specification file");

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => SplitError::NotFound {
                    path: self.path.clone(),
                },
                _ => SplitError::io(&self.path, err),
            })?;

        Ok(RawSpec::new(content).with_format_hint(SpecFormat::from_extension(&self.path)))
    }
}
