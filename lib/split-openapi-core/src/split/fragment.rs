//! Fragment types for split specifications.

use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use serde::Serialize;
use tracing::{debug, info};

use crate::{SplitError, ToYaml};

/// A fragment extracted from a specification document.
///
/// Represents a piece of the original document that is written to its own file.
///
/// # Type Parameters
///
/// * `T` - The type of content in this fragment. Must implement [`Serialize`] for file output.
#[derive(Debug, Clone)]
pub struct Fragment<T: Serialize> {
    /// File name, relative to the output directory.
    pub path: PathBuf,

    /// The content to serialize into the fragment file.
    pub content: T,
}

impl<T: Serialize> Fragment<T> {
    /// Creates a new fragment with the given path and content.
    pub fn new(path: impl Into<PathBuf>, content: T) -> Self {
        Self {
            path: path.into(),
            content,
        }
    }
}

/// Two source paths that map to the same fragment file.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{} overwritten: '{overwritten}' replaced by '{by}'", file.display())]
pub struct Collision {
    /// The shared file name.
    pub file: PathBuf,
    /// The path whose fragment was replaced.
    pub overwritten: String,
    /// The later path that replaced it.
    pub by: String,
}

/// The result of splitting a document.
///
/// Fragments are kept in document order. Writing them in that order gives the
/// last-writer-wins behavior recorded in [`collisions`](Self::collisions).
#[derive(Debug, Clone)]
pub struct SplitResult<T: Serialize> {
    /// Fragments to be written to separate files.
    pub fragments: Vec<Fragment<T>>,

    /// File names shared by several fragments.
    pub collisions: Vec<Collision>,
}

impl<T: Serialize> Default for SplitResult<T> {
    fn default() -> Self {
        Self {
            fragments: Vec::new(),
            collisions: Vec::new(),
        }
    }
}

impl<T: Serialize> SplitResult<T> {
    /// Creates a new split result with no fragments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fragment to the result.
    pub fn add_fragment(&mut self, fragment: Fragment<T>) {
        self.fragments.push(fragment);
    }

    /// Records a file name collision.
    pub fn add_collision(&mut self, collision: Collision) {
        self.collisions.push(collision);
    }

    /// Returns `true` if there are no fragments.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Returns the number of fragments.
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// Writes every fragment as YAML under `dir`, creating it first.
    ///
    /// Fragments are written in order and the first failure stops the loop; files written
    /// before it are left in place.
    ///
    /// # Errors
    ///
    /// [`SplitError::Io`] if the directory cannot be created or a file cannot be written,
    /// [`SplitError::Yaml`] if a fragment cannot be serialized.
    pub async fn write_to(&self, dir: impl AsRef<Path>) -> Result<SplitReport, SplitError> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|err| SplitError::io(dir, err))?;

        let mut files = IndexSet::new();
        for fragment in &self.fragments {
            let file = dir.join(&fragment.path);
            let yaml = fragment.content.to_yaml()?;
            tokio::fs::write(&file, yaml)
                .await
                .map_err(|err| SplitError::io(&file, err))?;
            debug!(file = %file.display(), "fragment written");
            files.insert(file);
        }

        info!(
            fragments = self.fragments.len(),
            files = files.len(),
            dir = %dir.display(),
            "specification split"
        );
        Ok(SplitReport {
            fragment_count: self.fragments.len(),
            files: files.into_iter().collect(),
            collisions: self.collisions.clone(),
        })
    }
}

/// What [`SplitResult::write_to`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitReport {
    /// Number of fragments written, one per source path.
    pub fragment_count: usize,
    /// Distinct files on disk, in order of first write.
    pub files: Vec<PathBuf>,
    /// Files written more than once.
    pub collisions: Vec<Collision>,
}
