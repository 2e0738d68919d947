//! One fragment per path.

use std::collections::HashMap;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{Collision, DocumentSplitter, Fragment, SplitResult};
use crate::{SchemaVersion, SpecDocument, SplitError};

/// File name used for the `/` path.
const ROOT_FILE_STEM: &str = "root";

/// What to do when two paths normalize to the same file name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// The later path in document order overwrites the earlier file.
    #[default]
    Overwrite,
    /// Reject the document before writing anything.
    Fail,
}

/// Computes the fragment file name of an API path.
///
/// Leading and trailing `/` are stripped, inner `/` become `_`, and braces are removed.
/// An empty result is named `root`.
///
/// ```rust
/// use split_openapi_core::split::fragment_file_name;
///
/// assert_eq!(fragment_file_name("/users/{id}"), "users_id.yaml");
/// assert_eq!(fragment_file_name("/"), "root.yaml");
/// ```
pub fn fragment_file_name(path: &str) -> String {
    let stem: String = path
        .trim_matches('/')
        .replace('/', "_")
        .chars()
        .filter(|ch| !matches!(ch, '{' | '}'))
        .collect();

    if stem.is_empty() {
        format!("{ROOT_FILE_STEM}.yaml")
    } else {
        format!("{stem}.yaml")
    }
}

/// A specification reduced to a single path.
///
/// Serializes as `openapi` (or `swagger`), `info`, then `paths` with exactly one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentDocument {
    /// Version copied from the source, `openapi: 3.0.0` when absent.
    pub version: SchemaVersion,
    /// `info` copied from the source, empty when absent.
    pub info: Value,
    /// The API path.
    pub path: String,
    /// The path item, unchanged.
    pub path_item: Value,
}

impl FragmentDocument {
    /// Builds the fragment of `path` from its source document.
    pub fn new(doc: &SpecDocument, path: &str, path_item: &Value) -> Self {
        Self {
            version: doc.version.clone().unwrap_or_default(),
            info: doc
                .info
                .clone()
                .unwrap_or_else(|| Value::Object(Map::new())),
            path: path.to_owned(),
            path_item: path_item.clone(),
        }
    }
}

impl Serialize for FragmentDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut paths = IndexMap::with_capacity(1);
        paths.insert(&self.path, &self.path_item);

        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry(self.version.key(), self.version.version())?;
        map.serialize_entry("info", &self.info)?;
        map.serialize_entry("paths", &paths)?;
        map.end()
    }
}

/// Splits a document into one [`FragmentDocument`] per entry of `paths`.
///
/// Fragments follow document order and are named with [`fragment_file_name`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitByPath {
    collision_policy: CollisionPolicy,
}

impl SplitByPath {
    /// A splitter with the [`CollisionPolicy::Overwrite`] policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the collision policy.
    #[must_use]
    pub fn with_collision_policy(mut self, collision_policy: CollisionPolicy) -> Self {
        self.collision_policy = collision_policy;
        self
    }
}

impl DocumentSplitter for SplitByPath {
    type Fragment = FragmentDocument;

    fn split(&self, doc: &SpecDocument) -> Result<SplitResult<Self::Fragment>, SplitError> {
        let mut result = SplitResult::new();
        let mut owners: HashMap<String, &str> = HashMap::with_capacity(doc.paths.len());

        for (path, path_item) in &doc.paths {
            let file_name = fragment_file_name(path);
            debug!(%path, %file_name, "fragment");

            if let Some(previous) = owners.insert(file_name.clone(), path) {
                if self.collision_policy == CollisionPolicy::Fail {
                    return Err(SplitError::PathCollision {
                        file: PathBuf::from(file_name),
                        first: previous.to_owned(),
                        second: path.clone(),
                    });
                }
                let collision = Collision {
                    file: PathBuf::from(&file_name),
                    overwritten: previous.to_owned(),
                    by: path.clone(),
                };
                warn!(%collision, "fragment file name collision");
                result.add_collision(collision);
            }

            let content = FragmentDocument::new(doc, path, path_item);
            result.add_fragment(Fragment::new(file_name, content));
        }

        Ok(result)
    }
}
