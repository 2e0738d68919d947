//! In-memory specification documents.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::SplitError;
use crate::config::SpecFormat;

/// Version used by fragments when the source declares none.
pub const DEFAULT_OPENAPI_VERSION: &str = "3.0.0";

/// The version marker of a specification, keeping the key it was declared with.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SchemaVersion {
    /// OpenAPI 3.x, declared with the `openapi` key.
    #[display("openapi {_0}")]
    OpenApi(String),
    /// Swagger 2.0, declared with the `swagger` key.
    #[display("swagger {_0}")]
    Swagger(String),
}

impl SchemaVersion {
    /// The top-level key carrying this version.
    pub fn key(&self) -> &'static str {
        match self {
            Self::OpenApi(_) => "openapi",
            Self::Swagger(_) => "swagger",
        }
    }

    /// The version string.
    pub fn version(&self) -> &str {
        match self {
            Self::OpenApi(version) | Self::Swagger(version) => version,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::OpenApi(DEFAULT_OPENAPI_VERSION.to_owned())
    }
}

/// A parsed OpenAPI or Swagger document.
///
/// Only the parts needed to build per-path fragments are kept: the version marker, the
/// `info` block and the `paths` map. Path items are opaque and never interpreted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecDocument {
    /// Declared version, if any.
    pub version: Option<SchemaVersion>,
    /// The `info` block, passed through unchanged.
    pub info: Option<Value>,
    /// Path items in document order; empty when the document has no `paths`.
    pub paths: IndexMap<String, Value>,
}

impl SpecDocument {
    /// Decodes a document in the given format.
    ///
    /// A leading byte order mark is ignored.
    ///
    /// # Errors
    ///
    /// [`SplitError::Parse`] if the content is malformed or not a mapping.
    pub fn parse(content: &str, format: SpecFormat) -> Result<Self, SplitError> {
        let content = strip_bom(content);
        let root: Value = match format {
            SpecFormat::Json => serde_json::from_str(content).map_err(parse_error::json)?,
            SpecFormat::Yaml => serde_saphyr::from_str(content).map_err(parse_error::yaml)?,
        };

        match root {
            Value::Object(root) => Self::from_mapping(root, format),
            other => Err(parse_error::shape(
                format,
                format!("expected a mapping at the document root, found {}", kind(&other)),
            )),
        }
    }

    /// Number of path items.
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    fn from_mapping(mut root: Map<String, Value>, format: SpecFormat) -> Result<Self, SplitError> {
        let openapi = root.get("openapi").and_then(scalar_text);
        let swagger = root.get("swagger").and_then(scalar_text);
        let version = match (openapi, swagger) {
            (Some(version), _) => Some(SchemaVersion::OpenApi(version)),
            (None, Some(version)) => Some(SchemaVersion::Swagger(version)),
            (None, None) => None,
        };

        let paths = match root.remove("paths") {
            None | Some(Value::Null) => IndexMap::new(),
            Some(Value::Object(paths)) => paths.into_iter().collect(),
            Some(other) => {
                return Err(parse_error::shape(
                    format,
                    format!("`paths` must be a mapping, found {}", kind(&other)),
                ));
            }
        };

        Ok(Self {
            version,
            info: root.remove("info").filter(|info| !info.is_null()),
            paths,
        })
    }
}

// An unquoted `swagger: 2.0` decodes as a number
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

/// Drops a leading UTF-8 byte order mark, as written by some Windows tools.
pub(crate) fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

pub(crate) mod parse_error {
    use crate::SplitError;
    use crate::config::SpecFormat;
    use crate::error::Location;

    pub(crate) fn json(error: serde_json::Error) -> SplitError {
        let location = (error.line() > 0).then(|| Location {
            line: error.line(),
            column: error.column(),
        });
        SplitError::Parse {
            format: SpecFormat::Json,
            message: error.to_string(),
            location,
        }
    }

    pub(crate) fn yaml(error: serde_saphyr::Error) -> SplitError {
        let location = error.location().map(|location| Location {
            line: usize::try_from(location.line()).unwrap_or(usize::MAX),
            column: usize::try_from(location.column()).unwrap_or(usize::MAX),
        });
        SplitError::Parse {
            format: SpecFormat::Yaml,
            message: error.to_string(),
            location,
        }
    }

    pub(crate) fn shape(format: SpecFormat, message: String) -> SplitError {
        SplitError::Parse {
            format,
            message,
            location: None,
        }
    }
}
