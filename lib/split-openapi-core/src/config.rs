//! Run configuration: where the specification comes from and where fragments go.
//!
//! A [`SplitterConfig`] replaces the hardcoded paths and URLs of ad-hoc scripts. It can be
//! built in code, deserialized from a YAML or JSON file with [`SplitterConfig::load`], and is
//! then handed to [`SpecSplitter`](crate::SpecSplitter) together with an [`Environment`].
//!
//! ```yaml
//! source:
//!   mode: http
//!   url: https://localhost:5001/swagger/v1/swagger.json
//!   verify_tls: false
//!   timeout_secs: 10
//! format: json
//! output_root: ./output
//! collision_policy: overwrite
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::SplitError;
use crate::acquire::{DEFAULT_TIMEOUT_SECS, dotnet_swagger_args};
use crate::document::{parse_error, strip_bom};
use crate::split::CollisionPolicy;

/// URL served by a local ASP.NET application with Swashbuckle enabled.
pub const DEFAULT_SPEC_URL: &str = "http://localhost:5000/swagger/v1/swagger.json";

/// Root directory under which one directory per environment is created.
pub const DEFAULT_OUTPUT_ROOT: &str = "output";

/// File written by the default generator command.
pub const DEFAULT_GENERATED_FILE: &str = "swagger.yaml";

/// Assembly read by the default generator command.
pub const DEFAULT_ASSEMBLY: &str = "bin/Debug/net8.0/MyApi.dll";

/// Encoding of a specification document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum SpecFormat {
    /// YAML 1.2.
    #[display("YAML")]
    Yaml,
    /// JSON.
    #[display("JSON")]
    Json,
}

impl SpecFormat {
    /// Guesses the format from a file extension (`.json`, `.yaml`, `.yml`).
    pub fn from_extension(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Guesses the format from an HTTP `Content-Type` header value.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if mime == "application/json" || mime.ends_with("+json") {
            Some(Self::Json)
        } else if mime.contains("yaml") {
            Some(Self::Yaml)
        } else {
            None
        }
    }

    /// Guesses the format from the content: a document starting with `{` is JSON.
    pub fn sniff(content: &str) -> Self {
        let first = strip_bom(content).trim_start().chars().next();
        if first == Some('{') {
            Self::Json
        } else {
            Self::Yaml
        }
    }
}

impl FromStr for SpecFormat {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(UnknownVariant::new("format", value, "yaml, json")),
        }
    }
}

/// A textual option value that does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
#[display("unknown {kind} '{value}', expected one of: {expected}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
            expected,
        }
    }
}

/// Which acquisition strategy a [`SourceConfig`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SourceMode {
    /// Read a file from disk.
    #[display("file")]
    File,
    /// Run an external generator, then read the file it wrote.
    #[display("process")]
    Process,
    /// Fetch the document over HTTP.
    #[display("http")]
    Http,
}

impl FromStr for SourceMode {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "process" => Ok(Self::Process),
            "http" => Ok(Self::Http),
            _ => Err(UnknownVariant::new("source mode", value, "file, process, http")),
        }
    }
}

/// Where the specification document comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SourceConfig {
    /// A specification file on disk.
    File {
        /// Path of the file.
        path: PathBuf,
    },

    /// An external generator writing the specification to `output`.
    ///
    /// Occurrences of `{output}` in `args` are replaced by `output`.
    Process {
        /// Program to run.
        command: String,
        /// Program arguments.
        #[serde(default)]
        args: Vec<String>,
        /// File the generator writes, read once it succeeds.
        output: PathBuf,
    },

    /// A live specification served over HTTP(S).
    Http {
        /// Document URL.
        url: Url,
        /// Validate the server TLS certificate.
        ///
        /// Setting this to `false` accepts any certificate, including self-signed
        /// and expired ones. Only use it against local development servers.
        #[serde(default = "default_verify_tls")]
        verify_tls: bool,
        /// Request timeout in seconds.
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

fn default_verify_tls() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl SourceConfig {
    /// A file source.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// An HTTP source with certificate validation and the default timeout.
    pub fn http(url: Url) -> Self {
        Self::Http {
            url,
            verify_tls: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Runs `dotnet swagger tofile` against the given assembly and API version.
    pub fn dotnet_swagger(
        assembly: impl AsRef<Path>,
        api_version: &str,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self::Process {
            command: "dotnet".to_owned(),
            args: dotnet_swagger_args(assembly.as_ref(), api_version),
            output: output.into(),
        }
    }

    /// The acquisition strategy of this source.
    pub fn mode(&self) -> SourceMode {
        match self {
            Self::File { .. } => SourceMode::File,
            Self::Process { .. } => SourceMode::Process,
            Self::Http { .. } => SourceMode::Http,
        }
    }

    /// The default source for a mode.
    ///
    /// # Errors
    ///
    /// Only fails if [`DEFAULT_SPEC_URL`] does not parse.
    pub fn default_for(mode: SourceMode) -> Result<Self, url::ParseError> {
        let source = match mode {
            SourceMode::File => Self::file(DEFAULT_GENERATED_FILE),
            SourceMode::Process => Self::default(),
            SourceMode::Http => Self::http(Url::parse(DEFAULT_SPEC_URL)?),
        };
        Ok(source)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::dotnet_swagger(DEFAULT_ASSEMBLY, "v1", DEFAULT_GENERATED_FILE)
    }
}

/// Everything a run needs besides the environment tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Where the specification comes from.
    pub source: SourceConfig,
    /// Explicit input format; detected from the source and content when absent.
    pub format: Option<SpecFormat>,
    /// Parent of the per-environment output directories.
    pub output_root: PathBuf,
    /// What to do when two paths map to the same fragment file.
    pub collision_policy: CollisionPolicy,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            format: None,
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            collision_policy: CollisionPolicy::default(),
        }
    }
}

impl SplitterConfig {
    /// Creates a configuration with the given source and default settings.
    pub fn new(source: SourceConfig) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }

    /// Sets the output root directory.
    #[must_use]
    pub fn with_output_root(mut self, output_root: impl Into<PathBuf>) -> Self {
        self.output_root = output_root.into();
        self
    }

    /// Forces the input format.
    #[must_use]
    pub fn with_format(mut self, format: SpecFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Sets the collision policy.
    #[must_use]
    pub fn with_collision_policy(mut self, collision_policy: CollisionPolicy) -> Self {
        self.collision_policy = collision_policy;
        self
    }

    /// Directory receiving the fragments of `environment`.
    pub fn output_dir(&self, environment: &Environment) -> PathBuf {
        self.output_root.join(environment.as_str())
    }

    /// Loads a configuration file, YAML or JSON depending on its extension or content.
    ///
    /// Missing keys take their default values.
    ///
    /// # Errors
    ///
    /// [`SplitError::NotFound`] or [`SplitError::Io`] if the file cannot be read,
    /// [`SplitError::Parse`] if it is malformed.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SplitError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading configuration");

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| match err.kind() {
                std::io::ErrorKind::NotFound => SplitError::NotFound {
                    path: path.to_path_buf(),
                },
                _ => SplitError::io(path, err),
            })?;

        let content = strip_bom(&content);
        let format =
            SpecFormat::from_extension(path).unwrap_or_else(|| SpecFormat::sniff(content));
        match format {
            SpecFormat::Json => serde_json::from_str(content).map_err(parse_error::json),
            SpecFormat::Yaml => serde_saphyr::from_str(content).map_err(parse_error::yaml),
        }
    }
}

/// Label selecting the output directory of a run, such as `dev`, `qa` or `pt`.
///
/// Any non-empty name is accepted as long as it stays a single directory component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display, derive_more::Deref)]
pub struct Environment(String);

impl Environment {
    /// Validates an environment tag.
    ///
    /// # Errors
    ///
    /// [`SplitError::InvalidEnvironment`] if the value is blank, contains a path
    /// separator, or is `.`/`..`.
    pub fn new(value: impl Into<String>) -> Result<Self, SplitError> {
        let value = value.into();
        let reason = if value.trim().is_empty() {
            Some("must not be empty")
        } else if value.contains(['/', '\\']) {
            Some("must not contain a path separator")
        } else if value == "." || value == ".." {
            Some("must not be a relative directory reference")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(SplitError::InvalidEnvironment { value, reason }),
            None => Ok(Self(value)),
        }
    }

    /// The tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Environment {
    type Err = SplitError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}
