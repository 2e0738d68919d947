use std::path::PathBuf;

use crate::config::SpecFormat;
use crate::yaml::YamlError;

/// Errors that can occur while acquiring, parsing, or splitting a specification.
///
/// Every variant aborts the run: there is no partial-success continuation across stages,
/// and a failed fragment write stops the remaining writes.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum SplitError {
    /// The input specification file does not exist.
    #[display("specification file not found: {}", path.display())]
    #[from(skip)]
    NotFound {
        /// The missing file.
        path: PathBuf,
    },

    /// The external specification generator could not be launched or exited with a failure.
    #[display("external tool `{command}` failed ({}): {stderr}", describe_exit(*code))]
    #[from(skip)]
    ExternalTool {
        /// The command line that was run.
        command: String,
        /// Exit code, `None` when the process could not be spawned or was killed by a signal.
        code: Option<i32>,
        /// Captured standard error (or the spawn error message).
        stderr: String,
    },

    /// The HTTP fetch failed: connection error, timeout, or non-2xx status.
    #[display("failed to fetch {url}{}: {reason}", describe_status(*status))]
    #[from(skip)]
    Network {
        /// The requested URL.
        url: String,
        /// HTTP status code, when a response was received.
        status: Option<u16>,
        /// Human-readable failure description.
        reason: String,
    },

    /// The document is not valid JSON or YAML.
    #[display("invalid {format} document{}: {message}", describe_location(*location))]
    #[from(skip)]
    Parse {
        /// The format the document was decoded as.
        format: SpecFormat,
        /// The decoder message.
        message: String,
        /// Position of the error when the decoder reports one.
        location: Option<Location>,
    },

    /// Reading a file, creating the output directory, or writing a fragment failed.
    #[display("I/O error on {}: {source}", path.display())]
    #[from(skip)]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// A fragment could not be serialized to YAML.
    #[display("YAML serialization error: {_0}")]
    Yaml(YamlError),

    /// The environment tag cannot be used as an output directory name.
    #[display("invalid environment '{value}': {reason}")]
    #[from(skip)]
    InvalidEnvironment {
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Two paths normalize to the same fragment file and collisions are not allowed.
    #[display("paths '{first}' and '{second}' both map to {}", file.display())]
    #[from(skip)]
    PathCollision {
        /// The shared fragment file name.
        file: PathBuf,
        /// The earlier path in document order.
        first: String,
        /// The later path in document order.
        second: String,
    },
}

impl SplitError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Line and column of a parse error, both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display("line {line}, column {column}")]
pub struct Location {
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
}

fn describe_exit(code: Option<i32>) -> String {
    code.map_or_else(|| "no exit code".to_owned(), |code| format!("exit code {code}"))
}

fn describe_status(status: Option<u16>) -> String {
    status.map(|status| format!(" (HTTP {status})")).unwrap_or_default()
}

fn describe_location(location: Option<Location>) -> String {
    location
        .map(|location| format!(" at {location}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_external_tool_error() {
        let error = SplitError::ExternalTool {
            command: "dotnet swagger tofile".to_owned(),
            code: Some(1),
            stderr: "assembly not found".to_owned(),
        };

        assert_eq!(
            error.to_string(),
            "external tool `dotnet swagger tofile` failed (exit code 1): assembly not found"
        );

        let error = SplitError::ExternalTool {
            command: "missing-tool".to_owned(),
            code: None,
            stderr: "No such file or directory".to_owned(),
        };
        assert_eq!(
            error.to_string(),
            "external tool `missing-tool` failed (no exit code): No such file or directory"
        );
    }

    #[test]
    fn should_display_network_error_with_status() {
        let error = SplitError::Network {
            url: "http://localhost:5000/swagger/v1/swagger.json".to_owned(),
            status: Some(503),
            reason: "Service Unavailable".to_owned(),
        };

        assert_eq!(
            error.to_string(),
            "failed to fetch http://localhost:5000/swagger/v1/swagger.json (HTTP 503): Service Unavailable"
        );
    }

    #[test]
    fn should_display_parse_error_location() {
        let error = SplitError::Parse {
            format: SpecFormat::Json,
            message: "expected value".to_owned(),
            location: Some(Location { line: 3, column: 7 }),
        };

        assert_eq!(
            error.to_string(),
            "invalid JSON document at line 3, column 7: expected value"
        );
    }

    #[test]
    fn should_keep_io_source() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Access denied");
        let error = SplitError::io("output/qa", source);

        let source = std::error::Error::source(&error).expect("should have a source");
        assert_eq!(source.to_string(), "Access denied");
    }

    #[test]
    fn should_be_send_and_sync() {
        fn assert_error_traits<T>(_: &T)
        where
            T: std::error::Error + Send + Sync + 'static,
        {
        }

        let error = SplitError::NotFound {
            path: PathBuf::from("swagger.yaml"),
        };
        assert_error_traits(&error);
    }
}
