use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use super::{FileSource, RawSpec, SpecSource};
use crate::SplitError;

/// Placeholder replaced by the generator output path in [`ProcessSource`] arguments.
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Arguments of `dotnet swagger tofile` writing to [`OUTPUT_PLACEHOLDER`].
pub fn dotnet_swagger_args(assembly: &Path, api_version: &str) -> Vec<String> {
    vec![
        "swagger".to_owned(),
        "tofile".to_owned(),
        "--output".to_owned(),
        OUTPUT_PLACEHOLDER.to_owned(),
        assembly.display().to_string(),
        api_version.to_owned(),
    ]
}

/// Runs an external generator that writes the specification to a file, then reads that file.
///
/// ```rust,no_run
/// use split_openapi_core::acquire::{ProcessSource, SpecSource};
///
/// # async fn example() -> Result<(), split_openapi_core::SplitError> {
/// let source = ProcessSource::new("dotnet", "swagger.yaml").with_args([
///     "swagger",
///     "tofile",
///     "--output",
///     "{output}",
///     "bin/Debug/net8.0/MyApi.dll",
///     "v1",
/// ]);
/// let raw = source.acquire().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSource {
    command: String,
    args: Vec<String>,
    output: PathBuf,
}

impl ProcessSource {
    /// A generator `command` expected to write `output`.
    pub fn new(command: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            output: output.into(),
        }
    }

    /// Appends an argument.
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Arguments with [`OUTPUT_PLACEHOLDER`] substituted.
    pub fn resolved_args(&self) -> Vec<String> {
        let output = self.output.to_string_lossy();
        self.args
            .iter()
            .map(|arg| arg.replace(OUTPUT_PLACEHOLDER, &output))
            .collect()
    }

    fn command_line(&self, args: &[String]) -> String {
        let mut line = self.command.clone();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl SpecSource for ProcessSource {
    async fn acquire(&self) -> Result<RawSpec, SplitError> {
        let args = self.resolved_args();
        let command_line = self.command_line(&args);
        info!(command = %command_line, "generating specification");

        let output = Command::new(&self.command)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|err| SplitError::ExternalTool {
                command: command_line.clone(),
                code: None,
                stderr: err.to_string(),
            })?;

        if !output.status.success() {
            return Err(SplitError::ExternalTool {
                command: command_line,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        debug!(output = %self.output.display(), "specification generated");

        FileSource::new(&self.output).acquire().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_substitute_output_placeholder() {
        let source = ProcessSource::new("dotnet", "out/swagger.yaml")
            .with_args(dotnet_swagger_args(Path::new("MyApi.dll"), "v1"));

        assert_eq!(
            source.resolved_args(),
            [
                "swagger",
                "tofile",
                "--output",
                "out/swagger.yaml",
                "MyApi.dll",
                "v1"
            ]
        );
    }

    #[test]
    fn should_substitute_placeholder_inside_argument() {
        let source = ProcessSource::new("generator", "spec.json").with_arg("--out={output}");

        assert_eq!(source.resolved_args(), ["--out=spec.json"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn should_read_generated_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let output = dir.path().join("swagger.yaml");
        let source = ProcessSource::new("sh", &output).with_args([
            "-c",
            "printf 'openapi: 3.0.0\\npaths: {}\\n' > \"$0\"",
            OUTPUT_PLACEHOLDER,
        ]);

        let raw = source.acquire().await?;

        assert_eq!(raw.content, "openapi: 3.0.0\npaths: {}\n");
        assert_eq!(raw.format_hint, Some(crate::SpecFormat::Yaml));
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn should_report_exit_code_and_stderr() {
        let source = ProcessSource::new("sh", "unused.yaml")
            .with_args(["-c", "echo 'assembly not found' >&2; exit 3"]);

        let result = source.acquire().await;

        match result {
            Err(SplitError::ExternalTool { code, stderr, .. }) => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "assembly not found");
            }
            other => panic!("expected ExternalTool, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn should_report_missing_tool() {
        let source = ProcessSource::new("split-openapi-no-such-generator", "unused.yaml");

        let result = source.acquire().await;

        assert!(
            matches!(result, Err(SplitError::ExternalTool { code: None, .. })),
            "got {result:?}"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn should_fail_when_generator_writes_nothing() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let source = ProcessSource::new("true", dir.path().join("never-written.yaml"));

        let result = source.acquire().await;

        assert!(matches!(result, Err(SplitError::NotFound { .. })));
        Ok(())
    }
}
