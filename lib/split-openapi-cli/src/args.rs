use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use split_openapi_core::split::CollisionPolicy;
use split_openapi_core::{
    DEFAULT_GENERATED_FILE, Environment, SourceConfig, SourceMode, SpecFormat, SplitterConfig,
};
use tracing::warn;
use url::Url;

pub const USAGE: &str = "\
Split an OpenAPI/Swagger specification into one YAML file per path.

USAGE:
    split-openapi [OPTIONS] <ENVIRONMENT>

ARGS:
    <ENVIRONMENT>              Output sub-directory, e.g. dev, qa, pt

OPTIONS:
    -c, --config <FILE>        YAML or JSON configuration file
    -s, --source <MODE>        Source mode: file, process, http
    -f, --file <PATH>          Specification file (file mode)
    -u, --url <URL>            Specification URL (http mode)
        --insecure             Do not validate TLS certificates (http mode)
        --timeout <SECS>       HTTP timeout in seconds [default: 30]
        --command <PROGRAM>    Generator program (process mode)
        --arg <VALUE>          Generator argument, repeatable; `{output}` is replaced
                               by the generated file path
        --spec-output <PATH>   File written by the generator (process mode)
        --format <FORMAT>      Input format: yaml, json [default: detected]
    -o, --output-root <DIR>    Parent of the environment directories [default: output]
        --fail-on-collision    Abort when two paths map to the same file
    -v, --verbose              Log each fragment
    -h, --help                 Print this help
";

/// What the command line asks for.
#[derive(Debug)]
pub enum Parsed {
    Help,
    Run(AppArgs),
}

#[derive(Debug)]
pub struct AppArgs {
    pub environment: Environment,
    pub config_file: Option<PathBuf>,
    pub overrides: ConfigOverrides,
    pub verbose: bool,
}

/// Command line values taking precedence over the configuration file.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub source: Option<SourceMode>,
    pub file: Option<PathBuf>,
    pub url: Option<Url>,
    pub insecure: bool,
    pub timeout_secs: Option<u64>,
    pub command: Option<String>,
    pub args: Vec<String>,
    pub spec_output: Option<PathBuf>,
    pub format: Option<SpecFormat>,
    pub output_root: Option<PathBuf>,
    pub fail_on_collision: bool,
}

impl AppArgs {
    pub fn parse(mut pargs: pico_args::Arguments) -> Result<Parsed> {
        if pargs.contains(["-h", "--help"]) {
            return Ok(Parsed::Help);
        }

        let config_file = pargs
            .opt_value_from_str(["-c", "--config"])
            .context("parsing config argument")?;
        let verbose = pargs.contains(["-v", "--verbose"]);

        let overrides = ConfigOverrides {
            source: pargs
                .opt_value_from_str(["-s", "--source"])
                .context("parsing source argument")?,
            file: pargs
                .opt_value_from_str(["-f", "--file"])
                .context("parsing file argument")?,
            url: pargs
                .opt_value_from_str(["-u", "--url"])
                .context("parsing url argument")?,
            insecure: pargs.contains("--insecure"),
            timeout_secs: pargs
                .opt_value_from_str("--timeout")
                .context("parsing timeout argument")?,
            command: pargs
                .opt_value_from_str("--command")
                .context("parsing command argument")?,
            args: pargs
                .values_from_str("--arg")
                .context("parsing generator arguments")?,
            spec_output: pargs
                .opt_value_from_str("--spec-output")
                .context("parsing spec-output argument")?,
            format: pargs
                .opt_value_from_str("--format")
                .context("parsing format argument")?,
            output_root: pargs
                .opt_value_from_str(["-o", "--output-root"])
                .context("parsing output-root argument")?,
            fail_on_collision: pargs.contains("--fail-on-collision"),
        };

        let environment: Environment = pargs
            .free_from_str()
            .context("missing or invalid <ENVIRONMENT> argument")?;

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            bail!("unexpected arguments: {}", display_args(&remaining));
        }

        Ok(Parsed::Run(Self {
            environment,
            config_file,
            overrides,
            verbose,
        }))
    }
}

impl ConfigOverrides {
    /// Mode implied by the location flags, when they agree on one.
    fn implied_mode(&self) -> Result<Option<SourceMode>> {
        let mut implied = Vec::new();
        if self.file.is_some() {
            implied.push(SourceMode::File);
        }
        if self.url.is_some() || self.insecure || self.timeout_secs.is_some() {
            implied.push(SourceMode::Http);
        }
        if self.command.is_some() || !self.args.is_empty() || self.spec_output.is_some() {
            implied.push(SourceMode::Process);
        }

        match implied.as_slice() {
            [] => Ok(None),
            [mode] => Ok(Some(*mode)),
            _ => bail!(
                "conflicting source options for modes: {}",
                implied
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }

    /// Applies the command line on top of `config`.
    pub fn apply(self, mut config: SplitterConfig) -> Result<SplitterConfig> {
        let implied = self.implied_mode()?;
        let mode = match (self.source, implied) {
            (Some(explicit), Some(implied)) if explicit != implied => {
                bail!("options for {implied} source given with --source {explicit}")
            }
            (Some(mode), _) | (None, Some(mode)) => mode,
            (None, None) => config.source.mode(),
        };

        if mode != config.source.mode() {
            config.source =
                SourceConfig::default_for(mode).context("building default source")?;
        }

        match &mut config.source {
            SourceConfig::File { path } => {
                if let Some(file) = self.file {
                    *path = file;
                }
            }
            SourceConfig::Process {
                command,
                args,
                output,
            } => {
                if let Some(program) = self.command {
                    *command = program;
                    args.clear();
                }
                if !self.args.is_empty() {
                    *args = self.args;
                }
                if let Some(spec_output) = self.spec_output {
                    *output = spec_output;
                } else if output.as_os_str().is_empty() {
                    *output = PathBuf::from(DEFAULT_GENERATED_FILE);
                }
            }
            SourceConfig::Http {
                url,
                verify_tls,
                timeout_secs,
            } => {
                if let Some(new_url) = self.url {
                    *url = new_url;
                }
                if self.insecure {
                    *verify_tls = false;
                }
                if let Some(secs) = self.timeout_secs {
                    *timeout_secs = secs;
                }
            }
        }

        if let Some(format) = self.format {
            config.format = Some(format);
        }
        if let Some(output_root) = self.output_root {
            config.output_root = output_root;
        }
        if self.fail_on_collision {
            config.collision_policy = CollisionPolicy::Fail;
        }

        if let SourceConfig::Http {
            verify_tls: false, ..
        } = &config.source
        {
            warn!("TLS certificate verification disabled for this run");
        }
        Ok(config)
    }
}

fn display_args(args: &[OsString]) -> String {
    args.iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn parse(args: &[&str]) -> Result<Parsed> {
        let args = args.iter().map(OsString::from).collect();
        AppArgs::parse(pico_args::Arguments::from_vec(args))
    }

    fn parse_run(args: &[&str]) -> AppArgs {
        match parse(args) {
            Ok(Parsed::Run(args)) => args,
            other => panic!("expected run arguments, got {other:?}"),
        }
    }

    #[test]
    fn should_parse_environment_only() {
        let args = parse_run(&["qa"]);

        assert_eq!(args.environment.as_str(), "qa");
        assert!(args.config_file.is_none());
        assert!(!args.verbose);
    }

    #[rstest]
    #[case(&["-h"])]
    #[case(&["--help"])]
    #[case(&["qa", "--help"])]
    fn should_ask_for_help(#[case] args: &[&str]) {
        assert!(matches!(parse(args), Ok(Parsed::Help)));
    }

    #[rstest]
    #[case::missing(&[])]
    #[case::empty(&[""])]
    #[case::separator(&["qa/eu"])]
    #[case::extra(&["qa", "dev"])]
    #[case::unknown_mode(&["qa", "--source", "ftp"])]
    fn should_reject_invalid_arguments(#[case] args: &[&str]) {
        assert!(parse(args).is_err(), "{args:?} should be rejected");
    }

    #[test]
    fn should_switch_to_http_source_from_url() -> Result<()> {
        let args = parse_run(&[
            "dev",
            "--url",
            "https://localhost:5001/swagger/v1/swagger.json",
            "--insecure",
            "--timeout",
            "10",
        ]);

        let config = args.overrides.apply(SplitterConfig::default())?;

        assert_eq!(
            config.source,
            SourceConfig::Http {
                url: Url::parse("https://localhost:5001/swagger/v1/swagger.json")?,
                verify_tls: false,
                timeout_secs: 10,
            }
        );
        Ok(())
    }

    #[test]
    fn should_use_default_url_for_http_mode() -> Result<()> {
        let args = parse_run(&["dev", "--source", "http"]);

        let config = args.overrides.apply(SplitterConfig::default())?;

        assert_eq!(
            config.source,
            SourceConfig::http(Url::parse(split_openapi_core::DEFAULT_SPEC_URL)?)
        );
        Ok(())
    }

    #[test]
    fn should_override_file_source() -> Result<()> {
        let args = parse_run(&[
            "pt",
            "--file",
            "api/swagger.json",
            "--format",
            "json",
            "--output-root",
            "build/specs",
            "--fail-on-collision",
        ]);

        let config = args.overrides.apply(SplitterConfig::default())?;

        assert_eq!(config.source, SourceConfig::file("api/swagger.json"));
        assert_eq!(config.format, Some(SpecFormat::Json));
        assert_eq!(config.output_root, PathBuf::from("build/specs"));
        assert_eq!(config.collision_policy, CollisionPolicy::Fail);
        Ok(())
    }

    #[test]
    fn should_replace_generator_command() -> Result<()> {
        let args = parse_run(&[
            "qa",
            "--command",
            "swagger-gen",
            "--arg",
            "{output}",
            "--spec-output",
            "gen/openapi.yaml",
        ]);

        let config = args.overrides.apply(SplitterConfig::default())?;

        assert_eq!(
            config.source,
            SourceConfig::Process {
                command: "swagger-gen".to_owned(),
                args: vec!["{output}".to_owned()],
                output: PathBuf::from("gen/openapi.yaml"),
            }
        );
        Ok(())
    }

    #[test]
    fn should_keep_config_file_source_without_flags() -> Result<()> {
        let args = parse_run(&["qa"]);
        let file_config = SplitterConfig::new(SourceConfig::file("swagger.json"));

        let config = args.overrides.apply(file_config.clone())?;

        assert_eq!(config, file_config);
        Ok(())
    }

    #[test]
    fn should_reject_conflicting_source_options() {
        let args = parse_run(&["qa", "--file", "swagger.json", "--url", "http://localhost/"]);

        assert!(args.overrides.apply(SplitterConfig::default()).is_err());
    }

    #[test]
    fn should_reject_options_for_other_mode() {
        let args = parse_run(&["qa", "--source", "file", "--url", "http://localhost/"]);

        assert!(args.overrides.apply(SplitterConfig::default()).is_err());
    }
}
