//! `split-openapi <environment>`: split an OpenAPI specification into per-path YAML files.

use std::process::ExitCode;

use anyhow::{Context, Result};
use split_openapi_core::{SpecSplitter, SplitterConfig};
use tracing::{Level, info};

mod args;
use self::args::{AppArgs, Parsed, USAGE};

#[tokio::main(flavor = "current_thread")]
#[allow(clippy::print_stderr, clippy::print_stdout)]
async fn main() -> ExitCode {
    let args = match AppArgs::parse(pico_args::Arguments::from_env()) {
        Ok(Parsed::Run(args)) => args,
        Ok(Parsed::Help) => {
            print!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(error) => {
            eprintln!("Error: {error:#}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error:?}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: AppArgs) -> Result<()> {
    let AppArgs {
        environment,
        config_file,
        overrides,
        ..
    } = args;

    let config = match &config_file {
        Some(path) => SplitterConfig::load(path)
            .await
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => SplitterConfig::default(),
    };
    let config = overrides.apply(config)?;

    let splitter = SpecSplitter::new(config);
    let output_dir = splitter.output_dir(&environment);
    let report = splitter
        .run(&environment)
        .await
        .with_context(|| format!("splitting specification for environment '{environment}'"))?;

    info!(
        fragments = report.fragment_count,
        files = report.files.len(),
        collisions = report.collisions.len(),
        "{} path(s) written to {}",
        report.fragment_count,
        output_dir.display()
    );
    Ok(())
}
