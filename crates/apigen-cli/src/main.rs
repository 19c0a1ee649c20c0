//! `apigen` command-line interface.

mod config;
mod error;
mod generate;
mod loader;
mod watch;

use apigen::BackendKind;
use clap::{Args, Parser, Subcommand, ValueEnum};
use config::{ApigenConfig, DEFAULT_CONFIG};
use error::CliError;
use generate::{Settings, run_once};
use loader::InputSource;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "apigen", version, about = "Generate TypeScript API clients from OpenAPI documents")]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the client module
    Generate(GenerateArgs),
    /// List available backends
    Backends,
}

#[derive(Args)]
struct GenerateArgs {
    /// Regenerate whenever the input changes
    #[arg(short, long)]
    watch: bool,

    /// Config file [default: apigen.toml]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// OpenAPI document (JSON or YAML), use - for stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Validation library to target
    #[arg(short, long, value_enum)]
    backend: Option<Backend>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    /// Zod 4 with method chaining
    Zod,
    /// Zod 4 mini, tree-shakable functions
    ZodMini,
    /// Effect Schema
    Effect,
}

impl From<Backend> for BackendKind {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Zod => BackendKind::Zod,
            Backend::ZodMini => BackendKind::ZodMini,
            Backend::Effect => BackendKind::Effect,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "apigen=debug" } else { "apigen=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Merge the config file with command-line flags; flags win.
fn resolve_settings(args: &GenerateArgs) -> Result<Settings, CliError> {
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let config = ApigenConfig::load(&config_path, args.config.is_some())?;

    let mut options = config.generator_options();
    if let Some(backend) = args.backend {
        options.backend = backend.into();
    }
    let input = args
        .input
        .clone()
        .or(config.input)
        .map(InputSource::from_arg)
        .ok_or(CliError::MissingInput {
            config: config_path,
        })?;
    Ok(Settings {
        input,
        output: args.output.clone().or(config.output),
        options,
    })
}

/// Every message in the error chain, joined with `: `.
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Generate(args) => {
            let settings = resolve_settings(&args)?;
            if args.watch {
                watch::watch(settings)
            } else {
                run_once(&settings).map(|_| ())
            }
        }
        Command::Backends => {
            for name in apigen::backend_names() {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {}", error_chain(&e));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    fn generate_args(args: &[&str]) -> GenerateArgs {
        let cli = Cli::try_parse_from(std::iter::once("apigen").chain(args.iter().copied())).unwrap();
        match cli.command {
            Command::Generate(args) => args,
            Command::Backends => panic!("expected generate"),
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("apigen.toml");
        std::fs::write(
            &config,
            "input = \"openapi.yaml\"\noutput = \"api.ts\"\n[generator]\nbackend = \"effect\"\n",
        )
        .unwrap();
        let config = config.to_str().unwrap();

        let settings = resolve_settings(&generate_args(&["generate", "-c", config])).unwrap();
        assert_eq!(settings.input, InputSource::File(dir.path().join("openapi.yaml")));
        assert_eq!(settings.output, Some(dir.path().join("api.ts")));
        assert_eq!(settings.options.backend, BackendKind::Effect);

        let settings = resolve_settings(&generate_args(&[
            "generate", "-c", config, "--input", "-", "--backend", "zod-mini",
        ]))
        .unwrap();
        assert_eq!(settings.input, InputSource::Stdin);
        assert_eq!(settings.options.backend, BackendKind::ZodMini);
    }

    #[test]
    fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("empty.toml");
        std::fs::write(&config, "").unwrap();
        let err = resolve_settings(&generate_args(&["generate", "-c", config.to_str().unwrap()]))
            .err()
            .unwrap();
        assert!(matches!(err, CliError::MissingInput { .. }));
    }

    #[test]
    fn test_error_chain() {
        let err = CliError::Generate(apigen::Error::upgrade(
            "invalid JSON document",
            std::io::Error::other("unexpected end"),
        ));
        assert_eq!(
            error_chain(&err),
            "failed to upgrade document: invalid JSON document: unexpected end"
        );
    }
}
