//! Transcode - audio transcoding dispatcher.
//!
//! Selects a decode/encode pipeline for one of three targets (`FLAC_16`,
//! `MP3_320`, `MP3_V0`), runs it through external codec tools and reports
//! the pipeline's status with pipefail semantics.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod interrupt;
pub mod pipeline;
pub mod request;
pub mod spectrogram;
pub mod staging;

use clap::Parser;
use cli::Cli;
use config::{Config, load_config_file, load_default_config, validate_config};
use dispatch::{DispatchOptions, Dispatcher};
use request::TranscodeRequest;
use tracing::{debug, warn};

pub use error::{Error, Result};

/// Main entry point for the transcode CLI.
pub fn run() -> Result<()> {
    let cli = parse_cli()?;

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    // Stop running pipelines on Ctrl+C / SIGTERM
    if let Err(e) = interrupt::install_handler() {
        warn!("Failed to install signal handler: {e}");
    }

    // Argument errors are reported ahead of configuration errors
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            TranscodeRequest::from_args(&cli.args)?;
            return Err(e);
        }
    };

    let options = DispatchOptions::resolve(&cli, &config);
    debug!("Options: {options:?}");

    let result = Dispatcher::new(options, interrupt::flag()).dispatch(&cli.args);
    settle(result, interrupt::is_interrupted())
}

/// Parse the command line; `--help` and `--version` print and exit 0.
fn parse_cli() -> Result<Cli> {
    match Cli::try_parse() {
        Ok(cli) => Ok(cli),
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => Err(command_line_error(&e)),
    }
}

fn command_line_error(e: &clap::Error) -> Error {
    let rendered = e.to_string();
    let message = rendered.trim_end();
    Error::CommandLine {
        message: message.strip_prefix("error: ").unwrap_or(message).to_string(),
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => load_config_file(path)?,
        None => load_default_config()?,
    };
    validate_config(&config)?;
    Ok(config)
}

/// A signal only changes the outcome of a run that did not complete.
fn settle(result: Result<()>, interrupted: bool) -> Result<()> {
    match result {
        Err(_) if interrupted => Err(Error::Interrupted),
        other => other,
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    // stdout is reserved for --dry-run output
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settle_keeps_completed_run_after_signal() {
        assert!(settle(Ok(()), true).is_ok());
    }

    #[test]
    fn test_settle_reports_interrupt_for_failed_run() {
        let result = settle(Err(Error::PipelineFailed { code: 130 }), true);
        assert!(matches!(result, Err(Error::Interrupted)));
    }

    #[test]
    fn test_settle_passes_through_without_signal() {
        let result = settle(Err(Error::PipelineFailed { code: 2 }), false);
        assert!(matches!(result, Err(Error::PipelineFailed { code: 2 })));
    }

    #[test]
    fn test_command_line_error_strips_prefix() {
        let err = Cli::try_parse_from(["transcode", "--config"]).err();
        let err = err.map(|e| command_line_error(&e));
        assert!(matches!(
            err,
            Some(Error::CommandLine { ref message })
                if message.starts_with("a value is required") && !message.ends_with('\n')
        ));
        assert_eq!(err.map(|e| e.exit_code()), Some(1));
    }
}
