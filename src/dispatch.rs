//! Request dispatch: validate, plan, echo, execute, commit.

use crate::cli::Cli;
use crate::config::Config;
use crate::constants::APP_NAME;
use crate::error::{Error, Result};
use crate::pipeline::{Executor, Pipeline, ToolPaths, command_line, plan};
use crate::request::TranscodeRequest;
use crate::spectrogram::{self, SpectrogramJob};
use crate::staging::StagedOutput;
use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::time::Instant;
use tracing::{debug, info};

/// Settings for a dispatch, resolved from config and CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Executables for each tool.
    pub tools: ToolPaths,
    /// Echo the invocation and command lines to stderr.
    pub echo_commands: bool,
    /// Write through a staging file.
    pub atomic_output: bool,
    /// Print the plan instead of running it.
    pub dry_run: bool,
    /// Where to render spectrograms of the source, if anywhere.
    pub spectrogram_dir: Option<PathBuf>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl DispatchOptions {
    /// Options from configuration alone.
    pub fn from_config(config: &Config) -> Self {
        Self {
            tools: ToolPaths::from(&config.tools),
            echo_commands: config.output.echo_commands,
            atomic_output: config.output.atomic,
            dry_run: false,
            spectrogram_dir: None,
        }
    }

    /// Options from configuration with command-line overrides applied.
    pub fn resolve(cli: &Cli, config: &Config) -> Self {
        let mut options = Self::from_config(config);

        if let Some(flac) = &cli.flac {
            options.tools.native_decoder.clone_from(flac);
        }
        if let Some(sox) = &cli.sox {
            options.tools.resampler.clone_from(sox);
        }
        if let Some(lame) = &cli.lame {
            options.tools.encoder.clone_from(lame);
        }

        options.echo_commands &= !cli.quiet;
        options.atomic_output &= !cli.no_atomic;
        options.dry_run = cli.dry_run;
        options.spectrogram_dir.clone_from(&cli.spectrograms);
        options
    }
}

/// Runs one transcode request end to end.
pub struct Dispatcher<'a> {
    options: DispatchOptions,
    cancel: &'a AtomicBool,
}

impl<'a> Dispatcher<'a> {
    /// Create a dispatcher; `cancel` aborts running pipelines when raised.
    pub fn new(options: DispatchOptions, cancel: &'a AtomicBool) -> Self {
        Self { options, cancel }
    }

    /// Transcode according to positional arguments.
    ///
    /// Every precondition is checked before a process is started. A failing
    /// pipeline yields [`Error::PipelineFailed`] carrying its pipefail status.
    pub fn dispatch<S: AsRef<OsStr>>(&self, args: &[S]) -> Result<()> {
        if self.options.echo_commands {
            eprintln!("+ {}", command_line(APP_NAME, args));
        }

        let request = TranscodeRequest::from_args(args)?;
        debug!(
            "Request: {} -> {} as {} (resample: {})",
            request.source.display(),
            request.dest.display(),
            request.target_format,
            request
                .resample_rate
                .map_or_else(|| "none".to_string(), |rate| rate.to_string())
        );

        let output = StagedOutput::new(
            &request.dest,
            self.options.atomic_output && !self.options.dry_run,
        );
        debug!(
            "Writing {} (staged: {})",
            output.write_path().display(),
            output.is_staged()
        );
        let pipeline = plan(&request, &self.options.tools, output.write_path())?;
        let spectrograms = self.options.spectrogram_dir.as_deref().map(|dir| {
            spectrogram::plan(&self.options.tools.resampler, &request.source, dir)
        });

        if self.options.dry_run {
            println!("{pipeline}");
            for job in spectrograms.iter().flatten() {
                println!("{}", job.pipeline);
            }
            return Ok(());
        }

        let started = Instant::now();
        self.execute(&pipeline)?;
        output.commit()?;
        info!(
            "Transcoded {} to {} as {} in {:.2}s",
            request.source.display(),
            request.dest.display(),
            request.target_format,
            started.elapsed().as_secs_f64()
        );

        if let Some(jobs) = spectrograms {
            self.render_spectrograms(&jobs)?;
        }

        Ok(())
    }

    fn execute(&self, pipeline: &Pipeline) -> Result<()> {
        if self.options.echo_commands {
            eprintln!("+ {pipeline}");
        }

        let status = Executor::new(self.cancel).run(pipeline)?;
        if status.success() {
            Ok(())
        } else {
            debug!("Stage exit codes: {:?}", status.codes());
            Err(Error::PipelineFailed {
                code: status.code(),
            })
        }
    }

    fn render_spectrograms(&self, jobs: &[SpectrogramJob]) -> Result<()> {
        for job in jobs {
            if let Some(dir) = job.image.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir).map_err(|e| Error::CreateDir {
                    path: dir.to_path_buf(),
                    source: e,
                })?;
            }
            self.execute(&job.pipeline)?;
            info!("Spectrogram written: {}", job.image.display());
        }
        Ok(())
    }
}
