//! CLI argument definitions.

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Transcode audio to 16-bit FLAC or MP3 through external codec tools.
///
/// Positional arguments: <source> <dest> <target_format> [resample_rate].
/// `target_format` is one of FLAC_16, MP3_320 or MP3_V0. FLAC_16 requires a
/// resample rate; for MP3 targets a rate switches decoding from the native
/// FLAC decoder to the resampler.
#[derive(Debug, Parser)]
#[command(name = "transcode")]
#[command(author, version, about, long_about)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// <source> <dest> <target_format> [resample_rate]
    ///
    /// Options must come first; everything from the first positional on is
    /// taken verbatim, so sources and rates may start with `-`.
    #[arg(
        value_name = "ARGS",
        value_parser = clap::value_parser!(OsString),
        allow_hyphen_values = true,
        trailing_var_arg = true
    )]
    pub args: Vec<OsString>,

    /// Path to the configuration file.
    #[arg(long, env = "TRANSCODE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Native FLAC decoder executable (overrides config).
    #[arg(long, value_name = "PATH", env = "TRANSCODE_FLAC")]
    pub flac: Option<PathBuf>,

    /// Resampler executable (overrides config).
    #[arg(long, value_name = "PATH", env = "TRANSCODE_SOX")]
    pub sox: Option<PathBuf>,

    /// MP3 encoder executable (overrides config).
    #[arg(long, value_name = "PATH", env = "TRANSCODE_LAME")]
    pub lame: Option<PathBuf>,

    /// Print the pipeline without running it.
    #[arg(long)]
    pub dry_run: bool,

    /// Render full and zoomed spectrograms of the source into this directory.
    #[arg(long, value_name = "DIR", env = "TRANSCODE_SPECTROGRAMS")]
    pub spectrograms: Option<PathBuf>,

    /// Write the destination directly instead of through a staging file.
    #[arg(long)]
    pub no_atomic: bool,

    /// Suppress command echo and informational logging.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
