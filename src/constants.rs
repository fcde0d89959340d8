//! Application-wide constants.
//!
//! Tool names, argument grammar for the external codecs and exit codes live
//! here so the selector and its tests agree on a single source of truth.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "transcode";

/// Usage line shown with argument errors.
pub const USAGE: &str = "transcode <source> <dest> <target_format> [resample_rate]";

/// Minimum number of positional arguments.
pub const MIN_ARGS: usize = 3;

/// Maximum number of positional arguments.
pub const MAX_ARGS: usize = 4;

/// Default executables for each external tool.
pub mod tools {
    /// Native lossless decoder.
    pub const NATIVE_DECODER: &str = "flac";
    /// Decoder/resampler that can also write FLAC directly.
    pub const RESAMPLER: &str = "sox";
    /// MP3 encoder.
    pub const ENCODER: &str = "lame";
}

/// Argument grammar for the native decoder.
pub mod native_decoder {
    /// Decode to stdout, silently, end of options.
    pub const ARGS: &[&str] = &["-dcs", "--"];
}

/// Argument grammar for the resampler.
pub mod resampler {
    /// Guard against clipping and reduce to 16 bits.
    pub const OUTPUT_ARGS: &[&str] = &["-G", "-b", "16"];
    /// Uncompressed intermediate stream written to stdout.
    pub const STREAM_OUTPUT: &[&str] = &["-t", "wav", "-"];
    /// Very high quality, linear phase.
    pub const RATE_EFFECT: &[&str] = &["rate", "-v", "-L"];
    /// Dither effect applied after rate conversion.
    pub const DITHER_EFFECT: &str = "dither";
}

/// Argument grammar for the MP3 encoder.
pub mod encoder {
    /// Silent, strict ISO compliance, tolerate broken tags.
    pub const COMMON_ARGS: &[&str] = &["-S", "--strictly-enforce-ISO", "--ignore-tag-errors"];
    /// Constant 320 kbps.
    pub const CBR_320_ARGS: &[&str] = &["--cbr", "-b", "320"];
    /// VBR quality 0 on the new VBR engine.
    pub const VBR_V0_ARGS: &[&str] = &["--vbr-new", "-V", "0"];
    /// Read audio from stdin.
    pub const STDIN: &str = "-";
}

/// Spectrogram rendering parameters.
pub mod spectrogram {
    /// Leading arguments after the source: no audio output, first channel only.
    pub const PREFIX_ARGS: &[&str] = &["-n", "remix", "1", "spectrogram", "-w", "Kaiser"];
    /// Full-length overview.
    pub const FULL_ARGS: &[&str] = &["-x", "3000", "-y", "513", "-z", "120"];
    /// Two second window starting at one minute.
    pub const ZOOM_ARGS: &[&str] = &[
        "-x", "500", "-y", "1025", "-z", "120", "-S", "1:00", "-d", "0:02",
    ];
    /// File name suffix for the overview image.
    pub const FULL_SUFFIX: &str = "_full.png";
    /// File name suffix for the zoomed image.
    pub const ZOOM_SUFFIX: &str = "_zoom.png";
}

/// Marker inserted into staging file names.
pub const STAGING_MARKER: &str = "partial";

/// How often the executor checks for stage exit and interruption.
pub const POLL_INTERVAL_MS: u64 = 20;

/// Process exit codes.
pub mod exit_code {
    /// Validation and configuration errors.
    pub const USAGE: i32 = 1;
    /// Executable could not be started.
    pub const SPAWN_FAILED: i32 = 127;
    /// Base added to a signal number when a process dies from a signal.
    pub const SIGNAL_BASE: i32 = 128;
    /// Interrupted by SIGINT/SIGTERM.
    pub const INTERRUPTED: i32 = 130;
}
