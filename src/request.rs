//! Transcode request parsing and validation.
//!
//! All preconditions are checked here, before any process is started.

use crate::constants::{MAX_ARGS, MIN_ARGS};
use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetFormat {
    /// 16-bit FLAC produced by resampling.
    Flac16,
    /// Constant bitrate 320 kbps MP3.
    Mp3_320,
    /// VBR quality 0 MP3.
    Mp3V0,
}

impl TargetFormat {
    /// All supported formats.
    pub const ALL: [Self; 3] = [Self::Flac16, Self::Mp3_320, Self::Mp3V0];

    /// Token used on the command line.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Flac16 => "FLAC_16",
            Self::Mp3_320 => "MP3_320",
            Self::Mp3V0 => "MP3_V0",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for TargetFormat {
    type Err = Error;

    /// Exact, case-sensitive match on the format token.
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.token() == s)
            .ok_or_else(|| Error::UnsupportedFormat {
                value: s.to_string(),
            })
    }
}

/// Target sample rate in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResampleRate(u32);

impl ResampleRate {
    /// Rate in Hz.
    pub const fn hz(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ResampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hz())
    }
}

impl FromStr for ResampleRate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.parse::<u32>() {
            Ok(hz) if hz > 0 => Ok(Self(hz)),
            _ => Err(Error::InvalidResampleRate {
                value: s.to_string(),
            }),
        }
    }
}

/// A validated transcode invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeRequest {
    /// Input audio file.
    pub source: PathBuf,
    /// Output file.
    pub dest: PathBuf,
    /// Output format.
    pub target_format: TargetFormat,
    /// Resample rate; its presence selects the resampling decode path.
    pub resample_rate: Option<ResampleRate>,
}

impl TranscodeRequest {
    /// Build a request from positional arguments.
    ///
    /// Checks, in order: argument count, the format token, a rate for
    /// `FLAC_16`, and the rate value itself.
    pub fn from_args<S: AsRef<OsStr>>(args: &[S]) -> Result<Self> {
        if !(MIN_ARGS..=MAX_ARGS).contains(&args.len()) {
            return Err(Error::Arity { count: args.len() });
        }

        let token = args[2].as_ref().to_string_lossy();
        let target_format: TargetFormat = token.parse()?;

        let rate_arg = args.get(3).map(|rate| rate.as_ref());
        if target_format == TargetFormat::Flac16 && rate_arg.is_none() {
            return Err(Error::MissingResample);
        }

        let resample_rate = rate_arg
            .map(|rate| rate.to_string_lossy().parse::<ResampleRate>())
            .transpose()?;

        Ok(Self {
            source: PathBuf::from(args[0].as_ref()),
            dest: PathBuf::from(args[1].as_ref()),
            target_format,
            resample_rate,
        })
    }
}
