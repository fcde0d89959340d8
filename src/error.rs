//! Error types for transcode.

use crate::constants::{USAGE, exit_code};
use crate::pipeline::Tool;

/// Result type alias for transcode operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for transcode.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Command line options could not be parsed.
    #[error("{message}")]
    CommandLine {
        /// Parser diagnostic, without the leading `error: `.
        message: String,
    },

    /// Too few or too many positional arguments.
    #[error("wrong arguments: got {count}, usage: {}", USAGE)]
    Arity {
        /// Number of positional arguments supplied.
        count: usize,
    },

    /// FLAC_16 target requested without a resample rate.
    #[error("missing resample: FLAC_16 requires a resample rate")]
    MissingResample,

    /// Target format token is not one of the supported formats.
    #[error("invalid target format: '{value}' (expected FLAC_16, MP3_320 or MP3_V0)")]
    UnsupportedFormat {
        /// The rejected token.
        value: String,
    },

    /// Resample rate is not a positive integer.
    #[error("invalid resample rate: '{value}' (expected a positive integer in Hz)")]
    InvalidResampleRate {
        /// The rejected value.
        value: String,
    },

    /// External tool could not be started.
    #[error("failed to start {tool} '{program}': {source}")]
    ToolSpawn {
        /// Role of the tool in the pipeline.
        tool: Tool,
        /// Program that was executed.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Pipeline finished with a non-zero status.
    #[error("pipeline failed with exit status {code}")]
    PipelineFailed {
        /// Pipefail status of the pipeline.
        code: i32,
    },

    /// Run was interrupted by a signal.
    #[error("interrupted")]
    Interrupted,

    /// Staged output could not be moved into place.
    #[error("failed to move output into place at '{path}'")]
    OutputCommit {
        /// Final destination path.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a directory for generated artifacts.
    #[error("failed to create directory '{path}'")]
    CreateDir {
        /// Directory path.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },
}

impl Error {
    /// Process exit code for this error.
    ///
    /// Pipeline failures surface the pipeline's own status unchanged.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::PipelineFailed { code } => *code,
            Self::ToolSpawn { .. } => exit_code::SPAWN_FAILED,
            Self::Interrupted => exit_code::INTERRUPTED,
            _ => exit_code::USAGE,
        }
    }
}
