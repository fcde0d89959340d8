//! Configuration type definitions.

use crate::constants::tools;
use crate::pipeline::ToolPaths;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// External tool executables.
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Executables for the external codec tools.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ToolsConfig {
    /// Native lossless decoder.
    pub native_decoder: PathBuf,

    /// Resampler.
    pub resampler: PathBuf,

    /// MP3 encoder.
    pub encoder: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            native_decoder: PathBuf::from(tools::NATIVE_DECODER),
            resampler: PathBuf::from(tools::RESAMPLER),
            encoder: PathBuf::from(tools::ENCODER),
        }
    }
}

impl From<&ToolsConfig> for ToolPaths {
    fn from(config: &ToolsConfig) -> Self {
        Self {
            native_decoder: config.native_decoder.clone(),
            resampler: config.resampler.clone(),
            encoder: config.encoder.clone(),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Echo the invocation and resolved command lines to stderr.
    pub echo_commands: bool,

    /// Write through a staging file and rename on success.
    pub atomic: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            echo_commands: true,
            atomic: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tools() {
        let tools = ToolsConfig::default();
        assert_eq!(tools.native_decoder, PathBuf::from("flac"));
        assert_eq!(tools.resampler, PathBuf::from("sox"));
        assert_eq!(tools.encoder, PathBuf::from("lame"));
    }

    #[test]
    fn test_default_output() {
        let output = OutputConfig::default();
        assert!(output.echo_commands);
        assert!(output.atomic);
    }

    #[test]
    fn test_tool_paths_from_config() {
        let config = ToolsConfig {
            encoder: PathBuf::from("/usr/local/bin/lame"),
            ..ToolsConfig::default()
        };
        let paths = ToolPaths::from(&config);
        assert_eq!(paths.encoder, PathBuf::from("/usr/local/bin/lame"));
        assert_eq!(paths.native_decoder, PathBuf::from("flac"));
    }
}
