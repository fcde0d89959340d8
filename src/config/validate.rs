//! Configuration validation.

use crate::config::Config;
use crate::error::{Error, Result};
use std::path::Path;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    let tools = &config.tools;
    validate_program("tools.native_decoder", &tools.native_decoder)?;
    validate_program("tools.resampler", &tools.resampler)?;
    validate_program("tools.encoder", &tools.encoder)?;
    Ok(())
}

fn validate_program(key: &str, program: &Path) -> Result<()> {
    if program.as_os_str().is_empty() {
        return Err(Error::ConfigValidation {
            message: format!("{key} must not be empty"),
        });
    }
    Ok(())
}
