//! Staged destination files.
//!
//! Tools write to a hidden sibling of the destination which is renamed onto
//! the destination only after the whole pipeline succeeded. The staging name
//! is derived from the destination alone, so repeated runs produce identical
//! command lines.

use crate::constants::STAGING_MARKER;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Staging path for a destination: `.<stem>.partial.<ext>` in the same directory.
///
/// The extension is kept last because some tools pick the container from it.
/// Returns `None` when the destination has no file name.
pub fn staging_path_for(dest: &Path) -> Option<PathBuf> {
    let stem = dest.file_stem()?.to_string_lossy();
    let name = match dest.extension() {
        Some(ext) => format!(".{stem}.{STAGING_MARKER}.{}", ext.to_string_lossy()),
        None => format!(".{stem}.{STAGING_MARKER}"),
    };
    Some(dest.with_file_name(name))
}

/// RAII guard for a destination being written.
///
/// Dropping an uncommitted guard removes the staging file.
#[derive(Debug)]
pub struct StagedOutput {
    dest: PathBuf,
    staging: Option<PathBuf>,
}

impl StagedOutput {
    /// Prepare output for `dest`.
    ///
    /// Staging is skipped when `atomic` is off, when no staging name can be
    /// derived, or when `dest` exists and is not a regular file. Devices and
    /// fifos must be written in place, and a symlink is written through so
    /// the link itself survives.
    pub fn new(dest: &Path, atomic: bool) -> Self {
        let in_place = !atomic
            || fs::symlink_metadata(dest).is_ok_and(|meta| !meta.is_file());
        let staging = if in_place {
            None
        } else {
            staging_path_for(dest)
        };

        Self {
            dest: dest.to_path_buf(),
            staging,
        }
    }

    /// Path the pipeline should write to.
    pub fn write_path(&self) -> &Path {
        self.staging.as_deref().unwrap_or(&self.dest)
    }

    /// Whether output goes through a staging file.
    pub fn is_staged(&self) -> bool {
        self.staging.is_some()
    }

    /// Move the staged file onto the destination.
    pub fn commit(mut self) -> Result<()> {
        if let Some(staging) = self.staging.take() {
            debug!("Renaming {} -> {}", staging.display(), self.dest.display());
            if let Err(source) = fs::rename(&staging, &self.dest) {
                let _ = fs::remove_file(&staging);
                return Err(Error::OutputCommit {
                    path: self.dest.clone(),
                    source,
                });
            }
        }
        Ok(())
    }
}

impl Drop for StagedOutput {
    fn drop(&mut self) {
        if let Some(staging) = self.staging.take()
            && fs::remove_file(&staging).is_ok()
        {
            debug!("Removed incomplete output {}", staging.display());
        }
    }
}
