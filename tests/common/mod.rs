//! Shared helpers: fake codec tools recording their arguments.

#![allow(dead_code)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FAKE_FLAC: &str = r#"#!/bin/sh
printf '%s\n' "$@" > "$FAKE_LOG_DIR/flac.args"
printf 'RIFFpcm'
exit "${FAKE_FLAC_EXIT:-0}"
"#;

const FAKE_LAME: &str = r#"#!/bin/sh
printf '%s\n' "$@" > "$FAKE_LOG_DIR/lame.args"
for last; do :; done
cat > "$last"
exit "${FAKE_LAME_EXIT:-0}"
"#;

const FAKE_SOX: &str = r#"#!/bin/sh
printf '%s\n' "$@" > "$FAKE_LOG_DIR/sox.args"
case "$2" in
  -n) printf 'PNG' > "${11}" ;;
  *) if [ "$5" = "-t" ]; then printf 'RIFFresampled'; else printf 'fLaC' > "$5"; fi ;;
esac
exit "${FAKE_SOX_EXIT:-0}"
"#;

/// Scratch directory with fake `flac`, `lame` and `sox` scripts.
pub struct FakeTools {
    dir: TempDir,
}

impl FakeTools {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        for (name, script) in [("flac", FAKE_FLAC), ("lame", FAKE_LAME), ("sox", FAKE_SOX)] {
            let path = dir.path().join(name);
            fs::write(&path, script).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        Self { dir }
    }

    /// Directory holding the scripts; also a scratch area for tests.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Binary under test, wired to the fake tools and an empty config.
    pub fn command(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("transcode");
        cmd.env_remove("TRANSCODE_SPECTROGRAMS")
            .env_remove("RUST_LOG")
            .env("TRANSCODE_CONFIG", self.join("missing-config.toml"))
            .env("TRANSCODE_FLAC", self.join("flac"))
            .env("TRANSCODE_LAME", self.join("lame"))
            .env("TRANSCODE_SOX", self.join("sox"))
            .env("FAKE_LOG_DIR", self.path());
        cmd
    }

    /// Arguments the named tool was last invoked with, if it ran.
    pub fn args_of(&self, tool: &str) -> Option<Vec<String>> {
        fs::read_to_string(self.join(&format!("{tool}.args")))
            .ok()
            .map(|s| s.lines().map(str::to_string).collect())
    }
}
