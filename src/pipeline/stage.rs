//! Pipeline stages and their composition.

use crate::constants::tools;
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// External tool a stage runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Lossless decoder streaming raw audio to stdout.
    NativeDecoder,
    /// Decoder that resamples, dithers and optionally writes FLAC.
    Resampler,
    /// MP3 encoder.
    Encoder,
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NativeDecoder => write!(f, "native decoder"),
            Self::Resampler => write!(f, "resampler"),
            Self::Encoder => write!(f, "encoder"),
        }
    }
}

/// Position of a stage in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Writes its output into the stream feeding the next stage.
    Source,
    /// Final stage; its stdout is inherited.
    Sink,
}

/// Executables used for each tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    /// Native decoder executable.
    pub native_decoder: PathBuf,
    /// Resampler executable.
    pub resampler: PathBuf,
    /// Encoder executable.
    pub encoder: PathBuf,
}

impl ToolPaths {
    /// Executable configured for a tool.
    pub fn program(&self, tool: Tool) -> &PathBuf {
        match tool {
            Tool::NativeDecoder => &self.native_decoder,
            Tool::Resampler => &self.resampler,
            Tool::Encoder => &self.encoder,
        }
    }
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            native_decoder: PathBuf::from(tools::NATIVE_DECODER),
            resampler: PathBuf::from(tools::RESAMPLER),
            encoder: PathBuf::from(tools::ENCODER),
        }
    }
}

/// One external process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    /// Tool this stage runs.
    pub tool: Tool,
    /// Where the stage sits in the pipeline.
    pub role: Role,
    /// Executable path or name.
    pub program: PathBuf,
    /// Arguments, in order.
    pub args: Vec<OsString>,
}

impl Stage {
    /// Create a stage with no arguments.
    pub fn new(tool: Tool, role: Role, program: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            role,
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Build the process command for this stage (stdio not configured).
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Program name for messages.
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&quote_arg(self.program.as_os_str()))?;
        for arg in &self.args {
            write!(f, " {}", quote_arg(arg))?;
        }
        Ok(())
    }
}

/// Stages connected stdout-to-stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// A pipeline with one stage writing the output itself.
    pub fn single(stage: Stage) -> Self {
        Self {
            stages: vec![Stage {
                role: Role::Sink,
                ..stage
            }],
        }
    }

    /// A decode stage piped into an encode stage.
    pub fn piped(source: Stage, sink: Stage) -> Self {
        Self {
            stages: vec![
                Stage {
                    role: Role::Source,
                    ..source
                },
                Stage {
                    role: Role::Sink,
                    ..sink
                },
            ],
        }
    }

    /// Stages in execution order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the pipeline has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{stage}")?;
        }
        Ok(())
    }
}

/// Quote an argument for display the way a POSIX shell would accept it.
pub fn quote_arg(arg: &OsStr) -> Cow<'_, str> {
    let text = arg.to_string_lossy();
    let plain = !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=,+@%".contains(c));
    if plain {
        text
    } else {
        Cow::Owned(format!("'{}'", text.replace('\'', r"'\''")))
    }
}

/// Join a program and its arguments into a displayable command line.
pub fn command_line<S: AsRef<OsStr>>(program: &str, args: &[S]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&quote_arg(arg.as_ref()));
    }
    line
}

/// Path argument for tools without a `--` terminator.
///
/// Relative paths starting with `-` get a `./` prefix so they are not read as
/// options. A lone `-` still names the standard stream.
pub fn path_arg(path: &Path) -> Cow<'_, Path> {
    let bytes = path.as_os_str().as_encoded_bytes();
    if bytes.len() > 1 && bytes[0] == b'-' {
        Cow::Owned(Path::new(".").join(path))
    } else {
        Cow::Borrowed(path)
    }
}
