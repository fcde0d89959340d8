//! Transcode pipelines: stage model, strategy selection and execution.

mod executor;
mod selector;
mod stage;

pub use executor::{Executor, PipelineStatus, exit_code_of};
pub use selector::{EncoderPreset, plan};
pub use stage::{Pipeline, Role, Stage, Tool, ToolPaths, command_line, path_arg, quote_arg};
