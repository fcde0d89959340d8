//! Strategy selection: which tools run, with which arguments.
//!
//! | Target    | Rate    | Pipeline                           |
//! |-----------|---------|------------------------------------|
//! | `FLAC_16` | given   | resampler writes `dest`            |
//! | MP3       | absent  | native decoder \| encoder          |
//! | MP3       | given   | resampler (wav stream) \| encoder  |
//!
//! The decode path is chosen purely from whether a rate was supplied; the
//! source file is never inspected.

use super::stage::{Pipeline, Role, Stage, Tool, ToolPaths, path_arg};
use crate::constants::{encoder, native_decoder, resampler};
use crate::error::{Error, Result};
use crate::request::{ResampleRate, TargetFormat, TranscodeRequest};
use std::path::Path;

/// MP3 encoder bitrate mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderPreset {
    /// Constant 320 kbps.
    Cbr320,
    /// Variable bitrate, quality 0.
    VbrV0,
}

impl EncoderPreset {
    /// Preset for a target format; `None` when no encoder stage is used.
    pub const fn for_format(format: TargetFormat) -> Option<Self> {
        match format {
            TargetFormat::Flac16 => None,
            TargetFormat::Mp3_320 => Some(Self::Cbr320),
            TargetFormat::Mp3V0 => Some(Self::VbrV0),
        }
    }

    /// Bitrate-mode arguments for the encoder.
    pub const fn args(self) -> &'static [&'static str] {
        match self {
            Self::Cbr320 => encoder::CBR_320_ARGS,
            Self::VbrV0 => encoder::VBR_V0_ARGS,
        }
    }
}

/// Build the pipeline for a request.
///
/// `output` is where the final stage writes; it is the request's destination
/// or a staging path standing in for it.
pub fn plan(request: &TranscodeRequest, tools: &ToolPaths, output: &Path) -> Result<Pipeline> {
    let Some(preset) = EncoderPreset::for_format(request.target_format) else {
        let rate = request.resample_rate.ok_or(Error::MissingResample)?;
        return Ok(Pipeline::single(resample_to_file(
            tools,
            &request.source,
            output,
            rate,
        )));
    };

    let decode = match request.resample_rate {
        None => native_decode(tools, &request.source),
        Some(rate) => resample_to_stream(tools, &request.source, rate),
    };

    Ok(Pipeline::piped(decode, encode(tools, preset, output)))
}

/// Native decoder writing decoded audio to stdout.
fn native_decode(tools: &ToolPaths, source: &Path) -> Stage {
    Stage::new(
        Tool::NativeDecoder,
        Role::Source,
        tools.program(Tool::NativeDecoder),
    )
    .args(native_decoder::ARGS.iter().copied())
    .arg(source)
}

/// Resampler writing a 16-bit FLAC file directly.
fn resample_to_file(tools: &ToolPaths, source: &Path, output: &Path, rate: ResampleRate) -> Stage {
    Stage::new(Tool::Resampler, Role::Sink, tools.program(Tool::Resampler))
        .arg(&*path_arg(source))
        .args(resampler::OUTPUT_ARGS.iter().copied())
        .arg(&*path_arg(output))
        .args(rate_effects(rate))
}

/// Resampler writing a 16-bit wav stream to stdout.
fn resample_to_stream(tools: &ToolPaths, source: &Path, rate: ResampleRate) -> Stage {
    Stage::new(Tool::Resampler, Role::Source, tools.program(Tool::Resampler))
        .arg(&*path_arg(source))
        .args(resampler::OUTPUT_ARGS.iter().copied())
        .args(resampler::STREAM_OUTPUT.iter().copied())
        .args(rate_effects(rate))
}

fn rate_effects(rate: ResampleRate) -> Vec<String> {
    resampler::RATE_EFFECT
        .iter()
        .map(ToString::to_string)
        .chain([rate.to_string(), resampler::DITHER_EFFECT.to_string()])
        .collect()
}

/// Encoder reading stdin and writing `output`.
fn encode(tools: &ToolPaths, preset: EncoderPreset, output: &Path) -> Stage {
    Stage::new(Tool::Encoder, Role::Sink, tools.program(Tool::Encoder))
        .args(encoder::COMMON_ARGS.iter().copied())
        .args(preset.args().iter().copied())
        .arg(encoder::STDIN)
        .arg(&*path_arg(output))
}
