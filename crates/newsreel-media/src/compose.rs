//! RenderPlan → FFmpeg command translation.
//!
//! Input layout matches the filter graph's expectations: all audio files
//! first (inputs `0..n`), then all image files (inputs `n..2n`). Each
//! image stream gets its zoompan transform, then transformed visuals and
//! their paired audio streams are concatenated in segment order into one
//! timeline.

use std::path::Path;

use newsreel_models::RenderPlan;

use crate::command::FfmpegCommand;
use crate::error::{MediaError, MediaResult};
use crate::filters::zoompan_filter;

/// Build the full filter graph for a plan.
pub fn build_filter_graph(plan: &RenderPlan) -> MediaResult<String> {
    if plan.is_empty() {
        return Err(MediaError::EmptyPlan);
    }

    let n = plan.len();
    let mut parts = Vec::with_capacity(n);
    let mut concat_inputs = String::new();

    for (i, entry) in plan.entries.iter().enumerate() {
        let zoompan = zoompan_filter(
            entry.effect,
            entry.frames,
            &plan.motion,
            plan.output.width,
            plan.output.height,
            plan.output.fps,
        );
        parts.push(format!("[{}:v]{}[v{}]", n + i, zoompan, i));
        concat_inputs.push_str(&format!("[v{}][{}:a]", i, i));
    }

    Ok(format!(
        "{};{}concat=n={}:v=1:a=1[outv][outa]",
        parts.join(";"),
        concat_inputs,
        n
    ))
}

/// Translate a plan into a runnable FFmpeg command.
pub fn build_render_command(plan: &RenderPlan, output: impl AsRef<Path>) -> MediaResult<FfmpegCommand> {
    let filter = build_filter_graph(plan)?;

    let mut cmd = FfmpegCommand::new(output);
    for entry in &plan.entries {
        cmd = cmd.input(&entry.audio);
    }
    for entry in &plan.entries {
        cmd = cmd.input(&entry.image);
    }

    Ok(cmd
        .filter_complex(filter)
        .map("[outv]")
        .map("[outa]")
        .size(plan.output.width, plan.output.height)
        .video_codec(&plan.output.video_codec)
        .preset(&plan.output.preset)
        .crf(plan.output.crf)
        .audio_codec(&plan.output.audio_codec)
        .audio_bitrate(&plan.output.audio_bitrate))
}
