//! FFmpeg CLI wrapper for the Newsreel pipeline.
//!
//! This crate provides:
//! - A command builder and runner for multi-input filter-graph encodes,
//!   with timeout and cancellation
//! - Audio duration probing via ffprobe
//! - zoompan motion filter construction and the RenderPlan → ffmpeg
//!   argument translation
//! - The render executor: an isolated task that delivers exactly one
//!   terminal success/failure message per encode

pub mod command;
pub mod compose;
pub mod error;
pub mod executor;
pub mod filters;
pub mod probe;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use compose::build_render_command;
pub use error::{MediaError, MediaResult};
pub use executor::{RenderExecutor, RenderHandle};
pub use probe::{probe_duration, DurationProbe, FfprobeDuration};
