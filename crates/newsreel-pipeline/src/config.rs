//! Pipeline configuration.

use std::path::PathBuf;

use newsreel_models::{EffectWeights, MotionSettings, OutputSettings};

/// Configuration for one pipeline instance. Built once and passed into
/// each component at construction; components never read the environment
/// themselves.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root directory that per-article project directories live under
    pub videos_root: PathBuf,
    /// Minimum trimmed character count for a segment to survive
    pub min_segment_chars: usize,
    /// Bound on concurrently resolving segments
    pub max_parallel_segments: usize,
    /// Encode timeout in seconds
    pub render_timeout_secs: u64,
    /// Seed for the motion effect draws; `None` seeds from the OS
    pub effect_seed: Option<u64>,
    /// Encode parameters
    pub output: OutputSettings,
    /// Pan/zoom parameters
    pub motion: MotionSettings,
    /// Motion effect draw weights
    pub effect_weights: EffectWeights,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            videos_root: PathBuf::from("videos"),
            min_segment_chars: 5,
            max_parallel_segments: 4,
            render_timeout_secs: 900,
            effect_seed: None,
            output: OutputSettings::default(),
            motion: MotionSettings::default(),
            effect_weights: EffectWeights::default(),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            videos_root: std::env::var("NEWSREEL_VIDEOS_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.videos_root),
            min_segment_chars: std::env::var("NEWSREEL_MIN_SEGMENT_CHARS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.min_segment_chars),
            max_parallel_segments: std::env::var("NEWSREEL_MAX_PARALLEL_SEGMENTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_parallel_segments),
            render_timeout_secs: std::env::var("NEWSREEL_RENDER_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.render_timeout_secs),
            effect_seed: std::env::var("NEWSREEL_EFFECT_SEED")
                .ok()
                .and_then(|s| s.parse().ok()),
            output: OutputSettings::default(),
            motion: MotionSettings::default(),
            effect_weights: EffectWeights::default(),
        }
    }
}
