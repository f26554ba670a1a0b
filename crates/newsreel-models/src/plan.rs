//! The declarative render plan.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::motion::MotionEffect;
use crate::settings::{MotionSettings, OutputSettings};

/// One segment's entry in the plan: paired assets, the drawn motion
/// effect, and the display duration derived from the audio clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlanEntry {
    /// Segment index this entry belongs to
    pub index: usize,
    /// Image asset path
    pub image: PathBuf,
    /// Audio asset path
    pub audio: PathBuf,
    /// Motion effect applied over the segment's duration
    pub effect: MotionEffect,
    /// Display duration in seconds (length of the audio clip)
    pub duration: f64,
    /// Frame count at the plan's fps, always at least 1
    pub frames: u32,
}

/// Index-ordered description of per-segment transforms plus the
/// concatenation into one timeline. Pure data: it can be logged,
/// persisted, and replayed independently of the encoder, and it is
/// immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RenderPlan {
    /// Per-segment entries, in segment order
    pub entries: Vec<PlanEntry>,
    /// Global encode parameters
    pub output: OutputSettings,
    /// Pan/zoom parameters the transforms were built against
    pub motion: MotionSettings,
}

impl RenderPlan {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total timeline duration in seconds.
    pub fn total_duration(&self) -> f64 {
        self.entries.iter().map(|e| e.duration).sum()
    }

    /// Check that entries are index-ordered and gap-free from 0.
    pub fn is_index_aligned(&self) -> bool {
        self.entries.iter().enumerate().all(|(i, e)| e.index == i)
    }
}
