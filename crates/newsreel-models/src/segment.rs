//! Narration segment model.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One unit of narration: a sentence of script text paired with one audio
/// clip and one image.
///
/// The index is 0-based and stable; it is the synchronization key between
/// audio and image resolution and must never change after segmentation.
/// Only the asset paths are attached after creation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Segment {
    /// 0-based position in the script
    pub index: usize,

    /// Trimmed narration text, terminal punctuation included
    pub text: String,

    /// Resolved audio file, set by the asset resolver
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_path: Option<PathBuf>,

    /// Resolved image file, set by the asset resolver
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<PathBuf>,
}

impl Segment {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            audio_path: None,
            image_path: None,
        }
    }

    /// Whether both assets have been attached.
    pub fn is_resolved(&self) -> bool {
        self.audio_path.is_some() && self.image_path.is_some()
    }
}

/// On-disk file name for a segment asset: 1-indexed and zero-padded to at
/// least two digits so the files sort lexically in segment order.
pub fn segment_file_name(index: usize, extension: &str) -> String {
    format!("segment-{:02}.{}", index + 1, extension)
}
