//! Pipeline error types.

use std::fmt;

use thiserror::Error;

use newsreel_media::MediaError;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Which asset a segment ended resolution without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingAsset {
    Audio,
    Image,
    Both,
}

impl fmt::Display for MissingAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MissingAsset::Audio => "audio",
            MissingAsset::Image => "image",
            MissingAsset::Both => "audio and image",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Script produced no segments")]
    EmptyScript,

    #[error("Segment {index} incomplete after exhausting fallbacks: missing {missing}")]
    SegmentIncomplete { index: usize, missing: MissingAsset },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pipeline stages, in execution order. A run is `Done` after Rendering
/// or `Failed` at whichever stage errored first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Segmenting,
    Resolving,
    Planning,
    Rendering,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Segmenting => "segmenting",
            Stage::Resolving => "resolving",
            Stage::Planning => "planning",
            Stage::Rendering => "rendering",
        };
        write!(f, "{}", s)
    }
}

/// Terminal failure of one run: the originating stage plus the cause.
#[derive(Debug, Error)]
#[error("Pipeline failed at {stage} stage: {source}")]
pub struct RunError {
    pub stage: Stage,
    #[source]
    pub source: PipelineError,
}

impl RunError {
    pub fn new(stage: Stage, source: impl Into<PipelineError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}
