//! Article-to-video pipeline.
//!
//! This crate provides:
//! - The segmenter that turns narration text into ordered segments
//! - Per-segment asset resolution with the three-way image source cascade
//! - The render graph builder (seedable motion effect draws)
//! - The orchestrator state machine and on-disk project layout

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod planner;
pub mod project;
pub mod resolver;
pub mod segmenter;

pub use config::PipelineConfig;
pub use error::{MissingAsset, PipelineError, PipelineResult, RunError, Stage};
pub use orchestrator::{Pipeline, RunOutcome};
pub use planner::RenderPlanner;
pub use project::ProjectDirectory;
pub use resolver::{build_image_prompt, AssetResolver};
pub use segmenter::segment_script;
