//! Shared data models for the Newsreel pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Articles and narration segments
//! - Image source selection and motion effects
//! - The declarative render plan fed to the encoder
//! - Output and motion configuration

pub mod article;
pub mod motion;
pub mod plan;
pub mod run;
pub mod segment;
pub mod settings;
pub mod source;

// Re-export common types
pub use article::{Article, ArticleSource};
pub use motion::{EffectWeights, MotionEffect};
pub use plan::{PlanEntry, RenderPlan};
pub use run::RunId;
pub use segment::{segment_file_name, Segment};
pub use settings::{MotionSettings, OutputSettings};
pub use source::ImageSourceKind;
