//! Motion effect definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Parametric pan/zoom transform applied to a still image over its
/// segment's display duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MotionEffect {
    /// Start zoomed in, drift the view window left
    PanLeft,
    /// Start zoomed in, drift the view window right
    PanRight,
    /// Slow push in from 1.0x
    ZoomIn,
    /// Start zoomed in, pull back out to 1.0x
    ZoomOut,
    /// Fixed framing, no motion
    Static,
}

impl MotionEffect {
    /// All effects, in weight order.
    pub const ALL: &'static [MotionEffect] = &[
        MotionEffect::PanLeft,
        MotionEffect::PanRight,
        MotionEffect::ZoomIn,
        MotionEffect::ZoomOut,
        MotionEffect::Static,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MotionEffect::PanLeft => "pan_left",
            MotionEffect::PanRight => "pan_right",
            MotionEffect::ZoomIn => "zoom_in",
            MotionEffect::ZoomOut => "zoom_out",
            MotionEffect::Static => "static",
        }
    }
}

impl fmt::Display for MotionEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MotionEffect {
    type Err = MotionEffectParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pan_left" => Ok(MotionEffect::PanLeft),
            "pan_right" => Ok(MotionEffect::PanRight),
            "zoom_in" => Ok(MotionEffect::ZoomIn),
            "zoom_out" => Ok(MotionEffect::ZoomOut),
            "static" => Ok(MotionEffect::Static),
            _ => Err(MotionEffectParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown motion effect: {0}")]
pub struct MotionEffectParseError(String);

/// Relative draw weights for the five effects, in [`MotionEffect::ALL`]
/// order. Defaults to an even 20/20/20/20/20 split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EffectWeights(pub [u32; 5]);

impl Default for EffectWeights {
    fn default() -> Self {
        Self([20, 20, 20, 20, 20])
    }
}

impl EffectWeights {
    /// Sum of all weights. Zero-total weights are rejected at construction
    /// sites, not here.
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Map a roll in `0..total()` onto an effect by walking the
    /// cumulative weights. Rolls past the total clamp to the last effect
    /// with non-zero weight.
    pub fn choose(&self, roll: u32) -> MotionEffect {
        let mut acc = 0u32;
        let mut last = MotionEffect::Static;
        for (effect, &weight) in MotionEffect::ALL.iter().zip(self.0.iter()) {
            if weight == 0 {
                continue;
            }
            acc += weight;
            last = *effect;
            if roll < acc {
                return *effect;
            }
        }
        last
    }
}
