//! Output and motion configuration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Fixed encode parameters for the final video. These are configuration,
/// not per-call inputs; every segment in a plan shares them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OutputSettings {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Frames per second of the synthesized visual streams
    pub fps: u32,
    /// Video codec
    pub video_codec: String,
    /// Encoder preset
    pub preset: String,
    /// Constant rate factor (lower is higher quality)
    pub crf: u8,
    /// Audio codec
    pub audio_codec: String,
    /// Audio bitrate, e.g. "192k"
    pub audio_bitrate: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 25,
            video_codec: "libx264".to_string(),
            preset: "slow".to_string(),
            crf: 18,
            audio_codec: "aac".to_string(),
            audio_bitrate: "192k".to_string(),
        }
    }
}

/// Parameters for the pan/zoom transforms.
///
/// Zoom factors are clamped to `[1.0, zoom_ceiling]` when filters are
/// built, so no configuration can push the view outside the source image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MotionSettings {
    /// Zoom factor the pan effects hold and zoom-out starts from
    pub start_zoom: f64,
    /// Upper bound for any zoom factor
    pub zoom_ceiling: f64,
    /// Zoom factor held by the static effect
    pub static_zoom: f64,
    /// Per-frame zoom increment for zoom-in/zoom-out
    pub zoom_step: f64,
    /// Per-frame horizontal drift in pixels for the pan effects
    pub pan_step: f64,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            start_zoom: 1.5,
            zoom_ceiling: 2.0,
            static_zoom: 2.0,
            zoom_step: 0.0015,
            pan_step: 4.0,
        }
    }
}

impl MotionSettings {
    /// Clamp a zoom factor into the legal range.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(1.0, self.zoom_ceiling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_clamping() {
        let m = MotionSettings::default();
        assert_eq!(m.clamp_zoom(0.5), 1.0);
        assert_eq!(m.clamp_zoom(1.5), 1.5);
        assert_eq!(m.clamp_zoom(5.0), 2.0);
    }

    #[test]
    fn test_output_defaults_match_encoder_profile() {
        let o = OutputSettings::default();
        assert_eq!((o.width, o.height), (1920, 1080));
        assert_eq!(o.video_codec, "libx264");
        assert_eq!(o.crf, 18);
        assert_eq!(o.audio_bitrate, "192k");
    }
}
