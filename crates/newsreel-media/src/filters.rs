//! zoompan motion filter construction.
//!
//! Each motion effect maps to one zoompan filter over a still image.
//! Zoom expressions are clamped to [1.0, ceiling] and pan expressions
//! clamp x so the view window never leaves the source image.

use newsreel_models::{MotionEffect, MotionSettings};

/// Centered x expression.
const X_CENTER: &str = "iw/2-(iw/zoom/2)";
/// Centered y expression; every effect keeps vertical centering.
const Y_CENTER: &str = "ih/2-(ih/zoom/2)";

/// Build the zoompan filter body for one effect.
///
/// `frames` is the display duration in output frames; the effect plays
/// across exactly that many frames of the synthesized stream.
pub fn zoompan_filter(
    effect: MotionEffect,
    frames: u32,
    settings: &MotionSettings,
    width: u32,
    height: u32,
    fps: u32,
) -> String {
    let zoomed = settings.clamp_zoom(settings.start_zoom);
    let step = settings.zoom_step;
    let pan = settings.pan_step;

    // Pan and zoom-out start zoomed in and relax toward 1.0
    let receding_zoom = format!("if(lte(zoom,1.0),{zoomed},max(1.0,zoom-{step}))");

    let (z, x) = match effect {
        MotionEffect::PanLeft => (
            receding_zoom,
            format!("if(lte(zoom,1.0),iw/2+(iw/zoom/2),max(x-{pan},0))"),
        ),
        MotionEffect::PanRight => (
            receding_zoom,
            format!("if(lte(zoom,1.0),{X_CENTER},min(x+{pan},iw-iw/zoom))"),
        ),
        MotionEffect::ZoomIn => (format!("min({zoomed},zoom+{step})"), X_CENTER.to_string()),
        MotionEffect::ZoomOut => (receding_zoom, X_CENTER.to_string()),
        MotionEffect::Static => (
            format!("{}", settings.clamp_zoom(settings.static_zoom)),
            X_CENTER.to_string(),
        ),
    };

    format!(
        "zoompan=z='{z}':d={frames}:x='{x}':y='{Y_CENTER}':s={width}x{height}:fps={fps}"
    )
}
