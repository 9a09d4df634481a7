//! Interpretation of wheel and trackpad input.

use super::InteractionConfig;
use crate::input::{DeltaMode, WheelEvent};
use kurbo::Vec2;

/// Pixel deltas below this on a pixel-mode event are treated as trackpad scrolls.
const TRACKPAD_MAX_STEP: f64 = 50.0;

/// What a wheel event does to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelGesture {
    /// Multiply zoom by `factor` around the pointer.
    Zoom { factor: f64 },
    /// Translate the viewport by `delta` screen pixels.
    Pan { delta: Vec2 },
}

fn to_pixels(delta: Vec2, mode: DeltaMode, config: &InteractionConfig) -> Vec2 {
    match mode {
        DeltaMode::Pixel => delta,
        DeltaMode::Line => delta * config.line_height_px,
        DeltaMode::Page => delta * config.page_height_px,
    }
}

/// Whether a pixel-mode event looks like a two-finger trackpad scroll
/// rather than a mouse wheel notch.
fn looks_like_trackpad(event: &WheelEvent) -> bool {
    event.delta_mode == DeltaMode::Pixel
        && (event.delta.x != 0.0 || event.delta.y.fract() != 0.0 || event.delta.y.abs() < TRACKPAD_MAX_STEP)
}

/// Classify a wheel event.
///
/// Pinch (zoom modifier held) zooms with an exponential factor; trackpad
/// scrolls and horizontal-dominant swipes pan; remaining wheel notches zoom.
pub fn interpret_wheel(event: &WheelEvent, config: &InteractionConfig) -> WheelGesture {
    let delta = to_pixels(event.delta, event.delta_mode, config);
    let horizontal = delta.x.abs() > delta.y.abs();

    if event.modifiers.is_command() {
        WheelGesture::Zoom {
            factor: (-delta.y * config.pinch_zoom_sensitivity).exp(),
        }
    } else if horizontal || looks_like_trackpad(event) {
        WheelGesture::Pan { delta: -delta }
    } else {
        WheelGesture::Zoom {
            factor: (-delta.y * config.wheel_zoom_sensitivity).exp(),
        }
    }
}
