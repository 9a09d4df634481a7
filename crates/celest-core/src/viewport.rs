//! Viewport module for pan/zoom transforms.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest zoom the canvas allows.
pub const MIN_ZOOM: f64 = 0.1;
/// Largest zoom the canvas allows.
pub const MAX_ZOOM: f64 = 5.0;

/// The pan/zoom state describing how canvas space maps to screen space.
///
/// `x`/`y` is the translation in screen pixels, applied after scaling by
/// `zoom`: `screen = canvas * zoom + (x, y)`.
///
/// Decoding goes through [`Viewport::new`], so a stored viewport with a zero,
/// negative or missing zoom loads as zoom 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredViewport")]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    /// Always strictly positive.
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

/// Viewport as found on disk. `null` and absent fields are tolerated.
#[derive(Deserialize)]
struct StoredViewport {
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    zoom: Option<f64>,
}

impl From<StoredViewport> for Viewport {
    fn from(stored: StoredViewport) -> Self {
        Viewport::new(
            stored.x.unwrap_or(0.0),
            stored.y.unwrap_or(0.0),
            stored.zoom.unwrap_or(1.0),
        )
    }
}

impl Viewport {
    /// Create a viewport. Non-positive or non-finite zoom falls back to 1,
    /// non-finite translation to 0.
    pub fn new(x: f64, y: f64, zoom: f64) -> Self {
        let finite_or_zero = |v: f64| if v.is_finite() { v } else { 0.0 };
        let zoom = if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 };
        Self {
            x: finite_or_zero(x),
            y: finite_or_zero(y),
            zoom,
        }
    }

    /// Translation part of the transform.
    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Affine transform from canvas to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.translation()) * Affine::scale(self.zoom)
    }

    /// Affine transform from screen to canvas coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.translation())
    }

    /// Pan the viewport by a delta in screen pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// A copy of this viewport translated by `delta` screen pixels.
    pub fn panned(&self, delta: Vec2) -> Self {
        let mut next = *self;
        next.pan(delta);
        next
    }

    /// Zoom by `factor`, keeping the canvas point under `screen_point` fixed.
    ///
    /// The resulting zoom is clamped to `[min_zoom, max_zoom]`. Returns
    /// false when the clamped zoom equals the current one.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64, min_zoom: f64, max_zoom: f64) -> bool {
        let new_zoom = (self.zoom * factor).clamp(min_zoom, max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }

        let world_point = screen_to_canvas(screen_point, self);
        self.zoom = new_zoom;

        let new_screen = canvas_to_screen(world_point, self);
        self.x += screen_point.x - new_screen.x;
        self.y += screen_point.y - new_screen.y;
        true
    }

    /// Translate so that `canvas_point` lands in the middle of the container.
    pub fn center_on(&mut self, canvas_point: Point, container: Size) {
        self.x = container.width / 2.0 - canvas_point.x * self.zoom;
        self.y = container.height / 2.0 - canvas_point.y * self.zoom;
    }

    /// Fit the viewport to show the given bounding box.
    pub fn fit_to_bounds(&mut self, bounds: Rect, container: Size, padding: f64, min_zoom: f64, max_zoom: f64) {
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            self.center_on(bounds.center(), container);
            return;
        }

        let padded = Size::new(
            (container.width - padding * 2.0).max(1.0),
            (container.height - padding * 2.0).max(1.0),
        );
        let scale_x = padded.width / bounds.width();
        let scale_y = padded.height / bounds.height();
        self.zoom = scale_x.min(scale_y).clamp(min_zoom, max_zoom);
        self.center_on(bounds.center(), container);
    }
}

/// Convert a screen point to canvas coordinates: `(screen - translate) / zoom`.
pub fn screen_to_canvas(screen: Point, viewport: &Viewport) -> Point {
    Point::new(
        (screen.x - viewport.x) / viewport.zoom,
        (screen.y - viewport.y) / viewport.zoom,
    )
}

/// Convert a canvas point to screen coordinates: `canvas * zoom + translate`.
pub fn canvas_to_screen(canvas: Point, viewport: &Viewport) -> Point {
    Point::new(
        canvas.x * viewport.zoom + viewport.x,
        canvas.y * viewport.zoom + viewport.y,
    )
}

/// Alias of [`canvas_to_screen`].
pub fn apply_viewport(canvas: Point, viewport: &Viewport) -> Point {
    canvas_to_screen(canvas, viewport)
}

/// Renderer-consumable transform descriptor.
pub fn viewport_transform(viewport: &Viewport) -> String {
    format!(
        "translate({}px, {}px) scale({})",
        viewport.x, viewport.y, viewport.zoom
    )
}

/// Clamp the translation so the visible canvas area stays inside `world`.
///
/// When the visible area is larger than the world on an axis, that axis is
/// locked so the world is centered instead of pinned to one edge. Applying
/// the clamp to an already clamped viewport returns it unchanged.
pub fn clamp_viewport_to_bounds(viewport: &Viewport, container: Size, world: Rect) -> Viewport {
    let zoom = viewport.zoom;
    Viewport {
        x: clamp_axis(viewport.x, container.width, world.x0, world.x1, zoom),
        y: clamp_axis(viewport.y, container.height, world.y0, world.y1, zoom),
        zoom,
    }
}

fn clamp_axis(translate: f64, container_len: f64, world_min: f64, world_max: f64, zoom: f64) -> f64 {
    let visible_len = container_len / zoom;
    let world_len = world_max - world_min;

    if visible_len >= world_len {
        // Visible span is wider than the world: center it.
        let world_center = (world_min + world_max) / 2.0;
        return container_len / 2.0 - world_center * zoom;
    }

    // The visible left edge is -translate / zoom; keep it in [min, max - visible].
    let max_translate = -world_min * zoom;
    let min_translate = container_len - world_max * zoom;
    translate.max(min_translate).min(max_translate)
}
