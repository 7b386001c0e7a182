//! Viewport interaction state machine.
//!
//! The controller turns raw input events — modifier-key edges, pointer
//! positions, drag gestures, scroll deltas — into viewport range changes
//! and a live cursor readout. It holds no UI references: the rendering
//! surface forwards each event together with the [`Transform`] it built
//! for the current frame, and applies whatever viewport the controller
//! hands back.

use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::transform::Transform;
use crate::view::{Range, Viewport};

/// Selections smaller than this on either axis are treated as accidental.
const MIN_SELECTION_PX: f32 = 2.0;

/// Scroll-to-zoom sensitivity per pixel of wheel delta.
const SCROLL_ZOOM_RATE: f64 = 0.002;

/// Interaction mode, driven purely by the modifier key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewportMode {
    /// Drags pan the visible range (default).
    #[default]
    Pan,
    /// Drags trace a zoom-to-selection rectangle.
    ZoomSelect,
}

/// Live data coordinate under the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorReadout {
    /// X value under the cursor.
    pub x: f64,
    /// Y value under the cursor.
    pub y: f64,
}

impl CursorReadout {
    /// Tooltip text, fixed 2-decimal precision.
    pub fn label(&self) -> String {
        format!("X: {:.2}\nY: {:.2}", self.x, self.y)
    }
}

/// An in-progress drag gesture.
///
/// The gesture captures the mode it started in; a modifier edge mid-drag
/// affects only subsequent gestures.
#[derive(Debug, Clone, Copy)]
struct DragGesture {
    mode: ViewportMode,
    start: ScreenPoint,
    last: ScreenPoint,
}

/// Pan/zoom state machine with cursor readout.
#[derive(Debug, Default)]
pub struct ViewportController {
    mode: ViewportMode,
    drag: Option<DragGesture>,
    selection: Option<ScreenRect>,
    readout: Option<CursorReadout>,
}

impl ViewportController {
    /// Create a controller in [`ViewportMode::Pan`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current interaction mode.
    pub fn mode(&self) -> ViewportMode {
        self.mode
    }

    /// The selection rectangle of an active zoom-select drag, for overlay
    /// painting.
    pub fn selection(&self) -> Option<ScreenRect> {
        self.selection
    }

    /// The most recent cursor readout, if the pointer is over the surface.
    pub fn readout(&self) -> Option<CursorReadout> {
        self.readout
    }

    /// Feed a modifier-key edge.
    ///
    /// Pressed switches to zoom-select, released back to pan. The key is
    /// the sole driver of the mode; it is neither sticky nor toggled.
    pub fn set_modifier(&mut self, pressed: bool) {
        self.mode = if pressed {
            ViewportMode::ZoomSelect
        } else {
            ViewportMode::Pan
        };
    }

    /// Begin a drag gesture at `pos`.
    pub fn pointer_down(&mut self, pos: ScreenPoint) {
        self.drag = Some(DragGesture {
            mode: self.mode,
            start: pos,
            last: pos,
        });
        if self.mode == ViewportMode::ZoomSelect {
            self.selection = Some(ScreenRect::new(pos, pos));
        }
    }

    /// Feed a pointer move.
    ///
    /// Always refreshes the cursor readout. While a pan drag is active the
    /// returned viewport tracks the pixel delta on both axes; while a
    /// zoom-select drag is active the selection rectangle grows instead.
    pub fn pointer_move(&mut self, pos: ScreenPoint, transform: &Transform) -> Option<Viewport> {
        self.readout = transform
            .screen_to_data(pos)
            .map(|point| CursorReadout { x: point.x, y: point.y });

        let mut drag = self.drag?;
        let delta = ScreenPoint::new(pos.x - drag.last.x, pos.y - drag.last.y);
        drag.last = pos;
        self.drag = Some(drag);

        match drag.mode {
            ViewportMode::Pan => pan_viewport(transform.viewport(), delta, transform),
            ViewportMode::ZoomSelect => {
                self.selection = Some(ScreenRect::new(drag.start, pos));
                None
            }
        }
    }

    /// End the drag gesture at `pos`.
    ///
    /// A zoom-select drag resolves to the data-space rectangle under the
    /// selection, unless the selection is below the minimum extent on
    /// either axis, in which case nothing changes.
    pub fn pointer_up(&mut self, pos: ScreenPoint, transform: &Transform) -> Option<Viewport> {
        let drag = self.drag.take()?;
        let selection = self.selection.take();

        if drag.mode != ViewportMode::ZoomSelect {
            return None;
        }
        let rect = selection
            .unwrap_or(ScreenRect::new(drag.start, pos))
            .normalized();
        zoom_to_rect(rect, transform)
    }

    /// Feed a scroll gesture at `pos` with a vertical pixel delta.
    ///
    /// Zooms both axes around the data point under the cursor; positive
    /// deltas (scroll up) zoom in.
    pub fn scroll(&mut self, pos: ScreenPoint, delta_y: f32, transform: &Transform) -> Option<Viewport> {
        if delta_y.abs() < 0.01 {
            return None;
        }
        let factor = (1.0 - delta_y as f64 * SCROLL_ZOOM_RATE).clamp(0.1, 10.0);
        let viewport = transform.viewport();
        let center = transform.screen_to_data(pos).unwrap_or_else(|| viewport.center());
        Some(zoom_viewport(viewport, center, factor, factor))
    }

    /// Feed a pointer-left event; drops the readout.
    pub fn pointer_exit(&mut self) {
        self.readout = None;
    }
}

/// Shift a viewport by a pixel delta, both axes independently.
fn pan_viewport(
    viewport: Viewport,
    delta_pixels: ScreenPoint,
    transform: &Transform,
) -> Option<Viewport> {
    let origin = transform.screen_to_data(ScreenPoint::new(0.0, 0.0))?;
    let shifted = transform.screen_to_data(delta_pixels)?;
    let dx = shifted.x - origin.x;
    let dy = shifted.y - origin.y;
    Some(Viewport::new(
        Range::new(viewport.x.min - dx, viewport.x.max - dx),
        Range::new(viewport.y.min - dy, viewport.y.max - dy),
    ))
}

/// Scale a viewport around a data-space center.
fn zoom_viewport(viewport: Viewport, center: Point, factor_x: f64, factor_y: f64) -> Viewport {
    Viewport::new(
        Range::new(
            center.x + (viewport.x.min - center.x) * factor_x,
            center.x + (viewport.x.max - center.x) * factor_x,
        ),
        Range::new(
            center.y + (viewport.y.min - center.y) * factor_y,
            center.y + (viewport.y.max - center.y) * factor_y,
        ),
    )
}

/// Resolve a normalized selection rectangle to a data-space viewport.
///
/// Returns `None` when the rectangle is below the minimum extent; a
/// near-zero selection must not produce a zero-size zoom.
fn zoom_to_rect(rect: ScreenRect, transform: &Transform) -> Option<Viewport> {
    if rect.width() < MIN_SELECTION_PX || rect.height() < MIN_SELECTION_PX {
        return None;
    }
    let a = transform.screen_to_data(rect.min)?;
    let b = transform.screen_to_data(rect.max)?;
    Some(Viewport::new(Range::new(a.x, b.x), Range::new(a.y, b.y)))
}
