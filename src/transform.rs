//! Coordinate transforms between data and screen space.
//!
//! The transform is owned by the rendering surface and rebuilt every frame
//! from the current viewport and plot rectangle. The viewport controller
//! only ever borrows it.

use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::view::{Range, Viewport};

const MIN_SPAN: f64 = 1e-12;

/// Linear transform between data coordinates and screen pixels.
#[derive(Debug, Clone)]
pub struct Transform {
    viewport: Viewport,
    screen: ScreenRect,
    x: Range,
    y: Range,
}

impl Transform {
    /// Create a transform for the given viewport and screen rectangle.
    ///
    /// Returns `None` for a degenerate screen rectangle or a non-finite
    /// viewport. Zero-span viewport axes are widened to a minimum span so
    /// the mapping stays invertible.
    pub fn new(viewport: Viewport, screen: ScreenRect) -> Option<Self> {
        if !screen.is_valid() {
            return None;
        }
        let x = viewport.x.with_min_span(MIN_SPAN);
        let y = viewport.y.with_min_span(MIN_SPAN);
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        Some(Self {
            viewport,
            screen,
            x,
            y,
        })
    }

    /// Access the viewport this transform was built from.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Access the screen rectangle this transform maps onto.
    pub fn screen(&self) -> ScreenRect {
        self.screen
    }

    /// Map a data point into screen space.
    pub fn data_to_screen(&self, point: Point) -> Option<ScreenPoint> {
        if !point.x.is_finite() || !point.y.is_finite() {
            return None;
        }
        let x_norm = (point.x - self.x.min) / self.x.span();
        let y_norm = (point.y - self.y.min) / self.y.span();
        let sx = self.screen.min.x as f64 + x_norm * self.screen.width() as f64;
        let sy = self.screen.max.y as f64 - y_norm * self.screen.height() as f64;
        Some(ScreenPoint::new(sx as f32, sy as f32))
    }

    /// Map a screen point into data space.
    pub fn screen_to_data(&self, point: ScreenPoint) -> Option<Point> {
        if !point.x.is_finite() || !point.y.is_finite() {
            return None;
        }
        let x_norm = (point.x as f64 - self.screen.min.x as f64) / self.screen.width() as f64;
        let y_norm = (self.screen.max.y as f64 - point.y as f64) / self.screen.height() as f64;
        Some(Point::new(
            self.x.min + x_norm * self.x.span(),
            self.y.min + y_norm * self.y.span(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform_100px() -> Transform {
        let viewport = Viewport::new(Range::new(0.0, 10.0), Range::new(0.0, 10.0));
        let screen = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(100.0, 100.0));
        Transform::new(viewport, screen).expect("valid transform")
    }

    #[test]
    fn roundtrip() {
        let transform = transform_100px();
        let point = Point::new(5.0, 7.5);
        let screen = transform.data_to_screen(point).unwrap();
        let back = transform.screen_to_data(screen).unwrap();
        assert!((back.x - point.x).abs() < 1e-9);
        assert!((back.y - point.y).abs() < 1e-9);
    }

    #[test]
    fn y_axis_is_flipped() {
        let transform = transform_100px();
        let bottom_left = transform.data_to_screen(Point::new(0.0, 0.0)).unwrap();
        assert_eq!(bottom_left, ScreenPoint::new(0.0, 100.0));
        let top_right = transform.data_to_screen(Point::new(10.0, 10.0)).unwrap();
        assert_eq!(top_right, ScreenPoint::new(100.0, 0.0));
    }

    #[test]
    fn degenerate_screen_is_rejected() {
        let viewport = Viewport::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0));
        let screen = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(0.0, 50.0));
        assert!(Transform::new(viewport, screen).is_none());
    }

    #[test]
    fn zero_span_viewport_stays_invertible() {
        let viewport = Viewport::new(Range::new(3.0, 3.0), Range::new(0.0, 1.0));
        let screen = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(100.0, 100.0));
        let transform = Transform::new(viewport, screen).expect("valid transform");
        assert!(
            transform
                .screen_to_data(ScreenPoint::new(50.0, 50.0))
                .is_some()
        );
    }
}
