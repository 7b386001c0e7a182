//! Backend-agnostic rendering primitives.
//!
//! The frame builder describes a frame as a list of [`RenderCommand`]s in
//! screen space; a backend (the GPUI painter here) walks the list and
//! draws. Keeping the list backend-agnostic keeps frame building testable
//! without a window.

use crate::buffer::Snapshot;
use crate::geom::{ScreenPoint, ScreenRect};
use crate::transform::Transform;

/// RGBA color in linear space, components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
}

/// Line stroke styling, width in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
        }
    }
}

/// Circular marker styling, diameter in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    /// Marker color.
    pub color: Color,
    /// Marker diameter in pixels.
    pub size: f32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            size: 3.0,
        }
    }
}

/// Filled-and-stroked rectangle styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectStyle {
    /// Fill color.
    pub fill: Color,
    /// Stroke color.
    pub stroke: Color,
    /// Stroke width in pixels.
    pub stroke_width: f32,
}

/// Text styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Text color.
    pub color: Color,
    /// Font size in pixels.
    pub size: f32,
}

/// A line segment in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Segment start.
    pub start: ScreenPoint,
    /// Segment end.
    pub end: ScreenPoint,
}

impl LineSegment {
    /// Create a new line segment.
    pub fn new(start: ScreenPoint, end: ScreenPoint) -> Self {
        Self { start, end }
    }
}

/// One drawing instruction.
#[derive(Debug, Clone)]
pub enum RenderCommand {
    /// Start clipping to a rectangle.
    ClipRect(ScreenRect),
    /// End clipping.
    ClipEnd,
    /// Draw line segments.
    LineSegments {
        /// Segments to draw.
        segments: Vec<LineSegment>,
        /// Styling for the segments.
        style: LineStyle,
    },
    /// Draw circular markers.
    Markers {
        /// Marker centers.
        points: Vec<ScreenPoint>,
        /// Marker styling.
        style: MarkerStyle,
    },
    /// Draw a rectangle.
    Rect {
        /// Rectangle bounds.
        rect: ScreenRect,
        /// Rectangle styling.
        style: RectStyle,
    },
    /// Draw text.
    Text {
        /// Top-left position.
        position: ScreenPoint,
        /// Text content.
        text: String,
        /// Text styling.
        style: TextStyle,
    },
}

/// Aggregated drawing instructions for one frame.
#[derive(Debug, Default, Clone)]
pub struct RenderList {
    commands: Vec<RenderCommand>,
}

impl RenderList {
    /// Create an empty render list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a render command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Access all render commands.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }
}

/// Build the polyline connecting a snapshot's samples, clipped to `clip`.
pub fn build_trace_segments(
    snapshot: Snapshot<'_>,
    transform: &Transform,
    clip: ScreenRect,
    out: &mut Vec<LineSegment>,
) {
    out.clear();
    let samples = snapshot.samples();
    if samples.len() < 2 {
        return;
    }
    for window in samples.windows(2) {
        let Some(start) = transform.data_to_screen(window[0].point()) else {
            continue;
        };
        let Some(end) = transform.data_to_screen(window[1].point()) else {
            continue;
        };
        if let Some(segment) = clip_segment(start, end, clip) {
            out.push(segment);
        }
    }
}

/// Build the marker positions for a snapshot's samples inside `clip`.
pub fn build_trace_markers(
    snapshot: Snapshot<'_>,
    transform: &Transform,
    clip: ScreenRect,
    out: &mut Vec<ScreenPoint>,
) {
    out.clear();
    for sample in snapshot.samples() {
        let Some(screen) = transform.data_to_screen(sample.point()) else {
            continue;
        };
        if clip.contains(screen) {
            out.push(screen);
        }
    }
}

// Cohen-Sutherland outcodes.
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const TOP: u8 = 4;
const BOTTOM: u8 = 8;

fn clip_segment(mut start: ScreenPoint, mut end: ScreenPoint, rect: ScreenRect) -> Option<LineSegment> {
    let mut out_start = region_code(start, rect);
    let mut out_end = region_code(end, rect);

    loop {
        if (out_start | out_end) == 0 {
            return Some(LineSegment::new(start, end));
        }
        if (out_start & out_end) != 0 {
            return None;
        }

        let out_code = if out_start != 0 { out_start } else { out_end };
        let clipped = if (out_code & TOP) != 0 {
            ScreenPoint::new(
                start.x + (end.x - start.x) * (rect.min.y - start.y) / (end.y - start.y),
                rect.min.y,
            )
        } else if (out_code & BOTTOM) != 0 {
            ScreenPoint::new(
                start.x + (end.x - start.x) * (rect.max.y - start.y) / (end.y - start.y),
                rect.max.y,
            )
        } else if (out_code & RIGHT) != 0 {
            ScreenPoint::new(
                rect.max.x,
                start.y + (end.y - start.y) * (rect.max.x - start.x) / (end.x - start.x),
            )
        } else {
            ScreenPoint::new(
                rect.min.x,
                start.y + (end.y - start.y) * (rect.min.x - start.x) / (end.x - start.x),
            )
        };

        if out_code == out_start {
            start = clipped;
            out_start = region_code(start, rect);
        } else {
            end = clipped;
            out_end = region_code(end, rect);
        }
    }
}

fn region_code(point: ScreenPoint, rect: ScreenRect) -> u8 {
    let mut code = 0;
    if point.x < rect.min.x {
        code |= LEFT;
    } else if point.x > rect.max.x {
        code |= RIGHT;
    }
    if point.y < rect.min.y {
        code |= TOP;
    } else if point.y > rect.max.y {
        code |= BOTTOM;
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::SampleBuffer;
    use crate::view::{Range, Viewport};

    fn transform() -> Transform {
        let viewport = Viewport::new(Range::new(0.0, 10.0), Range::new(0.0, 10.0));
        let screen = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(100.0, 100.0));
        Transform::new(viewport, screen).expect("valid transform")
    }

    #[test]
    fn segment_fully_inside_survives_clipping() {
        let rect = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(10.0, 10.0));
        let segment = clip_segment(ScreenPoint::new(2.0, 2.0), ScreenPoint::new(8.0, 8.0), rect)
            .expect("segment inside");
        assert_eq!(segment.start, ScreenPoint::new(2.0, 2.0));
        assert_eq!(segment.end, ScreenPoint::new(8.0, 8.0));
    }

    #[test]
    fn segment_fully_outside_is_dropped() {
        let rect = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(10.0, 10.0));
        assert!(
            clip_segment(
                ScreenPoint::new(-5.0, -5.0),
                ScreenPoint::new(-1.0, -1.0),
                rect
            )
            .is_none()
        );
    }

    #[test]
    fn trace_segments_connect_consecutive_samples() {
        let mut buffer = SampleBuffer::new();
        buffer.append(0.0, 0.0);
        buffer.append(5.0, 5.0);
        buffer.append(10.0, 10.0);

        let transform = transform();
        let clip = transform.screen();
        let mut out = Vec::new();
        build_trace_segments(buffer.snapshot(), &transform, clip, &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn trace_markers_outside_the_clip_are_dropped() {
        let mut buffer = SampleBuffer::new();
        buffer.append(5.0, 5.0);
        buffer.append(50.0, 5.0);

        let transform = transform();
        let mut out = Vec::new();
        build_trace_markers(buffer.snapshot(), &transform, transform.screen(), &mut out);
        assert_eq!(out.len(), 1);
    }
}
