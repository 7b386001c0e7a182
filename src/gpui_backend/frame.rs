use gpui::{Bounds, Pixels};

use crate::controller::ViewportController;
use crate::geom::{ScreenPoint, ScreenRect};
use crate::render::{
    Color, RectStyle, RenderCommand, RenderList, build_trace_markers, build_trace_segments,
};
use crate::transform::Transform;
use crate::view::{Range, Viewport};
use crate::viewer::{Theme, Viewer};

use super::config::ScopeViewConfig;

/// Everything the painter needs for one frame.
#[derive(Debug, Clone)]
pub(crate) struct ScopeFrame {
    pub(crate) render: RenderList,
}

/// Per-frame UI state shared between the frame builder and the event
/// handlers.
#[derive(Debug, Default)]
pub(crate) struct UiState {
    pub(crate) controller: ViewportController,
    pub(crate) transform: Option<Transform>,
    pub(crate) plot_rect: Option<ScreenRect>,
    pub(crate) cursor: Option<ScreenPoint>,
}

pub(crate) fn build_frame(
    viewer: &mut Viewer,
    state: &mut UiState,
    config: &ScopeViewConfig,
    bounds: Bounds<Pixels>,
) -> ScopeFrame {
    let mut render = RenderList::new();

    let origin_x = f32::from(bounds.origin.x);
    let origin_y = f32::from(bounds.origin.y);
    let full_width = f32::from(bounds.size.width);
    let full_height = f32::from(bounds.size.height);

    let plot_rect = ScreenRect::new(
        ScreenPoint::new(origin_x + config.margin_left, origin_y + config.margin),
        ScreenPoint::new(
            origin_x + full_width - config.margin,
            origin_y + full_height - config.margin_bottom,
        ),
    );
    if !plot_rect.is_valid() {
        state.transform = None;
        state.plot_rect = None;
        return ScopeFrame { render };
    }

    let viewport = viewer
        .refresh_viewport(config.padding_frac, config.min_padding)
        .unwrap_or(Viewport::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0)));
    let Some(transform) = Transform::new(viewport, plot_rect) else {
        state.transform = None;
        state.plot_rect = Some(plot_rect);
        return ScopeFrame { render };
    };

    let theme = viewer.theme().clone();

    // Plot frame and tick labels sit outside the clip.
    render.push(RenderCommand::Rect {
        rect: plot_rect,
        style: RectStyle {
            fill: Color::new(0.0, 0.0, 0.0, 0.0),
            stroke: theme.frame.color,
            stroke_width: theme.frame.width,
        },
    });
    build_ticks(&mut render, &transform, config, &theme);
    build_axis_labels(&mut render, viewer, plot_rect, &theme);

    // The trace itself, clipped to the plot area.
    render.push(RenderCommand::ClipRect(plot_rect));
    let snapshot = viewer.buffer().snapshot();
    let mut segments = Vec::new();
    build_trace_segments(snapshot, &transform, plot_rect, &mut segments);
    if !segments.is_empty() {
        render.push(RenderCommand::LineSegments {
            segments,
            style: theme.trace,
        });
    }
    let mut markers = Vec::new();
    build_trace_markers(snapshot, &transform, plot_rect, &mut markers);
    if !markers.is_empty() {
        render.push(RenderCommand::Markers {
            points: markers,
            style: theme.marker,
        });
    }

    if let Some(selection) = state.controller.selection() {
        render.push(RenderCommand::Rect {
            rect: selection.normalized(),
            style: theme.selection,
        });
    }
    render.push(RenderCommand::ClipEnd);

    build_readout(&mut render, state, config, plot_rect, &theme);

    state.transform = Some(transform);
    state.plot_rect = Some(plot_rect);
    ScopeFrame { render }
}

fn build_ticks(
    render: &mut RenderList,
    transform: &Transform,
    config: &ScopeViewConfig,
    theme: &Theme,
) {
    let ticks = config.ticks_per_axis.max(2);
    let plot_rect = transform.screen();
    let viewport = transform.viewport();

    for step in 0..ticks {
        let frac = step as f64 / (ticks - 1) as f64;

        let x_value = viewport.x.min + frac * viewport.x.span();
        let sx = plot_rect.min.x + (frac as f32) * plot_rect.width();
        render.push(RenderCommand::Text {
            position: ScreenPoint::new(sx - 12.0, plot_rect.max.y + 4.0),
            text: format_tick(x_value),
            style: theme.text,
        });

        let y_value = viewport.y.min + frac * viewport.y.span();
        let sy = plot_rect.max.y - (frac as f32) * plot_rect.height();
        render.push(RenderCommand::Text {
            position: ScreenPoint::new(plot_rect.min.x - 46.0, sy - 7.0),
            text: format_tick(y_value),
            style: theme.text,
        });
    }
}

fn build_axis_labels(
    render: &mut RenderList,
    viewer: &Viewer,
    plot_rect: ScreenRect,
    theme: &Theme,
) {
    if !viewer.x_label().is_empty() {
        render.push(RenderCommand::Text {
            position: ScreenPoint::new(
                plot_rect.min.x + plot_rect.width() * 0.5 - 20.0,
                plot_rect.max.y + 16.0,
            ),
            text: viewer.x_label().to_string(),
            style: theme.text,
        });
    }
    if !viewer.y_label().is_empty() {
        render.push(RenderCommand::Text {
            position: ScreenPoint::new(plot_rect.min.x + 4.0, plot_rect.min.y + 2.0),
            text: viewer.y_label().to_string(),
            style: theme.text,
        });
    }
}

fn build_readout(
    render: &mut RenderList,
    state: &UiState,
    config: &ScopeViewConfig,
    plot_rect: ScreenRect,
    theme: &Theme,
) {
    let Some(cursor) = state.cursor else {
        return;
    };
    if !plot_rect.contains(cursor) {
        return;
    }
    let Some(readout) = state.controller.readout() else {
        return;
    };

    // Flip the tooltip to the other side of the pointer near the edges.
    let mut x = cursor.x + config.readout_offset_px;
    let mut y = cursor.y + config.readout_offset_px;
    if x + 80.0 > plot_rect.max.x {
        x = cursor.x - config.readout_offset_px - 80.0;
    }
    if y + 30.0 > plot_rect.max.y {
        y = cursor.y - config.readout_offset_px - 30.0;
    }
    render.push(RenderCommand::Text {
        position: ScreenPoint::new(x, y),
        text: readout.label(),
        style: theme.text,
    });
}

fn format_tick(value: f64) -> String {
    if value.abs() >= 1000.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
