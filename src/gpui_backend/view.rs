use std::sync::{Arc, RwLock};

use gpui::prelude::*;
use gpui::{
    FocusHandle, Focusable, ModifiersChangedEvent, MouseButton, MouseDownEvent, MouseMoveEvent,
    MouseUpEvent,
    Pixels, Point, ScrollWheelEvent, Window, canvas, div, px,
};

use crate::geom::ScreenPoint;
use crate::viewer::Viewer;

use super::config::ScopeViewConfig;
use super::frame::{UiState, build_frame};
use super::paint::{paint_frame, to_hsla};

/// A GPUI view that renders a [`Viewer`] with interactive controls.
///
/// The view forwards pointer and modifier events to the viewport
/// controller and applies the viewports it hands back; data management
/// stays with the underlying [`Viewer`].
#[derive(Clone)]
pub struct ScopeView {
    viewer: Arc<RwLock<Viewer>>,
    state: Arc<RwLock<UiState>>,
    config: ScopeViewConfig,
    focus_handle: FocusHandle,
}

impl ScopeView {
    /// Create a scope view for the given viewer.
    pub fn new(viewer: Viewer, cx: &mut Context<Self>) -> Self {
        Self::with_config(viewer, ScopeViewConfig::default(), cx)
    }

    /// Create a scope view with a custom configuration.
    pub fn with_config(viewer: Viewer, config: ScopeViewConfig, cx: &mut Context<Self>) -> Self {
        Self {
            viewer: Arc::new(RwLock::new(viewer)),
            state: Arc::new(RwLock::new(UiState::default())),
            config,
            focus_handle: cx.focus_handle(),
        }
    }

    /// Get a handle for mutating the underlying viewer.
    ///
    /// This is what the orchestrator's timer task and command bindings use.
    pub fn viewer_handle(&self) -> ViewerHandle {
        ViewerHandle {
            viewer: Arc::clone(&self.viewer),
        }
    }

    fn on_mouse_down(&mut self, ev: &MouseDownEvent, window: &mut Window, cx: &mut Context<Self>) {
        window.focus(&self.focus_handle);
        let pos = screen_point(ev.position);
        let mut state = self.state.write().expect("scope state lock");
        if state.plot_rect.is_some_and(|rect| rect.contains(pos)) {
            state.controller.pointer_down(pos);
        }
        cx.notify();
    }

    fn on_mouse_move(&mut self, ev: &MouseMoveEvent, cx: &mut Context<Self>) {
        let pos = screen_point(ev.position);
        let mut state = self.state.write().expect("scope state lock");
        state.cursor = Some(pos);

        if let Some(transform) = state.transform.clone()
            && let Some(next) = state.controller.pointer_move(pos, &transform)
        {
            let mut viewer = self.viewer.write().expect("viewer lock");
            viewer.set_manual_view(next);
        }
        cx.notify();
    }

    fn on_mouse_up(&mut self, ev: &MouseUpEvent, cx: &mut Context<Self>) {
        let pos = screen_point(ev.position);
        let mut state = self.state.write().expect("scope state lock");

        if let Some(transform) = state.transform.clone()
            && let Some(next) = state.controller.pointer_up(pos, &transform)
        {
            let mut viewer = self.viewer.write().expect("viewer lock");
            viewer.set_manual_view(next);
        }
        cx.notify();
    }

    fn on_scroll(&mut self, ev: &ScrollWheelEvent, cx: &mut Context<Self>) {
        let pos = screen_point(ev.position);
        let mut state = self.state.write().expect("scope state lock");
        if !state.plot_rect.is_some_and(|rect| rect.contains(pos)) {
            return;
        }

        let delta = ev.delta.pixel_delta(px(16.0));
        let delta_y = -f32::from(delta.y);
        if let Some(transform) = state.transform.clone()
            && let Some(next) = state.controller.scroll(pos, delta_y, &transform)
        {
            let mut viewer = self.viewer.write().expect("viewer lock");
            viewer.set_manual_view(next);
        }
        cx.notify();
    }

    fn on_modifiers_changed(&mut self, ev: &ModifiersChangedEvent, cx: &mut Context<Self>) {
        let mut state = self.state.write().expect("scope state lock");
        state.controller.set_modifier(ev.modifiers.control);
        cx.notify();
    }
}

impl Focusable for ScopeView {
    fn focus_handle(&self, _cx: &gpui::App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl Render for ScopeView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let viewer = Arc::clone(&self.viewer);
        let state = Arc::clone(&self.state);
        let config = self.config.clone();
        let background = viewer.read().expect("viewer lock").theme().background;

        div()
            .size_full()
            .bg(to_hsla(background))
            .track_focus(&self.focus_handle)
            .child(
                canvas(
                    move |bounds, _, _| {
                        let mut viewer = viewer.write().expect("viewer lock");
                        let mut state = state.write().expect("scope state lock");
                        build_frame(&mut viewer, &mut state, &config, bounds)
                    },
                    move |_, frame, window, cx| {
                        paint_frame(&frame, window, cx);
                    },
                )
                .size_full(),
            )
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, ev, window, cx| {
                    this.on_mouse_down(ev, window, cx);
                }),
            )
            .on_mouse_move(cx.listener(|this, ev, _, cx| {
                this.on_mouse_move(ev, cx);
            }))
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_up(ev, cx);
                }),
            )
            .on_scroll_wheel(cx.listener(|this, ev, _, cx| {
                this.on_scroll(ev, cx);
            }))
            .on_modifiers_changed(cx.listener(|this, ev, _, cx| {
                this.on_modifiers_changed(ev, cx);
            }))
    }
}

/// A handle for mutating the [`Viewer`] held inside a [`ScopeView`].
///
/// The handle clones cheaply and can be moved into async tasks.
#[derive(Clone)]
pub struct ViewerHandle {
    viewer: Arc<RwLock<Viewer>>,
}

impl ViewerHandle {
    /// Read the viewer state.
    ///
    /// The viewer is locked for the duration of the callback.
    pub fn read<R>(&self, f: impl FnOnce(&Viewer) -> R) -> R {
        let viewer = self.viewer.read().expect("viewer lock");
        f(&viewer)
    }

    /// Mutate the viewer state.
    ///
    /// The viewer is locked for the duration of the callback, which is
    /// what keeps generator ticks, clears, and loads from interleaving.
    pub fn write<R>(&self, f: impl FnOnce(&mut Viewer) -> R) -> R {
        let mut viewer = self.viewer.write().expect("viewer lock");
        f(&mut viewer)
    }
}

fn screen_point(position: Point<Pixels>) -> ScreenPoint {
    ScreenPoint::new(f32::from(position.x), f32::from(position.y))
}
