//! Interactive viewer demo.
//!
//! Click the plot to focus it, then:
//!   g  start/stop the generator
//!   c  clear the samples (while stopped)
//!   s  save to trace.csv
//!   l  load trace.csv
//!   r  reset the view to auto-fit
//! Drag pans, the scroll wheel zooms around the cursor, and holding Ctrl
//! while dragging zooms to the selected rectangle.

use std::time::{Duration, Instant};

use gpui::prelude::*;
use gpui::{
    AppContext, Application, AsyncWindowContext, Bounds, Context, Entity, FocusHandle,
    KeyDownEvent, Timer, Window, WindowBounds, WindowOptions, div, px, size,
};

use livetrace::{GeneratorConfig, ScopeView, Viewer, ViewerHandle};

const TRACE_PATH: &str = "trace.csv";

const DEMO_CONFIG: GeneratorConfig = GeneratorConfig {
    count: 20,
    min: 0,
    max: 100,
    interval_ms: 200,
};

struct TraceApp {
    scope: Entity<ScopeView>,
    handle: ViewerHandle,
    focus_handle: FocusHandle,
}

impl TraceApp {
    fn on_key_down(&mut self, ev: &KeyDownEvent, cx: &mut Context<Self>) {
        let now = Instant::now();
        match ev.keystroke.key.as_str() {
            "g" => {
                let result = self.handle.write(|viewer| viewer.toggle_generator(DEMO_CONFIG, now));
                if let Err(err) = result {
                    eprintln!("start rejected: {err}");
                }
            }
            "c" => {
                if !self.handle.write(|viewer| viewer.clear_samples()) {
                    eprintln!("stop the generator before clearing");
                }
            }
            "s" => {
                if let Err(err) = self.handle.read(|viewer| viewer.save(TRACE_PATH)) {
                    eprintln!("save failed: {err}");
                }
            }
            "l" => match self.handle.write(|viewer| viewer.load(TRACE_PATH)) {
                Ok(count) => println!("loaded {count} samples"),
                Err(err) => eprintln!("load failed: {err}"),
            },
            "r" => self.handle.write(|viewer| viewer.reset_view()),
            _ => return,
        }
        cx.notify();
    }
}

impl Render for TraceApp {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        div()
            .size_full()
            .track_focus(&self.focus_handle)
            .on_key_down(cx.listener(|this, ev, _, cx| {
                this.on_key_down(ev, cx);
            }))
            .child(self.scope.clone())
    }
}

fn main() {
    env_logger::init();

    Application::new().run(|cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(900.0), px(600.0)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, |window, cx| {
            let mut viewer = Viewer::new();
            viewer.set_labels("sample", "value");

            let scope = cx.new(|cx| ScopeView::new(viewer, cx));
            let handle = scope.read(cx).viewer_handle();

            let app = cx.new(|cx| TraceApp {
                scope,
                handle: handle.clone(),
                focus_handle: cx.focus_handle(),
            });

            let app_for_task = app.clone();
            window
                .spawn(cx, move |cx: &mut AsyncWindowContext| {
                    let mut cx = cx.clone();
                    async move {
                        loop {
                            Timer::after(Duration::from_millis(10)).await;
                            cx.update(|_, cx| {
                                app_for_task.update(cx, |app, app_cx| {
                                    let appended =
                                        app.handle.write(|viewer| viewer.pump(Instant::now()));
                                    if appended > 0 {
                                        app_cx.notify();
                                    }
                                });
                            })
                            .ok();
                        }
                    }
                })
                .detach();

            app
        })
        .unwrap();
    });
}
