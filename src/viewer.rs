//! The viewer aggregate.
//!
//! [`Viewer`] owns the sample buffer, the generator, and the view state,
//! and is the single value the rendering surface locks. Everything the
//! orchestrator does — pump the generator, start/stop, clear, save, load,
//! pan/zoom — goes through one of these methods, which is what serializes
//! buffer mutation.

use std::path::Path;
use std::time::Instant;

use log::debug;

use crate::buffer::SampleBuffer;
use crate::generator::{Generator, GeneratorConfig, GeneratorError};
use crate::persist::{self, PersistError};
use crate::render::{Color, LineStyle, MarkerStyle, RectStyle, TextStyle};
use crate::view::{View, Viewport};

/// Visual configuration for the sample surface.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Window and plot background.
    pub background: Color,
    /// Polyline connecting the samples.
    pub trace: LineStyle,
    /// Sample markers.
    pub marker: MarkerStyle,
    /// Zoom-selection overlay.
    pub selection: RectStyle,
    /// Axis tick labels and the cursor readout.
    pub text: TextStyle,
    /// Axis frame and tick strokes.
    pub frame: LineStyle,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::new(0.08, 0.09, 0.11, 1.0),
            trace: LineStyle {
                color: Color::new(0.2, 0.8, 0.9, 1.0),
                width: 1.0,
            },
            marker: MarkerStyle {
                color: Color::new(0.2, 0.8, 0.9, 1.0),
                size: 3.0,
            },
            selection: RectStyle {
                fill: Color::new(0.0, 0.0, 1.0, 0.2),
                stroke: Color::new(0.0, 0.0, 1.0, 1.0),
                stroke_width: 1.0,
            },
            text: TextStyle {
                color: Color::new(0.8, 0.82, 0.85, 1.0),
                size: 11.0,
            },
            frame: LineStyle {
                color: Color::new(0.35, 0.37, 0.4, 1.0),
                width: 1.0,
            },
        }
    }
}

/// Sample stream, generator, and view state behind one handle.
#[derive(Debug, Default)]
pub struct Viewer {
    buffer: SampleBuffer,
    generator: Generator,
    theme: Theme,
    x_label: String,
    y_label: String,
    view: View,
    viewport: Option<Viewport>,
}

impl Viewer {
    /// Create a viewer with an empty buffer and a stopped generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a viewer with a deterministic generator seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            generator: Generator::from_seed(seed),
            ..Self::default()
        }
    }

    /// Access the sample buffer.
    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    /// Access the generator.
    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// Access the theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Replace the theme.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// X axis label text.
    pub fn x_label(&self) -> &str {
        &self.x_label
    }

    /// Y axis label text.
    pub fn y_label(&self) -> &str {
        &self.y_label
    }

    /// Set both axis labels.
    pub fn set_labels(&mut self, x: impl Into<String>, y: impl Into<String>) {
        self.x_label = x.into();
        self.y_label = y.into();
    }

    /// Fire any generator deadlines elapsed at `now`.
    ///
    /// The host timer calls this; it is the only place generation touches
    /// the buffer. Returns the number of samples appended.
    pub fn pump(&mut self, now: Instant) -> usize {
        self.generator.poll(now, &mut self.buffer)
    }

    /// Start generating with the buffer length as the continuation point.
    pub fn start_generator(
        &mut self,
        config: GeneratorConfig,
        now: Instant,
    ) -> Result<(), GeneratorError> {
        self.generator.start(config, self.buffer.len() as u64, now)
    }

    /// Stop generating.
    pub fn stop_generator(&mut self) {
        self.generator.stop();
    }

    /// Start if stopped, stop if running. Returns the error of a rejected
    /// start.
    pub fn toggle_generator(
        &mut self,
        config: GeneratorConfig,
        now: Instant,
    ) -> Result<(), GeneratorError> {
        if self.generator.is_running() {
            self.generator.stop();
            Ok(())
        } else {
            self.start_generator(config, now)
        }
    }

    /// Clear the buffer, unless the generator is running.
    ///
    /// Returns whether anything was cleared.
    pub fn clear_samples(&mut self) -> bool {
        if self.generator.is_running() {
            debug!("clear refused while generating");
            return false;
        }
        self.buffer.clear();
        self.reset_view();
        true
    }

    /// Save the buffer to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        persist::save(&self.buffer, path)
    }

    /// Load `path`, replacing the buffer wholesale.
    ///
    /// The buffer is untouched on failure. On success the view resets to
    /// auto-fit so the loaded data is visible.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<usize, PersistError> {
        let loaded = persist::load_into(&mut self.buffer, path)?;
        self.reset_view();
        Ok(loaded)
    }

    /// The current viewport, if one has been computed.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// The active view mode.
    pub fn view(&self) -> View {
        self.view
    }

    /// Hold the given viewport; pan/zoom gestures land here.
    pub fn set_manual_view(&mut self, viewport: Viewport) {
        self.view = View::Manual;
        self.viewport = Some(viewport);
    }

    /// Return to auto-fit.
    pub fn reset_view(&mut self) {
        self.view = View::AutoFit;
        self.viewport = None;
    }

    /// Recompute the viewport for the current view mode and data.
    ///
    /// Auto-fit tracks the padded data bounds; manual keeps whatever the
    /// user navigated to. Called by the frame builder every frame.
    pub fn refresh_viewport(&mut self, padding_frac: f64, min_padding: f64) -> Option<Viewport> {
        match self.view {
            View::AutoFit => {
                if let Some(bounds) = self.buffer.bounds() {
                    self.viewport = Some(bounds.padded(padding_frac, min_padding));
                }
            }
            View::Manual => {
                if self.viewport.is_none() {
                    self.viewport = self.buffer.bounds();
                }
            }
        }
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Range;
    use std::time::Duration;

    fn config() -> GeneratorConfig {
        GeneratorConfig {
            count: 3,
            min: 0,
            max: 10,
            interval_ms: 50,
        }
    }

    #[test]
    fn pump_appends_through_the_generator() {
        let mut viewer = Viewer::from_seed(1);
        let now = Instant::now();
        viewer.start_generator(config(), now).unwrap();
        assert_eq!(viewer.pump(now + Duration::from_millis(50)), 3);
        assert_eq!(viewer.buffer().len(), 3);
    }

    #[test]
    fn toggle_starts_then_stops() {
        let mut viewer = Viewer::from_seed(1);
        let now = Instant::now();
        viewer.toggle_generator(config(), now).unwrap();
        assert!(viewer.generator().is_running());
        viewer.toggle_generator(config(), now).unwrap();
        assert!(!viewer.generator().is_running());
    }

    #[test]
    fn start_continues_x_from_buffer_length() {
        let mut viewer = Viewer::from_seed(1);
        let now = Instant::now();
        viewer.start_generator(config(), now).unwrap();
        viewer.pump(now + Duration::from_millis(50));
        viewer.stop_generator();

        viewer
            .start_generator(config(), now + Duration::from_millis(60))
            .unwrap();
        viewer.pump(now + Duration::from_millis(110));
        let snapshot = viewer.buffer().snapshot();
        assert_eq!(snapshot.get(3).map(|sample| sample.x), Some(3.0));
    }

    #[test]
    fn clear_is_refused_while_generating() {
        let mut viewer = Viewer::from_seed(1);
        let now = Instant::now();
        viewer.start_generator(config(), now).unwrap();
        viewer.pump(now + Duration::from_millis(50));
        assert!(!viewer.clear_samples());
        assert_eq!(viewer.buffer().len(), 3);

        viewer.stop_generator();
        assert!(viewer.clear_samples());
        assert!(viewer.buffer().is_empty());
    }

    #[test]
    fn manual_view_survives_refresh() {
        let mut viewer = Viewer::from_seed(1);
        viewer.set_manual_view(Viewport::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0)));
        let viewport = viewer.refresh_viewport(0.05, 1e-6).unwrap();
        assert_eq!(viewport.x.min, 0.0);
        assert_eq!(viewport.x.max, 1.0);
        assert_eq!(viewer.view(), View::Manual);
    }

    #[test]
    fn auto_fit_tracks_data_bounds() {
        let mut viewer = Viewer::from_seed(1);
        let now = Instant::now();
        viewer.start_generator(config(), now).unwrap();
        viewer.pump(now + Duration::from_millis(50));

        let viewport = viewer.refresh_viewport(0.0, 0.0).unwrap();
        assert_eq!(viewport.x.min, 0.0);
        assert_eq!(viewport.x.max, 2.0);
    }

    #[test]
    fn load_resets_to_auto_fit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.csv");

        let mut viewer = Viewer::from_seed(1);
        let now = Instant::now();
        viewer.start_generator(config(), now).unwrap();
        viewer.pump(now + Duration::from_millis(50));
        viewer.stop_generator();
        viewer.save(&path).unwrap();

        viewer.set_manual_view(Viewport::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0)));
        assert_eq!(viewer.load(&path).unwrap(), 3);
        assert_eq!(viewer.view(), View::AutoFit);
    }
}
