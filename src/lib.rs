//! livetrace is an interactive viewer for a synthetically generated,
//! append-only sample stream. A periodic generator appends bounded random
//! samples to a buffer, a GPUI surface renders them with pan, zoom-to-
//! selection, and a live cursor readout, and a CSV layer round-trips the
//! series to disk.

#![forbid(unsafe_code)]

pub mod buffer;
pub mod controller;
pub mod generator;
pub mod geom;
pub mod gpui_backend;
pub mod persist;
pub mod render;
pub mod transform;
pub mod view;
pub mod viewer;

pub use buffer::{BufferError, Sample, SampleBuffer, Snapshot};
pub use controller::{CursorReadout, ViewportController, ViewportMode};
pub use generator::{Generator, GeneratorConfig, GeneratorError, RunState};
pub use geom::{Point, ScreenPoint, ScreenRect};
pub use gpui_backend::{ScopeView, ScopeViewConfig, ViewerHandle};
pub use persist::{PersistError, load, load_into, read_csv, save, write_csv};
pub use render::{Color, LineStyle, MarkerStyle, RectStyle, TextStyle};
pub use transform::Transform;
pub use view::{Range, View, Viewport};
pub use viewer::{Theme, Viewer};
