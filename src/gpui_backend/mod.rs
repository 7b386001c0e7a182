//! GPUI integration for livetrace.
//!
//! This module provides a GPUI view that renders a [`Viewer`](crate::viewer::Viewer)
//! and forwards raw pointer and modifier events to the
//! [`ViewportController`](crate::controller::ViewportController).

mod config;
mod frame;
mod paint;
mod view;

pub use config::ScopeViewConfig;
pub use view::{ScopeView, ViewerHandle};
