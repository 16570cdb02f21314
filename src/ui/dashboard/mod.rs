//! Terminal dashboard.
//!
//! Draws the layout tree of widget panes with ratatui and dispatches key
//! presses back into the configuration.

mod app;
mod event_handler;
mod render;
mod widgets;

pub use app::{run_dashboard, DashboardApp};
pub use event_handler::DashboardEvent;
