// UI module

pub mod dashboard;

// Re-export commonly used items for cleaner imports
pub use dashboard::{run_dashboard, DashboardApp, DashboardEvent};
