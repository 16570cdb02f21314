//! Metric sampling core.
//!
//! Samplers collect into bounded series on their own timers, publish through
//! render handles, and are started lazily by the widget cache. Nothing in
//! here knows about the terminal.

pub mod cache;
pub mod handles;
mod layout;
pub mod runtime;
mod series;
pub mod sources;
pub mod tasks;

pub use cache::WidgetCache;
pub use handles::{ChartHandle, ChartState, TextHandle, TextState, ValueFormat, WidgetHandle};
pub use layout::{layout, LayoutNode, LayoutOptions, Orientation};
pub use runtime::{MetricsRuntime, SamplerFailure, SamplerSpawner};
pub use series::{has_data, BoundedSeries, NO_DATA};
pub use sources::{MetricSource, SourceFactory, SysinfoSource};
