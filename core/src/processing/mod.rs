pub mod metrics;
pub mod plot;

pub use metrics::{Metrics, MetricsStage};
pub use plot::{PlotBounds, PlotPoint, PlotSpec, PlotStage, TrendLine};
