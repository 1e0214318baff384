//! Filtering, aggregation and trend-fit core for the restaurant tipping dashboard.
//!
//! The modules follow the dashboard's recompute pipeline: a loaded dataset is
//! narrowed by the current filter state, and the resulting view feeds the
//! metric and plot stages that the UI shell renders.

pub mod dataset;
pub mod filter;
pub mod math;
pub mod pipeline;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use dataset::{Dataset, Day, Gender, Record, Service};
pub use filter::{Category, FilterEvent, FilterState, FilteredView, RangeFilter};
pub use pipeline::{Dashboard, Snapshot};
pub use prelude::{DashboardError, DashboardResult, ViewStage};
pub use math::LinearFit;
pub use processing::{Metrics, PlotSpec};
