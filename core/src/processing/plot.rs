use crate::filter::FilteredView;
use crate::math::stats::{LinearFit, StatsHelper};
use crate::prelude::ViewStage;
use crate::telemetry::log::LogManager;
use serde::Serialize;

pub const PLOT_TITLE: &str = "Total Bill vs Tip";
pub const EMPTY_PLOT_TITLE: &str = "No data available";
pub const X_LABEL: &str = "Total Bill ($)";
pub const Y_LABEL: &str = "Tip ($)";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

/// Fitted line drawn across the observed bill range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendLine {
    pub fit: LinearFit,
    pub start: PlotPoint,
    pub end: PlotPoint,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Declarative scatter chart: the UI shell decides how to draw it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<PlotPoint>,
    pub trend: Option<TrendLine>,
}

impl PlotSpec {
    /// Extent of every point and trend endpoint, or `None` for an empty chart.
    pub fn bounds(&self) -> Option<PlotBounds> {
        let trend_points = self
            .trend
            .iter()
            .flat_map(|trend| [trend.start, trend.end]);
        self.points
            .iter()
            .copied()
            .chain(trend_points)
            .fold(None, |acc: Option<PlotBounds>, p| {
                Some(match acc {
                    None => PlotBounds {
                        x_min: p.x,
                        x_max: p.x,
                        y_min: p.y,
                        y_max: p.y,
                    },
                    Some(b) => PlotBounds {
                        x_min: b.x_min.min(p.x),
                        x_max: b.x_max.max(p.x),
                        y_min: b.y_min.min(p.y),
                        y_max: b.y_max.max(p.y),
                    },
                })
            })
    }
}

/// Builds the tip-vs-bill scatter and its least-squares trend line.
pub struct PlotStage {
    logger: LogManager,
}

impl PlotStage {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new(),
        }
    }
}

impl Default for PlotStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewStage for PlotStage {
    type Output = PlotSpec;

    fn execute(&self, view: &FilteredView<'_>) -> PlotSpec {
        let bills = view.bills();
        let tips = view.tips();
        let points = bills
            .iter()
            .zip(&tips)
            .map(|(&x, &y)| PlotPoint { x, y })
            .collect::<Vec<_>>();

        let trend = StatsHelper::least_squares(&bills, &tips).and_then(|fit| {
            let x_min = StatsHelper::min(&bills)?;
            let x_max = StatsHelper::max(&bills)?;
            Some(TrendLine {
                fit,
                start: PlotPoint {
                    x: x_min,
                    y: fit.predict(x_min),
                },
                end: PlotPoint {
                    x: x_max,
                    y: fit.predict(x_max),
                },
            })
        });
        if trend.is_none() && !points.is_empty() {
            self.logger.detail(&format!(
                "PlotStage trend line suppressed for {} point(s)",
                points.len()
            ));
        }

        let title = if points.is_empty() {
            EMPTY_PLOT_TITLE
        } else {
            PLOT_TITLE
        };
        PlotSpec {
            title: title.to_string(),
            x_label: X_LABEL.to_string(),
            y_label: Y_LABEL.to_string(),
            points,
            trend,
        }
    }
}
