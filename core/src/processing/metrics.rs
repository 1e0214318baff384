use crate::filter::FilteredView;
use crate::math::stats::StatsHelper;
use crate::prelude::ViewStage;
use crate::telemetry::log::LogManager;
use serde::Serialize;

/// Displayed in place of a tip metric when the view is empty.
pub const NOT_AVAILABLE: &str = "N/A";

pub fn format_currency(value: f64) -> String {
    format!("${value:.2}")
}

fn currency_or_sentinel(value: Option<f64>) -> String {
    value
        .map(format_currency)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Summary figures for one filtered view.
///
/// Tip aggregates are `None` when no record matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub sales: usize,
    pub total_sales: f64,
    pub average_tip: Option<f64>,
    pub highest_tip: Option<f64>,
    pub lowest_tip: Option<f64>,
}

impl Metrics {
    pub fn sales_label(&self) -> String {
        match self.sales {
            1 => "1 sale".to_string(),
            n => format!("{n} sales"),
        }
    }

    pub fn total_sales_label(&self) -> String {
        format_currency(self.total_sales)
    }

    pub fn average_tip_label(&self) -> String {
        currency_or_sentinel(self.average_tip)
    }

    pub fn highest_tip_label(&self) -> String {
        currency_or_sentinel(self.highest_tip)
    }

    pub fn lowest_tip_label(&self) -> String {
        currency_or_sentinel(self.lowest_tip)
    }
}

/// Computes [`Metrics`] over the filtered view.
pub struct MetricsStage {
    logger: LogManager,
}

impl MetricsStage {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new(),
        }
    }
}

impl Default for MetricsStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewStage for MetricsStage {
    type Output = Metrics;

    fn execute(&self, view: &FilteredView<'_>) -> Metrics {
        let bills = view.bills();
        let tips = view.tips();
        let metrics = Metrics {
            sales: view.len(),
            total_sales: StatsHelper::sum(&bills),
            average_tip: StatsHelper::mean(&tips),
            highest_tip: StatsHelper::max(&tips),
            lowest_tip: StatsHelper::min(&tips),
        };
        self.logger.detail(&format!(
            "MetricsStage sales {} total {:.2}",
            metrics.sales, metrics.total_sales
        ));
        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Day, Gender, Record, Service};

    fn record(total_bill: f64, tip: f64) -> Record {
        Record {
            total_bill,
            tip,
            gender: Gender::Female,
            smoker: true,
            day: Day::Fri,
            service: Service::Lunch,
            size: 2,
        }
    }

    #[test]
    fn single_record_metrics() {
        let only = record(10.0, 1.0);
        let metrics = MetricsStage::new().execute(&FilteredView::new(vec![&only]));
        assert_eq!(metrics.sales, 1);
        assert_eq!(metrics.total_sales, 10.0);
        assert_eq!(metrics.average_tip, Some(1.0));
        assert_eq!(metrics.highest_tip, Some(1.0));
        assert_eq!(metrics.lowest_tip, Some(1.0));
        assert_eq!(metrics.sales_label(), "1 sale");
        assert_eq!(metrics.average_tip_label(), "$1.00");
    }

    #[test]
    fn empty_view_uses_sentinel() {
        let metrics = MetricsStage::new().execute(&FilteredView::default());
        assert_eq!(metrics.sales, 0);
        assert_eq!(metrics.total_sales, 0.0);
        assert!(metrics.total_sales.is_sign_positive());
        assert_eq!(metrics.average_tip, None);
        assert_eq!(metrics.total_sales_label(), "$0.00");
        assert_eq!(metrics.average_tip_label(), NOT_AVAILABLE);
        assert_eq!(metrics.highest_tip_label(), NOT_AVAILABLE);
        assert_eq!(metrics.lowest_tip_label(), NOT_AVAILABLE);
    }

    #[test]
    fn aggregates_several_records() {
        let records = [record(10.0, 1.0), record(20.0, 3.0), record(30.5, 2.0)];
        let view = FilteredView::new(records.iter().collect());
        let metrics = MetricsStage::new().execute(&view);
        assert_eq!(metrics.sales_label(), "3 sales");
        assert!((metrics.total_sales - 60.5).abs() < 1e-9);
        assert!((metrics.average_tip.unwrap() - 2.0).abs() < 1e-9);
        assert_eq!(metrics.highest_tip, Some(3.0));
        assert_eq!(metrics.lowest_tip, Some(1.0));
        assert_eq!(metrics.highest_tip_label(), "$3.00");
    }
}
