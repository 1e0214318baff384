use crate::dataset::Dataset;
use crate::filter::{self, FilterEvent, FilterState};
use crate::prelude::ViewStage;
use crate::processing::{Metrics, MetricsStage, PlotSpec, PlotStage};
use crate::telemetry::log::LogManager;
use serde::Serialize;

/// Everything the UI renders for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub matched: usize,
    pub total: usize,
    pub metrics: Metrics,
    pub plot: PlotSpec,
}

/// Single dispatch point: owns the dataset and the filter state and recomputes
/// the snapshot synchronously after every event.
pub struct Dashboard {
    dataset: Dataset,
    defaults: FilterState,
    filter: FilterState,
    metrics_stage: MetricsStage,
    plot_stage: PlotStage,
    snapshot: Snapshot,
    logger: LogManager,
}

impl Dashboard {
    pub fn new(dataset: Dataset) -> Self {
        let defaults = FilterState::defaults_for(&dataset);
        Self::with_filter(dataset, defaults)
    }

    /// Starts from a custom filter state; reset still restores the dataset defaults.
    pub fn with_filter(dataset: Dataset, filter: FilterState) -> Self {
        let defaults = FilterState::defaults_for(&dataset);
        let metrics_stage = MetricsStage::new();
        let plot_stage = PlotStage::new();
        let snapshot = compute(&dataset, &filter, &metrics_stage, &plot_stage);
        Self {
            dataset,
            defaults,
            filter,
            metrics_stage,
            plot_stage,
            snapshot,
            logger: LogManager::new(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn defaults(&self) -> &FilterState {
        &self.defaults
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn dispatch(&mut self, event: FilterEvent) -> &Snapshot {
        self.filter.update(event, &self.defaults);
        self.snapshot = compute(
            &self.dataset,
            &self.filter,
            &self.metrics_stage,
            &self.plot_stage,
        );
        self.logger.detail(&format!(
            "{:?} -> {} of {} records, trend line {}",
            event,
            self.snapshot.matched,
            self.snapshot.total,
            if self.snapshot.plot.trend.is_some() {
                "shown"
            } else {
                "hidden"
            }
        ));
        &self.snapshot
    }

    pub fn reset(&mut self) -> &Snapshot {
        self.dispatch(FilterEvent::Reset)
    }
}

fn compute(
    dataset: &Dataset,
    filter: &FilterState,
    metrics_stage: &MetricsStage,
    plot_stage: &PlotStage,
) -> Snapshot {
    let view = filter::apply(dataset, filter);
    Snapshot {
        matched: view.len(),
        total: dataset.len(),
        metrics: metrics_stage.execute(&view),
        plot: plot_stage.execute(&view),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Day, Gender, Record, Service};
    use crate::filter::Category;
    use crate::processing::metrics::NOT_AVAILABLE;

    fn record(total_bill: f64, tip: f64) -> Record {
        Record {
            total_bill,
            tip,
            gender: Gender::Male,
            smoker: false,
            day: Day::Thur,
            service: Service::Lunch,
            size: 2,
        }
    }

    fn two_record_dashboard() -> Dashboard {
        Dashboard::new(Dataset::from_records(vec![record(10.0, 1.0), record(20.0, 3.0)]).unwrap())
    }

    #[test]
    fn initial_snapshot_covers_dataset() {
        let dashboard = two_record_dashboard();
        let snapshot = dashboard.snapshot();
        assert_eq!(snapshot.matched, 2);
        assert_eq!(snapshot.total, 2);
        assert!(snapshot.plot.trend.is_some());
    }

    #[test]
    fn narrowing_bill_range_to_one_record() {
        let mut dashboard = two_record_dashboard();
        dashboard.dispatch(FilterEvent::BillMin(0.0));
        let snapshot = dashboard.dispatch(FilterEvent::BillMax(15.0));
        assert_eq!(snapshot.matched, 1);
        assert_eq!(snapshot.metrics.total_sales, 10.0);
        assert_eq!(snapshot.metrics.average_tip, Some(1.0));
        assert_eq!(snapshot.metrics.highest_tip, Some(1.0));
        assert_eq!(snapshot.metrics.lowest_tip, Some(1.0));
        assert!(snapshot.plot.trend.is_none());
        assert_eq!(snapshot.plot.points.len(), 1);
    }

    #[test]
    fn empty_selection_yields_sentinels() {
        let mut dashboard = two_record_dashboard();
        let snapshot = dashboard.dispatch(FilterEvent::Toggle(Category::Service(Service::Lunch)));
        assert_eq!(snapshot.matched, 0);
        assert_eq!(snapshot.metrics.total_sales, 0.0);
        assert_eq!(snapshot.metrics.average_tip_label(), NOT_AVAILABLE);
        assert!(snapshot.plot.points.is_empty());
    }

    #[test]
    fn reset_recovers_full_view() {
        let mut dashboard = two_record_dashboard();
        let before = dashboard.snapshot().clone();
        dashboard.dispatch(FilterEvent::PartyMin(3));
        assert_eq!(dashboard.snapshot().matched, 0);

        let after = dashboard.reset();
        assert_eq!(after, &before);
        assert_eq!(dashboard.filter(), dashboard.defaults());
    }

    #[test]
    fn custom_start_filter_resets_to_defaults() {
        let dataset = Dataset::from_records(vec![record(10.0, 1.0), record(20.0, 3.0)]).unwrap();
        let mut filter = FilterState::defaults_for(&dataset);
        filter.days.clear();
        let mut dashboard = Dashboard::with_filter(dataset, filter);
        assert_eq!(dashboard.snapshot().matched, 0);
        assert_eq!(dashboard.reset().matched, 2);
    }

    #[test]
    fn snapshot_serializes_sentinels_as_null() {
        let mut dashboard = two_record_dashboard();
        dashboard.dispatch(FilterEvent::Toggle(Category::Gender(Gender::Male)));
        let json = serde_json::to_value(dashboard.snapshot()).unwrap();
        assert!(json["metrics"]["average_tip"].is_null());
        assert_eq!(json["metrics"]["total_sales"].as_f64(), Some(0.0));
        assert!(!json.to_string().contains("-0.0"));
        assert_eq!(json["plot"]["title"], "No data available");
    }
}
