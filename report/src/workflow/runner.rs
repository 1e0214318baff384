use crate::output::model::ReportModel;
use crate::workflow::config::FilterConfig;
use anyhow::Context;
use tipscore::{Dashboard, Dataset};

/// Runs the dashboard pipeline once for a fixed filter configuration.
#[derive(Clone)]
pub struct Runner {
    config: FilterConfig,
}

impl Runner {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self, dataset: Dataset) -> anyhow::Result<ReportModel> {
        let filter = self
            .config
            .to_filter_state(&dataset)
            .context("building filter state")?;
        let dashboard = Dashboard::with_filter(dataset, filter);
        log::info!(
            "report matched {} of {} records",
            dashboard.snapshot().matched,
            dashboard.snapshot().total
        );

        Ok(ReportModel {
            filter: dashboard.filter().clone(),
            snapshot: dashboard.snapshot().clone(),
        })
    }
}
