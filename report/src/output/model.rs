use serde::Serialize;
use tipscore::{FilterState, Snapshot};

/// Result of a headless run: the filter that was applied and what it produced.
#[derive(Debug, Clone, Serialize)]
pub struct ReportModel {
    pub filter: FilterState,
    pub snapshot: Snapshot,
}

impl ReportModel {
    pub fn summary_lines(&self) -> Vec<String> {
        let metrics = &self.snapshot.metrics;
        let trend = match &self.snapshot.plot.trend {
            Some(trend) => format!(
                "tip = {:.4} * bill + {:.4}",
                trend.fit.slope, trend.fit.intercept
            ),
            None => "not drawn (fewer than two distinct bills)".to_string(),
        };
        vec![
            format!(
                "Records: {} of {}",
                self.snapshot.matched, self.snapshot.total
            ),
            format!(
                "Total Sales: {} ({})",
                metrics.sales_label(),
                metrics.total_sales_label()
            ),
            format!("Average Tip: {}", metrics.average_tip_label()),
            format!("Highest Tip: {}", metrics.highest_tip_label()),
            format!("Lowest Tip: {}", metrics.lowest_tip_label()),
            format!("Trend line: {trend}"),
        ]
    }

    /// Compact single-line form appended to the run log.
    pub fn log_line(&self) -> String {
        let metrics = &self.snapshot.metrics;
        format!(
            "matched={} total={} sales={:.2} avg_tip={} max_tip={} min_tip={} trend={}\n",
            self.snapshot.matched,
            self.snapshot.total,
            metrics.total_sales,
            metrics.average_tip_label(),
            metrics.highest_tip_label(),
            metrics.lowest_tip_label(),
            self.snapshot.plot.trend.is_some()
        )
    }
}
