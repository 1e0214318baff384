use crate::filter::FilteredView;

/// Common error type for loading the dataset and building filter state.
#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    #[error("reading dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset is missing column `{0}`")]
    MissingColumn(String),
    #[error("invalid record at row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },
    #[error("unknown category value `{0}`")]
    UnknownCategory(String),
    #[error("dataset contains no records")]
    EmptyDataset,
    #[error("invalid range: {0}")]
    InvalidRange(String),
}

pub type DashboardResult<T> = Result<T, DashboardError>;

/// A pure computation over the current filtered view.
///
/// Stages never fail: an empty or degenerate view is a normal input and each
/// stage encodes it in its output.
pub trait ViewStage {
    type Output;

    fn execute(&self, view: &FilteredView<'_>) -> Self::Output;
}
