pub mod stats;

pub use stats::{LinearFit, StatsHelper};
