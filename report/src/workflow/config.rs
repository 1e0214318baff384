use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tipscore::{Dataset, Day, FilterState, Gender, RangeFilter, Service};

/// Filter selections read from YAML and/or command-line flags.
///
/// Every field is optional; anything left unset falls back to the dataset defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    pub bill_min: Option<f64>,
    pub bill_max: Option<f64>,
    pub size_min: Option<u32>,
    pub size_max: Option<u32>,
    pub services: Option<Vec<Service>>,
    pub genders: Option<Vec<Gender>>,
    #[serde(with = "tipscore::dataset::yes_no::option_seq")]
    pub smokers: Option<Vec<bool>>,
    pub days: Option<Vec<Day>>,
}

fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

impl FilterConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading filter config {}", path_ref.display()))?;
        let config: FilterConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing filter config {}", path_ref.display()))?;
        Ok(config)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_args(
        bill_min: Option<f64>,
        bill_max: Option<f64>,
        size_min: Option<u32>,
        size_max: Option<u32>,
        services: Vec<Service>,
        genders: Vec<Gender>,
        smokers: Vec<bool>,
        days: Vec<Day>,
    ) -> Self {
        Self {
            bill_min,
            bill_max,
            size_min,
            size_max,
            services: non_empty(services),
            genders: non_empty(genders),
            smokers: non_empty(smokers),
            days: non_empty(days),
        }
    }

    /// Fields set in `overrides` replace the ones in `self`.
    pub fn merge(self, overrides: FilterConfig) -> Self {
        Self {
            bill_min: overrides.bill_min.or(self.bill_min),
            bill_max: overrides.bill_max.or(self.bill_max),
            size_min: overrides.size_min.or(self.size_min),
            size_max: overrides.size_max.or(self.size_max),
            services: overrides.services.or(self.services),
            genders: overrides.genders.or(self.genders),
            smokers: overrides.smokers.or(self.smokers),
            days: overrides.days.or(self.days),
        }
    }

    pub fn to_filter_state(&self, dataset: &Dataset) -> anyhow::Result<FilterState> {
        let defaults = FilterState::defaults_for(dataset);
        let bill = RangeFilter::new(
            self.bill_min.unwrap_or(defaults.bill.min()),
            self.bill_max.unwrap_or(defaults.bill.max()),
        )
        .context("building bill range")?;
        let party_size = RangeFilter::new(
            self.size_min.unwrap_or(defaults.party_size.min()),
            self.size_max.unwrap_or(defaults.party_size.max()),
        )
        .context("building party size range")?;
        Ok(FilterState {
            bill,
            services: selection(&self.services, &defaults.services),
            genders: selection(&self.genders, &defaults.genders),
            smokers: selection(&self.smokers, &defaults.smokers),
            days: selection(&self.days, &defaults.days),
            party_size,
        })
    }
}

fn selection<T: Ord + Copy>(chosen: &Option<Vec<T>>, fallback: &BTreeSet<T>) -> BTreeSet<T> {
    chosen
        .as_ref()
        .map(|values| values.iter().copied().collect())
        .unwrap_or_else(|| fallback.clone())
}
