use crate::dataset::{Dataset, Day, Gender, Record, Service, SMOKER_VALUES};
use crate::prelude::{DashboardError, DashboardResult};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Closed interval `[min, max]` with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeFilter<T> {
    min: T,
    max: T,
}

impl<T: PartialOrd + Copy + fmt::Display> RangeFilter<T> {
    pub fn new(min: T, max: T) -> DashboardResult<Self> {
        match min.partial_cmp(&max) {
            Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal) => Ok(Self { min, max }),
            _ => Err(DashboardError::InvalidRange(format!(
                "lower bound {min} is not below upper bound {max}"
            ))),
        }
    }

    pub fn min(&self) -> T {
        self.min
    }

    pub fn max(&self) -> T {
        self.max
    }

    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }

    /// Moves the lower bound; the upper bound follows if it would be crossed.
    /// Incomparable values (NaN) leave the range unchanged.
    pub fn with_min(self, min: T) -> Self {
        match min.partial_cmp(&self.max) {
            None => self,
            Some(std::cmp::Ordering::Greater) => Self { min, max: min },
            Some(_) => Self { min, ..self },
        }
    }

    /// Moves the upper bound; the lower bound follows if it would be crossed.
    pub fn with_max(self, max: T) -> Self {
        match max.partial_cmp(&self.min) {
            None => self,
            Some(std::cmp::Ordering::Less) => Self { min: max, max },
            Some(_) => Self { max, ..self },
        }
    }
}

impl<T: fmt::Display> fmt::Display for RangeFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// One selectable value of a multi-select filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Service(Service),
    Gender(Gender),
    Smoker(bool),
    Day(Day),
}

/// A single user interaction with the filter controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterEvent {
    BillMin(f64),
    BillMax(f64),
    PartyMin(u32),
    PartyMax(u32),
    Toggle(Category),
    Reset,
}

/// Current selections of all six filter controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterState {
    pub bill: RangeFilter<f64>,
    pub services: BTreeSet<Service>,
    pub genders: BTreeSet<Gender>,
    pub smokers: BTreeSet<bool>,
    pub days: BTreeSet<Day>,
    pub party_size: RangeFilter<u32>,
}

impl FilterState {
    /// Factory defaults: ranges spanning the whole dataset, every category selected.
    pub fn defaults_for(dataset: &Dataset) -> Self {
        let (bill_lo, bill_hi) = dataset.bill_bounds();
        let (size_lo, size_hi) = dataset.size_bounds();
        Self {
            bill: RangeFilter {
                min: bill_lo.floor(),
                max: bill_hi.ceil(),
            },
            services: Service::ALL.into_iter().collect(),
            genders: Gender::ALL.into_iter().collect(),
            smokers: SMOKER_VALUES.into_iter().collect(),
            days: Day::ALL.into_iter().collect(),
            party_size: RangeFilter {
                min: size_lo,
                max: size_hi,
            },
        }
    }

    /// True when the record passes every predicate.
    pub fn matches(&self, record: &Record) -> bool {
        self.bill.contains(record.total_bill)
            && self.services.contains(&record.service)
            && self.genders.contains(&record.gender)
            && self.smokers.contains(&record.smoker)
            && self.days.contains(&record.day)
            && self.party_size.contains(record.size)
    }

    pub fn is_selected(&self, category: Category) -> bool {
        match category {
            Category::Service(value) => self.services.contains(&value),
            Category::Gender(value) => self.genders.contains(&value),
            Category::Smoker(value) => self.smokers.contains(&value),
            Category::Day(value) => self.days.contains(&value),
        }
    }

    pub fn toggle(&mut self, category: Category) {
        fn flip<T: Ord>(set: &mut BTreeSet<T>, value: T) {
            if !set.remove(&value) {
                set.insert(value);
            }
        }
        match category {
            Category::Service(value) => flip(&mut self.services, value),
            Category::Gender(value) => flip(&mut self.genders, value),
            Category::Smoker(value) => flip(&mut self.smokers, value),
            Category::Day(value) => flip(&mut self.days, value),
        }
    }

    /// Applies one event; `defaults` is the state restored by [`FilterEvent::Reset`].
    pub fn update(&mut self, event: FilterEvent, defaults: &FilterState) {
        match event {
            FilterEvent::BillMin(value) => self.bill = self.bill.with_min(value),
            FilterEvent::BillMax(value) => self.bill = self.bill.with_max(value),
            FilterEvent::PartyMin(value) => self.party_size = self.party_size.with_min(value),
            FilterEvent::PartyMax(value) => self.party_size = self.party_size.with_max(value),
            FilterEvent::Toggle(category) => self.toggle(category),
            FilterEvent::Reset => *self = defaults.clone(),
        }
    }
}

/// Records that pass the active filters, in dataset order.
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    records: Vec<&'a Record>,
}

impl<'a> FilteredView<'a> {
    pub fn new(records: Vec<&'a Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn bills(&self) -> Vec<f64> {
        self.iter().map(|record| record.total_bill).collect()
    }

    pub fn tips(&self) -> Vec<f64> {
        self.iter().map(|record| record.tip).collect()
    }
}

/// Filter engine: the conjunction of all six predicates over the dataset.
pub fn apply<'a>(dataset: &'a Dataset, state: &FilterState) -> FilteredView<'a> {
    FilteredView {
        records: dataset
            .records()
            .iter()
            .filter(|record| state.matches(record))
            .collect(),
    }
}
