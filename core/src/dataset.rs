use crate::prelude::{DashboardError, DashboardResult};
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// The tipping dataset shipped inside every binary.
const BUNDLED_TIPS: &str = include_str!("../data/tips.csv");

/// Column names the loader requires, in source order.
pub const COLUMNS: [&str; 7] = ["total_bill", "tip", "sex", "smoker", "day", "time", "size"];

/// Food service, stored in the `time` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Service {
    Lunch,
    Dinner,
}

impl Service {
    pub const ALL: [Service; 2] = [Service::Lunch, Service::Dinner];

    pub fn label(self) -> &'static str {
        match self {
            Service::Lunch => "Lunch",
            Service::Dinner => "Dinner",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Day {
    Thur,
    Fri,
    Sat,
    Sun,
}

impl Day {
    pub const ALL: [Day; 4] = [Day::Thur, Day::Fri, Day::Sat, Day::Sun];

    pub fn label(self) -> &'static str {
        match self {
            Day::Thur => "Thur",
            Day::Fri => "Fri",
            Day::Sat => "Sat",
            Day::Sun => "Sun",
        }
    }
}

/// Smoker values in display order.
pub const SMOKER_VALUES: [bool; 2] = [true, false];

pub fn smoker_label(smoker: bool) -> &'static str {
    if smoker {
        "Yes"
    } else {
        "No"
    }
}

/// Parses `Yes` / `No` (any case) into the smoker flag.
pub fn parse_smoker(raw: &str) -> DashboardResult<bool> {
    SMOKER_VALUES
        .into_iter()
        .find(|value| smoker_label(*value).eq_ignore_ascii_case(raw.trim()))
        .ok_or_else(|| DashboardError::UnknownCategory(raw.to_string()))
}

macro_rules! display_via_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = DashboardError;

            fn from_str(raw: &str) -> DashboardResult<Self> {
                Self::ALL
                    .into_iter()
                    .find(|value| value.label().eq_ignore_ascii_case(raw.trim()))
                    .ok_or_else(|| DashboardError::UnknownCategory(raw.to_string()))
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        })*
    };
}

display_via_label!(Service, Gender, Day);

/// Serde adapter for the `Yes` / `No` smoker encoding.
pub mod yes_no {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(super::smoker_label(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_smoker(&raw).map_err(D::Error::custom)
    }

    /// Same encoding for an optional list, e.g. `smokers: [Yes, No]`.
    pub mod option_seq {
        use super::super::{parse_smoker, smoker_label};
        use serde::{de::Error, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            values: &Option<Vec<bool>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match values {
                Some(values) => {
                    serializer.collect_seq(values.iter().map(|value| smoker_label(*value)))
                }
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Vec<bool>>, D::Error> {
            Option::<Vec<String>>::deserialize(deserializer)?
                .map(|values| {
                    values
                        .iter()
                        .map(|value| parse_smoker(value))
                        .collect::<Result<Vec<_>, _>>()
                })
                .transpose()
                .map_err(D::Error::custom)
        }
    }
}

/// One tipping observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub total_bill: f64,
    pub tip: f64,
    #[serde(rename = "sex")]
    pub gender: Gender,
    #[serde(with = "yes_no")]
    pub smoker: bool,
    pub day: Day,
    #[serde(rename = "time")]
    pub service: Service,
    pub size: u32,
}

impl Record {
    fn validate(&self, row: usize) -> DashboardResult<()> {
        let invalid = |reason: String| DashboardError::InvalidRecord { row, reason };
        if !self.total_bill.is_finite() || self.total_bill <= 0.0 {
            return Err(invalid(format!(
                "bill total must be positive, got {}",
                self.total_bill
            )));
        }
        if !self.tip.is_finite() || self.tip < 0.0 {
            return Err(invalid(format!(
                "tip must be non-negative, got {}",
                self.tip
            )));
        }
        if self.size == 0 {
            return Err(invalid("party size must be at least 1".into()));
        }
        Ok(())
    }
}

/// Fixed, ordered, read-only sequence of records.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Parses the dataset compiled into the crate.
    pub fn bundled() -> DashboardResult<Self> {
        let dataset = Self::from_reader(BUNDLED_TIPS.as_bytes())?;
        LogManager::new().record(&format!(
            "loaded bundled dataset ({} records)",
            dataset.len()
        ));
        Ok(dataset)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> DashboardResult<Self> {
        let path_ref = path.as_ref();
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path_ref)?;
        let dataset = Self::from_csv(reader)?;
        LogManager::new().record(&format!(
            "loaded dataset {} ({} records)",
            path_ref.display(),
            dataset.len()
        ));
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> DashboardResult<Self> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        Self::from_csv(reader)
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> DashboardResult<Self> {
        let headers = reader.headers()?.clone();
        if let Some(missing) = COLUMNS
            .iter()
            .find(|column| !headers.iter().any(|header| header == **column))
        {
            return Err(DashboardError::MissingColumn((*missing).to_string()));
        }

        let records = reader
            .deserialize::<Record>()
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_records(records)
    }

    /// Builds a dataset from already-parsed records, applying the same checks as the loader.
    pub fn from_records(records: Vec<Record>) -> DashboardResult<Self> {
        if records.is_empty() {
            return Err(DashboardError::EmptyDataset);
        }
        for (idx, record) in records.iter().enumerate() {
            record.validate(idx + 1)?;
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Smallest and largest bill total.
    pub fn bill_bounds(&self) -> (f64, f64) {
        self.records
            .iter()
            .map(|record| record.total_bill)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Smallest and largest party size.
    pub fn size_bounds(&self) -> (u32, u32) {
        self.records
            .iter()
            .map(|record| record.size)
            .fold((u32::MAX, u32::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "total_bill,tip,sex,smoker,day,time,size\n";

    #[test]
    fn bundled_dataset_covers_every_category() {
        let dataset = Dataset::bundled().unwrap();
        assert!(!dataset.is_empty());
        let records = dataset.records();
        for service in Service::ALL {
            assert!(records.iter().any(|r| r.service == service));
        }
        for gender in Gender::ALL {
            assert!(records.iter().any(|r| r.gender == gender));
        }
        for day in Day::ALL {
            assert!(records.iter().any(|r| r.day == day));
        }
        for smoker in SMOKER_VALUES {
            assert!(records.iter().any(|r| r.smoker == smoker));
        }
    }

    #[test]
    fn bundled_dataset_is_the_full_tips_table() {
        let dataset = Dataset::bundled().unwrap();
        let records = dataset.records();
        assert_eq!(dataset.len(), 244);

        let bills: f64 = records.iter().map(|r| r.total_bill).sum();
        let tips: f64 = records.iter().map(|r| r.tip).sum();
        assert!((bills - 4827.77).abs() < 1e-6);
        assert!((tips - 731.58).abs() < 1e-6);

        let count = |day: Day| records.iter().filter(|r| r.day == day).count();
        assert_eq!(
            (count(Day::Thur), count(Day::Fri), count(Day::Sat), count(Day::Sun)),
            (62, 19, 87, 76)
        );
        assert_eq!(
            records
                .iter()
                .filter(|r| r.day == Day::Thur && r.service == Service::Dinner)
                .count(),
            1
        );
        assert_eq!(records.iter().filter(|r| r.smoker).count(), 93);
        assert_eq!(dataset.bill_bounds(), (3.07, 50.81));
        assert_eq!(dataset.size_bounds(), (1, 6));
    }

    #[test]
    fn csv_categories_ignore_case_like_cli_flags() {
        let csv = format!("{HEADER}18.78,3.0,female,no,thur,dinner,2\n");
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        let record = &dataset.records()[0];
        assert_eq!(record.gender, Gender::Female);
        assert_eq!(record.day, Day::Thur);
        assert_eq!(record.service, Service::Dinner);
        assert!(!record.smoker);
    }

    #[test]
    fn reader_parses_source_encodings() {
        let csv = format!("{HEADER}16.99,1.01,Female,No,Sun,Dinner,2\n12.16,2.2,Male,Yes,Fri,Lunch,2\n");
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);

        let first = &dataset.records()[0];
        assert_eq!(first.gender, Gender::Female);
        assert!(!first.smoker);
        assert_eq!(first.day, Day::Sun);
        assert_eq!(first.service, Service::Dinner);

        let second = &dataset.records()[1];
        assert!(second.smoker);
        assert_eq!(second.service, Service::Lunch);
    }

    #[test]
    fn columns_may_appear_in_any_order() {
        let csv = "size,time,day,smoker,sex,tip,total_bill\n3,Lunch,Thur,No,Male,2.5,20.0\n";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.records()[0].total_bill, 20.0);
        assert_eq!(dataset.records()[0].size, 3);
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let csv = "total_bill,tip,sex,smoker,day,size\n10.0,1.0,Male,No,Sun,2\n";
        match Dataset::from_reader(csv.as_bytes()) {
            Err(DashboardError::MissingColumn(column)) => assert_eq!(column, "time"),
            other => panic!("expected missing column, got {other:?}"),
        }
    }

    #[test]
    fn unknown_category_fails_to_parse() {
        let csv = format!("{HEADER}10.0,1.0,Male,Maybe,Sun,Dinner,2\n");
        assert!(matches!(
            Dataset::from_reader(csv.as_bytes()),
            Err(DashboardError::Csv(_))
        ));
    }

    #[test]
    fn non_positive_bill_is_rejected() {
        let csv = format!("{HEADER}10.0,1.0,Male,No,Sun,Dinner,2\n0.0,1.0,Male,No,Sun,Dinner,2\n");
        match Dataset::from_reader(csv.as_bytes()) {
            Err(DashboardError::InvalidRecord { row, .. }) => assert_eq!(row, 2),
            other => panic!("expected invalid record, got {other:?}"),
        }
    }

    #[test]
    fn header_only_file_is_empty_dataset() {
        assert!(matches!(
            Dataset::from_reader(HEADER.as_bytes()),
            Err(DashboardError::EmptyDataset)
        ));
    }

    #[test]
    fn from_path_reads_csv_file() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(HEADER.as_bytes()).unwrap();
        temp.write_all(b"10.0,1.0,Male,No,Sun,Dinner,2\n20.0,3.0,Female,Yes,Sat,Dinner,4\n")
            .unwrap();
        let path = temp.into_temp_path();
        let dataset = Dataset::from_path(&path).unwrap();
        assert_eq!(dataset.bill_bounds(), (10.0, 20.0));
        assert_eq!(dataset.size_bounds(), (2, 4));
    }

    #[test]
    fn categories_parse_case_insensitively() {
        assert_eq!("lunch".parse::<Service>().unwrap(), Service::Lunch);
        assert_eq!(" FEMALE ".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("thur".parse::<Day>().unwrap(), Day::Thur);
        assert!(parse_smoker("yes").unwrap());
        assert!(!parse_smoker("No").unwrap());
        assert!(matches!(
            "Mon".parse::<Day>(),
            Err(DashboardError::UnknownCategory(_))
        ));
    }

    #[test]
    fn smoker_serializes_back_to_yes_no() {
        let csv = format!("{HEADER}10.0,1.0,Male,Yes,Sun,Dinner,2\n");
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        let json = serde_json::to_value(&dataset.records()[0]).unwrap();
        assert_eq!(json["smoker"], "Yes");
        assert_eq!(json["sex"], "Male");
        assert_eq!(json["time"], "Dinner");
    }
}
