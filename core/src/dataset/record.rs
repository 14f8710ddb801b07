use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Year prefixed onto stored timestamps, which omit it.
pub const DEFAULT_TIMESTAMP_YEAR: &str = "2024";

/// Format of a stored timestamp once the year has been prefixed.
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Format used when writing timestamps back in the stored `MM-DD` layout.
pub const STORED_TIMESTAMP_FORMAT: &str = "%m-%d %H:%M:%S%.6f";

/// One timestamped position from the location log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub timestamp: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
    pub zip_file: String,
}

impl LocationRecord {
    pub fn new(
        timestamp: NaiveDateTime,
        latitude: f64,
        longitude: f64,
        zip_file: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            latitude,
            longitude,
            zip_file: zip_file.into(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Hour-of-day bucket, 0 through 23.
    pub fn hour(&self) -> u8 {
        self.timestamp.hour() as u8
    }
}

/// Most fraction digits a stored timestamp may carry (microseconds).
const MAX_FRACTION_DIGITS: usize = 6;

/// Parses a stored `MM-DD HH:MM:SS.ffffff` timestamp by prefixing `year`.
///
/// The fractional part is mandatory and holds one to six digits.
pub fn parse_log_timestamp(raw: &str, year: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    let (_, fraction) = raw.rsplit_once('.')?;
    if fraction.is_empty()
        || fraction.len() > MAX_FRACTION_DIGITS
        || !fraction.bytes().all(|byte| byte.is_ascii_digit())
    {
        return None;
    }
    let prefixed = format!("{}-{}", year.trim(), raw);
    NaiveDateTime::parse_from_str(&prefixed, LOG_TIMESTAMP_FORMAT).ok()
}

/// The loaded location log. Read-only once constructed; every filter derives a
/// new view over it.
#[derive(Debug, Clone, Default)]
pub struct LocationDataset {
    records: Vec<LocationRecord>,
}

impl LocationDataset {
    pub fn new(records: Vec<LocationRecord>) -> Self {
        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[LocationRecord] {
        &self.records
    }

    /// Distinct calendar dates present, ascending.
    pub fn available_dates(&self) -> Vec<NaiveDate> {
        self.records
            .iter()
            .map(LocationRecord::date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Earliest and latest date, or `None` for an empty log.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(LocationRecord::date).min()?;
        let max = self.records.iter().map(LocationRecord::date).max()?;
        Some((min, max))
    }

    /// Records whose date matches `date`, in dataset order.
    pub fn records_on(&self, date: NaiveDate) -> Vec<&LocationRecord> {
        self.records
            .iter()
            .filter(|record| record.date() == date)
            .collect()
    }
}
