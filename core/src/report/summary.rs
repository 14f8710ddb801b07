use crate::dataset::LocationRecord;
use crate::math::stats::StatsHelper;
use crate::prelude::DISPLAY_TIMESTAMP_FORMAT;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};

const NOT_AVAILABLE: &str = "N/A";

/// Point count and share of one hour bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourShare {
    pub hour: u8,
    pub count: usize,
    pub percentage: f64,
}

impl HourShare {
    pub fn label(&self) -> String {
        hour_label(self.hour)
    }

    pub fn percentage_label(&self) -> String {
        format!("{:.1}%", self.percentage)
    }
}

/// One row of the statistics table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricRow {
    pub metric: String,
    pub value: String,
}

/// Aggregate statistics over the records currently shown.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryReport {
    pub total_points: usize,
    pub unique_zips: usize,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub first_location: Option<(f64, f64)>,
    pub last_location: Option<(f64, f64)>,
    pub hour_distribution: Vec<HourShare>,
}

impl SummaryReport {
    pub fn from_records(records: &[&LocationRecord]) -> Self {
        let total_points = records.len();
        let unique_zips = records
            .iter()
            .map(|record| record.zip_file.as_str())
            .collect::<HashSet<_>>()
            .len();

        // min_by_key keeps the first of equal keys, max_by_key the last.
        let first = records.iter().min_by_key(|record| record.timestamp);
        let last = records.iter().max_by_key(|record| record.timestamp);

        let mut counts: BTreeMap<u8, usize> = BTreeMap::new();
        for record in records {
            *counts.entry(record.hour()).or_default() += 1;
        }
        let hour_distribution = counts
            .into_iter()
            .map(|(hour, count)| HourShare {
                hour,
                count,
                percentage: StatsHelper::percentage(count, total_points),
            })
            .collect();

        Self {
            total_points,
            unique_zips,
            start_time: first.map(|record| record.timestamp),
            end_time: last.map(|record| record.timestamp),
            first_location: first.map(|record| (record.latitude, record.longitude)),
            last_location: last.map(|record| (record.latitude, record.longitude)),
            hour_distribution,
        }
    }

    pub fn start_label(&self) -> String {
        format_timestamp(self.start_time)
    }

    pub fn end_label(&self) -> String {
        format_timestamp(self.end_time)
    }

    pub fn first_location_label(&self) -> String {
        format_location(self.first_location)
    }

    pub fn last_location_label(&self) -> String {
        format_location(self.last_location)
    }

    /// Rows of the statistics table. The time and location rows are only
    /// included when `extended` is set.
    pub fn metric_rows(&self, extended: bool) -> Vec<MetricRow> {
        let mut rows = vec![
            MetricRow {
                metric: "1. Total Coordinates".into(),
                value: StatsHelper::group_thousands(self.total_points),
            },
            MetricRow {
                metric: "2. Unique ZIP Files".into(),
                value: StatsHelper::group_thousands(self.unique_zips),
            },
        ];
        if extended {
            rows.extend([
                MetricRow {
                    metric: "3. Start Time".into(),
                    value: self.start_label(),
                },
                MetricRow {
                    metric: "4. End Time".into(),
                    value: self.end_label(),
                },
                MetricRow {
                    metric: "5. First Location".into(),
                    value: self.first_location_label(),
                },
                MetricRow {
                    metric: "6. Last Location".into(),
                    value: self.last_location_label(),
                },
            ]);
        }
        rows
    }
}

pub fn hour_label(hour: u8) -> String {
    format!("{:02}:00", hour)
}

/// Comma-separated `HH:00` labels in ascending hour order.
pub fn hours_label(hours: &BTreeSet<u8>) -> String {
    hours
        .iter()
        .map(|&hour| hour_label(hour))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_timestamp(timestamp: Option<NaiveDateTime>) -> String {
    timestamp
        .map(|ts| ts.format(DISPLAY_TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn format_location(location: Option<(f64, f64)>) -> String {
    location
        .map(|(lat, lon)| format!("({:.6}, {:.6})", lat, lon))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str, lat: f64, lon: f64, zip: &str) -> LocationRecord {
        LocationRecord::new(
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").unwrap(),
            lat,
            lon,
            zip,
        )
    }

    fn scenario() -> Vec<LocationRecord> {
        vec![
            record("2024-06-01 08:00:00", 35.0, 129.0, "a.zip"),
            record("2024-06-01 08:05:00", 35.001, 129.001, "a.zip"),
            record("2024-06-01 09:00:00", 35.1, 129.1, "b.zip"),
        ]
    }

    #[test]
    fn summary_of_full_day() {
        let records = scenario();
        let refs: Vec<&LocationRecord> = records.iter().collect();
        let report = SummaryReport::from_records(&refs);

        assert_eq!(report.total_points, 3);
        assert_eq!(report.unique_zips, 2);
        assert_eq!(report.start_label(), "2024-06-01 08:00:00");
        assert_eq!(report.end_label(), "2024-06-01 09:00:00");
        assert_eq!(report.first_location_label(), "(35.000000, 129.000000)");
        assert_eq!(report.last_location_label(), "(35.100000, 129.100000)");

        let labels: Vec<(String, usize, String)> = report
            .hour_distribution
            .iter()
            .map(|share| (share.label(), share.count, share.percentage_label()))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("08:00".to_string(), 2, "66.7%".to_string()),
                ("09:00".to_string(), 1, "33.3%".to_string()),
            ]
        );
    }

    #[test]
    fn distribution_sums_to_total() {
        let mut records = scenario();
        records.push(record("2024-06-01 13:10:00", 35.2, 129.2, "c.zip"));
        records.push(record("2024-06-01 13:20:00", 35.2, 129.2, "c.zip"));
        records.push(record("2024-06-01 22:00:00", 35.3, 129.3, "c.zip"));
        let refs: Vec<&LocationRecord> = records.iter().collect();
        let report = SummaryReport::from_records(&refs);

        let count_sum: usize = report.hour_distribution.iter().map(|s| s.count).sum();
        let pct_sum: f64 = report.hour_distribution.iter().map(|s| s.percentage).sum();
        assert_eq!(count_sum, report.total_points);
        assert!((pct_sum - 100.0).abs() <= 0.05 * report.hour_distribution.len() as f64);
    }

    #[test]
    fn first_and_last_follow_timestamps_not_order() {
        let records = vec![
            record("2024-06-01 09:00:00", 35.1, 129.1, "b.zip"),
            record("2024-06-01 08:00:00", 35.0, 129.0, "a.zip"),
        ];
        let refs: Vec<&LocationRecord> = records.iter().collect();
        let report = SummaryReport::from_records(&refs);
        assert_eq!(report.first_location, Some((35.0, 129.0)));
        assert_eq!(report.last_location, Some((35.1, 129.1)));
    }

    #[test]
    fn empty_set_reports_not_available() {
        let report = SummaryReport::from_records(&[]);
        assert_eq!(report.total_points, 0);
        assert!(report.hour_distribution.is_empty());
        let rows = report.metric_rows(true);
        assert_eq!(rows.len(), 6);
        assert!(rows[2..].iter().all(|row| row.value == "N/A"));
        assert_eq!(report.metric_rows(false).len(), 2);
    }

    #[test]
    fn hours_label_is_sorted() {
        let hours: BTreeSet<u8> = [9, 8, 14].into_iter().collect();
        assert_eq!(hours_label(&hours), "08:00, 09:00, 14:00");
    }
}
