use crate::dataset::record::LocationRecord;
use crate::prelude::{TrackError, TrackResult};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Timestamp layout of exported rows; the fraction is written only when non-zero.
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const EXPORT_HEADER: [&str; 4] = ["timestamp", "latitude", "longitude", "zip_file"];

#[derive(Debug, Serialize, Deserialize)]
struct ExportRow {
    timestamp: String,
    latitude: f64,
    longitude: f64,
    zip_file: String,
}

/// Serializes the displayed records as CSV.
pub fn export_csv<'a, I>(records: I) -> TrackResult<String>
where
    I: IntoIterator<Item = &'a LocationRecord>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;
    for record in records {
        writer.serialize(ExportRow {
            timestamp: record.timestamp.format(EXPORT_TIMESTAMP_FORMAT).to_string(),
            latitude: record.latitude,
            longitude: record.longitude,
            zip_file: record.zip_file.clone(),
        })?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| TrackError::Export(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| TrackError::Export(err.to_string()))
}

/// Parses CSV produced by [`export_csv`].
pub fn parse_export(text: &str) -> TrackResult<Vec<LocationRecord>> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    reader
        .deserialize::<ExportRow>()
        .enumerate()
        .map(|(index, row)| {
            let row = row?;
            let timestamp = NaiveDateTime::parse_from_str(&row.timestamp, EXPORT_TIMESTAMP_FORMAT)
                .map_err(|_| TrackError::Timestamp {
                    row: index + 1,
                    value: row.timestamp.clone(),
                })?;
            Ok(LocationRecord::new(
                timestamp,
                row.latitude,
                row.longitude,
                row.zip_file,
            ))
        })
        .collect()
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("location_data_{}.csv", date.format("%Y-%m-%d"))
}
