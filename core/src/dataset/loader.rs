use crate::dataset::record::{
    parse_log_timestamp, LocationDataset, LocationRecord, STORED_TIMESTAMP_FORMAT,
};
use crate::prelude::{TrackError, TrackResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, Deserialize, Serialize)]
struct LogRow {
    timestamp: String,
    latitude: f64,
    longitude: f64,
    zip_file: String,
}

/// Reads a location log from disk. Any unreadable row fails the whole load.
pub fn load_dataset<P: AsRef<Path>>(path: P, year: &str) -> TrackResult<LocationDataset> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref).map_err(|source| TrackError::Io {
        path: path_ref.display().to_string(),
        source,
    })?;
    read_dataset(file, year)
}

/// Parses location log CSV from any reader.
pub fn read_dataset<R: Read>(reader: R, year: &str) -> TrackResult<LocationDataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, row) in csv_reader.deserialize::<LogRow>().enumerate() {
        let row = row?;
        let timestamp =
            parse_log_timestamp(&row.timestamp, year).ok_or_else(|| TrackError::Timestamp {
                row: index + 1,
                value: row.timestamp.clone(),
            })?;
        records.push(LocationRecord::new(
            timestamp,
            row.latitude,
            row.longitude,
            row.zip_file,
        ));
    }

    Ok(LocationDataset::new(records))
}

/// Writes records in the stored log layout (year omitted).
pub fn write_log<W: Write>(writer: W, records: &[LocationRecord]) -> TrackResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(LogRow {
            timestamp: record.timestamp.format(STORED_TIMESTAMP_FORMAT).to_string(),
            latitude: record.latitude,
            longitude: record.longitude,
            zip_file: record.zip_file.clone(),
        })?;
    }
    csv_writer
        .flush()
        .map_err(|err| TrackError::Export(err.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "timestamp,latitude,longitude,zip_file\n\
06-01 08:00:00.000000,35.0,129.0,a.zip\n\
06-01 08:05:00.000000,35.001,129.001,a.zip\n\
06-01 09:00:00.000000,35.1,129.1,b.zip\n";

    #[test]
    fn load_dataset_reads_csv_file() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(SAMPLE.as_bytes()).unwrap();
        let path = temp.into_temp_path();

        let dataset = load_dataset(&path, "2024").unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.records()[2].zip_file, "b.zip");
        assert_eq!(
            dataset.records()[1].timestamp.to_string(),
            "2024-06-01 08:05:00"
        );
    }

    #[test]
    fn load_dataset_reports_missing_file() {
        let err = load_dataset("/definitely/not/here.csv", "2024").unwrap_err();
        assert!(matches!(err, TrackError::Io { .. }));
    }

    #[test]
    fn one_malformed_timestamp_fails_whole_load() {
        let text = format!("{SAMPLE}yesterday,35.2,129.2,c.zip\n");
        let err = read_dataset(text.as_bytes(), "2024").unwrap_err();
        match err {
            TrackError::Timestamp { row, value } => {
                assert_eq!(row, 4);
                assert_eq!(value, "yesterday");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn row_without_fraction_fails_whole_load() {
        let text = format!("{SAMPLE}06-01 10:00:00,35.2,129.2,c.zip\n");
        let err = read_dataset(text.as_bytes(), "2024").unwrap_err();
        assert!(matches!(err, TrackError::Timestamp { row: 4, .. }));
    }

    #[test]
    fn header_only_file_loads_as_empty_dataset() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"timestamp,latitude,longitude,zip_file\n").unwrap();
        let path = temp.into_temp_path();

        let dataset = load_dataset(&path, "2024").unwrap();
        assert!(dataset.is_empty());
        assert!(dataset.date_range().is_none());
    }

    #[test]
    fn non_numeric_latitude_is_a_csv_error() {
        let text = "timestamp,latitude,longitude,zip_file\n06-01 08:00:00.000000,north,129.0,a.zip\n";
        assert!(matches!(
            read_dataset(text.as_bytes(), "2024"),
            Err(TrackError::Csv(_))
        ));
    }

    #[test]
    fn written_log_loads_back() {
        let dataset = read_dataset(SAMPLE.as_bytes(), "2024").unwrap();
        let mut buffer = Vec::new();
        write_log(&mut buffer, dataset.records()).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("06-01 08:05:00.000000"));
        let reloaded = read_dataset(text.as_bytes(), "2024").unwrap();
        assert_eq!(reloaded.records(), dataset.records());
    }
}
