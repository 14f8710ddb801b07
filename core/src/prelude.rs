use chrono::NaiveDate;

/// Common error type for the tracking core.
#[derive(thiserror::Error, Debug)]
pub enum TrackError {
    #[error("failed to open location log {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed location log: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid timestamp {value:?} on data row {row}")]
    Timestamp { row: usize, value: String },
    #[error("hour {0} is outside 0-23")]
    InvalidHour(u8),
    #[error("date {date} is outside the available range {min} to {max}")]
    DateOutOfRange {
        date: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    },
    #[error("no location data loaded")]
    NoData,
    #[error("no data available for selected date")]
    EmptyMap,
    #[error("map bounds are not finite")]
    InvalidBounds,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("export failed: {0}")]
    Export(String),
}

pub type TrackResult<T> = Result<T, TrackError>;

/// Number of hour buckets in a day.
pub const HOURS_PER_DAY: u8 = 24;

/// Display format used for timestamps in tables and summaries.
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
