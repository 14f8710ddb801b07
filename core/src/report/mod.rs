pub mod summary;

pub use summary::{hours_label, HourShare, MetricRow, SummaryReport};
