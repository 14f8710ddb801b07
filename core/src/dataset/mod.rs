pub mod cache;
pub mod export;
pub mod loader;
pub mod record;

pub use cache::{DatasetCache, LoadOutcome};
pub use export::{export_csv, export_file_name, parse_export};
pub use loader::{load_dataset, read_dataset, write_log};
pub use record::{LocationDataset, LocationRecord};
