pub mod track;

pub use track::{build_track, write_location_log, GeneratorConfig};
