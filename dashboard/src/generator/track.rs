use anyhow::Context;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::Path;
use trackcore::dataset::{write_log, LocationRecord};

/// Configuration for generating a synthetic location log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub start_date: NaiveDate,
    pub days: u32,
    pub first_hour: u8,
    pub last_hour: u8,
    pub max_points_per_hour: usize,
    pub origin_lat: f64,
    pub origin_lon: f64,
    pub step_deg: f64,
    pub archives: usize,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default(),
            days: 3,
            first_hour: 7,
            last_hour: 21,
            max_points_per_hour: 12,
            origin_lat: 35.1796,
            origin_lon: 129.0756,
            step_deg: 0.0008,
            archives: 4,
            seed: 0,
        }
    }
}

impl GeneratorConfig {
    fn hour_window(&self) -> (u8, u8) {
        let last = self.last_hour.min(23);
        (self.first_hour.min(last), last)
    }
}

/// Builds a random-walk track: some hours are skipped, some get a single
/// point, so every rendering path has data.
pub fn build_track(config: &GeneratorConfig) -> anyhow::Result<Vec<LocationRecord>> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let (first_hour, last_hour) = config.hour_window();
    let archives = config.archives.max(1);
    let max_points = config.max_points_per_hour.max(1);

    let mut lat = config.origin_lat;
    let mut lon = config.origin_lon;
    let mut records = Vec::new();

    for day in 0..config.days {
        let date = config
            .start_date
            .checked_add_signed(Duration::days(i64::from(day)))
            .context("generator date overflow")?;
        for hour in first_hour..=last_hour {
            if rng.gen_bool(0.2) {
                continue;
            }
            let points = rng.gen_range(1..=max_points);
            let mut offsets: Vec<(u32, u32)> = (0..points)
                .map(|_| (rng.gen_range(0..3600), rng.gen_range(0..1_000_000)))
                .collect();
            offsets.sort_unstable();

            for (offset, micros) in offsets {
                let time =
                    NaiveTime::from_hms_micro_opt(u32::from(hour), offset / 60, offset % 60, micros)
                        .context("generator produced an invalid time")?;
                lat += rng.gen_range(-config.step_deg..=config.step_deg);
                lon += rng.gen_range(-config.step_deg..=config.step_deg);
                let archive = rng.gen_range(0..archives);
                records.push(LocationRecord::new(
                    NaiveDateTime::new(date, time),
                    lat,
                    lon,
                    format!("location_{:02}.zip", archive),
                ));
            }
        }
    }

    Ok(records)
}

/// Writes `records` in the stored log layout.
pub fn write_location_log(path: &Path, records: &[LocationRecord]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("creating location log {}", path.display()))?;
    write_log(file, records).with_context(|| format!("writing location log {}", path.display()))?;
    Ok(())
}
