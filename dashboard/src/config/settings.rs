use crate::page::PageOptions;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use trackcore::auth::DEFAULT_SESSION_TTL_HOURS;
use trackcore::dataset::record::DEFAULT_TIMESTAMP_YEAR;
use trackcore::map::MapSettings;

/// Runtime settings for the dashboard service. Credentials never live here;
/// they come from the environment.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub bind: SocketAddr,
    pub timestamp_year: String,
    pub session_ttl_hours: u32,
    pub page_size: usize,
    pub page: PageOptions,
    pub map: MapSettings,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("location_logs.csv"),
            bind: SocketAddr::from(([127, 0, 0, 1], 8501)),
            timestamp_year: DEFAULT_TIMESTAMP_YEAR.to_string(),
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            page_size: 100,
            page: PageOptions::default(),
            map: MapSettings::default(),
        }
    }
}

impl DashboardConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading dashboard config {}", path_ref.display()))?;
        let config: DashboardConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing dashboard config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(data_path: Option<PathBuf>, bind: Option<SocketAddr>) -> Self {
        Self::default().with_overrides(data_path, bind)
    }

    /// Command-line values win over the file.
    pub fn with_overrides(mut self, data_path: Option<PathBuf>, bind: Option<SocketAddr>) -> Self {
        if let Some(path) = data_path {
            self.data_path = path;
        }
        if let Some(addr) = bind {
            self.bind = addr;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_keeps_defaults() {
        let cfg = DashboardConfig::from_args(Some(PathBuf::from("logs.csv")), None);
        assert_eq!(cfg.data_path, PathBuf::from("logs.csv"));
        assert_eq!(cfg.session_ttl_hours, 3);
        assert_eq!(cfg.bind.port(), 8501);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"data_path: /srv/logs.csv\nbind: 0.0.0.0:9100\npage_size: 25\npage:\n  decorated_headers: false\nmap:\n  zoom_start: 12\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = DashboardConfig::load(&path).unwrap();
        assert_eq!(cfg.page_size, 25);
        assert_eq!(cfg.bind.port(), 9100);
        assert!(!cfg.page.decorated_headers);
        assert!(cfg.page.extended_stats);
        assert_eq!(cfg.map.zoom_start, 12);
        assert_eq!(cfg.map.line_weight, 4.0);
        assert_eq!(cfg.timestamp_year, "2024");
    }

    #[test]
    fn overrides_replace_file_values() {
        let cfg = DashboardConfig::default()
            .with_overrides(None, Some(SocketAddr::from(([0, 0, 0, 0], 80))));
        assert_eq!(cfg.bind.port(), 80);
        assert_eq!(cfg.data_path, PathBuf::from("location_logs.csv"));
    }
}
