use crate::dataset::{export_file_name, LocationDataset, LocationRecord};
use crate::filter::FilterState;
use crate::map::{build_map_scene, HourColorTable, MapScene, MapSettings};
use crate::prelude::TrackError;
use crate::report::{hours_label, SummaryReport};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateBounds {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

/// Toggle button for an hour present on the selected date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourButton {
    pub hour: u8,
    pub label: String,
    pub color: String,
    pub selected: bool,
    pub count: usize,
}

/// Everything the dashboard shows, derived from the dataset and one
/// session's filter.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardView {
    pub date_bounds: Option<DateBounds>,
    pub selected_date: Option<NaiveDate>,
    pub selected_hours: Vec<u8>,
    pub hour_buttons: Vec<HourButton>,
    /// Size of the date-filtered set before hour selection.
    pub filtered_count: usize,
    pub summary: SummaryReport,
    /// The effective set, in dataset order.
    pub records: Vec<LocationRecord>,
    pub map: Option<MapScene>,
    pub map_error: Option<String>,
    pub export_file_name: Option<String>,
}

impl DashboardView {
    pub fn has_data(&self) -> bool {
        self.date_bounds.is_some()
    }

    pub fn all_hours(&self) -> bool {
        self.selected_hours.is_empty()
    }

    /// `"08:00, 09:00"` for the current hour selection, `None` when all hours
    /// are shown.
    pub fn selection_label(&self) -> Option<String> {
        if self.selected_hours.is_empty() {
            return None;
        }
        let hours: BTreeSet<u8> = self.selected_hours.iter().copied().collect();
        Some(hours_label(&hours))
    }
}

/// Recomputes the whole view from the current filter. Called after every
/// interaction; nothing is carried over from the previous view.
pub fn recompute_view(
    dataset: &LocationDataset,
    filter: &FilterState,
    palette: &HourColorTable,
    settings: &MapSettings,
) -> DashboardView {
    let date_bounds = dataset
        .date_range()
        .map(|(min, max)| DateBounds { min, max });
    let selected_hours: Vec<u8> = filter.selected_hours().iter().copied().collect();

    let Some(date) = filter.selected_date() else {
        return DashboardView {
            date_bounds,
            selected_hours,
            ..Default::default()
        };
    };

    let filtered = dataset.records_on(date);

    let mut hour_counts: BTreeMap<u8, usize> = BTreeMap::new();
    for record in &filtered {
        *hour_counts.entry(record.hour()).or_default() += 1;
    }
    let hour_buttons = hour_counts
        .into_iter()
        .map(|(hour, count)| HourButton {
            hour,
            label: format!("{:02}:00", hour),
            color: palette.color(hour).to_string(),
            selected: filter.is_hour_selected(hour),
            count,
        })
        .collect();

    let effective = filter.effective_set(&filtered);
    let summary = SummaryReport::from_records(&effective);

    let (map, map_error) =
        match build_map_scene(&filtered, filter.selected_hours(), palette, settings) {
            Ok(scene) => (Some(scene), None),
            Err(TrackError::EmptyMap) => {
                (None, Some("No data available for selected date".to_string()))
            }
            Err(err) => (None, Some(format!("Error displaying map: {}", err))),
        };

    DashboardView {
        date_bounds,
        selected_date: Some(date),
        selected_hours,
        hour_buttons,
        filtered_count: filtered.len(),
        summary,
        records: effective.into_iter().cloned().collect(),
        map,
        map_error,
        export_file_name: Some(export_file_name(date)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::read_dataset;
    use crate::view::dispatch::{dispatch, Action};

    const SCENARIO: &str = "timestamp,latitude,longitude,zip_file\n\
06-01 08:00:00.000000,35.0,129.0,a.zip\n\
06-01 08:05:00.000000,35.001,129.001,a.zip\n\
06-01 09:00:00.000000,35.1,129.1,b.zip\n\
06-02 07:00:00.000000,36.0,128.0,c.zip\n";

    fn june_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn full_day_view_matches_scenario() {
        let dataset = read_dataset(SCENARIO.as_bytes(), "2024").unwrap();
        let mut filter = FilterState::new();
        filter.ensure_date(&dataset);
        assert_eq!(filter.selected_date(), Some(june_first()));

        let view = recompute_view(&dataset, &filter, &HourColorTable, &MapSettings::default());
        assert!(view.has_data());
        assert!(view.all_hours());
        assert_eq!(view.summary.total_points, 3);
        assert_eq!(view.summary.unique_zips, 2);
        assert_eq!(view.hour_buttons.len(), 2);
        assert_eq!(view.hour_buttons[0].count, 2);
        assert_eq!(
            view.export_file_name.as_deref(),
            Some("location_data_2024-06-01.csv")
        );
        let bounds = view.date_bounds.unwrap();
        assert_eq!(bounds.max, NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
    }

    #[test]
    fn selecting_hour_eight_restricts_summary_and_map() {
        let dataset = read_dataset(SCENARIO.as_bytes(), "2024").unwrap();
        let mut filter = FilterState::new();
        filter.ensure_date(&dataset);
        dispatch(&mut filter, &dataset, Action::ToggleHour(8)).unwrap();

        let view = recompute_view(&dataset, &filter, &HourColorTable, &MapSettings::default());
        assert_eq!(view.summary.total_points, 2);
        assert_eq!(view.summary.unique_zips, 1);
        assert_eq!(view.filtered_count, 3);
        assert_eq!(view.selection_label().as_deref(), Some("08:00"));
        assert!(view.hour_buttons[0].selected);

        let scene = view.map.unwrap();
        assert_eq!(scene.layers.len(), 1);
        assert!(scene.layers[0].route.is_some());
        assert_eq!(scene.bounds.north_east.lat, 35.1);
    }

    #[test]
    fn empty_dataset_yields_placeholder_view() {
        let dataset = LocationDataset::empty();
        let mut filter = FilterState::new();
        filter.ensure_date(&dataset);
        let view = recompute_view(&dataset, &filter, &HourColorTable, &MapSettings::default());
        assert!(!view.has_data());
        assert!(view.map.is_none());
        assert!(view.records.is_empty());
    }

    #[test]
    fn date_without_records_reports_map_message() {
        let dataset = read_dataset(SCENARIO.as_bytes(), "2024").unwrap();
        let mut filter = FilterState::new();
        filter.set_date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        let view = recompute_view(&dataset, &filter, &HourColorTable, &MapSettings::default());
        assert_eq!(
            view.map_error.as_deref(),
            Some("No data available for selected date")
        );
        assert_eq!(view.summary.total_points, 0);
    }
}
