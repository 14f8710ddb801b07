use crate::dataset::LocationRecord;
use crate::map::palette::HourColorTable;
use crate::math::stats::StatsHelper;
use crate::prelude::{TrackError, TrackResult};
use crate::report::summary::hour_label;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Fewest points an hour needs before a connecting line is drawn.
pub const MIN_ROUTE_POINTS: usize = 2;

/// Styling knobs for the map scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub zoom_start: u8,
    pub line_weight: f32,
    pub line_opacity: f32,
    pub marker_radius: f32,
    pub marker_fill_opacity: f32,
    pub max_fit_zoom: u8,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            zoom_start: 14,
            line_weight: 4.0,
            line_opacity: 0.8,
            marker_radius: 6.0,
            marker_fill_opacity: 0.7,
            max_fit_zoom: 17,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    fn of(record: &LocationRecord) -> Self {
        Self {
            lat: record.latitude,
            lng: record.longitude,
        }
    }
}

/// Viewport box the map is fitted to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl MapBounds {
    /// Min/max latitude and longitude over `records`.
    pub fn from_records(records: &[&LocationRecord]) -> TrackResult<Self> {
        if records.is_empty() {
            return Err(TrackError::EmptyMap);
        }
        let mut south_west = LatLng {
            lat: f64::INFINITY,
            lng: f64::INFINITY,
        };
        let mut north_east = LatLng {
            lat: f64::NEG_INFINITY,
            lng: f64::NEG_INFINITY,
        };
        for record in records {
            if !record.latitude.is_finite() || !record.longitude.is_finite() {
                return Err(TrackError::InvalidBounds);
            }
            south_west.lat = south_west.lat.min(record.latitude);
            south_west.lng = south_west.lng.min(record.longitude);
            north_east.lat = north_east.lat.max(record.latitude);
            north_east.lng = north_east.lng.max(record.longitude);
        }
        Ok(Self {
            south_west,
            north_east,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TileLayer {
    pub name: String,
    pub url: String,
    pub attribution: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapControls {
    pub layer_control: bool,
    pub fullscreen: bool,
    pub geocoder: bool,
    pub measure_position: String,
    pub mouse_position: bool,
    pub scale: bool,
}

impl Default for MapControls {
    fn default() -> Self {
        Self {
            layer_control: true,
            fullscreen: true,
            geocoder: true,
            measure_position: "topleft".into(),
            mouse_position: true,
            scale: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteLayer {
    pub points: Vec<LatLng>,
    pub weight: f32,
    pub opacity: f32,
    pub tooltip: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkerPopup {
    pub time: String,
    pub coordinates: String,
    pub hour: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkerLayer {
    pub position: LatLng,
    pub radius: f32,
    pub fill_opacity: f32,
    pub tooltip: String,
    pub popup: MarkerPopup,
}

/// Everything drawn for one hour bucket.
#[derive(Debug, Clone, Serialize)]
pub struct HourLayer {
    pub hour: u8,
    pub color: String,
    pub route: Option<RouteLayer>,
    pub markers: Vec<MarkerLayer>,
}

/// Serializable description of the map, drawn client-side by Leaflet.
#[derive(Debug, Clone, Serialize)]
pub struct MapScene {
    pub center: LatLng,
    pub zoom_start: u8,
    pub max_fit_zoom: u8,
    pub tiles: Vec<TileLayer>,
    pub controls: MapControls,
    pub layers: Vec<HourLayer>,
    pub bounds: MapBounds,
}

fn default_tiles() -> Vec<TileLayer> {
    vec![
        TileLayer {
            name: "Street Map".into(),
            url: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png".into(),
            attribution: "&copy; OpenStreetMap contributors &copy; CARTO".into(),
        },
        TileLayer {
            name: "Satellite".into(),
            url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}".into(),
            attribution: "Esri".into(),
        },
    ]
}

/// Builds the map for a date-filtered set.
///
/// Hours are drawn in ascending order, so later hours sit on top. Within an
/// hour the points keep dataset order. The bounds always cover the whole
/// filtered set, whatever hours are selected.
pub fn build_map_scene(
    filtered: &[&LocationRecord],
    selected_hours: &BTreeSet<u8>,
    palette: &HourColorTable,
    settings: &MapSettings,
) -> TrackResult<MapScene> {
    let bounds = MapBounds::from_records(filtered)?;

    let latitudes: Vec<f64> = filtered.iter().map(|record| record.latitude).collect();
    let longitudes: Vec<f64> = filtered.iter().map(|record| record.longitude).collect();
    let center = LatLng {
        lat: StatsHelper::mean(&latitudes).ok_or(TrackError::EmptyMap)?,
        lng: StatsHelper::mean(&longitudes).ok_or(TrackError::EmptyMap)?,
    };

    let mut buckets: BTreeMap<u8, Vec<&LocationRecord>> = BTreeMap::new();
    for &record in filtered {
        let hour = record.hour();
        if selected_hours.is_empty() || selected_hours.contains(&hour) {
            buckets.entry(hour).or_default().push(record);
        }
    }

    let layers = buckets
        .into_iter()
        .map(|(hour, records)| build_hour_layer(hour, &records, palette, settings))
        .collect();

    Ok(MapScene {
        center,
        zoom_start: settings.zoom_start,
        max_fit_zoom: settings.max_fit_zoom,
        tiles: default_tiles(),
        controls: MapControls::default(),
        layers,
        bounds,
    })
}

fn build_hour_layer(
    hour: u8,
    records: &[&LocationRecord],
    palette: &HourColorTable,
    settings: &MapSettings,
) -> HourLayer {
    let label = hour_label(hour);
    let route = (records.len() >= MIN_ROUTE_POINTS).then(|| RouteLayer {
        points: records.iter().map(|record| LatLng::of(record)).collect(),
        weight: settings.line_weight,
        opacity: settings.line_opacity,
        tooltip: format!("{} - {} points", label, records.len()),
    });

    let markers = records
        .iter()
        .map(|record| {
            let time = record.timestamp.format("%H:%M:%S").to_string();
            MarkerLayer {
                position: LatLng::of(record),
                radius: settings.marker_radius,
                fill_opacity: settings.marker_fill_opacity,
                tooltip: format!("Time: {}", time),
                popup: MarkerPopup {
                    time,
                    coordinates: format!("{:.6}, {:.6}", record.latitude, record.longitude),
                    hour: label.clone(),
                },
            }
        })
        .collect();

    HourLayer {
        hour,
        color: palette.color(hour).to_string(),
        route,
        markers,
    }
}
