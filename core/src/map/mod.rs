pub mod palette;
pub mod scene;

pub use palette::HourColorTable;
pub use scene::{
    build_map_scene, HourLayer, LatLng, MapBounds, MapControls, MapScene, MapSettings,
    MarkerLayer, MarkerPopup, RouteLayer, TileLayer,
};
