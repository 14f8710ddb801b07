use trackcore::map::MapScene;

/// Leaflet and plugin assets, placed in the document head.
pub const MAP_HEAD: &str = r#"<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" crossorigin="">
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js" crossorigin=""></script>
    <link rel="stylesheet" href="https://unpkg.com/leaflet.fullscreen@3.0.2/Control.FullScreen.css">
    <script src="https://unpkg.com/leaflet.fullscreen@3.0.2/Control.FullScreen.js"></script>
    <link rel="stylesheet" href="https://unpkg.com/leaflet-control-geocoder@2.4.0/dist/Control.Geocoder.css">
    <script src="https://unpkg.com/leaflet-control-geocoder@2.4.0/dist/Control.Geocoder.js"></script>
    <link rel="stylesheet" href="https://unpkg.com/leaflet-measure@3.1.0/dist/leaflet-measure.css">
    <script src="https://unpkg.com/leaflet-measure@3.1.0/dist/leaflet-measure.js"></script>"#;

// Plugins are optional: a missing CDN script only drops its control.
const MAP_SCRIPT: &str = r#"
(function () {
  const source = document.getElementById('map-scene');
  if (!source || typeof L === 'undefined') { return; }
  const scene = JSON.parse(source.textContent);

  const map = L.map('map', {
    center: [scene.center.lat, scene.center.lng],
    zoom: scene.zoom_start,
  });

  const baseLayers = {};
  scene.tiles.forEach(function (tile, index) {
    const layer = L.tileLayer(tile.url, { attribution: tile.attribution, maxZoom: 19 });
    if (index === 0) { layer.addTo(map); }
    baseLayers[tile.name] = layer;
  });

  const controls = scene.controls;
  if (controls.layer_control) { L.control.layers(baseLayers).addTo(map); }
  if (controls.scale) { L.control.scale().addTo(map); }
  if (controls.fullscreen && L.control.fullscreen) { L.control.fullscreen().addTo(map); }
  if (controls.geocoder && L.Control.geocoder) { L.Control.geocoder().addTo(map); }
  if (controls.measure_position && L.control.measure) {
    L.control.measure({ position: controls.measure_position }).addTo(map);
  }
  if (controls.mouse_position) {
    const MousePosition = L.Control.extend({
      options: { position: 'bottomleft' },
      onAdd: function () {
        const box = L.DomUtil.create('div', 'leaflet-control-attribution');
        box.textContent = '';
        map.on('mousemove', function (event) {
          box.textContent = event.latlng.lat.toFixed(6) + ', ' + event.latlng.lng.toFixed(6);
        });
        return box;
      },
    });
    new MousePosition().addTo(map);
  }

  function popupFor(marker, color) {
    const root = document.createElement('div');
    root.style.fontFamily = 'Arial';
    root.style.width = '220px';
    const title = document.createElement('h4');
    title.style.margin = '0';
    title.style.color = color;
    title.textContent = scene.decorated ? '📍 Location Details' : 'Location Details';
    root.appendChild(title);
    root.appendChild(document.createElement('hr'));
    [['Time', marker.popup.time], ['Coordinates', marker.popup.coordinates], ['Hour', marker.popup.hour]]
      .forEach(function (row) {
        const line = document.createElement('div');
        const label = document.createElement('b');
        label.textContent = row[0] + ': ';
        line.appendChild(label);
        line.appendChild(document.createTextNode(row[1]));
        root.appendChild(line);
      });
    return root;
  }

  scene.layers.forEach(function (layer) {
    if (layer.route) {
      L.polyline(layer.route.points.map(function (p) { return [p.lat, p.lng]; }), {
        color: layer.color,
        weight: layer.route.weight,
        opacity: layer.route.opacity,
        smoothFactor: 1,
      }).bindTooltip(layer.route.tooltip).addTo(map);
    }
    layer.markers.forEach(function (marker) {
      L.circleMarker([marker.position.lat, marker.position.lng], {
        radius: marker.radius,
        color: layer.color,
        fill: true,
        fillOpacity: marker.fill_opacity,
        weight: 2,
      })
        .bindPopup(popupFor(marker, layer.color), { maxWidth: 300 })
        .bindTooltip(marker.tooltip)
        .addTo(map);
    });
  });

  const sw = scene.bounds.south_west;
  const ne = scene.bounds.north_east;
  map.fitBounds([[sw.lat, sw.lng], [ne.lat, ne.lng]], { maxZoom: scene.max_fit_zoom });
})();
"#;

/// Serializes the scene for embedding in a `<script type="application/json">`
/// block. `<`, `>` and `&` are escaped so record text cannot close the tag.
pub fn scene_json(scene: &MapScene, decorated: bool) -> serde_json::Result<String> {
    let mut value = serde_json::to_value(scene)?;
    if let Some(object) = value.as_object_mut() {
        object.insert("decorated".into(), serde_json::Value::Bool(decorated));
    }
    let raw = serde_json::to_string(&value)?;
    Ok(raw
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

/// Map container plus the data and script that draw it.
pub fn render_map(scene: &MapScene, decorated: bool) -> serde_json::Result<String> {
    Ok(format!(
        r#"<div id="map"></div>
<script type="application/json" id="map-scene">{}</script>
<script>{}</script>"#,
        scene_json(scene, decorated)?,
        MAP_SCRIPT
    ))
}
