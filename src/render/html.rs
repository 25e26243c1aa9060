//! Leaflet HTML export
//!
//! Writes one HTML page per document. The document is embedded as JSON and
//! drawn by a small script on top of Leaflet and leaflet.heat (loaded from a
//! CDN), so the file opens directly in a browser.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{PulsoError, Result};
use crate::render::sink::VisualizationSink;
use crate::render::{escape_html, MapDocument};

const DOCUMENT_PLACEHOLDER: &str = "__PULSO_DOCUMENT__";
const TITLE_PLACEHOLDER: &str = "__PULSO_TITLE__";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>__PULSO_TITLE__</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<script src="https://unpkg.com/leaflet.heat@0.2.0/dist/leaflet-heat.js"></script>
<style>
  html, body { height: 100%; margin: 0; font-family: sans-serif; }
  #map { position: absolute; top: 0; bottom: 0; width: 100%; }
  #controls { position: absolute; bottom: 12px; left: 12px; z-index: 1000; }
  .player { background: rgba(255, 255, 255, 0.9); padding: 4px 8px; margin-top: 4px;
            border-radius: 4px; font-size: 12px; }
  .player button { width: 28px; }
  .pin { width: 14px; height: 14px; border-radius: 50%; border: 2px solid #fff;
         box-shadow: 0 0 3px rgba(0, 0, 0, 0.6); }
  .info { width: 18px; height: 18px; border-radius: 50%; color: #fff; font-weight: bold;
          text-align: center; line-height: 18px; font-size: 12px; }
</style>
</head>
<body>
<div id="map"></div>
<div id="controls"></div>
<script>
const DOC = __PULSO_DOCUMENT__;

const map = L.map('map').setView([DOC.center.lat, DOC.center.lon], DOC.zoom);
L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
  attribution: '&copy; OpenStreetMap contributors'
}).addTo(map);
const controls = document.getElementById('controls');

function heatPoints(points) {
  return points.map(p => [p.lat, p.lon, p.weight]);
}

function addPlayer(name, steps, labelOf, onStep, autoPlay, loop) {
  const box = document.createElement('div');
  box.className = 'player';
  const button = document.createElement('button');
  const slider = document.createElement('input');
  slider.type = 'range';
  slider.min = 0;
  slider.max = Math.max(steps - 1, 0);
  slider.value = 0;
  const caption = document.createElement('span');
  box.append(name + ' ', button, slider, ' ', caption);
  controls.appendChild(box);

  let timer = null;
  const show = i => { slider.value = i; caption.textContent = labelOf(i); onStep(i); };
  const stop = () => { clearInterval(timer); timer = null; button.textContent = '▶'; };
  const play = () => {
    button.textContent = '⏸';
    timer = setInterval(() => {
      let i = Number(slider.value) + 1;
      if (i >= steps) {
        if (!loop) { stop(); return; }
        i = 0;
      }
      show(i);
    }, 1000);
  };
  button.onclick = () => (timer ? stop() : play());
  slider.oninput = () => show(Number(slider.value));
  stop();
  show(0);
  if (autoPlay) play();
}

function markerIcon(marker) {
  if (marker.icon === 'info') {
    return L.divIcon({ className: '', html: '<div class="info" style="background:' + marker.color + '">i</div>', iconSize: [18, 18] });
  }
  return L.divIcon({ className: '', html: '<div class="pin" style="background:' + marker.color + '"></div>', iconSize: [14, 14] });
}

for (const layer of DOC.layers) {
  switch (layer.kind) {
    case 'heatmap':
      L.heatLayer(heatPoints(layer.points), { radius: layer.radius }).addTo(map);
      break;

    case 'timed_heatmap': {
      if (!layer.frames.length) break;
      const heat = L.heatLayer([], { radius: layer.radius, max: 1.0 }).addTo(map);
      if (heat._canvas) heat._canvas.style.opacity = layer.max_opacity;
      addPlayer('Heatmap', layer.frames.length,
        i => layer.frames[i].label,
        i => heat.setLatLngs(heatPoints(layer.frames[i].points)),
        layer.auto_play, true);
      break;
    }

    case 'timeline': {
      if (!layer.features.length) break;
      const group = L.layerGroup().addTo(map);
      const points = layer.features.map(f => ({
        t: Date.parse(f.time),
        marker: L.circleMarker([f.lat, f.lon], {
          radius: 6, color: f.color, fillColor: f.color, fillOpacity: 0.7, weight: 2
        }).bindPopup(f.popup)
      }));
      const t0 = Math.min(...points.map(p => p.t));
      const t1 = Math.max(...points.map(p => p.t));
      const step = layer.period_seconds * 1000;
      const steps = Math.floor((t1 - t0) / step) + 1;
      const timeAt = i => t0 + i * step;
      addPlayer('Timeline', steps,
        i => new Date(timeAt(i)).toLocaleString(),
        i => {
          group.clearLayers();
          const now = timeAt(i);
          for (const p of points) {
            const visible = layer.add_last_point ? p.t <= now : (p.t >= now && p.t < now + step);
            if (visible) group.addLayer(p.marker);
          }
        },
        layer.auto_play, false);
      break;
    }

    case 'markers':
      for (const m of layer.markers) {
        L.marker([m.lat, m.lon], { icon: markerIcon(m) })
          .bindPopup(m.popup_html, { maxWidth: 250 })
          .addTo(map);
      }
      break;
  }
}
</script>
</body>
</html>
"#;

/// Renders documents into a standalone HTML page on disk
#[derive(Debug, Clone)]
pub struct HtmlFileSink {
    path: PathBuf,
}

impl HtmlFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Build the page for `document`
pub fn render_page(document: &MapDocument) -> Result<String> {
    // "</" inside a script block would close it early
    let json = serde_json::to_string(document)?.replace("</", "<\\/");
    if json.contains(DOCUMENT_PLACEHOLDER) || json.contains(TITLE_PLACEHOLDER) {
        return Err(PulsoError::Render(
            "Document text collides with template placeholders".into(),
        ));
    }
    Ok(PAGE_TEMPLATE
        .replace(TITLE_PLACEHOLDER, &escape_html(&document.title))
        .replace(DOCUMENT_PLACEHOLDER, &json))
}

impl VisualizationSink for HtmlFileSink {
    fn render(&mut self, document: &MapDocument) -> Result<()> {
        let page = render_page(document)?;
        fs::write(&self.path, page)?;
        tracing::info!(path = %self.path.display(), layers = document.layers.len(), "Wrote map");
        Ok(())
    }
}
