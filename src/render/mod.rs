//! Map rendering for Pulso Urbano
//!
//! The pipeline builds a [`MapDocument`], a plain snapshot of weighted points,
//! timed frames and markers, and hands it to a [`VisualizationSink`]. Nothing
//! in this module reads or changes pipeline state.

pub mod html;
pub mod sink;

pub use html::HtmlFileSink;
pub use sink::{MemorySink, VisualizationSink};

use geo::{Centroid, MultiPoint};
use serde::Serialize;

use crate::core::types::{GeoPoint, Zone};

/// Added to the weight range so a constant slice does not divide by zero
pub const WEIGHT_EPSILON: f64 = 1e-9;

/// A point with a heat weight in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightedPoint {
    pub lat: f64,
    pub lon: f64,
    pub weight: f64,
}

/// One animation frame of a timed heatmap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatFrame {
    /// Frame caption, `YYYY-MM-DD HH:MM`
    pub label: String,
    pub points: Vec<WeightedPoint>,
}

/// A timestamped point on the event timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineFeature {
    pub lat: f64,
    pub lon: f64,
    /// ISO-8601 timestamp
    pub time: String,
    pub color: String,
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    /// Popup body; rendered as HTML, so callers escape free text
    pub popup_html: String,
    pub color: String,
    pub icon: MarkerIcon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerIcon {
    Pin,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapLayer {
    Heatmap {
        points: Vec<WeightedPoint>,
        radius: u32,
    },
    TimedHeatmap {
        frames: Vec<HeatFrame>,
        radius: u32,
        auto_play: bool,
        max_opacity: f64,
    },
    Timeline {
        features: Vec<TimelineFeature>,
        /// Step between timeline ticks, in seconds
        period_seconds: u32,
        /// Keep showing points whose time has passed
        add_last_point: bool,
        auto_play: bool,
    },
    Markers {
        markers: Vec<Marker>,
    },
}

/// Everything a sink needs to draw one map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapDocument {
    pub title: String,
    pub center: GeoPoint,
    pub zoom: u8,
    pub layers: Vec<MapLayer>,
}

impl MapDocument {
    pub fn new(title: impl Into<String>, center: GeoPoint, zoom: u8) -> Self {
        Self {
            title: title.into(),
            center,
            zoom,
            layers: Vec::new(),
        }
    }

    pub fn with_layer(mut self, layer: MapLayer) -> Self {
        self.layers.push(layer);
        self
    }
}

/// Rescale values to [0, 1] with `(v - min) / (max - min + ε)`
pub fn normalize_weights(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    values
        .iter()
        .map(|v| (v - min) / (max - min + WEIGHT_EPSILON))
        .collect()
}

/// Configured centre, else the centroid of the zone coordinates
pub fn map_center(configured: Option<GeoPoint>, zones: &[Zone]) -> GeoPoint {
    if let Some(center) = configured {
        return center;
    }
    let points: MultiPoint<f64> = zones
        .iter()
        .map(|z| geo::Point::from(z.location))
        .collect::<Vec<_>>()
        .into();
    points.centroid().map(GeoPoint::from).unwrap_or_default()
}

/// Minimal HTML escaping for text placed inside popups
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_weights_spans_unit_interval() {
        let w = normalize_weights(&[-0.35, 0.45, 0.05]);
        assert_eq!(w[0], 0.0);
        assert!(w[1] > 0.999_999 && w[1] < 1.0);
        assert!((w[2] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_constant_slice_is_zero() {
        assert_eq!(normalize_weights(&[0.45, 0.45]), vec![0.0, 0.0]);
        assert!(normalize_weights(&[]).is_empty());
    }

    #[test]
    fn test_map_center_prefers_configured() {
        let zones = vec![Zone::new("A", 40.0, -3.0, 0)];
        let c = GeoPoint::new(41.0, -4.0);
        assert_eq!(map_center(Some(c), &zones), c);
    }

    #[test]
    fn test_map_center_falls_back_to_centroid() {
        let zones = vec![Zone::new("A", 40.0, -4.0, 0), Zone::new("B", 41.0, -3.0, 0)];
        let c = map_center(None, &zones);
        assert!((c.lat - 40.5).abs() < 1e-12);
        assert!((c.lon + 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>R&D</b>"), "&lt;b&gt;R&amp;D&lt;/b&gt;");
    }
}
