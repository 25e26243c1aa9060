//! End-to-end runs: seed snapshot map and simulated timeline map

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::aggregate::{aggregate, extract_kpis, AggregateBucket, PropagationKpis};
use crate::core::config::PulsoConfig;
use crate::core::error::Result;
use crate::core::types::{ScoredPost, Zone};
use crate::data::seed::{seed_posts, snapshot_zones};
use crate::nlp::{enrich_posts, SentimentAnalyzer, Topic, TopicLabeler};
use crate::render::{
    escape_html, map_center, normalize_weights, HeatFrame, MapDocument, MapLayer, Marker,
    MarkerIcon, TimelineFeature, VisualizationSink, WeightedPoint,
};
use crate::simulation::{generate_posts, SimulationContext};

/// Summary markers use this colour regardless of topic
const ZONE_MARKER_COLOR: &str = "green";

#[derive(Debug, Clone, Serialize)]
pub struct SnapshotReport {
    pub posts: Vec<ScoredPost>,
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineReport {
    #[serde(skip_serializing)]
    pub posts: Vec<ScoredPost>,
    pub buckets: Vec<AggregateBucket>,
    pub kpis: PropagationKpis,
    pub topics: Vec<Topic>,
}

/// Score the seed posts and render the static sentiment map
pub fn run_snapshot<S: VisualizationSink>(config: &PulsoConfig, mut sink: S) -> Result<SnapshotReport> {
    config.validate()?;

    let zones = snapshot_zones();
    let posts = seed_posts(&zones)?;
    tracing::debug!(posts = posts.len(), "Loaded seed posts");

    let (scored, model) = enrich_posts(posts, &SentimentAnalyzer::new(), &TopicLabeler::new(&config.topics))?;

    let document = snapshot_document(config, &zones, &scored);
    sink.render(&document)?;

    Ok(SnapshotReport {
        posts: scored,
        topics: model.topics,
    })
}

/// Simulate the propagation, derive KPIs and render the animated map
pub fn run_timeline<S: VisualizationSink>(config: &PulsoConfig, mut sink: S) -> Result<TimelineReport> {
    config.validate()?;

    let mut ctx = SimulationContext::new(&config.simulation, config.zones.clone())?;
    let posts = generate_posts(&mut ctx);

    let (scored, model) = enrich_posts(posts, &SentimentAnalyzer::new(), &TopicLabeler::new(&config.topics))?;

    let buckets = aggregate(&scored);
    let kpis = extract_kpis(&buckets, ctx.window.start, &config.kpi);
    tracing::debug!(buckets = buckets.len(), zones = kpis.zones.len(), "Aggregated posts");

    let document = timeline_document(config, &ctx.zones, &scored, &kpis);
    sink.render(&document)?;

    Ok(TimelineReport {
        posts: scored,
        buckets,
        kpis,
        topics: model.topics,
    })
}

pub fn snapshot_document(config: &PulsoConfig, zones: &[Zone], posts: &[ScoredPost]) -> MapDocument {
    let sentiments: Vec<f64> = posts.iter().map(|p| p.sentiment).collect();
    let points = posts
        .iter()
        .zip(normalize_weights(&sentiments))
        .map(|(p, weight)| WeightedPoint {
            lat: p.post.location.lat,
            lon: p.post.location.lon,
            weight,
        })
        .collect();

    let markers = posts
        .iter()
        .map(|p| Marker {
            lat: p.post.location.lat,
            lon: p.post.location.lon,
            popup_html: escape_html(&format!(
                "{} | Sentiment: {:.2} | Topic: {}",
                p.post.text, p.sentiment, p.topic.label
            )),
            color: p.topic.label.color().to_string(),
            icon: MarkerIcon::Pin,
        })
        .collect();

    MapDocument::new(
        "Pulso social urbano",
        map_center(config.render.center, zones),
        config.render.zoom,
    )
    .with_layer(MapLayer::Heatmap {
        points,
        radius: config.render.snapshot_radius,
    })
    .with_layer(MapLayer::Markers { markers })
}

pub fn timeline_document(
    config: &PulsoConfig,
    zones: &[Zone],
    posts: &[ScoredPost],
    kpis: &PropagationKpis,
) -> MapDocument {
    MapDocument::new(
        "Pulso social urbano: timeline",
        map_center(config.render.center, zones),
        config.render.zoom,
    )
    .with_layer(MapLayer::TimedHeatmap {
        frames: heat_frames(posts),
        radius: config.render.timeline_radius,
        auto_play: true,
        max_opacity: config.render.max_opacity,
    })
    .with_layer(MapLayer::Timeline {
        features: timeline_features(posts),
        period_seconds: 3600,
        add_last_point: true,
        auto_play: false,
    })
    .with_layer(MapLayer::Markers {
        markers: zone_markers(zones, kpis),
    })
}

/// One frame per distinct timestamp; sentiment normalised within the frame
pub fn heat_frames(posts: &[ScoredPost]) -> Vec<HeatFrame> {
    let mut slices: BTreeMap<NaiveDateTime, Vec<&ScoredPost>> = BTreeMap::new();
    for p in posts {
        slices.entry(p.post.timestamp).or_default().push(p);
    }

    slices
        .into_iter()
        .map(|(t, slice)| {
            let sentiments: Vec<f64> = slice.iter().map(|p| p.sentiment).collect();
            let points = slice
                .iter()
                .zip(normalize_weights(&sentiments))
                .map(|(p, weight)| WeightedPoint {
                    lat: p.post.location.lat,
                    lon: p.post.location.lon,
                    weight,
                })
                .collect();
            HeatFrame {
                label: t.format("%Y-%m-%d %H:%M").to_string(),
                points,
            }
        })
        .collect()
}

pub fn timeline_features(posts: &[ScoredPost]) -> Vec<TimelineFeature> {
    posts
        .iter()
        .map(|p| TimelineFeature {
            lat: p.post.location.lat,
            lon: p.post.location.lon,
            time: p.post.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string(),
            color: p.topic.label.color().to_string(),
            popup: escape_html(&format!(
                "{} | Sent: {:.2} | {} | {}",
                p.topic.label,
                p.sentiment,
                p.post.zone,
                p.post.timestamp.format("%H:%M")
            )),
        })
        .collect()
}

/// One summary marker per configured zone, at the zone's fixed coordinate
pub fn zone_markers(zones: &[Zone], kpis: &PropagationKpis) -> Vec<Marker> {
    zones
        .iter()
        .map(|zone| {
            let name = escape_html(&zone.name);
            let popup_html = match kpis.zone(&zone.name) {
                Some(k) => format!(
                    "<b>{}</b><br>Peak intensity: {:.2}<br>Time-to-peak (h): {:.2}<br>Event share: {:.2}",
                    name, k.peak_intensity, k.time_to_peak_hours, k.mean_event_share
                ),
                None => format!("<b>{}</b><br>No relevant activation", name),
            };
            Marker {
                lat: zone.location.lat,
                lon: zone.location.lon,
                popup_html,
                color: ZONE_MARKER_COLOR.to_string(),
                icon: MarkerIcon::Info,
            }
        })
        .collect()
}
