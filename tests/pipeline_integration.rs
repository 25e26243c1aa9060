//! Integration tests for the end-to-end map pipelines
//!
//! These tests run both products against an in-memory sink and the HTML
//! file sink, and check that configuration flows through.

use std::fs;

use pulso_urbano::core::config::PulsoConfig;
use pulso_urbano::core::error::PulsoError;
use pulso_urbano::core::types::TopicLabel;
use pulso_urbano::pipeline::{run_snapshot, run_timeline};
use pulso_urbano::render::{HtmlFileSink, MapLayer, MarkerIcon, MemorySink};

#[test]
fn test_timeline_layers() {
    let mut sink = MemorySink::new();
    let report = run_timeline(&PulsoConfig::default(), &mut sink).unwrap();
    let doc = sink.last().unwrap();

    assert_eq!(doc.layers.len(), 3);

    match &doc.layers[0] {
        MapLayer::TimedHeatmap { frames, radius, auto_play, max_opacity } => {
            assert_eq!(frames.len(), 7);
            assert_eq!(frames[0].label, "2025-11-15 18:00");
            assert_eq!(frames[6].label, "2025-11-16 00:00");
            assert!(frames.iter().all(|f| f.points.len() == 7));
            assert!(frames
                .iter()
                .flat_map(|f| &f.points)
                .all(|p| (0.0..=1.0).contains(&p.weight)));
            assert_eq!(*radius, 30);
            assert!(*auto_play);
            assert_eq!(*max_opacity, 0.8);
        }
        other => panic!("expected timed heatmap, got {:?}", other),
    }

    match &doc.layers[1] {
        MapLayer::Timeline { features, period_seconds, add_last_point, .. } => {
            assert_eq!(features.len(), report.posts.len());
            assert_eq!(*period_seconds, 3600);
            assert!(*add_last_point);
            assert_eq!(features[0].time, "2025-11-15T18:00:00");
        }
        other => panic!("expected timeline, got {:?}", other),
    }

    match &doc.layers[2] {
        MapLayer::Markers { markers } => {
            assert_eq!(markers.len(), 7);
            assert!(markers.iter().all(|m| m.icon == MarkerIcon::Info));
            assert!(markers[0].popup_html.starts_with("<b>Centro</b><br>Peak intensity:"));
        }
        other => panic!("expected markers, got {:?}", other),
    }
}

#[test]
fn test_timeline_topics_follow_templates() {
    let report = run_timeline(&PulsoConfig::default(), MemorySink::new()).unwrap();

    for scored in &report.posts {
        let expected = if scored.post.text.starts_with("Gran concierto") {
            TopicLabel::EventsCulture
        } else {
            TopicLabel::TransportMobility
        };
        assert_eq!(scored.topic.label, expected, "{}", scored.post.text);
        assert!((-1.0..=1.0).contains(&scored.sentiment));
    }

    // Centro is active all night, so most of its buckets are event posts
    let centro = report.kpis.zone("Centro").unwrap();
    assert!(centro.mean_event_share > 0.0);
}

#[test]
fn test_timeline_is_reproducible() {
    let a = run_timeline(&PulsoConfig::default(), MemorySink::new()).unwrap();
    let b = run_timeline(&PulsoConfig::default(), MemorySink::new()).unwrap();
    assert_eq!(a.posts, b.posts);
    assert_eq!(a.kpis, b.kpis);
}

#[test]
fn test_timeline_writes_html_and_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timeline.html");

    let report = run_timeline(&PulsoConfig::default(), HtmlFileSink::new(&path)).unwrap();

    let page = fs::read_to_string(&path).unwrap();
    assert!(page.contains("\"kind\":\"timed_heatmap\""));
    assert!(page.contains("\"kind\":\"timeline\""));
    assert!(page.contains("leaflet-heat.js"));

    let json: serde_json::Value = serde_json::to_value(&report).unwrap();
    assert!(json.get("posts").is_none());
    assert_eq!(json["buckets"].as_array().unwrap().len(), 49);
    assert!(json["kpis"]["coverage"].as_f64().is_some());
}

#[test]
fn test_snapshot_writes_html() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.html");

    let report = run_snapshot(&PulsoConfig::default(), HtmlFileSink::new(&path)).unwrap();
    assert_eq!(report.posts.len(), 4);
    assert_eq!(report.topics.len(), 2);
    assert!(report.posts.iter().all(|p| p.topic.topic_id < 2));

    let page = fs::read_to_string(&path).unwrap();
    assert!(page.contains("<title>Pulso social urbano</title>"));
    assert!(page.contains("\"kind\":\"heatmap\""));
}

#[test]
fn test_config_file_drives_timeline() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("pulso.toml");
    fs::write(
        &config_path,
        r#"
        [simulation]
        seed = 9
        hours = 3
        start = "2025-12-31T22:00:00"

        [render]
        zoom = 13

        [[zones]]
        name = "Sol"
        activation_delay_hours = 0
        location = { lat = 40.4169, lon = -3.7035 }

        [[zones]]
        name = "Lavapiés"
        activation_delay_hours = 2
        location = { lat = 40.4087, lon = -3.7011 }
        "#,
    )
    .unwrap();

    let config = PulsoConfig::load(&config_path).unwrap();
    let mut sink = MemorySink::new();
    let report = run_timeline(&config, &mut sink).unwrap();

    assert_eq!(report.posts.len(), 8);
    assert_eq!(report.kpis.zones.len(), 2);
    assert_eq!(sink.last().unwrap().zoom, 13);

    let lavapies = report.kpis.zone("Lavapiés").unwrap();
    assert!(lavapies.time_to_peak_hours >= 2.0);
}

#[test]
fn test_invalid_config_aborts_before_rendering() {
    let mut config = PulsoConfig::default();
    config.zones.clear();

    let mut sink = MemorySink::new();
    let result = run_timeline(&config, &mut sink);
    assert!(matches!(result, Err(PulsoError::InvalidConfig(_))));
    assert!(sink.documents.is_empty());
}

#[test]
fn test_missing_config_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = PulsoConfig::load(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(PulsoError::IoError(_))));
}
