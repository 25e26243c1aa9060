//! Pipeline configuration with documented constants
//!
//! Every tunable number of the simulator, the topic model, the KPI extractor
//! and the renderer is collected here. `PulsoConfig::default()` reproduces the
//! reference run (seed 42, six-hour window, seven Madrid zones).

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::core::error::{PulsoError, Result};
use crate::core::types::{GeoPoint, TopicLabel, Zone};
use crate::data::seed;
use crate::simulation::context::MAX_WINDOW_HOURS;

/// Top-level configuration, loadable from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PulsoConfig {
    pub simulation: SimulationConfig,
    pub kpi: KpiConfig,
    pub topics: TopicConfig,
    pub render: RenderConfig,
    pub zones: Vec<Zone>,
}

/// Propagation simulator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the simulation RNG; same seed, same posts
    pub seed: u64,

    /// Observation window in hours; one post per zone for h = 0..=hours
    pub hours: u32,

    /// Event start (naive local time)
    pub start: NaiveDateTime,

    /// Mean of the Gaussian baseline noise added to every intensity
    ///
    /// Keeps inactive zones slightly above zero so heatmaps are not empty.
    pub noise_mean: f64,

    /// Standard deviation of the baseline noise
    pub noise_std_dev: f64,

    /// Standard deviation (degrees) of per-axis coordinate jitter
    ///
    /// 0.001 degrees is roughly 100 m at Madrid's latitude.
    pub jitter_std_dev: f64,

    /// Probability an active zone-hour produces the event template
    pub event_probability: f64,
}

/// Thresholds for the propagation KPIs
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiConfig {
    /// Zone counts as covered when its peak intensity exceeds this
    pub peak_threshold: f64,

    /// Zone counts as activated at the first hour above this
    pub activation_threshold: f64,
}

/// Topic model settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicConfig {
    pub components: usize,
    pub max_iter: usize,
    pub tolerance: f64,
    /// Seed for the NMF random initialisation
    pub seed: u64,
}

/// Map output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub zoom: u8,
    /// Map centre; the centroid of the zone table when absent
    pub center: Option<GeoPoint>,
    pub snapshot_radius: u32,
    pub timeline_radius: u32,
    pub max_opacity: f64,
    pub snapshot_file: String,
    pub timeline_file: String,
}

impl Default for PulsoConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            kpi: KpiConfig::default(),
            topics: TopicConfig::default(),
            render: RenderConfig::default(),
            zones: seed::madrid_zones(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            hours: 6,
            start: NaiveDate::from_ymd_opt(2025, 11, 15)
                .and_then(|d| d.and_hms_opt(18, 0, 0))
                .unwrap_or_default(),
            noise_mean: 0.05,
            noise_std_dev: 0.03,
            jitter_std_dev: 0.001,
            event_probability: 0.75,
        }
    }
}

impl Default for KpiConfig {
    fn default() -> Self {
        Self {
            peak_threshold: 0.4,
            activation_threshold: 0.2,
        }
    }
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            components: 2,
            max_iter: 200,
            tolerance: 1e-4,
            seed: 42,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            zoom: 12,
            center: Some(GeoPoint::new(40.4168, -3.7038)),
            snapshot_radius: 25,
            timeline_radius: 30,
            max_opacity: 0.8,
            snapshot_file: "pulso_social_urbano.html".into(),
            timeline_file: "pulso_social_urbano_timeline.html".into(),
        }
    }
}

impl PulsoConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a TOML config file; missing sections fall back to defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), zones = config.zones.len(), "Loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: PulsoConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let kpi = &self.kpi;
        for (name, value) in [
            ("peak_threshold", kpi.peak_threshold),
            ("activation_threshold", kpi.activation_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PulsoError::InvalidConfig(format!(
                    "{} ({}) must be within [0, 1]",
                    name, value
                )));
            }
        }

        // A zone must activate before it can count as covered
        if kpi.activation_threshold > kpi.peak_threshold {
            return Err(PulsoError::InvalidConfig(format!(
                "activation_threshold ({}) should be <= peak_threshold ({})",
                kpi.activation_threshold, kpi.peak_threshold
            )));
        }

        let sim = &self.simulation;
        if !sim.noise_mean.is_finite() {
            return Err(PulsoError::InvalidConfig(format!(
                "noise_mean ({}) must be finite",
                sim.noise_mean
            )));
        }
        for std_dev in [sim.noise_std_dev, sim.jitter_std_dev] {
            if !std_dev.is_finite() || std_dev < 0.0 {
                return Err(PulsoError::InvalidConfig(format!(
                    "Standard deviations must be finite and non-negative, got {}",
                    std_dev
                )));
            }
        }
        if sim.hours > MAX_WINDOW_HOURS {
            return Err(PulsoError::InvalidConfig(format!(
                "hours ({}) exceeds the maximum window of {}",
                sim.hours, MAX_WINDOW_HOURS
            )));
        }
        if !(0.0..=1.0).contains(&sim.event_probability) {
            return Err(PulsoError::InvalidConfig(format!(
                "event_probability ({}) must be within [0, 1]",
                sim.event_probability
            )));
        }

        // One component per topic label
        if self.topics.components != TopicLabel::ALL.len() {
            return Err(PulsoError::InvalidConfig(format!(
                "Topic model needs exactly {} components, got {}",
                TopicLabel::ALL.len(),
                self.topics.components
            )));
        }

        if self.zones.is_empty() {
            return Err(PulsoError::InvalidConfig("No zones configured".into()));
        }
        let mut seen = HashSet::new();
        for zone in &self.zones {
            if !seen.insert(zone.name.as_str()) {
                return Err(PulsoError::InvalidConfig(format!(
                    "Duplicate zone name: {}",
                    zone.name
                )));
            }
        }

        Ok(())
    }
}
