//! Explicit simulation state: RNG, zone table, time window and noise model

use chrono::{NaiveDateTime, TimeDelta};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;

use crate::core::config::SimulationConfig;
use crate::core::error::{PulsoError, Result};
use crate::core::types::Zone;

/// Longest observation window the simulator accepts (four weeks)
pub const MAX_WINDOW_HOURS: u32 = 24 * 28;

/// Observation window: `hours + 1` hourly time points starting at `start`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub hours: u32,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, hours: u32) -> Self {
        Self { start, hours }
    }

    pub fn time_points(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        (0..=self.hours).map(move |h| self.start + TimeDelta::hours(h as i64))
    }

    /// Seconds elapsed since the window start
    pub fn elapsed_seconds(&self, t: NaiveDateTime) -> f64 {
        (t - self.start).num_seconds() as f64
    }

    /// Linear decay from 1 at the start to 0 at the end of the window
    pub fn base_intensity(&self, t: NaiveDateTime) -> f64 {
        if self.hours == 0 {
            return if t <= self.start { 1.0 } else { 0.0 };
        }
        let span = self.hours as f64 * 3600.0;
        (1.0 - self.elapsed_seconds(t) / span).clamp(0.0, 1.0)
    }
}

/// Gaussian noise sources of the generator
#[derive(Debug, Clone, Copy)]
pub struct NoiseModel {
    pub intensity: Normal<f64>,
    pub jitter: Normal<f64>,
    pub event_probability: f64,
}

impl NoiseModel {
    pub fn new(mean: f64, std_dev: f64, jitter_std_dev: f64, event_probability: f64) -> Result<Self> {
        if !mean.is_finite() {
            return Err(PulsoError::InvalidConfig(format!(
                "Intensity noise mean ({}) must be finite",
                mean
            )));
        }
        check_std_dev("Intensity noise", std_dev)?;
        check_std_dev("Coordinate jitter", jitter_std_dev)?;

        let intensity = Normal::new(mean, std_dev)
            .map_err(|e| PulsoError::InvalidConfig(format!("Intensity noise: {}", e)))?;
        let jitter = Normal::new(0.0, jitter_std_dev)
            .map_err(|e| PulsoError::InvalidConfig(format!("Coordinate jitter: {}", e)))?;
        if !(0.0..=1.0).contains(&event_probability) {
            return Err(PulsoError::InvalidConfig(format!(
                "event_probability ({}) must be within [0, 1]",
                event_probability
            )));
        }
        Ok(Self {
            intensity,
            jitter,
            event_probability,
        })
    }
}

// Normal::new only rejects non-finite values
fn check_std_dev(what: &str, std_dev: f64) -> Result<()> {
    if std_dev.is_finite() && std_dev >= 0.0 {
        Ok(())
    } else {
        Err(PulsoError::InvalidConfig(format!(
            "{} std dev ({}) must be finite and non-negative",
            what, std_dev
        )))
    }
}

/// Everything one propagation run needs, passed explicitly to the generator
#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub rng: ChaCha8Rng,
    pub zones: Vec<Zone>,
    pub window: TimeWindow,
    pub noise: NoiseModel,
}

impl SimulationContext {
    pub fn new(config: &SimulationConfig, zones: Vec<Zone>) -> Result<Self> {
        if zones.is_empty() {
            return Err(PulsoError::InvalidConfig("No zones configured".into()));
        }
        if config.hours > MAX_WINDOW_HOURS {
            return Err(PulsoError::InvalidConfig(format!(
                "Window of {} hours exceeds the maximum of {}",
                config.hours, MAX_WINDOW_HOURS
            )));
        }
        let noise = NoiseModel::new(
            config.noise_mean,
            config.noise_std_dev,
            config.jitter_std_dev,
            config.event_probability,
        )?;
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            zones,
            window: TimeWindow::new(config.start, config.hours),
            noise,
        })
    }

    pub fn zone(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.name == name)
    }
}
