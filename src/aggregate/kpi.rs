//! Propagation KPIs: peaks, time-to-peak, coverage and spread speed

use chrono::NaiveDateTime;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::aggregate::buckets::AggregateBucket;
use crate::core::config::KpiConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneKpi {
    pub zone: String,
    pub peak_intensity: f64,
    pub peak_time: NaiveDateTime,
    /// Hours from event start to the peak bucket
    pub time_to_peak_hours: f64,
    /// Mean of the zone's bucket event shares
    pub mean_event_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropagationKpis {
    /// One entry per zone with at least one bucket, sorted by zone name
    pub zones: Vec<ZoneKpi>,
    /// Fraction of zones whose peak exceeds the peak threshold
    pub coverage: f64,
    /// Mean gap in hours between consecutive first activations
    pub spread_speed_hours: f64,
    /// First hour each activated zone crossed the activation threshold, earliest first
    pub first_activations: Vec<(String, NaiveDateTime)>,
}

impl PropagationKpis {
    pub fn zone(&self, name: &str) -> Option<&ZoneKpi> {
        self.zones.iter().find(|z| z.zone == name)
    }

    pub fn summary(&self) -> String {
        format!(
            "KPIs -> coverage: {:.2}, spread_speed (h): {:.2}",
            self.coverage, self.spread_speed_hours
        )
    }
}

fn hours_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_seconds() as f64 / 3600.0
}

/// Derive the KPIs from aggregated buckets.
///
/// Peaks use the first bucket on intensity ties, in input order. Input from
/// [`aggregate`](crate::aggregate::aggregate) is hour-sorted per zone, so
/// that is the earliest hour.
pub fn extract_kpis(
    buckets: &[AggregateBucket],
    start: NaiveDateTime,
    thresholds: &KpiConfig,
) -> PropagationKpis {
    let mut zone_names: Vec<&str> = buckets.iter().map(|b| b.zone.as_str()).collect();
    zone_names.sort_unstable();
    zone_names.dedup();

    let mut zones = Vec::with_capacity(zone_names.len());
    let mut first_activations = Vec::new();

    for name in zone_names {
        let zone_buckets: Vec<&AggregateBucket> = buckets.iter().filter(|b| b.zone == name).collect();

        let mut peak = zone_buckets[0];
        for &bucket in &zone_buckets[1..] {
            if bucket.avg_intensity > peak.avg_intensity {
                peak = bucket;
            }
        }

        let mean_event_share =
            zone_buckets.iter().map(|b| b.event_share).sum::<f64>() / zone_buckets.len() as f64;

        zones.push(ZoneKpi {
            zone: name.to_string(),
            peak_intensity: peak.avg_intensity,
            peak_time: peak.hour,
            time_to_peak_hours: hours_between(start, peak.hour),
            mean_event_share,
        });

        if let Some(first) = zone_buckets
            .iter()
            .filter(|b| b.avg_intensity > thresholds.activation_threshold)
            .map(|b| b.hour)
            .min()
        {
            first_activations.push((name.to_string(), first));
        }
    }

    let coverage = if zones.is_empty() {
        0.0
    } else {
        zones
            .iter()
            .filter(|z| z.peak_intensity > thresholds.peak_threshold)
            .count() as f64
            / zones.len() as f64
    };

    first_activations.sort_by_key(|(_, t)| *t);
    let spread_speed_hours = if first_activations.len() > 1 {
        let gaps: Vec<f64> = first_activations
            .windows(2)
            .map(|pair| hours_between(pair[0].1, pair[1].1))
            .collect();
        gaps.iter().sum::<f64>() / gaps.len() as f64
    } else {
        0.0
    };

    let kpis = PropagationKpis {
        zones,
        coverage,
        spread_speed_hours,
        first_activations,
    };

    if let Some(strongest) = kpis.zones.iter().max_by_key(|z| OrderedFloat(z.peak_intensity)) {
        tracing::info!(
            coverage = kpis.coverage,
            spread_speed_hours = kpis.spread_speed_hours,
            strongest_zone = %strongest.zone,
            "Extracted propagation KPIs"
        );
    }

    kpis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::seed::parse_timestamp;

    fn bucket(zone: &str, time: &str, intensity: f64, event_share: f64) -> AggregateBucket {
        AggregateBucket {
            zone: zone.into(),
            hour: parse_timestamp(time).unwrap(),
            avg_sentiment: 0.0,
            avg_intensity: intensity,
            post_count: 1,
            event_share,
        }
    }

    fn start() -> NaiveDateTime {
        parse_timestamp("2025-11-15 18:00").unwrap()
    }

    #[test]
    fn test_peak_and_time_to_peak() {
        let buckets = vec![
            bucket("Retiro", "2025-11-15 18:00", 0.05, 0.0),
            bucket("Retiro", "2025-11-15 19:00", 0.85, 1.0),
            bucket("Retiro", "2025-11-15 20:00", 0.70, 1.0),
        ];
        let kpis = extract_kpis(&buckets, start(), &KpiConfig::default());
        let retiro = kpis.zone("Retiro").unwrap();
        assert_eq!(retiro.peak_intensity, 0.85);
        assert_eq!(retiro.time_to_peak_hours, 1.0);
        assert!((retiro.mean_event_share - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_peak_ties_take_earliest() {
        let buckets = vec![
            bucket("Centro", "2025-11-15 18:00", 1.0, 1.0),
            bucket("Centro", "2025-11-15 19:00", 1.0, 1.0),
        ];
        let kpis = extract_kpis(&buckets, start(), &KpiConfig::default());
        assert_eq!(kpis.zones[0].time_to_peak_hours, 0.0);
    }

    #[test]
    fn test_coverage_and_spread_speed() {
        let buckets = vec![
            bucket("Centro", "2025-11-15 18:00", 1.0, 1.0),
            bucket("Retiro", "2025-11-15 18:00", 0.05, 0.0),
            bucket("Retiro", "2025-11-15 19:00", 0.6, 1.0),
            bucket("Usera", "2025-11-15 18:00", 0.05, 0.0),
            bucket("Usera", "2025-11-15 22:00", 0.3, 1.0),
            bucket("Moncloa", "2025-11-15 18:00", 0.1, 0.0),
        ];
        let kpis = extract_kpis(&buckets, start(), &KpiConfig::default());

        // Centro and Retiro exceed 0.4 out of four zones
        assert_eq!(kpis.coverage, 0.5);
        // Activations at 18, 19 and 22 -> gaps 1 and 3
        assert_eq!(kpis.first_activations.len(), 3);
        assert_eq!(kpis.first_activations[0].0, "Centro");
        assert_eq!(kpis.spread_speed_hours, 2.0);
    }

    #[test]
    fn test_single_activation_has_zero_spread() {
        let buckets = vec![
            bucket("Centro", "2025-11-15 18:00", 0.9, 1.0),
            bucket("Usera", "2025-11-15 18:00", 0.1, 0.0),
        ];
        let kpis = extract_kpis(&buckets, start(), &KpiConfig::default());
        assert_eq!(kpis.spread_speed_hours, 0.0);
    }

    #[test]
    fn test_no_buckets() {
        let kpis = extract_kpis(&[], start(), &KpiConfig::default());
        assert!(kpis.zones.is_empty());
        assert_eq!(kpis.coverage, 0.0);
        assert_eq!(kpis.spread_speed_hours, 0.0);
    }

    #[test]
    fn test_summary_format() {
        let kpis = PropagationKpis {
            zones: Vec::new(),
            coverage: 6.0 / 7.0,
            spread_speed_hours: 2.0 / 3.0,
            first_activations: Vec::new(),
        };
        assert_eq!(kpis.summary(), "KPIs -> coverage: 0.86, spread_speed (h): 0.67");
    }
}
