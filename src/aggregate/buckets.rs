//! Zone x hour aggregation

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::core::types::ScoredPost;

/// Summary of every post of one zone within one clock hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateBucket {
    pub zone: String,
    /// Start of the hour
    pub hour: NaiveDateTime,
    pub avg_sentiment: f64,
    pub avg_intensity: f64,
    pub post_count: usize,
    /// Fraction of posts labelled Events/Culture
    pub event_share: f64,
}

/// Truncate a timestamp to the start of its hour
pub fn hour_floor(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}

#[derive(Default)]
struct Accumulator {
    sentiment: f64,
    intensity: f64,
    events: usize,
    count: usize,
}

/// Group posts by (zone, hour) and average each group.
///
/// Buckets come back sorted by zone name, then hour. Empty groups are never
/// produced.
pub fn aggregate(posts: &[ScoredPost]) -> Vec<AggregateBucket> {
    let mut groups: BTreeMap<(&str, NaiveDateTime), Accumulator> = BTreeMap::new();

    for scored in posts {
        let key = (scored.post.zone.as_str(), hour_floor(scored.post.timestamp));
        let acc = groups.entry(key).or_default();
        acc.sentiment += scored.sentiment;
        acc.intensity += scored.post.intensity;
        acc.count += 1;
        if scored.is_event() {
            acc.events += 1;
        }
    }

    groups
        .into_iter()
        .map(|((zone, hour), acc)| {
            let n = acc.count as f64;
            AggregateBucket {
                zone: zone.to_string(),
                hour,
                avg_sentiment: acc.sentiment / n,
                avg_intensity: acc.intensity / n,
                post_count: acc.count,
                event_share: acc.events as f64 / n,
            }
        })
        .collect()
}
