//! Built-in zone tables and the hand-written seed posts

use chrono::NaiveDateTime;

use crate::core::error::{PulsoError, Result};
use crate::core::types::{Post, PostSource, Zone};

/// The seven Madrid districts of the propagation scenario.
///
/// Centro and Retiro light up first; the wave then reaches the outer
/// districts with increasing delay.
pub fn madrid_zones() -> Vec<Zone> {
    vec![
        Zone::new("Centro", 40.4168, -3.7038, 0),
        Zone::new("Retiro", 40.4110, -3.6760, 1),
        Zone::new("Chamartín", 40.4670, -3.6890, 2),
        Zone::new("Salamanca", 40.4297, -3.6789, 2),
        Zone::new("Arganzuela", 40.3989, -3.7030, 3),
        Zone::new("Usera", 40.3859, -3.6995, 4),
        Zone::new("Moncloa", 40.4358, -3.7183, 3),
    ]
}

/// Zones referenced by the seed posts of the snapshot map
pub fn snapshot_zones() -> Vec<Zone> {
    vec![
        Zone::new("Madrid Centro", 40.4168, -3.7038, 0),
        Zone::new("Madrid Sur", 40.345, -3.709, 0),
        Zone::new("Madrid Retiro", 40.411, -3.676, 0),
        Zone::new("Madrid Chamartín", 40.467, -3.689, 0),
    ]
}

const SEED_POSTS: [(&str, &str, &str); 4] = [
    (
        "Me encanta el concierto en el centro, mucha alegría!",
        "Madrid Centro",
        "2025-11-15 21:00",
    ),
    (
        "El transporte público está fatal hoy, retrasos y quejas",
        "Madrid Sur",
        "2025-11-15 08:30",
    ),
    (
        "Gran evento cultural en Retiro, mucha gente comentando",
        "Madrid Retiro",
        "2025-11-15 19:00",
    ),
    (
        "El tráfico en Chamartín es insoportable",
        "Madrid Chamartín",
        "2025-11-15 09:00",
    ),
];

/// Parse a `YYYY-MM-DD HH:MM` timestamp
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M")
        .map_err(|e| PulsoError::InvalidConfig(format!("Bad timestamp '{}': {}", raw, e)))
}

/// Build the seed posts, resolving each location against `zones`
pub fn seed_posts(zones: &[Zone]) -> Result<Vec<Post>> {
    SEED_POSTS
        .iter()
        .map(|(text, zone_name, time)| -> Result<Post> {
            let zone = zones
                .iter()
                .find(|z| z.name == *zone_name)
                .ok_or_else(|| PulsoError::UnknownZone(zone_name.to_string()))?;
            Ok(Post {
                text: text.to_string(),
                zone: zone.name.clone(),
                location: zone.location,
                timestamp: parse_timestamp(time)?,
                intensity: 0.0,
                source: PostSource::Seed,
            })
        })
        .collect()
}
