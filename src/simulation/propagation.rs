//! Synthetic event propagation across zones
//!
//! The wave starts at the zones with zero delay and reaches the others as
//! their activation delay elapses. Intensity decays linearly over the window,
//! so late zones peak lower than early ones.

use rand::Rng;
use rand_distr::Distribution;

use crate::core::types::{Post, PostSource};
use crate::simulation::context::SimulationContext;

pub fn event_text(zone: &str) -> String {
    format!("Gran concierto cerca de {}, ¡qué ambiente!", zone)
}

pub fn complaint_text(zone: &str) -> String {
    format!("Retrasos en el transporte por afluencia cerca de {}", zone)
}

/// Generate one post per (hour, zone) pair, hours in the outer loop.
///
/// Random draws per pair, in order: intensity noise, template choice (only
/// when the zone is active), latitude jitter, longitude jitter.
pub fn generate_posts(ctx: &mut SimulationContext) -> Vec<Post> {
    let window = ctx.window;
    let noise = ctx.noise;
    let mut posts = Vec::with_capacity((window.hours as usize + 1) * ctx.zones.len());

    for t in window.time_points() {
        let elapsed = window.elapsed_seconds(t);
        let base_intensity = window.base_intensity(t);

        for zone in &ctx.zones {
            let active = elapsed >= zone.activation_delay_hours as f64 * 3600.0;
            let gated = if active { base_intensity } else { 0.0 };
            let intensity = (gated + noise.intensity.sample(&mut ctx.rng)).clamp(0.0, 1.0);

            let text = if active && ctx.rng.gen::<f64>() < noise.event_probability {
                event_text(&zone.name)
            } else {
                complaint_text(&zone.name)
            };

            let d_lat = noise.jitter.sample(&mut ctx.rng);
            let d_lon = noise.jitter.sample(&mut ctx.rng);

            posts.push(Post {
                text,
                zone: zone.name.clone(),
                location: zone.location.offset(d_lat, d_lon),
                timestamp: t,
                intensity,
                source: PostSource::Simulated { active },
            });
        }
    }

    tracing::debug!(
        posts = posts.len(),
        zones = ctx.zones.len(),
        hours = window.hours,
        "Generated synthetic posts"
    );

    posts
}
