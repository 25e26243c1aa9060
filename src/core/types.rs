//! Core type definitions used throughout the codebase

use chrono::NaiveDateTime;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn offset(&self, d_lat: f64, d_lon: f64) -> Self {
        Self {
            lat: self.lat + d_lat,
            lon: self.lon + d_lon,
        }
    }
}

impl From<GeoPoint> for geo_types::Point<f64> {
    fn from(p: GeoPoint) -> Self {
        // geo uses x = longitude, y = latitude
        geo_types::Point::new(p.lon, p.lat)
    }
}

impl From<geo_types::Point<f64>> for GeoPoint {
    fn from(p: geo_types::Point<f64>) -> Self {
        Self { lat: p.y(), lon: p.x() }
    }
}

/// A named area of the city with the hour at which it joins the event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    pub location: GeoPoint,
    /// Hours after event start before the zone shows non-baseline activity
    pub activation_delay_hours: u32,
}

impl Zone {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64, activation_delay_hours: u32) -> Self {
        Self {
            name: name.into(),
            location: GeoPoint::new(lat, lon),
            activation_delay_hours,
        }
    }
}

/// Where a post came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostSource {
    /// Hand-written seed list
    Seed,
    /// Propagation simulator; `active` records whether the zone had activated
    Simulated { active: bool },
}

/// A geotagged social-media post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub text: String,
    pub zone: String,
    pub location: GeoPoint,
    pub timestamp: NaiveDateTime,
    /// Simulated activity level in [0, 1]; seed posts carry 0.0
    pub intensity: f64,
    pub source: PostSource,
}

impl Post {
    pub fn is_active(&self) -> bool {
        match self.source {
            PostSource::Seed => true,
            PostSource::Simulated { active } => active,
        }
    }
}

/// Human label attached to an NMF component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
pub enum TopicLabel {
    #[display(fmt = "Events/Culture")]
    EventsCulture,
    #[display(fmt = "Transport/Mobility")]
    TransportMobility,
}

impl TopicLabel {
    pub const ALL: [TopicLabel; 2] = [TopicLabel::EventsCulture, TopicLabel::TransportMobility];

    /// Label used when keyword overlap cannot decide (component index convention)
    pub fn by_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Marker colour in the rendered map
    pub fn color(&self) -> &'static str {
        match self {
            TopicLabel::EventsCulture => "#1f78b4",
            TopicLabel::TransportMobility => "#e31a1c",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicAssignment {
    pub topic_id: usize,
    pub label: TopicLabel,
}

/// A post enriched with derived sentiment and topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPost {
    pub post: Post,
    /// Polarity in [-1, 1]
    pub sentiment: f64,
    pub topic: TopicAssignment,
}

impl ScoredPost {
    pub fn is_event(&self) -> bool {
        self.topic.label == TopicLabel::EventsCulture
    }
}
