//! Pulso Urbano - social pulse of a city on an interactive map
//!
//! Simulated geotagged posts are scored for sentiment, grouped into topics,
//! aggregated per zone and hour, and summarised as propagation KPIs before
//! being drawn as heatmaps and a timeline.

pub mod aggregate;
pub mod core;
pub mod data;
pub mod nlp;
pub mod pipeline;
pub mod render;
pub mod simulation;
