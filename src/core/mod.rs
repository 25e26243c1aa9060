pub mod config;
pub mod error;
pub mod types;

pub use config::PulsoConfig;
pub use error::{PulsoError, Result};
pub use types::{GeoPoint, Post, PostSource, ScoredPost, TopicAssignment, TopicLabel, Zone};
