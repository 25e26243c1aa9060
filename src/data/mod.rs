pub mod seed;

pub use seed::{madrid_zones, seed_posts, snapshot_zones};
