//! Temporal propagation simulator

pub mod context;
pub mod propagation;

pub use context::{NoiseModel, SimulationContext, TimeWindow, MAX_WINDOW_HOURS};
pub use propagation::{complaint_text, event_text, generate_posts};
