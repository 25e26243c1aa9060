//! Aggregation and KPI extraction over scored posts

pub mod buckets;
pub mod kpi;

pub use buckets::{aggregate, hour_floor, AggregateBucket};
pub use kpi::{extract_kpis, PropagationKpis, ZoneKpi};
