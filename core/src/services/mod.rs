//! Business logic layered on the record store

pub mod achievements;
pub mod metrics;
