//! Per-service auth descriptors and the per-attempt context.

pub mod context;
pub mod data;

pub use context::*;
pub use data::*;
