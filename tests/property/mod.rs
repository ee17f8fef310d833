//! Property-based tests for the ordering guarantees

mod reconcile_properties;
mod ring_properties;
