//! Derived event classification for telemetry snapshots

pub mod classifier;

pub use classifier::{classify, engine_status, is_anomalous, Classification};
