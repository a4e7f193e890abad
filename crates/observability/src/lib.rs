//! Tracing/logging setup shared by every binary in the workspace.

pub mod tracing;

pub use crate::tracing::{LogFormat, init, init_with};
