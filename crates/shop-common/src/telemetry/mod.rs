//! Structured logging

mod tracing_setup;

pub use tracing_setup::{try_init_tracing, LogFormat, TracingConfig, TracingError};
