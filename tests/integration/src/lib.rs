//! Integration test utilities for the alert engine
//!
//! In-memory repositories plus helpers for seeding events and orders at
//! offsets from a fixed instant, so detector windows can be tested exactly.

pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
