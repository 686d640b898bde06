//! Common test utilities and infrastructure
//!
//! Shared fixtures (scripted stand-ins for IIS Express and PhantomJS)
//! and helpers used across the test suites.

pub mod fixtures;
pub mod helpers;

pub use fixtures::TestFixtures;
pub use helpers::{write_script, RecordingSink};
