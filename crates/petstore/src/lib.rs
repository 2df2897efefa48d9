//! Covenant Pet Store - Contract suite for the pet-store REST API
//!
//! This crate defines the pet-store scenarios and a runner that executes
//! them concurrently against a configured base URL.

pub mod model;
pub mod scenarios;
pub mod suite;

pub use model::{Pet, PetStatus};
pub use suite::{SuiteReport, run_suite};
