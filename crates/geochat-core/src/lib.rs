//! GeoChat Core - Domain models, configuration, and ports
//!
//! This crate contains the dataset catalog model, the filter and routing
//! domain types, and the port definitions that adapters implement.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;
pub mod processing;

pub use error::{GeochatError, Result};
