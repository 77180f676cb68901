//! Configuration module for costroll
//!
//! This module provides configuration management including:
//! - Config directory resolution
//! - Persisted engine settings (revenue precedence, margin bands, tolerances)

pub mod paths;
pub mod settings;

pub use paths::CostrollPaths;
pub use settings::Settings;
