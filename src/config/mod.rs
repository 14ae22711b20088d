//! Configuration loading and management for the tuition office engine.
//!
//! This module provides functionality to load office configuration from YAML
//! files: the letterhead, academic settings and payroll settings.
//!
//! # Example
//!
//! ```no_run
//! use tuition_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded office: {}", config.organization().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AcademicSettings, OfficeConfig, Organization, PayrollSettings};
