//! Configuration management.
//!
//! # Data Flow
//!
//! 1. `main` reads the TOML file named on the command line (or falls back
//!    to defaults when none is given)
//! 2. [`loader::load_config`] deserializes it into [`schema::MintlyConfig`]
//! 3. [`validation::validate_config`] rejects semantically bad values with
//!    every problem listed, not just the first

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::MintlyConfig;
pub use validation::ValidationError;
