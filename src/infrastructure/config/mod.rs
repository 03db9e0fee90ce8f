//! Configuration loading (figment: defaults, YAML files, environment).

mod loader;

pub use loader::{ConfigError, ConfigLoader, CONFIG_DIR, ENV_PREFIX};
