//! Workspace configuration (`.ts-catalog.json`).
mod loader;
mod manager;
mod matcher;
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use manager::ConfigManager;
pub use matcher::{
    CatalogMatcher,
    MatcherError,
};
pub use types::{
    CatalogSettings,
    ConfigError,
    IndexingConfig,
    OutputConfig,
    SettingsOverrides,
    ValidationError,
};
