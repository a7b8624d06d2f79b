use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::merge::MergeOptions;
use crate::output::{
    LocationsMode,
    WriteOptions,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "includePatterns[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Contents of `.ts-catalog.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogSettings {
    /// Catalog files to pick up when scanning a workspace.
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,

    /// Written as `sourcelanguage` on catalogs that do not declare one.
    pub source_language: Option<String>,

    pub merge: MergeOptions,
    pub output: OutputConfig,
    pub indexing: IndexingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputConfig {
    pub locations: LocationsMode,
}

impl OutputConfig {
    #[must_use]
    pub const fn write_options(&self) -> WriteOptions {
        WriteOptions { locations: self.locations }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexingConfig {
    /// Parallel thread count for reading catalogs.
    /// Default: 80% of CPU cores (minimum 1).
    pub num_threads: Option<usize>,
}

impl IndexingConfig {
    /// Configured thread count, or 80% of the CPU cores (minimum 1).
    #[must_use]
    pub fn thread_count(&self) -> usize {
        self.num_threads.unwrap_or_else(|| (num_cpus::get() * 4 / 5).max(1))
    }
}

/// Command-line values that take precedence over `.ts-catalog.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettingsOverrides {
    /// `--no-obsolete`: drop vanished messages after merging.
    pub no_obsolete: bool,
    /// `--jobs`: parallel readers for `stats`.
    pub num_threads: Option<usize>,
}

impl CatalogSettings {
    /// Settings with `overrides` applied on top.
    #[must_use]
    pub fn with_overrides(&self, overrides: SettingsOverrides) -> Self {
        let mut settings = self.clone();
        settings.merge.no_obsolete |= overrides.no_obsolete;
        if overrides.num_threads.is_some() {
            settings.indexing.num_threads = overrides.num_threads;
        }
        settings
    }

    /// # Errors
    /// - Required field is empty
    /// - Invalid glob pattern
    /// - Zero thread count
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.include_patterns.is_empty() {
            errors.push(ValidationError::new(
                "includePatterns",
                "At least one pattern is required. Example: [\"**/*.ts\"]",
            ));
        }

        for (index, pattern) in self.include_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("includePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        for (index, pattern) in self.exclude_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("excludePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if let Some(language) = &self.source_language
            && language.trim().is_empty()
        {
            errors.push(ValidationError::new(
                "sourceLanguage",
                "The language cannot be empty. Please specify a locale (e.g., \"en\"), or remove this field",
            ));
        }

        if self.indexing.num_threads == Some(0) {
            errors.push(ValidationError::new(
                "indexing.numThreads",
                "At least one thread is required. Remove this field to use the default",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            include_patterns: vec!["**/*.ts".to_string()],
            exclude_patterns: vec!["node_modules/**".to_string()],
            source_language: None,
            merge: MergeOptions::default(),
            output: OutputConfig::default(),
            indexing: IndexingConfig::default(),
        }
    }
}
