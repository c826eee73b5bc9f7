//! Configuration file support for release-forest.
//!
//! Provides YAML-based configuration through `release-forest.config.yml`
//! files, including data structures, file loading, and validation.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crate::adapters::outbound::resolvers::ReleaseRule;
use crate::application::dto::OutputFormat;
use crate::release_analysis::services::{CyclePolicy, ResolutionPolicy};
use crate::shared::security::read_regular_file;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "release-forest.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub format: Option<String>,
    pub exclude_components: Option<Vec<String>>,
    pub include_unmanaged: Option<bool>,
    pub resolution_policy: Option<String>,
    pub cycle_policy: Option<String>,
    pub release_rules: Option<Vec<ReleaseRule>>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

impl ConfigFile {
    /// Parsed `format`, if set. Only valid after [`load_config_from_path`].
    pub fn output_format(&self) -> Option<OutputFormat> {
        self.format.as_deref().and_then(|f| OutputFormat::from_str(f).ok())
    }

    pub fn resolution_policy(&self) -> Option<ResolutionPolicy> {
        self.resolution_policy
            .as_deref()
            .and_then(|p| ResolutionPolicy::from_str(p).ok())
    }

    pub fn cycle_policy(&self) -> Option<CyclePolicy> {
        self.cycle_policy
            .as_deref()
            .and_then(|p| CyclePolicy::from_str(p).ok())
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = read_regular_file(path, "config file").with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(ref format) = config.format {
        if let Err(e) = OutputFormat::from_str(format) {
            bail!("Invalid config: {}", e);
        }
    }
    if let Some(ref policy) = config.resolution_policy {
        if let Err(e) = ResolutionPolicy::from_str(policy) {
            bail!("Invalid config: {}", e);
        }
    }
    if let Some(ref policy) = config.cycle_policy {
        if let Err(e) = CyclePolicy::from_str(policy) {
            bail!("Invalid config: {}", e);
        }
    }

    if let Some(ref rules) = config.release_rules {
        for (i, rule) in rules.iter().enumerate() {
            if rule.group.trim().is_empty() {
                bail!(
                    "Invalid config: release_rules[{}].group must not be empty.\n\n\
                     💡 Hint: Use a group such as \"org.acme\" or a prefix such as \"org.acme*\".",
                    i
                );
            }
            if rule.tag.trim().is_empty() {
                bail!(
                    "Invalid config: release_rules[{}].tag must not be empty.\n\n\
                     💡 Hint: Tags may use {{group}}, {{name}} and {{version}} (e.g., \"v{{version}}\").",
                    i
                );
            }
        }
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    let mut keys: Vec<&String> = config.unknown_fields.keys().collect();
    keys.sort();
    for key in keys {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
