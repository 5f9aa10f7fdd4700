//! Ingestion configuration module.
//!
//! Handles loading, validating, and merging `ingest.toml`. Every value has a
//! compiled-in stock default; a user file in the sites repository root only
//! needs the keys it wants to override.
//!
//! ## Config File Location
//!
//! ```text
//! semops-sites/
//! ├── ingest.toml          # Optional (overrides stock defaults)
//! └── apps/
//!     ├── semops/content/
//!     └── timjmitchell/content/
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! publisher_root = "../semops-publisher"  # Relative to the sites root
//! content_extension = "mdx"
//! description_max_chars = 200
//! spoke_route_prefix = "/framework"
//! fallback_hub_route = "/about"
//! default_category = "Industry"
//!
//! [hub_routes]
//! what-is-semops = "/framework/what-is-semops"
//! framework = "/framework"
//!
//! [categories]
//! career = "Industry"
//! testing = "Technical"
//! ```
//!
//! ## Table Merging
//!
//! `[hub_routes]` and `[categories]` merge key-by-key with the stock tables:
//! adding one hub does not drop the others.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE: &str = "ingest.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Ingestion settings loaded from `ingest.toml`.
///
/// Loaded once per invocation and shared by reference; nothing mutates it
/// after [`load_config`] returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    /// Publisher repository location, relative to the sites root unless absolute.
    pub publisher_root: String,
    /// Extension (without the dot) of written content files.
    pub content_extension: String,
    /// Maximum length of an extracted description, ellipsis included.
    pub description_max_chars: usize,
    /// Route prefix for spoke pages: `<prefix>/<slug>`.
    pub spoke_route_prefix: String,
    /// Route used when the hub being ingested is not in `hub_routes`.
    pub fallback_hub_route: String,
    /// Category used when none of a post's tags is in `categories`.
    pub default_category: String,
    /// Known hub slugs and their canonical site routes.
    pub hub_routes: BTreeMap<String, String>,
    /// Lower-cased tag → category label.
    pub categories: BTreeMap<String, String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        let hub_routes = [
            ("what-is-semops", "/framework/what-is-semops"),
            ("why-semops", "/framework/why-semops"),
            ("how-i-got-here", "/about/how-i-got-here"),
            ("framework", "/framework"),
            ("strategic-data", "/framework/strategic-data"),
            ("symbiotic-architecture", "/framework/symbiotic-architecture"),
            ("semantic-optimization", "/framework/semantic-optimization"),
        ];
        let categories = [
            ("semops", "Industry"),
            ("ai-integration", "Industry"),
            ("career", "Industry"),
            ("product-management", "Industry"),
            ("mental-models", "Industry"),
            ("testing", "Technical"),
            ("mdx", "Technical"),
            ("technical", "Technical"),
        ];
        Self {
            publisher_root: "../semops-publisher".to_string(),
            content_extension: "mdx".to_string(),
            description_max_chars: 200,
            spoke_route_prefix: "/framework".to_string(),
            fallback_hub_route: "/about".to_string(),
            default_category: "Industry".to_string(),
            hub_routes: to_owned_map(&hub_routes),
            categories: to_owned_map(&categories),
        }
    }
}

fn to_owned_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl IngestConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.description_max_chars < 4 {
            return Err(ConfigError::Validation(
                "description_max_chars must be at least 4".into(),
            ));
        }
        if self.content_extension.is_empty() || self.content_extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "content_extension must be non-empty and have no leading dot".into(),
            ));
        }
        for (name, route) in [
            ("spoke_route_prefix", &self.spoke_route_prefix),
            ("fallback_hub_route", &self.fallback_hub_route),
        ] {
            if !route.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "{name} must start with '/': {route}"
                )));
            }
        }
        if let Some((slug, route)) = self.hub_routes.iter().find(|(_, r)| !r.starts_with('/')) {
            return Err(ConfigError::Validation(format!(
                "hub_routes.{slug} must start with '/': {route}"
            )));
        }
        if self.default_category.trim().is_empty()
            || self.categories.values().any(|c| c.trim().is_empty())
        {
            return Err(ConfigError::Validation(
                "category labels must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Configured route of a known hub, `None` for anything else.
    pub fn hub_route(&self, slug: &str) -> Option<&str> {
        self.hub_routes.get(slug).map(String::as_str)
    }

    /// Route of the hub currently being ingested; unknown hubs fall back.
    pub fn route_for_hub(&self, slug: &str) -> &str {
        self.hub_route(slug).unwrap_or(&self.fallback_hub_route)
    }

    /// Route of a spoke page.
    pub fn spoke_route(&self, slug: &str) -> String {
        format!("{}/{}", self.spoke_route_prefix.trim_end_matches('/'), slug)
    }

    /// Category label for a single tag, matched case-insensitively.
    pub fn category_for_tag(&self, tag: &str) -> Option<&str> {
        self.categories
            .get(&tag.to_lowercase())
            .map(String::as_str)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(IngestConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `ingest.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<IngestConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, lowercase_category_keys(ov)),
        None => base,
    };
    let config: IngestConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Tags are matched lower-cased, so `[categories]` keys are stored that way.
fn lowercase_category_keys(mut overlay: toml::Value) -> toml::Value {
    if let Some(toml::Value::Table(categories)) = overlay.get_mut("categories") {
        *categories = std::mem::take(categories)
            .into_iter()
            .map(|(tag, label)| (tag.to_lowercase(), label))
            .collect();
    }
    overlay
}

/// Load config from `ingest.toml` in the given sites root.
pub fn load_config(root: &Path) -> Result<IngestConfig, ConfigError> {
    resolve_config(load_raw_config(root)?)
}

/// Returns a fully-commented stock `ingest.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Content Ingestion Configuration
# ===============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file at the root of the sites repository as ingest.toml.
# Unknown keys will cause an error.

# Location of the publisher repository. Relative paths are resolved
# against the sites root; --source on the command line wins over this.
publisher_root = "../semops-publisher"

# Extension of written content files (no leading dot).
content_extension = "mdx"

# Extracted descriptions longer than this are cut and end in "...".
description_max_chars = 200

# Spoke pages are routed to <spoke_route_prefix>/<slug>.
spoke_route_prefix = "/framework"

# Route for the hub being ingested when it is not listed in [hub_routes].
fallback_hub_route = "/about"

# Blog category used when no tag matches [categories].
default_category = "Industry"

# ---------------------------------------------------------------------------
# Hub routes: hub slug -> site route
# ---------------------------------------------------------------------------
[hub_routes]
what-is-semops = "/framework/what-is-semops"
why-semops = "/framework/why-semops"
how-i-got-here = "/about/how-i-got-here"
framework = "/framework"
strategic-data = "/framework/strategic-data"
symbiotic-architecture = "/framework/symbiotic-architecture"
semantic-optimization = "/framework/semantic-optimization"

# ---------------------------------------------------------------------------
# Blog categories: tag -> category (first matching tag wins, any case)
# ---------------------------------------------------------------------------
[categories]
semops = "Industry"
ai-integration = "Industry"
career = "Industry"
product-management = "Industry"
mental-models = "Industry"
testing = "Technical"
mdx = "Technical"
technical = "Technical"
"##
}
