//! Shared types used across the three ingestion pipelines.
//!
//! Source frontmatter schemas (what the publisher writes) are deserialized
//! from YAML; target schemas (what the site renders) are serialized back to
//! YAML. Targets are strict narrowings: anything not listed here is dropped.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Target site instance. Selects `apps/<app>/content/` as the output root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum App {
    #[default]
    Semops,
    Timjmitchell,
}

impl App {
    pub fn dir_name(self) -> &'static str {
        match self {
            App::Semops => "semops",
            App::Timjmitchell => "timjmitchell",
        }
    }
}

impl fmt::Display for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Role of a page within its hub group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    Hub,
    Spoke,
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocType::Hub => "hub",
            DocType::Spoke => "spoke",
        })
    }
}

/// The three kinds of content the publisher produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Page(DocType),
    BlogPost,
    Whitepaper,
}

impl ContentKind {
    /// Directory under `apps/<app>/content/` that receives this kind.
    pub fn target_dir(self) -> &'static str {
        match self {
            ContentKind::Page(_) => "pages",
            ContentKind::BlogPost => "blog",
            ContentKind::Whitepaper => "whitepapers",
        }
    }
}

/// A parsed source file: typed frontmatter plus the raw Markdown body.
///
/// Never mutated; transforms read it and produce new values.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument<F> {
    pub frontmatter: F,
    pub body: String,
}

// ============================================================================
// Source (publisher) schemas
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageSource {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub doc_type: Option<DocType>,
    #[serde(default)]
    pub hub: Option<String>,
    #[serde(default)]
    pub spokes: Option<Vec<String>>,
    #[serde(default)]
    pub audience_tier: Option<String>,
    #[serde(default)]
    pub style_guide: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub date_updated: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BlogSource {
    pub title: String,
    pub slug: String,
    pub author: String,
    #[serde(deserialize_with = "scalar_string")]
    pub date_updated: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub style_guide: Option<String>,
    #[serde(default)]
    pub audience_tier: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WhitepaperSource {
    pub title: String,
    pub slug: String,
    pub author: String,
    #[serde(deserialize_with = "scalar_string")]
    pub date_updated: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar_string")]
    pub version: Option<String>,
    #[serde(default)]
    pub style_guide: Option<String>,
    #[serde(default)]
    pub audience_tier: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Accept any YAML scalar as a string, so `version: 1.0` reads as `"1.0"`.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar, found {other:?}"
        ))),
    }
}

fn optional_scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::Null => Ok(None),
        value => scalar_string(value).map(Some).map_err(serde::de::Error::custom),
    }
}

// ============================================================================
// Target (site) schemas. Field order is the serialized key order.
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageTarget {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogTarget {
    pub title: String,
    pub date: String,
    pub author: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub excerpt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhitepaperTarget {
    pub title: String,
    pub description: String,
    #[serde(
        default,
        rename = "abstract",
        skip_serializing_if = "Option::is_none"
    )]
    pub abstract_text: Option<String>,
    pub author: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}
