//! YAML frontmatter parsing and serialization.
//!
//! A document is an optional `---` delimited YAML block at the very start of
//! the file, followed by the Markdown body:
//!
//! ```text
//! ---
//! title: Why SemOps
//! slug: why-semops
//! ---
//! Body text starts here.
//! ```
//!
//! Parsing deserializes the block straight into one of the typed source
//! schemas in [`crate::types`], so a missing required field (`title`, `slug`,
//! ...) is reported here instead of leaking into an output path.

use crate::types::SourceDocument;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

const DELIMITER: &str = "---";

/// Split raw text into `(yaml, body)`.
///
/// The opening delimiter must be the first line; the closing delimiter is the
/// next line consisting of `---` alone. The newline after the closing
/// delimiter belongs to neither part. Text without a complete block comes
/// back as `(None, text)`.
pub fn split(text: &str) -> (Option<&str>, &str) {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let Some(rest) = text
        .strip_prefix(DELIMITER)
        .and_then(|r| r.strip_prefix("\r\n").or_else(|| r.strip_prefix('\n')))
    else {
        return (None, text);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }
    (None, text)
}

/// Parse frontmatter + body into a typed document.
///
/// A file without frontmatter is treated as an empty mapping, which fails
/// for any schema with required fields.
pub fn parse<F: DeserializeOwned>(text: &str) -> Result<SourceDocument<F>, FrontmatterError> {
    let (yaml, body) = split(text);
    let yaml = yaml.filter(|y| !y.trim().is_empty()).unwrap_or("{}");
    let frontmatter: F = serde_yaml::from_str(yaml)?;
    Ok(SourceDocument {
        frontmatter,
        body: body.to_string(),
    })
}

/// Read and parse a file.
pub fn read<F: DeserializeOwned>(path: &Path) -> Result<SourceDocument<F>, FrontmatterError> {
    let text = fs::read_to_string(path)?;
    parse(&text)
}

/// Serialize frontmatter + body back into a single document.
///
/// The output always ends with a newline.
pub fn stringify<F: Serialize>(frontmatter: &F, body: &str) -> Result<String, FrontmatterError> {
    let yaml = serde_yaml::to_string(frontmatter)?;
    let mut out = String::with_capacity(yaml.len() + body.len() + 10);
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(&yaml);
    if !yaml.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(body);
    if !body.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}
