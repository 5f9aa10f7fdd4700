//! Crate-wide error type.
//!
//! Every pipeline returns `Result<_, IngestError>`. Nothing here exits the
//! process; the binary turns an error into a printed message and exit code 1.

use crate::config::ConfigError;
use crate::frontmatter::FrontmatterError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Source directory not found: {}", .0.display())]
    SourceDirNotFound(PathBuf),
    #[error("Source file not found: {}", .0.display())]
    SourceFileNotFound(PathBuf),
    #[error("No .md files found in {}", .0.display())]
    NoMarkdownFiles(PathBuf),
    #[error("Invalid frontmatter in {}: {source}", .path.display())]
    Frontmatter {
        path: PathBuf,
        #[source]
        source: FrontmatterError,
    },
    #[error("Invalid slug {slug:?} in {}", .path.display())]
    InvalidSlug { path: PathBuf, slug: String },
    #[error("Invalid date: {0:?}")]
    InvalidDate(String),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IngestError {
    pub(crate) fn frontmatter(path: impl Into<PathBuf>, source: FrontmatterError) -> Self {
        IngestError::Frontmatter {
            path: path.into(),
            source,
        }
    }
}
