//! Read-back of already-ingested site content.
//!
//! Mirrors how the site loads its content directories, so `ingest-content
//! list` shows what the site will render after an ingestion run:
//!
//! - blog posts, newest first (ties broken by slug)
//! - pages and whitepapers, by slug
//!
//! The slug of an entry is its filename without the content extension. A
//! missing content directory is an empty section, not an error.

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::frontmatter;
use crate::types::{BlogTarget, ContentKind, DocType, PageTarget, WhitepaperTarget};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct Entry<F> {
    pub slug: String,
    pub frontmatter: F,
}

#[derive(Debug, Default)]
pub struct Catalog {
    pub posts: Vec<Entry<BlogTarget>>,
    pub pages: Vec<Entry<PageTarget>>,
    pub whitepapers: Vec<Entry<WhitepaperTarget>>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty() && self.pages.is_empty() && self.whitepapers.is_empty()
    }
}

/// Load every content file under `content_root` (`apps/<app>/content`).
pub fn load_catalog(content_root: &Path, config: &IngestConfig) -> Result<Catalog, IngestError> {
    let dir = |kind: ContentKind| content_root.join(kind.target_dir());
    let ext = config.content_extension.as_str();

    let mut posts: Vec<Entry<BlogTarget>> = load_entries(&dir(ContentKind::BlogPost), ext)?;
    posts.sort_by(|a, b| {
        b.frontmatter
            .date
            .cmp(&a.frontmatter.date)
            .then_with(|| a.slug.cmp(&b.slug))
    });

    Ok(Catalog {
        posts,
        pages: load_entries(&dir(ContentKind::Page(DocType::Spoke)), ext)?,
        whitepapers: load_entries(&dir(ContentKind::Whitepaper), ext)?,
    })
}

/// Parse all `*.<ext>` files in `dir`, sorted by slug.
fn load_entries<F: DeserializeOwned>(dir: &Path, ext: &str) -> Result<Vec<Entry<F>>, IngestError> {
    let mut entries = Vec::new();
    for path in content_files(dir, ext)? {
        let Some(slug) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        let doc = frontmatter::read::<F>(&path).map_err(|e| IngestError::frontmatter(&path, e))?;
        entries.push(Entry {
            slug,
            frontmatter: doc.frontmatter,
        });
    }
    entries.sort_by(|a, b| a.slug.cmp(&b.slug));
    Ok(entries)
}

/// Files directly in `dir` with extension `ext`, sorted. Missing dir → empty.
pub(crate) fn content_files(dir: &Path, ext: &str) -> Result<Vec<PathBuf>, IngestError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == ext))
        .collect();
    files.sort();
    Ok(files)
}
