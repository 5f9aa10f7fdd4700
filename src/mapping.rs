//! Publisher → site frontmatter mapping.
//!
//! Each content kind has its own projection:
//!
//! | Target field | Page | Blog | Whitepaper |
//! |---|---|---|---|
//! | `title` | title | title | title |
//! | `description` | description → first paragraph → title | | description → first paragraph → title |
//! | `date` | | `date_updated` | `date_updated` |
//! | `category` | | `--category` → first matching tag → default | |
//! | `tags` | | tags or `[]` | tags or `[]` |
//! | `excerpt` | | description → title | |
//!
//! Dates use `date_updated`, not `date_created`, so an edited post moves up
//! the listing.

use crate::config::IngestConfig;
use crate::describe::extract_description;
use crate::error::IngestError;
use crate::types::{
    BlogSource, BlogTarget, PageSource, PageTarget, WhitepaperSource, WhitepaperTarget,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub fn map_page(source: &PageSource, body: &str, config: &IngestConfig) -> PageTarget {
    PageTarget {
        title: source.title.clone(),
        description: description_or_extract(
            source.description.as_deref(),
            &source.title,
            body,
            config,
        ),
    }
}

pub fn map_blog(
    source: &BlogSource,
    category_override: Option<&str>,
    config: &IngestConfig,
) -> Result<BlogTarget, IngestError> {
    let tags = source.tags.clone().unwrap_or_default();
    let category = match non_empty(category_override) {
        Some(category) => category.to_string(),
        None => derive_category(&tags, config).to_string(),
    };

    Ok(BlogTarget {
        title: source.title.clone(),
        date: normalize_date(&source.date_updated)?,
        author: source.author.clone(),
        category,
        tags,
        excerpt: non_empty(source.description.as_deref())
            .unwrap_or(&source.title)
            .to_string(),
    })
}

pub fn map_whitepaper(
    source: &WhitepaperSource,
    body: &str,
    config: &IngestConfig,
) -> Result<WhitepaperTarget, IngestError> {
    Ok(WhitepaperTarget {
        title: source.title.clone(),
        description: description_or_extract(
            source.description.as_deref(),
            &source.title,
            body,
            config,
        ),
        abstract_text: source.abstract_text.clone(),
        author: source.author.clone(),
        date: normalize_date(&source.date_updated)?,
        version: source.version.clone(),
        tags: source.tags.clone().unwrap_or_default(),
    })
}

/// Category of the first tag present in the mapping; tag order decides ties.
pub fn derive_category<'a>(tags: &[String], config: &'a IngestConfig) -> &'a str {
    tags.iter()
        .find_map(|tag| config.category_for_tag(tag))
        .unwrap_or(&config.default_category)
}

/// Normalize a date string to `YYYY-MM-DD`.
///
/// Already-normalized input is returned unchanged. Timestamps with an offset
/// are converted to UTC first, so the calendar day is the UTC day.
pub fn normalize_date(raw: &str) -> Result<String, IngestError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if raw.len() == 10 {
            return Ok(raw.to_string());
        }
        return Ok(date.format("%Y-%m-%d").to_string());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc().date().format("%Y-%m-%d").to_string());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(dt.date().format("%Y-%m-%d").to_string());
        }
    }
    Err(IngestError::InvalidDate(raw.to_string()))
}

fn description_or_extract(
    description: Option<&str>,
    title: &str,
    body: &str,
    config: &IngestConfig,
) -> String {
    match non_empty(description) {
        Some(desc) => desc.to_string(),
        None => extract_description(body, title, config.description_max_chars),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
