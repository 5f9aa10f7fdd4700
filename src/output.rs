//! CLI output formatting for ingestion runs and the content catalog.
//!
//! # Output Format
//!
//! ## Ingest (dry run)
//!
//! ```text
//! Ingesting pages from: ../semops-publisher/content/pages/why-semops
//! Target app: semops
//! Dry run: yes
//!
//! Processing: semantic-coherence.md (spoke)
//!   Would create: apps/semops/content/pages/semantic-coherence.mdx
//!   Frontmatter: {"title":"Semantic Coherence","description":"..."}
//!
//! Done. Processed 1 files.
//! ```
//!
//! Blog posts and whitepapers print their frontmatter as pretty-printed
//! JSON, and a live run prints `Created: <path>` instead.
//!
//! ## List
//!
//! ```text
//! Blog
//! 001 2024-01-02 Career Pivot [Industry]
//!     Source: blog/career-pivot.mdx
//!
//! Pages
//! 001 Why SemOps
//!     Source: pages/why-semops.mdx
//! ```
//!
//! # Architecture
//!
//! Each `format_*` function returns `Vec<String>` and does no I/O; the
//! `print_*` wrappers write those lines to stdout.

use crate::catalog::{Catalog, Entry};
use crate::ingest::{IngestReport, IngestedItem, Job};
use crate::types::{App, ContentKind};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max).collect();
        format!("{}...", kept)
    }
}

// ============================================================================
// Ingest
// ============================================================================

/// Lines printed before a job starts, so the resolved source path is shown
/// even when the job then fails to find it.
pub fn format_ingest_header(job: &Job, source: &Path, app: App, dry_run: bool) -> Vec<String> {
    vec![
        format!("Ingesting {} from: {}", job.noun(), source.display()),
        format!("Target app: {}", app),
        format!("Dry run: {}", if dry_run { "yes" } else { "no" }),
        String::new(),
    ]
}

pub fn format_ingest_report(report: &IngestReport) -> Vec<String> {
    let mut lines = Vec::new();
    for item in &report.items {
        lines.extend(format_item(item));
    }
    lines.push(String::new());
    match report.job {
        Job::Pages { .. } => lines.push(format!("Done. Processed {} files.", report.items.len())),
        _ => lines.push("Done.".to_string()),
    }
    lines
}

fn format_item(item: &IngestedItem) -> Vec<String> {
    let mut lines = Vec::new();
    match item.kind {
        ContentKind::Page(doc_type) => {
            lines.push(format!("Processing: {} ({})", item.label, doc_type))
        }
        _ => lines.push(format!("Processing: {}", item.label)),
    }

    if item.written {
        lines.push(format!("  Created: {}", item.target_path.display()));
        return lines;
    }

    lines.push(format!("  Would create: {}", item.target_path.display()));
    let json = match item.kind {
        ContentKind::Page(_) => item.frontmatter.to_string(),
        _ => serde_json::to_string_pretty(&item.frontmatter)
            .unwrap_or_else(|_| item.frontmatter.to_string()),
    };
    let mut json_lines = json.lines();
    if let Some(first) = json_lines.next() {
        lines.push(format!("  Frontmatter: {}", first));
    }
    lines.extend(json_lines.map(String::from));
    lines
}

pub fn print_ingest_header(job: &Job, source: &Path, app: App, dry_run: bool) {
    for line in format_ingest_header(job, source, app, dry_run) {
        println!("{}", line);
    }
}

pub fn print_ingest_report(report: &IngestReport) {
    for line in format_ingest_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Catalog
// ============================================================================

pub fn format_catalog(catalog: &Catalog, app: App, extension: &str) -> Vec<String> {
    if catalog.is_empty() {
        return vec![format!("No content found for {}", app)];
    }

    let mut lines = Vec::new();

    section(&mut lines, "Blog", &catalog.posts, "blog", extension, |p| {
        format!(
            "{} {} [{}]",
            p.frontmatter.date, p.frontmatter.title, p.frontmatter.category
        )
    });
    section(&mut lines, "Pages", &catalog.pages, "pages", extension, |p| {
        p.frontmatter.title.clone()
    });
    section(
        &mut lines,
        "Whitepapers",
        &catalog.whitepapers,
        "whitepapers",
        extension,
        |w| match &w.frontmatter.version {
            Some(v) => format!("{} (v{})", w.frontmatter.title, v),
            None => w.frontmatter.title.clone(),
        },
    );

    // Trailing blank from the last section
    lines.pop();
    lines
}

fn section<F>(
    lines: &mut Vec<String>,
    heading: &str,
    entries: &[Entry<F>],
    dir: &str,
    extension: &str,
    header: impl Fn(&Entry<F>) -> String,
) {
    if entries.is_empty() {
        return;
    }
    lines.push(heading.to_string());
    for (i, entry) in entries.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), truncate_desc(&header(entry), 72)));
        lines.push(format!(
            "{}Source: {}/{}.{}",
            indent(1),
            dir,
            entry.slug,
            extension
        ));
    }
    lines.push(String::new());
}

pub fn print_catalog(catalog: &Catalog, app: App, extension: &str) {
    for line in format_catalog(catalog, app, extension) {
        println!("{}", line);
    }
}
