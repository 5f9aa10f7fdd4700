//! Shared test utilities for the ingest-content test suite.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let publisher = setup_publisher();
//! let doc = read_fixture_page(&publisher, "why-semops", "the-problem.md");
//! assert_eq!(doc.frontmatter.slug, "problem-statement");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::frontmatter;
use crate::types::{PageSource, SourceDocument};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/publisher/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_publisher() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/publisher");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Fixture lookups (panic with a clear message on miss)
// =========================================================================

/// Parse a page source from a fixture hub. Panics if missing or malformed.
pub fn read_fixture_page(publisher: &TempDir, hub: &str, file: &str) -> SourceDocument<PageSource> {
    let path = publisher.path().join("content/pages").join(hub).join(file);
    frontmatter::read(&path)
        .unwrap_or_else(|e| panic!("fixture page '{}' unreadable: {e}", path.display()))
}

/// Extract the `chart` payload of the first `MermaidDiagram` in `text`,
/// with backtick escapes undone. Panics if there is none.
pub fn first_chart(text: &str) -> String {
    let start = text
        .find("<MermaidDiagram chart={`")
        .unwrap_or_else(|| panic!("no MermaidDiagram in:\n{text}"))
        + "<MermaidDiagram chart={`".len();
    let end = start
        + text[start..]
            .find("`} />")
            .unwrap_or_else(|| panic!("unterminated MermaidDiagram in:\n{text}"));
    text[start..end].replace("\\`", "`")
}
