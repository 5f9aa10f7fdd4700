//! Fallback descriptions from Markdown body text.
//!
//! Used when a page or whitepaper has no `description` in its frontmatter.
//! The first plain paragraph of the body becomes the description: headings,
//! list items, blockquotes and code fence lines are skipped wherever they
//! appear, and a blank line after the paragraph has started ends it.

/// Extract the first plain paragraph of `body`, or `fallback` if there is none.
///
/// Emphasis markers (`**`, `*`) are removed. Results longer than `max_chars`
/// characters are cut to `max_chars - 3` characters followed by `...`.
pub fn extract_description(body: &str, fallback: &str, max_chars: usize) -> String {
    let mut paragraph: Vec<&str> = Vec::new();

    for line in body.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            if paragraph.is_empty() {
                continue;
            }
            break;
        }
        if is_structural(trimmed) {
            continue;
        }
        paragraph.push(trimmed);
    }

    if paragraph.is_empty() {
        return fallback.to_string();
    }

    let cleaned = paragraph.join(" ").replace('*', "");
    truncate(&cleaned, max_chars)
}

/// Lines that never start or continue a paragraph.
fn is_structural(trimmed: &str) -> bool {
    trimmed.starts_with('#')
        || trimmed.starts_with('-')
        || trimmed.starts_with('*')
        || trimmed.starts_with('>')
        || trimmed.starts_with("```")
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}
