//! Markdown body rewrites.
//!
//! Two independent passes, both `&str -> String`:
//!
//! - [`transform_mermaid`]: every fenced block whose info string starts with
//!   `mermaid` becomes a `<MermaidDiagram chart={`...`} />` component call.
//! - [`transform_links`]: relative `.md` links become site routes (pages only).
//!
//! ## Code regions
//!
//! Both passes locate code with pulldown-cmark's offset iterator rather than
//! with a fence regex, so nested or tilde fences, indented code and inline
//! code spans are recognized the way a CommonMark renderer sees them. Link
//! rewriting never touches a code region; the Mermaid pass touches only
//! closed Mermaid fences.
//!
//! ## Link resolution
//!
//! ```text
//! [t](https://…) / [t](#anchor)        unchanged
//! [t](../../other-repo/x.md)           unchanged, warning logged
//! [t](<current hub>.md#a)              [t](<hub route>#a)
//! [t](<any known hub>.md)              [t](<that hub's route>)
//! [t](anything-else.md)                [t](/framework/anything-else)
//! [t](image.png)                       unchanged
//! ```
//!
//! Hrefs may contain one level of balanced parentheses. Deeper nesting is
//! not matched and the link is left as written.

use crate::config::IngestConfig;
use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// A span of source text that is code, as a CommonMark parser sees it.
#[derive(Debug)]
struct CodeRegion {
    range: Range<usize>,
    /// Diagram source for fenced Mermaid blocks.
    mermaid: Option<String>,
}

fn code_regions(text: &str) -> Vec<CodeRegion> {
    let mut regions = Vec::new();
    let mut open: Option<(Range<usize>, bool, String)> = None;

    for (event, range) in Parser::new(text).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let is_mermaid = matches!(
                    &kind,
                    CodeBlockKind::Fenced(info)
                        if info.split_whitespace().next() == Some("mermaid")
                );
                open = Some((range, is_mermaid, String::new()));
            }
            Event::Text(t) => {
                if let Some((_, _, content)) = open.as_mut() {
                    content.push_str(&t);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((range, is_mermaid, content)) = open.take() {
                    regions.push(CodeRegion {
                        range,
                        mermaid: is_mermaid.then_some(content),
                    });
                }
            }
            Event::Code(_) => regions.push(CodeRegion {
                range,
                mermaid: None,
            }),
            _ => {}
        }
    }
    regions
}

// ============================================================================
// Mermaid
// ============================================================================

/// Replace closed Mermaid fences with `MermaidDiagram` component calls.
///
/// The diagram source is trimmed and backticks are escaped so it can sit in
/// a template literal. Whatever follows the closing fence (usually a newline)
/// is preserved. Unclosed fences are left alone.
pub fn transform_mermaid(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut cursor = 0;

    for region in code_regions(body) {
        let Some(chart) = region.mermaid else {
            continue;
        };
        let Some(end) = closed_fence_end(body, &region.range) else {
            continue;
        };
        out.push_str(&body[cursor..region.range.start]);
        out.push_str(&mermaid_component(&chart));
        cursor = end;
    }
    out.push_str(&body[cursor..]);
    out
}

/// Component call embedding the diagram source as its `chart` prop.
pub fn mermaid_component(chart: &str) -> String {
    let escaped = chart.trim().replace('`', "\\`");
    format!("<MermaidDiagram chart={{`{escaped}`}} />")
}

/// End offset of a fenced block's closing fence, trailing whitespace excluded.
fn closed_fence_end(text: &str, range: &Range<usize>) -> Option<usize> {
    let block = text[range.clone()].trim_end();
    let (_, last_line) = block.rsplit_once('\n')?;
    let last_line = last_line.trim_start_matches([' ', '>']);
    let is_fence = last_line.len() >= 3
        && (last_line.chars().all(|c| c == '`') || last_line.chars().all(|c| c == '~'));
    is_fence.then_some(range.start + block.len())
}

// ============================================================================
// Links
// ============================================================================

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\(((?:[^()\n]|\([^()\n]*\))+)\)").expect("valid regex")
});

/// Rewrite relative `.md` links in a page body to site routes.
///
/// `hub_slug` is the hub whose pages are being ingested; a link to it goes to
/// its configured route (or the fallback route for an unknown hub).
///
/// Link text may wrap across lines and may contain inline code; a link is
/// left alone only when its href lies inside a code region.
pub fn transform_links(body: &str, hub_slug: &str, config: &IngestConfig) -> String {
    let regions = code_regions(body);
    let in_code = |span: &Range<usize>| {
        regions
            .iter()
            .any(|r| r.range.start < span.end && span.start < r.range.end)
    };

    let mut out = String::with_capacity(body.len());
    let mut cursor = 0;

    for caps in LINK_RE.captures_iter(body) {
        let (Some(whole), Some(text), Some(href)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        if in_code(&href.range()) {
            continue;
        }
        let Some(route) = resolve_href(href.as_str(), hub_slug, config) else {
            continue;
        };
        debug!(href = href.as_str(), %route, "rewrote link");
        out.push_str(&body[cursor..whole.start()]);
        out.push('[');
        out.push_str(text.as_str());
        out.push_str("](");
        out.push_str(&route);
        out.push(')');
        cursor = whole.end();
    }
    out.push_str(&body[cursor..]);
    out
}

/// Site route for a link target, or `None` to leave the link as written.
pub fn resolve_href(href: &str, hub_slug: &str, config: &IngestConfig) -> Option<String> {
    if href.starts_with("http") || href.starts_with('#') {
        return None;
    }
    if href.matches("../").count() > 1 {
        warn!("Deep cross-repo link found: {href}");
        return None;
    }
    if !(href.ends_with(".md") || href.contains(".md#")) {
        return None;
    }

    let (file, fragment) = match href.split_once('#') {
        Some((file, fragment)) => (file, Some(fragment).filter(|f| !f.is_empty())),
        None => (href, None),
    };
    let file_name = file.rsplit('/').next().unwrap_or(file);
    let target_slug = file_name.strip_suffix(".md").unwrap_or(file_name);

    let route = if target_slug == hub_slug {
        config.route_for_hub(hub_slug).to_string()
    } else if let Some(route) = config.hub_route(target_slug) {
        route.to_string()
    } else {
        config.spoke_route(target_slug)
    };

    Some(match fragment {
        Some(fragment) => format!("{route}#{fragment}"),
        None => route,
    })
}
