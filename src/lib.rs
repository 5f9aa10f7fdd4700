//! # Ingest Content
//!
//! Converts Markdown written in the publisher repository into the MDX the
//! sites render. Three kinds of content are supported, each with its own
//! source layout and frontmatter schema: hub/spoke pages, blog posts and
//! whitepapers.
//!
//! # Pipeline
//!
//! Every job is one synchronous pass per source file:
//!
//! ```text
//! publisher/*.md ── parse ──▶ SourceDocument<Source>
//!                 ── map ───▶ Target frontmatter      (mapping, describe)
//!                 ── rewrite ▶ body                   (transform)
//!                 ── write ──▶ apps/<app>/content/<kind>/<slug>.mdx
//! ```
//!
//! With `--dry-run` the last step prints the would-be path and frontmatter
//! instead of writing. Nothing is cached between runs.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`ingest`] | Job orchestration: locate sources, convert, write or preview |
//! | [`mapping`] | Source → target frontmatter, category derivation, date normalization |
//! | [`transform`] | Mermaid fences → components, relative `.md` links → site routes |
//! | [`describe`] | First-paragraph fallback descriptions |
//! | [`frontmatter`] | YAML frontmatter split, parse, and stringify |
//! | [`config`] | `ingest.toml` loading: hub routes, category mapping, paths |
//! | [`catalog`] | Read-back of ingested site content for `list` |
//! | [`types`] | Content kinds and source/target schemas |
//! | [`output`] | CLI output formatting |
//! | [`error`] | Crate-wide error type |
//!
//! # Design Decisions
//!
//! ## Typed Schemas, Not Loose Maps
//!
//! Source frontmatter is deserialized straight into a per-kind struct. A
//! document missing `title` or `slug` fails at parse time with the file
//! named, rather than producing `undefined.mdx` further down the line.
//!
//! ## Parser-Located Code
//!
//! Text rewrites run over regions a CommonMark parser identifies as prose.
//! A `[link](x.md)` inside a code sample stays a code sample.
//!
//! ## Flat Slug Routing
//!
//! Link resolution assumes slugs are unique across all hubs and spokes and
//! that routes are two levels deep (`/framework/<slug>` or a configured hub
//! route). It is a one-way, supervised conversion, not a link checker.

pub mod catalog;
pub mod config;
pub mod describe;
pub mod error;
pub mod frontmatter;
pub mod ingest;
pub mod mapping;
pub mod output;
pub mod transform;
pub mod types;

pub use error::IngestError;

#[cfg(test)]
pub(crate) mod test_helpers;
