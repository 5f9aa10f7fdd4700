//! Ingestion pipelines: publisher Markdown → site MDX.
//!
//! Three jobs share one shape:
//!
//! ```text
//! locate source  →  parse frontmatter + body  →  map frontmatter
//!                →  rewrite body  →  serialize  →  write (or preview)
//! ```
//!
//! | Job | Source (under the publisher root) | Body passes | Target dir |
//! |-----|-----------------------------------|-------------|------------|
//! | `pages <hub>` | `content/pages/<hub>/*.md` | links, Mermaid | `pages/` |
//! | `blog <slug>` | `posts/<slug>/final.md` | Mermaid | `blog/` |
//! | `whitepaper <slug>` | `content/whitepapers/<slug>/<slug>.md` | Mermaid | `whitepapers/` |
//!
//! Output files are named after the `slug` in the source frontmatter, not the
//! source filename. A run stops at the first failure; files already written
//! by a `pages` run stay written.
//!
//! The `convert_*` functions are pure (document in, document out) and hold
//! all transformation logic; [`run`] adds the filesystem around them.

use crate::catalog::content_files;
use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::frontmatter;
use crate::mapping::{map_blog, map_page, map_whitepaper};
use crate::transform::{transform_links, transform_mermaid};
use crate::types::{
    App, BlogSource, BlogTarget, ContentKind, DocType, PageSource, PageTarget, SourceDocument,
    WhitepaperSource, WhitepaperTarget,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What to ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Pages { hub: String },
    Blog { slug: String },
    Whitepaper { slug: String },
}

impl Job {
    /// Noun used in progress output ("Ingesting pages from: ...").
    pub fn noun(&self) -> &'static str {
        match self {
            Job::Pages { .. } => "pages",
            Job::Blog { .. } => "blog",
            Job::Whitepaper { .. } => "whitepaper",
        }
    }

    /// Source directory (pages) or file (blog, whitepaper).
    pub fn source_path(&self, publisher_root: &Path) -> PathBuf {
        match self {
            Job::Pages { hub } => publisher_root.join("content/pages").join(hub),
            Job::Blog { slug } => publisher_root.join("posts").join(slug).join("final.md"),
            Job::Whitepaper { slug } => publisher_root
                .join("content/whitepapers")
                .join(slug)
                .join(format!("{slug}.md")),
        }
    }
}

/// Per-invocation options, mostly straight from the command line.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    pub app: App,
    /// Root of the sites repository (holds `apps/` and `ingest.toml`).
    pub sites_root: PathBuf,
    /// Publisher root override; wins over `publisher_root` in the config.
    pub source: Option<PathBuf>,
    pub dry_run: bool,
    /// Category override (blog only).
    pub category: Option<String>,
}

impl IngestOptions {
    pub fn publisher_root(&self, config: &IngestConfig) -> PathBuf {
        match &self.source {
            Some(source) => source.clone(),
            None => self.sites_root.join(&config.publisher_root),
        }
    }

    /// `apps/<app>/content` under the sites root.
    pub fn content_root(&self) -> PathBuf {
        self.sites_root
            .join("apps")
            .join(self.app.dir_name())
            .join("content")
    }

    fn target_dir(&self, kind: ContentKind) -> PathBuf {
        self.content_root().join(kind.target_dir())
    }
}

/// Result of converting one source document.
#[derive(Debug, Clone, PartialEq)]
pub struct Converted<T> {
    pub frontmatter: T,
    /// Full output text: frontmatter block + transformed body.
    pub document: String,
}

/// One processed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedItem {
    pub kind: ContentKind,
    /// Source filename for pages, title for blog posts and whitepapers.
    pub label: String,
    pub target_path: PathBuf,
    pub frontmatter: serde_json::Value,
    pub written: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub job: Job,
    pub source: PathBuf,
    pub dry_run: bool,
    pub items: Vec<IngestedItem>,
}

// ============================================================================
// Pure conversions
// ============================================================================

/// Convert one hub/spoke page. Links are rewritten before Mermaid blocks
/// become components, while the blocks are still recognizable as code.
pub fn convert_page(
    doc: &SourceDocument<PageSource>,
    hub: &str,
    config: &IngestConfig,
) -> Result<Converted<PageTarget>, IngestError> {
    let body = transform_mermaid(&transform_links(&doc.body, hub, config));
    let frontmatter = map_page(&doc.frontmatter, &doc.body, config);
    let document = frontmatter::stringify(&frontmatter, &body)
        .map_err(|e| IngestError::frontmatter(&doc.frontmatter.slug, e))?;
    Ok(Converted {
        frontmatter,
        document,
    })
}

pub fn convert_blog(
    doc: &SourceDocument<BlogSource>,
    category_override: Option<&str>,
    config: &IngestConfig,
) -> Result<Converted<BlogTarget>, IngestError> {
    let body = transform_mermaid(&doc.body);
    let frontmatter = map_blog(&doc.frontmatter, category_override, config)?;
    let document = frontmatter::stringify(&frontmatter, &body)
        .map_err(|e| IngestError::frontmatter(&doc.frontmatter.slug, e))?;
    Ok(Converted {
        frontmatter,
        document,
    })
}

pub fn convert_whitepaper(
    doc: &SourceDocument<WhitepaperSource>,
    config: &IngestConfig,
) -> Result<Converted<WhitepaperTarget>, IngestError> {
    let body = transform_mermaid(&doc.body);
    let frontmatter = map_whitepaper(&doc.frontmatter, &doc.body, config)?;
    let document = frontmatter::stringify(&frontmatter, &body)
        .map_err(|e| IngestError::frontmatter(&doc.frontmatter.slug, e))?;
    Ok(Converted {
        frontmatter,
        document,
    })
}

/// Role of a page: from `doc_type`, else hub when its slug names the hub.
pub fn page_doc_type(source: &PageSource, hub: &str) -> DocType {
    source.doc_type.unwrap_or(if source.slug == hub {
        DocType::Hub
    } else {
        DocType::Spoke
    })
}

// ============================================================================
// Filesystem pipelines
// ============================================================================

/// Run a job to completion, stopping at the first error.
pub fn run(
    job: &Job,
    options: &IngestOptions,
    config: &IngestConfig,
) -> Result<IngestReport, IngestError> {
    let source = job.source_path(&options.publisher_root(config));
    let items = match job {
        Job::Pages { hub } => ingest_pages(hub, &source, options, config)?,
        Job::Blog { .. } => vec![ingest_blog(&source, options, config)?],
        Job::Whitepaper { .. } => vec![ingest_whitepaper(&source, options, config)?],
    };
    Ok(IngestReport {
        job: job.clone(),
        source,
        dry_run: options.dry_run,
        items,
    })
}

fn ingest_pages(
    hub: &str,
    source_dir: &Path,
    options: &IngestOptions,
    config: &IngestConfig,
) -> Result<Vec<IngestedItem>, IngestError> {
    if !source_dir.is_dir() {
        return Err(IngestError::SourceDirNotFound(source_dir.to_path_buf()));
    }
    let files = content_files(source_dir, "md")?;
    if files.is_empty() {
        return Err(IngestError::NoMarkdownFiles(source_dir.to_path_buf()));
    }

    let mut items = Vec::with_capacity(files.len());
    for path in &files {
        let doc: SourceDocument<PageSource> = read_source(path)?;
        let kind = ContentKind::Page(page_doc_type(&doc.frontmatter, hub));
        let converted = convert_page(&doc, hub, config)?;
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        items.push(emit(
            kind,
            label,
            &doc.frontmatter.slug,
            path,
            &converted,
            options,
            config,
        )?);
    }
    Ok(items)
}

fn ingest_blog(
    source_path: &Path,
    options: &IngestOptions,
    config: &IngestConfig,
) -> Result<IngestedItem, IngestError> {
    let doc: SourceDocument<BlogSource> = read_source_file(source_path)?;
    let converted = convert_blog(&doc, options.category.as_deref(), config)?;
    emit(
        ContentKind::BlogPost,
        doc.frontmatter.title.clone(),
        &doc.frontmatter.slug,
        source_path,
        &converted,
        options,
        config,
    )
}

fn ingest_whitepaper(
    source_path: &Path,
    options: &IngestOptions,
    config: &IngestConfig,
) -> Result<IngestedItem, IngestError> {
    let doc: SourceDocument<WhitepaperSource> = read_source_file(source_path)?;
    let converted = convert_whitepaper(&doc, config)?;
    emit(
        ContentKind::Whitepaper,
        doc.frontmatter.title.clone(),
        &doc.frontmatter.slug,
        source_path,
        &converted,
        options,
        config,
    )
}

fn read_source_file<F: DeserializeOwned>(path: &Path) -> Result<SourceDocument<F>, IngestError> {
    if !path.is_file() {
        return Err(IngestError::SourceFileNotFound(path.to_path_buf()));
    }
    read_source(path)
}

fn read_source<F: DeserializeOwned>(path: &Path) -> Result<SourceDocument<F>, IngestError> {
    debug!(path = %path.display(), "reading source");
    frontmatter::read(path).map_err(|e| IngestError::frontmatter(path, e))
}

/// Write (or preview) one converted document as `<slug>.<ext>`.
fn emit<T: Serialize>(
    kind: ContentKind,
    label: String,
    slug: &str,
    source_path: &Path,
    converted: &Converted<T>,
    options: &IngestOptions,
    config: &IngestConfig,
) -> Result<IngestedItem, IngestError> {
    if !is_safe_slug(slug) {
        return Err(IngestError::InvalidSlug {
            path: source_path.to_path_buf(),
            slug: slug.to_string(),
        });
    }
    let target_dir = options.target_dir(kind);
    let target_path = target_dir.join(format!("{slug}.{}", config.content_extension));

    if !options.dry_run {
        fs::create_dir_all(&target_dir)?;
        fs::write(&target_path, &converted.document)?;
        debug!(path = %target_path.display(), "wrote target");
    }

    Ok(IngestedItem {
        kind,
        label,
        target_path,
        frontmatter: serde_json::to_value(&converted.frontmatter)?,
        written: !options.dry_run,
    })
}

/// A slug must name a single file: non-empty, no separators, not `.`/`..`.
fn is_safe_slug(slug: &str) -> bool {
    !slug.trim().is_empty()
        && !slug.contains(['/', '\\'])
        && slug != "."
        && slug != ".."
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn options(sites_root: &Path, publisher: &Path, dry_run: bool) -> IngestOptions {
        IngestOptions {
            app: App::Semops,
            sites_root: sites_root.to_path_buf(),
            source: Some(publisher.to_path_buf()),
            dry_run,
            category: None,
        }
    }

    // =========================================================================
    // Source locations
    // =========================================================================

    #[test]
    fn source_paths_follow_publisher_layout() {
        let root = Path::new("/pub");
        assert_eq!(
            Job::Pages { hub: "why-semops".into() }.source_path(root),
            Path::new("/pub/content/pages/why-semops")
        );
        assert_eq!(
            Job::Blog { slug: "x".into() }.source_path(root),
            Path::new("/pub/posts/x/final.md")
        );
        assert_eq!(
            Job::Whitepaper { slug: "w".into() }.source_path(root),
            Path::new("/pub/content/whitepapers/w/w.md")
        );
    }

    #[test]
    fn publisher_root_defaults_to_sibling_repo() {
        let opts = IngestOptions {
            sites_root: PathBuf::from("/work/semops-sites"),
            ..IngestOptions::default()
        };
        assert_eq!(
            opts.publisher_root(&IngestConfig::default()),
            Path::new("/work/semops-sites/../semops-publisher")
        );
        assert_eq!(
            opts.content_root(),
            Path::new("/work/semops-sites/apps/semops/content")
        );
    }

    // =========================================================================
    // Pure conversions
    // =========================================================================

    #[test]
    fn convert_blog_produces_mdx() {
        let doc: SourceDocument<BlogSource> = frontmatter::parse(
            "---\ntitle: X\nslug: x\nauthor: A\ndate_updated: 2024-01-02\ntags: [career]\n---\n\n```mermaid\ngraph TD\n```\n",
        )
        .unwrap();
        let converted = convert_blog(&doc, None, &IngestConfig::default()).unwrap();
        assert_eq!(converted.frontmatter.category, "Industry");
        assert!(converted.document.starts_with("---\ntitle: X\n"));
        assert!(converted.document.ends_with("\n<MermaidDiagram chart={`graph TD`} />\n"));
    }

    #[test]
    fn convert_page_leaves_links_inside_mermaid_alone() {
        let doc: SourceDocument<PageSource> = frontmatter::parse(
            "---\ntitle: Hub\nslug: why-semops\n---\n[a](spoke.md)\n\n```mermaid\n%% see [b](spoke.md)\n```\n",
        )
        .unwrap();
        let converted = convert_page(&doc, "why-semops", &IngestConfig::default()).unwrap();
        assert!(converted.document.contains("[a](/framework/spoke)"));
        assert!(converted
            .document
            .contains("<MermaidDiagram chart={`%% see [b](spoke.md)`} />"));
        assert_eq!(converted.frontmatter.description, "[a](spoke.md)");
    }

    #[test]
    fn fixture_spoke_conversion() {
        let publisher = setup_publisher();
        let doc = read_fixture_page(&publisher, "why-semops", "the-problem.md");
        let converted = convert_page(&doc, "why-semops", &IngestConfig::default()).unwrap();

        assert!(converted.document.contains("[Why SemOps](/framework/why-semops)"));
        assert!(converted
            .document
            .contains("[research notes](../../research/notes.md)"));
        assert!(converted.document.contains("[the web](https://example.com/meaning.md)"));
        assert!(converted.document.contains("```markdown\n[spoke](semantic-coherence.md)\n```"));
        assert_eq!(
            first_chart(&converted.document),
            "graph TD\n  Data --> Meaning\n  Meaning --> `Decisions`"
        );
        assert_eq!(
            converted.frontmatter.description,
            "Why data programs stall when meaning drifts."
        );
    }

    #[test]
    fn fixture_hub_conversion() {
        let publisher = setup_publisher();
        let doc = read_fixture_page(&publisher, "why-semops", "why-semops.md");
        let converted = convert_page(&doc, "why-semops", &IngestConfig::default()).unwrap();

        assert!(converted.document.contains("[the problem](/framework/the-problem)"));
        assert!(converted
            .document
            .contains("[semantic coherence](/framework/semantic-coherence#measuring-it)"));
        assert!(converted.document.contains("[framework overview](/framework)"));
        assert_eq!(
            converted.frontmatter.description,
            "Organizations run on shared meaning, and most of them never manage it on purpose."
        );
        assert_eq!(page_doc_type(&doc.frontmatter, "why-semops"), DocType::Hub);
    }

    #[test]
    fn doc_type_inferred_when_absent() {
        let doc: SourceDocument<PageSource> =
            frontmatter::parse("---\ntitle: T\nslug: why-semops\n---\n").unwrap();
        assert_eq!(page_doc_type(&doc.frontmatter, "why-semops"), DocType::Hub);
        assert_eq!(page_doc_type(&doc.frontmatter, "other"), DocType::Spoke);
    }

    #[test]
    fn unsafe_slugs_rejected() {
        assert!(is_safe_slug("why-semops"));
        assert!(!is_safe_slug(""));
        assert!(!is_safe_slug("../escape"));
        assert!(!is_safe_slug(".."));
    }

    // =========================================================================
    // Pipelines against fixtures
    // =========================================================================

    #[test]
    fn pages_dry_run_writes_nothing() {
        let publisher = setup_publisher();
        let sites = tempfile::TempDir::new().unwrap();
        let job = Job::Pages { hub: "why-semops".into() };

        let report = run(
            &job,
            &options(sites.path(), publisher.path(), true),
            &IngestConfig::default(),
        )
        .unwrap();

        assert_eq!(report.items.len(), 3);
        assert!(report.items.iter().all(|i| !i.written));
        assert!(!sites.path().join("apps").exists());
    }

    #[test]
    fn pages_are_processed_in_filename_order() {
        let publisher = setup_publisher();
        let sites = tempfile::TempDir::new().unwrap();
        let report = run(
            &Job::Pages { hub: "why-semops".into() },
            &options(sites.path(), publisher.path(), true),
            &IngestConfig::default(),
        )
        .unwrap();
        let labels: Vec<&str> = report.items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["semantic-coherence.md", "the-problem.md", "why-semops.md"]
        );
    }

    #[test]
    fn output_named_after_frontmatter_slug() {
        let publisher = setup_publisher();
        let sites = tempfile::TempDir::new().unwrap();
        let report = run(
            &Job::Pages { hub: "why-semops".into() },
            &options(sites.path(), publisher.path(), false),
            &IngestConfig::default(),
        )
        .unwrap();

        let item = report
            .items
            .iter()
            .find(|i| i.label == "the-problem.md")
            .unwrap();
        assert!(item.target_path.ends_with("pages/problem-statement.mdx"));
        assert!(item.target_path.exists());
    }

    #[test]
    fn missing_hub_directory_fails() {
        let publisher = setup_publisher();
        let sites = tempfile::TempDir::new().unwrap();
        let err = run(
            &Job::Pages { hub: "nope".into() },
            &options(sites.path(), publisher.path(), true),
            &IngestConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::SourceDirNotFound(p) if p.ends_with("content/pages/nope")));
    }

    #[test]
    fn hub_without_markdown_fails() {
        let publisher = setup_publisher();
        fs::create_dir_all(publisher.path().join("content/pages/empty-hub")).unwrap();
        fs::write(publisher.path().join("content/pages/empty-hub/notes.txt"), "x").unwrap();
        let sites = tempfile::TempDir::new().unwrap();

        let err = run(
            &Job::Pages { hub: "empty-hub".into() },
            &options(sites.path(), publisher.path(), true),
            &IngestConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::NoMarkdownFiles(_)));
    }

    #[test]
    fn blog_category_override_reaches_output() {
        let publisher = setup_publisher();
        let sites = tempfile::TempDir::new().unwrap();
        let mut opts = options(sites.path(), publisher.path(), true);
        opts.category = Some("Technical".to_string());

        let report = run(
            &Job::Blog { slug: "career-pivot".into() },
            &opts,
            &IngestConfig::default(),
        )
        .unwrap();
        assert_eq!(report.items[0].frontmatter["category"], "Technical");
    }

    #[test]
    fn missing_blog_post_fails() {
        let publisher = setup_publisher();
        let sites = tempfile::TempDir::new().unwrap();
        let err = run(
            &Job::Blog { slug: "ghost".into() },
            &options(sites.path(), publisher.path(), true),
            &IngestConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::SourceFileNotFound(p) if p.ends_with("posts/ghost/final.md")));
    }

    #[test]
    fn whitepaper_missing_author_fails_with_path() {
        let publisher = setup_publisher();
        let dir = publisher.path().join("content/whitepapers/draft");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("draft.md"),
            "---\ntitle: Draft\nslug: draft\ndate_updated: 2024-01-01\n---\nText\n",
        )
        .unwrap();
        let sites = tempfile::TempDir::new().unwrap();

        let err = run(
            &Job::Whitepaper { slug: "draft".into() },
            &options(sites.path(), publisher.path(), false),
            &IngestConfig::default(),
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("draft.md") && msg.contains("author"), "got: {msg}");
        assert!(!sites.path().join("apps").exists());
    }
}
