use clap::{Parser, Subcommand};
use ingest_content::ingest::{self, IngestOptions, Job};
use ingest_content::types::App;
use ingest_content::{IngestError, catalog, config, output};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Flags shared by the three ingestion commands.
#[derive(clap::Args, Clone)]
struct IngestArgs {
    /// Target app
    #[arg(long, value_enum, default_value_t = App::Semops)]
    app: App,

    /// Override the publisher repository path
    #[arg(long)]
    source: Option<PathBuf>,

    /// Preview without writing files
    #[arg(long)]
    dry_run: bool,
}

#[derive(Parser)]
#[command(name = "ingest-content")]
#[command(about = "Transform publisher Markdown into site MDX")]
#[command(long_about = "\
Transform publisher Markdown into site MDX

Sources are read from the publisher repository (a sibling checkout by
default) and written under apps/<app>/content/ of the sites repository.

Source layout:

  semops-publisher/
  ├── content/
  │   ├── pages/<hub>/*.md                 # pages <hub>
  │   └── whitepapers/<slug>/<slug>.md     # whitepaper <slug>
  └── posts/<slug>/final.md                # blog <slug>

Output files are named after the slug in the source frontmatter.
Mermaid code blocks become <MermaidDiagram /> components; in pages,
relative .md links are rewritten to site routes.

Run 'ingest-content gen-config' to print a documented ingest.toml.")]
#[command(version)]
struct Cli {
    /// Root of the sites repository
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Log debug diagnostics to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest a hub/spoke page group
    Pages {
        hub_slug: String,
        #[command(flatten)]
        args: IngestArgs,
    },
    /// Ingest a single blog post
    Blog {
        slug: String,
        #[command(flatten)]
        args: IngestArgs,
        /// Override the derived category
        #[arg(long)]
        category: Option<String>,
    },
    /// Ingest a single whitepaper
    Whitepaper {
        slug: String,
        #[command(flatten)]
        args: IngestArgs,
    },
    /// List content already ingested into an app
    List {
        #[arg(long, value_enum, default_value_t = App::Semops)]
        app: App,
    },
    /// Print a stock ingest.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), IngestError> {
    let (job, args, category) = match cli.command {
        Command::Pages { hub_slug, args } => (Job::Pages { hub: hub_slug }, args, None),
        Command::Blog {
            slug,
            args,
            category,
        } => (Job::Blog { slug }, args, category),
        Command::Whitepaper { slug, args } => (Job::Whitepaper { slug }, args, None),
        Command::List { app } => {
            let config = config::load_config(&cli.root)?;
            let options = IngestOptions {
                app,
                sites_root: cli.root,
                ..IngestOptions::default()
            };
            let catalog = catalog::load_catalog(&options.content_root(), &config)?;
            output::print_catalog(&catalog, app, &config.content_extension);
            return Ok(());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
    };

    let config = config::load_config(&cli.root)?;
    let options = IngestOptions {
        app: args.app,
        sites_root: cli.root,
        source: args.source,
        dry_run: args.dry_run,
        category,
    };

    let source = job.source_path(&options.publisher_root(&config));
    output::print_ingest_header(&job, &source, options.app, options.dry_run);
    let report = ingest::run(&job, &options, &config)?;
    output::print_ingest_report(&report);
    Ok(())
}

/// Diagnostics go to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "ingest_content=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
