//! gdindex - static indexer for Godot project trees.
//!
//! Usage:
//!   gdindex                          Index the current directory into ./_cw_index
//!   gdindex --path DIR [--out DIR]   Index a project folder
//!   gdindex --zip FILE [--out DIR]   Index a zipped project
//!   gdindex --help                   Show help

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::EnvFilter;

use gdindex_core::{DEFAULT_OUTPUT_DIR, IndexConfig, IndexError};
use gdindex_index::{IndexSource, index_and_publish};

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "GDINDEX_LOG";

#[derive(Parser)]
#[command(
    name = "gdindex",
    version,
    about = "Static indexer for Godot project trees",
    long_about = "gdindex walks a Godot project (a folder or a zip archive) and writes a \
                  manifest, script symbols, scene graphs, localisation strings, \
                  dependency edges and TODO notes as JSON, plus a markdown report and \
                  a zip bundle of all of it.\n\n\
                  The bundle path is printed on stdout."
)]
struct Cli {
    /// Project folder to index (defaults to the current directory)
    #[arg(long, conflicts_with = "zip")]
    path: Option<PathBuf>,

    /// Zip archive of a project to index
    #[arg(long)]
    zip: Option<PathBuf>,

    /// Output directory (defaults to <folder>/_cw_index, or ./_cw_index for --zip)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Extra ignore pattern for this run (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "GLOB")]
    exclude: Vec<String>,

    /// Don't apply the built-in ignore patterns
    #[arg(long)]
    no_default_ignores: bool,

    /// Don't read the project's .indexignore
    #[arg(long)]
    no_ignore_file: bool,

    /// Worker threads (0 = one per core)
    #[arg(short = 'j', long, default_value = "0")]
    threads: usize,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn source(&self) -> Result<IndexSource> {
        match (&self.zip, &self.path) {
            (Some(zip), _) => Ok(IndexSource::Archive(zip.clone())),
            (None, Some(path)) => Ok(IndexSource::Folder(path.clone())),
            (None, None) => {
                let cwd = std::env::current_dir().context("Cannot read current directory")?;
                Ok(IndexSource::Folder(cwd))
            }
        }
    }

    fn output_dir(&self, source: &IndexSource) -> Result<PathBuf> {
        if let Some(out) = &self.out {
            return Ok(out.clone());
        }
        match source {
            IndexSource::Folder(path) => Ok(path.join(DEFAULT_OUTPUT_DIR)),
            IndexSource::Archive(_) => {
                let cwd = std::env::current_dir().context("Cannot read current directory")?;
                Ok(cwd.join(DEFAULT_OUTPUT_DIR))
            }
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let source = cli.source()?;
    let output_dir = cli.output_dir(&source)?;
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Cannot create output directory {}", output_dir.display()))?;

    let root = source
        .resolve_root(&output_dir)
        .and_then(|root| root.canonicalize().map_err(|e| IndexError::io(&root, e)))
        .with_context(|| format!("Cannot open {}", source.path().display()))?;
    // Canonical on both sides so an output directory inside the root is excluded.
    let output_dir = output_dir
        .canonicalize()
        .with_context(|| format!("Cannot resolve {}", output_dir.display()))?;

    let mut builder = IndexConfig::builder();
    builder
        .root(root)
        .output_dir(output_dir)
        .extra_ignores(cli.exclude.clone())
        .threads(cli.threads);
    if cli.no_default_ignores {
        builder.default_ignores(Vec::<String>::new());
    }
    if cli.no_ignore_file {
        builder.ignore_file(None::<String>);
    }
    let config = builder.build().context("Invalid configuration")?;

    let outcome = index_and_publish(&config).context("Indexing failed")?;

    if !outcome.run.warnings.is_empty() {
        eprintln!("{} warning(s) during indexing", outcome.run.warnings.len());
    }
    tracing::info!(
        files = outcome.run.collections.file_count(),
        elapsed_ms = outcome.run.elapsed.as_millis() as u64,
        "done"
    );

    println!("{}", outcome.published.bundle_path.display());
    Ok(())
}

/// Install the stderr subscriber. `GDINDEX_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
