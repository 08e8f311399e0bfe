use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use docsum::config;
use docsum::extraction::DocumentKind;
use docsum::processing::ProcessingService;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(
    name = "docsum-batch",
    about = "Summarize every supported document in a directory, one JSON line per file"
)]
struct Cli {
    /// Directory containing documents to process.
    #[arg(long)]
    dir: PathBuf,
    /// Descend into subdirectories.
    #[arg(long)]
    recursive: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    config::init_config();
    init_stderr_tracing();

    if !cli.dir.is_dir() {
        bail!("{} is not a directory", cli.dir.display());
    }

    let documents = collect_documents(&cli.dir, cli.recursive);
    if documents.is_empty() {
        eprintln!("no supported documents found in {}", cli.dir.display());
        return Ok(());
    }

    let service = ProcessingService::new();
    let mut stdout = std::io::stdout().lock();
    for path in documents {
        let Some(extension) = file_extension(&path) else {
            continue;
        };
        match service.process_document(&path, &extension).await {
            Ok(outcome) => {
                let record = serde_json::json!({
                    "file": path.display().to_string(),
                    "summary": outcome.summary,
                    "keywords": outcome.keywords,
                    "failed_chunks": outcome.failed_chunks,
                });
                writeln!(stdout, "{record}")
                    .with_context(|| format!("failed to write record for {}", path.display()))?;
            }
            Err(err) => {
                eprintln!("{}: {err}", path.display());
            }
        }
    }

    Ok(())
}

/// Stdout is reserved for the JSON lines; all diagnostics go to stderr.
fn init_stderr_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn collect_documents(dir: &Path, recursive: bool) -> Vec<PathBuf> {
    let walker = if recursive {
        WalkDir::new(dir)
    } else {
        WalkDir::new(dir).max_depth(1)
    };

    let mut documents: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| {
            file_extension(path)
                .as_deref()
                .and_then(DocumentKind::from_extension)
                .is_some()
        })
        .collect();
    documents.sort();
    documents
}

fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
}
