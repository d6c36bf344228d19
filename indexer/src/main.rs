use anyhow::Result;
use clap::{Parser, Subcommand};
use proxima_core::analysis::Analyzer;
use proxima_core::extract::extract_documents;
use proxima_core::index::Index;
use proxima_core::persist::{save_index, IndexPaths};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "proxima-indexer")]
#[command(about = "Build a positional inverted index from an SGML corpus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a corpus directory or a single .sgm file
    Build {
        /// Input path (directory of .sgm files, or one file)
        #[arg(long)]
        input: String,
        /// Output index directory
        #[arg(long)]
        output: String,
        /// Stopword file (whitespace-separated); defaults to the built-in list
        #[arg(long)]
        stopwords: Option<String>,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, stopwords } => build_index(&input, &output, stopwords),
    }
}

fn build_index(input: &str, output: &str, stopwords: Option<String>) -> Result<()> {
    let analyzer = match stopwords {
        Some(path) => Analyzer::from_stopword_file(&path)?,
        None => Analyzer::with_default_stopwords(),
    };

    // Sorted file order keeps document id assignment stable across builds.
    let mut files = collect_sgm_files(Path::new(input));
    files.sort();

    let mut documents: Vec<String> = Vec::new();
    for file in &files {
        let bytes = fs::read(file)?;
        let sgml = String::from_utf8_lossy(&bytes);
        let extracted = extract_documents(&sgml);
        tracing::info!(file = %file.display(), docs = extracted.len(), "extracted documents");
        documents.extend(extracted);
    }

    let index = Index::build(&documents, &analyzer);
    tracing::info!(
        num_docs = index.num_docs,
        num_terms = index.dictionary.len(),
        "built index"
    );

    let created_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| String::new());
    save_index(&IndexPaths::new(output), &index, created_at)?;
    tracing::info!(output, "index persisted");
    Ok(())
}

fn collect_sgm_files(input: &Path) -> Vec<PathBuf> {
    if input.is_file() {
        return vec![input.to_path_buf()];
    }
    WalkDir::new(input)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("sgm"))
        })
        .map(|e| e.into_path())
        .collect()
}
