use anyhow::Result;
use clap::Parser;
use proxima_core::Error;
use proxima_search::SearchSession;
use std::io::{self, BufRead};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "proxima-search")]
#[command(about = "Answer proximity queries against a persisted index", long_about = None)]
struct Args {
    /// Index directory path
    #[arg(long, default_value = "./index")]
    index: String,
    /// Run a single query instead of reading lines from stdin
    #[arg(long)]
    query: Option<String>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let session = SearchSession::open(&args.index)?;

    if let Some(line) = args.query {
        println!("{}", session.answer_line(&line)?);
        return Ok(());
    }

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match session.answer_line(&line) {
            Ok(rendered) => println!("{rendered}"),
            // one bad query never affects the next; the index stays loaded
            Err(Error::QuerySyntax { reason }) => tracing::error!(%reason, "rejected query"),
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}
