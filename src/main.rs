//! pushdown-eval - evaluate a serialized expression tree against one row

use anyhow::{bail, Context, Result};
use clap::Parser as ClapParser;
use log::{debug, info};
use pushdown_eval::EvalRequest;
use std::path::PathBuf;

/// Evaluate a bincode-framed pushdown request and print the resulting datum
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Request file containing the expression tree and the row
    #[arg(short, long)]
    request: PathBuf,

    /// Evaluate the request this many times and check every result matches
    #[arg(short = 'n', long, default_value = "1")]
    repeat: usize,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if args.repeat == 0 {
        bail!("--repeat must be at least 1");
    }

    let request = EvalRequest::load(&args.request)?;
    info!(
        "Evaluating {} ({} nodes)",
        args.request.display(),
        request.expr.node_count()
    );

    let result = request.evaluate().context("Evaluation failed")?;
    for round in 1..args.repeat {
        let again = request.evaluate().context("Evaluation failed")?;
        if again != result {
            bail!(
                "Evaluation round {} produced {} instead of {}",
                round + 1,
                again,
                result
            );
        }
        debug!("Round {} matched", round + 1);
    }

    println!("{} ({:?})", result, result.kind());
    Ok(())
}
