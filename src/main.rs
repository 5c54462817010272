use anyhow::{Context, Result};
use clap::Parser;

use epsmatch::args::Cli;
use epsmatch::engine;
use epsmatch::region::GenomicRegion;
use epsmatch::report;
use epsmatch::sequence::read_fasta;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let params = cli.search_params()?;
    let format = cli.format()?;
    let segment = match &cli.segment {
        Some(s) => Some(GenomicRegion::parse(s)?),
        None => None,
    };

    let num_threads = if params.threads == 0 {
        num_cpus::get()
    } else {
        params.threads
    };
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .context("Failed to build thread pool")?;

    let queries = read_fasta(&cli.query)?;
    let database = read_fasta(&cli.database)?;
    if cli.verbose {
        eprintln!(
            "[INFO] {} queries, {} database sequences, {} threads",
            queries.len(),
            database.len(),
            num_threads
        );
    }

    let outcome = engine::search(&queries, &database, &params, segment.as_ref(), cli.verbose)?;

    report::write_report(
        &outcome.matches,
        &queries,
        &database,
        format,
        cli.out.as_ref(),
    )?;

    let disabled = outcome.disabled_query_ids();
    if !disabled.is_empty() {
        if let Some(path) = &cli.disabled_queries_file {
            report::write_disabled_fasta(path, &queries, &disabled)?;
        }
        eprintln!(
            "[WARN] {} queries were disabled during the run",
            disabled.len()
        );
    }
    Ok(())
}
