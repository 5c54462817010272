use clap::Parser;
use std::path::PathBuf;

use crate::alphabet::Alphabet;
use crate::error::Result;
use crate::options::{OutputFormat, SearchParams, VerificationMethod};

#[derive(Parser, Debug)]
#[command(name = "epsmatch")]
#[command(version = "0.1.0")]
#[command(about = "Local pairwise aligner reporting all epsilon-matches via SWIFT filtering", long_about = None)]
pub struct Cli {
    /// Query sequences (FASTA)
    #[arg(short, long)]
    pub query: PathBuf,
    /// Database sequences (FASTA)
    #[arg(short, long)]
    pub database: PathBuf,
    /// Maximal error rate of reported matches
    #[arg(short, long, default_value_t = 0.05)]
    pub epsilon: f64,
    /// Minimal length of reported matches
    #[arg(short = 'l', long, default_value_t = 100)]
    pub min_length: usize,
    /// Q-gram length for filtering (0 = derive from epsilon)
    #[arg(short = 'k', long, default_value_t = 0)]
    pub qgram: usize,
    /// Fraction of all query q-grams above which a bucket is masked
    #[arg(long, default_value_t = 1.0)]
    pub abundance_cut: f64,
    /// X-drop parameter for extension and alignment splitting
    #[arg(short = 'x', long, default_value_t = 5.0)]
    pub x_drop: f64,
    /// Diagonal tolerance of the filter (0 = derive from epsilon and length)
    #[arg(long, default_value_t = 0)]
    pub delta: usize,
    /// Minimal length of database repeats that bypass filtering
    #[arg(long, default_value_t = 1000)]
    pub min_repeat_length: usize,
    /// Maximal period of database repeats that bypass filtering
    #[arg(long, default_value_t = 1)]
    pub max_repeat_period: usize,
    /// Match count above which a query is disabled
    #[arg(long)]
    pub disable_thresh: Option<usize>,
    /// Initial match count that triggers compaction
    #[arg(long, default_value_t = 500)]
    pub compact_thresh: usize,
    /// Maximal number of matches kept per query
    #[arg(long, default_value_t = 50)]
    pub num_matches: usize,
    /// Search the forward strand of the database
    #[arg(long, default_value_t = true)]
    pub forward: bool,
    /// Search the reverse-complement strand of the database
    #[arg(long, default_value_t = true)]
    pub reverse: bool,
    /// Sequence alphabet: dna, dna5, rna5, protein, char
    #[arg(long, default_value = "dna5")]
    pub alphabet: String,
    /// Verification method: all-local, best-local, banded-global,
    /// banded-global-extend
    #[arg(long, default_value = "all-local")]
    pub verification: String,
    /// Worker threads (0 = all cores)
    #[arg(short = 'n', long, default_value_t = 0)]
    pub threads: usize,
    /// Output file (stdout if absent)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    /// Output format: gff, tabular
    #[arg(long, default_value = "gff")]
    pub output_format: String,
    /// FASTA file receiving queries disabled during the run
    #[arg(long)]
    pub disabled_queries_file: Option<PathBuf>,
    /// Restrict the scan to one database region, NAME[:START[-END]]
    #[arg(long)]
    pub segment: Option<String>,
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

impl Cli {
    pub fn search_params(&self) -> Result<SearchParams> {
        let params = SearchParams {
            epsilon: self.epsilon,
            min_length: self.min_length,
            qgram: self.qgram,
            abundance_cut: self.abundance_cut,
            x_drop: self.x_drop,
            delta: self.delta,
            min_repeat_length: self.min_repeat_length,
            max_repeat_period: self.max_repeat_period,
            disable_thresh: self.disable_thresh.unwrap_or(usize::MAX),
            compact_thresh: self.compact_thresh,
            num_matches: self.num_matches,
            forward: self.forward,
            reverse: self.reverse,
            alphabet: Alphabet::from_name(&self.alphabet)?,
            verification: VerificationMethod::from_name(&self.verification)?,
            threads: self.threads,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn format(&self) -> Result<OutputFormat> {
        OutputFormat::from_name(&self.output_format)
    }
}
