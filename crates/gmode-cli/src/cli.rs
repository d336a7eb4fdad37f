// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — CLI Arguments
// ─────────────────────────────────────────────────────────────────────

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use gmode_types::Observable;

#[derive(Parser)]
#[command(name = "gmode")]
#[command(author, version, about = "Match theoretical g-mode spectra against observed period-spacing patterns")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the theoretical pattern of every grid model
    Patterns(PatternsArgs),

    /// Select the models inside the Bayesian credible region
    CredibleRegion(CredibleRegionArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    ChisqLongestSequence,
    HighestAmplitude,
    HighestFrequency,
}

#[derive(Args, Debug)]
pub struct PatternsArgs {
    /// Grid table (TSV) with model parameters and n_pg<order> frequency columns
    #[arg(long)]
    pub grid: PathBuf,

    /// Observation table (TSV) with <observable> and <observable>_err columns
    #[arg(long)]
    pub observations: PathBuf,

    /// Output pattern table (TSV)
    #[arg(short, long, default_value = "theoretical_frequency_patterns.tsv")]
    pub output: PathBuf,

    /// JSON configuration; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Observable to match in: period or frequency
    #[arg(long)]
    pub observable: Option<Observable>,

    /// Pattern-building method
    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,

    /// Observed value to build from, one per pattern segment (highest-amplitude)
    #[arg(long = "anchor")]
    pub anchors: Vec<f64>,

    /// Worker threads (0 = one per core)
    #[arg(long)]
    pub threads: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MeritArg {
    #[value(name = "CS")]
    Cs,
    #[value(name = "MD")]
    Md,
}

#[derive(Args, Debug)]
pub struct CredibleRegionArgs {
    /// Merit table (TSV) with parameter columns and a meritValue column
    #[arg(long)]
    pub merit_table: PathBuf,

    /// Output table; defaults to <merit_table>_<sigma>sigma-error-ellipse.tsv
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON configuration; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Merit function the table was scored with
    #[arg(long, value_enum)]
    pub merit_function: Option<MeritArg>,

    /// Number of observables in the merit function
    #[arg(long)]
    pub n_observables: Option<usize>,

    /// Number of free model parameters (k)
    #[arg(short = 'k', long)]
    pub n_free_parameters: Option<usize>,

    /// Column used for the prior; repeat for each free parameter
    #[arg(long = "free-parameter")]
    pub free_parameters: Vec<String>,

    /// Region width in standard deviations (1, 2 or 3)
    #[arg(long)]
    pub sigma: Option<u8>,

    /// ln(det V) of the variance-covariance matrix (MD only)
    #[arg(long, allow_hyphen_values = true)]
    pub ln_det_v: Option<f64>,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,
}
