use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "strandloom",
    version,
    about = "String-graph assembler over long-read overlap evidence"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all but error-level log output
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Two-pass streaming overlap filter
    Filter(FilterArgs),

    /// Build and reduce the string graph, then extract contigs
    Assemble(AssembleArgs),
}

#[derive(Args)]
pub struct FilterArgs {
    /// Output filename for accepted overlaps
    #[arg(long, default_value = "preads.ovl")]
    pub out_fn: String,

    /// Number of worker processes (0 = main thread only)
    #[arg(long, default_value_t = 4)]
    pub n_core: usize,

    /// FOFN of per-file overlap records to filter in parallel
    #[arg(long)]
    pub las_fofn: String,

    /// Read database handle (opaque, passed through to the producer)
    #[arg(long)]
    pub db: Option<String>,

    /// Max difference between 5' and 3' coverage
    #[arg(long, default_value_t = 120)]
    pub max_diff: i64,

    /// Max coverage of 5' or 3' end
    #[arg(long, default_value_t = 100)]
    pub max_cov: i64,

    /// Min coverage of 5' or 3' end
    #[arg(long, default_value_t = 1)]
    pub min_cov: i64,

    /// Min length of the reads
    #[arg(long, default_value_t = 2500)]
    pub min_len: i64,

    /// Minimum alignment identity to consider an overlap
    #[arg(long, default_value_t = 90.0)]
    pub min_idt: f64,

    /// Ignore indels in calculating alignment identity
    #[arg(long, default_value_t = false)]
    pub ignore_indels: bool,

    /// Output at least best-N overlaps on each end if possible
    #[arg(long, default_value_t = 10)]
    pub bestn: usize,

    /// Stream from the producer instead of slurping all at once
    #[arg(long, default_value_t = false)]
    pub stream: bool,

    /// Single-threaded, plus other aids to debugging
    #[arg(short = 'g', long, default_value_t = false)]
    pub debug: bool,

    /// Suppress per-file progress reporting
    #[arg(long, default_value_t = false)]
    pub silent: bool,
}

impl From<&FilterArgs> for crate::config::FilterConfig {
    fn from(args: &FilterArgs) -> Self {
        Self {
            out_fn: args.out_fn.clone(),
            n_core: args.n_core,
            las_fofn: args.las_fofn.clone(),
            db_fn: args.db.clone(),
            max_diff: args.max_diff,
            max_cov: args.max_cov,
            min_cov: args.min_cov,
            min_len: args.min_len,
            min_idt: args.min_idt,
            ignore_indels: args.ignore_indels,
            bestn: args.bestn,
            stream: args.stream,
            debug: args.debug,
            silent: args.silent,
        }
    }
}

#[derive(Args)]
pub struct AssembleArgs {
    /// Overlap-record file (one accepted overlap per line, terminated by a
    /// line starting with '-')
    #[arg(long, default_value = "preads.m4")]
    pub overlap_file: String,

    /// Use the local-flow-consistent resolver instead of best-overlap
    #[arg(long, default_value_t = false)]
    pub lfc: bool,

    /// Disable chimer-induced bridge removal
    #[arg(long, default_value_t = false)]
    pub disable_chimer_bridge_removal: bool,

    /// Prefix for contig names
    #[arg(long, default_value = "")]
    pub ctg_prefix: String,

    /// Output directory for sg_edges_list, utg_data, ctg_paths, etc.
    #[arg(short = 'o', long, default_value = ".")]
    pub out_dir: String,

    /// Also write utg_data0 (the pre-bundle-collapse unitig table)
    #[arg(long, default_value_t = false)]
    pub write_utg_data0: bool,

    /// Also write chimers_nodes (implied off when chimer removal is disabled)
    #[arg(long, default_value_t = true)]
    pub write_chimers_nodes: bool,
}

impl From<&AssembleArgs> for crate::config::AssembleConfig {
    fn from(args: &AssembleArgs) -> Self {
        Self {
            overlap_file: args.overlap_file.clone(),
            lfc: args.lfc,
            disable_chimer_bridge_removal: args.disable_chimer_bridge_removal,
            output: crate::config::OutputConfig {
                out_dir: args.out_dir.clone(),
                ctg_prefix: args.ctg_prefix.clone(),
                write_utg_data0: args.write_utg_data0,
                write_chimers_nodes: args.write_chimers_nodes && !args.disable_chimer_bridge_removal,
            },
        }
    }
}
