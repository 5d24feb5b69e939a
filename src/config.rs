//! Plain configuration structs populated from CLI args via `From<&XArgs>`,
//! following the teacher's `cli.rs` / `configs.rs` split. `OutputConfig`
//! generalizes the hard-coded output filenames design note in spec §9
//! ("accept a configuration with `{out_dir, ctg_prefix, write_utg_data0,
//! write_chimers_nodes}` rather than hard-coded paths").

#[derive(Clone, Debug)]
pub struct FilterConfig {
    pub out_fn: String,
    pub n_core: usize,
    pub las_fofn: String,
    pub db_fn: Option<String>,
    pub max_diff: i64,
    pub max_cov: i64,
    pub min_cov: i64,
    pub min_len: i64,
    pub min_idt: f64,
    pub ignore_indels: bool,
    pub bestn: usize,
    pub stream: bool,
    pub debug: bool,
    pub silent: bool,
}

#[derive(Clone, Debug)]
pub struct OutputConfig {
    pub out_dir: String,
    pub ctg_prefix: String,
    pub write_utg_data0: bool,
    pub write_chimers_nodes: bool,
}

#[derive(Clone, Debug)]
pub struct AssembleConfig {
    pub overlap_file: String,
    pub lfc: bool,
    pub disable_chimer_bridge_removal: bool,
    pub output: OutputConfig,
}
