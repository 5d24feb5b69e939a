mod bundle;
mod cli;
mod config;
mod container;
mod contig;
mod error;
mod filter;
mod graph;
mod overlap;
mod serialize_outputs;
mod unitig;

use clap::Parser;
use cli::{Cli, Commands};
use error::AppError;

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        log::LevelFilter::Error
    } else {
        match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new().filter_level(level).init();
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(&cli);

    match &cli.command {
        Commands::Filter(args) => run_filter_command(args),
        Commands::Assemble(args) => run_assemble_command(args),
    }
}

fn run_filter_command(args: &cli::FilterArgs) -> Result<(), AppError> {
    let cfg: config::FilterConfig = args.into();
    log::info!("filtering overlaps from {} into {}", cfg.las_fofn, cfg.out_fn);
    filter::run_filter(&cfg)?;
    Ok(())
}

fn run_assemble_command(args: &cli::AssembleArgs) -> Result<(), AppError> {
    let cfg: config::AssembleConfig = args.into();
    let out_dir = std::path::Path::new(&cfg.output.out_dir);

    log::info!("building string graph from {}", cfg.overlap_file);
    let records = read_overlap_file(&cfg.overlap_file)?;
    let (mut sg, stats) = graph::builder::build_string_graph(records)?;
    log::info!(
        "built graph with {} vertices, {} edges ({} duplicate pairs, {} degenerate skipped)",
        sg.vertices.len(),
        stats.edges_added,
        stats.duplicate_pairs_skipped,
        stats.degenerate_skipped
    );

    graph::transitive_reduction::reduce_transitive_edges(&mut sg, graph::transitive_reduction::FUZZ);
    log::info!("transitive reduction complete");

    let mut chimer_nodes: Vec<String> = Vec::new();
    if !cfg.disable_chimer_bridge_removal {
        let chimer_result = graph::chimer::mark_chimer_edges(&mut sg);
        log::info!("marked {} chimer nodes", chimer_result.chimer_nodes.len());
        chimer_nodes = chimer_result.chimer_nodes;
    }

    graph::spur::mark_spur_edges(&mut sg);
    log::info!("first spur pass complete");

    if cfg.lfc {
        graph::best_overlap::resolve_repeat_edges(&mut sg);
        log::info!("resolved repeat edges (local-flow-consistent mode)");
    } else {
        graph::best_overlap::mark_best_overlap(&mut sg);
        log::info!("selected best overlaps");
    }

    graph::spur::mark_spur_edges(&mut sg);
    log::info!("second spur pass complete");

    std::fs::create_dir_all(out_dir)?;
    serialize_outputs::write_sg_edges_list(&sg, out_dir)?;
    if cfg.output.write_chimers_nodes && !cfg.disable_chimer_bridge_removal {
        serialize_outputs::write_chimers_nodes(&chimer_nodes, out_dir)?;
    }

    let mut utg = unitig::identify_simple_paths(&sg);
    log::info!("compressed into {} unitig edges", utg.edges.len());
    if cfg.output.write_utg_data0 {
        serialize_outputs::write_utg_data0(&sg, &utg, out_dir)?;
    }

    unitig::remove_spurs(&mut utg, 50_000);
    unitig::remove_dup_simple_paths(&sg, &mut utg);
    log::info!("unitig graph has {} active edges after first spur pass and dedup", utg.out_edges.values().map(|e| e.len()).sum::<usize>());

    for eid in bundle::identify_short_edges_to_remove(&utg, 60_000) {
        utg.tag(eid, unitig::UtgEdgeType::RepeatBridge);
    }
    let bundles = bundle::find_bundles(&utg);
    log::info!("found {} compound-path bundles", bundles.len());

    let c_paths = contig::construct_c_path_from_utgs(&mut utg, &bundles);

    // Repeat the aggressive spur filtering with a slightly larger threshold
    // now that bundles have been collapsed into compound edges.
    unitig::remove_spurs(&mut utg, 80_000);
    log::info!("second spur pass complete");

    serialize_outputs::write_utg_data(&sg, &utg, out_dir)?;
    serialize_outputs::write_c_path(&sg, &c_paths, &bundles, out_dir)?;

    let (contigs, circulars) = contig::extract_contigs(&sg, &c_paths);
    log::info!("extracted {} contigs, {} circular paths", contigs.len() / 2, circulars.len());
    serialize_outputs::write_ctg_paths(&sg, &c_paths, &contigs, &circulars, &cfg.output.ctg_prefix, out_dir)?;

    Ok(())
}

/// Overlap-record files are terminated by a line starting with `-`, matching
/// the source's sentinel-terminated stream format.
fn read_overlap_file(path: &str) -> Result<Vec<overlap::OverlapRecord>, AppError> {
    let content = std::fs::read_to_string(path)?;
    let mut records = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('-') {
            continue;
        }
        records.push(overlap::OverlapRecord::parse(trimmed)?);
    }
    Ok(records)
}
