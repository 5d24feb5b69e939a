//! Writers for the assembler's fixed-name output files, grounded in
//! `print_edge_data` / `print_utg_data0` / the `c_path`/`ctg_paths` writers
//! of `ovlp_to_graph.py`. Every writer goes through a [`tempfile::NamedTempFile`]
//! so a crash mid-write never leaves a half-written output file in place.

use std::io::Write;
use std::path::Path;

use crate::bundle::Bundle;
use crate::contig::{edge_triple, CPath, CircularContig, Contig};
use crate::error::AssemblyError;
use crate::graph::StringGraph;
use crate::unitig::{UtgEdge, UtgEdgeType, UtgGraph};

fn atomic_write(out_dir: &Path, name: &str, body: impl FnOnce(&mut dyn Write) -> std::io::Result<()>) -> Result<(), AssemblyError> {
    std::fs::create_dir_all(out_dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(out_dir)?;
    body(&mut tmp)?;
    tmp.flush()?;
    tmp.persist(out_dir.join(name)).map_err(|e| e.error)?;
    Ok(())
}

/// `sg_edges_list`: every edge the builder inserted, reduced or not, one
/// line per edge: `v w rid sp tp score identity type`.
pub fn write_sg_edges_list(sg: &StringGraph, out_dir: &Path) -> Result<(), AssemblyError> {
    atomic_write(out_dir, "sg_edges_list", |w| {
        for e in &sg.edges {
            writeln!(
                w,
                "{} {} {} {} {} {} {:.2} {}",
                sg.vertex_name(e.from),
                sg.vertex_name(e.to),
                e.rid,
                e.sp,
                e.tp,
                e.score,
                e.identity,
                e.reason.code()
            )?;
        }
        Ok(())
    })
}

/// `chimers_nodes`: one read-end name per line, both ends of every node
/// identified as a chimeric bridge.
pub fn write_chimers_nodes(nodes: &[String], out_dir: &Path) -> Result<(), AssemblyError> {
    atomic_write(out_dir, "chimers_nodes", |w| {
        for n in nodes {
            writeln!(w, "{n}")?;
        }
        Ok(())
    })
}

/// `s v t type length score path_or_edges`: `v` is the first internal hop
/// after `s` (or `NA` for a compound edge, or one with no internal hop);
/// `path_or_edges` is `~`-joined vertex names for every non-compound type,
/// or `|`-joined `s~v~t` triples over `members` for a compound edge.
fn utg_edge_line(sg: &StringGraph, edge: &UtgEdge) -> String {
    let v = match edge.kind {
        UtgEdgeType::Compound => "NA".to_string(),
        _ => edge.path.get(1).map(|&v| sg.vertex_name(v).to_string()).unwrap_or_else(|| "NA".to_string()),
    };
    let path_or_edges = if edge.kind == UtgEdgeType::Compound {
        edge.members
            .iter()
            .map(|&(s, t)| format!("{}~NA~{}", sg.vertex_name(s), sg.vertex_name(t)))
            .collect::<Vec<_>>()
            .join("|")
    } else {
        edge.path.iter().map(|&v| sg.vertex_name(v)).collect::<Vec<_>>().join("~")
    };
    format!(
        "{} {} {} {} {} {} {}",
        sg.vertex_name(edge.from),
        v,
        sg.vertex_name(edge.to),
        edge.kind.code(),
        edge.length,
        edge.score,
        path_or_edges
    )
}

/// `utg_data0`: the unitig table right after simple-path compression, before
/// any spur removal, dedup, or bundle collapse has tagged anything.
pub fn write_utg_data0(sg: &StringGraph, utg: &UtgGraph, out_dir: &Path) -> Result<(), AssemblyError> {
    atomic_write(out_dir, "utg_data0", |w| {
        for edge in utg.edges.values() {
            writeln!(w, "{}", utg_edge_line(sg, edge))?;
        }
        Ok(())
    })
}

/// `utg_data`: the final unitig table, including every tagged-but-retained
/// edge (spur, simple_dup, contained, repeat_bridge) and the compound edges
/// added by bundle collapse.
pub fn write_utg_data(sg: &StringGraph, utg: &UtgGraph, out_dir: &Path) -> Result<(), AssemblyError> {
    atomic_write(out_dir, "utg_data", |w| {
        for edge in utg.edges.values() {
            writeln!(w, "{}", utg_edge_line(sg, edge))?;
        }
        Ok(())
    })
}

/// `c_path`: the post-bundle-collapse path table, one line per c_path edge:
/// `v w kind length score`.
pub fn write_c_path(sg: &StringGraph, c_paths: &[CPath], bundles: &[Bundle], out_dir: &Path) -> Result<(), AssemblyError> {
    atomic_write(out_dir, "c_path", |w| {
        for cp in c_paths {
            let kind = match cp.kind {
                crate::contig::CPathKind::Simple => "simple",
                crate::contig::CPathKind::Compound => "compound",
            };
            writeln!(
                w,
                "{} {} {} {} {}",
                sg.vertex_name(cp.from),
                sg.vertex_name(cp.to),
                kind,
                cp.length,
                cp.score
            )?;
        }
        let _ = bundles;
        Ok(())
    })
}

/// `ctg_paths`: one line per emitted contig tuple per §4.6: `name type
/// first_edge_triple end_vertex length score edge_string`, contigs ordered
/// by descending length, circular contigs emitted after the linear ones.
pub fn write_ctg_paths(
    sg: &StringGraph,
    c_paths: &[CPath],
    contigs: &[Contig],
    circulars: &[CircularContig],
    ctg_prefix: &str,
    out_dir: &Path,
) -> Result<(), AssemblyError> {
    atomic_write(out_dir, "ctg_paths", |w| {
        let mut ordered: Vec<&Contig> = contigs.iter().collect();
        ordered.sort_by_key(|c| std::cmp::Reverse(c.length));
        for c in ordered {
            let name = format!("{ctg_prefix}{:06}{}", c.id, c.orientation);
            let start = c.nodes.first().copied();
            let end = c.nodes.last().copied();
            let kind = if start.is_some() && start == end { "ctg_circular" } else { "ctg_linear" };
            let first_triple = c
                .segments
                .first()
                .map(|&i| edge_triple(sg, &c_paths[i]))
                .unwrap_or_else(|| "NA~NA~NA".to_string());
            let end_vertex = end.map(|v| sg.vertex_name(v)).unwrap_or("NA");
            let edge_string = c.segments.iter().map(|&i| edge_triple(sg, &c_paths[i])).collect::<Vec<_>>().join("|");
            writeln!(w, "{name} {kind} {first_triple} {end_vertex} {} {} {edge_string}", c.length, c.score)?;
        }

        let mut ordered_circ: Vec<&CircularContig> = circulars.iter().collect();
        ordered_circ.sort_by_key(|c| std::cmp::Reverse(c.length));
        for c in ordered_circ {
            let first_triple = c
                .segments
                .first()
                .map(|&i| edge_triple(sg, &c_paths[i]))
                .unwrap_or_else(|| "NA~NA~NA".to_string());
            let end_vertex = c.nodes.last().map(|&v| sg.vertex_name(v)).unwrap_or("NA");
            let edge_string = c.segments.iter().map(|&i| edge_triple(sg, &c_paths[i])).collect::<Vec<_>>().join("|");
            writeln!(w, "{} ctg_circular {first_triple} {end_vertex} {} {} {edge_string}", c.name, c.length, c.score)?;
        }
        Ok(())
    })
}
