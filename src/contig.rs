//! Final c_path construction and contig extraction, ported from
//! `construct_c_path_from_utgs` / `extract_contigs`.
//!
//! A c_path is the unitig graph with every accepted bundle collapsed into a
//! single "compound" edge spanning its source to its sink; what's left is a
//! simple chain-and-branch graph that `extract_contigs` walks into the
//! final sequences.

use indexmap::{IndexMap, IndexSet};

use crate::bundle::Bundle;
use crate::graph::{StringGraph, VertexId};
use crate::unitig::{UtgEdge, UtgEdgeType, UtgGraph};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CPathKind {
    Simple,
    Compound,
}

#[derive(Clone, Debug)]
pub struct CPath {
    pub from: VertexId,
    pub to: VertexId,
    pub kind: CPathKind,
    pub path: Vec<VertexId>,
    pub length: i64,
    pub score: i64,
    /// For compound edges: the `from` vertex of every constituent bundle edge
    /// that lands on `to`. Empty for simple edges, which use `path` instead.
    pub sink_preds: Vec<VertexId>,
    /// The multigraph "key" vertex: the first internal hop after `from` for
    /// a simple edge, or `None` (prints as `NA`) for a compound edge.
    pub key: Option<VertexId>,
}

/// Collapse every accepted bundle into one compound edge; unitig edges that
/// fall entirely outside every bundle pass through unchanged as simple
/// edges. Edges wholly internal to a bundle (neither endpoint is the
/// bundle's source or sink) are tagged `Contained` in `utg` rather than
/// deleted, and a new `Compound` edge spanning the bundle is added to `utg`
/// so the final unitig table reports it too.
pub fn construct_c_path_from_utgs(utg: &mut UtgGraph, bundles: &[Bundle]) -> Vec<CPath> {
    let mut compound: Vec<CPath> = Vec::new();

    for bundle in bundles {
        let mut path: Vec<VertexId> = vec![bundle.source];
        path.extend(bundle.nodes.iter().copied().filter(|&n| n != bundle.source && n != bundle.sink));
        if bundle.sink != bundle.source {
            path.push(bundle.sink);
        }
        let length: i64 = bundle
            .edges
            .iter()
            .map(|eid| utg.edges[eid].length)
            .max()
            .unwrap_or(0);
        let score: i64 = bundle.edges.iter().map(|eid| utg.edges[eid].score).sum();
        let sink_preds: Vec<VertexId> = bundle
            .edges
            .iter()
            .map(|eid| &utg.edges[eid])
            .filter(|e| e.to == bundle.sink)
            .map(|e| e.from)
            .collect();
        let members: Vec<(VertexId, VertexId)> = bundle.edges.iter().map(|eid| (utg.edges[eid].from, utg.edges[eid].to)).collect();

        compound.push(CPath {
            from: bundle.source,
            to: bundle.sink,
            kind: CPathKind::Compound,
            path: path.clone(),
            length,
            score,
            sink_preds,
            key: None,
        });

        // the constituent edges are superseded by the compound edge; tag
        // them `contained` unless a spur pass already claimed them, and
        // record the compound edge itself in the unitig graph.
        for &eid in &bundle.edges {
            if utg.edges[&eid].kind != UtgEdgeType::Spur {
                utg.tag(eid, UtgEdgeType::Contained);
            }
        }
        utg.add_edge(UtgEdge {
            from: bundle.source,
            to: bundle.sink,
            path,
            length,
            score,
            kind: UtgEdgeType::Compound,
            members,
        });
    }

    let mut simple: Vec<CPath> = Vec::new();
    for edge in utg.edges.values() {
        if edge.kind != UtgEdgeType::Simple {
            continue;
        }
        simple.push(CPath {
            from: edge.from,
            to: edge.to,
            kind: CPathKind::Simple,
            path: edge.path.clone(),
            length: edge.length,
            score: edge.score,
            sink_preds: Vec::new(),
            key: edge.path.get(1).copied(),
        });
    }

    compound.into_iter().chain(simple).collect()
}

pub struct Contig {
    pub id: u32,
    /// "F" for forward or "R" for the reverse-complement walk of the same id.
    pub orientation: &'static str,
    pub nodes: Vec<VertexId>,
    pub length: i64,
    pub score: i64,
    /// Indices into the `c_paths` slice, in walk order, for the forward
    /// orientation. The "R" contig of the same id reuses the same segments
    /// in reverse order.
    pub segments: Vec<usize>,
}

pub struct CircularContig {
    pub name: String,
    pub nodes: Vec<VertexId>,
    pub length: i64,
    pub score: i64,
    pub segments: Vec<usize>,
}

/// Walk every source (a node with no incoming c_path edge, or a branch node
/// whose `best_in` pick is not on this path) forward until a sink with no
/// outgoing edge or a revisit. At a branch point with more than one
/// outgoing c_path edge, the walk continues along the edge whose target
/// matches `sg.best_in` when available; otherwise, the lexicographically
/// first target breaks the tie deterministically. Forward and reverse
/// walks of the same underlying path share one zero-padded numeric id and
/// are emitted as an "F"/"R" pair, matching `extract_contigs`'s pairing.
/// Purely circular simple paths (a node is its own only predecessor and
/// successor with no branch anywhere on the loop) are extracted separately
/// afterward, under a distinct unpadded, un-suffixed naming scheme.
pub fn extract_contigs(sg: &StringGraph, c_paths: &[CPath]) -> (Vec<Contig>, Vec<CircularContig>) {
    let mut out_edges: IndexMap<VertexId, Vec<usize>> = IndexMap::new();
    let mut in_edges: IndexMap<VertexId, Vec<usize>> = IndexMap::new();
    for (idx, cp) in c_paths.iter().enumerate() {
        out_edges.entry(cp.from).or_default().push(idx);
        in_edges.entry(cp.to).or_default().push(idx);
    }

    let mut visited_edges: IndexSet<usize> = IndexSet::new();
    let mut contigs: Vec<Contig> = Vec::new();
    let mut circulars: Vec<CircularContig> = Vec::new();
    let mut next_id: u32 = 0;

    let mut sources: Vec<VertexId> = out_edges
        .keys()
        .copied()
        .filter(|v| in_edges.get(v).map_or(true, |e| e.is_empty()))
        .collect();
    sources.sort_by_key(|&v| sg.vertex_name(v).to_string());

    for &start in &sources {
        if out_edges.get(&start).map_or(true, |e| e.is_empty()) {
            continue;
        }
        let mut nodes = vec![start];
        let mut length = 0i64;
        let mut score = 0i64;
        let mut segments: Vec<usize> = Vec::new();
        let mut cur = start;
        loop {
            let candidates = match out_edges.get(&cur) {
                Some(v) if !v.is_empty() => v,
                _ => break,
            };
            let unvisited: Vec<usize> = candidates.iter().copied().filter(|e| !visited_edges.contains(e)).collect();
            if unvisited.is_empty() {
                break;
            }
            let chosen = pick_branch(sg, c_paths, &unvisited);
            visited_edges.insert(chosen);
            let cp = &c_paths[chosen];
            length += cp.length;
            score += cp.score;
            segments.push(chosen);
            nodes.extend(cp.path.iter().skip(1).copied());
            cur = cp.to;
            if cur == start {
                break;
            }
        }

        let id = next_id;
        next_id += 1;
        contigs.push(Contig {
            id,
            orientation: "F",
            nodes: nodes.clone(),
            length,
            score,
            segments: segments.clone(),
        });
        contigs.push(Contig {
            id,
            orientation: "R",
            nodes: nodes.into_iter().rev().collect(),
            length,
            score,
            segments: segments.into_iter().rev().collect(),
        });
    }

    // Remaining unvisited edges form cycles with no branch node (every
    // node on them was filtered out of `sources` since it has an in-edge).
    for (idx, cp) in c_paths.iter().enumerate() {
        if visited_edges.contains(&idx) {
            continue;
        }
        let start = cp.from;
        let mut nodes = vec![start];
        let mut length = 0i64;
        let mut score = 0i64;
        let mut segments: Vec<usize> = Vec::new();
        let mut cur = start;
        loop {
            let candidates = match out_edges.get(&cur) {
                Some(v) if !v.is_empty() => v,
                _ => break,
            };
            let unvisited: Vec<usize> = candidates.iter().copied().filter(|e| !visited_edges.contains(e)).collect();
            if unvisited.is_empty() {
                break;
            }
            let chosen = pick_branch(sg, c_paths, &unvisited);
            visited_edges.insert(chosen);
            let cpe = &c_paths[chosen];
            length += cpe.length;
            score += cpe.score;
            segments.push(chosen);
            nodes.extend(cpe.path.iter().skip(1).copied());
            cur = cpe.to;
            if cur == start {
                break;
            }
        }
        circulars.push(CircularContig {
            name: format!("circular_{}", sg.vertex_name(start)),
            nodes,
            length,
            score,
            segments,
        });
    }

    (contigs, circulars)
}

/// `s~v~t`, the wire format for one c_path segment; `v` is `NA` for a
/// compound edge or one with no internal hop.
pub fn edge_triple(sg: &StringGraph, cp: &CPath) -> String {
    let v = cp.key.map(|v| sg.vertex_name(v)).unwrap_or("NA");
    format!("{}~{}~{}", sg.vertex_name(cp.from), v, sg.vertex_name(cp.to))
}

/// At a branch, `best_in[t]` (`t` being the candidate edge's `to`) decides
/// which outgoing edge continues the contig: for a `simple` edge, the
/// second-to-last vertex of its internal path must equal `best_in[t]`; for a
/// `compound` edge, `best_in[t]` must be the `from` of some constituent
/// bundle edge landing on `t`. A candidate whose `best_in` doesn't name it
/// falls through to the lexicographically smallest target as a deterministic
/// tie-break.
fn pick_branch(sg: &StringGraph, c_paths: &[CPath], candidates: &[usize]) -> usize {
    if candidates.len() == 1 {
        return candidates[0];
    }
    if let Some(&idx) = candidates.iter().find(|&&i| {
        let cp = &c_paths[i];
        let Some(&best) = sg.best_in.get(&cp.to) else {
            return false;
        };
        match cp.kind {
            CPathKind::Simple => cp.path.len() >= 2 && cp.path[cp.path.len() - 2] == best,
            CPathKind::Compound => cp.sink_preds.contains(&best),
        }
    }) {
        return idx;
    }
    *candidates
        .iter()
        .min_by_key(|&&i| sg.vertex_name(c_paths[i].to))
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::build_string_graph;
    use crate::overlap::OverlapRecord;

    fn ov(f: &str, g: &str, score: i64, f_b: i64, f_e: i64, f_l: i64, g_b: i64, g_e: i64, g_l: i64) -> OverlapRecord {
        OverlapRecord {
            f_id: f.to_string(),
            g_id: g.to_string(),
            score,
            identity: 99.0,
            f_strand: 0,
            f_start: f_b,
            f_end: f_e,
            f_len: f_l,
            g_strand: 0,
            g_start: g_b,
            g_end: g_e,
            g_len: g_l,
            tag: None,
        }
    }

    #[test]
    fn linear_chain_extracts_one_forward_reverse_pair() {
        let a = ov("r1", "r2", -100, 0, 100, 500, 400, 500, 500);
        let b = ov("r2", "r3", -100, 0, 100, 500, 400, 500, 500);
        let (sg, _) = build_string_graph(vec![a, b]).unwrap();
        let mut utg = crate::unitig::identify_simple_paths(&sg);
        let c_paths = construct_c_path_from_utgs(&mut utg, &[]);
        let (contigs, _circulars) = extract_contigs(&sg, &c_paths);
        assert_eq!(contigs.iter().filter(|c| c.orientation == "F").count(), contigs.len() / 2);
    }
}
