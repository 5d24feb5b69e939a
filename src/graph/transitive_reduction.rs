//! Myers-style transitive reduction, ported from `StringGraph.mark_tr_edges`.

use indexmap::IndexMap;

use super::{EdgeId, ReductionReason, StringGraph, VertexId};

pub const FUZZ: i64 = 500;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Vacant,
    InPlay,
    Eliminated,
}

/// Transitive reduction with tolerance `fuzz` (spec default 500). For every
/// vertex, sorts its out-edges ascending by length, marks targets in-play,
/// then eliminates any 2-hop target reachable within `longest_out_len +
/// fuzz`, plus (second sweep) each neighbor's single shortest out-edge
/// target and any out-edge shorter than `fuzz`.
pub fn reduce_transitive_edges(sg: &mut StringGraph, fuzz: i64) {
    let n = sg.vertices.len();
    let mut mark: Vec<Mark> = vec![Mark::Vacant; n];

    for v in 0..n as VertexId {
        let mut out_edges: Vec<EdgeId> = sg.vertices[v as usize].out_edges.clone();
        if out_edges.is_empty() {
            continue;
        }
        out_edges.sort_by_key(|&eid| sg.edges[eid as usize].length);

        for &eid in &out_edges {
            let w = sg.edges[eid as usize].to;
            mark[w as usize] = Mark::InPlay;
        }

        let max_len = sg.edges[*out_edges.last().unwrap() as usize].length + fuzz;

        for &eid in &out_edges {
            let e_len = sg.edges[eid as usize].length;
            let w = sg.edges[eid as usize].to;
            if mark[w as usize] == Mark::InPlay {
                let mut w_out: Vec<EdgeId> = sg.vertices[w as usize].out_edges.clone();
                w_out.sort_by_key(|&eid2| sg.edges[eid2 as usize].length);
                for eid2 in w_out {
                    if sg.edges[eid2 as usize].length + e_len < max_len {
                        let x = sg.edges[eid2 as usize].to;
                        if mark[x as usize] == Mark::InPlay {
                            mark[x as usize] = Mark::Eliminated;
                        }
                    }
                }
            }
        }

        for &eid in &out_edges {
            let w = sg.edges[eid as usize].to;
            let mut w_out: Vec<EdgeId> = sg.vertices[w as usize].out_edges.clone();
            w_out.sort_by_key(|&eid2| sg.edges[eid2 as usize].length);
            if let Some(&first) = w_out.first() {
                let x = sg.edges[first as usize].to;
                if mark[x as usize] == Mark::InPlay {
                    mark[x as usize] = Mark::Eliminated;
                }
            }
            for eid2 in w_out {
                if sg.edges[eid2 as usize].length < fuzz {
                    let x = sg.edges[eid2 as usize].to;
                    if mark[x as usize] == Mark::InPlay {
                        mark[x as usize] = Mark::Eliminated;
                    }
                }
            }
        }

        for &eid in &out_edges {
            let w = sg.edges[eid as usize].to;
            if mark[w as usize] == Mark::Eliminated {
                sg.reduce(eid, ReductionReason::TransitiveReduction);
            }
            mark[w as usize] = Mark::Vacant;
        }
    }
}

/// Sanity helper for idempotence tests: after a TR pass, no kept edge
/// `(u, w)` should have a kept 2-hop detour `u -> v -> w` strictly cheaper
/// than `len(u, w) + FUZZ`.
pub fn has_violating_shortcut(sg: &StringGraph, fuzz: i64) -> bool {
    let mut direct: IndexMap<(VertexId, VertexId), i64> = IndexMap::new();
    for e in &sg.edges {
        if !e.reduced {
            direct.insert((e.from, e.to), e.length);
        }
    }
    for v in 0..sg.vertices.len() as VertexId {
        for eid in sg.kept_out_edges(v) {
            let w = sg.edges[eid as usize].to;
            let len_vw = sg.edges[eid as usize].length;
            for eid2 in sg.kept_out_edges(w) {
                let x = sg.edges[eid2 as usize].to;
                if x == v {
                    continue;
                }
                if let Some(&len_vx) = direct.get(&(v, x)) {
                    let len_wx = sg.edges[eid2 as usize].length;
                    if len_vw + len_wx < len_vx + fuzz {
                        return true;
                    }
                }
            }
        }
    }
    false
}
