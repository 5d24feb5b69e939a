//! Spur pruning, ported from `StringGraph.mark_spur_edge`.
//!
//! The condition is deliberately asymmetric: a branch vertex `v` with ≥2
//! kept out-edges drops any out-edge into a vertex `w` that has *no out
//! edges at all* (not merely no kept ones) — and the mirrored in-edge case
//! checks total in-edges of `w`, not kept in-edges. Spec §9 calls this out
//! explicitly ("preserve the exact condition ... rather than
//! 'symmetrizing' it"); this is that condition, unmodified.

use indexmap::IndexSet;

use super::{ReductionReason, StringGraph, VertexId};

pub fn mark_spur_edges(sg: &mut StringGraph) -> IndexSet<(VertexId, VertexId)> {
    let mut removed: IndexSet<(VertexId, VertexId)> = IndexSet::new();
    let n = sg.vertices.len() as VertexId;

    for v in 0..n {
        if sg.kept_out_degree(v) > 1 {
            let out_edges = sg.vertices[v as usize].out_edges.clone();
            for eid in out_edges {
                let w = sg.edges[eid as usize].to;
                if sg.vertices[w as usize].out_edges.is_empty() && !sg.edges[eid as usize].reduced {
                    sg.reduce(eid, ReductionReason::Spur);
                    removed.insert((v, w));
                    let twin = sg.edges[eid as usize].twin.unwrap();
                    let (tv, tw) = (sg.edges[twin as usize].from, sg.edges[twin as usize].to);
                    removed.insert((tv, tw));
                }
            }
        }

        if sg.kept_in_degree(v) > 1 {
            let in_edges = sg.vertices[v as usize].in_edges.clone();
            for eid in in_edges {
                let w = sg.edges[eid as usize].from;
                if sg.vertices[w as usize].in_edges.is_empty() && !sg.edges[eid as usize].reduced {
                    sg.reduce(eid, ReductionReason::Spur);
                    removed.insert((w, v));
                    let twin = sg.edges[eid as usize].twin.unwrap();
                    let (tv, tw) = (sg.edges[twin as usize].from, sg.edges[twin as usize].to);
                    removed.insert((tv, tw));
                }
            }
        }
    }

    removed
}
