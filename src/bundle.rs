//! Compound-path (superbubble) detection over the unitig graph, ported from
//! `find_bundle` / `construct_compound_paths_*`. A bundle is a bounded
//! diamond: a source vertex with >1 out-edge and a single sink vertex where
//! every branch rejoins, discovered by a width/depth/length-bounded BFS
//! rather than full reachability (which would be too slow on a graph with
//! thousands of branch points).

use indexmap::{IndexMap, IndexSet};

use crate::unitig::{UtgEdgeId, UtgGraph};

pub const DEPTH_CUTOFF: usize = 48;
pub const TIPS_CUTOFF: usize = 4;
pub const WIDTH_CUTOFF: usize = 16;
pub const LENGTH_CUTOFF: i64 = 500_000;

#[derive(Debug)]
pub struct Bundle {
    pub source: u32,
    pub sink: u32,
    pub edges: IndexSet<UtgEdgeId>,
    pub nodes: IndexSet<u32>,
}

enum BundleState {
    Growing,
    Closed(Bundle),
    Failed,
}

/// Try to grow a bundle rooted at `source`. Mirrors the `find_bundle` state
/// machine: at each step, every "tip" (frontier node) must either be the
/// eventual sink or have out-edges to extend; the bundle fails if tip
/// count, width-over-depth, or accumulated length blow past the cutoffs, or
/// if a tip runs out of out-edges without being the sink.
///
/// A tip can only be extended once every one of its in-edges' sources has
/// already had `length_to_node` computed — otherwise some other path into
/// it hasn't been explored yet, and expanding it now could wrongly close
/// the bundle early or miscompute its depth. A tip whose predecessors
/// aren't all ready yet is left in the frontier for the next round instead.
fn find_bundle(utg: &UtgGraph, source: u32) -> BundleState {
    let mut tips: IndexSet<u32> = IndexSet::new();
    tips.insert(source);
    let mut bundle_edges: IndexSet<UtgEdgeId> = IndexSet::new();
    let mut bundle_nodes: IndexSet<u32> = IndexSet::new();
    bundle_nodes.insert(source);
    let mut length_to_node: IndexMap<u32, i64> = IndexMap::new();
    length_to_node.insert(source, 0);

    for depth in 0..DEPTH_CUTOFF {
        if tips.len() == 1 && bundle_edges.len() > 1 {
            let sink = *tips.iter().next().unwrap();
            return BundleState::Closed(Bundle {
                source,
                sink,
                edges: bundle_edges,
                nodes: bundle_nodes,
            });
        }
        if tips.len() > TIPS_CUTOFF {
            return BundleState::Failed;
        }
        if depth > 10 {
            let width = bundle_edges.len() as f64 / depth as f64;
            if width > WIDTH_CUTOFF as f64 {
                return BundleState::Failed;
            }
        }

        let mut next_tips: IndexSet<u32> = IndexSet::new();
        let mut extended_any = false;
        for &t in &tips {
            let ins = utg.active_in_edges(t);
            let preds_ready = ins.iter().all(|eid| length_to_node.contains_key(&utg.edges[eid].from));
            if !preds_ready {
                next_tips.insert(t);
                continue;
            }
            if t != source {
                if let Some(&best_eid) = ins.iter().max_by_key(|&eid| utg.edges[eid].score) {
                    let edge = &utg.edges[&best_eid];
                    let pred_len = length_to_node[&edge.from];
                    length_to_node.insert(t, pred_len + edge.length);
                }
            }

            let out = utg.active_out_edges(t);
            if out.is_empty() {
                return BundleState::Failed;
            }
            extended_any = true;
            let base_len = length_to_node.get(&t).copied().unwrap_or(0);
            for eid in out {
                let edge = &utg.edges[&eid];
                bundle_edges.insert(eid);
                bundle_nodes.insert(edge.to);
                if base_len + edge.length > LENGTH_CUTOFF {
                    return BundleState::Failed;
                }
                if edge.to == source {
                    // looped back to the source: not a DAG bundle.
                    return BundleState::Failed;
                }
                next_tips.insert(edge.to);
            }
        }
        if !extended_any {
            // every remaining tip is still waiting on a predecessor that
            // will never arrive (a cycle outside the bundle, or a dead end).
            return BundleState::Failed;
        }
        tips = next_tips;
        if tips.is_empty() {
            return BundleState::Failed;
        }
    }
    BundleState::Growing
}

/// Every vertex with more than one kept out-edge is a candidate bundle
/// source (matches `identify_branch_nodes`'s out-degree filter).
fn identify_branch_nodes(utg: &UtgGraph) -> Vec<u32> {
    let mut nodes: Vec<u32> = utg.out_edges.keys().copied().filter(|&v| utg.out_degree(v) > 1).collect();
    nodes.sort_unstable();
    nodes
}

/// Accept a candidate bundle only if it doesn't reuse a node already claimed
/// by a previously accepted bundle, matching `construct_compound_paths_1/2/3`'s
/// non-overlap requirement (a node can belong to at most one compound path).
pub fn find_bundles(utg: &UtgGraph) -> Vec<Bundle> {
    let mut accepted: Vec<Bundle> = Vec::new();
    let mut claimed: IndexSet<u32> = IndexSet::new();

    for source in identify_branch_nodes(utg) {
        if claimed.contains(&source) {
            continue;
        }
        if let BundleState::Closed(bundle) = find_bundle(utg, source) {
            if bundle.nodes.iter().any(|n| claimed.contains(n)) {
                continue;
            }
            claimed.extend(bundle.nodes.iter().copied());
            accepted.push(bundle);
        }
    }
    accepted
}

/// Short repeat-bridge removal: an in=1/out=2 node feeding straight into an
/// in=2/out=1 node within `length_cutoff` is a collapsed short repeat, not a
/// real bundle; drop the two connecting edges so the unitig graph reduces to
/// a single straight-through path. Ported from
/// `identify_short_edges_to_remove`.
pub fn identify_short_edges_to_remove(utg: &UtgGraph, length_cutoff: i64) -> Vec<UtgEdgeId> {
    let mut to_remove = Vec::new();
    for v in utg.out_edges.keys().copied() {
        let out = utg.active_out_edges(v);
        if out.len() != 2 {
            continue;
        }
        if utg.in_degree(v) != 1 {
            continue;
        }
        for eid in out {
            let edge = &utg.edges[&eid];
            if edge.length >= length_cutoff {
                continue;
            }
            if utg.in_degree(edge.to) == 2 && utg.out_degree(edge.to) == 1 {
                to_remove.push(eid);
            }
        }
    }
    to_remove
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unitig::{UtgEdge, UtgEdgeType};

    fn edge(from: u32, to: u32, length: i64) -> UtgEdge {
        UtgEdge {
            from,
            to,
            path: vec![from, to],
            length,
            score: -length,
            kind: UtgEdgeType::Simple,
            members: Vec::new(),
        }
    }

    #[test]
    fn diamond_closes_into_a_single_bundle() {
        let mut utg = UtgGraph::default();
        utg.add_edge(edge(0, 1, 100));
        utg.add_edge(edge(0, 2, 120));
        utg.add_edge(edge(1, 3, 100));
        utg.add_edge(edge(2, 3, 90));

        let bundles = find_bundles(&utg);
        assert_eq!(bundles.len(), 1);
        assert_eq!(bundles[0].source, 0);
        assert_eq!(bundles[0].sink, 3);
    }
}
