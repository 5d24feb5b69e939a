//! Chimer-bridge detection and removal, ported from
//! `StringGraph.mark_chimer_edges`.
//!
//! Candidate iteration order is an explicit Open Question in spec §9: the
//! source pops from an unordered set, so the marked-edge set can depend on
//! traversal order when two candidates' bundles interact. This
//! implementation resolves that by sorting candidates lexicographically by
//! vertex name before processing them, and documents the choice here
//! rather than leaving it implicit.

use indexmap::IndexSet;

use super::{ReductionReason, StringGraph, VertexId};
use crate::overlap::reverse_end;

pub struct ChimerResult {
    pub chimer_nodes: Vec<String>,
    pub chimer_edges: IndexSet<(VertexId, VertexId)>,
}

pub fn mark_chimer_edges(sg: &mut StringGraph) -> ChimerResult {
    let n = sg.vertices.len() as VertexId;

    let mut multi_out_targets: Vec<IndexSet<VertexId>> = vec![IndexSet::new(); n as usize];
    let mut multi_in_sources: Vec<IndexSet<VertexId>> = vec![IndexSet::new(); n as usize];
    for v in 0..n {
        let out: Vec<VertexId> = sg.kept_out_edges(v).map(|eid| sg.edges[eid as usize].to).collect();
        if out.len() >= 2 {
            multi_out_targets[v as usize] = out.into_iter().collect();
        }
        let inn: Vec<VertexId> = sg.kept_in_edges(v).map(|eid| sg.edges[eid as usize].from).collect();
        if inn.len() >= 2 {
            multi_in_sources[v as usize] = inn.into_iter().collect();
        }
    }

    let mut out_set: IndexSet<VertexId> = IndexSet::new();
    for set in &multi_out_targets {
        out_set.extend(set.iter().copied());
    }
    let mut in_set: IndexSet<VertexId> = IndexSet::new();
    for set in &multi_in_sources {
        in_set.extend(set.iter().copied());
    }

    let mut candidates: Vec<VertexId> = out_set.intersection(&in_set).copied().collect();
    candidates.sort_by(|&a, &b| sg.vertex_name(a).cmp(sg.vertex_name(b)));

    let mut chimer_nodes = Vec::new();
    let mut chimer_edges: IndexSet<(VertexId, VertexId)> = IndexSet::new();

    for n_id in candidates {
        let out_nodes: IndexSet<VertexId> = sg.vertices[n_id as usize]
            .out_edges
            .iter()
            .map(|&eid| sg.edges[eid as usize].to)
            .collect();
        let mut test_set: IndexSet<VertexId> = IndexSet::new();
        for in_edge in &sg.vertices[n_id as usize].in_edges {
            let p = sg.edges[*in_edge as usize].from;
            for &out_eid in &sg.vertices[p as usize].out_edges {
                test_set.insert(sg.edges[out_eid as usize].to);
            }
        }
        test_set.remove(&n_id);

        if !out_nodes.intersection(&test_set).next().is_some() {
            let mut flow1: IndexSet<VertexId> = IndexSet::new();
            for &v in &out_nodes {
                flow1.extend(sg.bfs_nodes(v, Some(n_id), 5));
            }
            let mut flow2: IndexSet<VertexId> = IndexSet::new();
            for &v in &test_set {
                flow2.extend(sg.bfs_nodes(v, Some(n_id), 5));
            }
            if flow1.intersection(&flow2).next().is_none() {
                let out_edges: Vec<u32> = sg.vertices[n_id as usize].out_edges.clone();
                for eid in out_edges {
                    if !sg.edges[eid as usize].reduced {
                        let (v, w) = (sg.edges[eid as usize].from, sg.edges[eid as usize].to);
                        sg.reduce(eid, ReductionReason::Chimer);
                        chimer_edges.insert((v, w));
                        let twin = sg.edges[eid as usize].twin.unwrap();
                        let (tv, tw) = (sg.edges[twin as usize].from, sg.edges[twin as usize].to);
                        chimer_edges.insert((tv, tw));
                    }
                }
                let in_edges: Vec<u32> = sg.vertices[n_id as usize].in_edges.clone();
                for eid in in_edges {
                    if !sg.edges[eid as usize].reduced {
                        let (v, w) = (sg.edges[eid as usize].from, sg.edges[eid as usize].to);
                        sg.reduce(eid, ReductionReason::Chimer);
                        chimer_edges.insert((v, w));
                        let twin = sg.edges[eid as usize].twin.unwrap();
                        let (tv, tw) = (sg.edges[twin as usize].from, sg.edges[twin as usize].to);
                        chimer_edges.insert((tv, tw));
                    }
                }
                let name = sg.vertex_name(n_id).to_string();
                chimer_nodes.push(name.clone());
                chimer_nodes.push(reverse_end(&name).expect("vertex names are validated at construction"));
            }
        }
    }

    ChimerResult {
        chimer_nodes,
        chimer_edges,
    }
}
