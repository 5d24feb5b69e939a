//! Best-overlap selection and its local-flow-consistent (`lfc`) alternative,
//! ported from `StringGraph.mark_best_overlap` / `resolve_repeat_edges`.

use indexmap::IndexSet;

use super::{ReductionReason, StringGraph, VertexId};

/// Keep, for every vertex, only its single highest-score kept out-edge and
/// single highest-score kept in-edge; everything else kept is reduced.
/// Records `best_in[w] = v` for the chosen in-edge's source.
pub fn mark_best_overlap(sg: &mut StringGraph) -> IndexSet<(VertexId, VertexId)> {
    let n = sg.vertices.len() as VertexId;
    let mut best_edges: IndexSet<(VertexId, VertexId)> = IndexSet::new();

    for v in 0..n {
        let mut out_edges: Vec<u32> = sg.vertices[v as usize].out_edges.clone();
        out_edges.sort_by_key(|&eid| std::cmp::Reverse(sg.edges[eid as usize].score));
        for eid in out_edges {
            if !sg.edges[eid as usize].reduced {
                let (from, to) = (sg.edges[eid as usize].from, sg.edges[eid as usize].to);
                best_edges.insert((from, to));
                break;
            }
        }

        let mut in_edges: Vec<u32> = sg.vertices[v as usize].in_edges.clone();
        in_edges.sort_by_key(|&eid| std::cmp::Reverse(sg.edges[eid as usize].score));
        for eid in in_edges {
            if !sg.edges[eid as usize].reduced {
                let (from, to) = (sg.edges[eid as usize].from, sg.edges[eid as usize].to);
                best_edges.insert((from, to));
                sg.best_in.insert(v, from);
                break;
            }
        }
    }

    let mut removed: IndexSet<(VertexId, VertexId)> = IndexSet::new();
    for eid in 0..sg.edges.len() as u32 {
        if sg.edges[eid as usize].reduced {
            continue;
        }
        let (v, w) = (sg.edges[eid as usize].from, sg.edges[eid as usize].to);
        if !best_edges.contains(&(v, w)) {
            sg.reduce(eid, ReductionReason::BestOverlapRemoved);
            removed.insert((v, w));
            let twin = sg.edges[eid as usize].twin.unwrap();
            let (tv, tw) = (sg.edges[twin as usize].from, sg.edges[twin as usize].to);
            removed.insert((tv, tw));
        }
    }
    removed
}

/// Conservative alternative to best-overlap: only cuts an edge `(vv, ww)`
/// out of an in-neighbor `vv` of a degree-(1,1) vertex `v` when `ww`'s
/// in-neighborhood and `v`'s out-neighborhood share nothing and `ww` isn't
/// itself a degree-(1,1) candidate — preserving branches flow might later
/// resolve. Unlike the other reduction passes, this one is written here to
/// still go through [`StringGraph::reduce`] so twin symmetry holds; the
/// source's own `resolve_repeat_edges` does not reduce the twin edge,
/// which would violate the twin-symmetry invariant spec §3/§8 require of
/// every reduction stage (see DESIGN.md).
pub fn resolve_repeat_edges(sg: &mut StringGraph) -> IndexSet<(VertexId, VertexId)> {
    let n = sg.vertices.len() as VertexId;
    let mut nodes_to_test: IndexSet<VertexId> = IndexSet::new();
    for v in 0..n {
        if sg.kept_out_degree(v) == 1 && sg.kept_in_degree(v) == 1 {
            nodes_to_test.insert(v);
        }
    }

    let mut edges_to_reduce: Vec<u32> = Vec::new();

    for &v in &nodes_to_test {
        let in_node = sg.kept_in_edges(v).next().map(|eid| sg.edges[eid as usize].from);
        if let Some(in_node) = in_node {
            for &eid in &sg.vertices[in_node as usize].out_edges {
                let ww = sg.edges[eid as usize].to;
                let ww_out: IndexSet<VertexId> = sg.vertices[ww as usize]
                    .out_edges
                    .iter()
                    .map(|&e| sg.edges[e as usize].to)
                    .collect();
                let v_out: IndexSet<VertexId> = sg.vertices[v as usize]
                    .out_edges
                    .iter()
                    .map(|&e| sg.edges[e as usize].to)
                    .collect();
                let overlap = ww_out.intersection(&v_out).count();
                let ww_in_count = sg.kept_in_degree(ww);
                if ww != v
                    && !sg.edges[eid as usize].reduced
                    && ww_in_count > 1
                    && !nodes_to_test.contains(&ww)
                    && overlap == 0
                {
                    edges_to_reduce.push(eid);
                }
            }
        }

        let out_node = sg.kept_out_edges(v).next().map(|eid| sg.edges[eid as usize].to);
        if let Some(out_node) = out_node {
            for &eid in &sg.vertices[out_node as usize].in_edges {
                let vv = sg.edges[eid as usize].from;
                let vv_in: IndexSet<VertexId> = sg.vertices[vv as usize]
                    .in_edges
                    .iter()
                    .map(|&e| sg.edges[e as usize].from)
                    .collect();
                let v_in: IndexSet<VertexId> = sg.vertices[v as usize]
                    .in_edges
                    .iter()
                    .map(|&e| sg.edges[e as usize].from)
                    .collect();
                let overlap = vv_in.intersection(&v_in).count();
                let vv_out_count = sg.kept_out_degree(vv);
                if vv != v
                    && !sg.edges[eid as usize].reduced
                    && vv_out_count > 1
                    && !nodes_to_test.contains(&vv)
                    && overlap == 0
                {
                    edges_to_reduce.push(eid);
                }
            }
        }
    }

    let mut removed: IndexSet<(VertexId, VertexId)> = IndexSet::new();
    for eid in edges_to_reduce {
        if sg.edges[eid as usize].reduced {
            continue;
        }
        let (v, w) = (sg.edges[eid as usize].from, sg.edges[eid as usize].to);
        sg.reduce(eid, ReductionReason::BestOverlapRemoved);
        removed.insert((v, w));
    }
    removed
}
