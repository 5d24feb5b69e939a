//! Unitig construction: compresses maximal simple paths of the kept string
//! graph into single edges, then prunes short dead ends and collapses
//! near-duplicate parallel paths. Ported from `identify_simple_paths` /
//! `identify_spurs` / `remove_dup_simple_path`, adapted to run directly over
//! the arena [`StringGraph`] (kept edges only) instead of a separate
//! networkx-style multigraph keyed by node name.

use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};

use crate::graph::{StringGraph, VertexId};

pub type UtgEdgeId = u64;

/// Mirrors the source's `type_` tag on a unitig edge. An edge is never
/// dropped from the graph once tagged; `UtgGraph::tag` only updates this
/// field, and `is_active` decides whether downstream passes still traverse
/// it. `Spur`'s wire code is `spur:2` regardless of which pass found it,
/// matching the source's literal (and slightly odd) tag string.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UtgEdgeType {
    Simple,
    SimpleDup,
    Compound,
    Spur,
    Contained,
    RepeatBridge,
}

impl UtgEdgeType {
    pub fn code(self) -> &'static str {
        match self {
            UtgEdgeType::Simple => "simple",
            UtgEdgeType::SimpleDup => "simple_dup",
            UtgEdgeType::Compound => "compound",
            UtgEdgeType::Spur => "spur:2",
            UtgEdgeType::Contained => "contained",
            UtgEdgeType::RepeatBridge => "repeat_bridge",
        }
    }

    /// Whether an edge of this type still participates in graph traversal
    /// (bundle search, spur search, contig walks) or is retained only so the
    /// output tables can report its fate.
    pub fn is_active(self) -> bool {
        matches!(self, UtgEdgeType::Simple | UtgEdgeType::Compound)
    }
}

#[derive(Clone, Debug)]
pub struct UtgEdge {
    pub from: VertexId,
    pub to: VertexId,
    /// Every vertex visited along the compressed run, `from` and `to`
    /// inclusive. A single-link edge (no compression happened) has exactly
    /// two entries. For a `Compound` edge this is just `[from, to]`; its real
    /// span is `members`.
    pub path: Vec<VertexId>,
    pub length: i64,
    pub score: i64,
    pub kind: UtgEdgeType,
    /// For `Compound` edges: the `(from, to)` pair of every constituent
    /// bundle edge it collapsed. Empty for every other type.
    pub members: Vec<(VertexId, VertexId)>,
}

#[derive(Default)]
pub struct UtgGraph {
    next_id: UtgEdgeId,
    pub edges: IndexMap<UtgEdgeId, UtgEdge>,
    pub out_edges: IndexMap<VertexId, Vec<UtgEdgeId>>,
    pub in_edges: IndexMap<VertexId, Vec<UtgEdgeId>>,
}

impl UtgGraph {
    pub fn add_edge(&mut self, edge: UtgEdge) -> UtgEdgeId {
        let id = self.next_id;
        self.next_id += 1;
        self.out_edges.entry(edge.from).or_default().push(id);
        self.in_edges.entry(edge.to).or_default().push(id);
        self.edges.insert(id, edge);
        id
    }

    /// Re-tag an edge in place. The edge stays in every adjacency list; only
    /// its `kind` changes, so a retagged edge still shows up in the output
    /// tables but drops out of `active_out_edges`/`active_in_edges`.
    pub fn tag(&mut self, id: UtgEdgeId, kind: UtgEdgeType) {
        if let Some(edge) = self.edges.get_mut(&id) {
            edge.kind = kind;
        }
    }

    pub fn active_out_edges(&self, v: VertexId) -> Vec<UtgEdgeId> {
        self.out_edges
            .get(&v)
            .into_iter()
            .flatten()
            .copied()
            .filter(|eid| self.edges[eid].kind.is_active())
            .collect()
    }

    pub fn active_in_edges(&self, v: VertexId) -> Vec<UtgEdgeId> {
        self.in_edges
            .get(&v)
            .into_iter()
            .flatten()
            .copied()
            .filter(|eid| self.edges[eid].kind.is_active())
            .collect()
    }

    pub fn out_degree(&self, v: VertexId) -> usize {
        self.active_out_edges(v).len()
    }

    pub fn in_degree(&self, v: VertexId) -> usize {
        self.active_in_edges(v).len()
    }
}

/// A vertex is a pass-through node if exactly one kept edge enters and
/// exactly one kept edge leaves: collapsing it loses no branch information.
fn is_passthrough(sg: &StringGraph, v: VertexId) -> bool {
    sg.kept_in_degree(v) == 1 && sg.kept_out_degree(v) == 1
}

/// Walk every maximal run of pass-through nodes in the kept graph into a
/// single compressed edge. Branch nodes (in/out degree != 1) are left as the
/// endpoints of whatever runs meet them; isolated cycles of pass-through
/// nodes (no branch node anywhere on the cycle) are walked starting from an
/// arbitrary unvisited node on the cycle and reported as a single circular
/// edge whose `from == to`.
pub fn identify_simple_paths(sg: &StringGraph) -> UtgGraph {
    let mut utg = UtgGraph::default();
    let mut consumed: IndexMap<(VertexId, VertexId), ()> = IndexMap::new();

    let n = sg.vertices.len() as VertexId;

    // Pass 1: runs that start at a branch (or source) node, i.e. any node
    // that is not itself a pass-through node.
    for v in 0..n {
        if is_passthrough(sg, v) {
            continue;
        }
        let start_edges: Vec<_> = sg.kept_out_edges(v).collect();
        for start_eid in start_edges {
            let first_w = sg.edges[start_eid as usize].to;
            if consumed.contains_key(&(v, first_w)) {
                continue;
            }
            let mut path = vec![v, first_w];
            let mut length = sg.edges[start_eid as usize].length;
            let mut score = sg.edges[start_eid as usize].score;
            consumed.insert((v, first_w), ());

            let mut cur = first_w;
            while is_passthrough(sg, cur) {
                let eid = sg.kept_out_edges(cur).next().unwrap();
                let next = sg.edges[eid as usize].to;
                if next == v {
                    // closes back on the run's own start: stop, this is a
                    // cycle hanging off a branch node, not a true pass-through loop.
                    break;
                }
                consumed.insert((cur, next), ());
                length += sg.edges[eid as usize].length;
                score += sg.edges[eid as usize].score;
                path.push(next);
                cur = next;
            }

            utg.add_edge(UtgEdge {
                from: v,
                to: cur,
                path,
                length,
                score,
                kind: UtgEdgeType::Simple,
                members: Vec::new(),
            });
        }
    }

    // Pass 2: pure cycles of pass-through nodes with no branch node at all.
    for v in 0..n {
        if !is_passthrough(sg, v) {
            continue;
        }
        let eid = match sg.kept_out_edges(v).next() {
            Some(e) => e,
            None => continue,
        };
        let first_w = sg.edges[eid as usize].to;
        if consumed.contains_key(&(v, first_w)) {
            continue;
        }
        let mut path = vec![v];
        let mut length = 0i64;
        let mut score = 0i64;
        let mut cur = v;
        loop {
            let eid = sg.kept_out_edges(cur).next().unwrap();
            let next = sg.edges[eid as usize].to;
            consumed.insert((cur, next), ());
            length += sg.edges[eid as usize].length;
            score += sg.edges[eid as usize].score;
            path.push(next);
            cur = next;
            if cur == v {
                break;
            }
        }
        utg.add_edge(UtgEdge {
            from: v,
            to: v,
            path,
            length,
            score,
            kind: UtgEdgeType::Simple,
            members: Vec::new(),
        });
    }

    utg
}

/// Every active-edge node reachable from `start` within `radius` hops,
/// following out-edges only. Ported from `nx.ego_graph(ug2, n, radius=10)`.
fn ego_nodes(utg: &UtgGraph, start: VertexId, radius: u32) -> IndexSet<VertexId> {
    let mut nodes = IndexSet::new();
    nodes.insert(start);
    let mut frontier = vec![start];
    let mut depth = 0;
    while depth < radius && !frontier.is_empty() {
        let mut next = Vec::new();
        for v in frontier {
            for eid in utg.active_out_edges(v) {
                let w = utg.edges[&eid].to;
                if nodes.insert(w) {
                    next.push(w);
                }
            }
        }
        frontier = next;
        depth += 1;
    }
    nodes
}

/// Shortest active-edge path from `start` to `goal` by hop count, ported
/// from `nx.shortest_path`.
fn shortest_path(utg: &UtgGraph, start: VertexId, goal: VertexId) -> Option<Vec<VertexId>> {
    if start == goal {
        return Some(vec![start]);
    }
    let mut prev: IndexMap<VertexId, VertexId> = IndexMap::new();
    let mut visited: IndexSet<VertexId> = IndexSet::new();
    visited.insert(start);
    let mut queue = VecDeque::new();
    queue.push_back(start);
    while let Some(v) = queue.pop_front() {
        for eid in utg.active_out_edges(v) {
            let w = utg.edges[&eid].to;
            if !visited.insert(w) {
                continue;
            }
            prev.insert(w, v);
            if w == goal {
                let mut path = vec![goal];
                let mut cur = goal;
                while let Some(&p) = prev.get(&cur) {
                    path.push(p);
                    cur = p;
                }
                path.reverse();
                return Some(path);
            }
            queue.push_back(w);
        }
    }
    None
}

fn active_edge_between(utg: &UtgGraph, from: VertexId, to: VertexId) -> Option<UtgEdgeId> {
    utg.active_out_edges(from).into_iter().find(|&eid| utg.edges[&eid].to == to)
}

/// Aggressive spur removal, ported from `identify_spurs`. A node with no
/// active in-edges is a spur-tip candidate; its radius-10 ego graph is
/// searched for the first branch node `b` with more than one active
/// in-edge, at least one of which comes from outside the ego graph. If the
/// shortest path from the candidate to `b` totals less than `spur_len`,
/// every edge on that path is tagged `Spur` (not removed — the edges stay
/// in the graph for the output tables, just no longer active), and any node
/// the path fed to zero remaining in-edges becomes a fresh candidate.
pub fn remove_spurs(utg: &mut UtgGraph, spur_len: i64) -> usize {
    let mut tagged = 0;
    let mut candidates: IndexSet<VertexId> = utg
        .out_edges
        .keys()
        .copied()
        .filter(|&v| utg.in_degree(v) == 0)
        .collect();

    while let Some(n) = candidates.pop() {
        if utg.in_degree(n) != 0 {
            continue;
        }
        let ego = ego_nodes(utg, n, 10);

        for &b in &ego {
            if utg.in_degree(b) <= 1 {
                continue;
            }
            let b_in: Vec<VertexId> = utg.active_in_edges(b).iter().map(|&eid| utg.edges[&eid].from).collect();
            if b_in.len() == 1 {
                continue;
            }
            if !b_in.iter().any(|v| !ego.contains(v)) {
                continue;
            }

            let Some(path) = shortest_path(utg, n, b) else { continue };
            let edge_ids: Vec<UtgEdgeId> = path
                .windows(2)
                .filter_map(|pair| active_edge_between(utg, pair[0], pair[1]))
                .collect();
            let total_length: i64 = edge_ids.iter().map(|eid| utg.edges[eid].length).sum();
            if total_length >= spur_len {
                continue;
            }

            for eid in edge_ids {
                utg.tag(eid, UtgEdgeType::Spur);
                tagged += 1;
            }
            for &v2 in &path[1..] {
                if utg.in_degree(v2) == 0 {
                    candidates.insert(v2);
                }
            }
            break;
        }
    }
    tagged
}

/// Collapse short (<=3 vertex) duplicate parallel simple paths between the
/// same pair of endpoints, keeping the lexicographically smallest path (by
/// vertex-name sequence) and tagging the rest `SimpleDup`. Mirrors
/// `remove_dup_simple_path`'s bubble-of-near-identical-short-paths cleanup,
/// which best-overlap selection alone does not catch because both paths can
/// carry distinct best-in winners at their midpoint.
pub fn remove_dup_simple_paths(sg: &StringGraph, utg: &mut UtgGraph) -> usize {
    let mut groups: IndexMap<(VertexId, VertexId), Vec<UtgEdgeId>> = IndexMap::new();
    for (&id, edge) in &utg.edges {
        if edge.kind == UtgEdgeType::Simple && edge.path.len() <= 4 {
            groups.entry((edge.from, edge.to)).or_default().push(id);
        }
    }

    let mut tagged = 0;
    for (_, mut ids) in groups {
        if ids.len() < 2 {
            continue;
        }
        ids.sort_by(|&a, &b| {
            let pa: Vec<&str> = utg.edges[&a].path.iter().map(|&v| sg.vertex_name(v)).collect();
            let pb: Vec<&str> = utg.edges[&b].path.iter().map(|&v| sg.vertex_name(v)).collect();
            pa.cmp(&pb)
        });
        for &id in &ids[1..] {
            utg.tag(id, UtgEdgeType::SimpleDup);
            tagged += 1;
        }
    }
    tagged
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
    fn chain_of_two_overlaps_compresses_to_one_edge_per_strand() {
        let a = ov("r1", "r2", -100, 0, 100, 500, 400, 500, 500);
        let b = ov("r2", "r3", -100, 0, 100, 500, 400, 500, 500);
        let (sg, _) = build_string_graph(vec![a, b]).unwrap();
        let utg = identify_simple_paths(&sg);
        assert!(utg.edges.values().any(|e| e.path.len() >= 2));
    }
}
