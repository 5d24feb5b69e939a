//! The string graph: two parallel arenas (`vertices`, `edges`) indexed by
//! integer ids, per the arena-graph design note — a pointer/reference graph
//! is a poor fit once every reduction pass needs to walk both an edge and
//! its reverse-complement twin.

pub mod best_overlap;
pub mod builder;
pub mod chimer;
pub mod spur;
pub mod transitive_reduction;

use indexmap::IndexMap;

use crate::error::GraphError;
use crate::overlap::reverse_end;

pub type VertexId = u32;
pub type EdgeId = u32;

/// Why an edge is no longer kept. `G` ("kept") is represented by
/// `reduced == false`; every `reduced == true` edge carries the reason it
/// was cut, matching the `{G,TR,C,R,S}` type column of `sg_edges_list`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ReductionReason {
    #[default]
    Kept,
    TransitiveReduction,
    Chimer,
    BestOverlapRemoved,
    Spur,
}

impl ReductionReason {
    pub fn code(self) -> &'static str {
        match self {
            ReductionReason::Kept => "G",
            ReductionReason::TransitiveReduction => "TR",
            ReductionReason::Chimer => "C",
            ReductionReason::BestOverlapRemoved => "R",
            ReductionReason::Spur => "S",
        }
    }
}

pub struct Vertex {
    pub name: String,
    pub out_edges: Vec<EdgeId>,
    pub in_edges: Vec<EdgeId>,
}

/// An overlap-induced edge between two read ends. `rid`/`sp`/`tp` mirror
/// the `"rid:sp-tp"` label the source encodes edge provenance with.
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
    pub rid: String,
    pub sp: i64,
    pub tp: i64,
    pub length: i64,
    pub score: i64,
    pub identity: f64,
    pub reduced: bool,
    pub reason: ReductionReason,
    /// The obligatory companion edge `(reverse_end(to), reverse_end(from))`.
    /// Always `Some` once the graph has been linked; `None` only
    /// transiently during construction.
    pub twin: Option<EdgeId>,
}

#[derive(Default)]
pub struct StringGraph {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
    index: IndexMap<String, VertexId>,
    /// Per-vertex "best kept incoming edge source", populated by
    /// best-overlap selection (§4.3(d)); consulted by the contig extractor.
    pub best_in: IndexMap<VertexId, VertexId>,
}

impl StringGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_name(&self, id: VertexId) -> &str {
        &self.vertices[id as usize].name
    }

    pub fn vertex_id(&self, name: &str) -> Option<VertexId> {
        self.index.get(name).copied()
    }

    pub fn get_or_create_vertex(&mut self, name: &str) -> VertexId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = self.vertices.len() as VertexId;
        self.vertices.push(Vertex {
            name: name.to_string(),
            out_edges: Vec::new(),
            in_edges: Vec::new(),
        });
        self.index.insert(name.to_string(), id);
        id
    }

    /// Insert a directed edge if the (from, to) pair doesn't already exist,
    /// returning its id either way (matching `StringGraph.add_edge`'s
    /// get-or-create semantics in the source).
    pub fn add_edge(
        &mut self,
        from_name: &str,
        to_name: &str,
        rid: &str,
        sp: i64,
        tp: i64,
        score: i64,
        identity: f64,
    ) -> EdgeId {
        let from = self.get_or_create_vertex(from_name);
        let to = self.get_or_create_vertex(to_name);
        if let Some(&eid) = self.edge_between(from, to) {
            return eid;
        }
        let id = self.edges.len() as EdgeId;
        self.edges.push(Edge {
            from,
            to,
            rid: rid.to_string(),
            sp,
            tp,
            length: (sp - tp).abs(),
            score,
            identity,
            reduced: false,
            reason: ReductionReason::Kept,
            twin: None,
        });
        self.vertices[from as usize].out_edges.push(id);
        self.vertices[to as usize].in_edges.push(id);
        id
    }

    fn edge_between(&self, from: VertexId, to: VertexId) -> Option<&EdgeId> {
        self.vertices[from as usize]
            .out_edges
            .iter()
            .find(|&&eid| self.edges[eid as usize].to == to)
    }

    pub fn edge_id(&self, from_name: &str, to_name: &str) -> Option<EdgeId> {
        let from = self.vertex_id(from_name)?;
        let to = self.vertex_id(to_name)?;
        self.edge_between(from, to).copied()
    }

    /// Precompute the twin index for every edge. Must run once after the
    /// builder has finished inserting all forward+twin edge pairs.
    pub fn link_twins(&mut self) -> Result<(), GraphError> {
        for eid in 0..self.edges.len() as EdgeId {
            if self.edges[eid as usize].twin.is_some() {
                continue;
            }
            let (v, w) = {
                let e = &self.edges[eid as usize];
                (
                    self.vertex_name(e.from).to_string(),
                    self.vertex_name(e.to).to_string(),
                )
            };
            let (rv, rw) = (reverse_end(&w)?, reverse_end(&v)?);
            let twin_id = self
                .edge_id(&rv, &rw)
                .ok_or_else(|| GraphError::MissingTwin(v.clone(), w.clone()))?;
            self.edges[eid as usize].twin = Some(twin_id);
            self.edges[twin_id as usize].twin = Some(eid);
        }
        Ok(())
    }

    /// Mark an edge reduced along with its twin, per §9's "Twin-edge
    /// pattern": every mutation to reduction state goes through here so no
    /// call site can forget the twin.
    pub fn reduce(&mut self, eid: EdgeId, reason: ReductionReason) {
        let twin = self.edges[eid as usize].twin;
        self.edges[eid as usize].reduced = true;
        self.edges[eid as usize].reason = reason;
        if let Some(twin) = twin {
            self.edges[twin as usize].reduced = true;
            self.edges[twin as usize].reason = reason;
        }
    }

    pub fn kept_out_edges(&self, v: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.vertices[v as usize]
            .out_edges
            .iter()
            .copied()
            .filter(move |&eid| !self.edges[eid as usize].reduced)
    }

    pub fn kept_in_edges(&self, v: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.vertices[v as usize]
            .in_edges
            .iter()
            .copied()
            .filter(move |&eid| !self.edges[eid as usize].reduced)
    }

    pub fn kept_out_degree(&self, v: VertexId) -> usize {
        self.kept_out_edges(v).count()
    }

    pub fn kept_in_degree(&self, v: VertexId) -> usize {
        self.kept_in_edges(v).count()
    }

    /// Bounded BFS over kept out-edges only, excluding `exclude`, matching
    /// `StringGraph.bfs_nodes`.
    pub fn bfs_nodes(&self, start: VertexId, exclude: Option<VertexId>, depth: u32) -> indexmap::IndexSet<VertexId> {
        let mut all_nodes = indexmap::IndexSet::new();
        all_nodes.insert(start);
        let mut frontier = vec![start];
        let mut dp = 1;
        while dp < depth && !frontier.is_empty() {
            let mut next = Vec::new();
            for v in frontier {
                for eid in self.vertices[v as usize].out_edges.iter().copied() {
                    let w = self.edges[eid as usize].to;
                    if Some(w) == exclude {
                        continue;
                    }
                    if all_nodes.insert(w) && !self.vertices[w as usize].out_edges.is_empty() {
                        next.push(w);
                    }
                }
            }
            frontier = next;
            dp += 1;
        }
        all_nodes
    }
}
