//! Generic dependency graph with a cached topological order.
//!
//! [`DependencyGraph`] knows nothing about circuits: it orders opaque vertex
//! values connected by opaque edge payloads. The one unusual feature is the
//! shape of its output: [`calc_order`] produces an *interleaved* sequence in
//! which each vertex is followed immediately by the payloads of its outgoing
//! edges, so a consumer can replay "vertex becomes ready, then everything it
//! feeds" in a single pass.
//!
//! [`calc_order`]: DependencyGraph::calc_order

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use petgraph::prelude::DiGraphMap;
use petgraph::Direction;
use thiserror::Error;

/// The graph contains at least one cycle, so no complete topological order
/// exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("dependency graph contains a cycle ({remaining} vertices unordered)")]
pub struct Cycle {
    /// Number of vertices that never reached in-degree zero.
    pub remaining: usize,
}

/// One entry of the interleaved order returned by
/// [`DependencyGraph::calc_order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<V, E> {
    /// A vertex whose dependencies are all satisfied.
    Vertex(V),
    /// The payload of an edge whose source vertex was just emitted.
    Edge(E),
}

/// A directed graph supporting incremental insertion and a cached
/// topological ordering with cycle detection (Kahn's algorithm).
#[derive(Debug, Clone)]
pub struct DependencyGraph<V: Copy + Ord + Hash, E: Clone> {
    edges: DiGraphMap<V, E>,
    order: Option<Vec<Step<V, E>>>,
}

impl<V: Copy + Ord + Hash, E: Clone> Default for DependencyGraph<V, E> {
    fn default() -> Self {
        Self { edges: DiGraphMap::new(), order: None }
    }
}

impl<V: Copy + Ord + Hash, E: Clone> DependencyGraph<V, E> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Default::default()
    }

    /// Number of registered vertices.
    pub fn vertex_count(&self) -> usize {
        self.edges.node_count()
    }

    /// Number of registered edges.
    pub fn edge_count(&self) -> usize {
        self.edges.edge_count()
    }

    /// Registers a vertex and invalidates the cached order.
    ///
    /// Re-adding an existing vertex is a no-op (its edges are kept).
    pub fn add_vertex(&mut self, vertex: V) {
        self.edges.add_node(vertex);
        self.order = None;
    }

    /// Records a directed edge carrying `edge` and invalidates the cached
    /// order. At most one edge is kept per ordered `(from, to)` pair; a
    /// second insert replaces the payload.
    ///
    /// Panics if either endpoint was never registered with [`add_vertex`].
    ///
    /// [`add_vertex`]: DependencyGraph::add_vertex
    pub fn add_edge(&mut self, from: V, to: V, edge: E) {
        assert!(self.edges.contains_node(from), "edge source must be a registered vertex");
        assert!(self.edges.contains_node(to), "edge target must be a registered vertex");
        self.edges.add_edge(from, to, edge);
        self.order = None;
    }

    /// Returns the cached interleaved order, computing it if necessary.
    ///
    /// The order is a linear extension of the dependency partial order:
    /// for every edge `(u -> v)`, `u` appears before `v`, and each edge
    /// payload appears immediately after its source vertex. Among
    /// simultaneously-ready vertices the tie-break is insertion order,
    /// which is stable for identical insertion sequences but not part of
    /// the contract.
    ///
    /// A cyclic graph yields `Err(Cycle)`; no partial order is returned or
    /// cached in that case.
    pub fn calc_order(&mut self) -> Result<&[Step<V, E>], Cycle> {
        if self.order.is_none() {
            self.order = Some(self.kahn()?);
        }
        Ok(self.order.as_deref().expect("order was just computed"))
    }

    fn kahn(&self) -> Result<Vec<Step<V, E>>, Cycle> {
        let vertices: Vec<V> = self.edges.nodes().collect();
        let index: HashMap<V, usize> = vertices.iter()
            .enumerate()
            .map(|(i, &v)| (v, i))
            .collect();

        let mut in_degree: Vec<usize> = vertices.iter()
            .map(|&v| self.edges.neighbors_directed(v, Direction::Incoming).count())
            .collect();

        let mut ready: VecDeque<usize> = in_degree.iter()
            .enumerate()
            .filter(|&(_, &deg)| deg == 0)
            .map(|(i, _)| i)
            .collect();

        let mut output = Vec::with_capacity(self.vertex_count() + self.edge_count());
        let mut emitted = 0;

        while let Some(i) = ready.pop_front() {
            let vertex = vertices[i];
            emitted += 1;
            output.push(Step::Vertex(vertex));

            // The edge payload becomes runnable as soon as its source is
            // ready, so it is emitted right behind the vertex.
            for (_, to, edge) in self.edges.edges(vertex) {
                output.push(Step::Edge(edge.clone()));

                let j = index[&to];
                in_degree[j] -= 1;
                if in_degree[j] == 0 {
                    ready.push_back(j);
                }
            }
        }

        match vertices.len() - emitted {
            0 => Ok(output),
            remaining => Err(Cycle { remaining }),
        }
    }
}
