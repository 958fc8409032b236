//! In-memory directed property graph with bulk-synchronous primitives.
//!
//! This module stands in for the distributed graph engine the simulation is
//! written against. It exposes the same contract surface: an
//! attribute-merging join, a triplet-level map/reduce restricted to an
//! active vertex subset and a traversal direction, and a keyed aggregation.
//! The map and combine functions supplied by callers must be pure and, for
//! combines, associative and commutative — the passes run data-parallel via
//! rayon and make no guarantee about the order partial results meet in.
//!
//! Snapshot discipline: the mutating primitives consume the graph by value
//! and return a fresh snapshot. The next snapshot is fully materialized
//! before the previous one can be dropped, which is exactly the
//! materialize-before-release ordering a distributed engine would enforce
//! at its end-of-round barrier.

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;

use crate::error::GraphError;

/// Stable 64-bit vertex identifier.
pub type VertexId = u64;

/// A directed edge with the fixed unit weight used throughout the simulator.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Edge {
    source: VertexId,
    target: VertexId,
    weight: u32,
}

impl Edge {
    /// Creates a unit-weight edge from `source` to `target`.
    #[must_use]
    pub const fn new(source: VertexId, target: VertexId) -> Self {
        Self {
            source,
            target,
            weight: 1,
        }
    }

    /// Returns the source endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub const fn source(&self) -> VertexId { self.source }

    /// Returns the target endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub const fn target(&self) -> VertexId { self.target }

    /// Returns the edge weight (always 1 for grown graphs).
    #[must_use]
    #[rustfmt::skip]
    pub const fn weight(&self) -> u32 { self.weight }
}

/// Traversal direction for [`PropertyGraph::map_reduce_triplets`].
///
/// `Out` activates edges whose source is in the active set and is the
/// forward-burn orientation; `In` activates edges whose target is in the
/// active set and walks the reversed edges.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EdgeDirection {
    /// Follow edges from active sources towards their targets.
    Out,
    /// Follow edges backwards from active targets towards their sources.
    In,
}

/// An edge bundled with the attributes of both endpoints; the unit of
/// per-edge computation handed to map functions.
#[derive(Debug)]
pub struct EdgeTriplet<'graph, V> {
    /// Source vertex id.
    pub source: VertexId,
    /// Attribute of the source vertex.
    pub source_attr: &'graph V,
    /// Target vertex id.
    pub target: VertexId,
    /// Attribute of the target vertex.
    pub target_attr: &'graph V,
    /// Edge weight.
    pub weight: u32,
}

/// A directed property graph with unique vertex ids and an ordered edge
/// multiset.
///
/// # Examples
/// ```
/// use firefront_core::PropertyGraph;
///
/// let graph = PropertyGraph::from_edge_list(&[(1, 2), (2, 3)]);
/// assert_eq!(graph.vertex_count(), 3);
/// assert_eq!(graph.out_neighbors(2), vec![3]);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PropertyGraph<V> {
    vertices: BTreeMap<VertexId, V>,
    edges: Vec<Edge>,
}

impl PropertyGraph<bool> {
    /// Builds a marker graph from `(source, target)` pairs, deriving the
    /// vertex set from the edge endpoints.
    #[must_use]
    pub fn from_edge_list(pairs: &[(VertexId, VertexId)]) -> Self {
        let mut vertices = BTreeMap::new();
        let mut edges = Vec::with_capacity(pairs.len());
        for &(source, target) in pairs {
            vertices.insert(source, true);
            vertices.insert(target, true);
            edges.push(Edge::new(source, target));
        }
        Self { vertices, edges }
    }
}

impl<V> PropertyGraph<V> {
    /// Builds a graph from explicit vertex attributes and edges.
    ///
    /// # Errors
    /// Returns [`GraphError::DanglingEdge`] when an edge endpoint has no
    /// vertex entry.
    pub fn from_parts(
        vertices: BTreeMap<VertexId, V>,
        edges: Vec<Edge>,
    ) -> Result<Self, GraphError> {
        for edge in &edges {
            for endpoint in [edge.source, edge.target] {
                if !vertices.contains_key(&endpoint) {
                    return Err(GraphError::DanglingEdge {
                        source_vertex: edge.source,
                        target_vertex: edge.target,
                        missing: endpoint,
                    });
                }
            }
        }
        Ok(Self { vertices, edges })
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the vertex ids in ascending order.
    #[must_use]
    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.vertices.keys().copied().collect()
    }

    /// Returns the highest vertex id present, if any.
    #[must_use]
    pub fn max_vertex_id(&self) -> Option<VertexId> {
        self.vertices.keys().next_back().copied()
    }

    /// Looks up the attribute of `vertex`.
    #[must_use]
    pub fn vertex_attr(&self, vertex: VertexId) -> Option<&V> {
        self.vertices.get(&vertex)
    }

    /// Iterates over `(id, attribute)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, &V)> {
        self.vertices.iter().map(|(&id, attr)| (id, attr))
    }

    /// Returns the edge multiset in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the out-neighbors of `vertex` in edge-list order.
    #[must_use]
    pub fn out_neighbors(&self, vertex: VertexId) -> Vec<VertexId> {
        self.edges
            .iter()
            .filter(|edge| edge.source == vertex)
            .map(|edge| edge.target)
            .collect()
    }

    /// Rewrites every vertex attribute, producing the next snapshot.
    #[must_use]
    pub fn map_vertices<U, F>(self, map: F) -> PropertyGraph<U>
    where
        V: Send,
        U: Send,
        F: Fn(VertexId, V) -> U + Sync,
    {
        let vertices = self
            .vertices
            .into_par_iter()
            .map(|(id, attr)| (id, map(id, attr)))
            .collect();
        PropertyGraph {
            vertices,
            edges: self.edges,
        }
    }

    /// Merges per-vertex update values into the vertex attributes, producing
    /// the next snapshot.
    ///
    /// `merge` is total over `(id, old, Option<&update>)`: it runs for every
    /// vertex and receives `None` when no update targets that vertex.
    /// Updates keyed by ids absent from the graph are ignored.
    #[must_use]
    pub fn join_vertices<U, F>(self, updates: &BTreeMap<VertexId, U>, merge: F) -> Self
    where
        V: Send,
        U: Sync,
        F: Fn(VertexId, V, Option<&U>) -> V + Sync,
    {
        let vertices = self
            .vertices
            .into_par_iter()
            .map(|(id, attr)| (id, merge(id, attr, updates.get(&id))))
            .collect();
        Self {
            vertices,
            edges: self.edges,
        }
    }

    /// Runs a triplet-level map/reduce restricted to `active` vertices.
    ///
    /// Only edges whose `direction`-side endpoint is in `active` participate.
    /// `map` emits zero or more `(vertex, message)` pairs per triplet and
    /// must be pure; `combine` folds colliding messages and must be
    /// associative and commutative because partial results meet in an
    /// unspecified order.
    ///
    /// # Errors
    /// Returns [`GraphError::UnknownVertex`] when an edge endpoint cannot be
    /// resolved to an attribute (only possible for graphs assembled outside
    /// [`Self::from_parts`] validation).
    pub fn map_reduce_triplets<M, MapF, CombineF>(
        &self,
        direction: EdgeDirection,
        active: &BTreeSet<VertexId>,
        map: MapF,
        combine: CombineF,
    ) -> Result<BTreeMap<VertexId, M>, GraphError>
    where
        V: Sync,
        M: Send,
        MapF: Fn(&EdgeTriplet<'_, V>) -> Vec<(VertexId, M)> + Sync,
        CombineF: Fn(M, M) -> M + Sync,
    {
        let messages: Vec<Vec<(VertexId, M)>> = self
            .edges
            .par_iter()
            .filter(|edge| match direction {
                EdgeDirection::Out => active.contains(&edge.source),
                EdgeDirection::In => active.contains(&edge.target),
            })
            .map(|edge| {
                let source_attr =
                    self.vertices
                        .get(&edge.source)
                        .ok_or(GraphError::UnknownVertex {
                            vertex: edge.source,
                        })?;
                let target_attr =
                    self.vertices
                        .get(&edge.target)
                        .ok_or(GraphError::UnknownVertex {
                            vertex: edge.target,
                        })?;
                Ok(map(&EdgeTriplet {
                    source: edge.source,
                    source_attr,
                    target: edge.target,
                    target_attr,
                    weight: edge.weight,
                }))
            })
            .collect::<Result<_, GraphError>>()?;

        let pairs = messages.into_iter().flatten().collect();
        Ok(aggregate_by_vertex(pairs, combine))
    }
}

/// Folds `(vertex, message)` pairs into one message per vertex.
///
/// Repeated keys are collapsed with `combine`, which must be associative and
/// commutative: the reduction runs in parallel and the order in which
/// messages for the same vertex meet is unspecified.
///
/// # Examples
/// ```
/// use firefront_core::aggregate_by_vertex;
///
/// let merged = aggregate_by_vertex(vec![(7, 1_u32), (7, 2), (9, 5)], |a, b| a + b);
/// assert_eq!(merged.get(&7), Some(&3));
/// assert_eq!(merged.get(&9), Some(&5));
/// ```
#[must_use]
pub fn aggregate_by_vertex<M, C>(
    pairs: Vec<(VertexId, M)>,
    combine: C,
) -> BTreeMap<VertexId, M>
where
    M: Send,
    C: Fn(M, M) -> M + Sync,
{
    pairs
        .into_par_iter()
        .fold(BTreeMap::new, |mut acc, (vertex, message)| {
            insert_combined(&mut acc, vertex, message, &combine);
            acc
        })
        .reduce(BTreeMap::new, |mut left, right| {
            for (vertex, message) in right {
                insert_combined(&mut left, vertex, message, &combine);
            }
            left
        })
}

fn insert_combined<M, C>(
    accumulator: &mut BTreeMap<VertexId, M>,
    vertex: VertexId,
    message: M,
    combine: &C,
) where
    C: Fn(M, M) -> M,
{
    let merged = match accumulator.remove(&vertex) {
        Some(existing) => combine(existing, message),
        None => message,
    };
    accumulator.insert(vertex, merged);
}
