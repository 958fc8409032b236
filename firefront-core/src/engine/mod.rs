//! Forest-fire graph-evolution engine.
//!
//! Grows a graph by attaching new vertices and letting each one "burn"
//! outward from a uniformly chosen ambassador. Each round is one
//! bulk-synchronous barrier over the graph primitives:
//!
//! - a forward pass groups still-unreached neighbours by `(vertex, source)`
//!   along out-edges of the burning frontier,
//! - a backward pass does the same along reversed edges,
//! - one geometric draw per `(vertex, source)` pair decides how many of the
//!   eligible neighbours catch fire, selected without replacement,
//! - a join folds the newly burned sources into the per-vertex reached-sets
//!   and installs them as the next frontier.
//!
//! The loop stops after `max_iterations` rounds or as soon as the frontier
//! empties. Finalization materializes one edge per `(source, reached
//! vertex)` pair, unions it with the original edge set, and discards the
//! burn state. Every draw is keyed by the `(round, vertex, source)` triple,
//! so two runs with the same ambassador assignment produce identical
//! graphs.


use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, instrument};

use crate::{
    builder::{BackwardDraw, EdgeMode},
    error::{ForestFireError, Result},
    graph::{Edge, EdgeDirection, PropertyGraph, VertexId, aggregate_by_vertex},
    sampler::VertexSampler,
    sampling::{burn_seed, geometric_draw, select_without_replacement},
};

type SourceSet = BTreeSet<VertexId>;

/// Per-vertex simulation state: the sources that have ever reached the
/// vertex and the ones newly active there this round. Created when sources
/// are seeded, mutated only by round-local union merges, and discarded once
/// the final edge set is materialized.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct BurnState {
    reached: SourceSet,
    burning: SourceSet,
}

/// Entry point for running the forest-fire simulation.
///
/// Constructed through [`crate::ForestFireBuilder`], which validates the
/// burn-probability ratios up front.
///
/// # Examples
/// ```
/// use firefront_core::{FixedVertexSampler, ForestFireBuilder, PropertyGraph};
///
/// let graph = PropertyGraph::from_edge_list(&[(1, 2), (2, 3)]);
/// let fire = ForestFireBuilder::new()
///     .with_new_vertices(1)
///     .with_max_iterations(2)
///     .build()
///     .expect("configuration is valid");
/// let mut sampler = FixedVertexSampler::new([2]);
/// let evolved = fire.evolve(graph, &mut sampler).expect("simulation runs");
/// // The new vertex 4 attached to its ambassador 2.
/// assert!(evolved.out_neighbors(4).contains(&2));
/// ```
#[derive(Clone, Debug)]
pub struct ForestFire {
    forward_ratio: f64,
    backward_ratio: f64,
    new_vertices: u64,
    max_vertex_id: Option<VertexId>,
    max_iterations: u32,
    edge_mode: EdgeMode,
    backward_draw: BackwardDraw,
}

impl ForestFire {
    pub(crate) const fn new(
        forward_ratio: f64,
        backward_ratio: f64,
        new_vertices: u64,
        max_vertex_id: Option<VertexId>,
        max_iterations: u32,
        edge_mode: EdgeMode,
        backward_draw: BackwardDraw,
    ) -> Self {
        Self {
            forward_ratio,
            backward_ratio,
            new_vertices,
            max_vertex_id,
            max_iterations,
            edge_mode,
            backward_draw,
        }
    }

    /// Returns the forward burn-probability ratio.
    #[must_use]
    #[rustfmt::skip]
    pub const fn forward_ratio(&self) -> f64 { self.forward_ratio }

    /// Returns the backward burn-probability ratio.
    #[must_use]
    #[rustfmt::skip]
    pub const fn backward_ratio(&self) -> f64 { self.backward_ratio }

    /// Returns the number of new vertices the simulation will attach.
    #[must_use]
    #[rustfmt::skip]
    pub const fn new_vertices(&self) -> u64 { self.new_vertices }

    /// Returns the round cap.
    #[must_use]
    #[rustfmt::skip]
    pub const fn max_iterations(&self) -> u32 { self.max_iterations }

    /// Returns the configured edge materialization mode.
    #[must_use]
    #[rustfmt::skip]
    pub const fn edge_mode(&self) -> EdgeMode { self.edge_mode }

    /// Returns which ratio parameterizes the backward draw.
    #[must_use]
    #[rustfmt::skip]
    pub const fn backward_draw(&self) -> BackwardDraw { self.backward_draw }

    /// Runs the simulation against `graph`, attaching `new_vertices` fresh
    /// sources and propagating them for at most `max_iterations` rounds.
    ///
    /// `sampler` supplies the ambassador for each new source; it is the
    /// explicit non-determinism boundary. Everything downstream of the
    /// assignment is deterministic in the `(round, vertex, source)` seeding
    /// scheme.
    ///
    /// # Errors
    /// Returns [`ForestFireError::MaxVertexIdTooLow`] when the configured
    /// maximum id is below an id already present,
    /// [`ForestFireError::EmptyGraph`] /
    /// [`ForestFireError::NoAmbassador`] when seeding cannot place a new
    /// source, and [`ForestFireError::Engine`] when a graph primitive fails
    /// mid-round. On any failure no partially evolved graph is returned.
    #[instrument(
        name = "core.evolve",
        err,
        skip(self, graph, sampler),
        fields(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            new_vertices = self.new_vertices,
            max_iterations = self.max_iterations,
        ),
    )]
    pub fn evolve<S: VertexSampler>(
        &self,
        graph: PropertyGraph<bool>,
        sampler: &mut S,
    ) -> Result<PropertyGraph<bool>> {
        let highest = graph.max_vertex_id();
        let base_id = match (self.max_vertex_id, highest) {
            (Some(configured), Some(present)) if configured < present => {
                return Err(ForestFireError::MaxVertexIdTooLow {
                    configured,
                    highest: present,
                });
            }
            (Some(configured), _) => configured,
            (None, present) => present.unwrap_or(0),
        };

        if self.new_vertices == 0 {
            // No sources exist to propagate; the evolved graph is the input
            // unchanged.
            info!(rounds = 0_u32, grown_edges = 0_usize, "evolution completed");
            return Ok(graph);
        }
        if graph.vertex_count() == 0 {
            return Err(ForestFireError::EmptyGraph {
                requested: self.new_vertices,
            });
        }

        let original_vertices = graph.vertex_ids();
        let original_edge_count = graph.edge_count();
        let new_ids: Vec<VertexId> = (1..=self.new_vertices)
            .map(|offset| base_id.wrapping_add(offset))
            .collect();
        let seeds = assign_ambassadors(sampler, &original_vertices, &new_ids)?;

        let mut snapshot = seed_sources(graph, &seeds);
        let mut round: u32 = 0;
        while round < self.max_iterations {
            let frontier = burning_frontier(&snapshot);
            if frontier.is_empty() {
                break;
            }
            snapshot = self.burn_round(round, snapshot, &frontier)?;
            round += 1;
        }

        let evolved = self.finalize(snapshot, &original_vertices, &new_ids, round)?;
        info!(
            rounds = round,
            grown_edges = evolved.edge_count() - original_edge_count,
            "evolution completed"
        );
        Ok(evolved)
    }

    /// Executes one bulk-synchronous round: forward burn, backward burn,
    /// then the merge join that installs the next frontier.
    ///
    /// Both passes read the round-start snapshot: a vertex burned by the
    /// forward pass is still an eligible backward candidate in the same
    /// round, and the merge installs `burning(next) = out ∪ in` with
    /// `reached(next) = reached(this) ∪ burning(next)` in a single join.
    /// Sequencing the passes instead (folding the forward burns into the
    /// reached-sets before the backward pass runs) would shrink the backward
    /// eligible sets on cyclic graphs and shift the seeded permutation
    /// prefixes, so the two orderings differ bit-for-bit; the simultaneous
    /// reading is the one round-level merge formula this engine commits to.
    #[instrument(
        name = "core.round",
        err,
        skip(self, snapshot, frontier),
        fields(round = round, frontier = frontier.len()),
    )]
    fn burn_round(
        &self,
        round: u32,
        snapshot: PropertyGraph<BurnState>,
        frontier: &BTreeSet<VertexId>,
    ) -> Result<PropertyGraph<BurnState>> {
        let forward = self.spread(round, &snapshot, frontier, EdgeDirection::Out)?;
        let backward = self.spread(round, &snapshot, frontier, EdgeDirection::In)?;

        let mut next_burning = forward;
        for (vertex, sources) in backward {
            next_burning.entry(vertex).or_default().extend(sources);
        }
        debug!(
            round,
            vertices_burned = next_burning.len(),
            "forward and backward burns merged"
        );

        // The join materializes the next snapshot in full; only then does
        // the previous round's snapshot go out of scope.
        let next = snapshot.join_vertices(&next_burning, |_, state, update| match update {
            Some(sources) => {
                let mut reached = state.reached;
                reached.extend(sources.iter().copied());
                BurnState {
                    reached,
                    burning: sources.clone(),
                }
            }
            None => BurnState {
                reached: state.reached,
                burning: SourceSet::new(),
            },
        });
        Ok(next)
    }

    /// One burn pass along `direction`: collects eligible neighbours per
    /// `(vertex, source)` pair, draws the burn count, and aggregates the
    /// selected `(neighbour, source)` pairs into a per-vertex source set.
    fn spread(
        &self,
        round: u32,
        snapshot: &PropertyGraph<BurnState>,
        frontier: &BTreeSet<VertexId>,
        direction: EdgeDirection,
    ) -> Result<BTreeMap<VertexId, SourceSet>> {
        let stage = match direction {
            EdgeDirection::Out => "forward-burn",
            EdgeDirection::In => "backward-burn",
        };
        let ratio = self.spread_ratio(direction);

        let eligible = snapshot
            .map_reduce_triplets(
                direction,
                frontier,
                |triplet| {
                    let (burn_vertex, burn_attr, neighbor, neighbor_attr) = match direction {
                        EdgeDirection::Out => {
                            (triplet.source, triplet.source_attr, triplet.target, triplet.target_attr)
                        }
                        EdgeDirection::In => {
                            (triplet.target, triplet.target_attr, triplet.source, triplet.source_attr)
                        }
                    };
                    let mut by_source: BTreeMap<VertexId, SourceSet> = BTreeMap::new();
                    for &source in &burn_attr.burning {
                        // A source never re-burns a vertex it has already
                        // reached.
                        if !neighbor_attr.reached.contains(&source) {
                            by_source.entry(source).or_default().insert(neighbor);
                        }
                    }
                    if by_source.is_empty() {
                        Vec::new()
                    } else {
                        vec![(burn_vertex, by_source)]
                    }
                },
                merge_eligible,
            )
            .map_err(|source| ForestFireError::Engine {
                stage,
                round,
                source,
            })?;

        // One geometric draw and one prefix selection per (vertex, source)
        // pair, both keyed by the same deterministic seed.
        let mut burned: Vec<(VertexId, SourceSet)> = Vec::new();
        for (vertex, by_source) in &eligible {
            for (source, destinations) in by_source {
                let seed = burn_seed(round, *vertex, *source);
                let draws = geometric_draw(ratio, seed);
                let candidates: Vec<VertexId> = destinations.iter().copied().collect();
                for selected in select_without_replacement(draws, &candidates, seed) {
                    burned.push((selected, SourceSet::from([*source])));
                }
            }
        }
        Ok(aggregate_by_vertex(burned, union_sources))
    }

    const fn spread_ratio(&self, direction: EdgeDirection) -> f64 {
        match direction {
            EdgeDirection::Out => self.forward_ratio,
            EdgeDirection::In => match self.backward_draw {
                BackwardDraw::ForwardRatio => self.forward_ratio,
                BackwardDraw::BackwardRatio => self.backward_ratio,
            },
        }
    }

    /// Materializes the evolved graph: one edge per `(source, reached
    /// vertex)` pair unioned with the original edges, vertex attributes
    /// reset to the plain output marker.
    fn finalize(
        &self,
        snapshot: PropertyGraph<BurnState>,
        original_vertices: &[VertexId],
        new_ids: &[VertexId],
        rounds: u32,
    ) -> Result<PropertyGraph<bool>> {
        let mut edges = snapshot.edges().to_vec();
        for (vertex, state) in snapshot.iter() {
            for &source in &state.reached {
                edges.push(Edge::new(source, vertex));
                if self.edge_mode == EdgeMode::Undirected {
                    edges.push(Edge::new(vertex, source));
                }
            }
        }

        let mut vertices: BTreeMap<VertexId, bool> =
            original_vertices.iter().map(|&id| (id, true)).collect();
        vertices.extend(new_ids.iter().map(|&id| (id, true)));

        PropertyGraph::from_parts(vertices, edges).map_err(|source| ForestFireError::Engine {
            stage: "finalize",
            round: rounds,
            source,
        })
    }
}

/// Draws one ambassador per new source and groups the seeded source ids by
/// ambassador vertex.
fn assign_ambassadors<S: VertexSampler>(
    sampler: &mut S,
    existing: &[VertexId],
    new_ids: &[VertexId],
) -> Result<BTreeMap<VertexId, SourceSet>> {
    let mut seeds: BTreeMap<VertexId, SourceSet> = BTreeMap::new();
    for &source in new_ids {
        let ambassador = sampler
            .sample_vertex(existing)
            .ok_or(ForestFireError::NoAmbassador { vertex: source })?;
        seeds.entry(ambassador).or_default().insert(source);
        debug!(source, ambassador, "ambassador assigned");
    }
    Ok(seeds)
}

/// Replaces the placeholder marker attributes with burn state and seeds the
/// ambassadors' reached- and burning-sets with their source ids.
fn seed_sources(
    graph: PropertyGraph<bool>,
    seeds: &BTreeMap<VertexId, SourceSet>,
) -> PropertyGraph<BurnState> {
    graph
        .map_vertices(|_, _| BurnState::default())
        .join_vertices(seeds, |_, state, seeded| match seeded {
            Some(sources) => BurnState {
                reached: sources.clone(),
                burning: sources.clone(),
            },
            None => state,
        })
}

/// The union of all burning-sets, as the set of vertices with a non-empty
/// burning-set. An empty frontier means the fixed point is reached.
fn burning_frontier(snapshot: &PropertyGraph<BurnState>) -> BTreeSet<VertexId> {
    snapshot
        .iter()
        .filter(|(_, state)| !state.burning.is_empty())
        .map(|(vertex, _)| vertex)
        .collect()
}

fn merge_eligible(
    mut left: BTreeMap<VertexId, SourceSet>,
    right: BTreeMap<VertexId, SourceSet>,
) -> BTreeMap<VertexId, SourceSet> {
    for (source, destinations) in right {
        left.entry(source).or_default().extend(destinations);
    }
    left
}

fn union_sources(mut left: SourceSet, right: SourceSet) -> SourceSet {
    left.extend(right);
    left
}
