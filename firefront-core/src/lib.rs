//! Firefront core library.
//!
//! A synthetic graph-growth simulator: given an existing graph, it attaches
//! new vertices and propagates new edges through a seeded "forest fire"
//! diffusion process, producing a larger graph whose structure statistically
//! resembles organically grown networks.
//!
//! # Determinism
//!
//! Every draw a `(vertex, source)` pair performs within a round is keyed by
//! [`burn_seed`], a deterministic mix of the `(round, vertex, source)`
//! triple, so results are independent of parallel execution order. The only
//! uncontrolled randomness is the ambassador assignment, injected through
//! the [`VertexSampler`] seam.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod engine;
mod error;
mod graph;
mod output;
mod sampler;
mod sampling;

pub use crate::{
    builder::{BackwardDraw, EdgeMode, ForestFireBuilder},
    engine::ForestFire,
    error::{ForestFireError, ForestFireErrorCode, GraphError, GraphErrorCode, Result},
    graph::{Edge, EdgeDirection, EdgeTriplet, PropertyGraph, VertexId, aggregate_by_vertex},
    output::{adjacency_records, write_adjacency},
    sampler::{FixedVertexSampler, UniformVertexSampler, VertexSampler},
    sampling::{burn_seed, geometric_draw, select_without_replacement},
};
