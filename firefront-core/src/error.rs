//! Error types for the firefront core library.
//!
//! Defines the engine-level and simulation-level error enums exposed by the
//! public API, their stable machine-readable codes, and a result alias.

use thiserror::Error;

use crate::graph::VertexId;

/// Errors raised by the in-memory graph engine primitives.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphError {
    /// An edge referenced a vertex id that is not present in the graph.
    #[error("edge ({source_vertex} -> {target_vertex}) references missing vertex {missing}")]
    DanglingEdge {
        /// Source endpoint of the offending edge.
        source_vertex: VertexId,
        /// Target endpoint of the offending edge.
        target_vertex: VertexId,
        /// The endpoint that has no vertex entry.
        missing: VertexId,
    },
    /// A primitive was asked to resolve a vertex id with no attribute entry.
    #[error("vertex {vertex} is not present in the graph")]
    UnknownVertex {
        /// The vertex id that could not be resolved.
        vertex: VertexId,
    },
}

impl GraphError {
    /// Returns a stable, machine-readable error code for the variant.
    #[must_use]
    pub const fn code(&self) -> GraphErrorCode {
        match self {
            Self::DanglingEdge { .. } => GraphErrorCode::DanglingEdge,
            Self::UnknownVertex { .. } => GraphErrorCode::UnknownVertex,
        }
    }
}

/// Machine-readable error codes for [`GraphError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GraphErrorCode {
    /// An edge referenced a vertex id that is not present in the graph.
    DanglingEdge,
    /// A primitive was asked to resolve a vertex id with no attribute entry.
    UnknownVertex,
}

impl GraphErrorCode {
    /// Returns the symbolic identifier for logging surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DanglingEdge => "DANGLING_EDGE",
            Self::UnknownVertex => "UNKNOWN_VERTEX",
        }
    }
}

/// Error type produced when configuring or running the forest-fire
/// simulation.
///
/// Parameter violations are surfaced before any engine work begins; engine
/// failures abort the run with no partially evolved graph.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ForestFireError {
    /// A burn-probability ratio fell outside the half-open interval (0, 1].
    #[error("{parameter} must lie in (0, 1] (got {got})")]
    InvalidRatio {
        /// Name of the offending configuration parameter.
        parameter: &'static str,
        /// The rejected value supplied by the caller.
        got: f64,
    },
    /// The configured maximum vertex id is below an id already in the graph.
    #[error("max_vertex_id {configured} is below the highest existing vertex id {highest}")]
    MaxVertexIdTooLow {
        /// The maximum id supplied in the configuration.
        configured: VertexId,
        /// The highest vertex id actually present in the input graph.
        highest: VertexId,
    },
    /// New vertices were requested but the graph has no vertex to attach to.
    #[error("cannot seed {requested} new vertices into a graph with no vertices")]
    EmptyGraph {
        /// Number of new vertices the configuration asked for.
        requested: u64,
    },
    /// The vertex sampler yielded no ambassador for a new source.
    #[error("vertex sampler yielded no ambassador for new vertex {vertex}")]
    NoAmbassador {
        /// The new source that could not be attached.
        vertex: VertexId,
    },
    /// The graph engine failed during a simulation round.
    ///
    /// The underlying failure is propagated unmodified; the wrapper only adds
    /// simulation context for diagnosis. Retry policy belongs to the caller.
    #[error("forest-fire {stage} failed in round {round}: {source}")]
    Engine {
        /// The simulation stage that was executing when the engine failed.
        stage: &'static str,
        /// Zero-based round index at the time of the failure.
        round: u32,
        /// Underlying engine error.
        #[source]
        source: GraphError,
    },
}

impl ForestFireError {
    /// Returns a stable, machine-readable error code for the variant.
    #[must_use]
    pub const fn code(&self) -> ForestFireErrorCode {
        match self {
            Self::InvalidRatio { .. } => ForestFireErrorCode::InvalidRatio,
            Self::MaxVertexIdTooLow { .. } => ForestFireErrorCode::MaxVertexIdTooLow,
            Self::EmptyGraph { .. } => ForestFireErrorCode::EmptyGraph,
            Self::NoAmbassador { .. } => ForestFireErrorCode::NoAmbassador,
            Self::Engine { .. } => ForestFireErrorCode::EngineFailure,
        }
    }

    /// Retrieve the inner [`GraphErrorCode`] when the error originated in the
    /// graph engine.
    #[must_use]
    pub const fn engine_code(&self) -> Option<GraphErrorCode> {
        match self {
            Self::Engine { source, .. } => Some(source.code()),
            _ => None,
        }
    }
}

/// Machine-readable error codes for [`ForestFireError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ForestFireErrorCode {
    /// A burn-probability ratio fell outside (0, 1].
    InvalidRatio,
    /// The configured maximum vertex id is below an existing id.
    MaxVertexIdTooLow,
    /// New vertices were requested on a vertexless graph.
    EmptyGraph,
    /// The vertex sampler yielded no ambassador for a new source.
    NoAmbassador,
    /// The graph engine failed during a simulation round.
    EngineFailure,
}

impl ForestFireErrorCode {
    /// Returns the symbolic identifier for logging surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRatio => "FOREST_FIRE_INVALID_RATIO",
            Self::MaxVertexIdTooLow => "FOREST_FIRE_MAX_VERTEX_ID_TOO_LOW",
            Self::EmptyGraph => "FOREST_FIRE_EMPTY_GRAPH",
            Self::NoAmbassador => "FOREST_FIRE_NO_AMBASSADOR",
            Self::EngineFailure => "FOREST_FIRE_ENGINE_FAILURE",
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, ForestFireError>;
