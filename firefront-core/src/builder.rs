//! Builder utilities for configuring the forest-fire simulation.
//!
//! Exposes the edge-mode and backward-draw selection surface and the builder
//! validation performed before constructing [`ForestFire`] instances. All
//! parameter violations are surfaced here, before any engine work begins.

use crate::{engine::ForestFire, error::ForestFireError, graph::VertexId};

/// Controls how grown edges are materialized in the evolved graph.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EdgeMode {
    /// Emit each grown edge `(source, vertex)` once.
    Directed,
    /// Emit both orientations of each grown edge.
    Undirected,
}

/// Selects which ratio parameterizes the backward-burn geometric draw.
///
/// The reference simulator reuses the forward ratio for the backward draw.
/// Whether that asymmetry is intentional is undecided upstream, so the
/// choice is an explicit configuration decision here: `ForwardRatio`
/// replicates the reference behaviour and is the default, `BackwardRatio`
/// uses the dedicated backward parameter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BackwardDraw {
    /// Parameterize backward draws with the forward ratio.
    ForwardRatio,
    /// Parameterize backward draws with the backward ratio.
    BackwardRatio,
}

/// Configures and constructs [`ForestFire`] instances.
///
/// # Examples
/// ```
/// use firefront_core::{EdgeMode, ForestFireBuilder};
///
/// let fire = ForestFireBuilder::new()
///     .with_forward_ratio(0.3)
///     .with_backward_ratio(0.2)
///     .with_new_vertices(10)
///     .with_max_iterations(4)
///     .with_edge_mode(EdgeMode::Undirected)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(fire.new_vertices(), 10);
/// ```
#[derive(Clone, Debug)]
pub struct ForestFireBuilder {
    forward_ratio: f64,
    backward_ratio: f64,
    new_vertices: u64,
    max_vertex_id: Option<VertexId>,
    max_iterations: u32,
    edge_mode: EdgeMode,
    backward_draw: BackwardDraw,
}

impl Default for ForestFireBuilder {
    fn default() -> Self {
        Self {
            forward_ratio: 0.5,
            backward_ratio: 0.5,
            new_vertices: 0,
            max_vertex_id: None,
            max_iterations: 0,
            edge_mode: EdgeMode::Directed,
            backward_draw: BackwardDraw::ForwardRatio,
        }
    }
}

impl ForestFireBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// The defaults are inert: zero new vertices and zero iterations leave
    /// the input graph unchanged.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the forward burn-probability ratio (`pRatio`).
    #[must_use]
    pub fn with_forward_ratio(mut self, ratio: f64) -> Self {
        self.forward_ratio = ratio;
        self
    }

    /// Sets the backward burn-probability ratio (`rRatio`).
    #[must_use]
    pub fn with_backward_ratio(mut self, ratio: f64) -> Self {
        self.backward_ratio = ratio;
        self
    }

    /// Sets the number of new vertices to attach to the graph.
    #[must_use]
    pub fn with_new_vertices(mut self, count: u64) -> Self {
        self.new_vertices = count;
        self
    }

    /// Overrides the largest existing vertex id; new ids are allocated above
    /// it. When unset, the highest id present in the input graph is used.
    #[must_use]
    pub fn with_max_vertex_id(mut self, max_vertex_id: VertexId) -> Self {
        self.max_vertex_id = Some(max_vertex_id);
        self
    }

    /// Caps the number of propagation rounds.
    #[must_use]
    pub fn with_max_iterations(mut self, rounds: u32) -> Self {
        self.max_iterations = rounds;
        self
    }

    /// Selects directed or undirected edge materialization.
    #[must_use]
    pub fn with_edge_mode(mut self, mode: EdgeMode) -> Self {
        self.edge_mode = mode;
        self
    }

    /// Selects the ratio parameterizing the backward-burn draw.
    #[must_use]
    pub fn with_backward_draw(mut self, draw: BackwardDraw) -> Self {
        self.backward_draw = draw;
        self
    }

    /// Validates the configuration and constructs a [`ForestFire`] instance.
    ///
    /// # Errors
    /// Returns [`ForestFireError::InvalidRatio`] when either ratio is not a
    /// finite value in (0, 1].
    ///
    /// # Examples
    /// ```
    /// use firefront_core::ForestFireBuilder;
    ///
    /// let err = ForestFireBuilder::new()
    ///     .with_forward_ratio(0.0)
    ///     .build()
    ///     .expect_err("zero ratio must be rejected");
    /// assert_eq!(err.code().as_str(), "FOREST_FIRE_INVALID_RATIO");
    /// ```
    pub fn build(self) -> Result<ForestFire, ForestFireError> {
        validate_ratio("forward_ratio", self.forward_ratio)?;
        validate_ratio("backward_ratio", self.backward_ratio)?;
        Ok(ForestFire::new(
            self.forward_ratio,
            self.backward_ratio,
            self.new_vertices,
            self.max_vertex_id,
            self.max_iterations,
            self.edge_mode,
            self.backward_draw,
        ))
    }
}

fn validate_ratio(parameter: &'static str, got: f64) -> Result<(), ForestFireError> {
    if got.is_finite() && got > 0.0 && got <= 1.0 {
        Ok(())
    } else {
        Err(ForestFireError::InvalidRatio { parameter, got })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::zero(0.0)]
    #[case::negative(-0.25)]
    #[case::above_one(1.5)]
    #[case::nan(f64::NAN)]
    #[case::infinite(f64::INFINITY)]
    fn build_rejects_out_of_range_ratios(#[case] ratio: f64) {
        let err = ForestFireBuilder::new()
            .with_forward_ratio(ratio)
            .build()
            .expect_err("ratio outside (0, 1] must be rejected");
        assert!(matches!(
            err,
            ForestFireError::InvalidRatio {
                parameter: "forward_ratio",
                ..
            }
        ));

        let err = ForestFireBuilder::new()
            .with_backward_ratio(ratio)
            .build()
            .expect_err("ratio outside (0, 1] must be rejected");
        assert!(matches!(
            err,
            ForestFireError::InvalidRatio {
                parameter: "backward_ratio",
                ..
            }
        ));
    }

    #[test]
    fn build_accepts_boundary_ratio() {
        let fire = ForestFireBuilder::new()
            .with_forward_ratio(1.0)
            .with_backward_ratio(1.0)
            .build()
            .expect("ratio of exactly 1.0 is the degenerate distribution, not an error");
        assert_eq!(fire.forward_ratio(), 1.0);
    }
}
