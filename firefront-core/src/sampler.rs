//! Ambassador randomness as an explicit, injectable seam.
//!
//! Ambassador assignment and new-id placement are the one part of the
//! simulation not covered by the per-round seeding scheme: they sit on the
//! host side of the determinism boundary. Callers therefore supply the
//! sampler, which lets benchmark harnesses seed it and lets tests pin the
//! assignment outright.

use std::collections::VecDeque;

use rand::{SeedableRng, rngs::SmallRng, seq::SliceRandom};

use crate::graph::VertexId;

/// Uniformly samples a pre-existing vertex for each new source to attach to.
pub trait VertexSampler {
    /// Draws one vertex from `vertices`, or `None` when the slice is empty.
    ///
    /// `vertices` is always presented in ascending id order, so a seeded
    /// implementation yields the same ambassadors on every run.
    fn sample_vertex(&mut self, vertices: &[VertexId]) -> Option<VertexId>;
}

/// A [`VertexSampler`] drawing uniformly from a seeded generator.
///
/// # Examples
/// ```
/// use firefront_core::{UniformVertexSampler, VertexSampler};
///
/// let mut first = UniformVertexSampler::from_seed(7);
/// let mut second = UniformVertexSampler::from_seed(7);
/// let vertices = [1, 2, 3, 4];
/// assert_eq!(first.sample_vertex(&vertices), second.sample_vertex(&vertices));
/// ```
#[derive(Clone, Debug)]
pub struct UniformVertexSampler {
    rng: SmallRng,
}

impl UniformVertexSampler {
    /// Creates a sampler whose draws are reproducible from `seed`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl VertexSampler for UniformVertexSampler {
    fn sample_vertex(&mut self, vertices: &[VertexId]) -> Option<VertexId> {
        vertices.choose(&mut self.rng).copied()
    }
}

/// A [`VertexSampler`] replaying a scripted ambassador sequence.
///
/// Intended for tests and reproducibility studies where the ambassador of
/// each new source must be pinned exactly.
///
/// # Examples
/// ```
/// use firefront_core::{FixedVertexSampler, VertexSampler};
///
/// let mut sampler = FixedVertexSampler::new([2, 4]);
/// assert_eq!(sampler.sample_vertex(&[1, 2, 3, 4]), Some(2));
/// assert_eq!(sampler.sample_vertex(&[1, 2, 3, 4]), Some(4));
/// assert_eq!(sampler.sample_vertex(&[1, 2, 3, 4]), None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct FixedVertexSampler {
    assignments: VecDeque<VertexId>,
}

impl FixedVertexSampler {
    /// Creates a sampler that yields `assignments` in order, then `None`.
    #[must_use]
    pub fn new(assignments: impl IntoIterator<Item = VertexId>) -> Self {
        Self {
            assignments: assignments.into_iter().collect(),
        }
    }
}

impl VertexSampler for FixedVertexSampler {
    fn sample_vertex(&mut self, _vertices: &[VertexId]) -> Option<VertexId> {
        self.assignments.pop_front()
    }
}
