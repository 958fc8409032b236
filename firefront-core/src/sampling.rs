//! Seeded sampling primitives for the burn process.
//!
//! Every per-round draw in the simulation is keyed by a deterministic seed
//! derived from the `(round, vertex, source)` triple, so identical inputs
//! always reproduce identical outputs regardless of parallel execution
//! order. This is what makes benchmark runs reproducible: the only
//! uncontrolled randomness left in the simulator is the ambassador
//! assignment, which callers inject explicitly via
//! [`crate::VertexSampler`].

use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};

use crate::graph::VertexId;

// Cheap decorrelation hash over the (round, vertex, source) triple. Any
// mixing function works as long as identical triples map to identical seeds
// and distinct triples are statistically independent.
const ROUND_PRIME: u64 = 31;
const VERTEX_PRIME: u64 = 1_299_709;
const SOURCE_PRIME: u64 = 15_485_863;

/// Derives the deterministic seed for all draws a `(vertex, source)` pair
/// performs within `round`.
///
/// # Examples
/// ```
/// use firefront_core::burn_seed;
///
/// assert_eq!(burn_seed(0, 2, 5), burn_seed(0, 2, 5));
/// assert_ne!(burn_seed(0, 2, 5), burn_seed(1, 2, 5));
/// ```
#[must_use]
pub const fn burn_seed(round: u32, vertex: VertexId, source: VertexId) -> u64 {
    let round_term = (round as u64 + 1).wrapping_mul(ROUND_PRIME);
    let vertex_term = vertex.wrapping_mul(VERTEX_PRIME).wrapping_add(1);
    let source_term = source.wrapping_mul(SOURCE_PRIME).wrapping_add(1);
    round_term
        .wrapping_mul(vertex_term)
        .wrapping_mul(source_term)
}

/// Draws a geometric burn count: `floor(ln U / ln(1 - ratio))` with `U`
/// uniform on (0, 1) from a generator seeded with `seed`.
///
/// `ratio = 1.0` is the degenerate distribution: the draw is the constant 0
/// and the generator is never consulted, sidestepping the zero denominator
/// in the logarithmic formula. Callers are expected to validate
/// `ratio ∈ (0, 1]` up front.
///
/// # Examples
/// ```
/// use firefront_core::geometric_draw;
///
/// assert_eq!(geometric_draw(0.5, 42), geometric_draw(0.5, 42));
/// assert_eq!(geometric_draw(1.0, 42), 0);
/// ```
#[must_use]
pub fn geometric_draw(ratio: f64, seed: u64) -> u64 {
    if ratio >= 1.0 {
        return 0;
    }
    let mut rng = SmallRng::seed_from_u64(seed);
    let raw: f64 = rng.gen_range(0.0..1.0);
    // Keep U strictly positive so ln(U) stays finite.
    let uniform = raw.max(f64::EPSILON);
    let draws = (uniform.ln() / (1.0 - ratio).ln()).floor();
    // Float-to-int casts saturate, which is the behaviour we want for the
    // (pathological) near-1 ratios that overflow u64.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "draws is non-negative and the cast saturates at u64::MAX"
    )]
    let count = draws as u64;
    count
}

/// Selects `min(count, candidates.len())` vertices without replacement.
///
/// The candidates are sorted before a deterministic permutation seeded with
/// `seed` is applied, so the outcome depends only on candidate membership
/// and the seed, never on caller-side ordering or parallel collection
/// order. The result order carries no meaning beyond membership.
///
/// # Examples
/// ```
/// use firefront_core::select_without_replacement;
///
/// let picked = select_without_replacement(5, &[10, 11], 7);
/// assert_eq!(picked.len(), 2);
/// assert!(select_without_replacement(0, &[10, 11], 7).is_empty());
/// ```
#[must_use]
pub fn select_without_replacement(
    count: u64,
    candidates: &[VertexId],
    seed: u64,
) -> Vec<VertexId> {
    let take = usize::try_from(count)
        .unwrap_or(usize::MAX)
        .min(candidates.len());
    if take == 0 {
        return Vec::new();
    }
    let mut pool: Vec<VertexId> = candidates.to_vec();
    pool.sort_unstable();
    let mut rng = SmallRng::seed_from_u64(seed);
    pool.shuffle(&mut rng);
    pool.truncate(take);
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;
    use std::collections::BTreeSet;

    #[test]
    fn burn_seed_is_stable_and_decorrelated() {
        let base = burn_seed(3, 17, 99);
        assert_eq!(base, burn_seed(3, 17, 99));

        let variants: BTreeSet<u64> = [
            burn_seed(3, 17, 99),
            burn_seed(4, 17, 99),
            burn_seed(3, 18, 99),
            burn_seed(3, 17, 100),
        ]
        .into_iter()
        .collect();
        assert_eq!(variants.len(), 4, "neighbouring triples must not collide");
    }

    #[rstest]
    #[case(0.1)]
    #[case(0.5)]
    #[case(0.99)]
    fn geometric_draw_is_deterministic(#[case] ratio: f64) {
        for seed in [0_u64, 1, 42, u64::MAX] {
            assert_eq!(geometric_draw(ratio, seed), geometric_draw(ratio, seed));
        }
    }

    #[test]
    fn geometric_draw_degenerate_ratio_is_zero() {
        for seed in [0_u64, 7, 1234] {
            assert_eq!(geometric_draw(1.0, seed), 0);
        }
    }

    #[test]
    fn selection_caps_at_candidate_count() {
        let candidates = [5_u64, 9, 12];
        let picked = select_without_replacement(10, &candidates, 3);
        assert_eq!(picked.len(), candidates.len());
        let members: BTreeSet<VertexId> = picked.into_iter().collect();
        assert_eq!(members, candidates.iter().copied().collect());
    }

    #[test]
    fn selection_is_order_independent() {
        let forwards = select_without_replacement(2, &[4, 8, 15, 16], 99);
        let backwards = select_without_replacement(2, &[16, 15, 8, 4], 99);
        assert_eq!(forwards, backwards);
    }

    #[test]
    fn selection_zero_draws_is_empty() {
        assert!(select_without_replacement(0, &[1, 2, 3], 11).is_empty());
    }
}
