//! # Game Mathematics
//!
//! Small helpers for depth scaling and stat jitter.

use rand::rngs::StdRng;
use rand::Rng;

/// Rolls `0..bound`, or 0 when the bound is not positive.
///
/// Depth-scaled tables often produce a zero bound on shallow floors, which a
/// plain `gen_range` would reject.
pub fn jitter(rng: &mut StdRng, bound: i32) -> i32 {
    if bound <= 0 {
        0
    } else {
        rng.gen_range(0..bound)
    }
}

/// Maps a depth onto a catalog index, clamped to the catalog length.
///
/// Depth 1 is index 0 and anything past the end sticks to the last entry.
pub fn depth_index(depth: u32, catalog_len: usize) -> usize {
    (depth.saturating_sub(1) as usize).min(catalog_len.saturating_sub(1))
}
