//! Vanilla slime chunk classification.
//!
//! Algorithm reference: https://minecraft.fandom.com/wiki/Slime

use crate::rng::JavaRandom;

/// Derive the per-chunk RNG seed from the world seed and chunk coordinates.
///
/// Vanilla evaluates the polynomial terms in 32-bit `int` arithmetic and
/// widens to `long` afterwards, except the z² term, which is promoted to
/// 64 bits by its `long` constant. The final XOR applies to the whole
/// running sum (`^` binds below `+` in the source language). Both the
/// 32-bit overflow and the operator grouping are load-bearing; regrouping
/// the expression selects different chunks.
pub fn chunk_seed(world_seed: i64, x: i32, z: i32) -> i64 {
    let term_x_sq = i64::from(x.wrapping_mul(x).wrapping_mul(0x4c1906));
    let term_x = i64::from(x.wrapping_mul(0x5ac0db));
    let term_z_sq = i64::from(z.wrapping_mul(z)).wrapping_mul(0x4307a7);
    let term_z = i64::from(z.wrapping_mul(0x5f24f));
    world_seed
        .wrapping_add(term_x_sq)
        .wrapping_add(term_x)
        .wrapping_add(term_z_sq)
        .wrapping_add(term_z)
        ^ 0x3ad8025f
}

/// True if the chunk at `(x, z)` spawns slimes for the given world seed.
///
/// One in ten chunks match in expectation. Each call seeds a fresh
/// [`JavaRandom`] and drops it before returning; no generator state crosses
/// chunks.
pub fn is_slime_chunk(world_seed: i64, x: i32, z: i32) -> bool {
    let mut rng = JavaRandom::new(chunk_seed(world_seed, x, z));
    rng.next_int(10) == 0
}
