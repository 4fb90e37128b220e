//! Deterministic pseudo-random input generation.

/// Fills a tensor with values drawn uniformly from [0, 1).
///
/// Uses a 64-bit LCG so benchmark inputs are reproducible per seed without
/// pulling in a random-number crate. The top 24 bits of each state feed the
/// f32 mantissa, which keeps the distribution uniform over [0, 1).
pub fn uniform_random_tensor(len: usize, seed: u64) -> Vec<f32> {
    let mut state = seed;
    let mut data = Vec::with_capacity(len);
    for _ in 0..len {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        data.push(((state >> 40) as f32) / ((1u64 << 24) as f32));
    }
    data
}
