//! `random(seed)`: one deterministic float in `[0, 1)` per seed.
//!
//! The generator is a single SplitMix64 step over the seed's 64 bits. Integer
//! seeds use their two's-complement bits; float seeds use their IEEE-754
//! bits, so `1` and `1.0` are different seeds and no two distinct floats
//! collapse onto the same one. The output depends on nothing but the seed.

use cardex_values::{invalid_argument, EvalResult, Value};

/// One SplitMix64 output for `state`.
pub fn splitmix64(state: u64) -> u64 {
    let mut z = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Top 53 bits as a float in `[0, 1)`.
#[allow(
    clippy::cast_precision_loss,
    reason = "a 53-bit integer is exact in f64"
)]
fn unit_interval(bits: u64) -> f64 {
    const SCALE: f64 = 1.0 / 9_007_199_254_740_992.0; // 2^-53
    (bits >> 11) as f64 * SCALE
}

pub(super) fn random(seed: &Value) -> EvalResult {
    let bits = match seed {
        Value::Int(n) => u64::from_ne_bytes(n.to_ne_bytes()),
        Value::Float(f) => f.to_bits(),
        other => return Err(invalid_argument("random", 1, other)),
    };
    Ok(Value::Float(unit_interval(splitmix64(bits))))
}
