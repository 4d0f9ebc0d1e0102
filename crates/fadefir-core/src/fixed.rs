//! Saturating fixed-point primitives.
//!
//! The kernels accumulate in 64 bits and narrow at the very end; the panner
//! carries its gain in Q30. Everything here is integer-only.
//!
//! | Format | Unity | Used for |
//! |--------|-------|----------|
//! | Q30 (i32) | `1 << 30` | crossfade gain and gain step |
//! | Qn (coefficients) | `1 << n` | filter taps, `n` = config Q-factor |

/// Q-factor of the crossfade gain.
pub const GAIN_Q: u32 = 30;

/// Unity gain in Q30.
pub const UNITY_Q30: i32 = 1 << GAIN_Q;

/// Saturates a 64-bit value to `i16`.
#[inline]
pub fn sat_i16(x: i64) -> i16 {
    x.clamp(i64::from(i16::MIN), i64::from(i16::MAX)) as i16
}

/// Saturates a 64-bit value to `i32`.
#[inline]
pub fn sat_i32(x: i64) -> i32 {
    x.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Shifts `acc` right by `q` with round-half-up, or left by `-q` with saturation.
///
/// For `q > 0` the half-unit bias `1 << (q - 1)` is added before the
/// arithmetic shift, which is how every kernel turns a Qn accumulator back
/// into sample units.
///
/// ```rust
/// use fadefir_core::fixed::round_shift;
///
/// assert_eq!(round_shift(3 << 13, 14), 2); // 1.5 rounds up
/// assert_eq!(round_shift(-(3 << 13), 14), -1); // -1.5 rounds toward +inf
/// assert_eq!(round_shift(5, -2), 20);
/// ```
#[inline]
pub fn round_shift(acc: i64, q: i16) -> i64 {
    match q {
        0 => acc,
        q if q > 0 => {
            let q = u32::from(q.unsigned_abs()).min(63);
            acc.saturating_add(1_i64 << (q - 1)) >> q
        }
        q => shl_sat(acc, u32::from(q.unsigned_abs())),
    }
}

/// Left shift that clamps to `i64` instead of discarding high bits.
#[inline]
pub fn shl_sat(x: i64, shift: u32) -> i64 {
    if x == 0 {
        return 0;
    }
    if shift >= 63 || x.unsigned_abs() > (i64::MAX >> shift).unsigned_abs() {
        return if x < 0 { i64::MIN } else { i64::MAX };
    }
    x << shift
}

/// Multiplies `x` by a Q30 gain, truncating toward negative infinity.
#[inline]
pub fn mul_q30(gain: i32, x: i64) -> i64 {
    (i64::from(gain) * x) >> GAIN_Q
}

/// Computes `(num << q) / den`, rounded up and saturated to `i32`.
///
/// Returns `i32::MAX` for a zero denominator. Rounding up guarantees that
/// `den` steps of the result reach at least `num` in Qq, which is what a
/// linear ramp of `den` samples needs to land on its target.
#[inline]
pub fn divide_qx(num: i32, den: u32, q: u32) -> i32 {
    if den == 0 {
        return i32::MAX;
    }
    let scaled = shl_sat(i64::from(num), q);
    let den = i64::from(den);
    let quotient = if scaled >= 0 {
        (scaled + den - 1) / den
    } else {
        scaled / den
    };
    sat_i32(quotient)
}
