//! Integer helpers for exact ratio arithmetic.

/// Greatest common divisor; `gcd(0, 0) == 0`.
pub fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// `val * num / den` with truncation, computed in 128-bit so the product cannot overflow.
///
/// Returns `None` for a zero denominator or when the result does not fit in `u64`.
pub fn scale_u64(val: u64, num: u64, den: u64) -> Option<u64> {
    if den == 0 {
        return None;
    }
    let r = u128::from(val) * u128::from(num) / u128::from(den);
    u64::try_from(r).ok()
}

/// Reduce `num/den` by their gcd.
pub fn reduce(num: u128, den: u128) -> (u128, u128) {
    let g = gcd(num, den);
    if g <= 1 {
        return (num, den);
    }
    (num / g, den / g)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
