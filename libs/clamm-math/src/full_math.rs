use clamm_types::Error;
use ethnum::U256;

/// Full 512-bit product of two 256-bit words, returned as (hi, lo)
fn full_mul(a: U256, b: U256) -> (U256, U256) {
    let (a1, a0) = a.into_words();
    let (b1, b0) = b.into_words();

    let p00 = U256::from(a0) * U256::from(b0);
    let p01 = U256::from(a0) * U256::from(b1);
    let p10 = U256::from(a1) * U256::from(b0);
    let p11 = U256::from(a1) * U256::from(b1);

    // Cross terms sit at bit 128; a carry out of their sum is worth 2^384
    let (mid, mid_carry) = p01.overflowing_add(p10);
    let (lo, lo_carry) = p00.overflowing_add(mid << 128);

    let mut hi = p11 + (mid >> 128);
    if mid_carry {
        hi += U256::from_words(1, 0);
    }
    if lo_carry {
        hi += U256::ONE;
    }
    (hi, lo)
}

/// Divide the 512-bit value (hi, lo) by `denominator`, returning (quotient, remainder).
/// Requires hi < denominator so the quotient fits in 256 bits.
fn div_512(hi: U256, lo: U256, denominator: U256) -> (U256, U256) {
    if hi == U256::ZERO {
        return (lo / denominator, lo % denominator);
    }

    let mut remainder = hi;
    let mut quotient = U256::ZERO;
    for i in (0..256u32).rev() {
        let carry = remainder >> 255u32;
        remainder = (remainder << 1u32) | ((lo >> i) & U256::ONE);
        // remainder < denominator before the shift, so one subtraction suffices
        if carry == U256::ONE || remainder >= denominator {
            remainder = remainder.wrapping_sub(denominator);
            quotient |= U256::ONE << i;
        }
    }
    (quotient, remainder)
}

fn mul_div_rem(a: U256, b: U256, denominator: U256) -> Result<(U256, U256), Error> {
    if denominator == U256::ZERO {
        return Err(Error::DivisionByZero);
    }
    let (hi, lo) = full_mul(a, b);
    if hi >= denominator {
        return Err(Error::MulDivOverflow);
    }
    Ok(div_512(hi, lo, denominator))
}

/// Multiply and divide with 512-bit intermediate precision (rounds down)
/// Returns floor((a * b) / denominator)
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, Error> {
    mul_div_rem(a, b, denominator).map(|(q, _)| q)
}

/// Multiply and divide with 512-bit intermediate precision (rounds up)
/// Returns ceil((a * b) / denominator)
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256, Error> {
    let (q, r) = mul_div_rem(a, b, denominator)?;
    if r == U256::ZERO {
        return Ok(q);
    }
    q.checked_add(U256::ONE).ok_or(Error::MulDivOverflow)
}

/// Unsigned division with rounding up
pub fn div_rounding_up(a: U256, b: U256) -> Result<U256, Error> {
    if b == U256::ZERO {
        return Err(Error::DivisionByZero);
    }
    let q = a / b;
    if a % b == U256::ZERO {
        Ok(q)
    } else {
        Ok(q + U256::ONE)
    }
}

/// Narrow a word to u128, failing if it does not fit
pub fn to_u128(value: U256) -> Result<u128, Error> {
    let (hi, lo) = value.into_words();
    if hi != 0 {
        return Err(Error::Overflow);
    }
    Ok(lo)
}

/// Narrow a word to a non-negative i128, failing if it does not fit
pub fn to_i128(value: U256) -> Result<i128, Error> {
    let v = to_u128(value)?;
    i128::try_from(v).map_err(|_| Error::Overflow)
}
