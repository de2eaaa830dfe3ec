use clamm_types::{Error, MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK};
use ethnum::{I256, U256};

use crate::bit_math::most_significant_bit;

/// sqrt(1.0001^-(2^i)) as Q128.128, for i = 1..=19
const SQRT_RATIO_STEPS: [u128; 19] = [
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x9aa508b5b7a84e1c677de54f3e99bc9,
    0x5d6af8dedb81196699c329225ee604,
    0x2216e584f5fa1ea926041bedfe98,
    0x48a170391f7dc42444e8fa2,
];

/// sqrt(1.0001^-1) as Q128.128
const SQRT_RATIO_ONE: u128 = 0xfffcb933bd6fad37aa2d162d1a594001;

/// log_sqrt(1.0001)(2) as Q128.128 multiplier for a Q64.64 log2
const LOG_SQRT_10001_MULTIPLIER: i128 = 255738958999603826347141;

/// Error bound subtracted to get the lower tick candidate
const TICK_LOW_OFFSET: i128 = 3402992956809132418596140100660247210;

/// Error bound added to get the upper tick candidate
/// 291339464771989622907027621153398088495
const TICK_HI_OFFSET: I256 = I256::from_words(0, 0xdb2df09e81959a81455e260799a0632f_u128 as i128);

/// Calculate sqrt(1.0001^tick) * 2^96
/// Exact over the full tick range; the result always fits in 160 bits.
pub fn get_sqrt_ratio_at_tick(tick: i32) -> Result<U256, Error> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(Error::TickOutOfBounds);
    }

    let abs_tick = tick.unsigned_abs();

    // Accumulate the product of per-bit ratios in Q128.128
    let mut ratio = if abs_tick & 0x1 != 0 {
        U256::from(SQRT_RATIO_ONE)
    } else {
        U256::from_words(1, 0)
    };
    for (i, step) in SQRT_RATIO_STEPS.iter().enumerate() {
        if abs_tick & (0x2 << i) != 0 {
            ratio = (ratio * U256::from(*step)) >> 128u32;
        }
    }

    // Constants encode negative ticks; invert for positive ones
    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128.128 -> Q64.96, rounding up so that get_tick_at_sqrt_ratio is consistent
    let rounding = if ratio % (U256::ONE << 32u32) == U256::ZERO {
        U256::ZERO
    } else {
        U256::ONE
    };
    Ok((ratio >> 32u32) + rounding)
}

/// Calculate the greatest tick such that get_sqrt_ratio_at_tick(tick) <= sqrt_price_x96
pub fn get_tick_at_sqrt_ratio(sqrt_price_x96: U256) -> Result<i32, Error> {
    if sqrt_price_x96 < MIN_SQRT_RATIO || sqrt_price_x96 >= MAX_SQRT_RATIO {
        return Err(Error::SqrtPriceOutOfBounds);
    }

    let ratio = sqrt_price_x96 << 32u32;
    let msb = most_significant_bit(ratio);

    // Normalize into [2^127, 2^128)
    let mut r = if msb >= 128 {
        ratio >> (msb - 127)
    } else {
        ratio << (127 - msb)
    };

    // Integer part of log2 in Q64.64
    let mut log_2 = I256::from(msb as i32 - 128) << 64u32;

    // Fractional bits by repeated squaring
    for i in (50..64u32).rev() {
        r = (r * r) >> 127u32;
        let f = r >> 128u32;
        log_2 |= I256::from_words(0, f.as_i128()) << i;
        r >>= f.as_u32();
    }

    let log_sqrt10001 = log_2 * I256::new(LOG_SQRT_10001_MULTIPLIER);

    let tick_low = ((log_sqrt10001 - I256::new(TICK_LOW_OFFSET)) >> 128u32).as_i32();
    let tick_hi = ((log_sqrt10001 + TICK_HI_OFFSET) >> 128u32).as_i32();

    if tick_low == tick_hi {
        Ok(tick_low)
    } else if get_sqrt_ratio_at_tick(tick_hi)? <= sqrt_price_x96 {
        Ok(tick_hi)
    } else {
        Ok(tick_low)
    }
}
