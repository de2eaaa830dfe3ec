#![no_std]

mod error;
mod num;
mod oracle;
mod pool;
mod position;
mod tick;

pub use error::*;
pub use num::*;
pub use oracle::*;
pub use pool::*;
pub use position::*;
pub use tick::*;

use ethnum::U256;

/// Q96 constant (2^96) for sqrt price fixed-point math
pub const Q96: U256 = U256::from_words(0, 1 << 96);

/// Q128 constant (2^128) for fee growth fixed-point math
pub const Q128: U256 = U256::from_words(1, 0);

/// Minimum tick index, log base 1.0001 of 2^-128
pub const MIN_TICK: i32 = -887272;

/// Maximum tick index, log base 1.0001 of 2^128
pub const MAX_TICK: i32 = -MIN_TICK;

/// Sqrt price at MIN_TICK as Q64.96 (inclusive lower bound)
pub const MIN_SQRT_RATIO: U256 = U256::from_words(0, 4295128739);

/// Sqrt price at MAX_TICK as Q64.96 (exclusive upper bound)
/// 1461446703485210103287273052203988822378723970342
pub const MAX_SQRT_RATIO: U256 =
    U256::from_words(0xfffd8963, 0xefd1fc6a506488495d951d5263988d26);

/// Largest value representable as a Q64.96 sqrt price (2^160 - 1)
pub const MAX_U160: U256 = U256::from_words(0xffffffff, u128::MAX);

/// Fee amount in hundredths of a basis point (1e-6)
/// 500 = 0.05%, 3000 = 0.3%, 10000 = 1%
pub type Fee = u32;

/// Denominator for `Fee` values
pub const FEE_DENOMINATOR: u32 = 1_000_000;

/// Largest tick spacing a pool can be configured with
pub const MAX_TICK_SPACING: i32 = 16384;

/// Denominator for the protocol share of swap and flash fees (basis points)
pub const PROTOCOL_FEE_DENOMINATOR: u32 = 10_000;

/// Largest protocol share of fees (25%)
pub const MAX_FEE_PROTOCOL: u32 = 2_500;

/// Capacity limit of the oracle ring buffer
pub const MAX_OBSERVATION_CARDINALITY: u32 = 65_535;

/// Calculate maximum liquidity per tick for a given tick spacing
pub fn max_liquidity_per_tick(tick_spacing: i32) -> u128 {
    let min_tick = (MIN_TICK / tick_spacing) * tick_spacing;
    let max_tick = (MAX_TICK / tick_spacing) * tick_spacing;
    let num_ticks = ((max_tick - min_tick) / tick_spacing) as u128 + 1;
    u128::MAX / num_ticks
}
