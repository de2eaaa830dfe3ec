use crate::full_math::{mul_div, to_u128};
use crate::sqrt_price_math::{get_amount0_delta, get_amount1_delta};
use clamm_types::{Error, Q96};
use ethnum::U256;

fn sort(a: U256, b: U256) -> (U256, U256) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

/// Calculate the largest liquidity the given token amounts can back
/// for a price range at the current price
pub fn get_liquidity_for_amounts(
    sqrt_ratio_x96: U256,
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount0: u128,
    amount1: u128,
) -> Result<u128, Error> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sort(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_x96 <= sqrt_ratio_lower {
        // Current price below range - all token0
        get_liquidity_for_amount0(sqrt_ratio_lower, sqrt_ratio_upper, amount0)
    } else if sqrt_ratio_x96 < sqrt_ratio_upper {
        // Current price in range - both tokens
        let liquidity0 = get_liquidity_for_amount0(sqrt_ratio_x96, sqrt_ratio_upper, amount0)?;
        let liquidity1 = get_liquidity_for_amount1(sqrt_ratio_lower, sqrt_ratio_x96, amount1)?;
        Ok(liquidity0.min(liquidity1))
    } else {
        // Current price above range - all token1
        get_liquidity_for_amount1(sqrt_ratio_lower, sqrt_ratio_upper, amount1)
    }
}

/// Calculate liquidity from amount0
/// L = amount0 * sqrt_pa * sqrt_pb / (sqrt_pb - sqrt_pa)
pub fn get_liquidity_for_amount0(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount0: u128,
) -> Result<u128, Error> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sort(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    let intermediate = mul_div(sqrt_ratio_lower, sqrt_ratio_upper, Q96)?;
    to_u128(mul_div(
        U256::from(amount0),
        intermediate,
        sqrt_ratio_upper - sqrt_ratio_lower,
    )?)
}

/// Calculate liquidity from amount1
/// L = amount1 / (sqrt_pb - sqrt_pa)
pub fn get_liquidity_for_amount1(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount1: u128,
) -> Result<u128, Error> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sort(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    to_u128(mul_div(
        U256::from(amount1),
        Q96,
        sqrt_ratio_upper - sqrt_ratio_lower,
    )?)
}

/// Get the token amounts a liquidity amount is worth at the current price
/// (rounded down, i.e. what a burn would release)
pub fn get_amounts_for_liquidity(
    sqrt_ratio_x96: U256,
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: u128,
) -> Result<(u128, u128), Error> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sort(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    let (amount0, amount1) = if sqrt_ratio_x96 <= sqrt_ratio_lower {
        (
            get_amount0_delta(sqrt_ratio_lower, sqrt_ratio_upper, liquidity, false)?,
            U256::ZERO,
        )
    } else if sqrt_ratio_x96 < sqrt_ratio_upper {
        (
            get_amount0_delta(sqrt_ratio_x96, sqrt_ratio_upper, liquidity, false)?,
            get_amount1_delta(sqrt_ratio_lower, sqrt_ratio_x96, liquidity, false)?,
        )
    } else {
        (
            U256::ZERO,
            get_amount1_delta(sqrt_ratio_lower, sqrt_ratio_upper, liquidity, false)?,
        )
    };

    Ok((to_u128(amount0)?, to_u128(amount1)?))
}

/// Add signed liquidity delta to unsigned liquidity
pub fn add_delta(liquidity: u128, delta: i128) -> Result<u128, Error> {
    if delta < 0 {
        liquidity
            .checked_sub(delta.unsigned_abs())
            .ok_or(Error::LiquidityUnderflow)
    } else {
        liquidity
            .checked_add(delta as u128)
            .ok_or(Error::LiquidityOverflow)
    }
}
