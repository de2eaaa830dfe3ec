use crate::storage::get_position;
use clamm_math::{add_delta, mul_div, to_u128};
use clamm_types::{Error, PositionInfo, PositionKey, ToHost, ToWord, Q128};
use ethnum::U256;
use soroban_sdk::{Address, Env};

/// Look up a position, or a fresh empty one if it does not exist yet
pub fn get(env: &Env, owner: &Address, tick_lower: i32, tick_upper: i32) -> (PositionKey, PositionInfo) {
    let key = PositionKey {
        owner: owner.clone(),
        tick_lower,
        tick_upper,
    };
    let info = get_position(env, &key);
    (key, info)
}

/// Credit fees earned since the last update and apply a liquidity change.
/// A zero delta only accrues fees and requires existing liquidity.
pub fn update(
    env: &Env,
    position: &mut PositionInfo,
    liquidity_delta: i128,
    fee_growth_inside_0_x128: U256,
    fee_growth_inside_1_x128: U256,
) -> Result<(), Error> {
    let liquidity_next = if liquidity_delta == 0 {
        if position.liquidity == 0 {
            return Err(Error::NoPosition);
        }
        position.liquidity
    } else {
        add_delta(position.liquidity, liquidity_delta)?
    };

    let liquidity = U256::from(position.liquidity);
    let tokens_owed_0 = to_u128(mul_div(
        fee_growth_inside_0_x128.wrapping_sub(position.fee_growth_inside_0_last_x128.to_word()),
        liquidity,
        Q128,
    )?)?;
    let tokens_owed_1 = to_u128(mul_div(
        fee_growth_inside_1_x128.wrapping_sub(position.fee_growth_inside_1_last_x128.to_word()),
        liquidity,
        Q128,
    )?)?;

    position.liquidity = liquidity_next;
    position.fee_growth_inside_0_last_x128 = fee_growth_inside_0_x128.to_host(env);
    position.fee_growth_inside_1_last_x128 = fee_growth_inside_1_x128.to_host(env);
    position.tokens_owed_0 = position
        .tokens_owed_0
        .checked_add(tokens_owed_0)
        .ok_or(Error::Overflow)?;
    position.tokens_owed_1 = position
        .tokens_owed_1
        .checked_add(tokens_owed_1)
        .ok_or(Error::Overflow)?;

    Ok(())
}
