use crate::callback::{notify_liquidity_added, notify_liquidity_removed};
use crate::events::{emit_burn, emit_collect, emit_mint};
use crate::lock::PoolLock;
use crate::storage::{get_config, get_position, get_state, set_position, set_state};
use crate::tick::{clear as clear_tick, get_fee_growth_inside, update as update_tick};
use crate::tick_bitmap::flip_tick;
use crate::{oracle, position};
use clamm_math::{add_delta, get_amount0_delta_signed, get_amount1_delta_signed, get_sqrt_ratio_at_tick};
use clamm_types::{Error, PoolConfig, PoolState, PositionKey, ToWord, MAX_TICK, MIN_TICK};
use soroban_sdk::{token, Address, Env};

/// Validate tick parameters
fn check_ticks(tick_lower: i32, tick_upper: i32, tick_spacing: i32) -> Result<(), Error> {
    if tick_lower >= tick_upper {
        return Err(Error::InvalidTickRange);
    }
    if tick_lower < MIN_TICK {
        return Err(Error::TickLowerTooLow);
    }
    if tick_upper > MAX_TICK {
        return Err(Error::TickUpperTooHigh);
    }
    if tick_lower % tick_spacing != 0 || tick_upper % tick_spacing != 0 {
        return Err(Error::TickNotOnSpacing);
    }
    Ok(())
}

/// Apply a liquidity change to ticks, bitmap and position, accruing fees
fn update_position(
    env: &Env,
    config: &PoolConfig,
    state: &PoolState,
    key: &PositionKey,
    liquidity_delta: i128,
) -> Result<(), Error> {
    let mut info = get_position(env, key);

    let fee_growth_global_0 = state.fee_growth_global_0_x128.to_word();
    let fee_growth_global_1 = state.fee_growth_global_1_x128.to_word();

    let mut flipped_lower = false;
    let mut flipped_upper = false;
    if liquidity_delta != 0 {
        flipped_lower = update_tick(
            env,
            key.tick_lower,
            state.tick,
            liquidity_delta,
            fee_growth_global_0,
            fee_growth_global_1,
            false,
            config.max_liquidity_per_tick,
        )?;
        flipped_upper = update_tick(
            env,
            key.tick_upper,
            state.tick,
            liquidity_delta,
            fee_growth_global_0,
            fee_growth_global_1,
            true,
            config.max_liquidity_per_tick,
        )?;

        if flipped_lower {
            flip_tick(env, key.tick_lower, config.tick_spacing)?;
        }
        if flipped_upper {
            flip_tick(env, key.tick_upper, config.tick_spacing)?;
        }
    }

    let (fee_growth_inside_0, fee_growth_inside_1) = get_fee_growth_inside(
        env,
        key.tick_lower,
        key.tick_upper,
        state.tick,
        fee_growth_global_0,
        fee_growth_global_1,
    );

    position::update(
        env,
        &mut info,
        liquidity_delta,
        fee_growth_inside_0,
        fee_growth_inside_1,
    )?;
    set_position(env, key, &info);

    // Ticks that no longer back any position are removed
    if liquidity_delta < 0 {
        if flipped_lower {
            clear_tick(env, key.tick_lower);
        }
        if flipped_upper {
            clear_tick(env, key.tick_upper);
        }
    }

    Ok(())
}

/// Change a position's liquidity and return the signed token amounts it moves.
/// Positive amounts are owed to the pool, negative ones are owed to the owner.
fn modify_position(
    env: &Env,
    config: &PoolConfig,
    state: &mut PoolState,
    key: &PositionKey,
    liquidity_delta: i128,
) -> Result<(i128, i128), Error> {
    check_ticks(key.tick_lower, key.tick_upper, config.tick_spacing)?;

    update_position(env, config, state, key, liquidity_delta)?;

    if liquidity_delta == 0 {
        return Ok((0, 0));
    }

    let sqrt_ratio_lower = get_sqrt_ratio_at_tick(key.tick_lower)?;
    let sqrt_ratio_upper = get_sqrt_ratio_at_tick(key.tick_upper)?;

    if state.tick < key.tick_lower {
        // Entirely above the current price: only token0
        let amount0 = get_amount0_delta_signed(sqrt_ratio_lower, sqrt_ratio_upper, liquidity_delta)?;
        Ok((amount0, 0))
    } else if state.tick < key.tick_upper {
        // Straddles the current price: both tokens, active liquidity changes
        let sqrt_price = state.sqrt_price_x96.to_word();

        let liquidity_before = state.liquidity;
        let tick = state.tick;
        oracle::write(env, state, env.ledger().timestamp(), tick, liquidity_before);

        let amount0 = get_amount0_delta_signed(sqrt_price, sqrt_ratio_upper, liquidity_delta)?;
        let amount1 = get_amount1_delta_signed(sqrt_ratio_lower, sqrt_price, liquidity_delta)?;

        state.liquidity = add_delta(liquidity_before, liquidity_delta)?;
        Ok((amount0, amount1))
    } else {
        // Entirely below the current price: only token1
        let amount1 = get_amount1_delta_signed(sqrt_ratio_lower, sqrt_ratio_upper, liquidity_delta)?;
        Ok((0, amount1))
    }
}

/// Mint (add) liquidity to a position
///
/// The owner pays the computed amounts by direct transfer after all pool
/// bookkeeping is done; a failed transfer aborts the whole call.
pub fn mint(
    env: &Env,
    owner: Address,
    tick_lower: i32,
    tick_upper: i32,
    amount: u128,
) -> Result<(u128, u128), Error> {
    let _lock = PoolLock::acquire(env)?;

    if amount == 0 {
        return Err(Error::AmountZero);
    }
    let liquidity_delta = i128::try_from(amount).map_err(|_| Error::LiquidityOverflow)?;

    let config = get_config(env)?;
    let mut state = get_state(env)?;

    let key = PositionKey {
        owner: owner.clone(),
        tick_lower,
        tick_upper,
    };
    let (amount0, amount1) = modify_position(env, &config, &mut state, &key, liquidity_delta)?;
    set_state(env, &state);

    let amount0 = amount0 as u128;
    let amount1 = amount1 as u128;

    if let Some(notifier) = &config.notifier {
        notify_liquidity_added(env, notifier, &owner, amount);
    }

    // Transfer tokens from owner
    let contract_address = env.current_contract_address();
    if amount0 > 0 {
        let token0_client = token::Client::new(env, &config.token0);
        token0_client.transfer(&owner, &contract_address, &(amount0 as i128));
    }
    if amount1 > 0 {
        let token1_client = token::Client::new(env, &config.token1);
        token1_client.transfer(&owner, &contract_address, &(amount1 as i128));
    }

    emit_mint(env, &owner, tick_lower, tick_upper, amount, amount0, amount1);

    Ok((amount0, amount1))
}

/// Burn (remove) liquidity from a position
///
/// Freed tokens are credited to the position's owed balance and paid out by
/// `collect`. A zero amount only accrues fees on an existing position.
pub fn burn(
    env: &Env,
    owner: Address,
    tick_lower: i32,
    tick_upper: i32,
    amount: u128,
) -> Result<(u128, u128), Error> {
    let _lock = PoolLock::acquire(env)?;

    let liquidity_delta = i128::try_from(amount)
        .map(|a| -a)
        .map_err(|_| Error::LiquidityUnderflow)?;

    let config = get_config(env)?;
    let mut state = get_state(env)?;

    let key = PositionKey {
        owner: owner.clone(),
        tick_lower,
        tick_upper,
    };
    let (amount0, amount1) = modify_position(env, &config, &mut state, &key, liquidity_delta)?;
    set_state(env, &state);

    let amount0 = amount0.unsigned_abs();
    let amount1 = amount1.unsigned_abs();

    if amount0 > 0 || amount1 > 0 {
        let mut info = get_position(env, &key);
        info.tokens_owed_0 = info
            .tokens_owed_0
            .checked_add(amount0)
            .ok_or(Error::Overflow)?;
        info.tokens_owed_1 = info
            .tokens_owed_1
            .checked_add(amount1)
            .ok_or(Error::Overflow)?;
        set_position(env, &key, &info);
    }

    if amount > 0 {
        if let Some(notifier) = &config.notifier {
            notify_liquidity_removed(env, notifier, &owner, amount);
        }
    }

    emit_burn(env, &owner, tick_lower, tick_upper, amount, amount0, amount1);

    Ok((amount0, amount1))
}

/// Collect fees and withdrawn tokens from a position
/// Pays the lesser of requested and owed; owed balances drop before the transfer.
pub fn collect(
    env: &Env,
    owner: Address,
    recipient: Address,
    tick_lower: i32,
    tick_upper: i32,
    amount0_requested: u128,
    amount1_requested: u128,
) -> Result<(u128, u128), Error> {
    let _lock = PoolLock::acquire(env)?;
    let config = get_config(env)?;

    let (key, mut info) = position::get(env, &owner, tick_lower, tick_upper);

    let amount0 = amount0_requested.min(info.tokens_owed_0);
    let amount1 = amount1_requested.min(info.tokens_owed_1);

    info.tokens_owed_0 -= amount0;
    info.tokens_owed_1 -= amount1;
    set_position(env, &key, &info);

    // Transfer tokens to recipient
    let contract_address = env.current_contract_address();
    if amount0 > 0 {
        let token0_client = token::Client::new(env, &config.token0);
        token0_client.transfer(&contract_address, &recipient, &(amount0 as i128));
    }
    if amount1 > 0 {
        let token1_client = token::Client::new(env, &config.token1);
        token1_client.transfer(&contract_address, &recipient, &(amount1 as i128));
    }

    emit_collect(env, &owner, &recipient, tick_lower, tick_upper, amount0, amount1);

    Ok((amount0, amount1))
}

/// Largest liquidity the given amounts can mint over a range at the current price
pub fn get_liquidity_for_amounts(
    env: &Env,
    tick_lower: i32,
    tick_upper: i32,
    amount0: u128,
    amount1: u128,
) -> Result<u128, Error> {
    let config = get_config(env)?;
    let state = get_state(env)?;
    check_ticks(tick_lower, tick_upper, config.tick_spacing)?;

    clamm_math::get_liquidity_for_amounts(
        state.sqrt_price_x96.to_word(),
        get_sqrt_ratio_at_tick(tick_lower)?,
        get_sqrt_ratio_at_tick(tick_upper)?,
        amount0,
        amount1,
    )
}

/// Token amounts a position of `liquidity` over the range is worth at the current price
pub fn get_amounts_for_liquidity(
    env: &Env,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
) -> Result<(u128, u128), Error> {
    let config = get_config(env)?;
    let state = get_state(env)?;
    check_ticks(tick_lower, tick_upper, config.tick_spacing)?;

    clamm_math::get_amounts_for_liquidity(
        state.sqrt_price_x96.to_word(),
        get_sqrt_ratio_at_tick(tick_lower)?,
        get_sqrt_ratio_at_tick(tick_upper)?,
        liquidity,
    )
}
