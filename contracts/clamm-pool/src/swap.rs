use crate::callback::swap_callback;
use crate::events::emit_swap;
use crate::lock::PoolLock;
use crate::oracle;
use crate::protocol::split_fee;
use crate::storage::{get_config, get_state, set_state, MAX_SWAP_STEPS, MAX_TICK_CROSSINGS_PER_SWAP};
use crate::tick::cross;
use crate::tick_bitmap::next_initialized_tick_within_one_word;
use clamm_math::{add_delta, compute_swap_step, get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio, mul_div};
use clamm_types::{
    Error, PoolConfig, PoolState, SwapComputation, SwapParams, SwapState, ToHost, ToWord,
    MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK, Q128,
};
use ethnum::U256;
use soroban_sdk::{log, token, Address, Bytes, Env};

fn to_signed(amount: u128) -> Result<i128, Error> {
    i128::try_from(amount).map_err(|_| Error::Overflow)
}

/// The price limit must lie strictly between the current price and the
/// global bound in the swap direction
fn check_price_limit(params: &SwapParams, sqrt_price_x96: U256) -> Result<(), Error> {
    let limit = params.sqrt_price_limit_x96;
    let valid = if params.zero_for_one {
        limit < sqrt_price_x96 && limit > MIN_SQRT_RATIO
    } else {
        limit > sqrt_price_x96 && limit < MAX_SQRT_RATIO
    };
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidPriceLimit)
    }
}

/// Walk the price across initialized ticks until the specified amount is
/// used up or the price limit is reached.
///
/// Crossed ticks are written as they are crossed; pool state is not touched.
/// The walk also stops after `MAX_SWAP_STEPS` iterations or
/// `MAX_TICK_CROSSINGS_PER_SWAP` crossings, settling what was filled.
pub fn compute_swap(
    env: &Env,
    config: &PoolConfig,
    state: &PoolState,
    params: &SwapParams,
) -> Result<SwapComputation, Error> {
    if params.amount_specified == 0 {
        return Err(Error::AmountZero);
    }
    check_price_limit(params, state.sqrt_price_x96.to_word())?;

    let zero_for_one = params.zero_for_one;
    let exact_input = params.amount_specified > 0;

    let fee_growth_global_0 = state.fee_growth_global_0_x128.to_word();
    let fee_growth_global_1 = state.fee_growth_global_1_x128.to_word();

    let mut swap = SwapState {
        amount_remaining: params.amount_specified,
        amount_calculated: 0,
        sqrt_price_x96: state.sqrt_price_x96.to_word(),
        tick: state.tick,
        liquidity: state.liquidity,
        fee_growth_global_x128: if zero_for_one {
            fee_growth_global_0
        } else {
            fee_growth_global_1
        },
        protocol_fee: 0,
    };

    let mut steps: u32 = 0;
    let mut ticks_crossed: u32 = 0;

    while swap.amount_remaining != 0 && swap.sqrt_price_x96 != params.sqrt_price_limit_x96 {
        if steps >= MAX_SWAP_STEPS {
            log!(env, "swap step cap reached", steps);
            break;
        }
        if ticks_crossed >= MAX_TICK_CROSSINGS_PER_SWAP {
            log!(env, "swap crossing cap reached", ticks_crossed);
            break;
        }
        steps += 1;

        let sqrt_price_start = swap.sqrt_price_x96;

        let (tick_next, initialized) =
            next_initialized_tick_within_one_word(env, swap.tick, config.tick_spacing, zero_for_one);
        let tick_next = tick_next.clamp(MIN_TICK, MAX_TICK);
        let sqrt_price_next = get_sqrt_ratio_at_tick(tick_next)?;

        // Never step past the caller's limit
        let sqrt_ratio_target = if zero_for_one {
            sqrt_price_next.max(params.sqrt_price_limit_x96)
        } else {
            sqrt_price_next.min(params.sqrt_price_limit_x96)
        };

        let step = compute_swap_step(
            swap.sqrt_price_x96,
            sqrt_ratio_target,
            swap.liquidity,
            swap.amount_remaining,
            config.fee,
        )?;
        swap.sqrt_price_x96 = step.sqrt_ratio_next_x96;

        let amount_in_with_fee = to_signed(
            step.amount_in
                .checked_add(step.fee_amount)
                .ok_or(Error::Overflow)?,
        )?;
        let amount_out = to_signed(step.amount_out)?;

        if exact_input {
            swap.amount_remaining = swap
                .amount_remaining
                .checked_sub(amount_in_with_fee)
                .ok_or(Error::Overflow)?;
            swap.amount_calculated = swap
                .amount_calculated
                .checked_sub(amount_out)
                .ok_or(Error::Overflow)?;
        } else {
            swap.amount_remaining = swap
                .amount_remaining
                .checked_add(amount_out)
                .ok_or(Error::Overflow)?;
            swap.amount_calculated = swap
                .amount_calculated
                .checked_add(amount_in_with_fee)
                .ok_or(Error::Overflow)?;
        }

        // Protocol share comes out of the fee before LPs are credited
        let (protocol_fee, fee_amount) = split_fee(step.fee_amount, state.fee_protocol);
        swap.protocol_fee = swap
            .protocol_fee
            .checked_add(protocol_fee)
            .ok_or(Error::Overflow)?;

        if swap.liquidity > 0 {
            swap.fee_growth_global_x128 = swap.fee_growth_global_x128.wrapping_add(mul_div(
                U256::from(fee_amount),
                Q128,
                U256::from(swap.liquidity),
            )?);
        }

        if swap.sqrt_price_x96 == sqrt_price_next {
            if initialized {
                let (fee_growth_0, fee_growth_1) = if zero_for_one {
                    (swap.fee_growth_global_x128, fee_growth_global_1)
                } else {
                    (fee_growth_global_0, swap.fee_growth_global_x128)
                };
                let liquidity_net = cross(env, tick_next, fee_growth_0, fee_growth_1);
                log!(env, "crossed tick", tick_next, liquidity_net);

                // Moving left crosses the tick from above
                let liquidity_net = if zero_for_one {
                    liquidity_net.checked_neg().ok_or(Error::LiquidityOverflow)?
                } else {
                    liquidity_net
                };
                swap.liquidity = add_delta(swap.liquidity, liquidity_net)?;
                ticks_crossed += 1;
            }

            swap.tick = if zero_for_one { tick_next - 1 } else { tick_next };
        } else if swap.sqrt_price_x96 != sqrt_price_start {
            swap.tick = get_tick_at_sqrt_ratio(swap.sqrt_price_x96)?;
        }
    }

    let amount_filled = params
        .amount_specified
        .checked_sub(swap.amount_remaining)
        .ok_or(Error::Overflow)?;
    let (amount0, amount1) = if zero_for_one == exact_input {
        (amount_filled, swap.amount_calculated)
    } else {
        (swap.amount_calculated, amount_filled)
    };

    Ok(SwapComputation {
        amount0,
        amount1,
        sqrt_price_x96: swap.sqrt_price_x96,
        tick: swap.tick,
        liquidity: swap.liquidity,
        fee_growth_global_x128: swap.fee_growth_global_x128,
        protocol_fee: swap.protocol_fee,
        ticks_crossed,
    })
}

/// Fold a finished swap into the pool state, writing an oracle observation
/// when the tick moved
fn apply_swap(env: &Env, state: &mut PoolState, zero_for_one: bool, result: &SwapComputation) -> Result<(), Error> {
    if result.tick != state.tick {
        let tick = state.tick;
        let liquidity = state.liquidity;
        oracle::write(env, state, env.ledger().timestamp(), tick, liquidity);
    }

    state.sqrt_price_x96 = result.sqrt_price_x96.to_host(env);
    state.tick = result.tick;
    state.liquidity = result.liquidity;

    if zero_for_one {
        state.fee_growth_global_0_x128 = result.fee_growth_global_x128.to_host(env);
        state.protocol_fees_0 = state
            .protocol_fees_0
            .checked_add(result.protocol_fee)
            .ok_or(Error::Overflow)?;
    } else {
        state.fee_growth_global_1_x128 = result.fee_growth_global_x128.to_host(env);
        state.protocol_fees_1 = state
            .protocol_fees_1
            .checked_add(result.protocol_fee)
            .ok_or(Error::Overflow)?;
    }
    Ok(())
}

/// Execute a swap
///
/// The output token is sent to `recipient` first. `sender` is then asked via
/// its swap callback to pay the input, and the pool checks its own balance
/// rather than anything the callback reports.
pub fn swap(
    env: &Env,
    sender: Address,
    recipient: Address,
    zero_for_one: bool,
    amount_specified: i128,
    sqrt_price_limit_x96: U256,
    data: Bytes,
) -> Result<(i128, i128), Error> {
    let _lock = PoolLock::acquire(env)?;

    let config = get_config(env)?;
    let mut state = get_state(env)?;

    let params = SwapParams {
        zero_for_one,
        amount_specified,
        sqrt_price_limit_x96,
    };
    let result = compute_swap(env, &config, &state, &params)?;

    apply_swap(env, &mut state, zero_for_one, &result)?;
    set_state(env, &state);

    let (amount0, amount1) = (result.amount0, result.amount1);

    let token0_client = token::Client::new(env, &config.token0);
    let token1_client = token::Client::new(env, &config.token1);
    let contract_address = env.current_contract_address();

    if zero_for_one {
        if amount1 < 0 {
            token1_client.transfer(&contract_address, &recipient, &(-amount1));
        }

        let balance0_before = token0_client.balance(&contract_address);
        swap_callback(env, &sender, amount0, amount1, &data);
        let required = balance0_before.checked_add(amount0).ok_or(Error::Overflow)?;
        if token0_client.balance(&contract_address) < required {
            return Err(Error::InsufficientInputAmount);
        }
    } else {
        if amount0 < 0 {
            token0_client.transfer(&contract_address, &recipient, &(-amount0));
        }

        let balance1_before = token1_client.balance(&contract_address);
        swap_callback(env, &sender, amount0, amount1, &data);
        let required = balance1_before.checked_add(amount1).ok_or(Error::Overflow)?;
        if token1_client.balance(&contract_address) < required {
            return Err(Error::InsufficientInputAmount);
        }
    }

    emit_swap(
        env,
        &sender,
        &recipient,
        amount0,
        amount1,
        &state.sqrt_price_x96,
        state.liquidity,
        state.tick,
    );

    Ok((amount0, amount1))
}
