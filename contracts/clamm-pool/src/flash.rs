use crate::callback::flash_callback;
use crate::events::emit_flash;
use crate::lock::PoolLock;
use crate::protocol::split_fee;
use crate::storage::{get_config, get_state, set_state};
use clamm_math::{mul_div, mul_div_rounding_up, to_u128};
use clamm_types::{Error, PoolState, ToHost, ToWord, FEE_DENOMINATOR, Q128};
use ethnum::U256;
use soroban_sdk::{token, Address, Bytes, Env};

/// Fee owed for borrowing `amount`, rounded up
fn flash_fee(amount: u128, fee: u32) -> Result<u128, Error> {
    to_u128(mul_div_rounding_up(
        U256::from(amount),
        U256::from(fee),
        U256::from(FEE_DENOMINATOR),
    )?)
}

fn to_signed(amount: u128) -> Result<i128, Error> {
    i128::try_from(amount).map_err(|_| Error::Overflow)
}

/// Credit a paid fee to protocol balances and global fee growth
fn accrue(
    env: &Env,
    state: &mut PoolState,
    paid0: u128,
    paid1: u128,
) -> Result<(), Error> {
    let liquidity = U256::from(state.liquidity);

    if paid0 > 0 {
        let (protocol, lp) = split_fee(paid0, state.fee_protocol);
        state.protocol_fees_0 = state.protocol_fees_0.checked_add(protocol).ok_or(Error::Overflow)?;
        state.fee_growth_global_0_x128 = state
            .fee_growth_global_0_x128
            .to_word()
            .wrapping_add(mul_div(U256::from(lp), Q128, liquidity)?)
            .to_host(env);
    }
    if paid1 > 0 {
        let (protocol, lp) = split_fee(paid1, state.fee_protocol);
        state.protocol_fees_1 = state.protocol_fees_1.checked_add(protocol).ok_or(Error::Overflow)?;
        state.fee_growth_global_1_x128 = state
            .fee_growth_global_1_x128
            .to_word()
            .wrapping_add(mul_div(U256::from(lp), Q128, liquidity)?)
            .to_host(env);
    }
    Ok(())
}

/// Lend both tokens for the duration of `sender`'s flash callback.
///
/// The callback must return principal plus fee for each token. Anything paid
/// beyond principal is distributed to in-range liquidity as fees.
pub fn flash(
    env: &Env,
    sender: Address,
    recipient: Address,
    amount0: u128,
    amount1: u128,
    data: Bytes,
) -> Result<(), Error> {
    let _lock = PoolLock::acquire(env)?;

    let config = get_config(env)?;
    let mut state = get_state(env)?;

    if state.liquidity == 0 {
        return Err(Error::NoLiquidity);
    }

    let fee0 = flash_fee(amount0, config.fee)?;
    let fee1 = flash_fee(amount1, config.fee)?;

    let token0_client = token::Client::new(env, &config.token0);
    let token1_client = token::Client::new(env, &config.token1);
    let contract_address = env.current_contract_address();

    let balance0_before = token0_client.balance(&contract_address);
    let balance1_before = token1_client.balance(&contract_address);

    if amount0 > 0 {
        token0_client.transfer(&contract_address, &recipient, &to_signed(amount0)?);
    }
    if amount1 > 0 {
        token1_client.transfer(&contract_address, &recipient, &to_signed(amount1)?);
    }

    flash_callback(env, &sender, to_signed(fee0)?, to_signed(fee1)?, &data);

    let balance0_after = token0_client.balance(&contract_address);
    let balance1_after = token1_client.balance(&contract_address);

    let required0 = balance0_before.checked_add(to_signed(fee0)?).ok_or(Error::Overflow)?;
    if balance0_after < required0 {
        return Err(Error::FlashNotRepaid0);
    }
    let required1 = balance1_before.checked_add(to_signed(fee1)?).ok_or(Error::Overflow)?;
    if balance1_after < required1 {
        return Err(Error::FlashNotRepaid1);
    }

    // Both differences are at least the fee, so never negative here
    let paid0 = (balance0_after - balance0_before) as u128;
    let paid1 = (balance1_after - balance1_before) as u128;

    accrue(env, &mut state, paid0, paid1)?;
    set_state(env, &state);

    emit_flash(env, &sender, &recipient, amount0, amount1, paid0, paid1);

    Ok(())
}
