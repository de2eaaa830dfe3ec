use crate::events::{emit_collect_protocol, emit_set_fee_protocol};
use crate::lock::PoolLock;
use crate::storage::{get_config, get_state, set_state};
use clamm_types::{Error, MAX_FEE_PROTOCOL, PROTOCOL_FEE_DENOMINATOR};
use soroban_sdk::{token, Address, Env};

/// Split a fee into the protocol share and the liquidity provider share.
/// `fee_protocol` is in basis points; the protocol share rounds down.
pub fn split_fee(fee: u128, fee_protocol: u32) -> (u128, u128) {
    let denominator = PROTOCOL_FEE_DENOMINATOR as u128;
    let rate = fee_protocol as u128;
    let protocol = fee / denominator * rate + fee % denominator * rate / denominator;
    (protocol, fee - protocol)
}

/// Set the protocol share of swap and flash fees (admin only)
pub fn set_fee_protocol(env: &Env, fee_protocol: u32) -> Result<(), Error> {
    let config = get_config(env)?;
    config.admin.require_auth();

    let _lock = PoolLock::acquire(env)?;

    if fee_protocol > MAX_FEE_PROTOCOL {
        return Err(Error::InvalidFeeProtocol);
    }

    let mut state = get_state(env)?;
    let old = state.fee_protocol;
    state.fee_protocol = fee_protocol;
    set_state(env, &state);

    emit_set_fee_protocol(env, old, fee_protocol);
    Ok(())
}

/// Withdraw accrued protocol fees (admin only)
pub fn collect_protocol(
    env: &Env,
    recipient: Address,
    amount0_requested: u128,
    amount1_requested: u128,
) -> Result<(u128, u128), Error> {
    let config = get_config(env)?;
    config.admin.require_auth();

    let _lock = PoolLock::acquire(env)?;
    let mut state = get_state(env)?;

    let amount0 = amount0_requested.min(state.protocol_fees_0);
    let amount1 = amount1_requested.min(state.protocol_fees_1);

    state.protocol_fees_0 -= amount0;
    state.protocol_fees_1 -= amount1;
    set_state(env, &state);

    let contract_address = env.current_contract_address();
    if amount0 > 0 {
        token::Client::new(env, &config.token0).transfer(&contract_address, &recipient, &(amount0 as i128));
    }
    if amount1 > 0 {
        token::Client::new(env, &config.token1).transfer(&contract_address, &recipient, &(amount1 as i128));
    }

    emit_collect_protocol(env, &recipient, amount0, amount1);

    Ok((amount0, amount1))
}
