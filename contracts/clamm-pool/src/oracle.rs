use crate::storage::{get_observation, set_observation};
use clamm_math::mul_div;
use clamm_types::{Error, Observation, PoolState, ToHost, ToWord, MAX_OBSERVATION_CARDINALITY};
use ethnum::U256;
use soroban_sdk::Env;

// Ring buffer of cumulative tick and seconds-per-liquidity values.
// Slots beyond the populated cardinality are never read, so growing the
// buffer does not touch storage.

/// Accumulate `tick` and `liquidity` from `last` up to `block_timestamp`
fn transform(
    env: &Env,
    last: &Observation,
    block_timestamp: u64,
    tick: i32,
    liquidity: u128,
) -> Observation {
    let delta = block_timestamp - last.block_timestamp;

    // Seconds per liquidity does not advance while nothing is in range
    let seconds_per_liquidity = if liquidity > 0 {
        (U256::from(delta) << 128u32) / U256::from(liquidity)
    } else {
        U256::ZERO
    };

    Observation {
        block_timestamp,
        tick_cumulative: last
            .tick_cumulative
            .wrapping_add((tick as i64).wrapping_mul(delta as i64)),
        seconds_per_liquidity_x128: last
            .seconds_per_liquidity_x128
            .to_word()
            .wrapping_add(seconds_per_liquidity)
            .to_host(env),
        initialized: true,
    }
}

/// Write the first observation when the pool price is initialized
pub fn initialize(env: &Env, state: &mut PoolState, block_timestamp: u64) {
    set_observation(env, 0, &Observation::first(env, block_timestamp));
    state.observation_index = 0;
    state.observation_cardinality = 1;
    state.observation_cardinality_next = 1;
}

/// Record the tick and liquidity in effect since the last observation.
/// At most one observation is written per timestamp. The buffer grows to
/// `observation_cardinality_next` once the index reaches the end.
pub fn write(env: &Env, state: &mut PoolState, block_timestamp: u64, tick: i32, liquidity: u128) {
    let last = get_observation(env, state.observation_index);
    if last.block_timestamp == block_timestamp {
        return;
    }

    let cardinality = if state.observation_cardinality_next > state.observation_cardinality
        && state.observation_index == state.observation_cardinality - 1
    {
        state.observation_cardinality_next
    } else {
        state.observation_cardinality
    };

    let index = (state.observation_index + 1) % cardinality;
    set_observation(env, index, &transform(env, &last, block_timestamp, tick, liquidity));

    state.observation_index = index;
    state.observation_cardinality = cardinality;
}

/// Capacity after asking for `next` slots; never shrinks, never exceeds the cap
pub fn grow(current: u32, next: u32) -> u32 {
    next.min(MAX_OBSERVATION_CARDINALITY).max(current)
}

/// Find the last observation at or before `target` and the one after it.
/// The buffer is sorted oldest to newest starting right after `index`.
fn binary_search(
    env: &Env,
    target: u64,
    index: u32,
    cardinality: u32,
) -> (Observation, Observation) {
    let mut l = (index + 1) % cardinality;
    let mut r = l + cardinality - 1;

    loop {
        let i = (l + r) / 2;
        let before = get_observation(env, i % cardinality);

        // Unwritten slot, the oldest data is further right
        if !before.initialized {
            l = i + 1;
            continue;
        }

        let after = get_observation(env, (i + 1) % cardinality);
        let target_at_or_after = before.block_timestamp <= target;

        if target_at_or_after && target <= after.block_timestamp {
            return (before, after);
        }

        if !target_at_or_after {
            r = i - 1;
        } else {
            l = i + 1;
        }
    }
}

fn get_surrounding_observations(
    env: &Env,
    target: u64,
    tick: i32,
    index: u32,
    liquidity: u128,
    cardinality: u32,
) -> Result<(Observation, Observation), Error> {
    // Newest observation first
    let newest = get_observation(env, index);
    if newest.block_timestamp <= target {
        if newest.block_timestamp == target {
            return Ok((newest.clone(), newest));
        }
        let extrapolated = transform(env, &newest, target, tick, liquidity);
        return Ok((newest, extrapolated));
    }

    // Oldest observation: the next slot, or slot 0 if the buffer has not wrapped
    let mut oldest = get_observation(env, (index + 1) % cardinality);
    if !oldest.initialized {
        oldest = get_observation(env, 0);
    }

    if target < oldest.block_timestamp {
        return Err(Error::ObservationTooOld);
    }

    Ok(binary_search(env, target, index, cardinality))
}

/// Cumulative values as of `seconds_ago` before `block_timestamp`.
/// Between two observations the values are interpolated; after the newest
/// one they are extrapolated with the current tick and liquidity.
pub fn observe_single(
    env: &Env,
    block_timestamp: u64,
    seconds_ago: u64,
    tick: i32,
    index: u32,
    liquidity: u128,
    cardinality: u32,
) -> Result<(i64, U256), Error> {
    if cardinality == 0 {
        return Err(Error::OracleUninitialized);
    }

    if seconds_ago == 0 {
        let mut last = get_observation(env, index);
        if last.block_timestamp != block_timestamp {
            last = transform(env, &last, block_timestamp, tick, liquidity);
        }
        return Ok((
            last.tick_cumulative,
            last.seconds_per_liquidity_x128.to_word(),
        ));
    }

    let target = block_timestamp
        .checked_sub(seconds_ago)
        .ok_or(Error::ObservationTooOld)?;

    let (before, after) = get_surrounding_observations(
        env,
        target,
        tick,
        index,
        liquidity,
        cardinality,
    )?;

    let before_spl = before.seconds_per_liquidity_x128.to_word();
    if target == before.block_timestamp {
        return Ok((before.tick_cumulative, before_spl));
    }

    let after_spl = after.seconds_per_liquidity_x128.to_word();
    if target == after.block_timestamp {
        return Ok((after.tick_cumulative, after_spl));
    }

    // Strictly between the two
    let observation_time_delta = after.block_timestamp - before.block_timestamp;
    let target_delta = target - before.block_timestamp;

    let tick_cumulative = before.tick_cumulative
        + (after.tick_cumulative - before.tick_cumulative) / observation_time_delta as i64
            * target_delta as i64;
    let seconds_per_liquidity = before_spl.wrapping_add(mul_div(
        after_spl.wrapping_sub(before_spl),
        U256::from(target_delta),
        U256::from(observation_time_delta),
    )?);

    Ok((tick_cumulative, seconds_per_liquidity))
}
