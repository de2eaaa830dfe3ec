// Whole-pool consistency checks run by the scenario tests after every
// mutating call. Each check reads live storage and must run in the pool's
// contract context.

use crate::storage::{get_config, get_state, get_tick, get_tick_bitmap_word};
use crate::tick_bitmap::position;
use clamm_math::get_tick_at_sqrt_ratio;
use clamm_types::{ToWord, MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK};
use ethnum::U256;
use soroban_sdk::Env;

/// Price is inside the valid range and the tick matches it.
///
/// A swap that stops exactly on a tick boundary while moving left leaves the
/// tick one below the boundary, so the stored tick may trail the computed one
/// by one.
pub fn price_consistent(env: &Env) -> bool {
    let state = match get_state(env) {
        Ok(state) => state,
        Err(_) => return false,
    };
    let sqrt_price = state.sqrt_price_x96.to_word();
    if sqrt_price < MIN_SQRT_RATIO || sqrt_price >= MAX_SQRT_RATIO {
        return false;
    }
    if state.tick < MIN_TICK - 1 || state.tick > MAX_TICK {
        return false;
    }
    match get_tick_at_sqrt_ratio(sqrt_price) {
        Ok(computed) => state.tick == computed || state.tick == computed - 1,
        Err(_) => false,
    }
}

/// Active liquidity equals the sum of net liquidity of every initialized
/// tick at or below the current tick, and nets over all ticks sum to zero.
pub fn liquidity_matches_ticks(env: &Env, ticks: &[i32]) -> bool {
    let state = match get_state(env) {
        Ok(state) => state,
        Err(_) => return false,
    };

    let mut active: i128 = 0;
    let mut total: i128 = 0;
    for &tick in ticks {
        let info = get_tick(env, tick);
        total += info.liquidity_net;
        if tick <= state.tick {
            active += info.liquidity_net;
        }
    }
    total == 0 && active >= 0 && active as u128 == state.liquidity
}

/// A tick is initialized exactly when its bitmap bit is set, and holds gross
/// liquidity exactly when initialized.
pub fn bitmap_matches_ticks(env: &Env, ticks: &[i32]) -> bool {
    let config = match get_config(env) {
        Ok(config) => config,
        Err(_) => return false,
    };

    ticks.iter().all(|&tick| {
        let info = get_tick(env, tick);
        let (word_pos, bit_pos) = position(tick / config.tick_spacing);
        let bit_set = get_tick_bitmap_word(env, word_pos) & (U256::ONE << bit_pos) != U256::ZERO;
        bit_set == info.initialized && (info.liquidity_gross > 0) == info.initialized
    })
}

/// Protocol fee balances never exceed what the pool holds
pub fn protocol_fees_covered(env: &Env, balance0: i128, balance1: i128) -> bool {
    match get_state(env) {
        Ok(state) => {
            state.protocol_fees_0 <= balance0.max(0) as u128
                && state.protocol_fees_1 <= balance1.max(0) as u128
        }
        Err(_) => false,
    }
}

/// Run every check over the given set of position boundary ticks
pub fn check_all(env: &Env, ticks: &[i32], balance0: i128, balance1: i128) {
    assert!(price_consistent(env), "price and tick disagree");
    assert!(liquidity_matches_ticks(env, ticks), "active liquidity does not match ticks");
    assert!(bitmap_matches_ticks(env, ticks), "bitmap does not match ticks");
    assert!(protocol_fees_covered(env, balance0, balance1), "protocol fees exceed balances");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::{with_initialized_pool, with_pool};

    #[test]
    fn test_fresh_pool_is_consistent() {
        let env = Env::default();
        with_initialized_pool(&env, || {
            assert!(price_consistent(&env));
            assert!(liquidity_matches_ticks(&env, &[-60, 60]));
            assert!(bitmap_matches_ticks(&env, &[-60, 60]));
            assert!(protocol_fees_covered(&env, 0, 0));
        });
    }

    #[test]
    fn test_uninitialized_pool_fails_checks() {
        let env = Env::default();
        with_pool(&env, || {
            assert!(!price_consistent(&env));
            assert!(!liquidity_matches_ticks(&env, &[]));
        });
    }
}
