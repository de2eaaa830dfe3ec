use crate::storage::{get_tick, remove_tick, set_tick};
use clamm_math::add_delta;
use clamm_types::{Error, ToHost, ToWord};
use ethnum::U256;
use soroban_sdk::Env;

/// Update a tick with liquidity delta
/// Returns true if the tick was flipped (initialized or uninitialized)
pub fn update(
    env: &Env,
    tick: i32,
    tick_current: i32,
    liquidity_delta: i128,
    fee_growth_global_0_x128: U256,
    fee_growth_global_1_x128: U256,
    upper: bool,
    max_liquidity: u128,
) -> Result<bool, Error> {
    let mut info = get_tick(env, tick);

    let liquidity_gross_before = info.liquidity_gross;
    let liquidity_gross_after = add_delta(liquidity_gross_before, liquidity_delta)?;

    if liquidity_gross_after > max_liquidity {
        return Err(Error::LiquidityOverflow);
    }

    let flipped = (liquidity_gross_after == 0) != (liquidity_gross_before == 0);

    if liquidity_gross_before == 0 {
        // By convention all growth before initialization happened below the tick
        if tick <= tick_current {
            info.fee_growth_outside_0_x128 = fee_growth_global_0_x128.to_host(env);
            info.fee_growth_outside_1_x128 = fee_growth_global_1_x128.to_host(env);
        }
        info.initialized = true;
    }

    info.liquidity_gross = liquidity_gross_after;

    // Lower tick adds when crossed left to right, upper tick subtracts
    info.liquidity_net = if upper {
        info.liquidity_net.checked_sub(liquidity_delta)
    } else {
        info.liquidity_net.checked_add(liquidity_delta)
    }
    .ok_or(Error::LiquidityOverflow)?;

    set_tick(env, tick, &info);

    Ok(flipped)
}

/// Cross a tick during a swap
/// Returns the liquidity delta to apply when moving left to right
pub fn cross(
    env: &Env,
    tick: i32,
    fee_growth_global_0_x128: U256,
    fee_growth_global_1_x128: U256,
) -> i128 {
    let mut info = get_tick(env, tick);

    // Flip fee growth outside
    info.fee_growth_outside_0_x128 = fee_growth_global_0_x128
        .wrapping_sub(info.fee_growth_outside_0_x128.to_word())
        .to_host(env);
    info.fee_growth_outside_1_x128 = fee_growth_global_1_x128
        .wrapping_sub(info.fee_growth_outside_1_x128.to_word())
        .to_host(env);

    set_tick(env, tick, &info);

    info.liquidity_net
}

/// Remove a tick that no longer has liquidity referencing it
pub fn clear(env: &Env, tick: i32) {
    remove_tick(env, tick);
}

/// Get fee growth inside a tick range
/// All arithmetic wraps; only differences between snapshots are meaningful.
pub fn get_fee_growth_inside(
    env: &Env,
    tick_lower: i32,
    tick_upper: i32,
    tick_current: i32,
    fee_growth_global_0_x128: U256,
    fee_growth_global_1_x128: U256,
) -> (U256, U256) {
    let lower = get_tick(env, tick_lower);
    let upper = get_tick(env, tick_upper);

    let lower_outside_0 = lower.fee_growth_outside_0_x128.to_word();
    let lower_outside_1 = lower.fee_growth_outside_1_x128.to_word();
    let upper_outside_0 = upper.fee_growth_outside_0_x128.to_word();
    let upper_outside_1 = upper.fee_growth_outside_1_x128.to_word();

    // Calculate fee growth below
    let (fee_growth_below_0, fee_growth_below_1) = if tick_current >= tick_lower {
        (lower_outside_0, lower_outside_1)
    } else {
        (
            fee_growth_global_0_x128.wrapping_sub(lower_outside_0),
            fee_growth_global_1_x128.wrapping_sub(lower_outside_1),
        )
    };

    // Calculate fee growth above
    let (fee_growth_above_0, fee_growth_above_1) = if tick_current < tick_upper {
        (upper_outside_0, upper_outside_1)
    } else {
        (
            fee_growth_global_0_x128.wrapping_sub(upper_outside_0),
            fee_growth_global_1_x128.wrapping_sub(upper_outside_1),
        )
    };

    // Fee growth inside = global - below - above
    (
        fee_growth_global_0_x128
            .wrapping_sub(fee_growth_below_0)
            .wrapping_sub(fee_growth_above_0),
        fee_growth_global_1_x128
            .wrapping_sub(fee_growth_below_1)
            .wrapping_sub(fee_growth_above_1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::with_pool;
    use clamm_types::TickInfo;

    fn w(v: u128) -> U256 {
        U256::from(v)
    }

    fn tick_info(env: &Env, gross: u128, net: i128, outside_0: u128, outside_1: u128) -> TickInfo {
        TickInfo {
            liquidity_gross: gross,
            liquidity_net: net,
            fee_growth_outside_0_x128: w(outside_0).to_host(env),
            fee_growth_outside_1_x128: w(outside_1).to_host(env),
            initialized: true,
        }
    }

    // === update tests ===

    #[test]
    fn test_update_initializes_tick() {
        let env = Env::default();
        with_pool(&env, || {
            let flipped = update(&env, 100, 0, 1000, w(0), w(0), false, u128::MAX).unwrap();
            assert!(flipped, "First liquidity addition should flip tick");

            let info = get_tick(&env, 100);
            assert!(info.initialized);
            assert_eq!(info.liquidity_gross, 1000);
            assert_eq!(info.liquidity_net, 1000);
        });
    }

    #[test]
    fn test_update_add_liquidity_lower_tick() {
        let env = Env::default();
        with_pool(&env, || {
            update(&env, -100, 0, 1000, w(0), w(0), false, u128::MAX).unwrap();
            let flipped = update(&env, -100, 0, 500, w(0), w(0), false, u128::MAX).unwrap();
            assert!(!flipped, "Adding more liquidity should not flip");

            let info = get_tick(&env, -100);
            assert_eq!(info.liquidity_gross, 1500);
            assert_eq!(info.liquidity_net, 1500);
        });
    }

    #[test]
    fn test_update_upper_tick_subtracts_net() {
        let env = Env::default();
        with_pool(&env, || {
            update(&env, 100, 0, 1000, w(0), w(0), true, u128::MAX).unwrap();

            let info = get_tick(&env, 100);
            assert_eq!(info.liquidity_gross, 1000);
            assert_eq!(info.liquidity_net, -1000);
        });
    }

    #[test]
    fn test_update_shared_boundary_nets_out() {
        let env = Env::default();
        with_pool(&env, || {
            // Upper bound of one position, lower bound of another
            update(&env, 0, 0, 2, w(0), w(0), false, u128::MAX).unwrap();
            update(&env, 0, 0, 1, w(0), w(0), true, u128::MAX).unwrap();

            let info = get_tick(&env, 0);
            assert_eq!(info.liquidity_gross, 3);
            assert_eq!(info.liquidity_net, 1);
        });
    }

    #[test]
    fn test_update_remove_all_liquidity_flips() {
        let env = Env::default();
        with_pool(&env, || {
            update(&env, 0, 0, 1000, w(0), w(0), false, u128::MAX).unwrap();
            assert!(!update(&env, 0, 0, -400, w(0), w(0), false, u128::MAX).unwrap());
            assert!(update(&env, 0, 0, -600, w(0), w(0), false, u128::MAX).unwrap());

            assert_eq!(get_tick(&env, 0).liquidity_gross, 0);
        });
    }

    #[test]
    fn test_update_seeds_fee_growth_at_or_below_current() {
        let env = Env::default();
        with_pool(&env, || {
            update(&env, -100, 0, 1000, w(1000), w(2000), false, u128::MAX).unwrap();
            update(&env, 0, 0, 1000, w(1000), w(2000), false, u128::MAX).unwrap();

            for tick in [-100, 0] {
                let info = get_tick(&env, tick);
                assert_eq!(info.fee_growth_outside_0_x128.to_word(), w(1000));
                assert_eq!(info.fee_growth_outside_1_x128.to_word(), w(2000));
            }
        });
    }

    #[test]
    fn test_update_does_not_seed_fee_growth_above_current() {
        let env = Env::default();
        with_pool(&env, || {
            update(&env, 100, 0, 1000, w(1000), w(2000), false, u128::MAX).unwrap();

            let info = get_tick(&env, 100);
            assert_eq!(info.fee_growth_outside_0_x128.to_word(), U256::ZERO);
            assert_eq!(info.fee_growth_outside_1_x128.to_word(), U256::ZERO);
        });
    }

    #[test]
    fn test_update_exceeds_max_liquidity() {
        let env = Env::default();
        with_pool(&env, || {
            update(&env, 0, 0, 500, w(0), w(0), false, 1000).unwrap();
            assert_eq!(
                update(&env, 0, 0, 501, w(0), w(0), true, 1000),
                Err(Error::LiquidityOverflow)
            );
        });
    }

    #[test]
    fn test_update_remove_more_than_gross() {
        let env = Env::default();
        with_pool(&env, || {
            update(&env, 0, 0, 10, w(0), w(0), false, u128::MAX).unwrap();
            assert_eq!(
                update(&env, 0, 0, -11, w(0), w(0), false, u128::MAX),
                Err(Error::LiquidityUnderflow)
            );
        });
    }

    // === cross / clear tests ===

    #[test]
    fn test_cross_flips_fee_growth() {
        let env = Env::default();
        with_pool(&env, || {
            set_tick(&env, 0, &tick_info(&env, 1000, 500, 100, 200));

            let liquidity_net = cross(&env, 0, w(1000), w(2000));
            assert_eq!(liquidity_net, 500);

            let info = get_tick(&env, 0);
            assert_eq!(info.fee_growth_outside_0_x128.to_word(), w(900));
            assert_eq!(info.fee_growth_outside_1_x128.to_word(), w(1800));
        });
    }

    #[test]
    fn test_cross_twice_restores_outside() {
        let env = Env::default();
        with_pool(&env, || {
            set_tick(&env, 0, &tick_info(&env, 1000, -750, 100, 200));

            assert_eq!(cross(&env, 0, w(1000), w(2000)), -750);
            cross(&env, 0, w(1000), w(2000));

            let info = get_tick(&env, 0);
            assert_eq!(info.fee_growth_outside_0_x128.to_word(), w(100));
            assert_eq!(info.fee_growth_outside_1_x128.to_word(), w(200));
        });
    }

    #[test]
    fn test_cross_wraps_when_outside_exceeds_global() {
        let env = Env::default();
        with_pool(&env, || {
            set_tick(&env, 0, &tick_info(&env, 1, 1, 5, 0));
            cross(&env, 0, w(3), w(0));
            let info = get_tick(&env, 0);
            assert_eq!(info.fee_growth_outside_0_x128.to_word(), U256::MAX - 1);
        });
    }

    #[test]
    fn test_clear_removes_tick() {
        let env = Env::default();
        with_pool(&env, || {
            set_tick(&env, 60, &tick_info(&env, 1, 1, 5, 7));
            clear(&env, 60);

            let info = get_tick(&env, 60);
            assert!(!info.initialized);
            assert_eq!(info.liquidity_gross, 0);
            assert_eq!(info.fee_growth_outside_0_x128.to_word(), U256::ZERO);
        });
    }

    // === get_fee_growth_inside tests ===

    #[test]
    fn test_get_fee_growth_inside_current_in_range() {
        let env = Env::default();
        with_pool(&env, || {
            set_tick(&env, -100, &tick_info(&env, 1000, 1000, 100, 200));
            set_tick(&env, 100, &tick_info(&env, 1000, -1000, 50, 100));

            let (inside_0, inside_1) = get_fee_growth_inside(&env, -100, 100, 0, w(1000), w(2000));

            // below = lower.outside, above = upper.outside
            assert_eq!(inside_0, w(1000 - 100 - 50));
            assert_eq!(inside_1, w(2000 - 200 - 100));
        });
    }

    #[test]
    fn test_get_fee_growth_inside_current_below_range() {
        let env = Env::default();
        with_pool(&env, || {
            // Outside values record growth above each tick
            set_tick(&env, 100, &tick_info(&env, 1000, 1000, 800, 1600));
            set_tick(&env, 200, &tick_info(&env, 1000, -1000, 300, 600));

            let (inside_0, inside_1) = get_fee_growth_inside(&env, 100, 200, 0, w(1000), w(2000));

            // below = 1000 - 800, above = 300
            assert_eq!(inside_0, w(500));
            assert_eq!(inside_1, w(1000));
        });
    }

    #[test]
    fn test_get_fee_growth_inside_current_above_range() {
        let env = Env::default();
        with_pool(&env, || {
            // Outside values record growth below each tick
            set_tick(&env, -200, &tick_info(&env, 1000, 1000, 100, 200));
            set_tick(&env, -100, &tick_info(&env, 1000, -1000, 600, 1200));

            let (inside_0, inside_1) = get_fee_growth_inside(&env, -200, -100, 0, w(1000), w(2000));

            // below = 100, above = 1000 - 600
            assert_eq!(inside_0, w(500));
            assert_eq!(inside_1, w(1000));
        });
    }

    #[test]
    fn test_get_fee_growth_inside_uninitialized_ticks() {
        let env = Env::default();
        with_pool(&env, || {
            let (inside_0, inside_1) = get_fee_growth_inside(&env, -60, 60, 0, w(15), w(15));
            assert_eq!(inside_0, w(15));
            assert_eq!(inside_1, w(15));

            let (inside_0, _) = get_fee_growth_inside(&env, -60, 60, 120, w(15), w(15));
            assert_eq!(inside_0, U256::ZERO);
        });
    }

    #[test]
    fn test_get_fee_growth_inside_wraps() {
        let env = Env::default();
        with_pool(&env, || {
            // Outside values larger than global: result is taken modulo 2^256
            set_tick(&env, -60, &tick_info(&env, 1, 1, u128::MAX, 0));
            set_tick(&env, 60, &tick_info(&env, 1, -1, u128::MAX, 0));

            let (inside_0, _) = get_fee_growth_inside(&env, -60, 60, 0, w(15), w(15));
            let expected = w(15).wrapping_sub(w(u128::MAX)).wrapping_sub(w(u128::MAX));
            assert_eq!(inside_0, expected);
        });
    }
}
