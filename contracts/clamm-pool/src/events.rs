// Pool events. Topics are (name, ...indexed addresses); data carries amounts.

use soroban_sdk::{Address, Env, Symbol, U256};

/// Topics: ("initialize",)
/// Data: (sqrt_price_x96, tick)
pub fn emit_initialize(env: &Env, sqrt_price_x96: &U256, tick: i32) {
    env.events().publish(
        (Symbol::new(env, "initialize"),),
        (sqrt_price_x96.clone(), tick),
    );
}

/// Topics: ("mint", owner)
/// Data: (tick_lower, tick_upper, amount, amount0, amount1)
pub fn emit_mint(
    env: &Env,
    owner: &Address,
    tick_lower: i32,
    tick_upper: i32,
    amount: u128,
    amount0: u128,
    amount1: u128,
) {
    env.events().publish(
        (Symbol::new(env, "mint"), owner.clone()),
        (tick_lower, tick_upper, amount, amount0, amount1),
    );
}

/// Topics: ("burn", owner)
/// Data: (tick_lower, tick_upper, amount, amount0, amount1)
pub fn emit_burn(
    env: &Env,
    owner: &Address,
    tick_lower: i32,
    tick_upper: i32,
    amount: u128,
    amount0: u128,
    amount1: u128,
) {
    env.events().publish(
        (Symbol::new(env, "burn"), owner.clone()),
        (tick_lower, tick_upper, amount, amount0, amount1),
    );
}

/// Topics: ("collect", owner, recipient)
/// Data: (tick_lower, tick_upper, amount0, amount1)
pub fn emit_collect(
    env: &Env,
    owner: &Address,
    recipient: &Address,
    tick_lower: i32,
    tick_upper: i32,
    amount0: u128,
    amount1: u128,
) {
    env.events().publish(
        (Symbol::new(env, "collect"), owner.clone(), recipient.clone()),
        (tick_lower, tick_upper, amount0, amount1),
    );
}

/// Topics: ("swap", sender, recipient)
/// Data: (amount0, amount1, sqrt_price_x96, liquidity, tick)
pub fn emit_swap(
    env: &Env,
    sender: &Address,
    recipient: &Address,
    amount0: i128,
    amount1: i128,
    sqrt_price_x96: &U256,
    liquidity: u128,
    tick: i32,
) {
    env.events().publish(
        (Symbol::new(env, "swap"), sender.clone(), recipient.clone()),
        (amount0, amount1, sqrt_price_x96.clone(), liquidity, tick),
    );
}

/// Topics: ("flash", sender, recipient)
/// Data: (amount0, amount1, paid0, paid1)
pub fn emit_flash(
    env: &Env,
    sender: &Address,
    recipient: &Address,
    amount0: u128,
    amount1: u128,
    paid0: u128,
    paid1: u128,
) {
    env.events().publish(
        (Symbol::new(env, "flash"), sender.clone(), recipient.clone()),
        (amount0, amount1, paid0, paid1),
    );
}

/// Topics: ("obs_card",)
/// Data: (cardinality_next_old, cardinality_next_new)
pub fn emit_observation_cardinality_increased(env: &Env, old: u32, new: u32) {
    env.events()
        .publish((Symbol::new(env, "obs_card"),), (old, new));
}

/// Topics: ("set_fee_protocol",)
/// Data: (old_rate, new_rate)
pub fn emit_set_fee_protocol(env: &Env, old: u32, new: u32) {
    env.events()
        .publish((Symbol::new(env, "set_fee_protocol"),), (old, new));
}

/// Topics: ("collect_protocol", recipient)
/// Data: (amount0, amount1)
pub fn emit_collect_protocol(env: &Env, recipient: &Address, amount0: u128, amount1: u128) {
    env.events().publish(
        (Symbol::new(env, "collect_protocol"), recipient.clone()),
        (amount0, amount1),
    );
}
