use soroban_sdk::{Address, Bytes, Env, IntoVal, Symbol};

// Collaborator contracts are called by address. The host has no implicit
// caller, so swap and flash name their payer explicitly as `sender`.

/// Ask `callback` to pay what the swap owes.
/// Positive deltas are owed to the pool, negative ones were sent out.
pub fn swap_callback(env: &Env, callback: &Address, amount0: i128, amount1: i128, data: &Bytes) {
    env.invoke_contract::<()>(
        callback,
        &Symbol::new(env, "swap_callback"),
        (amount0, amount1, data.clone()).into_val(env),
    );
}

/// Ask `callback` to return a flash loan plus the given fees.
pub fn flash_callback(env: &Env, callback: &Address, fee0: i128, fee1: i128, data: &Bytes) {
    env.invoke_contract::<()>(
        callback,
        &Symbol::new(env, "flash_callback"),
        (fee0, fee1, data.clone()).into_val(env),
    );
}

/// Tell the liquidity-accounting contract a position grew.
pub fn notify_liquidity_added(env: &Env, notifier: &Address, owner: &Address, amount: u128) {
    env.invoke_contract::<()>(
        notifier,
        &Symbol::new(env, "notify_liquidity_added"),
        (owner.clone(), amount).into_val(env),
    );
}

/// Tell the liquidity-accounting contract a position shrank.
pub fn notify_liquidity_removed(env: &Env, notifier: &Address, owner: &Address, amount: u128) {
    env.invoke_contract::<()>(
        notifier,
        &Symbol::new(env, "notify_liquidity_removed"),
        (owner.clone(), amount).into_val(env),
    );
}
