#![cfg(test)]

use crate::{ClammPool, ClammPoolClient};
use clamm_types::{ToHost, Q96};
use soroban_sdk::{testutils::Address as _, Address, Env};

/// Register a pool over two fresh token addresses with a 0.3% fee
pub fn register_pool(env: &Env, tick_spacing: i32) -> Address {
    let admin = Address::generate(env);
    let a = Address::generate(env);
    let b = Address::generate(env);
    let (token0, token1) = if a < b { (a, b) } else { (b, a) };

    env.register(
        ClammPool,
        (admin, token0, token1, 3000u32, tick_spacing, None::<Address>),
    )
}

/// Run `f` in the storage context of an uninitialized pool
pub fn with_pool<T>(env: &Env, f: impl FnOnce() -> T) -> T {
    let pool = register_pool(env, 60);
    env.as_contract(&pool, f)
}

/// Run `f` in the storage context of a pool initialized at price 1
pub fn with_initialized_pool<T>(env: &Env, f: impl FnOnce() -> T) -> T {
    with_initialized_pool_spacing(env, 60, f)
}

pub fn with_initialized_pool_spacing<T>(env: &Env, tick_spacing: i32, f: impl FnOnce() -> T) -> T {
    let pool = register_pool(env, tick_spacing);
    ClammPoolClient::new(env, &pool).initialize(&Q96.to_host(env));
    env.as_contract(&pool, f)
}
