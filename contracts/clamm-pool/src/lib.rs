#![no_std]

mod callback;
mod events;
mod flash;
mod liquidity;
mod lock;
mod oracle;
mod position;
mod protocol;
mod storage;
mod swap;
mod tick;
mod tick_bitmap;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod testutils;

use clamm_math::get_tick_at_sqrt_ratio;
use clamm_types::{
    max_liquidity_per_tick, Error, Observation, PoolConfig, PoolState, PositionInfo, PositionKey,
    TickInfo, ToHost, ToWord, FEE_DENOMINATOR, MAX_TICK_SPACING,
};
use events::{emit_initialize, emit_observation_cardinality_increased};
use lock::PoolLock;
use soroban_sdk::{contract, contractimpl, panic_with_error, Address, Bytes, Env, Vec, U256};
use storage::{get_config, get_observation, get_state, get_tick, has_state, set_config, set_state};

#[contract]
pub struct ClammPool;

#[contractimpl]
impl ClammPool {
    /// Create a pool for a token pair and fee tier.
    ///
    /// The pool holds no price until `initialize` is called.
    ///
    /// # Arguments
    /// * `admin` - May set and collect protocol fees
    /// * `token0`, `token1` - Pair tokens; token0 must sort first
    /// * `fee` - Swap fee in hundredths of a basis point
    /// * `tick_spacing` - Only multiples of this are usable position bounds
    /// * `notifier` - Optional contract told about every liquidity change
    pub fn __constructor(
        env: Env,
        admin: Address,
        token0: Address,
        token1: Address,
        fee: u32,
        tick_spacing: i32,
        notifier: Option<Address>,
    ) {
        if token0 >= token1 {
            panic_with_error!(&env, Error::InvalidTokenOrder);
        }
        if fee == 0 || fee >= FEE_DENOMINATOR {
            panic_with_error!(&env, Error::InvalidFee);
        }
        if tick_spacing <= 0 || tick_spacing > MAX_TICK_SPACING {
            panic_with_error!(&env, Error::InvalidTickSpacing);
        }

        let config = PoolConfig {
            admin,
            token0,
            token1,
            fee,
            tick_spacing,
            max_liquidity_per_tick: max_liquidity_per_tick(tick_spacing),
            notifier,
        };
        set_config(&env, &config);
    }

    /// Set the starting price and write the first oracle observation
    pub fn initialize(env: Env, sqrt_price_x96: U256) -> Result<(), Error> {
        if has_state(&env) {
            return Err(Error::AlreadyInitialized);
        }

        let tick = get_tick_at_sqrt_ratio(sqrt_price_x96.to_word())?;

        let mut state = PoolState::new(&env, sqrt_price_x96.clone(), tick);
        oracle::initialize(&env, &mut state, env.ledger().timestamp());
        set_state(&env, &state);

        emit_initialize(&env, &sqrt_price_x96, tick);
        Ok(())
    }

    /// Add liquidity to a position
    ///
    /// # Returns
    /// (amount0, amount1) - Token amounts deposited
    pub fn mint(
        env: Env,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount: u128,
    ) -> Result<(u128, u128), Error> {
        owner.require_auth();
        liquidity::mint(&env, owner, tick_lower, tick_upper, amount)
    }

    /// Remove liquidity from a position. Freed tokens become collectable.
    ///
    /// # Returns
    /// (amount0, amount1) - Token amounts credited to the position
    pub fn burn(
        env: Env,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount: u128,
    ) -> Result<(u128, u128), Error> {
        owner.require_auth();
        liquidity::burn(&env, owner, tick_lower, tick_upper, amount)
    }

    /// Collect owed tokens from a position
    ///
    /// # Returns
    /// (amount0, amount1) - Token amounts sent to `recipient`
    pub fn collect(
        env: Env,
        owner: Address,
        recipient: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount0_requested: u128,
        amount1_requested: u128,
    ) -> Result<(u128, u128), Error> {
        owner.require_auth();
        liquidity::collect(
            &env,
            owner,
            recipient,
            tick_lower,
            tick_upper,
            amount0_requested,
            amount1_requested,
        )
    }

    /// Execute a swap
    ///
    /// # Arguments
    /// * `sender` - Contract whose `swap_callback` pays the input
    /// * `recipient` - Address to receive output tokens
    /// * `zero_for_one` - True if swapping token0 for token1
    /// * `amount_specified` - Positive for exact input, negative for exact output
    /// * `sqrt_price_limit_x96` - Price the swap may not move past
    /// * `data` - Passed through to the callback
    ///
    /// # Returns
    /// (amount0, amount1) - Negative values are amounts paid out
    pub fn swap(
        env: Env,
        sender: Address,
        recipient: Address,
        zero_for_one: bool,
        amount_specified: i128,
        sqrt_price_limit_x96: U256,
        data: Bytes,
    ) -> Result<(i128, i128), Error> {
        sender.require_auth();
        swap::swap(
            &env,
            sender,
            recipient,
            zero_for_one,
            amount_specified,
            sqrt_price_limit_x96.to_word(),
            data,
        )
    }

    /// Lend tokens to `recipient` until `sender`'s flash callback returns
    pub fn flash(
        env: Env,
        sender: Address,
        recipient: Address,
        amount0: u128,
        amount1: u128,
        data: Bytes,
    ) -> Result<(), Error> {
        sender.require_auth();
        flash::flash(&env, sender, recipient, amount0, amount1, data)
    }

    /// Grow the oracle ring buffer. Takes effect when the write index wraps.
    pub fn grow_observations(env: Env, next: u32) -> Result<(), Error> {
        let _lock = PoolLock::acquire(&env)?;
        let mut state = get_state(&env)?;

        let old = state.observation_cardinality_next;
        let new = oracle::grow(old, next);
        if new != old {
            state.observation_cardinality_next = new;
            set_state(&env, &state);
            emit_observation_cardinality_increased(&env, old, new);
        }
        Ok(())
    }

    /// Tick and seconds-per-liquidity accumulators as of `seconds_ago`
    pub fn observe_single(env: Env, seconds_ago: u64) -> Result<(i64, U256), Error> {
        let state = get_state(&env)?;
        let (tick_cumulative, seconds_per_liquidity) = oracle::observe_single(
            &env,
            env.ledger().timestamp(),
            seconds_ago,
            state.tick,
            state.observation_index,
            state.liquidity,
            state.observation_cardinality,
        )?;
        Ok((tick_cumulative, seconds_per_liquidity.to_host(&env)))
    }

    /// Batch form of `observe_single`
    pub fn observe(env: Env, seconds_agos: Vec<u64>) -> Result<(Vec<i64>, Vec<U256>), Error> {
        let state = get_state(&env)?;
        let now = env.ledger().timestamp();

        let mut tick_cumulatives = Vec::new(&env);
        let mut seconds_per_liquidity_cumulatives = Vec::new(&env);
        for seconds_ago in seconds_agos.iter() {
            let (tick_cumulative, seconds_per_liquidity) = oracle::observe_single(
                &env,
                now,
                seconds_ago,
                state.tick,
                state.observation_index,
                state.liquidity,
                state.observation_cardinality,
            )?;
            tick_cumulatives.push_back(tick_cumulative);
            seconds_per_liquidity_cumulatives.push_back(seconds_per_liquidity.to_host(&env));
        }
        Ok((tick_cumulatives, seconds_per_liquidity_cumulatives))
    }

    /// Set the protocol share of fees in basis points (admin only)
    pub fn set_fee_protocol(env: Env, fee_protocol: u32) -> Result<(), Error> {
        protocol::set_fee_protocol(&env, fee_protocol)
    }

    /// Withdraw accrued protocol fees (admin only)
    pub fn collect_protocol(
        env: Env,
        recipient: Address,
        amount0_requested: u128,
        amount1_requested: u128,
    ) -> Result<(u128, u128), Error> {
        protocol::collect_protocol(&env, recipient, amount0_requested, amount1_requested)
    }

    // === View Functions ===

    /// Largest liquidity the given amounts can mint over a range at the current price
    pub fn get_liquidity_for_amounts(
        env: Env,
        tick_lower: i32,
        tick_upper: i32,
        amount0: u128,
        amount1: u128,
    ) -> Result<u128, Error> {
        liquidity::get_liquidity_for_amounts(&env, tick_lower, tick_upper, amount0, amount1)
    }

    /// Token amounts backing `liquidity` over a range at the current price
    pub fn get_amounts_for_liquidity(
        env: Env,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
    ) -> Result<(u128, u128), Error> {
        liquidity::get_amounts_for_liquidity(&env, tick_lower, tick_upper, liquidity)
    }

    /// Get current pool state
    pub fn get_state(env: Env) -> Result<PoolState, Error> {
        get_state(&env)
    }

    /// Get pool configuration
    pub fn get_config(env: Env) -> Result<PoolConfig, Error> {
        get_config(&env)
    }

    /// Get tick info
    pub fn get_tick(env: Env, tick: i32) -> TickInfo {
        get_tick(&env, tick)
    }

    /// Get position info
    pub fn get_position(
        env: Env,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
    ) -> PositionInfo {
        let key = PositionKey {
            owner,
            tick_lower,
            tick_upper,
        };
        storage::get_position(&env, &key)
    }

    /// Get an oracle ring buffer slot
    pub fn get_observation(env: Env, index: u32) -> Observation {
        get_observation(&env, index)
    }

    /// Get a word of the initialized tick bitmap
    pub fn tick_bitmap(env: Env, word_pos: i32) -> U256 {
        storage::get_tick_bitmap_word(&env, word_pos).to_host(&env)
    }

    /// Get current sqrt price
    pub fn sqrt_price_x96(env: Env) -> Result<U256, Error> {
        Ok(get_state(&env)?.sqrt_price_x96)
    }

    /// Get current tick
    pub fn tick(env: Env) -> Result<i32, Error> {
        Ok(get_state(&env)?.tick)
    }

    /// Get current liquidity
    pub fn liquidity(env: Env) -> Result<u128, Error> {
        Ok(get_state(&env)?.liquidity)
    }

    pub fn fee_growth_global_0_x128(env: Env) -> Result<U256, Error> {
        Ok(get_state(&env)?.fee_growth_global_0_x128)
    }

    pub fn fee_growth_global_1_x128(env: Env) -> Result<U256, Error> {
        Ok(get_state(&env)?.fee_growth_global_1_x128)
    }

    /// Accrued protocol fees (token0, token1)
    pub fn protocol_fees(env: Env) -> Result<(u128, u128), Error> {
        let state = get_state(&env)?;
        Ok((state.protocol_fees_0, state.protocol_fees_1))
    }

    /// Get token0 address
    pub fn token0(env: Env) -> Result<Address, Error> {
        Ok(get_config(&env)?.token0)
    }

    /// Get token1 address
    pub fn token1(env: Env) -> Result<Address, Error> {
        Ok(get_config(&env)?.token1)
    }

    /// Get fee
    pub fn fee(env: Env) -> Result<u32, Error> {
        Ok(get_config(&env)?.fee)
    }

    /// Get tick spacing
    pub fn tick_spacing(env: Env) -> Result<i32, Error> {
        Ok(get_config(&env)?.tick_spacing)
    }
}
