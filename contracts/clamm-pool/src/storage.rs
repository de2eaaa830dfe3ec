use clamm_types::{
    Error, Observation, PoolConfig, PoolState, PositionInfo, PositionKey, TickInfo, ToHost,
    ToWord,
};
use soroban_sdk::{contracttype, Env, U256};

// ============================================================================
// SOROBAN RESOURCE LIMITS - Critical constraints for pool operations:
// ============================================================================
// - Read entries per tx: 100 entries / 200 KB
// - Write entries per tx: 50 entries / 132 KB
//
// Storage design considerations:
// - Each tick, bitmap word, position and observation is a separate entry
// - Empty ticks, bitmap words and positions are removed
//
// Swap operation limits:
// - Each tick crossing requires 1 read + 1 write to tick data
// - Each bitmap word lookup requires 1 read
// - Max ticks crossable per swap: 40, leaving room for state, oracle and
//   token balance entries within the 50 write entry limit
// - Max swap steps: 40. A missing bitmap word still counts as a read, so
//   40 words + 40 crossed ticks + the fixed entries below stay under 100
// - Fixed entries per swap: pool instance and code, both token instances,
//   four balances, callback instance and code, oracle slots
// ============================================================================

/// Maximum number of initialized tick crossings per swap.
pub const MAX_TICK_CROSSINGS_PER_SWAP: u32 = 40;

/// Maximum number of swap loop iterations (bitmap words visited) per swap.
pub const MAX_SWAP_STEPS: u32 = 40;

/// Entries every swap reads regardless of how far the price moves.
pub const SWAP_FIXED_READ_ENTRIES: u32 = 20;

/// Read entry limit per transaction.
pub const MAX_READ_ENTRIES: u32 = 100;

const _: () = assert!(
    MAX_SWAP_STEPS + MAX_TICK_CROSSINGS_PER_SWAP + SWAP_FIXED_READ_ENTRIES <= MAX_READ_ENTRIES
);

/// Storage keys for the pool contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Pool configuration (Instance storage)
    Config,
    /// Current pool state (Instance storage)
    State,
    /// Tick data: tick_index -> TickInfo (Persistent storage)
    Tick(i32),
    /// Tick bitmap: word_position -> 256-bit word (Persistent storage)
    TickBitmap(i32),
    /// Position data: PositionKey -> PositionInfo (Persistent storage)
    Position(PositionKey),
    /// Oracle ring buffer slot: index -> Observation (Persistent storage)
    Observation(u32),
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

/// Extend instance storage TTL
pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

/// Extend persistent storage TTL for a key
pub fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

// === Config ===

pub fn get_config(env: &Env) -> Result<PoolConfig, Error> {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn set_config(env: &Env, config: &PoolConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    extend_instance_ttl(env);
}

// === State ===

pub fn has_state(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::State)
}

/// Pool state; absent until the price is initialized
pub fn get_state(env: &Env) -> Result<PoolState, Error> {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::State)
        .ok_or(Error::NotInitialized)
}

pub fn set_state(env: &Env, state: &PoolState) {
    env.storage().instance().set(&DataKey::State, state);
    extend_instance_ttl(env);
}

// === Tick ===

pub fn get_tick(env: &Env, tick: i32) -> TickInfo {
    let key = DataKey::Tick(tick);
    match env.storage().persistent().get(&key) {
        Some(info) => {
            extend_persistent_ttl(env, &key);
            info
        }
        None => TickInfo::new(env),
    }
}

pub fn set_tick(env: &Env, tick: i32, info: &TickInfo) {
    let key = DataKey::Tick(tick);
    if info.liquidity_gross == 0 && !info.initialized {
        // Remove empty tick
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, info);
        extend_persistent_ttl(env, &key);
    }
}

pub fn remove_tick(env: &Env, tick: i32) {
    env.storage().persistent().remove(&DataKey::Tick(tick));
}

// === Tick Bitmap ===

pub fn get_tick_bitmap_word(env: &Env, word_pos: i32) -> ethnum::U256 {
    let key = DataKey::TickBitmap(word_pos);
    match env.storage().persistent().get::<_, U256>(&key) {
        Some(word) => {
            extend_persistent_ttl(env, &key);
            word.to_word()
        }
        None => ethnum::U256::ZERO,
    }
}

pub fn set_tick_bitmap_word(env: &Env, word_pos: i32, bitmap: ethnum::U256) {
    let key = DataKey::TickBitmap(word_pos);
    if bitmap == ethnum::U256::ZERO {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &bitmap.to_host(env));
        extend_persistent_ttl(env, &key);
    }
}

// === Position ===

pub fn get_position(env: &Env, key: &PositionKey) -> PositionInfo {
    let data_key = DataKey::Position(key.clone());
    match env.storage().persistent().get(&data_key) {
        Some(info) => {
            extend_persistent_ttl(env, &data_key);
            info
        }
        None => PositionInfo::new(env),
    }
}

pub fn set_position(env: &Env, key: &PositionKey, info: &PositionInfo) {
    let data_key = DataKey::Position(key.clone());
    if info.is_empty() {
        // Remove empty position
        env.storage().persistent().remove(&data_key);
    } else {
        env.storage().persistent().set(&data_key, info);
        extend_persistent_ttl(env, &data_key);
    }
}

// === Observations ===

pub fn get_observation(env: &Env, index: u32) -> Observation {
    let key = DataKey::Observation(index);
    match env.storage().persistent().get(&key) {
        Some(observation) => {
            extend_persistent_ttl(env, &key);
            observation
        }
        None => Observation::empty(env),
    }
}

pub fn set_observation(env: &Env, index: u32, observation: &Observation) {
    let key = DataKey::Observation(index);
    env.storage().persistent().set(&key, observation);
    extend_persistent_ttl(env, &key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::register_pool;
    use soroban_sdk::testutils::{storage::Persistent as _, Address as _, Ledger as _};
    use soroban_sdk::Address;

    // Leaves fewer ledgers than the extension threshold on entries written at the start
    const AGE: u32 = PERSISTENT_TTL_EXTEND - PERSISTENT_TTL_THRESHOLD / 2;

    #[test]
    fn test_reads_extend_persistent_ttl() {
        let env = Env::default();
        let pool = register_pool(&env, 60);
        let position = PositionKey {
            owner: Address::generate(&env),
            tick_lower: -60,
            tick_upper: 60,
        };

        env.as_contract(&pool, || {
            set_tick_bitmap_word(&env, -3, ethnum::U256::ONE);
            let mut info = PositionInfo::new(&env);
            info.liquidity = 10;
            set_position(&env, &position, &info);
            set_observation(&env, 0, &Observation::first(&env, 0));
        });

        env.ledger().with_mut(|l| l.sequence_number += AGE);

        env.as_contract(&pool, || {
            extend_instance_ttl(&env);
            let persistent = env.storage().persistent();
            assert!(persistent.get_ttl(&DataKey::TickBitmap(-3)) < PERSISTENT_TTL_THRESHOLD);

            assert_eq!(get_tick_bitmap_word(&env, -3), ethnum::U256::ONE);
            assert_eq!(get_position(&env, &position).liquidity, 10);
            assert!(get_observation(&env, 0).initialized);

            assert_eq!(persistent.get_ttl(&DataKey::TickBitmap(-3)), PERSISTENT_TTL_EXTEND);
            assert_eq!(
                persistent.get_ttl(&DataKey::Position(position.clone())),
                PERSISTENT_TTL_EXTEND
            );
            assert_eq!(persistent.get_ttl(&DataKey::Observation(0)), PERSISTENT_TTL_EXTEND);
        });
    }

    #[test]
    fn test_missing_entries_read_as_empty() {
        let env = Env::default();
        let pool = register_pool(&env, 60);
        env.as_contract(&pool, || {
            assert_eq!(get_tick_bitmap_word(&env, 7), ethnum::U256::ZERO);
            assert!(!get_observation(&env, 3).initialized);
        });
    }
}
