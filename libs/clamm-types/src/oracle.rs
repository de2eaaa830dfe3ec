use soroban_sdk::{contracttype, Env, U256};

/// One slot of the oracle ring buffer
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Observation {
    /// Ledger timestamp of the observation
    pub block_timestamp: u64,
    /// Tick integrated over time since pool initialization
    pub tick_cumulative: i64,
    /// Seconds elapsed per unit of in-range liquidity (Q128.128)
    pub seconds_per_liquidity_x128: U256,
    /// False for slots reserved by a cardinality increase but not yet written
    pub initialized: bool,
}

impl Observation {
    /// First observation, written when the pool price is initialized
    pub fn first(env: &Env, block_timestamp: u64) -> Self {
        Self {
            block_timestamp,
            tick_cumulative: 0,
            seconds_per_liquidity_x128: U256::from_u32(env, 0),
            initialized: true,
        }
    }

    /// Reserved, unwritten slot
    pub fn empty(env: &Env) -> Self {
        Self {
            block_timestamp: 0,
            tick_cumulative: 0,
            seconds_per_liquidity_x128: U256::from_u32(env, 0),
            initialized: false,
        }
    }
}
