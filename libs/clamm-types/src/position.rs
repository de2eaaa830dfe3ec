use soroban_sdk::{contracttype, Address, Env, U256};

/// Position key for pool-level tracking
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionKey {
    pub owner: Address,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

/// Position info stored in pool contract
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionInfo {
    /// Liquidity in this position
    pub liquidity: u128,
    /// Fee growth inside at last update (token0)
    pub fee_growth_inside_0_last_x128: U256,
    /// Fee growth inside at last update (token1)
    pub fee_growth_inside_1_last_x128: U256,
    /// Uncollected token0 (fees and burned principal)
    pub tokens_owed_0: u128,
    /// Uncollected token1 (fees and burned principal)
    pub tokens_owed_1: u128,
}

impl PositionInfo {
    pub fn new(env: &Env) -> Self {
        Self {
            liquidity: 0,
            fee_growth_inside_0_last_x128: U256::from_u32(env, 0),
            fee_growth_inside_1_last_x128: U256::from_u32(env, 0),
            tokens_owed_0: 0,
            tokens_owed_1: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.liquidity == 0 && self.tokens_owed_0 == 0 && self.tokens_owed_1 == 0
    }
}
