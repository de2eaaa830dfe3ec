use soroban_sdk::{contracttype, Address, Env, U256};

/// Current pool state - stored in Instance storage for frequent access
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    /// Current sqrt(price) as Q64.96
    pub sqrt_price_x96: U256,
    /// Current tick index
    pub tick: i32,
    /// False while a mutating operation holds the pool
    pub unlocked: bool,
    /// Total liquidity currently in range
    pub liquidity: u128,
    /// Fee growth global for token0 (Q128.128)
    pub fee_growth_global_0_x128: U256,
    /// Fee growth global for token1 (Q128.128)
    pub fee_growth_global_1_x128: U256,
    /// Protocol fees accumulated for token0
    pub protocol_fees_0: u128,
    /// Protocol fees accumulated for token1
    pub protocol_fees_1: u128,
    /// Protocol share of fees in basis points
    pub fee_protocol: u32,
    /// Index of the most recently written observation
    pub observation_index: u32,
    /// Number of populated slots in the observation ring buffer
    pub observation_cardinality: u32,
    /// Slot count the ring buffer grows to on its next wrap
    pub observation_cardinality_next: u32,
}

impl PoolState {
    pub fn new(env: &Env, sqrt_price_x96: U256, tick: i32) -> Self {
        Self {
            sqrt_price_x96,
            tick,
            unlocked: true,
            liquidity: 0,
            fee_growth_global_0_x128: U256::from_u32(env, 0),
            fee_growth_global_1_x128: U256::from_u32(env, 0),
            protocol_fees_0: 0,
            protocol_fees_1: 0,
            fee_protocol: 0,
            observation_index: 0,
            observation_cardinality: 1,
            observation_cardinality_next: 1,
        }
    }
}

/// Pool configuration - immutable after construction
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    /// Protocol fee authority
    pub admin: Address,
    /// Token0 address (lower address)
    pub token0: Address,
    /// Token1 address (higher address)
    pub token1: Address,
    /// Fee tier in hundredths of bps
    pub fee: u32,
    /// Tick spacing for this pool
    pub tick_spacing: i32,
    /// Maximum liquidity per tick
    pub max_liquidity_per_tick: u128,
    /// Optional reward-accounting contract told about liquidity changes
    pub notifier: Option<Address>,
}

// ============================================================================
// SWAP COMPUTATION TYPES
// Working values held in memory for the duration of one swap
// ============================================================================

/// Parameters for a swap operation
#[derive(Clone, Debug)]
pub struct SwapParams {
    /// True if swapping token0 for token1
    pub zero_for_one: bool,
    /// Positive for exact input, negative for exact output
    pub amount_specified: i128,
    /// Price limit for the swap
    pub sqrt_price_limit_x96: ethnum::U256,
}

/// Intermediate state during swap computation
#[derive(Clone, Debug)]
pub struct SwapState {
    /// Amount remaining to be swapped
    pub amount_remaining: i128,
    /// Cumulative amount of the other token
    pub amount_calculated: i128,
    /// Current sqrt price
    pub sqrt_price_x96: ethnum::U256,
    /// Current tick
    pub tick: i32,
    /// Current liquidity
    pub liquidity: u128,
    /// Fee growth accumulator for the input token
    pub fee_growth_global_x128: ethnum::U256,
    /// Protocol fee accrued in the input token
    pub protocol_fee: u128,
}

/// Complete result of a swap, before settlement
#[derive(Clone, Debug)]
pub struct SwapComputation {
    /// Final amount of token0 (positive = pool receives, negative = pool pays)
    pub amount0: i128,
    /// Final amount of token1 (positive = pool receives, negative = pool pays)
    pub amount1: i128,
    /// Final sqrt price after swap
    pub sqrt_price_x96: ethnum::U256,
    /// Final tick after swap
    pub tick: i32,
    /// Final liquidity after swap
    pub liquidity: u128,
    /// Updated fee growth global for the input token
    pub fee_growth_global_x128: ethnum::U256,
    /// Protocol fee accrued in the input token
    pub protocol_fee: u128,
    /// Initialized ticks that were crossed
    pub ticks_crossed: u32,
}
