use soroban_sdk::contracterror;

/// Errors returned by the pool and the math kernel.
///
/// Every contract entry point returns `Result<_, Error>`; an `Err` aborts the
/// invocation and discards all of its storage writes.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // Initialization errors (100-199)
    /// Pool price has already been initialized
    AlreadyInitialized = 100,
    /// Pool price has not been initialized
    NotInitialized = 101,

    // Validation errors (200-299)
    /// token0 must sort before token1
    InvalidTokenOrder = 200,
    /// Fee must be in (0, 1_000_000)
    InvalidFee = 201,
    /// Tick spacing must be in (0, 16384]
    InvalidTickSpacing = 202,
    /// Lower tick must be below upper tick
    InvalidTickRange = 203,
    /// Lower tick below MIN_TICK
    TickLowerTooLow = 204,
    /// Upper tick above MAX_TICK
    TickUpperTooHigh = 205,
    /// Tick is not a multiple of the tick spacing
    TickNotOnSpacing = 206,
    /// Tick outside [MIN_TICK, MAX_TICK]
    TickOutOfBounds = 207,
    /// Sqrt price outside [MIN_SQRT_RATIO, MAX_SQRT_RATIO)
    SqrtPriceOutOfBounds = 208,
    /// Amount must be non-zero
    AmountZero = 209,
    /// Price limit on the wrong side of the current price or out of range
    InvalidPriceLimit = 210,
    /// Protocol fee share above MAX_FEE_PROTOCOL
    InvalidFeeProtocol = 211,

    // Liquidity errors (300-399)
    /// Gross liquidity at a tick would exceed the per-tick maximum
    LiquidityOverflow = 300,
    /// Liquidity would go below zero
    LiquidityUnderflow = 301,
    /// Zero-liquidity update on a position that holds no liquidity
    NoPosition = 302,
    /// Pool has no active liquidity
    NoLiquidity = 303,

    // Funding errors (500-599)
    /// Swap callback did not deliver the owed input amount
    InsufficientInputAmount = 500,
    /// Flash callback did not repay token0 principal plus fee
    FlashNotRepaid0 = 501,
    /// Flash callback did not repay token1 principal plus fee
    FlashNotRepaid1 = 502,

    // Locking errors (600-699)
    /// Pool is locked by an operation in progress
    Locked = 600,

    // Math errors (700-799)
    /// Arithmetic overflow
    Overflow = 701,
    /// Division by zero
    DivisionByZero = 702,
    /// mul_div result does not fit in 256 bits
    MulDivOverflow = 703,
    /// Next sqrt price does not fit in 160 bits
    PriceOverflow = 704,
    /// Next sqrt price would reach zero
    PriceUnderflow = 705,

    // Oracle errors (800-899)
    /// Requested time is older than the oldest observation
    ObservationTooOld = 800,
    /// Oracle has no observations
    OracleUninitialized = 801,
}
