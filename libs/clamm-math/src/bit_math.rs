use ethnum::U256;

/// Index of the most significant set bit. `x` must be non-zero.
pub fn most_significant_bit(x: U256) -> u32 {
    debug_assert!(x != U256::ZERO);
    255 - x.leading_zeros()
}

/// Index of the least significant set bit. `x` must be non-zero.
pub fn least_significant_bit(x: U256) -> u32 {
    debug_assert!(x != U256::ZERO);
    x.trailing_zeros()
}
