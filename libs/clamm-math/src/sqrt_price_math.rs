use crate::full_math::{div_rounding_up, mul_div, mul_div_rounding_up};
use clamm_types::{Error, MAX_U160, Q96};
use ethnum::U256;

/// Calculate amount0 delta for a price move from sqrt_ratio_a to sqrt_ratio_b
/// delta_x = L * (sqrt_pb - sqrt_pa) / (sqrt_pa * sqrt_pb)
pub fn get_amount0_delta(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, Error> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        (sqrt_ratio_b_x96, sqrt_ratio_a_x96)
    } else {
        (sqrt_ratio_a_x96, sqrt_ratio_b_x96)
    };

    if sqrt_ratio_lower == U256::ZERO {
        return Err(Error::DivisionByZero);
    }

    let numerator1 = U256::from(liquidity) << 96u32;
    let numerator2 = sqrt_ratio_upper - sqrt_ratio_lower;

    if round_up {
        div_rounding_up(
            mul_div_rounding_up(numerator1, numerator2, sqrt_ratio_upper)?,
            sqrt_ratio_lower,
        )
    } else {
        Ok(mul_div(numerator1, numerator2, sqrt_ratio_upper)? / sqrt_ratio_lower)
    }
}

/// Calculate amount1 delta for a price move from sqrt_ratio_a to sqrt_ratio_b
/// delta_y = L * (sqrt_pb - sqrt_pa)
pub fn get_amount1_delta(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, Error> {
    let diff = if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        sqrt_ratio_a_x96 - sqrt_ratio_b_x96
    } else {
        sqrt_ratio_b_x96 - sqrt_ratio_a_x96
    };

    if round_up {
        mul_div_rounding_up(U256::from(liquidity), diff, Q96)
    } else {
        mul_div(U256::from(liquidity), diff, Q96)
    }
}

/// Signed amount0 delta for a signed liquidity change.
/// Added liquidity is charged (rounded up), removed liquidity is paid out (rounded down, negative).
pub fn get_amount0_delta_signed(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: i128,
) -> Result<i128, Error> {
    let amount = get_amount0_delta(
        sqrt_ratio_a_x96,
        sqrt_ratio_b_x96,
        liquidity.unsigned_abs(),
        liquidity >= 0,
    )?;
    signed(amount, liquidity < 0)
}

/// Signed amount1 delta for a signed liquidity change
pub fn get_amount1_delta_signed(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: i128,
) -> Result<i128, Error> {
    let amount = get_amount1_delta(
        sqrt_ratio_a_x96,
        sqrt_ratio_b_x96,
        liquidity.unsigned_abs(),
        liquidity >= 0,
    )?;
    signed(amount, liquidity < 0)
}

fn signed(amount: U256, negative: bool) -> Result<i128, Error> {
    let value = crate::full_math::to_i128(amount)?;
    Ok(if negative { -value } else { value })
}

/// Get next sqrt price from an input amount of token0 or token1
/// Rounds so that the price never moves past what the input pays for.
pub fn get_next_sqrt_price_from_input(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount_in: U256,
    zero_for_one: bool,
) -> Result<U256, Error> {
    if sqrt_price_x96 == U256::ZERO {
        return Err(Error::SqrtPriceOutOfBounds);
    }
    if liquidity == 0 {
        return Err(Error::NoLiquidity);
    }

    if zero_for_one {
        get_next_sqrt_price_from_amount0_rounding_up(sqrt_price_x96, liquidity, amount_in, true)
    } else {
        get_next_sqrt_price_from_amount1_rounding_down(sqrt_price_x96, liquidity, amount_in, true)
    }
}

/// Get next sqrt price from an output amount
/// Rounds so that the price moves at least far enough to release the output.
pub fn get_next_sqrt_price_from_output(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount_out: U256,
    zero_for_one: bool,
) -> Result<U256, Error> {
    if sqrt_price_x96 == U256::ZERO {
        return Err(Error::SqrtPriceOutOfBounds);
    }
    if liquidity == 0 {
        return Err(Error::NoLiquidity);
    }

    if zero_for_one {
        get_next_sqrt_price_from_amount1_rounding_down(sqrt_price_x96, liquidity, amount_out, false)
    } else {
        get_next_sqrt_price_from_amount0_rounding_up(sqrt_price_x96, liquidity, amount_out, false)
    }
}

/// Calculate next sqrt price given a token0 amount
/// sqrt_price_next = L * sqrt_price / (L + amount * sqrt_price)  [if add]
/// sqrt_price_next = L * sqrt_price / (L - amount * sqrt_price)  [if remove]
fn get_next_sqrt_price_from_amount0_rounding_up(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> Result<U256, Error> {
    if amount == U256::ZERO {
        return Ok(sqrt_price_x96);
    }

    let numerator1 = U256::from(liquidity) << 96u32;
    let product = amount.checked_mul(sqrt_price_x96);

    if add {
        if let Some(denominator) = product.and_then(|p| numerator1.checked_add(p)) {
            return mul_div_rounding_up(numerator1, sqrt_price_x96, denominator);
        }
        // Equivalent form that cannot overflow: L / (L / sqrt_price + amount)
        let denominator = (numerator1 / sqrt_price_x96)
            .checked_add(amount)
            .ok_or(Error::PriceUnderflow)?;
        div_rounding_up(numerator1, denominator)
    } else {
        let product = match product {
            Some(p) if numerator1 > p => p,
            _ => return Err(Error::PriceOverflow),
        };
        let next = mul_div_rounding_up(numerator1, sqrt_price_x96, numerator1 - product)?;
        if next > MAX_U160 {
            return Err(Error::PriceOverflow);
        }
        Ok(next)
    }
}

/// Calculate next sqrt price given a token1 amount
/// sqrt_price_next = sqrt_price + amount / L  [if add]
/// sqrt_price_next = sqrt_price - amount / L  [if remove]
fn get_next_sqrt_price_from_amount1_rounding_down(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> Result<U256, Error> {
    let liquidity = U256::from(liquidity);
    if liquidity == U256::ZERO {
        return Err(Error::DivisionByZero);
    }

    if add {
        let quotient = if amount <= MAX_U160 {
            (amount << 96u32) / liquidity
        } else {
            mul_div(amount, Q96, liquidity)?
        };
        let next = sqrt_price_x96
            .checked_add(quotient)
            .ok_or(Error::PriceOverflow)?;
        if next > MAX_U160 {
            return Err(Error::PriceOverflow);
        }
        Ok(next)
    } else {
        let quotient = if amount <= MAX_U160 {
            div_rounding_up(amount << 96u32, liquidity)?
        } else {
            mul_div_rounding_up(amount, Q96, liquidity)?
        };
        if sqrt_price_x96 <= quotient {
            return Err(Error::PriceUnderflow);
        }
        Ok(sqrt_price_x96 - quotient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const E18: u128 = 1_000_000_000_000_000_000;

    /// sqrt(1.21) * 2^96
    fn price_121() -> U256 {
        U256::from(87150978765690771352898345369u128)
    }

    // === amount delta tests ===

    #[test]
    fn test_amount0_delta_zero_liquidity() {
        assert_eq!(get_amount0_delta(Q96, price_121(), 0, true), Ok(U256::ZERO));
    }

    #[test]
    fn test_amount0_delta_equal_prices() {
        assert_eq!(get_amount0_delta(Q96, Q96, E18, true), Ok(U256::ZERO));
    }

    #[test]
    fn test_amount0_delta_price_1_to_1_21() {
        let up = get_amount0_delta(Q96, price_121(), E18, true).unwrap();
        let down = get_amount0_delta(Q96, price_121(), E18, false).unwrap();
        assert_eq!(up, U256::from(90909090909090910u128));
        assert_eq!(down, up - U256::ONE);
    }

    #[test]
    fn test_amount1_delta_price_1_to_1_21() {
        let up = get_amount1_delta(Q96, price_121(), E18, true).unwrap();
        let down = get_amount1_delta(Q96, price_121(), E18, false).unwrap();
        assert_eq!(up, U256::from(100000000000000000u128));
        assert_eq!(down, up - U256::ONE);
    }

    #[test]
    fn test_amount_delta_order_independent() {
        assert_eq!(
            get_amount0_delta(price_121(), Q96, E18, true),
            get_amount0_delta(Q96, price_121(), E18, true)
        );
        assert_eq!(
            get_amount1_delta(price_121(), Q96, E18, false),
            get_amount1_delta(Q96, price_121(), E18, false)
        );
    }

    #[test]
    fn test_signed_deltas() {
        let added = E18 as i128;
        assert_eq!(
            get_amount0_delta_signed(Q96, price_121(), added),
            Ok(90909090909090910)
        );
        assert_eq!(
            get_amount0_delta_signed(Q96, price_121(), -added),
            Ok(-90909090909090909)
        );
        assert_eq!(
            get_amount1_delta_signed(Q96, price_121(), -added),
            Ok(-99999999999999999)
        );
    }

    // === next price tests ===

    #[test]
    fn test_next_price_from_input_zero_amount() {
        let amount = U256::ZERO;
        assert_eq!(get_next_sqrt_price_from_input(Q96, E18, amount, true), Ok(Q96));
        assert_eq!(get_next_sqrt_price_from_input(Q96, E18, amount, false), Ok(Q96));
    }

    #[test]
    fn test_next_price_from_input_rejects_zero_liquidity() {
        assert_eq!(
            get_next_sqrt_price_from_input(Q96, 0, U256::ONE, true),
            Err(Error::NoLiquidity)
        );
        assert_eq!(
            get_next_sqrt_price_from_output(U256::ZERO, 1, U256::ONE, true),
            Err(Error::SqrtPriceOutOfBounds)
        );
    }

    #[test]
    fn test_next_price_from_input_token1() {
        let amount = U256::from(E18 / 10);
        assert_eq!(
            get_next_sqrt_price_from_input(Q96, E18, amount, false),
            Ok(price_121())
        );
    }

    #[test]
    fn test_next_price_from_input_token0() {
        let amount = U256::from(E18 / 10);
        assert_eq!(
            get_next_sqrt_price_from_input(Q96, E18, amount, true),
            Ok(U256::from(72025602285694852357767227579u128))
        );
    }

    #[test]
    fn test_next_price_from_input_overflowing_product_falls_back() {
        // amount * price overflows; the result rounds up to the smallest price
        let amount = U256::MAX / Q96;
        assert_eq!(
            get_next_sqrt_price_from_input(Q96, 1, amount, true),
            Ok(U256::ONE)
        );
    }

    #[test]
    fn test_next_price_from_input_token1_overflow() {
        assert_eq!(
            get_next_sqrt_price_from_input(MAX_U160, 1024, U256::from(1024u32), false),
            Err(Error::PriceOverflow)
        );
    }

    #[test]
    fn test_next_price_from_output() {
        let amount = U256::from(E18 / 10);
        assert_eq!(
            get_next_sqrt_price_from_output(Q96, E18, amount, false),
            Ok(U256::from(88031291682515930659493278152u128))
        );
        assert_eq!(
            get_next_sqrt_price_from_output(Q96, E18, amount, true),
            Ok(U256::from(71305346262837903834189555302u128))
        );
    }

    #[test]
    fn test_next_price_from_output_exceeding_reserves() {
        // Output of token0 equal to all virtual reserves cannot be delivered
        let reserves0 = U256::from(4u32);
        assert_eq!(
            get_next_sqrt_price_from_output(U256::ONE << 96u32, 4, reserves0, false),
            Err(Error::PriceOverflow)
        );
        // Output of token1 equal to all virtual reserves cannot be delivered
        assert_eq!(
            get_next_sqrt_price_from_output(U256::ONE << 96u32, 4, U256::from(4u32), true),
            Err(Error::PriceUnderflow)
        );
    }
}
