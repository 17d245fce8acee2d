// Balanced two-sided deposit sizing.
//
// For a notional amount N (display units) at mid price P with token decimal
// scales d0/d1, the paired smallest-unit amounts are
//   token0 = floor(N * 10^d1 / P)
//   token1 = floor(N * 10^d0 * P)
// Both floor so a deposit never commits more funds than requested. The mid
// price is expected to come from the spacing-aligned tick, not the pool's
// raw sqrt price, so the center of the range sits exactly on the tick grid.

use ethers::types::U256;
use rust_decimal::Decimal;

use crate::error::Error;
use crate::math::{bigint_to_u256, decimal_parts, pow10};

pub fn size_liquidity(
    mid_price: Decimal,
    notional: Decimal,
    decimals0: u32,
    decimals1: u32,
) -> Result<(U256, U256), Error> {
    if mid_price.is_sign_negative() || mid_price.is_zero() {
        return Err(Error::NonPositivePrice(mid_price));
    }
    if notional.is_sign_negative() {
        return Err(Error::NegativeNotional(notional));
    }
    let (price_mantissa, price_scale) = decimal_parts(mid_price);
    let (notional_mantissa, notional_scale) = decimal_parts(notional);

    // N * 10^d1 / P  =  n_m * 10^(d1 + p_s) / (p_m * 10^n_s)
    let token0 = (&notional_mantissa * pow10(decimals1 + price_scale))
        / (&price_mantissa * pow10(notional_scale));
    // N * 10^d0 * P  =  n_m * p_m * 10^d0 / 10^(n_s + p_s)
    let token1 =
        (notional_mantissa * price_mantissa * pow10(decimals0)) / pow10(notional_scale + price_scale);

    Ok((bigint_to_u256(&token0)?, bigint_to_u256(&token1)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).expect("Failed to parse decimal literal")
    }

    #[test]
    fn test_unit_price_splits_evenly() {
        let (token0, token1) =
            size_liquidity(Decimal::ONE, Decimal::ONE, 18, 18).expect("Failed to size");
        let one_whole = U256::from_dec_str("1000000000000000000").expect("Failed to parse 1e18");
        assert_eq!(token0, one_whole);
        assert_eq!(token1, one_whole);
    }

    #[test]
    fn test_price_tilts_the_pair() {
        let (token0, token1) =
            size_liquidity(dec("2"), Decimal::ONE, 18, 18).expect("Failed to size");
        assert_eq!(token0, U256::from_dec_str("500000000000000000").expect("Failed to parse 5e17"));
        assert_eq!(token1, U256::from_dec_str("2000000000000000000").expect("Failed to parse 2e18"));
    }

    #[test]
    fn test_mixed_decimal_scales() {
        // 18/6-decimal pair at the 1:1-notional price 10^6 / 10^18 = 1e-12:
        // one notional unit maps to one whole token on each side.
        let (token0, token1) =
            size_liquidity(dec("0.000000000001"), Decimal::ONE, 18, 6).expect("Failed to size");
        assert_eq!(token0, U256::from_dec_str("1000000000000000000").expect("Failed to parse 1e18"));
        assert_eq!(token1, U256::from(1_000_000u64));
    }

    #[test]
    fn test_amounts_floor_never_round_up() {
        // 1 / 3 at 0 decimals floors to 0 on the token0 side.
        let (token0, token1) = size_liquidity(dec("3"), Decimal::ONE, 0, 0).expect("Failed to size");
        assert_eq!(token0, U256::zero());
        assert_eq!(token1, U256::from(3));
    }

    #[test]
    fn test_zero_notional_is_zero_amounts() {
        let (token0, token1) =
            size_liquidity(Decimal::ONE, Decimal::ZERO, 18, 18).expect("Failed to size");
        assert_eq!(token0, U256::zero());
        assert_eq!(token1, U256::zero());
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(size_liquidity(Decimal::ZERO, Decimal::ONE, 18, 18).is_err());
        assert!(size_liquidity(dec("-1"), Decimal::ONE, 18, 18).is_err());
        assert!(size_liquidity(Decimal::ONE, dec("-0.01"), 18, 18).is_err());
    }
}
