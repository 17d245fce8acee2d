// Q64.96 square-root price codec.
//
// Pools store price as floor(2^96 * sqrt(price)) in a uint160 and compare
// the encoded value verbatim on initialize, so the forward direction must be
// exact integer arithmetic that never rounds up. With price = m / 10^s the
// identity floor(sqrt(A) / B) == floor(isqrt(A) / B) gives
//   floor(2^96 * sqrt(m / 10^s)) = isqrt(m * 2^192 * 10^s) / 10^s
// entirely on BigInt.

use ethers::types::U256;
use num_integer::Roots;
use num_traits::{One, ToPrimitive, Zero};
use rust_decimal::Decimal;

use num_bigint::BigInt;

use crate::error::Error;
use crate::math::{bigint_to_u256, decimal_parts, pow10, u256_to_bigint};

/// Number of fractional bits in the Q64.96 encoding.
pub const Q96_SHIFT: u32 = 96;

/// floor(2^96 * sqrt(price)).
pub fn price_to_sqrt_x96(price: Decimal) -> Result<U256, Error> {
    if price.is_sign_negative() || price.is_zero() {
        return Err(Error::NonPositivePrice(price));
    }
    let (mantissa, scale) = decimal_parts(price);
    let radicand = (mantissa << (2 * Q96_SHIFT)) * pow10(scale);
    bigint_to_u256(&(radicand.sqrt() / pow10(scale)))
}

/// (sqrt_price_x96 / 2^96)^2, truncated to Decimal's 28 significant digits.
/// Inverse of `price_to_sqrt_x96` only up to the floor performed there; the
/// round trip is approximate, not bit-exact.
pub fn sqrt_x96_to_price(sqrt_price_x96: U256) -> Result<Decimal, Error> {
    let sqrt = u256_to_bigint(sqrt_price_x96);
    let numerator = &sqrt * &sqrt;
    let denominator = BigInt::one() << (2 * Q96_SHIFT);

    let integer_part = &numerator / &denominator;
    let integer_digits = if integer_part.is_zero() {
        0
    } else {
        integer_part.to_string().len()
    };
    if integer_digits > 28 {
        return Err(Error::Overflow);
    }

    let frac_digits = 28 - integer_digits as u32;
    let scaled = (numerator * pow10(frac_digits)) / denominator;
    let scaled = scaled.to_i128().ok_or(Error::Overflow)?;
    Ok(Decimal::from_i128_with_scale(scaled, frac_digits).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).expect("Failed to parse decimal literal")
    }

    #[test]
    fn test_unit_price_encodes_to_two_pow_96() {
        let encoded = price_to_sqrt_x96(Decimal::ONE).expect("Failed to encode price 1");
        let expected =
            U256::from_dec_str("79228162514264337593543950336").expect("Failed to parse 2^96");
        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_perfect_square_prices_encode_exactly() {
        let encoded = price_to_sqrt_x96(dec("4")).expect("Failed to encode price 4");
        let expected =
            U256::from_dec_str("158456325028528675187087900672").expect("Failed to parse 2^97");
        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_extreme_decimal_ratio_prices_encode() {
        // 1e18 / 1e-18: the decimal-scale extremes from 18/0-decimal pairs.
        let big = price_to_sqrt_x96(dec("1000000000000000000")).expect("Failed to encode 1e18");
        let expected = U256::from_dec_str("79228162514264337593543950336000000000")
            .expect("Failed to parse 2^96 * 1e9");
        assert_eq!(big, expected);

        let small =
            price_to_sqrt_x96(dec("0.000000000000000001")).expect("Failed to encode 1e-18");
        // floor(2^96 / 1e9)
        assert_eq!(
            small,
            U256::from_dec_str("79228162514264337593").expect("Failed to parse expected")
        );
    }

    #[test]
    fn test_rejects_non_positive_prices() {
        assert!(price_to_sqrt_x96(Decimal::ZERO).is_err());
        assert!(price_to_sqrt_x96(dec("-1")).is_err());
    }

    #[test]
    fn test_decode_of_two_pow_96_is_one() {
        let one = sqrt_x96_to_price(
            U256::from_dec_str("79228162514264337593543950336").expect("Failed to parse 2^96"),
        )
        .expect("Failed to decode");
        assert_eq!(one, Decimal::ONE);
    }

    #[test]
    fn test_round_trip_stays_within_floor_tolerance() {
        // The only loss is the one-unit floor at 2^96 scale, which is worst
        // for tiny prices where the encoded sqrt is small.
        let cases = ["0.000000000000000001", "0.0075", "0.997", "1", "1234.5678", "1000000000000000000"];
        let tolerance = dec("0.000000001");
        for case in cases {
            let price = dec(case);
            let decoded = sqrt_x96_to_price(
                price_to_sqrt_x96(price).expect("Failed to encode price"),
            )
            .expect("Failed to decode price");
            let relative = ((decoded - price) / price).abs();
            assert!(
                relative < tolerance,
                "round trip of {} drifted by {}",
                price,
                relative
            );
        }
    }

    #[test]
    fn test_round_trip_is_exact_on_even_powers() {
        for case in ["1", "4", "1000000000000000000"] {
            let price = dec(case);
            let decoded = sqrt_x96_to_price(
                price_to_sqrt_x96(price).expect("Failed to encode price"),
            )
            .expect("Failed to decode price");
            assert_eq!(decoded, price);
        }
    }

    #[test]
    fn test_decode_zero_sqrt_price() {
        assert_eq!(
            sqrt_x96_to_price(U256::zero()).expect("Failed to decode zero"),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_decode_overflow_is_reported() {
        // (2^256 / 2^96)^2 has far more than 28 integer digits.
        assert!(sqrt_x96_to_price(U256::MAX).is_err());
    }
}
