// Exact price/tick/sizing arithmetic. Everything that crosses into an
// on-chain integer goes through BigInt; floating point stays on the
// display-only paths in `tick`.

pub mod fee;
pub mod liquidity;
pub mod sqrt_price;
pub mod tick;

use ethers::types::U256;
use num_bigint::{BigInt, Sign};
use num_traits::{Pow, ToPrimitive};
use rust_decimal::Decimal;

use crate::error::Error;

pub(crate) fn pow10(exp: u32) -> BigInt {
    BigInt::from(10u8).pow(exp)
}

/// Split a non-negative `Decimal` into (mantissa, scale) so that the value
/// is mantissa / 10^scale.
pub(crate) fn decimal_parts(value: Decimal) -> (BigInt, u32) {
    (BigInt::from(value.mantissa()), value.scale())
}

pub(crate) fn bigint_to_u256(value: &BigInt) -> Result<U256, Error> {
    let (sign, bytes) = value.to_bytes_be();
    if sign == Sign::Minus || bytes.len() > 32 {
        return Err(Error::Overflow);
    }
    Ok(U256::from_big_endian(&bytes))
}

pub(crate) fn u256_to_bigint(value: U256) -> BigInt {
    let mut buf = [0u8; 32];
    value.to_big_endian(&mut buf);
    BigInt::from_bytes_be(Sign::Plus, &buf)
}

/// Convert a display-unit amount into smallest-unit integer form, rounding
/// down so the caller never commits more than requested.
pub fn to_base_units(amount: Decimal, decimals: u32) -> Result<U256, Error> {
    if amount.is_sign_negative() {
        return Err(Error::NegativeNotional(amount));
    }
    let (mantissa, scale) = decimal_parts(amount);
    let raw = (mantissa * pow10(decimals)) / pow10(scale);
    bigint_to_u256(&raw)
}

/// Convert a smallest-unit integer amount back into display units. Fails if
/// the amount has more significant digits than a `Decimal` can carry.
pub fn base_units_to_decimal(raw: U256, decimals: u8) -> Result<Decimal, Error> {
    let mantissa = u256_to_bigint(raw).to_i128().ok_or(Error::Overflow)?;
    if mantissa.unsigned_abs() >> 96 != 0 || u32::from(decimals) > 28 {
        return Err(Error::Overflow);
    }
    Ok(Decimal::from_i128_with_scale(mantissa, u32::from(decimals)).normalize())
}
