use std::fmt;
use std::str::FromStr;

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::Error;

/// The closed set of fee tiers a pool can be created with. The on-chain
/// representation is parts-per-million (rate * 1e6); tick spacing is fixed
/// per tier by the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeTier {
    /// 0.05%
    Low,
    /// 0.3%
    Medium,
    /// 1%
    High,
}

impl FeeTier {
    pub const ALL: [FeeTier; 3] = [FeeTier::Low, FeeTier::Medium, FeeTier::High];

    pub fn ppm(self) -> u32 {
        match self {
            FeeTier::Low => 500,
            FeeTier::Medium => 3_000,
            FeeTier::High => 10_000,
        }
    }

    pub fn rate(self) -> Decimal {
        decode_fee(self.ppm())
    }

    pub fn from_ppm(ppm: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.ppm() == ppm)
    }

    pub fn from_rate(rate: Decimal) -> Result<Self, Error> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.rate() == rate)
            .ok_or_else(|| Error::UnsupportedFee(rate.to_string()))
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rate())
    }
}

impl FromStr for FeeTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rate = Decimal::from_str(s).map_err(|_| Error::UnsupportedFee(s.to_string()))?;
        Self::from_rate(rate)
    }
}

/// rate -> ppm as floor(rate * 1e6). Exact only on the fixed fee set; any
/// other rate silently truncates. The CLI enumeration is the real gate, so
/// this stays permissive like the contracts it talks to.
pub fn encode_fee(fee: Decimal) -> u32 {
    (fee * Decimal::from(1_000_000u32))
        .floor()
        .to_u32()
        .unwrap_or_default()
}

/// ppm -> rate, the exact inverse of `encode_fee` on the fixed fee set.
pub fn decode_fee(ppm: u32) -> Decimal {
    Decimal::new(i64::from(ppm), 6).normalize()
}
