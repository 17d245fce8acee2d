use rust_decimal::Decimal;
use thiserror::Error;

/// Domain errors surfaced by the math and orchestration layers. Transport
/// and contract errors stay in their `ethers` types and are boxed alongside
/// these at the async boundaries.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown token symbol '{0}'")]
    UnknownToken(String),

    #[error("pair '{0}' is not of the form TOKEN/TOKEN")]
    MalformedPair(String),

    #[error("cannot use {0} for both sides of the operation")]
    SameToken(String),

    #[error("fee '{0}' is not one of the supported tiers (0.0005, 0.003, 0.01)")]
    UnsupportedFee(String),

    #[error("price must be positive, got {0}")]
    NonPositivePrice(Decimal),

    #[error("notional amount must not be negative, got {0}")]
    NegativeNotional(Decimal),

    #[error("value does not fit in the target numeric range")]
    Overflow,

    #[error("swap path must interleave n+1 tokens with n fees")]
    MalformedPath,

    #[error("pool creation receipt is missing the PoolCreated event")]
    PoolCreatedEventMissing,

    #[error("transaction was dropped before a receipt was produced")]
    ReceiptMissing,
}
