// End-to-end checks over the pure side of the engine: the same numbers the
// add-liquidity command derives before it touches the network.

use std::str::FromStr;

use ethers::types::U256;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use pool_seeder::chain::pool::{bootstrap_steps, PoolStatus};
use pool_seeder::engine::deposit::position_range;
use pool_seeder::math::fee::FeeTier;
use pool_seeder::math::liquidity::size_liquidity;
use pool_seeder::math::sqrt_price::{price_to_sqrt_x96, sqrt_x96_to_price};
use pool_seeder::math::tick::{align_tick, tick_to_price};

/// The WETH/WEENUS walkthrough: fee 0.3% (spacing 60), pool initialized at
/// tick 0 with both tokens at 18 decimals, notional 0.01, tick delta 0.
#[test]
fn test_balanced_deposit_at_unit_price() {
    let tick = 0;
    let spacing = 60;
    let notional = Decimal::from_str("0.01").expect("Failed to parse notional");

    let (tick_lower, tick_upper) = position_range(tick, spacing, 0);
    assert_eq!((tick_lower, tick_upper), (-60, 60));

    let mid_price = Decimal::from_f64(tick_to_price(align_tick(tick, spacing)))
        .expect("Failed to convert mid price");
    assert_eq!(mid_price, Decimal::ONE);

    let (token0_amount, token1_amount) =
        size_liquidity(mid_price, notional, 18, 18).expect("Failed to size deposit");
    let expected = U256::from_dec_str("10000000000000000").expect("Failed to parse 1e16");
    assert_eq!(token0_amount, expected);
    assert_eq!(token1_amount, expected);

    assert_eq!(FeeTier::Medium.ppm(), 3_000);
}

#[test]
fn test_shifted_window_keeps_grid_alignment() {
    for delta in [-2, -1, 1, 3] {
        let (lower, upper) = position_range(87, 60, delta);
        assert!(lower < upper);
        assert_eq!(lower % 60, 0);
        assert_eq!(upper % 60, 0);
    }
}

#[test]
fn test_repeat_bootstrap_is_a_no_op() {
    // First run may create and initialize; the pool then classifies Ready
    // and the second run plans no transactions at all.
    let first = bootstrap_steps(PoolStatus::Missing);
    assert_eq!(first.len(), 2);
    let second = bootstrap_steps(PoolStatus::Ready);
    assert!(second.is_empty());
}

#[test]
fn test_initialize_price_survives_encoding_round_trip() {
    // The bootstrap encodes the 1:1 price before initialize; decoding the
    // encoded value must land back on the same price for even scales.
    let price = Decimal::ONE;
    let encoded = price_to_sqrt_x96(price).expect("Failed to encode");
    let decoded = sqrt_x96_to_price(encoded).expect("Failed to decode");
    assert_eq!(decoded, price);
}
