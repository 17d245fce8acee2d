// Deposit orchestration: compute the tick window and paired amounts, make
// sure both tokens are funded and approved, then submit the mint. Sends run
// strictly in sequence; each depends on the effect of the previous one.

use std::sync::Arc;

use chrono::Utc;
use ethers::types::{Address, TxHash, U256};
use log::{debug, info};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::bootstrap::AppState;
use crate::chain::contracts::{MintParams, NonfungiblePositionManager};
use crate::chain::pool::PoolInfo;
use crate::chain::token::{ensure_allowance, ensure_funded};
use crate::error::Error;
use crate::math::liquidity::size_liquidity;
use crate::math::tick::{align_tick, tick_to_price};

pub const DEFAULT_DEADLINE_SECS: u64 = 600;

/// Caller-tunable knobs for one liquidity deposit. The minimums default to
/// zero, so the mint accepts whatever amounts the pool settles on; raise
/// them to get slippage protection.
#[derive(Debug, Clone)]
pub struct DepositRequest {
    /// Deposit size in display units.
    pub notional: Decimal,
    /// Shift of the deposit window, in spacings, from the current tick.
    pub tick_delta: i32,
    pub amount0_min: U256,
    pub amount1_min: U256,
    pub deadline_secs: u64,
}

impl DepositRequest {
    pub fn new(notional: Decimal, tick_delta: i32) -> Self {
        DepositRequest {
            notional,
            tick_delta,
            amount0_min: U256::zero(),
            amount1_min: U256::zero(),
            deadline_secs: DEFAULT_DEADLINE_SECS,
        }
    }
}

/// The two-spacing-wide window centered on the spacing-aligned tick and
/// shifted by `tick_delta` spacings. Both bounds land on the tick grid.
pub fn position_range(tick: i32, spacing: i32, tick_delta: i32) -> (i32, i32) {
    let price_tick = align_tick(tick, spacing);
    (
        price_tick + (tick_delta - 1) * spacing,
        price_tick + (tick_delta + 1) * spacing,
    )
}

#[derive(Debug, Clone, Serialize)]
pub struct DepositSummary {
    pub pool: Address,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub mid_price: Decimal,
    pub token0_amount: U256,
    pub token1_amount: U256,
    pub transaction_hash: TxHash,
}

pub async fn add_liquidity(
    state: &AppState,
    info: &PoolInfo,
    request: &DepositRequest,
) -> Result<DepositSummary, Box<dyn std::error::Error + Send + Sync>> {
    let price_tick = align_tick(info.tick, info.tick_spacing);
    let (tick_lower, tick_upper) = position_range(info.tick, info.tick_spacing, request.tick_delta);
    // The mid price is recomputed from the aligned tick, not taken from the
    // pool's raw sqrt price, so the center of the deposit matches the grid.
    let mid_price = Decimal::from_f64(tick_to_price(price_tick)).ok_or(Error::Overflow)?;
    let (token0_amount, token1_amount) = size_liquidity(
        mid_price,
        request.notional,
        u32::from(info.token0.decimals),
        u32::from(info.token1.decimals),
    )?;
    debug!(
        "sized {} {} / {} {} over ticks [{}, {}]",
        token0_amount, info.token0.symbol, token1_amount, info.token1.symbol, tick_lower, tick_upper
    );

    ensure_funded(state.client.clone(), &info.token0, token0_amount).await?;
    ensure_funded(state.client.clone(), &info.token1, token1_amount).await?;
    ensure_allowance(state.client.clone(), &info.token0, state.position_manager, token0_amount).await?;
    ensure_allowance(state.client.clone(), &info.token1, state.position_manager, token1_amount).await?;

    info!(
        "adding liquidity at mid price {} from {} ({}) to {} ({}) to pool {:?}",
        mid_price,
        tick_to_price(tick_lower),
        tick_lower,
        tick_to_price(tick_upper),
        tick_upper,
        info.address
    );
    let deadline = U256::from(Utc::now().timestamp() as u64 + request.deadline_secs);
    let manager = NonfungiblePositionManager::new(state.position_manager, state.client.clone());
    let receipt = manager
        .mint(MintParams {
            token_0: info.token0.address,
            token_1: info.token1.address,
            fee: info.fee_ppm,
            tick_lower,
            tick_upper,
            amount_0_desired: token0_amount,
            amount_1_desired: token1_amount,
            amount_0_min: request.amount0_min,
            amount_1_min: request.amount1_min,
            recipient: state.sender,
            deadline,
        })
        .send()
        .await?
        .await?
        .ok_or(Error::ReceiptMissing)?;

    Ok(DepositSummary {
        pool: info.address,
        tick_lower,
        tick_upper,
        mid_price,
        token0_amount,
        token1_amount,
        transaction_hash: receipt.transaction_hash,
    })
}
