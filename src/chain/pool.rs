// Pool bootstrap: find or create the pool for an ordered pair and fee tier,
// initialize it if nobody has, and hand back a snapshot re-derived from the
// pool's own reports. Every classification reads the chain at call time, so
// re-running the whole flow against a live pool sends nothing.

use std::sync::Arc;

use ethers::abi::RawLog;
use ethers::contract::EthEvent;
use ethers::types::{Address, U256};
use log::{debug, info};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::chain::contracts::{
    PoolCreatedFilter, TestToken, UniswapV3Factory, UniswapV3Pool,
};
use crate::chain::providers::EthClient;
use crate::chain::token::{Token, TokenRegistry};
use crate::error::Error;
use crate::math::fee::{decode_fee, FeeTier};
use crate::math::sqrt_price::{price_to_sqrt_x96, sqrt_x96_to_price};

/// Where a (token0, token1, fee) pool stands before bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolStatus {
    /// The factory knows no pool for the triple.
    Missing,
    /// The pool contract exists but `initialize` has not been called.
    Uninitialized,
    /// Priced and unlocked; liquidity can be added.
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapStep {
    Create,
    Initialize,
}

/// Transition table of the bootstrap machine. A Ready pool plans zero
/// transactions, which is what makes the flow idempotent across runs.
pub fn bootstrap_steps(status: PoolStatus) -> &'static [BootstrapStep] {
    match status {
        PoolStatus::Missing => &[BootstrapStep::Create, BootstrapStep::Initialize],
        PoolStatus::Uninitialized => &[BootstrapStep::Initialize],
        PoolStatus::Ready => &[],
    }
}

/// Price of one whole token1 per whole token0, i.e. 10^decimals1 / 10^decimals0.
/// This is the default a fresh pool is initialized at.
pub fn one_for_one_price(decimals0: u8, decimals1: u8) -> Result<Decimal, Error> {
    let diff = i32::from(decimals1) - i32::from(decimals0);
    if diff.unsigned_abs() > 28 {
        return Err(Error::Overflow);
    }
    if diff >= 0 {
        Ok(Decimal::from_i128_with_scale(10i128.pow(diff as u32), 0))
    } else {
        Ok(Decimal::new(1, diff.unsigned_abs()))
    }
}

/// Snapshot of a ready pool. The token pair, fee and spacing come from the
/// pool's own reports, not from whatever order the caller supplied.
#[derive(Debug, Clone, Serialize)]
pub struct PoolInfo {
    pub address: Address,
    pub token0: Token,
    pub token1: Token,
    pub fee: Decimal,
    pub fee_ppm: u32,
    pub tick_spacing: i32,
    pub sqrt_price_x96: U256,
    pub price: Decimal,
    pub tick: i32,
    pub unlocked: bool,
}

/// Drive the pool for (token_a, token_b, fee) to Ready and return its info.
pub async fn ensure_pool(
    client: Arc<EthClient>,
    factory_address: Address,
    registry: &TokenRegistry,
    token_a: Address,
    token_b: Address,
    fee: FeeTier,
) -> Result<PoolInfo, Box<dyn std::error::Error + Send + Sync>> {
    let (token0, token1) = if token_a < token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    };
    let factory = UniswapV3Factory::new(factory_address, client.clone());

    let mut pool_address = factory.get_pool(token0, token1, fee.ppm()).call().await?;
    let status = if pool_address.is_zero() {
        PoolStatus::Missing
    } else {
        let pool = UniswapV3Pool::new(pool_address, client.clone());
        let (_, _, _, _, _, _, unlocked) = pool.slot_0().call().await?;
        if unlocked {
            PoolStatus::Ready
        } else {
            PoolStatus::Uninitialized
        }
    };
    debug!("pool status for fee {}: {:?}", fee, status);
    if status == PoolStatus::Ready {
        info!("found existing pool at {:?}", pool_address);
    }

    for step in bootstrap_steps(status) {
        match step {
            BootstrapStep::Create => {
                pool_address = create_pool(&factory, token0, token1, fee).await?;
            }
            BootstrapStep::Initialize => {
                initialize_pool(client.clone(), pool_address, token0, token1).await?;
            }
        }
    }

    get_pool_info(client, pool_address, registry).await
}

/// Submit `createPool` and recover the new address from the PoolCreated
/// event. The event is the only reliable source; the call's return value is
/// not observable from a transaction.
async fn create_pool(
    factory: &UniswapV3Factory<EthClient>,
    token0: Address,
    token1: Address,
    fee: FeeTier,
) -> Result<Address, Box<dyn std::error::Error + Send + Sync>> {
    info!("no pool exists for fee {}, creating one", fee);
    let receipt = factory
        .create_pool(token0, token1, fee.ppm())
        .send()
        .await?
        .await?
        .ok_or(Error::ReceiptMissing)?;
    let created = receipt
        .logs
        .iter()
        .find_map(|log| {
            let raw = RawLog {
                topics: log.topics.clone(),
                data: log.data.to_vec(),
            };
            PoolCreatedFilter::decode_log(&raw).ok()
        })
        .ok_or(Error::PoolCreatedEventMissing)?;
    info!("created pool {:?}", created.pool);
    Ok(created.pool)
}

/// Initialize a fresh pool at the 1:1-notional price for its pair.
/// `unlocked` is not re-read afterwards; a mined initialize is trusted.
async fn initialize_pool(
    client: Arc<EthClient>,
    pool_address: Address,
    token0: Address,
    token1: Address,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let contract0 = TestToken::new(token0, client.clone());
    let contract1 = TestToken::new(token1, client.clone());
    let decimals0_call = contract0.decimals();
    let decimals1_call = contract1.decimals();
    let (decimals0, decimals1) = tokio::try_join!(decimals0_call.call(), decimals1_call.call())?;

    let price = one_for_one_price(decimals0, decimals1)?;
    let sqrt_price = price_to_sqrt_x96(price)?;
    info!("initializing pool {:?} at 1:1 price {}", pool_address, price);
    let pool = UniswapV3Pool::new(pool_address, client);
    pool.initialize(sqrt_price)
        .send()
        .await?
        .await?
        .ok_or(Error::ReceiptMissing)?;
    Ok(())
}

/// Read a pool's full snapshot. The five pool views have no ordering
/// dependency, so they are issued together and awaited jointly.
pub async fn get_pool_info(
    client: Arc<EthClient>,
    pool_address: Address,
    registry: &TokenRegistry,
) -> Result<PoolInfo, Box<dyn std::error::Error + Send + Sync>> {
    let pool = UniswapV3Pool::new(pool_address, client.clone());
    let token0_call = pool.token_0();
    let token1_call = pool.token_1();
    let fee_call = pool.fee();
    let spacing_call = pool.tick_spacing();
    let slot0_call = pool.slot_0();
    let (token0_address, token1_address, fee_ppm, tick_spacing, slot0) = tokio::try_join!(
        token0_call.call(),
        token1_call.call(),
        fee_call.call(),
        spacing_call.call(),
        slot0_call.call(),
    )?;
    let (sqrt_price_x96, tick, _, _, _, _, unlocked) = slot0;

    let (token0, token1) = tokio::try_join!(
        resolve_token(client.clone(), registry, token0_address),
        resolve_token(client.clone(), registry, token1_address),
    )?;

    Ok(PoolInfo {
        address: pool_address,
        token0,
        token1,
        fee: decode_fee(fee_ppm),
        fee_ppm,
        tick_spacing,
        sqrt_price_x96,
        price: sqrt_x96_to_price(sqrt_price_x96)?,
        tick,
        unlocked,
    })
}

async fn resolve_token(
    client: Arc<EthClient>,
    registry: &TokenRegistry,
    address: Address,
) -> Result<Token, Box<dyn std::error::Error + Send + Sync>> {
    let (symbol, funding) = registry.describe(address);
    let decimals = TestToken::new(address, client).decimals().call().await?;
    Ok(Token {
        address,
        symbol,
        decimals,
        funding,
    })
}
