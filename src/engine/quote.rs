// Swap quoting through the on-chain Quoter. Paths are the packed
// token/fee/token byte encoding the router family uses; exact-output paths
// are encoded from the buy side backwards.

use ethers::types::{Address, Bytes, U256};
use log::debug;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::bootstrap::AppState;
use crate::chain::contracts::{TestToken, UniswapV3Quoter};
use crate::chain::token::RegisteredToken;
use crate::error::Error;
use crate::math::fee::FeeTier;
use crate::math::{base_units_to_decimal, to_base_units};

/// Pack `tokens` and the fee between each adjacent pair into the wire path:
/// 20-byte address, 3-byte big-endian fee, 20-byte address, ...
pub fn encode_path(tokens: &[Address], fees: &[u32]) -> Result<Bytes, Error> {
    if tokens.is_empty() || tokens.len() != fees.len() + 1 {
        return Err(Error::MalformedPath);
    }
    let mut out = Vec::with_capacity(tokens.len() * 20 + fees.len() * 3);
    for (i, token) in tokens.iter().enumerate() {
        out.extend_from_slice(token.as_bytes());
        if i < fees.len() {
            let fee = fees[i];
            out.extend_from_slice(&[(fee >> 16) as u8, (fee >> 8) as u8, fee as u8]);
        }
    }
    Ok(Bytes::from(out))
}

#[derive(Debug, Clone, Serialize)]
pub struct QuoteSummary {
    pub sell_token: String,
    pub buy_token: String,
    pub fee: Decimal,
    pub exact_input: bool,
    pub amount_in: U256,
    pub amount_in_display: Decimal,
    pub amount_out: U256,
    pub amount_out_display: Decimal,
}

/// Expected buy-token output for an exact sell-token input.
pub async fn quote_exact_input(
    state: &AppState,
    sell: Address,
    buy: Address,
    fee: FeeTier,
    amount_in: U256,
) -> Result<U256, Box<dyn std::error::Error + Send + Sync>> {
    let path = encode_path(&[sell, buy], &[fee.ppm()])?;
    debug!("quoteExactInput path 0x{}", hex::encode(path.as_ref()));
    let quoter = UniswapV3Quoter::new(state.quoter, state.client.clone());
    Ok(quoter.quote_exact_input(path, amount_in).call().await?)
}

/// Expected sell-token input for an exact buy-token output.
pub async fn quote_exact_output(
    state: &AppState,
    sell: Address,
    buy: Address,
    fee: FeeTier,
    amount_out: U256,
) -> Result<U256, Box<dyn std::error::Error + Send + Sync>> {
    let path = encode_path(&[buy, sell], &[fee.ppm()])?;
    debug!("quoteExactOutput path 0x{}", hex::encode(path.as_ref()));
    let quoter = UniswapV3Quoter::new(state.quoter, state.client.clone());
    Ok(quoter.quote_exact_output(path, amount_out).call().await?)
}

/// Resolve decimals, convert the display amount, and run the requested
/// quote direction. Rejects same-token quotes before touching the network.
pub async fn run_quote(
    state: &AppState,
    sell: &RegisteredToken,
    buy: &RegisteredToken,
    fee: FeeTier,
    amount: Decimal,
    exact_input: bool,
) -> Result<QuoteSummary, Box<dyn std::error::Error + Send + Sync>> {
    if sell.address == buy.address {
        return Err(Error::SameToken(sell.symbol.clone()).into());
    }
    let sell_contract = TestToken::new(sell.address, state.client.clone());
    let buy_contract = TestToken::new(buy.address, state.client.clone());
    let sell_decimals_call = sell_contract.decimals();
    let buy_decimals_call = buy_contract.decimals();
    let (sell_decimals, buy_decimals) =
        tokio::try_join!(sell_decimals_call.call(), buy_decimals_call.call())?;

    let (amount_in, amount_out) = if exact_input {
        let amount_in = to_base_units(amount, u32::from(sell_decimals))?;
        let amount_out = quote_exact_input(state, sell.address, buy.address, fee, amount_in).await?;
        (amount_in, amount_out)
    } else {
        let amount_out = to_base_units(amount, u32::from(buy_decimals))?;
        let amount_in = quote_exact_output(state, sell.address, buy.address, fee, amount_out).await?;
        (amount_in, amount_out)
    };

    Ok(QuoteSummary {
        sell_token: sell.symbol.clone(),
        buy_token: buy.symbol.clone(),
        fee: fee.rate(),
        exact_input,
        amount_in,
        amount_in_display: base_units_to_decimal(amount_in, sell_decimals)?,
        amount_out,
        amount_out_display: base_units_to_decimal(amount_out, buy_decimals)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_hop_path_layout() {
        let sell = Address::from([0xaa; 20]);
        let buy = Address::from([0xbb; 20]);
        let path = encode_path(&[sell, buy], &[3_000]).expect("Failed to encode path");

        assert_eq!(path.len(), 43);
        assert_eq!(&path[0..20], sell.as_bytes());
        // 3000 ppm is 0x000bb8 in the 3-byte fee slot
        assert_eq!(&path[20..23], &[0x00, 0x0b, 0xb8]);
        assert_eq!(&path[23..43], buy.as_bytes());
    }

    #[test]
    fn test_multi_hop_path_layout() {
        let tokens = [
            Address::from([0x01; 20]),
            Address::from([0x02; 20]),
            Address::from([0x03; 20]),
        ];
        let path = encode_path(&tokens, &[500, 10_000]).expect("Failed to encode path");
        assert_eq!(path.len(), 20 * 3 + 3 * 2);
        assert_eq!(&path[20..23], &[0x00, 0x01, 0xf4]);
        assert_eq!(&path[43..46], &[0x00, 0x27, 0x10]);
    }

    #[test]
    fn test_path_rejects_mismatched_hops() {
        let token = Address::from([0x01; 20]);
        assert!(matches!(encode_path(&[], &[]), Err(Error::MalformedPath)));
        assert!(matches!(encode_path(&[token], &[3_000]), Err(Error::MalformedPath)));
        assert!(matches!(
            encode_path(&[token, token], &[3_000, 500]),
            Err(Error::MalformedPath)
        ));
    }
}
