use std::str::FromStr;
use std::sync::Arc;

use ethers::types::Address;

use crate::chain::providers::{create_signer_client, EthClient};
use crate::chain::token::{FundingSource, RegisteredToken, TokenRegistry};
use crate::config::Config;

/// Everything a command needs for one run: the signing client plus the
/// parsed contract addresses and token table. Built once at startup and
/// passed explicitly; there is no ambient global state.
pub struct AppState {
    pub client: Arc<EthClient>,
    pub sender: Address,
    pub factory: Address,
    pub position_manager: Address,
    pub quoter: Address,
    pub tokens: TokenRegistry,
}

impl AppState {
    pub async fn new(config: &Config) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let client = create_signer_client(&config.node_rpc_url, &config.sender_key).await?;
        let sender = client.address();

        let mut entries = Vec::with_capacity(config.tokens.len());
        for token in &config.tokens {
            entries.push(RegisteredToken {
                symbol: token.symbol.to_string(),
                address: Address::from_str(token.address)?,
                funding: if token.wrapped_native {
                    FundingSource::WrappedNative
                } else {
                    FundingSource::Faucet
                },
            });
        }

        Ok(AppState {
            client,
            sender,
            factory: Address::from_str(&config.factory_address)?,
            position_manager: Address::from_str(&config.position_manager_address)?,
            quoter: Address::from_str(&config.quoter_address)?,
            tokens: TokenRegistry::new(entries),
        })
    }
}
