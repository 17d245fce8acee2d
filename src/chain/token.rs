// Token registry plus the two funding paths behind one "ensure balance"
// operation: test tokens drip from a faucet, the wrapped-native asset is
// topped up by depositing value.

use std::sync::Arc;

use ethers::types::{Address, U256};
use log::{debug, info, warn};
use serde::Serialize;

use crate::chain::contracts::TestToken;
use crate::chain::providers::EthClient;
use crate::error::Error;

/// How a token can be funded on the test network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingSource {
    /// Test token with a free `drip()` faucet.
    Faucet,
    /// Wrapped native asset funded by `deposit()`ing value.
    WrappedNative,
}

/// A well-known token as configured, before any chain reads.
#[derive(Debug, Clone)]
pub struct RegisteredToken {
    pub symbol: String,
    pub address: Address,
    pub funding: FundingSource,
}

/// A pool token with its chain-reported decimal scale attached.
#[derive(Debug, Clone, Serialize)]
pub struct Token {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    pub funding: FundingSource,
}

/// The fixed table of well-known tokens, injected from configuration.
#[derive(Debug, Clone)]
pub struct TokenRegistry {
    entries: Vec<RegisteredToken>,
}

impl TokenRegistry {
    pub fn new(entries: Vec<RegisteredToken>) -> Self {
        TokenRegistry { entries }
    }

    pub fn by_symbol(&self, symbol: &str) -> Result<&RegisteredToken, Error> {
        self.entries
            .iter()
            .find(|entry| entry.symbol.eq_ignore_ascii_case(symbol))
            .ok_or_else(|| Error::UnknownToken(symbol.to_string()))
    }

    /// Symbol and funding source for an address the chain handed back.
    /// Addresses outside the table display as hex and fund via the faucet.
    pub fn describe(&self, address: Address) -> (String, FundingSource) {
        match self.entries.iter().find(|entry| entry.address == address) {
            Some(entry) => (entry.symbol.clone(), entry.funding),
            None => (format!("{address:?}"), FundingSource::Faucet),
        }
    }

    /// Resolve "A/B" into two distinct tokens sorted ascending by address,
    /// the canonical token0/token1 order pools use.
    pub fn pair(&self, spec: &str) -> Result<(RegisteredToken, RegisteredToken), Error> {
        let mut parts = spec.split('/');
        let (first, second) = match (parts.next(), parts.next(), parts.next()) {
            (Some(a), Some(b), None) => (a, b),
            _ => return Err(Error::MalformedPair(spec.to_string())),
        };
        let a = self.by_symbol(first)?.clone();
        let b = self.by_symbol(second)?.clone();
        if a.address == b.address {
            return Err(Error::SameToken(a.symbol));
        }
        if a.address < b.address {
            Ok((a, b))
        } else {
            Ok((b, a))
        }
    }
}

/// Faucet grants needed to cover `shortfall` at `grant` units per drip.
fn drips_needed(shortfall: U256, grant: U256) -> U256 {
    (shortfall + grant - U256::one()) / grant
}

/// Make sure the sender holds at least `required` of `token`, dripping from
/// the faucet or wrapping native value as the token demands. The faucet loop
/// only ends once the balance suffices; a faucet that never grants keeps it
/// spinning.
pub async fn ensure_funded(
    client: Arc<EthClient>,
    token: &Token,
    required: U256,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let contract = TestToken::new(token.address, client.clone());
    let sender = client.address();
    let mut balance = contract.balance_of(sender).call().await?;
    if balance >= required {
        debug!("{} balance {} already covers {}", token.symbol, balance, required);
        return Ok(());
    }
    match token.funding {
        FundingSource::Faucet => {
            while balance < required {
                info!("dripping {} (balance {}, need {})", token.symbol, balance, required);
                contract
                    .drip()
                    .send()
                    .await?
                    .await?
                    .ok_or(Error::ReceiptMissing)?;
                let refreshed = contract.balance_of(sender).call().await?;
                if refreshed > balance && refreshed < required {
                    let grant = refreshed - balance;
                    debug!(
                        "faucet granted {}, about {} more drips to go",
                        grant,
                        drips_needed(required - refreshed, grant)
                    );
                } else if refreshed == balance {
                    warn!("drip for {} granted nothing, retrying", token.symbol);
                }
                balance = refreshed;
            }
        }
        FundingSource::WrappedNative => {
            let shortfall = required - balance;
            info!("wrapping {} native units into {}", shortfall, token.symbol);
            contract
                .deposit()
                .value(shortfall)
                .send()
                .await?
                .await?
                .ok_or(Error::ReceiptMissing)?;
        }
    }
    Ok(())
}

/// Make sure `spender` may move at least `min_amount` of `token` for the
/// sender. Grants the maximum allowance so one approval lasts forever.
pub async fn ensure_allowance(
    client: Arc<EthClient>,
    token: &Token,
    spender: Address,
    min_amount: U256,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let contract = TestToken::new(token.address, client.clone());
    let owner = client.address();
    let allowance = contract.allowance(owner, spender).call().await?;
    if allowance >= min_amount {
        debug!("{} allowance for {:?} already suffices", token.symbol, spender);
        return Ok(());
    }
    info!("approving {:?} to spend {}", spender, token.symbol);
    contract
        .approve(spender, U256::MAX)
        .send()
        .await?
        .await?
        .ok_or(Error::ReceiptMissing)?;
    Ok(())
}
