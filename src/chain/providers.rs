use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use std::sync::Arc;

/// Signing client used for every read and send in this tool. One key, one
/// nonce stream; the node serializes our transactions.
pub type EthClient = SignerMiddleware<Provider<Http>, LocalWallet>;

pub async fn create_signer_client(
    rpc_url: &str,
    private_key: &str,
) -> Result<Arc<EthClient>, Box<dyn std::error::Error + Send + Sync>> {
    let provider = Provider::<Http>::try_from(rpc_url)?;
    let chain_id = provider.get_chainid().await?;
    let wallet = private_key
        .parse::<LocalWallet>()?
        .with_chain_id(chain_id.as_u64());
    Ok(Arc::new(SignerMiddleware::new(provider, wallet)))
}
