use std::env;

// Defaults for the public test network this tool targets. Everything is
// overridable from the environment; the token table is fixed at build time.
const DEFAULT_FACTORY: &str = "0xb31b9A7b331eA8993bdfC67c650eDbfc9256eC62";
const DEFAULT_POSITION_MANAGER: &str = "0x29e4bF3bFD649b807B4C752c01023E535094F6Bc";
const DEFAULT_QUOTER: &str = "0x2F9e608FD881861B8916257B76613Cb22EE0652c";

/// Well-known token on the target test network.
#[derive(Debug, Clone)]
pub struct TokenEntry {
    pub symbol: &'static str,
    pub address: &'static str,
    pub wrapped_native: bool,
}

const KNOWN_TOKENS: [TokenEntry; 4] = [
    TokenEntry {
        symbol: "WETH",
        address: "0xc778417e063141139fce010982780140aa0cd5ab",
        wrapped_native: true,
    },
    TokenEntry {
        symbol: "WEENUS",
        address: "0x101848d5c5bbca18e6b4431eedf6b95e9adf82fa",
        wrapped_native: false,
    },
    TokenEntry {
        symbol: "XEENUS",
        address: "0x7e0480ca9fd50eb7a3855cf53c347a1b4d6a2ff5",
        wrapped_native: false,
    },
    TokenEntry {
        symbol: "YEENUS",
        address: "0xF6fF95D53E08c9660dC7820fD5A775484f77183A",
        wrapped_native: false,
    },
];

#[derive(Debug, Clone)]
pub struct Config {
    pub node_rpc_url: String,
    pub sender_key: String,
    pub factory_address: String,
    pub position_manager_address: String,
    pub quoter_address: String,
    pub tokens: Vec<TokenEntry>,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenv::dotenv().ok();

        Ok(Config {
            node_rpc_url: env::var("NODE_RPC").map_err(|_| "NODE_RPC must be set")?,
            sender_key: env::var("SENDER_KEY").map_err(|_| "SENDER_KEY must be set")?,
            factory_address: env::var("UNISWAP_V3_FACTORY")
                .unwrap_or_else(|_| DEFAULT_FACTORY.to_string()),
            position_manager_address: env::var("UNISWAP_V3_POSITION_MANAGER")
                .unwrap_or_else(|_| DEFAULT_POSITION_MANAGER.to_string()),
            quoter_address: env::var("UNISWAP_V3_QUOTER")
                .unwrap_or_else(|_| DEFAULT_QUOTER.to_string()),
            tokens: KNOWN_TOKENS.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_default_addresses_parse() {
        for address in [DEFAULT_FACTORY, DEFAULT_POSITION_MANAGER, DEFAULT_QUOTER] {
            assert!(ethers::types::Address::from_str(address).is_ok());
        }
        for token in KNOWN_TOKENS {
            assert!(ethers::types::Address::from_str(token.address).is_ok());
        }
    }

    #[test]
    fn test_exactly_one_wrapped_native_token() {
        let wrapped = KNOWN_TOKENS.iter().filter(|t| t.wrapped_native).count();
        assert_eq!(wrapped, 1);
    }
}
