use clap::{Parser, Subcommand};
use colored::Colorize;
use ethers::types::U256;
use rust_decimal::Decimal;

use pool_seeder::bootstrap::AppState;
use pool_seeder::chain::pool::ensure_pool;
use pool_seeder::config::Config;
use pool_seeder::engine::deposit::{add_liquidity, DepositRequest};
use pool_seeder::engine::quote::run_quote;
use pool_seeder::math::fee::FeeTier;

#[derive(Parser)]
#[command(name = "pool_seeder", about = "Bootstrap and probe Uniswap V3 test pools")]
struct Cli {
    /// Emit machine-readable JSON instead of console text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ensure a pool exists and is initialized, then deposit a balanced
    /// position around the current price.
    AddLiquidity {
        /// Token pair, e.g. WETH/WEENUS.
        #[arg(short, long, default_value = "WETH/WEENUS")]
        pair: String,
        /// Fee tier as a fraction: 0.0005, 0.003 or 0.01.
        #[arg(short, long, default_value = "0.003")]
        fee: FeeTier,
        /// Notional deposit size in display units.
        #[arg(short, long, default_value = "0.01")]
        amount: Decimal,
        /// Shift the deposit window this many spacings from the current tick.
        #[arg(short = 't', long, default_value_t = 0, allow_hyphen_values = true)]
        tick_delta: i32,
        /// Minimum accepted token0 amount in smallest units (0 = no slippage protection).
        #[arg(long, value_parser = parse_u256, default_value = "0")]
        amount0_min: U256,
        /// Minimum accepted token1 amount in smallest units (0 = no slippage protection).
        #[arg(long, value_parser = parse_u256, default_value = "0")]
        amount1_min: U256,
    },
    /// Ask the Quoter what a swap would cost or return.
    Quote {
        /// Token to sell.
        #[arg(short, long, default_value = "XEENUS")]
        sell: String,
        /// Token to buy.
        #[arg(short, long, default_value = "WETH")]
        buy: String,
        /// Fee tier as a fraction: 0.0005, 0.003 or 0.01.
        #[arg(short, long, default_value = "0.003")]
        fee: FeeTier,
        /// Amount in display units: of the buy token (exact-output, the
        /// default) or of the sell token with --exact-in.
        #[arg(short, long, default_value = "0.0075")]
        amount: Decimal,
        /// Quote an exact sell-token input instead of an exact buy-token output.
        #[arg(long)]
        exact_in: bool,
    },
}

fn parse_u256(s: &str) -> Result<U256, String> {
    U256::from_dec_str(s).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    let state = AppState::new(&config).await.map_err(|e| anyhow::anyhow!(e))?;

    if !cli.json {
        println!("Sender: {}", format!("{:?}", state.sender).bold().green());
    }

    match cli.command {
        Command::AddLiquidity {
            pair,
            fee,
            amount,
            tick_delta,
            amount0_min,
            amount1_min,
        } => {
            let (token_a, token_b) = state.tokens.pair(&pair)?;
            let info = ensure_pool(
                state.client.clone(),
                state.factory,
                &state.tokens,
                token_a.address,
                token_b.address,
                fee,
            )
            .await
            .map_err(|e| anyhow::anyhow!(e))?;

            let request = DepositRequest {
                amount0_min,
                amount1_min,
                ..DepositRequest::new(amount, tick_delta)
            };
            let summary = add_liquidity(&state, &info, &request)
                .await
                .map_err(|e| anyhow::anyhow!(e))?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "Pool {} ({}/{}, fee {})",
                    format!("{:?}", info.address).bold(),
                    info.token0.symbol.bold(),
                    info.token1.symbol.bold(),
                    info.fee.to_string().yellow(),
                );
                println!(
                    "Deposited {} {} and {} {} over ticks [{}, {}] at mid price {}",
                    summary.token0_amount,
                    info.token0.symbol.bold(),
                    summary.token1_amount,
                    info.token1.symbol.bold(),
                    summary.tick_lower,
                    summary.tick_upper,
                    summary.mid_price.to_string().yellow(),
                );
                println!("Mint transaction: {}", format!("{:?}", summary.transaction_hash).bold());
            }
        }
        Command::Quote {
            sell,
            buy,
            fee,
            amount,
            exact_in,
        } => {
            let sell_token = state.tokens.by_symbol(&sell)?.clone();
            let buy_token = state.tokens.by_symbol(&buy)?.clone();
            let summary = run_quote(&state, &sell_token, &buy_token, fee, amount, exact_in)
                .await
                .map_err(|e| anyhow::anyhow!(e))?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "Selling {} {} buys {} {} (fee {})",
                    summary.amount_in_display.to_string().yellow(),
                    summary.sell_token.bold(),
                    summary.amount_out_display.to_string().yellow(),
                    summary.buy_token.bold(),
                    summary.fee,
                );
            }
        }
    }

    if !cli.json {
        println!("{}", "Done!".green());
    }
    Ok(())
}
