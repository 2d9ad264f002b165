//! solmint - Solana devnet wallet and SPL token toolkit
//!
//! Command-line front-end over the submission pipeline: balance and
//! token queries, airdrops, SOL transfers, mint creation, token minting,
//! and metadata-tagged token creation.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use solana_sdk::pubkey::Pubkey;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use solmint::config::Config;
use solmint::metadata::TokenMetadata;
use solmint::ops;
use solmint::ops::token::TokenSpec;
use solmint::pipeline::SubmitPipeline;
use solmint::rpc::{NetworkRpc, SolanaRpc};
use solmint::wallet::{LocalWallet, WalletSigner};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "solmint.toml")]
    config: String,

    /// RPC endpoint URL (overrides the config file)
    #[arg(long, env = "SOLMINT_RPC_URL")]
    url: Option<String>,

    /// Keypair file path (overrides the config file)
    #[arg(long, env = "SOLMINT_KEYPAIR")]
    keypair: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the SOL balance of the wallet (or another address)
    Balance {
        /// Address to query instead of the wallet
        #[arg(long)]
        address: Option<String>,
    },
    /// Request a devnet SOL airdrop and wait for confirmation
    Airdrop {
        /// Amount in SOL
        #[arg(long, default_value_t = 1.0)]
        sol: f64,
    },
    /// Send SOL to another wallet
    Transfer {
        /// Recipient address
        #[arg(long)]
        to: String,
        /// Amount in SOL
        #[arg(long)]
        sol: f64,
    },
    /// Create a new SPL token mint, optionally with an initial supply
    CreateMint {
        #[arg(long, default_value_t = 9)]
        decimals: u8,
        /// Initial supply in whole tokens (0 to skip minting)
        #[arg(long, default_value_t = 1000)]
        supply: u64,
    },
    /// Mint more tokens from an existing mint to the wallet's account
    MintTokens {
        /// Mint address
        #[arg(long)]
        mint: String,
        #[arg(long, default_value_t = 9)]
        decimals: u8,
        /// Amount in whole tokens
        #[arg(long)]
        amount: u64,
    },
    /// Create a token with on-chain metadata
    CreateToken {
        #[arg(long)]
        name: String,
        #[arg(long)]
        symbol: String,
        /// URI of the externally hosted metadata JSON
        #[arg(long)]
        uri: String,
        #[arg(long, default_value_t = 9)]
        decimals: u8,
        /// Initial supply in whole tokens (0 to skip minting)
        #[arg(long, default_value_t = 1000)]
        supply: u64,
    },
    /// List SPL token holdings with metadata
    ListTokens,
    /// Sign an arbitrary message with the wallet key
    SignMessage {
        #[arg(long)]
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config))?;
    if let Some(url) = cli.url {
        config.rpc.url = url;
    }
    if let Some(keypair) = cli.keypair {
        config.wallet.keypair_path = keypair;
    }
    debug!(url = %config.rpc.url, commitment = %config.rpc.commitment, "Configuration loaded");

    let commitment = config.rpc.commitment_config()?;
    let rpc = Arc::new(SolanaRpc::new(
        config.rpc.url.clone(),
        commitment,
        Duration::from_secs(config.rpc.timeout_secs),
    ));
    let pipeline = SubmitPipeline::new(
        rpc.clone() as Arc<dyn NetworkRpc>,
        config.submit.policy(),
    );
    let wallet: Arc<dyn WalletSigner> = Arc::new(
        LocalWallet::from_file(&config.wallet.keypair_path).with_context(|| {
            format!("Failed to load wallet from {}", config.wallet.keypair_path)
        })?,
    );
    anyhow::ensure!(wallet.is_connected(), "Wallet is not connected");

    match cli.command {
        Command::Balance { address } => {
            let address = match address {
                Some(a) => parse_pubkey(&a)?,
                None => wallet.pubkey(),
            };
            let report = ops::balance::balance(rpc.as_ref(), &address).await?;
            println!("Wallet: {}", report.address);
            println!("SOL balance: {} SOL ({} lamports)", report.sol(), report.lamports);
        }
        Command::Airdrop { sol } => {
            let signature =
                ops::airdrop::airdrop(&pipeline, rpc.as_ref(), &wallet.pubkey(), sol).await?;
            println!("Airdrop of {} SOL confirmed: {}", sol, signature);
        }
        Command::Transfer { to, sol } => {
            let recipient = parse_pubkey(&to)?;
            let receipt = ops::transfer::transfer_sol(&pipeline, wallet, recipient, sol).await?;
            println!("Sent {} SOL to {}", sol, receipt.recipient);
            println!("Signature: {}", receipt.signature);
        }
        Command::CreateMint { decimals, supply } => {
            let receipt =
                ops::mint::create_mint(&pipeline, rpc.as_ref(), wallet, decimals, supply).await?;
            println!("Mint address: {}", receipt.mint);
            println!("Token account: {}", receipt.ata);
            println!("Create signature: {}", receipt.create_signature);
            if let Some(signature) = receipt.mint_signature {
                println!("Minted {} tokens: {}", supply, signature);
            }
        }
        Command::MintTokens {
            mint,
            decimals,
            amount,
        } => {
            let mint = parse_pubkey(&mint)?;
            let receipt =
                ops::mint::mint_tokens(&pipeline, wallet, mint, decimals, amount).await?;
            println!("Minted {} tokens to {}", amount, receipt.ata);
            println!("Signature: {}", receipt.signature);
        }
        Command::CreateToken {
            name,
            symbol,
            uri,
            decimals,
            supply,
        } => {
            let spec = TokenSpec {
                metadata: TokenMetadata { name, symbol, uri },
                decimals,
                initial_supply: supply,
            };
            let receipt =
                ops::token::create_token_with_metadata(&pipeline, rpc.as_ref(), wallet, spec)
                    .await?;
            println!("Mint address: {}", receipt.mint);
            println!("Metadata account: {}", receipt.metadata_account);
            println!("Token account: {}", receipt.ata);
            if let Some(signature) = receipt.mint_signature {
                println!("Minted {} tokens: {}", supply, signature);
            }
        }
        Command::ListTokens => {
            let holdings = ops::list::list_tokens(rpc.as_ref(), &wallet.pubkey()).await?;
            if holdings.is_empty() {
                println!("No tokens found.");
            }
            for holding in holdings {
                println!("{} ({})", holding.name, holding.symbol);
                println!("  Mint:     {}", holding.mint);
                println!("  Account:  {}", holding.ata);
                println!(
                    "  Balance:  {} (raw {}, decimals {})",
                    holding.ui_amount(),
                    holding.raw_amount,
                    holding.decimals
                );
                if let Some(uri) = holding.uri {
                    println!("  Uri:      {}", uri);
                }
            }
        }
        Command::SignMessage { message } => {
            let signature = wallet.sign_message(message.as_bytes()).await?;
            println!("Signer: {}", wallet.pubkey());
            println!("Signature: {}", signature);
        }
    }

    Ok(())
}

fn parse_pubkey(s: &str) -> Result<Pubkey> {
    Pubkey::from_str(s).with_context(|| format!("Invalid address: {}", s))
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "solmint=debug" } else { "solmint=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
