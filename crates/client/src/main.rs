//! CLI for the Bidnox sealed-bid auction platform.
//!
//! This binary provides commands for:
//! - Creating and cancelling auctions
//! - Placing sealed bids and revealing them
//! - Querying auction and bid state
//! - Driving the mock chain's clock during testing

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use num_bigint::BigUint;
use tracing::info;

use bidnox_client::cache::ClassHashCache;
use bidnox_client::format::{
    duration_to_seconds, format_strk_amount, format_time_remaining, parse_strk_amount,
    shorten_address, DurationUnit,
};
use bidnox_client::query::{fetch_auctions, AuctionFilter};
use bidnox_client::validate::{ensure_sufficient_bid, validate_auction_form, AuctionForm};
use bidnox_client::{
    place_bid, reveal_bid, reveal_stored_bid, AuctionContract, RpcAuctionContract, SecretStore,
};
use bidnox_types::rpc::BlockInfo;
use bidnox_types::{Address, AuctionView};

#[derive(Parser)]
#[command(name = "bidnox")]
#[command(about = "CLI for the Bidnox sealed-bid auction platform")]
struct Cli {
    /// Auction node RPC endpoint
    #[arg(long, default_value = "http://127.0.0.1:9944")]
    rpc: String,

    /// Directory holding pending bid secrets
    #[arg(long, default_value = ".bidnox-secrets")]
    secret_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new auction
    CreateAuction {
        /// Seller address (hex)
        #[arg(long)]
        sender: String,

        /// Asset ID (decimal)
        #[arg(long)]
        asset_id: String,

        /// Starting price in STRK
        #[arg(long)]
        starting_price: String,

        /// Duration value
        #[arg(long)]
        duration: u64,

        /// Duration unit: minutes, hours, or days
        #[arg(long, default_value = "hours")]
        unit: String,
    },

    /// Place a sealed bid
    Bid {
        /// Bidder address (hex)
        #[arg(long)]
        sender: String,

        /// Auction ID
        #[arg(long)]
        auction_id: u64,

        /// Bid amount in STRK (kept secret until reveal)
        #[arg(long)]
        amount: String,
    },

    /// Reveal a previously placed bid
    Reveal {
        /// Bidder address (hex)
        #[arg(long)]
        sender: String,

        /// Auction ID
        #[arg(long)]
        auction_id: u64,

        /// Bid amount in STRK; defaults to the locally stored amount
        #[arg(long)]
        amount: Option<String>,

        /// Secret (hex); defaults to the locally stored secret
        #[arg(long)]
        secret: Option<String>,
    },

    /// Finalize an ended auction
    Finalize {
        /// Sender address (hex)
        #[arg(long)]
        sender: String,

        /// Auction ID
        #[arg(long)]
        auction_id: u64,
    },

    /// Cancel an auction (seller only)
    Cancel {
        /// Seller address (hex)
        #[arg(long)]
        sender: String,

        /// Auction ID
        #[arg(long)]
        auction_id: u64,
    },

    /// Get auction details
    GetAuction {
        /// Auction ID
        #[arg(long)]
        auction_id: u64,
    },

    /// List auctions
    ListAuctions {
        /// Filter: all, active, ended, or finalized
        #[arg(long, default_value = "all")]
        filter: String,
    },

    /// Get a bidder's sealed bid
    GetBid {
        /// Auction ID
        #[arg(long)]
        auction_id: u64,

        /// Bidder address (hex)
        #[arg(long)]
        bidder: String,
    },

    /// Check for a locally stored bid secret
    HasSecret {
        /// Auction ID
        #[arg(long)]
        auction_id: u64,

        /// Bidder address (hex)
        #[arg(long)]
        bidder: String,
    },

    /// Look up the class hash deployed at an address
    ClassHash {
        /// Contract address (hex)
        #[arg(long)]
        address: String,
    },

    /// Advance chain time (for testing)
    AdvanceBlock,

    /// Set chain timestamp (for testing)
    SetTimestamp {
        /// Unix timestamp to set
        #[arg(long)]
        timestamp: u64,
    },
}

async fn chain_now(client: &HttpClient) -> Result<u64> {
    let info: BlockInfo = client.request("chain_getBlockInfo", rpc_params![]).await?;
    Ok(info.timestamp)
}

fn parse_address(s: &str) -> Result<Address> {
    Address::from_hex(s).map_err(|e| anyhow!("invalid address {s:?}: {e}"))
}

fn print_auction(auction: &AuctionView, now: u64) {
    println!("Auction {}:", auction.auction_id);
    println!("  Status: {}", auction.status(now).label());
    println!("  Seller: {}", shorten_address(&auction.seller.to_string()));
    println!("  Asset ID: {}", auction.asset_id);
    println!(
        "  Starting Price: {} STRK",
        format_strk_amount(&auction.starting_price)
    );
    println!(
        "  Time Remaining: {}",
        format_time_remaining(Some(auction.end_time), now)
    );
    println!(
        "  Highest Bid: {} STRK",
        format_strk_amount(&auction.highest_bid)
    );
    if let Some(bidder) = &auction.highest_bidder {
        println!("  Highest Bidder: {}", shorten_address(&bidder.to_string()));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bidnox_client=info".parse().unwrap())
                .add_directive("bidnox=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let raw_client = HttpClientBuilder::default().build(&cli.rpc)?;
    let class_hashes = Arc::new(ClassHashCache::new());
    let contract = RpcAuctionContract::connect(&cli.rpc, Arc::clone(&class_hashes))?;
    let store = SecretStore::open(&cli.secret_dir)?;

    match cli.command {
        Commands::CreateAuction {
            sender,
            asset_id,
            starting_price,
            duration,
            unit,
        } => {
            let sender = parse_address(&sender)?;
            let unit = DurationUnit::from_str(&unit).map_err(|e| anyhow!(e))?;
            let duration_seconds = duration_to_seconds(duration, unit);

            let form = AuctionForm {
                asset_id,
                starting_price,
                duration: duration_seconds.to_string(),
            };
            let errors = validate_auction_form(&form);
            if !errors.is_valid() {
                let messages: Vec<String> = [errors.asset_id, errors.starting_price, errors.duration]
                    .into_iter()
                    .flatten()
                    .collect();
                return Err(anyhow!(messages.join("; ")));
            }

            let asset_id = BigUint::from_str(form.asset_id.trim())
                .map_err(|_| anyhow!("asset id must be a non-negative integer"))?;
            let price = parse_strk_amount(&form.starting_price);

            let created = contract
                .create_auction(&sender, &asset_id, &price, duration_seconds)
                .await?;

            info!(auction_id = created.auction_id, "auction created");
            println!("Auction ID: {}", created.auction_id);
            println!("Tx: {}", created.tx_hash);
        }

        Commands::Bid {
            sender,
            auction_id,
            amount,
        } => {
            let sender = parse_address(&sender)?;
            let amount = parse_strk_amount(&amount);

            let auction = contract
                .get_auction(auction_id)
                .await?
                .ok_or_else(|| anyhow!("auction {auction_id} not found"))?;
            ensure_sufficient_bid(&amount, &auction.starting_price)?;

            let placed = place_bid(&contract, &store, auction_id, &sender, &amount).await?;

            println!("Sealed bid placed");
            println!("  Auction ID: {auction_id}");
            println!("  Amount: {} STRK (kept local)", format_strk_amount(&amount));
            println!("  Commitment: {}", placed.commitment);
            println!("  Tx: {}", placed.receipt.tx_hash);
        }

        Commands::Reveal {
            sender,
            auction_id,
            amount,
            secret,
        } => {
            let sender = parse_address(&sender)?;
            let receipt = match (amount, secret) {
                (Some(amount), Some(secret)) => {
                    let amount = parse_strk_amount(&amount);
                    reveal_bid(&contract, &store, auction_id, &sender, &amount, &secret).await?
                }
                (None, None) => {
                    reveal_stored_bid(&contract, &store, auction_id, &sender).await?
                }
                _ => {
                    return Err(anyhow!(
                        "--amount and --secret must be given together or not at all"
                    ))
                }
            };

            println!("Bid revealed for auction {auction_id}");
            println!("  Tx: {}", receipt.tx_hash);
        }

        Commands::Finalize { sender, auction_id } => {
            let sender = parse_address(&sender)?;
            let receipt = contract.finalize_auction(&sender, auction_id).await?;
            println!("Auction {auction_id} finalized");
            println!("  Tx: {}", receipt.tx_hash);
        }

        Commands::Cancel { sender, auction_id } => {
            let sender = parse_address(&sender)?;
            let receipt = contract.cancel_auction(&sender, auction_id).await?;
            println!("Auction {auction_id} cancelled");
            println!("  Tx: {}", receipt.tx_hash);
        }

        Commands::GetAuction { auction_id } => {
            let now = chain_now(&raw_client).await?;
            match contract.get_auction(auction_id).await? {
                Some(auction) => print_auction(&auction, now),
                None => println!("Auction {auction_id} not found"),
            }
        }

        Commands::ListAuctions { filter } => {
            let filter = AuctionFilter::from_str(&filter).map_err(|e| anyhow!(e))?;
            let now = chain_now(&raw_client).await?;
            let list = fetch_auctions(&contract, filter, now).await?;

            if list.auctions.is_empty() {
                println!("No auctions found ({} total on chain)", list.total_count);
            } else {
                println!("Auctions ({}/{}):", list.auctions.len(), list.total_count);
                for auction in &list.auctions {
                    println!(
                        "  [{}] {} - {} STRK starting - {}",
                        auction.auction_id,
                        auction.status(now).label(),
                        format_strk_amount(&auction.starting_price),
                        format_time_remaining(Some(auction.end_time), now),
                    );
                }
            }
        }

        Commands::GetBid { auction_id, bidder } => {
            let bidder = parse_address(&bidder)?;
            match contract.get_bid(auction_id, &bidder).await? {
                Some(bid) => {
                    println!("Bid on auction {auction_id}:");
                    println!("  Bidder: {}", shorten_address(&bid.bidder.to_string()));
                    println!("  Commitment: {}", bid.commitment);
                    println!("  Revealed: {}", bid.revealed);
                    if let Some(amount) = &bid.amount {
                        println!("  Amount: {} STRK", format_strk_amount(amount));
                    }
                }
                None => println!("No bid from that address on auction {auction_id}"),
            }
        }

        Commands::HasSecret { auction_id, bidder } => {
            let bidder = parse_address(&bidder)?;
            if store.has(auction_id, &bidder) {
                println!("Secret stored for auction {auction_id}");
            } else {
                println!("No secret stored for auction {auction_id}");
            }
        }

        Commands::ClassHash { address } => {
            let address = parse_address(&address)?;
            match contract.class_hash_at(&address).await? {
                Some(hash) => println!("Class hash: {hash}"),
                None => println!("No contract deployed at {address}"),
            }
        }

        Commands::AdvanceBlock => {
            let info: BlockInfo = raw_client
                .request("admin_advanceBlock", rpc_params![])
                .await?;
            println!(
                "Block advanced: height={}, timestamp={}",
                info.height, info.timestamp
            );
        }

        Commands::SetTimestamp { timestamp } => {
            let _: bool = raw_client
                .request("admin_setTimestamp", rpc_params![timestamp])
                .await?;
            println!("Timestamp set to {timestamp}");
        }
    }

    Ok(())
}
