//! CLI for content-collectible auctions.
//!
//! This binary provides commands for:
//! - Generating authorizer keys and signing capability envelopes
//! - Starting, bidding on, settling, and cancelling auctions
//! - Querying auction state and the event log
//! - Driving the dev server's clock and faucet

use anyhow::Result;
use clap::{Parser, Subcommand};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use serde::{Deserialize, Serialize};
use tracing::info;

use auction_client::{authorize_bid, authorize_cancel, authorize_start, parse_signing_key};
use auction_crypto::{generate_signing_key, identity_of};
use auction_types::{Address, AuctionConfig, AuctionParams, AuthorizationEnvelope};

#[derive(Parser)]
#[command(name = "auction-cli")]
#[command(about = "CLI for content-collectible auctions")]
struct Cli {
    /// Auction service RPC endpoint
    #[arg(long, default_value = "http://127.0.0.1:9944")]
    rpc: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an authorizer keypair
    Keygen,

    /// Start an auction with its opening bid
    Start {
        /// Sender address (hex); pays and holds the opening bid
        #[arg(long)]
        sender: String,

        /// Authorizer signing key (hex secret)
        #[arg(long)]
        key: String,

        /// Content id (hex)
        #[arg(long)]
        content: String,

        /// Creator payout address (hex)
        #[arg(long)]
        creator: String,

        /// Creator account id
        #[arg(long)]
        creator_id: u64,

        /// Bidder account id
        #[arg(long)]
        bidder_id: u64,

        /// Opening bid amount
        #[arg(long)]
        amount: u64,

        /// Minimum opening bid
        #[arg(long, default_value = "1000000")]
        min_bid: u64,

        /// Outbid increment in basis points
        #[arg(long, default_value = "1000")]
        increment_bps: u32,

        /// Protocol fee in basis points
        #[arg(long, default_value = "1000")]
        fee_bps: u32,

        /// Auction duration in seconds
        #[arg(long, default_value = "86400")]
        duration: u64,

        /// Anti-snipe extension in seconds
        #[arg(long, default_value = "900")]
        extension: u64,

        /// Anti-snipe window in seconds
        #[arg(long, default_value = "900")]
        extension_threshold: u64,

        /// Authorization validity in seconds from now
        #[arg(long, default_value = "3600")]
        ttl: u64,
    },

    /// Outbid the current highest bid
    Bid {
        /// Sender address (hex)
        #[arg(long)]
        sender: String,

        /// Authorizer signing key (hex secret)
        #[arg(long)]
        key: String,

        /// Content id (hex)
        #[arg(long)]
        content: String,

        /// Bidder account id
        #[arg(long)]
        bidder_id: u64,

        /// Bid amount
        #[arg(long)]
        amount: u64,

        /// Authorization validity in seconds from now
        #[arg(long, default_value = "3600")]
        ttl: u64,
    },

    /// Settle an ended auction
    Settle {
        /// Sender address (hex)
        #[arg(long)]
        sender: String,

        /// Content id (hex)
        #[arg(long)]
        content: String,
    },

    /// Settle several ended auctions atomically
    BatchSettle {
        /// Sender address (hex)
        #[arg(long)]
        sender: String,

        /// Content ids (hex, comma-separated)
        #[arg(long)]
        contents: String,
    },

    /// Cancel an active auction
    Cancel {
        /// Sender address (hex)
        #[arg(long)]
        sender: String,

        /// Authorizer signing key (hex secret)
        #[arg(long)]
        key: String,

        /// Content id (hex)
        #[arg(long)]
        content: String,

        /// Authorization validity in seconds from now
        #[arg(long, default_value = "3600")]
        ttl: u64,
    },

    /// Get auction details
    GetAuction {
        /// Content id (hex)
        #[arg(long)]
        content: String,
    },

    /// Get the lifecycle phase of a content id
    Phase {
        /// Content id (hex)
        #[arg(long)]
        content: String,
    },

    /// Get the smallest acceptable next bid
    MinNextBid {
        /// Content id (hex)
        #[arg(long)]
        content: String,
    },

    /// List all active auctions
    ListActive,

    /// Get the global config
    GetConfig,

    /// Get the total escrowed funds
    EscrowTotal,

    /// Get emitted events
    Events {
        /// Content id filter (hex)
        #[arg(long)]
        content: Option<String>,
    },

    /// Get the ledger balance of an address
    Balance {
        /// Address (hex)
        #[arg(long)]
        address: String,
    },

    /// Get the owner of a minted collectible
    Owner {
        /// Content id (hex)
        #[arg(long)]
        content: String,
    },

    /// Register an authorizer identity (admin)
    AllowAuthorizer {
        /// Admin sender address (hex)
        #[arg(long)]
        sender: String,

        /// Authorizer identity (hex)
        #[arg(long)]
        authorizer: String,
    },

    /// Remove an authorizer identity (admin)
    DenyAuthorizer {
        /// Admin sender address (hex)
        #[arg(long)]
        sender: String,

        /// Authorizer identity (hex)
        #[arg(long)]
        authorizer: String,
    },

    /// Change the protocol-fee recipient (admin)
    SetTreasury {
        /// Admin sender address (hex)
        #[arg(long)]
        sender: String,

        /// Treasury address (hex)
        #[arg(long)]
        treasury: String,
    },

    /// Replace the global config (admin)
    SetConfig {
        /// Admin sender address (hex)
        #[arg(long)]
        sender: String,

        /// Smallest permitted minimum bid
        #[arg(long)]
        min_bid_amount: u64,

        /// Shortest permitted duration in seconds
        #[arg(long)]
        min_duration: u64,

        /// Longest permitted duration in seconds
        #[arg(long)]
        max_duration: u64,

        /// Largest permitted anti-snipe extension in seconds
        #[arg(long)]
        max_extension: u64,
    },

    /// Pause all state-changing auction calls (admin)
    Pause {
        /// Admin sender address (hex)
        #[arg(long)]
        sender: String,
    },

    /// Resume state-changing auction calls (admin)
    Unpause {
        /// Admin sender address (hex)
        #[arg(long)]
        sender: String,
    },

    /// Set the dev server timestamp
    SetTimestamp {
        /// Unix timestamp to set
        #[arg(long)]
        timestamp: u64,
    },

    /// Advance the dev server timestamp
    AdvanceTime {
        /// Seconds to advance by
        #[arg(long)]
        seconds: u64,
    },

    /// Credit dev funds to an address
    Credit {
        /// Address (hex)
        #[arg(long)]
        address: String,

        /// Amount to credit
        #[arg(long)]
        amount: u64,
    },

    /// Set an address's escrow allowance
    Approve {
        /// Address (hex)
        #[arg(long)]
        address: String,

        /// Allowance to set
        #[arg(long)]
        amount: u64,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct AuctionSummaryRpc {
    content_id: String,
    creator: String,
    creator_id: u64,
    highest_bidder: String,
    highest_bidder_id: u64,
    highest_bid: u64,
    last_bid_at: u64,
    end_time: u64,
    bid_count: u32,
    phase: String,
    min_next_bid: u64,
    params: AuctionParams,
}

#[derive(Debug, Serialize, Deserialize)]
struct ConfigInfoRpc {
    config: AuctionConfig,
    version: u64,
    admin: String,
    treasury: String,
    paused: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct SettledRpc {
    content_id: String,
    winner: String,
    winner_id: u64,
    amount: u64,
    protocol_fee: u64,
    creator_amount: u64,
    creator: String,
    treasury: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct BalanceRpc {
    address: String,
    balance: u64,
    allowance: u64,
}

/// Lenient address parse matching the server's: short hex is zero-padded.
fn parse_address(s: &str) -> Address {
    let mut addr = [0u8; 32];
    if let Ok(bytes) = hex::decode(s.trim_start_matches("0x")) {
        let len = bytes.len().min(32);
        addr[..len].copy_from_slice(&bytes[..len]);
    }
    addr
}

fn envelope_json(envelope: &AuthorizationEnvelope) -> serde_json::Value {
    serde_json::json!({
        "authorizer": hex::encode(envelope.authorizer),
        "nonce": hex::encode(envelope.nonce),
        "deadline": envelope.deadline,
        "signature": hex::encode(envelope.signature),
    })
}

async fn current_timestamp(client: &HttpClient) -> Result<u64> {
    Ok(client.request("chain_getTimestamp", Vec::<()>::new()).await?)
}

#[allow(clippy::too_many_arguments)]
async fn start_cmd(
    client: &HttpClient,
    sender: &str,
    key: &str,
    content: &str,
    creator: &str,
    creator_id: u64,
    bidder_id: u64,
    amount: u64,
    params: AuctionParams,
    ttl: u64,
) -> Result<()> {
    let key = parse_signing_key(key)?;
    let deadline = current_timestamp(client).await? + ttl;

    let content_id = parse_address(content);
    let creator_addr = parse_address(creator);
    let sender_addr = parse_address(sender);

    let envelope = authorize_start(
        &key,
        &content_id,
        &creator_addr,
        creator_id,
        &sender_addr,
        bidder_id,
        amount,
        &params,
        deadline,
    );

    let request = serde_json::json!({
        "sender": hex::encode(sender_addr),
        "content_id": hex::encode(content_id),
        "creator": hex::encode(creator_addr),
        "creator_id": creator_id,
        "bidder_id": bidder_id,
        "amount": amount,
        "params": params,
        "envelope": envelope_json(&envelope),
    });

    let end_time: u64 = client.request("auction_start", vec![request]).await?;

    info!("Auction started for content {}", content);
    println!("Auction started");
    println!("  Content: {}", hex::encode(content_id));
    println!("  Opening bid: {}", amount);
    println!("  Ends at: {}", end_time);

    Ok(())
}

async fn bid_cmd(
    client: &HttpClient,
    sender: &str,
    key: &str,
    content: &str,
    bidder_id: u64,
    amount: u64,
    ttl: u64,
) -> Result<()> {
    let key = parse_signing_key(key)?;
    let deadline = current_timestamp(client).await? + ttl;

    let content_id = parse_address(content);
    let sender_addr = parse_address(sender);

    let envelope = authorize_bid(&key, &content_id, &sender_addr, bidder_id, amount, deadline);

    let request = serde_json::json!({
        "sender": hex::encode(sender_addr),
        "content_id": hex::encode(content_id),
        "bidder_id": bidder_id,
        "amount": amount,
        "envelope": envelope_json(&envelope),
    });

    let end_time: u64 = client.request("auction_bid", vec![request]).await?;

    info!("Bid placed on content {}", content);
    println!("Bid placed");
    println!("  Amount: {}", amount);
    println!("  Auction ends at: {}", end_time);

    Ok(())
}

async fn settle_cmd(client: &HttpClient, sender: &str, content: &str) -> Result<()> {
    let request = serde_json::json!({
        "sender": hex::encode(parse_address(sender)),
        "content_id": hex::encode(parse_address(content)),
    });

    let settled: SettledRpc = client.request("auction_settle", vec![request]).await?;
    print_settled(&settled);

    Ok(())
}

async fn batch_settle_cmd(client: &HttpClient, sender: &str, contents: &str) -> Result<()> {
    let content_ids: Vec<String> = contents
        .split(',')
        .map(|s| hex::encode(parse_address(s.trim())))
        .collect();

    let request = serde_json::json!({
        "sender": hex::encode(parse_address(sender)),
        "content_ids": content_ids,
    });

    let settled: Vec<SettledRpc> = client.request("auction_batchSettle", vec![request]).await?;

    println!("Batch settled {} auctions", settled.len());
    for outcome in &settled {
        print_settled(outcome);
    }

    Ok(())
}

async fn cancel_cmd(
    client: &HttpClient,
    sender: &str,
    key: &str,
    content: &str,
    ttl: u64,
) -> Result<()> {
    let key = parse_signing_key(key)?;
    let deadline = current_timestamp(client).await? + ttl;
    let content_id = parse_address(content);

    let envelope = authorize_cancel(&key, &content_id, deadline);

    let request = serde_json::json!({
        "sender": hex::encode(parse_address(sender)),
        "content_id": hex::encode(content_id),
        "envelope": envelope_json(&envelope),
    });

    let _ok: bool = client.request("auction_cancel", vec![request]).await?;

    println!("Auction cancelled for content {}", hex::encode(content_id));

    Ok(())
}

fn print_settled(settled: &SettledRpc) {
    println!("Auction settled:");
    println!("  Content: {}", settled.content_id);
    println!("  Winner: {} (id {})", settled.winner, settled.winner_id);
    println!("  Winning bid: {}", settled.amount);
    println!("  Protocol fee: {}", settled.protocol_fee);
    println!("  Creator amount: {}", settled.creator_amount);
}

fn print_summary(summary: &AuctionSummaryRpc) {
    println!("Auction for content {}:", summary.content_id);
    println!("  Phase: {}", summary.phase);
    println!("  Creator: {} (id {})", summary.creator, summary.creator_id);
    println!(
        "  Highest bid: {} by {} (id {})",
        summary.highest_bid, summary.highest_bidder, summary.highest_bidder_id
    );
    println!("  Bid count: {}", summary.bid_count);
    println!("  Ends at: {}", summary.end_time);
    println!("  Min next bid: {}", summary.min_next_bid);
}

async fn get_auction_cmd(client: &HttpClient, content: &str) -> Result<()> {
    let auction: Option<AuctionSummaryRpc> = client
        .request(
            "query_getAuction",
            vec![hex::encode(parse_address(content))],
        )
        .await?;

    match auction {
        Some(summary) => print_summary(&summary),
        None => println!("No auction for content {}", content),
    }

    Ok(())
}

async fn list_active_cmd(client: &HttpClient) -> Result<()> {
    let active: Vec<AuctionSummaryRpc> = client
        .request("query_listActiveAuctions", Vec::<()>::new())
        .await?;

    if active.is_empty() {
        println!("No active auctions");
    } else {
        println!("Active auctions:");
        for summary in active {
            println!(
                "  {} - bid {} ({} bids), ends at {}",
                summary.content_id, summary.highest_bid, summary.bid_count, summary.end_time
            );
        }
    }

    Ok(())
}

async fn get_config_cmd(client: &HttpClient) -> Result<()> {
    let info: ConfigInfoRpc = client.request("query_getConfig", Vec::<()>::new()).await?;

    println!("Config (version {}):", info.version);
    println!("  Min bid amount: {}", info.config.min_bid_amount);
    println!(
        "  Duration bounds: {}..={} seconds",
        info.config.min_auction_duration, info.config.max_auction_duration
    );
    println!("  Max extension: {} seconds", info.config.max_extension);
    println!("  Admin: {}", info.admin);
    println!("  Treasury: {}", info.treasury);
    println!("  Paused: {}", info.paused);

    Ok(())
}

async fn events_cmd(client: &HttpClient, content: Option<&str>) -> Result<()> {
    let filter = content.map(|s| hex::encode(parse_address(s)));
    let events: Vec<serde_json::Value> =
        client.request("query_getEvents", vec![filter]).await?;

    if events.is_empty() {
        println!("No events");
    } else {
        println!("{}", serde_json::to_string_pretty(&events)?);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("auction_cli=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let client = HttpClientBuilder::default().build(&cli.rpc)?;

    match cli.command {
        Commands::Keygen => {
            let key = generate_signing_key();
            println!("Secret: {}", hex::encode(key.to_bytes()));
            println!("Identity: {}", hex::encode(identity_of(&key)));
        }

        Commands::Start {
            sender,
            key,
            content,
            creator,
            creator_id,
            bidder_id,
            amount,
            min_bid,
            increment_bps,
            fee_bps,
            duration,
            extension,
            extension_threshold,
            ttl,
        } => {
            let params = AuctionParams {
                min_bid,
                min_bid_increment_bps: increment_bps,
                protocol_fee_bps: fee_bps,
                duration,
                extension,
                extension_threshold,
            };
            start_cmd(
                &client, &sender, &key, &content, &creator, creator_id, bidder_id, amount, params,
                ttl,
            )
            .await?;
        }

        Commands::Bid {
            sender,
            key,
            content,
            bidder_id,
            amount,
            ttl,
        } => {
            bid_cmd(&client, &sender, &key, &content, bidder_id, amount, ttl).await?;
        }

        Commands::Settle { sender, content } => {
            settle_cmd(&client, &sender, &content).await?;
        }

        Commands::BatchSettle { sender, contents } => {
            batch_settle_cmd(&client, &sender, &contents).await?;
        }

        Commands::Cancel {
            sender,
            key,
            content,
            ttl,
        } => {
            cancel_cmd(&client, &sender, &key, &content, ttl).await?;
        }

        Commands::GetAuction { content } => {
            get_auction_cmd(&client, &content).await?;
        }

        Commands::Phase { content } => {
            let phase: String = client
                .request(
                    "query_getPhase",
                    vec![hex::encode(parse_address(&content))],
                )
                .await?;
            println!("Phase: {}", phase);
        }

        Commands::MinNextBid { content } => {
            let min_next: Option<u64> = client
                .request(
                    "query_getMinNextBid",
                    vec![hex::encode(parse_address(&content))],
                )
                .await?;
            match min_next {
                Some(amount) => println!("Min next bid: {}", amount),
                None => println!("Auction is not active"),
            }
        }

        Commands::ListActive => {
            list_active_cmd(&client).await?;
        }

        Commands::GetConfig => {
            get_config_cmd(&client).await?;
        }

        Commands::EscrowTotal => {
            let total: u64 = client
                .request("query_getEscrowTotal", Vec::<()>::new())
                .await?;
            println!("Escrow total: {}", total);
        }

        Commands::Events { content } => {
            events_cmd(&client, content.as_deref()).await?;
        }

        Commands::Balance { address } => {
            let balance: BalanceRpc = client
                .request(
                    "query_getBalance",
                    vec![hex::encode(parse_address(&address))],
                )
                .await?;
            println!("Balance of {}:", balance.address);
            println!("  Funds: {}", balance.balance);
            println!("  Allowance: {}", balance.allowance);
        }

        Commands::Owner { content } => {
            let owner: Option<String> = client
                .request(
                    "query_getOwner",
                    vec![hex::encode(parse_address(&content))],
                )
                .await?;
            match owner {
                Some(owner) => println!("Owner: {}", owner),
                None => println!("Not minted"),
            }
        }

        Commands::AllowAuthorizer { sender, authorizer } => {
            let _ok: bool = client
                .request(
                    "admin_allowAuthorizer",
                    (
                        hex::encode(parse_address(&sender)),
                        hex::encode(parse_address(&authorizer)),
                    ),
                )
                .await?;
            println!("Authorizer allowed");
        }

        Commands::DenyAuthorizer { sender, authorizer } => {
            let _ok: bool = client
                .request(
                    "admin_denyAuthorizer",
                    (
                        hex::encode(parse_address(&sender)),
                        hex::encode(parse_address(&authorizer)),
                    ),
                )
                .await?;
            println!("Authorizer denied");
        }

        Commands::SetTreasury { sender, treasury } => {
            let _ok: bool = client
                .request(
                    "admin_setTreasury",
                    (
                        hex::encode(parse_address(&sender)),
                        hex::encode(parse_address(&treasury)),
                    ),
                )
                .await?;
            println!("Treasury updated");
        }

        Commands::SetConfig {
            sender,
            min_bid_amount,
            min_duration,
            max_duration,
            max_extension,
        } => {
            let request = serde_json::json!({
                "sender": hex::encode(parse_address(&sender)),
                "config": {
                    "min_bid_amount": min_bid_amount,
                    "min_auction_duration": min_duration,
                    "max_auction_duration": max_duration,
                    "max_extension": max_extension,
                },
            });
            let version: u64 = client.request("admin_setConfig", vec![request]).await?;
            println!("Config updated to version {}", version);
        }

        Commands::Pause { sender } => {
            let _ok: bool = client
                .request("admin_pause", vec![hex::encode(parse_address(&sender))])
                .await?;
            println!("Auction calls paused");
        }

        Commands::Unpause { sender } => {
            let _ok: bool = client
                .request("admin_unpause", vec![hex::encode(parse_address(&sender))])
                .await?;
            println!("Auction calls resumed");
        }

        Commands::SetTimestamp { timestamp } => {
            let now: u64 = client.request("dev_setTimestamp", vec![timestamp]).await?;
            println!("Timestamp set to {}", now);
        }

        Commands::AdvanceTime { seconds } => {
            let now: u64 = client.request("dev_advanceTime", vec![seconds]).await?;
            println!("Timestamp advanced to {}", now);
        }

        Commands::Credit { address, amount } => {
            let balance: u64 = client
                .request(
                    "dev_credit",
                    (hex::encode(parse_address(&address)), amount),
                )
                .await?;
            println!("Balance: {}", balance);
        }

        Commands::Approve { address, amount } => {
            let allowance: u64 = client
                .request(
                    "dev_approve",
                    (hex::encode(parse_address(&address)), amount),
                )
                .await?;
            println!("Allowance: {}", allowance);
        }
    }

    Ok(())
}
