//! Auction service for local development and testing.
//!
//! This provides a JSON-RPC host around the auction engine with simulated
//! time and an in-memory asset ledger, without requiring a real settlement
//! backend. Every state-changing call runs under one write lock with the
//! clock read once, so calls apply in a single total order.

use anyhow::{Context, Result};
use clap::Parser;
use jsonrpsee::core::async_trait;
use jsonrpsee::proc_macros::rpc;
use jsonrpsee::server::Server;
use jsonrpsee::types::ErrorObjectOwned;
use parking_lot::RwLock;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use auction_crypto::{generate_signing_key, identity_of};
use auction_engine::{
    dispatch, handle_query, AuctionCall, AuctionEvent, AuctionGenesisConfig, AuctionQuery,
    AuctionQueryResponse, CallContext, EngineState, LedgerAsset, MintBook,
};
use auction_types::{Address, AuctionConfig, AuthorizationEnvelope};

mod types;
use types::*;

/// Shared service state.
struct ServiceState {
    /// Engine state
    engine: EngineState,
    /// Escrowed-asset ledger
    asset: LedgerAsset,
    /// Collectible mint book
    minter: MintBook,
    /// Every event emitted by successful calls, in order
    events: Vec<AuctionEvent>,
    /// Simulated time (Unix seconds), never moves backwards
    timestamp: u64,
}

/// RPC API definition for the auction service.
#[rpc(server)]
pub trait AuctionApi {
    // ============ Auction Methods ============

    /// Start an auction with its opening bid. Returns the end time.
    #[method(name = "auction_start")]
    async fn auction_start(&self, params: StartAuctionParams) -> Result<u64, ErrorObjectOwned>;

    /// Outbid the current highest bid. Returns the end time, extended if
    /// the bid landed inside the anti-snipe window.
    #[method(name = "auction_bid")]
    async fn auction_bid(&self, params: BidParams) -> Result<u64, ErrorObjectOwned>;

    /// Settle an ended auction.
    #[method(name = "auction_settle")]
    async fn auction_settle(&self, params: SettleParams) -> Result<SettledRpc, ErrorObjectOwned>;

    /// Settle several ended auctions as one atomic unit.
    #[method(name = "auction_batchSettle")]
    async fn auction_batch_settle(
        &self,
        params: BatchSettleParams,
    ) -> Result<Vec<SettledRpc>, ErrorObjectOwned>;

    /// Cancel an active auction with an authorized envelope.
    #[method(name = "auction_cancel")]
    async fn auction_cancel(&self, params: CancelParams) -> Result<bool, ErrorObjectOwned>;

    // ============ Admin Methods ============

    /// Register an authorizer identity.
    #[method(name = "admin_allowAuthorizer")]
    async fn admin_allow_authorizer(
        &self,
        sender: String,
        authorizer: String,
    ) -> Result<bool, ErrorObjectOwned>;

    /// Remove an authorizer identity.
    #[method(name = "admin_denyAuthorizer")]
    async fn admin_deny_authorizer(
        &self,
        sender: String,
        authorizer: String,
    ) -> Result<bool, ErrorObjectOwned>;

    /// Change the protocol-fee recipient.
    #[method(name = "admin_setTreasury")]
    async fn admin_set_treasury(
        &self,
        sender: String,
        treasury: String,
    ) -> Result<bool, ErrorObjectOwned>;

    /// Replace the global config. Returns the new config version.
    #[method(name = "admin_setConfig")]
    async fn admin_set_config(&self, params: SetConfigParams) -> Result<u64, ErrorObjectOwned>;

    /// Block all state-changing auction calls.
    #[method(name = "admin_pause")]
    async fn admin_pause(&self, sender: String) -> Result<bool, ErrorObjectOwned>;

    /// Re-enable state-changing auction calls.
    #[method(name = "admin_unpause")]
    async fn admin_unpause(&self, sender: String) -> Result<bool, ErrorObjectOwned>;

    // ============ Dev Methods ============

    /// Set the simulated timestamp. Rejects moving backwards.
    #[method(name = "dev_setTimestamp")]
    async fn dev_set_timestamp(&self, timestamp: u64) -> Result<u64, ErrorObjectOwned>;

    /// Advance the simulated timestamp by the given number of seconds.
    #[method(name = "dev_advanceTime")]
    async fn dev_advance_time(&self, seconds: u64) -> Result<u64, ErrorObjectOwned>;

    /// Credit dev funds to an address. Returns the new balance.
    #[method(name = "dev_credit")]
    async fn dev_credit(&self, address: String, amount: u64) -> Result<u64, ErrorObjectOwned>;

    /// Set an address's escrow allowance. Returns the new allowance.
    #[method(name = "dev_approve")]
    async fn dev_approve(&self, address: String, amount: u64) -> Result<u64, ErrorObjectOwned>;

    // ============ Query Methods ============

    /// Get the current simulated timestamp.
    #[method(name = "chain_getTimestamp")]
    async fn chain_get_timestamp(&self) -> Result<u64, ErrorObjectOwned>;

    /// Get one auction with its derived phase and minimum next bid.
    #[method(name = "query_getAuction")]
    async fn query_get_auction(
        &self,
        content_id: String,
    ) -> Result<Option<AuctionSummaryRpc>, ErrorObjectOwned>;

    /// Get the lifecycle phase of one content id.
    #[method(name = "query_getPhase")]
    async fn query_get_phase(&self, content_id: String) -> Result<String, ErrorObjectOwned>;

    /// Get the smallest acceptable next bid while the auction is active.
    #[method(name = "query_getMinNextBid")]
    async fn query_get_min_next_bid(
        &self,
        content_id: String,
    ) -> Result<Option<u64>, ErrorObjectOwned>;

    /// List all active auctions, soonest-ending first.
    #[method(name = "query_listActiveAuctions")]
    async fn query_list_active_auctions(&self) -> Result<Vec<AuctionSummaryRpc>, ErrorObjectOwned>;

    /// Get the total funds held in escrow.
    #[method(name = "query_getEscrowTotal")]
    async fn query_get_escrow_total(&self) -> Result<u64, ErrorObjectOwned>;

    /// Get the global config, its version, and the control addresses.
    #[method(name = "query_getConfig")]
    async fn query_get_config(&self) -> Result<ConfigInfoRpc, ErrorObjectOwned>;

    /// Check whether an identity is an accepted authorizer.
    #[method(name = "query_isAuthorizer")]
    async fn query_is_authorizer(&self, authorizer: String) -> Result<bool, ErrorObjectOwned>;

    /// Check whether a nonce has been consumed.
    #[method(name = "query_isNonceUsed")]
    async fn query_is_nonce_used(&self, nonce: String) -> Result<bool, ErrorObjectOwned>;

    /// Get the ledger balance and allowance of an address.
    #[method(name = "query_getBalance")]
    async fn query_get_balance(&self, address: String) -> Result<BalanceRpc, ErrorObjectOwned>;

    /// Get the owner of a minted collectible, if any.
    #[method(name = "query_getOwner")]
    async fn query_get_owner(
        &self,
        content_id: String,
    ) -> Result<Option<String>, ErrorObjectOwned>;

    /// Get emitted events, optionally filtered by content id.
    #[method(name = "query_getEvents")]
    async fn query_get_events(
        &self,
        content_id: Option<String>,
    ) -> Result<Vec<AuctionEventRpc>, ErrorObjectOwned>;
}

/// Implementation of the auction service RPC server.
struct AuctionServer {
    state: Arc<RwLock<ServiceState>>,
}

impl AuctionServer {
    fn new(engine: EngineState, timestamp: u64) -> Self {
        Self {
            state: Arc::new(RwLock::new(ServiceState {
                engine,
                asset: LedgerAsset::new(),
                minter: MintBook::new(),
                events: Vec::new(),
                timestamp,
            })),
        }
    }

    /// Apply one call under the write lock, with the clock read once.
    fn apply(&self, sender: &str, call: AuctionCall) -> Result<Vec<AuctionEvent>, ErrorObjectOwned> {
        let mut guard = self.state.write();
        let state = &mut *guard;
        let ctx = CallContext {
            sender: parse_address(sender),
            timestamp: state.timestamp,
        };
        let events = dispatch(&mut state.engine, &mut state.asset, &mut state.minter, &ctx, call)
            .map_err(|e| rpc_error(&e.to_string()))?;
        state.events.extend(events.iter().cloned());
        Ok(events)
    }

    fn query(&self, query: AuctionQuery) -> AuctionQueryResponse {
        let state = self.state.read();
        handle_query(&state.engine, state.timestamp, query)
    }
}

#[async_trait]
impl AuctionApiServer for AuctionServer {
    async fn auction_start(&self, params: StartAuctionParams) -> Result<u64, ErrorObjectOwned> {
        let content_id = parse_bytes32("content id", &params.content_id)?;
        let envelope = parse_envelope(&params.envelope)?;

        let call = AuctionCall::Start {
            content_id,
            creator: parse_address(&params.creator),
            creator_id: params.creator_id,
            bidder_id: params.bidder_id,
            amount: params.amount,
            params: params.params,
            envelope,
        };
        let events = self.apply(&params.sender, call)?;

        let end_time = events
            .iter()
            .find_map(|e| match e {
                AuctionEvent::Started(s) => Some(s.end_time),
                _ => None,
            })
            .unwrap_or_default();
        info!(
            "Auction started for content {} (ends at {})",
            params.content_id, end_time
        );
        Ok(end_time)
    }

    async fn auction_bid(&self, params: BidParams) -> Result<u64, ErrorObjectOwned> {
        let content_id = parse_bytes32("content id", &params.content_id)?;
        let envelope = parse_envelope(&params.envelope)?;

        let call = AuctionCall::Bid {
            content_id,
            bidder_id: params.bidder_id,
            amount: params.amount,
            envelope,
        };
        let events = self.apply(&params.sender, call)?;

        // The extension event, when present, carries the final end time
        let mut end_time = 0;
        for event in &events {
            match event {
                AuctionEvent::BidPlaced(e) => end_time = e.end_time,
                AuctionEvent::Extended(e) => end_time = e.new_end_time,
                _ => {}
            }
        }
        info!(
            "Bid of {} placed on {} by {}",
            params.amount, params.content_id, params.sender
        );
        Ok(end_time)
    }

    async fn auction_settle(&self, params: SettleParams) -> Result<SettledRpc, ErrorObjectOwned> {
        let content_id = parse_bytes32("content id", &params.content_id)?;
        let events = self.apply(&params.sender, AuctionCall::Settle { content_id })?;

        let settled = events
            .iter()
            .find_map(|e| match e {
                AuctionEvent::Settled(s) => Some(SettledRpc::from(s)),
                _ => None,
            })
            .ok_or_else(|| rpc_error("Settlement produced no result"))?;
        info!(
            "Auction {} settled. Winner: {}, Price: {}",
            params.content_id, settled.winner, settled.amount
        );
        Ok(settled)
    }

    async fn auction_batch_settle(
        &self,
        params: BatchSettleParams,
    ) -> Result<Vec<SettledRpc>, ErrorObjectOwned> {
        let mut content_ids = Vec::with_capacity(params.content_ids.len());
        for raw in &params.content_ids {
            content_ids.push(parse_bytes32("content id", raw)?);
        }
        let events = self.apply(&params.sender, AuctionCall::BatchSettle { content_ids })?;

        let settled: Vec<SettledRpc> = events
            .iter()
            .filter_map(|e| match e {
                AuctionEvent::Settled(s) => Some(SettledRpc::from(s)),
                _ => None,
            })
            .collect();
        info!("Batch settled {} auctions", settled.len());
        Ok(settled)
    }

    async fn auction_cancel(&self, params: CancelParams) -> Result<bool, ErrorObjectOwned> {
        let content_id = parse_bytes32("content id", &params.content_id)?;
        let envelope = parse_envelope(&params.envelope)?;

        self.apply(&params.sender, AuctionCall::Cancel { content_id, envelope })?;
        info!("Auction {} cancelled", params.content_id);
        Ok(true)
    }

    async fn admin_allow_authorizer(
        &self,
        sender: String,
        authorizer: String,
    ) -> Result<bool, ErrorObjectOwned> {
        let authorizer = parse_bytes32("authorizer", &authorizer)?;
        self.apply(&sender, AuctionCall::AllowAuthorizer { authorizer })?;
        info!("Authorizer {} allowed", hex::encode(authorizer));
        Ok(true)
    }

    async fn admin_deny_authorizer(
        &self,
        sender: String,
        authorizer: String,
    ) -> Result<bool, ErrorObjectOwned> {
        let authorizer = parse_bytes32("authorizer", &authorizer)?;
        self.apply(&sender, AuctionCall::DenyAuthorizer { authorizer })?;
        info!("Authorizer {} denied", hex::encode(authorizer));
        Ok(true)
    }

    async fn admin_set_treasury(
        &self,
        sender: String,
        treasury: String,
    ) -> Result<bool, ErrorObjectOwned> {
        let treasury = parse_address(&treasury);
        self.apply(&sender, AuctionCall::SetTreasury { treasury })?;
        info!("Treasury set to {}", hex::encode(treasury));
        Ok(true)
    }

    async fn admin_set_config(&self, params: SetConfigParams) -> Result<u64, ErrorObjectOwned> {
        self.apply(&params.sender, AuctionCall::SetConfig { config: params.config })?;

        let state = self.state.read();
        let version = state.engine.config_version;
        info!("Config updated to version {}", version);
        Ok(version)
    }

    async fn admin_pause(&self, sender: String) -> Result<bool, ErrorObjectOwned> {
        self.apply(&sender, AuctionCall::Pause)?;
        info!("Auction calls paused");
        Ok(true)
    }

    async fn admin_unpause(&self, sender: String) -> Result<bool, ErrorObjectOwned> {
        self.apply(&sender, AuctionCall::Unpause)?;
        info!("Auction calls resumed");
        Ok(true)
    }

    async fn dev_set_timestamp(&self, timestamp: u64) -> Result<u64, ErrorObjectOwned> {
        let mut state = self.state.write();
        if timestamp < state.timestamp {
            return Err(rpc_error(&format!(
                "Time cannot move backwards: {} < {}",
                timestamp, state.timestamp
            )));
        }
        state.timestamp = timestamp;
        info!("Timestamp set to {}", timestamp);
        Ok(timestamp)
    }

    async fn dev_advance_time(&self, seconds: u64) -> Result<u64, ErrorObjectOwned> {
        let mut state = self.state.write();
        state.timestamp = state.timestamp.saturating_add(seconds);
        info!("Timestamp advanced to {}", state.timestamp);
        Ok(state.timestamp)
    }

    async fn dev_credit(&self, address: String, amount: u64) -> Result<u64, ErrorObjectOwned> {
        let owner = parse_address(&address);
        let mut state = self.state.write();
        state.asset.credit(owner, amount);
        Ok(state.asset.balance_of(&owner))
    }

    async fn dev_approve(&self, address: String, amount: u64) -> Result<u64, ErrorObjectOwned> {
        let owner = parse_address(&address);
        let mut state = self.state.write();
        state.asset.approve(owner, amount);
        Ok(state.asset.allowance_of(&owner))
    }

    async fn chain_get_timestamp(&self) -> Result<u64, ErrorObjectOwned> {
        Ok(self.state.read().timestamp)
    }

    async fn query_get_auction(
        &self,
        content_id: String,
    ) -> Result<Option<AuctionSummaryRpc>, ErrorObjectOwned> {
        let content_id = parse_bytes32("content id", &content_id)?;
        match self.query(AuctionQuery::GetAuction { content_id }) {
            AuctionQueryResponse::Auction(summary) => {
                Ok(summary.as_ref().map(AuctionSummaryRpc::from))
            }
            _ => Err(rpc_error("Unexpected query response")),
        }
    }

    async fn query_get_phase(&self, content_id: String) -> Result<String, ErrorObjectOwned> {
        let content_id = parse_bytes32("content id", &content_id)?;
        match self.query(AuctionQuery::GetPhase { content_id }) {
            AuctionQueryResponse::Phase(phase) => Ok(phase.to_string()),
            _ => Err(rpc_error("Unexpected query response")),
        }
    }

    async fn query_get_min_next_bid(
        &self,
        content_id: String,
    ) -> Result<Option<u64>, ErrorObjectOwned> {
        let content_id = parse_bytes32("content id", &content_id)?;
        match self.query(AuctionQuery::GetMinNextBid { content_id }) {
            AuctionQueryResponse::MinNextBid(value) => Ok(value),
            _ => Err(rpc_error("Unexpected query response")),
        }
    }

    async fn query_list_active_auctions(
        &self,
    ) -> Result<Vec<AuctionSummaryRpc>, ErrorObjectOwned> {
        match self.query(AuctionQuery::ListActiveAuctions) {
            AuctionQueryResponse::ActiveAuctions(active) => {
                Ok(active.iter().map(AuctionSummaryRpc::from).collect())
            }
            _ => Err(rpc_error("Unexpected query response")),
        }
    }

    async fn query_get_escrow_total(&self) -> Result<u64, ErrorObjectOwned> {
        match self.query(AuctionQuery::GetEscrowTotal) {
            AuctionQueryResponse::EscrowTotal(total) => Ok(total),
            _ => Err(rpc_error("Unexpected query response")),
        }
    }

    async fn query_get_config(&self) -> Result<ConfigInfoRpc, ErrorObjectOwned> {
        match self.query(AuctionQuery::GetConfig) {
            AuctionQueryResponse::Config(info) => Ok(ConfigInfoRpc::from(&info)),
            _ => Err(rpc_error("Unexpected query response")),
        }
    }

    async fn query_is_authorizer(&self, authorizer: String) -> Result<bool, ErrorObjectOwned> {
        let authorizer = parse_bytes32("authorizer", &authorizer)?;
        match self.query(AuctionQuery::IsAuthorizer { authorizer }) {
            AuctionQueryResponse::IsAuthorizer(value) => Ok(value),
            _ => Err(rpc_error("Unexpected query response")),
        }
    }

    async fn query_is_nonce_used(&self, nonce: String) -> Result<bool, ErrorObjectOwned> {
        let nonce = parse_bytes32("nonce", &nonce)?;
        match self.query(AuctionQuery::IsNonceUsed { nonce }) {
            AuctionQueryResponse::NonceUsed(value) => Ok(value),
            _ => Err(rpc_error("Unexpected query response")),
        }
    }

    async fn query_get_balance(&self, address: String) -> Result<BalanceRpc, ErrorObjectOwned> {
        let owner = parse_address(&address);
        let state = self.state.read();
        Ok(BalanceRpc {
            address: hex::encode(owner),
            balance: state.asset.balance_of(&owner),
            allowance: state.asset.allowance_of(&owner),
        })
    }

    async fn query_get_owner(
        &self,
        content_id: String,
    ) -> Result<Option<String>, ErrorObjectOwned> {
        let content_id = parse_bytes32("content id", &content_id)?;
        let state = self.state.read();
        Ok(state.minter.owner_of(&content_id).map(hex::encode))
    }

    async fn query_get_events(
        &self,
        content_id: Option<String>,
    ) -> Result<Vec<AuctionEventRpc>, ErrorObjectOwned> {
        let filter = match content_id {
            Some(raw) => Some(parse_bytes32("content id", &raw)?),
            None => None,
        };
        let state = self.state.read();
        Ok(state
            .events
            .iter()
            .filter(|event| filter.map_or(true, |id| *event.content_id() == id))
            .map(AuctionEventRpc::from)
            .collect())
    }
}

fn rpc_error(msg: &str) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(-32000, msg.to_string(), None::<()>)
}

/// Lenient address parse: short hex is zero-padded on the right, so dev
/// senders like "aa" work from the CLI.
fn parse_address(s: &str) -> Address {
    let mut addr = [0u8; 32];
    if let Ok(bytes) = hex::decode(s.trim_start_matches("0x")) {
        let len = bytes.len().min(32);
        addr[..len].copy_from_slice(&bytes[..len]);
    }
    addr
}

/// Strict 32-byte hex parse for identifiers bound into signatures.
fn parse_bytes32(label: &str, s: &str) -> Result<[u8; 32], ErrorObjectOwned> {
    hex::decode(s.trim_start_matches("0x"))
        .map_err(|e| rpc_error(&format!("Invalid {} hex: {}", label, e)))?
        .try_into()
        .map_err(|_| rpc_error(&format!("{} must be 32 bytes", label)))
}

fn parse_envelope(envelope: &EnvelopeRpc) -> Result<AuthorizationEnvelope, ErrorObjectOwned> {
    Ok(AuthorizationEnvelope {
        authorizer: parse_bytes32("authorizer", &envelope.authorizer)?,
        nonce: parse_bytes32("nonce", &envelope.nonce)?,
        deadline: envelope.deadline,
        signature: hex::decode(envelope.signature.trim_start_matches("0x"))
            .map_err(|e| rpc_error(&format!("Invalid signature hex: {}", e)))?
            .try_into()
            .map_err(|_| rpc_error("Signature must be 64 bytes"))?,
    })
}

/// Built-in genesis for dev mode. The admin answers to sender "aa" and
/// the treasury collects under "bb" through the lenient address parsing.
fn dev_genesis(authorizer: Address) -> AuctionGenesisConfig {
    AuctionGenesisConfig {
        admin: parse_address("aa"),
        treasury: parse_address("bb"),
        authorizers: vec![authorizer],
        config: AuctionConfig {
            min_bid_amount: 1_000_000,
            min_auction_duration: 3600,
            max_auction_duration: 2_592_000,
            max_extension: 86_400,
        },
        genesis_time: 0,
    }
}

#[derive(Parser)]
#[command(name = "auction-server")]
#[command(about = "JSON-RPC host for the content auction engine")]
struct Args {
    /// Listen address
    #[arg(long, default_value = "127.0.0.1:9944")]
    listen: String,

    /// Genesis config file (JSON). When omitted, a throwaway dev genesis
    /// is generated and its authorizer secret logged.
    #[arg(long)]
    genesis: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("auction_server=info".parse().unwrap())
                .add_directive("jsonrpsee=warn".parse().unwrap()),
        )
        .init();

    let args = Args::parse();
    let addr: SocketAddr = args.listen.parse()?;

    let genesis = match &args.genesis {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read genesis file {}", path.display()))?;
            serde_json::from_str::<AuctionGenesisConfig>(&raw)
                .context("Failed to parse genesis file")?
        }
        None => {
            let authorizer = generate_signing_key();
            info!("Dev genesis: admin=aa, treasury=bb");
            info!(
                "Dev authorizer identity: {}",
                hex::encode(identity_of(&authorizer))
            );
            info!(
                "Dev authorizer secret: {}",
                hex::encode(authorizer.to_bytes())
            );
            dev_genesis(identity_of(&authorizer))
        }
    };

    let timestamp = genesis.genesis_time;
    let engine = genesis.into_state().context("Invalid genesis config")?;

    info!("Starting auction service on {}", addr);

    let server = Server::builder().build(addr).await?;
    let handle = server.start(AuctionServer::new(engine, timestamp).into_rpc());

    info!("Auction service running. Press Ctrl+C to stop.");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutting down...");
    handle.stop()?;
    handle.stopped().await;

    Ok(())
}
