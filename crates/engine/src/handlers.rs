//! Call handlers for the auction engine.
//!
//! These functions implement the business logic for each call type. Every
//! handler validates completely before its first mutation; the only
//! fallible step after validation is pulling the caller's funds, which is
//! always the first effect. An `Err` return therefore means nothing
//! changed: no record mutation, no escrow movement, no nonce consumed.

use std::collections::HashSet;

use auction_crypto::{bid_digest, cancel_digest, start_digest, verify_envelope};
use auction_types::{
    mul_bps, Address, AuctionConfig, AuctionParams, AuctionPhase, AuctionRecord,
    AuthorizationEnvelope, ContentId, BPS_DENOMINATOR,
};

use crate::assets::{CollectibleMinter, StableAsset};
use crate::call::AuctionCall;
use crate::error::AuctionError;
use crate::events::{
    AuctionCancelled, AuctionEvent, AuctionExtended, AuctionSettled, AuctionStarted, BidPlaced,
    BidRefunded,
};
use crate::genesis::check_config;
use crate::state::EngineState;

/// Context provided by the host for each call.
pub struct CallContext {
    /// Acting identity submitting the call
    pub sender: Address,
    /// Current time (Unix seconds), read once and fixed for the whole call
    pub timestamp: u64,
}

/// Result type for handlers.
pub type HandlerResult<T> = Result<T, AuctionError>;

/// Apply one call to the engine.
///
/// The host must hold exclusive access to all four arguments for the full
/// call; that exclusivity is what makes each call a single totally-ordered
/// unit.
pub fn dispatch(
    state: &mut EngineState,
    asset: &mut dyn StableAsset,
    minter: &mut dyn CollectibleMinter,
    ctx: &CallContext,
    call: AuctionCall,
) -> HandlerResult<Vec<AuctionEvent>> {
    match call {
        AuctionCall::Start {
            content_id,
            creator,
            creator_id,
            bidder_id,
            amount,
            params,
            envelope,
        } => handle_start(
            state, asset, ctx, content_id, creator, creator_id, bidder_id, amount, params,
            &envelope,
        ),
        AuctionCall::Bid {
            content_id,
            bidder_id,
            amount,
            envelope,
        } => handle_bid(state, asset, ctx, content_id, bidder_id, amount, &envelope),
        AuctionCall::Settle { content_id } => handle_settle(state, asset, minter, ctx, content_id),
        AuctionCall::BatchSettle { content_ids } => {
            handle_batch_settle(state, asset, minter, ctx, &content_ids)
        }
        AuctionCall::Cancel {
            content_id,
            envelope,
        } => handle_cancel(state, asset, ctx, content_id, &envelope),
        AuctionCall::AllowAuthorizer { authorizer } => {
            handle_allow_authorizer(state, ctx, authorizer).map(|_| Vec::new())
        }
        AuctionCall::DenyAuthorizer { authorizer } => {
            handle_deny_authorizer(state, ctx, authorizer).map(|_| Vec::new())
        }
        AuctionCall::SetTreasury { treasury } => {
            handle_set_treasury(state, ctx, treasury).map(|_| Vec::new())
        }
        AuctionCall::SetConfig { config } => {
            handle_set_config(state, ctx, config).map(|_| Vec::new())
        }
        AuctionCall::Pause => handle_pause(state, ctx).map(|_| Vec::new()),
        AuctionCall::Unpause => handle_unpause(state, ctx).map(|_| Vec::new()),
    }
}

/// Check per-auction params against the live global config.
///
/// Applied exactly once, at start time; any violation fails the start
/// before funds move, and the accepted params are frozen into the record.
pub fn validate_params(params: &AuctionParams, config: &AuctionConfig) -> HandlerResult<()> {
    if params.protocol_fee_bps > BPS_DENOMINATOR {
        return Err(AuctionError::InvalidAuctionParams(
            "protocol fee exceeds 10000 bps".into(),
        ));
    }
    if params.duration < config.min_auction_duration {
        return Err(AuctionError::InvalidAuctionParams(
            "duration below global minimum".into(),
        ));
    }
    if params.duration > config.max_auction_duration {
        return Err(AuctionError::InvalidAuctionParams(
            "duration above global maximum".into(),
        ));
    }
    if params.extension == 0 {
        return Err(AuctionError::InvalidAuctionParams(
            "extension cannot be zero".into(),
        ));
    }
    if params.extension > config.max_extension {
        return Err(AuctionError::InvalidAuctionParams(
            "extension above global maximum".into(),
        ));
    }
    if params.extension_threshold == 0 {
        return Err(AuctionError::InvalidAuctionParams(
            "extension threshold cannot be zero".into(),
        ));
    }
    if params.extension_threshold > params.duration {
        return Err(AuctionError::InvalidAuctionParams(
            "extension threshold exceeds duration".into(),
        ));
    }
    if params.extension > params.duration {
        return Err(AuctionError::InvalidAuctionParams(
            "extension exceeds duration".into(),
        ));
    }
    if params.min_bid_increment_bps == 0 {
        return Err(AuctionError::InvalidAuctionParams(
            "bid increment cannot be zero".into(),
        ));
    }
    if params.min_bid_increment_bps > BPS_DENOMINATOR {
        return Err(AuctionError::InvalidAuctionParams(
            "bid increment exceeds 10000 bps".into(),
        ));
    }
    if params.min_bid < config.min_bid_amount {
        return Err(AuctionError::InvalidAuctionParams(
            "minimum bid below global minimum".into(),
        ));
    }
    Ok(())
}

/// Validate an envelope against a recomputed schema digest.
///
/// Checks signature, deadline, authorizer membership, and nonce freshness,
/// in that order. Does not consume the nonce; handlers insert it at their
/// commit point so a failure anywhere leaves the nonce unburned.
fn check_authorization(
    state: &EngineState,
    ctx: &CallContext,
    digest: &[u8; 32],
    envelope: &AuthorizationEnvelope,
) -> HandlerResult<()> {
    let identity = verify_envelope(digest, envelope).map_err(|_| AuctionError::InvalidSignature)?;
    if ctx.timestamp > envelope.deadline {
        return Err(AuctionError::ExpiredAuthorization {
            deadline: envelope.deadline,
            now: ctx.timestamp,
        });
    }
    if !state.is_authorizer(&identity) {
        return Err(AuctionError::UnauthorizedSigner);
    }
    if state.nonce_used(&envelope.nonce) {
        return Err(AuctionError::ReplayedNonce);
    }
    Ok(())
}

/// Handle Start: open an auction for a content record with its first bid.
///
/// The caller is the opening bidder; the creator is whoever authored the
/// content and receives the settlement payout.
#[allow(clippy::too_many_arguments)]
pub fn handle_start(
    state: &mut EngineState,
    asset: &mut dyn StableAsset,
    ctx: &CallContext,
    content_id: ContentId,
    creator: Address,
    creator_id: u64,
    bidder_id: u64,
    amount: u64,
    params: AuctionParams,
    envelope: &AuthorizationEnvelope,
) -> HandlerResult<Vec<AuctionEvent>> {
    if state.paused {
        return Err(AuctionError::Paused);
    }

    // One auction per content id, ever
    if state.get_auction(&content_id).is_some() {
        return Err(AuctionError::AuctionAlreadyExists(content_id));
    }
    if content_id == [0u8; 32] {
        return Err(AuctionError::InvalidContentId);
    }
    if creator_id == 0 {
        return Err(AuctionError::InvalidCreatorId);
    }

    validate_params(&params, &state.config)?;

    // Authorization bound to exactly these values, caller as opening bidder
    let digest = start_digest(
        &content_id,
        &creator,
        creator_id,
        &ctx.sender,
        bidder_id,
        amount,
        &params,
        &envelope.nonce,
        envelope.deadline,
    );
    check_authorization(state, ctx, &digest, envelope)?;

    if amount < params.min_bid {
        return Err(AuctionError::InvalidBidAmount {
            required: params.min_bid,
            got: amount,
        });
    }

    // Escrow the opening bid
    asset.pull(&ctx.sender, amount)?;

    state.consume_nonce(envelope.nonce);
    let end_time = ctx.timestamp.saturating_add(params.duration);
    state.auctions.insert(
        content_id,
        AuctionRecord {
            creator,
            creator_id,
            highest_bidder: ctx.sender,
            highest_bidder_id: bidder_id,
            highest_bid: amount,
            last_bid_at: ctx.timestamp,
            end_time,
            bid_count: 1,
            phase: AuctionPhase::Active,
            params: params.clone(),
        },
    );
    state.add_escrow(amount);

    Ok(vec![AuctionEvent::Started(AuctionStarted {
        content_id,
        creator,
        creator_id,
        bidder: ctx.sender,
        bidder_id,
        amount,
        end_time,
        params,
        timestamp: ctx.timestamp,
    })])
}

/// Handle Bid: outbid the current highest bid.
pub fn handle_bid(
    state: &mut EngineState,
    asset: &mut dyn StableAsset,
    ctx: &CallContext,
    content_id: ContentId,
    bidder_id: u64,
    amount: u64,
    envelope: &AuthorizationEnvelope,
) -> HandlerResult<Vec<AuctionEvent>> {
    if state.paused {
        return Err(AuctionError::Paused);
    }

    let record = state
        .get_auction(&content_id)
        .ok_or(AuctionError::AuctionNotFound(content_id))?;
    if record.phase_at(ctx.timestamp) != AuctionPhase::Active {
        return Err(AuctionError::AuctionNotActive);
    }
    let required = record.min_next_bid();
    let previous_bidder = record.highest_bidder;
    let previous_bid = record.highest_bid;

    let digest = bid_digest(
        &content_id,
        &ctx.sender,
        bidder_id,
        amount,
        &envelope.nonce,
        envelope.deadline,
    );
    check_authorization(state, ctx, &digest, envelope)?;

    if amount < required {
        return Err(AuctionError::InvalidBidAmount {
            required,
            got: amount,
        });
    }

    // Escrow the new bid, then release the outbid one. Custody always
    // covers the refund, so the pull is the only fallible step.
    asset.pull(&ctx.sender, amount)?;
    asset.push(&previous_bidder, previous_bid)?;

    state.consume_nonce(envelope.nonce);
    state.add_escrow(amount);
    state.subtract_escrow(previous_bid);

    let now = ctx.timestamp;
    let record = state
        .get_auction_mut(&content_id)
        .ok_or(AuctionError::AuctionNotFound(content_id))?;
    record.highest_bidder = ctx.sender;
    record.highest_bidder_id = bidder_id;
    record.highest_bid = amount;
    record.last_bid_at = now;
    record.bid_count += 1;

    let mut events = vec![
        AuctionEvent::Refunded(BidRefunded {
            content_id,
            bidder: previous_bidder,
            amount: previous_bid,
            timestamp: now,
        }),
        AuctionEvent::BidPlaced(BidPlaced {
            content_id,
            bidder: ctx.sender,
            bidder_id,
            amount,
            previous_bidder,
            previous_bid,
            bid_count: record.bid_count,
            end_time: record.end_time,
            timestamp: now,
        }),
    ];

    // Anti-snipe: a bid inside the threshold window pushes the deadline
    // out to sit the full extension after the bid, every time it happens.
    // The deadline never moves backwards.
    if record.end_time - now <= record.params.extension_threshold {
        let pushed = now.saturating_add(record.params.extension);
        if pushed > record.end_time {
            record.end_time = pushed;
            events.push(AuctionEvent::Extended(AuctionExtended {
                content_id,
                new_end_time: pushed,
                timestamp: now,
            }));
        }
    }

    Ok(events)
}

/// Handle Settle: pay out an ended auction and mint the collectible.
pub fn handle_settle(
    state: &mut EngineState,
    asset: &mut dyn StableAsset,
    minter: &mut dyn CollectibleMinter,
    ctx: &CallContext,
    content_id: ContentId,
) -> HandlerResult<Vec<AuctionEvent>> {
    if state.paused {
        return Err(AuctionError::Paused);
    }
    check_settleable(state, ctx.timestamp, &content_id)?;
    let event = apply_settle(state, asset, minter, ctx.timestamp, content_id)?;
    Ok(vec![event])
}

/// Handle BatchSettle: settle several auctions as one unit.
///
/// Validation runs over the whole batch before anything is applied, so a
/// single bad id fails the call with no auction settled.
pub fn handle_batch_settle(
    state: &mut EngineState,
    asset: &mut dyn StableAsset,
    minter: &mut dyn CollectibleMinter,
    ctx: &CallContext,
    content_ids: &[ContentId],
) -> HandlerResult<Vec<AuctionEvent>> {
    if state.paused {
        return Err(AuctionError::Paused);
    }

    // A duplicate id would settle twice, so it fails the batch up front
    let mut seen = HashSet::new();
    for content_id in content_ids {
        if !seen.insert(*content_id) {
            return Err(AuctionError::AuctionAlreadySettled);
        }
        check_settleable(state, ctx.timestamp, content_id)?;
    }

    let mut events = Vec::with_capacity(content_ids.len());
    for content_id in content_ids {
        events.push(apply_settle(state, asset, minter, ctx.timestamp, *content_id)?);
    }
    Ok(events)
}

/// Handle Cancel: terminate an active auction and refund its highest bid.
pub fn handle_cancel(
    state: &mut EngineState,
    asset: &mut dyn StableAsset,
    ctx: &CallContext,
    content_id: ContentId,
    envelope: &AuthorizationEnvelope,
) -> HandlerResult<Vec<AuctionEvent>> {
    if state.paused {
        return Err(AuctionError::Paused);
    }

    let record = state
        .get_auction(&content_id)
        .ok_or(AuctionError::AuctionNotFound(content_id))?;
    if record.phase_at(ctx.timestamp) != AuctionPhase::Active {
        return Err(AuctionError::AuctionNotActive);
    }
    let bidder = record.highest_bidder;
    let refund = record.highest_bid;

    let digest = cancel_digest(&content_id, &envelope.nonce, envelope.deadline);
    check_authorization(state, ctx, &digest, envelope)?;

    asset.push(&bidder, refund)?;

    state.consume_nonce(envelope.nonce);
    state.subtract_escrow(refund);
    let record = state
        .get_auction_mut(&content_id)
        .ok_or(AuctionError::AuctionNotFound(content_id))?;
    record.phase = AuctionPhase::Cancelled;

    let now = ctx.timestamp;
    Ok(vec![
        AuctionEvent::Refunded(BidRefunded {
            content_id,
            bidder,
            amount: refund,
            timestamp: now,
        }),
        AuctionEvent::Cancelled(AuctionCancelled {
            content_id,
            timestamp: now,
        }),
    ])
}

/// Check that one content id can settle right now, without mutating.
fn check_settleable(state: &EngineState, now: u64, content_id: &ContentId) -> HandlerResult<()> {
    let record = state
        .get_auction(content_id)
        .ok_or(AuctionError::AuctionNotFound(*content_id))?;
    match record.phase_at(now) {
        AuctionPhase::Ended => Ok(()),
        AuctionPhase::Active => Err(AuctionError::AuctionNotEnded),
        AuctionPhase::Settled => Err(AuctionError::AuctionAlreadySettled),
        AuctionPhase::Cancelled => Err(AuctionError::AuctionCancelled),
        AuctionPhase::None => Err(AuctionError::AuctionNotFound(*content_id)),
    }
}

/// Apply one settlement after [`check_settleable`] passed.
///
/// Custody always covers the winning bid of a record in the Ended phase,
/// and the Settled check rules out a second mint, so the effects here
/// cannot fail against the engine's own asset and minter.
fn apply_settle(
    state: &mut EngineState,
    asset: &mut dyn StableAsset,
    minter: &mut dyn CollectibleMinter,
    now: u64,
    content_id: ContentId,
) -> HandlerResult<AuctionEvent> {
    let record = state
        .get_auction(&content_id)
        .ok_or(AuctionError::AuctionNotFound(content_id))?;
    let winner = record.highest_bidder;
    let winner_id = record.highest_bidder_id;
    let amount = record.highest_bid;
    let creator = record.creator;
    let creator_id = record.creator_id;

    // Fee to the treasury; the remainder, rounding dust included, to the
    // creator. The two always sum to the winning bid exactly.
    let protocol_fee = mul_bps(amount, record.params.protocol_fee_bps);
    let creator_amount = amount - protocol_fee;
    let treasury = state.treasury;

    asset.push(&treasury, protocol_fee)?;
    asset.push(&creator, creator_amount)?;
    minter.mint(&winner, &content_id, creator_id, &creator)?;

    state.subtract_escrow(amount);
    let record = state
        .get_auction_mut(&content_id)
        .ok_or(AuctionError::AuctionNotFound(content_id))?;
    record.phase = AuctionPhase::Settled;

    Ok(AuctionEvent::Settled(AuctionSettled {
        content_id,
        winner,
        winner_id,
        amount,
        protocol_fee,
        creator_amount,
        creator,
        treasury,
        timestamp: now,
    }))
}

// ============ Admin Handlers ============

fn require_admin(state: &EngineState, ctx: &CallContext) -> HandlerResult<()> {
    if ctx.sender != state.admin {
        return Err(AuctionError::NotAuthorized);
    }
    Ok(())
}

/// Register an identity as an accepted authorizer.
pub fn handle_allow_authorizer(
    state: &mut EngineState,
    ctx: &CallContext,
    authorizer: Address,
) -> HandlerResult<()> {
    require_admin(state, ctx)?;
    state.authorizers.insert(authorizer);
    Ok(())
}

/// Remove an identity from the authorizer set.
pub fn handle_deny_authorizer(
    state: &mut EngineState,
    ctx: &CallContext,
    authorizer: Address,
) -> HandlerResult<()> {
    require_admin(state, ctx)?;
    state.authorizers.remove(&authorizer);
    Ok(())
}

/// Change the protocol-fee recipient.
pub fn handle_set_treasury(
    state: &mut EngineState,
    ctx: &CallContext,
    treasury: Address,
) -> HandlerResult<()> {
    require_admin(state, ctx)?;
    if treasury == [0u8; 32] {
        return Err(AuctionError::InvalidConfig("treasury cannot be zero".into()));
    }
    state.treasury = treasury;
    Ok(())
}

/// Replace the global auction config and bump its version.
pub fn handle_set_config(
    state: &mut EngineState,
    ctx: &CallContext,
    config: AuctionConfig,
) -> HandlerResult<()> {
    require_admin(state, ctx)?;
    check_config(&config).map_err(AuctionError::InvalidConfig)?;
    state.config = config;
    state.config_version += 1;
    Ok(())
}

/// Block all state-changing auction calls.
pub fn handle_pause(state: &mut EngineState, ctx: &CallContext) -> HandlerResult<()> {
    require_admin(state, ctx)?;
    state.paused = true;
    Ok(())
}

/// Re-enable state-changing auction calls.
pub fn handle_unpause(state: &mut EngineState, ctx: &CallContext) -> HandlerResult<()> {
    require_admin(state, ctx)?;
    state.paused = false;
    Ok(())
}
