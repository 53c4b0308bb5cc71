//! End-to-end integration tests for the collectible auction service.
//!
//! These tests drive the full auction lifecycle through the engine:
//! 1. Genesis validation and account funding
//! 2. Authorized start with the opening bid escrowed
//! 3. Competitive bidding with exact refunds and anti-snipe extensions
//! 4. Settlement with the fee split and the collectible mint
//! 5. Cancellation, batch settlement, pausing, and authorizer rotation

use auction_client::{authorize_bid, authorize_cancel, authorize_start};
use auction_crypto::{generate_signing_key, identity_of};
use auction_engine::{
    dispatch, handle_query, AssetError, AuctionCall, AuctionError, AuctionEvent,
    AuctionGenesisConfig, AuctionQuery, AuctionQueryResponse, AuctionSummary, CallContext,
    ConfigInfo, EngineState, LedgerAsset, MintBook,
};
use auction_types::{Address, AuctionConfig, AuctionParams, AuctionPhase, ContentId, Nonce};

use ed25519_dalek::SigningKey;

const ADMIN: Address = [100u8; 32];
const TREASURY: Address = [101u8; 32];
const CREATOR: Address = [102u8; 32];
const ALICE: Address = [1u8; 32];
const BOB: Address = [2u8; 32];
const CAROL: Address = [3u8; 32];
const DAVE: Address = [4u8; 32];
const SETTLER: Address = [55u8; 32];

const CONTENT: ContentId = [42u8; 32];
const CONTENT_B: ContentId = [43u8; 32];

const CREATOR_ID: u64 = 7;
const ALICE_ID: u64 = 11;
const BOB_ID: u64 = 12;
const CAROL_ID: u64 = 13;
const DAVE_ID: u64 = 14;

const DEADLINE: u64 = 1_000_000_000;
const FUNDS: u64 = 100_000_000;

/// The worked lifecycle: start, rejected underbid, winning late bid with
/// an extension, settlement with the exact fee split.
#[test]
fn test_full_auction_lifecycle() {
    // ========================================
    // Phase 1: Genesis and funding
    // ========================================

    let mut world = setup();
    assert_eq!(escrow_total(&world, 0), 0);

    println!("Genesis loaded: one authorizer registered, bidders funded");

    // ========================================
    // Phase 2: Alice opens the auction
    // ========================================

    let call = start_call(&world, CONTENT, ALICE, ALICE_ID, 1_000_000);
    let events = apply(&mut world, ALICE, 0, call).expect("Failed to start auction");

    assert_eq!(events.len(), 1);
    match &events[0] {
        AuctionEvent::Started(e) => {
            assert_eq!(e.content_id, CONTENT);
            assert_eq!(e.bidder, ALICE);
            assert_eq!(e.amount, 1_000_000);
            assert_eq!(e.end_time, 86_400);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    assert_eq!(world.asset.balance_of(&ALICE), FUNDS - 1_000_000);
    assert_eq!(escrow_total(&world, 0), 1_000_000);
    assert_eq!(min_next_bid(&world, CONTENT, 0), Some(1_100_000));

    println!("Auction started: opening bid 1_000_000, ends at 86_400");

    // ========================================
    // Phase 3: Carol underbids and is rejected
    // ========================================

    // 1_050_000 beats the opening bid but not the 10% increment
    let call = bid_call(&world, CONTENT, CAROL, CAROL_ID, 1_050_000);
    let result = apply(&mut world, CAROL, 50_000, call);

    assert_eq!(
        result.unwrap_err(),
        AuctionError::InvalidBidAmount {
            required: 1_100_000,
            got: 1_050_000,
        }
    );

    // The rejection left no trace
    assert_eq!(world.asset.balance_of(&CAROL), FUNDS);
    assert_eq!(escrow_total(&world, 50_000), 1_000_000);
    let summary = auction_summary(&world, CONTENT, 50_000).expect("Auction must exist");
    assert_eq!(summary.highest_bidder, ALICE);
    assert_eq!(summary.bid_count, 1);
    assert_eq!(summary.end_time, 86_400);

    println!("Underbid of 1_050_000 rejected: 1_100_000 required");

    // ========================================
    // Phase 4: Bob wins with a late bid
    // ========================================

    // 400 seconds before the deadline, inside the 900-second window
    let call = bid_call(&world, CONTENT, BOB, BOB_ID, 1_100_000);
    let events = apply(&mut world, BOB, 86_000, call).expect("Failed to outbid");

    assert_eq!(events.len(), 3);
    match &events[0] {
        AuctionEvent::Refunded(e) => {
            assert_eq!(e.bidder, ALICE);
            assert_eq!(e.amount, 1_000_000);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    match &events[1] {
        AuctionEvent::BidPlaced(e) => {
            assert_eq!(e.bidder, BOB);
            assert_eq!(e.amount, 1_100_000);
            assert_eq!(e.previous_bidder, ALICE);
            assert_eq!(e.previous_bid, 1_000_000);
            assert_eq!(e.bid_count, 2);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    match &events[2] {
        AuctionEvent::Extended(e) => assert_eq!(e.new_end_time, 86_900),
        other => panic!("unexpected event: {other:?}"),
    }

    assert_eq!(world.asset.balance_of(&ALICE), FUNDS);
    assert_eq!(world.asset.balance_of(&BOB), FUNDS - 1_100_000);
    assert_eq!(escrow_total(&world, 86_000), 1_100_000);

    println!("Bob outbid at t=86_000: alice refunded in full, deadline now 86_900");

    // ========================================
    // Phase 5: Settlement
    // ========================================

    // Still active right up to the pushed deadline
    assert_eq!(phase(&world, CONTENT, 86_899), AuctionPhase::Active);
    assert_eq!(phase(&world, CONTENT, 86_900), AuctionPhase::Ended);

    let events = apply(
        &mut world,
        SETTLER,
        86_901,
        AuctionCall::Settle {
            content_id: CONTENT,
        },
    )
    .expect("Failed to settle");

    assert_eq!(events.len(), 1);
    match &events[0] {
        AuctionEvent::Settled(e) => {
            assert_eq!(e.winner, BOB);
            assert_eq!(e.amount, 1_100_000);
            assert_eq!(e.protocol_fee, 110_000);
            assert_eq!(e.creator_amount, 990_000);
            assert_eq!(e.protocol_fee + e.creator_amount, e.amount);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    assert_eq!(world.asset.balance_of(&TREASURY), 110_000);
    assert_eq!(world.asset.balance_of(&CREATOR), 990_000);
    assert_eq!(world.minter.owner_of(&CONTENT), Some(&BOB));
    assert_eq!(escrow_total(&world, 86_901), 0);
    assert_eq!(world.asset.custody(), 0);
    assert_eq!(phase(&world, CONTENT, 86_901), AuctionPhase::Settled);
    assert_eq!(min_next_bid(&world, CONTENT, 86_901), None);

    // Settlement is final: a second call pays and mints nothing
    let result = apply(
        &mut world,
        SETTLER,
        87_000,
        AuctionCall::Settle {
            content_id: CONTENT,
        },
    );
    assert_eq!(result.unwrap_err(), AuctionError::AuctionAlreadySettled);
    assert_eq!(world.asset.balance_of(&TREASURY), 110_000);
    assert_eq!(world.minter.minted_count(), 1);

    println!("\nAuction settled!");
    println!("  Treasury fee: 110_000");
    println!("  Creator payout: 990_000");
    println!("  Collectible minted to bob");
}

/// Every way an envelope can be misused, none of which moves funds.
#[test]
fn test_envelope_misuse_is_rejected() {
    let mut world = setup();
    let call = start_call(&world, CONTENT, ALICE, ALICE_ID, 1_000_000);
    apply(&mut world, ALICE, 0, call).expect("Failed to start auction");

    // A fresh envelope works once and its nonce is burned
    let envelope = authorize_bid(&world.authorizer, &CONTENT, &BOB, BOB_ID, 1_100_000, DEADLINE);
    let nonce = envelope.nonce;
    let call = AuctionCall::Bid {
        content_id: CONTENT,
        bidder_id: BOB_ID,
        amount: 1_100_000,
        envelope,
    };
    apply(&mut world, BOB, 100, call.clone()).expect("Fresh envelope must be accepted");
    assert!(nonce_used(&world, nonce));

    // Replaying the byte-identical call is caught by the nonce ledger
    let result = apply(&mut world, BOB, 200, call);
    assert_eq!(result.unwrap_err(), AuctionError::ReplayedNonce);

    // An envelope signed for one amount does not authorize another
    let envelope = authorize_bid(&world.authorizer, &CONTENT, &BOB, BOB_ID, 2_000_000, DEADLINE);
    let result = apply(
        &mut world,
        BOB,
        300,
        AuctionCall::Bid {
            content_id: CONTENT,
            bidder_id: BOB_ID,
            amount: 2_100_000,
            envelope,
        },
    );
    assert_eq!(result.unwrap_err(), AuctionError::InvalidSignature);

    // A key outside the authorizer set signs valid but worthless envelopes
    let outsider = generate_signing_key();
    assert!(!is_authorizer(&world, identity_of(&outsider)));
    let envelope = authorize_bid(&outsider, &CONTENT, &BOB, BOB_ID, 2_000_000, DEADLINE);
    let result = apply(
        &mut world,
        BOB,
        300,
        AuctionCall::Bid {
            content_id: CONTENT,
            bidder_id: BOB_ID,
            amount: 2_000_000,
            envelope,
        },
    );
    assert_eq!(result.unwrap_err(), AuctionError::UnauthorizedSigner);

    // A deadline in the past expires the envelope
    let envelope = authorize_bid(&world.authorizer, &CONTENT, &BOB, BOB_ID, 2_000_000, 400);
    let result = apply(
        &mut world,
        BOB,
        401,
        AuctionCall::Bid {
            content_id: CONTENT,
            bidder_id: BOB_ID,
            amount: 2_000_000,
            envelope,
        },
    );
    assert_eq!(
        result.unwrap_err(),
        AuctionError::ExpiredAuthorization {
            deadline: 400,
            now: 401,
        }
    );

    // None of the rejections touched funds or the record
    assert_eq!(world.asset.balance_of(&BOB), FUNDS - 1_100_000);
    assert_eq!(escrow_total(&world, 401), 1_100_000);
    let summary = auction_summary(&world, CONTENT, 401).expect("Auction must exist");
    assert_eq!(summary.highest_bid, 1_100_000);
    assert_eq!(summary.bid_count, 2);

    println!("All four misuse modes rejected without side effects");
}

/// Cancellation refunds the highest bidder and retires the content id.
#[test]
fn test_cancel_refunds_and_is_permanent() {
    let mut world = setup();
    let call = start_call(&world, CONTENT, ALICE, ALICE_ID, 1_000_000);
    apply(&mut world, ALICE, 0, call).expect("Failed to start auction");
    let call = bid_call(&world, CONTENT, BOB, BOB_ID, 1_100_000);
    apply(&mut world, BOB, 40_000, call).expect("Failed to outbid");

    let call = cancel_call(&world, CONTENT);
    let events = apply(&mut world, ADMIN, 60_000, call).expect("Failed to cancel");

    assert_eq!(events.len(), 2);
    match &events[0] {
        AuctionEvent::Refunded(e) => {
            assert_eq!(e.bidder, BOB);
            assert_eq!(e.amount, 1_100_000);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(matches!(&events[1], AuctionEvent::Cancelled(_)));

    assert_eq!(world.asset.balance_of(&ALICE), FUNDS);
    assert_eq!(world.asset.balance_of(&BOB), FUNDS);
    assert_eq!(escrow_total(&world, 60_000), 0);
    assert_eq!(phase(&world, CONTENT, 60_000), AuctionPhase::Cancelled);
    assert_eq!(world.minter.minted_count(), 0);

    println!("Auction cancelled: bob refunded 1_100_000, nothing minted");

    // A cancelled auction can never be settled
    let result = apply(
        &mut world,
        SETTLER,
        100_000,
        AuctionCall::Settle {
            content_id: CONTENT,
        },
    );
    assert_eq!(result.unwrap_err(), AuctionError::AuctionCancelled);

    // And its content id can never host a new auction
    let call = start_call(&world, CONTENT, ALICE, ALICE_ID, 1_000_000);
    let result = apply(&mut world, ALICE, 100_000, call);
    assert!(matches!(
        result.unwrap_err(),
        AuctionError::AuctionAlreadyExists(_)
    ));
}

/// A batch settles every id or none of them.
#[test]
fn test_batch_settle_is_all_or_nothing() {
    let mut world = setup();

    // Two auctions ending 10_000 seconds apart
    let call = start_call(&world, CONTENT, ALICE, ALICE_ID, 1_000_000);
    apply(&mut world, ALICE, 0, call).expect("Failed to start first auction");
    let call = start_call(&world, CONTENT_B, BOB, BOB_ID, 1_000_000);
    apply(&mut world, BOB, 10_000, call).expect("Failed to start second auction");

    // At t=90_000 the first has ended, the second is still running
    assert_eq!(phase(&world, CONTENT, 90_000), AuctionPhase::Ended);
    assert_eq!(phase(&world, CONTENT_B, 90_000), AuctionPhase::Active);

    let result = apply(
        &mut world,
        SETTLER,
        90_000,
        AuctionCall::BatchSettle {
            content_ids: vec![CONTENT, CONTENT_B],
        },
    );
    assert_eq!(result.unwrap_err(), AuctionError::AuctionNotEnded);

    // The whole batch was discarded, including the settleable id
    assert_eq!(world.asset.balance_of(&TREASURY), 0);
    assert_eq!(world.minter.minted_count(), 0);
    assert_eq!(escrow_total(&world, 90_000), 2_000_000);

    println!("Mixed batch rejected: nothing settled");

    // Listing an id twice would settle it twice; the batch refuses
    let result = apply(
        &mut world,
        SETTLER,
        100_000,
        AuctionCall::BatchSettle {
            content_ids: vec![CONTENT, CONTENT],
        },
    );
    assert_eq!(result.unwrap_err(), AuctionError::AuctionAlreadySettled);

    // Once both have ended the same batch clears in one call
    let events = apply(
        &mut world,
        SETTLER,
        100_000,
        AuctionCall::BatchSettle {
            content_ids: vec![CONTENT, CONTENT_B],
        },
    )
    .expect("Failed to settle batch");

    assert_eq!(events.len(), 2);
    assert_eq!(world.asset.balance_of(&TREASURY), 200_000);
    assert_eq!(world.asset.balance_of(&CREATOR), 1_800_000);
    assert_eq!(world.minter.owner_of(&CONTENT), Some(&ALICE));
    assert_eq!(world.minter.owner_of(&CONTENT_B), Some(&BOB));
    assert_eq!(escrow_total(&world, 100_000), 0);

    println!("Batch of 2 settled: treasury 200_000, both collectibles minted");
}

/// Pause blocks every lifecycle call while reads keep answering.
#[test]
fn test_pause_freezes_lifecycle_calls() {
    let mut world = setup();
    let call = start_call(&world, CONTENT, ALICE, ALICE_ID, 1_000_000);
    apply(&mut world, ALICE, 0, call).expect("Failed to start auction");

    // Only the admin can pause
    let result = apply(&mut world, BOB, 10, AuctionCall::Pause);
    assert_eq!(result.unwrap_err(), AuctionError::NotAuthorized);

    apply(&mut world, ADMIN, 10, AuctionCall::Pause).expect("Failed to pause");

    let call = start_call(&world, CONTENT_B, BOB, BOB_ID, 1_000_000);
    assert_eq!(
        apply(&mut world, BOB, 20, call).unwrap_err(),
        AuctionError::Paused
    );
    let call = bid_call(&world, CONTENT, BOB, BOB_ID, 1_100_000);
    assert_eq!(
        apply(&mut world, BOB, 20, call).unwrap_err(),
        AuctionError::Paused
    );
    assert_eq!(
        apply(
            &mut world,
            SETTLER,
            100_000,
            AuctionCall::Settle {
                content_id: CONTENT,
            },
        )
        .unwrap_err(),
        AuctionError::Paused
    );
    let call = cancel_call(&world, CONTENT);
    assert_eq!(
        apply(&mut world, ADMIN, 20, call).unwrap_err(),
        AuctionError::Paused
    );

    // Reads are unaffected
    assert_eq!(phase(&world, CONTENT, 20), AuctionPhase::Active);
    assert!(config_info(&world, 20).paused);

    println!("Paused: all four lifecycle calls rejected, queries still answer");

    apply(&mut world, ADMIN, 30, AuctionCall::Unpause).expect("Failed to unpause");
    assert!(!config_info(&world, 30).paused);

    let call = bid_call(&world, CONTENT, BOB, BOB_ID, 1_100_000);
    apply(&mut world, BOB, 40, call).expect("Bid must work after unpause");
}

/// Escrow accounting stays exact across interleaved auctions.
#[test]
fn test_escrow_tracks_concurrent_auctions() {
    let mut world = setup();

    let call = start_call(&world, CONTENT, ALICE, ALICE_ID, 1_000_000);
    apply(&mut world, ALICE, 0, call).expect("Failed to start first auction");
    let call = start_call(&world, CONTENT_B, BOB, BOB_ID, 1_000_000);
    apply(&mut world, BOB, 0, call).expect("Failed to start second auction");

    assert_eq!(escrow_total(&world, 0), 2_000_000);

    // Both active, same deadline, ordered by content id
    let active = active_auctions(&world, 0);
    assert_eq!(active.len(), 2);
    assert_eq!(active[0].content_id, CONTENT);
    assert_eq!(active[1].content_id, CONTENT_B);

    // Interleaved outbids: each pulls the new bid and refunds the old one
    let call = bid_call(&world, CONTENT, CAROL, CAROL_ID, 1_100_000);
    apply(&mut world, CAROL, 1_000, call).expect("Failed to outbid on first");
    assert_eq!(escrow_total(&world, 1_000), 2_100_000);

    let call = bid_call(&world, CONTENT_B, ALICE, ALICE_ID, 1_100_000);
    apply(&mut world, ALICE, 2_000, call).expect("Failed to outbid on second");
    assert_eq!(escrow_total(&world, 2_000), 2_200_000);

    // Cancelling one releases exactly its share
    let call = cancel_call(&world, CONTENT_B);
    apply(&mut world, ADMIN, 50_000, call).expect("Failed to cancel second");
    assert_eq!(escrow_total(&world, 50_000), 1_100_000);
    assert_eq!(active_auctions(&world, 50_000).len(), 1);

    // Settling the other drains custody completely
    apply(
        &mut world,
        SETTLER,
        86_500,
        AuctionCall::Settle {
            content_id: CONTENT,
        },
    )
    .expect("Failed to settle first");
    assert_eq!(escrow_total(&world, 86_500), 0);
    assert_eq!(world.asset.custody(), 0);
    assert!(active_auctions(&world, 86_500).is_empty());

    println!("Escrow exact at every step across two interleaved auctions");
}

/// A call that fails at the funds step burns nothing, so the caller can
/// fix the allowance and resubmit the same envelope.
#[test]
fn test_rejected_pull_burns_nothing() {
    let mut world = setup();

    // Dave has funds but never granted the custodian an allowance
    let params = default_params();
    let envelope = authorize_start(
        &world.authorizer,
        &CONTENT,
        &CREATOR,
        CREATOR_ID,
        &DAVE,
        DAVE_ID,
        1_000_000,
        &params,
        DEADLINE,
    );
    let nonce = envelope.nonce;
    let call = AuctionCall::Start {
        content_id: CONTENT,
        creator: CREATOR,
        creator_id: CREATOR_ID,
        bidder_id: DAVE_ID,
        amount: 1_000_000,
        params,
        envelope,
    };

    let result = apply(&mut world, DAVE, 0, call.clone());
    assert_eq!(
        result.unwrap_err(),
        AuctionError::Transfer(AssetError::InsufficientAllowance {
            required: 1_000_000,
            got: 0,
        })
    );

    // No record, no burned nonce, no moved funds
    assert_eq!(phase(&world, CONTENT, 0), AuctionPhase::None);
    assert!(!nonce_used(&world, nonce));
    assert_eq!(world.asset.balance_of(&DAVE), FUNDS);
    assert_eq!(escrow_total(&world, 0), 0);

    // Grant the allowance and resubmit without re-signing
    world.asset.approve(DAVE, FUNDS);
    apply(&mut world, DAVE, 0, call).expect("Same envelope must still be fresh");
    assert_eq!(phase(&world, CONTENT, 0), AuctionPhase::Active);
    assert!(nonce_used(&world, nonce));

    println!("Funds failure rolled back cleanly; envelope stayed usable");
}

/// Authorizers can be rotated at runtime through the admin surface.
#[test]
fn test_runtime_authorizer_rotation() {
    let mut world = setup();
    let original = identity_of(&world.authorizer);

    let call = start_call(&world, CONTENT, ALICE, ALICE_ID, 1_000_000);
    apply(&mut world, ALICE, 0, call).expect("Failed to start auction");

    // Register a second authorizer
    let second = generate_signing_key();
    let second_id = identity_of(&second);

    let result = apply(
        &mut world,
        BOB,
        10,
        AuctionCall::AllowAuthorizer {
            authorizer: second_id,
        },
    );
    assert_eq!(result.unwrap_err(), AuctionError::NotAuthorized);

    apply(
        &mut world,
        ADMIN,
        10,
        AuctionCall::AllowAuthorizer {
            authorizer: second_id,
        },
    )
    .expect("Failed to allow authorizer");
    assert!(is_authorizer(&world, second_id));

    // Its envelopes are accepted immediately
    let envelope = authorize_bid(&second, &CONTENT, &BOB, BOB_ID, 1_100_000, DEADLINE);
    apply(
        &mut world,
        BOB,
        20,
        AuctionCall::Bid {
            content_id: CONTENT,
            bidder_id: BOB_ID,
            amount: 1_100_000,
            envelope,
        },
    )
    .expect("Envelope from the new authorizer must be accepted");

    // Revoking the original strands its future envelopes
    apply(
        &mut world,
        ADMIN,
        30,
        AuctionCall::DenyAuthorizer {
            authorizer: original,
        },
    )
    .expect("Failed to deny authorizer");
    assert!(!is_authorizer(&world, original));

    let envelope = authorize_bid(
        &world.authorizer,
        &CONTENT,
        &CAROL,
        CAROL_ID,
        1_210_000,
        DEADLINE,
    );
    let result = apply(
        &mut world,
        CAROL,
        40,
        AuctionCall::Bid {
            content_id: CONTENT,
            bidder_id: CAROL_ID,
            amount: 1_210_000,
            envelope,
        },
    );
    assert_eq!(result.unwrap_err(), AuctionError::UnauthorizedSigner);

    println!("Authorizer rotated: new key live, old key revoked");
}

// Helper functions

struct World {
    state: EngineState,
    asset: LedgerAsset,
    minter: MintBook,
    authorizer: SigningKey,
}

fn setup() -> World {
    let authorizer = generate_signing_key();
    let genesis = AuctionGenesisConfig {
        admin: ADMIN,
        treasury: TREASURY,
        authorizers: vec![identity_of(&authorizer)],
        config: AuctionConfig {
            min_bid_amount: 1_000_000,
            min_auction_duration: 3600,
            max_auction_duration: 2_592_000,
            max_extension: 86_400,
        },
        genesis_time: 0,
    };
    let state = genesis.into_state().expect("Genesis must validate");

    let mut asset = LedgerAsset::new();
    for who in [ALICE, BOB, CAROL] {
        asset.credit(who, FUNDS);
        asset.approve(who, FUNDS);
    }
    // Dave is funded but grants no allowance
    asset.credit(DAVE, FUNDS);

    World {
        state,
        asset,
        minter: MintBook::new(),
        authorizer,
    }
}

fn apply(
    world: &mut World,
    sender: Address,
    timestamp: u64,
    call: AuctionCall,
) -> Result<Vec<AuctionEvent>, AuctionError> {
    let ctx = CallContext { sender, timestamp };
    dispatch(
        &mut world.state,
        &mut world.asset,
        &mut world.minter,
        &ctx,
        call,
    )
}

fn default_params() -> AuctionParams {
    AuctionParams {
        min_bid: 1_000_000,
        min_bid_increment_bps: 1000,
        protocol_fee_bps: 1000,
        duration: 86_400,
        extension: 900,
        extension_threshold: 900,
    }
}

fn start_call(
    world: &World,
    content_id: ContentId,
    bidder: Address,
    bidder_id: u64,
    amount: u64,
) -> AuctionCall {
    let params = default_params();
    let envelope = authorize_start(
        &world.authorizer,
        &content_id,
        &CREATOR,
        CREATOR_ID,
        &bidder,
        bidder_id,
        amount,
        &params,
        DEADLINE,
    );
    AuctionCall::Start {
        content_id,
        creator: CREATOR,
        creator_id: CREATOR_ID,
        bidder_id,
        amount,
        params,
        envelope,
    }
}

fn bid_call(
    world: &World,
    content_id: ContentId,
    bidder: Address,
    bidder_id: u64,
    amount: u64,
) -> AuctionCall {
    let envelope = authorize_bid(
        &world.authorizer,
        &content_id,
        &bidder,
        bidder_id,
        amount,
        DEADLINE,
    );
    AuctionCall::Bid {
        content_id,
        bidder_id,
        amount,
        envelope,
    }
}

fn cancel_call(world: &World, content_id: ContentId) -> AuctionCall {
    let envelope = authorize_cancel(&world.authorizer, &content_id, DEADLINE);
    AuctionCall::Cancel {
        content_id,
        envelope,
    }
}

fn escrow_total(world: &World, now: u64) -> u64 {
    match handle_query(&world.state, now, AuctionQuery::GetEscrowTotal) {
        AuctionQueryResponse::EscrowTotal(total) => total,
        other => panic!("unexpected response: {other:?}"),
    }
}

fn phase(world: &World, content_id: ContentId, now: u64) -> AuctionPhase {
    match handle_query(&world.state, now, AuctionQuery::GetPhase { content_id }) {
        AuctionQueryResponse::Phase(phase) => phase,
        other => panic!("unexpected response: {other:?}"),
    }
}

fn auction_summary(world: &World, content_id: ContentId, now: u64) -> Option<AuctionSummary> {
    match handle_query(&world.state, now, AuctionQuery::GetAuction { content_id }) {
        AuctionQueryResponse::Auction(summary) => summary,
        other => panic!("unexpected response: {other:?}"),
    }
}

fn min_next_bid(world: &World, content_id: ContentId, now: u64) -> Option<u64> {
    match handle_query(&world.state, now, AuctionQuery::GetMinNextBid { content_id }) {
        AuctionQueryResponse::MinNextBid(min_next) => min_next,
        other => panic!("unexpected response: {other:?}"),
    }
}

fn active_auctions(world: &World, now: u64) -> Vec<AuctionSummary> {
    match handle_query(&world.state, now, AuctionQuery::ListActiveAuctions) {
        AuctionQueryResponse::ActiveAuctions(active) => active,
        other => panic!("unexpected response: {other:?}"),
    }
}

fn config_info(world: &World, now: u64) -> ConfigInfo {
    match handle_query(&world.state, now, AuctionQuery::GetConfig) {
        AuctionQueryResponse::Config(info) => info,
        other => panic!("unexpected response: {other:?}"),
    }
}

fn nonce_used(world: &World, nonce: Nonce) -> bool {
    match handle_query(&world.state, 0, AuctionQuery::IsNonceUsed { nonce }) {
        AuctionQueryResponse::NonceUsed(used) => used,
        other => panic!("unexpected response: {other:?}"),
    }
}

fn is_authorizer(world: &World, authorizer: Address) -> bool {
    match handle_query(&world.state, 0, AuctionQuery::IsAuthorizer { authorizer }) {
        AuctionQueryResponse::IsAuthorizer(accepted) => accepted,
        other => panic!("unexpected response: {other:?}"),
    }
}
