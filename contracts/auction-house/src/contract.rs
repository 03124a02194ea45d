use commons::{AuctionError, AuctionId, BidEntry, ContractResult, SettlementOutcome};
use concordium_std::*;

use crate::events::AuctionHouseEvent;
use crate::external::{AuctionView, StartAuctionParams};
use crate::state::State;

/// Initialize the auction house with an empty registry.
#[init(contract = "AuctionHouse")]
fn contract_init<S: HasStateApi>(
    _ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    Ok(State::new(state_builder))
}

/// Register a new item for auction under a fresh identifier.
///
/// The bidding window is caller-supplied and is not validated against the
/// current slot time; admission of bids and settlement is gated on the
/// closing edge only.
#[receive(
    mutable,
    contract = "AuctionHouse",
    name = "startAuction",
    parameter = "StartAuctionParams",
    error = "AuctionError",
    enable_logger
)]
fn contract_start_auction<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params: StartAuctionParams = ctx.parameter_cursor().get()?;

    host.state_mut().start_auction(&params)?;

    logger.log(&AuctionHouseEvent::started(&params))?;

    Ok(())
}

/// Receive function in which accounts bid on an item before its window
/// closes. The attached CCD is the bid and stays in custody while the bid
/// leads. The displaced leading bid is refunded in full within the same
/// call, after the registry has been updated; account transfers cannot
/// re-enter the contract and cannot be refused by the recipient.
#[receive(
    mutable,
    payable,
    contract = "AuctionHouse",
    name = "bidAuction",
    parameter = "AuctionId",
    error = "AuctionError",
    enable_logger
)]
fn contract_bid_auction<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    amount: Amount,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let id: AuctionId = ctx.parameter_cursor().get()?;

    let bidder = match ctx.sender() {
        Address::Account(bidder) => bidder,
        Address::Contract(_) => bail!(AuctionError::OnlyAccountAddress),
    };
    let now = ctx.metadata().slot_time();

    let displaced = host.state_mut().bid(id, bidder, amount, now)?;

    logger.log(&AuctionHouseEvent::bid(id, &bidder, amount))?;

    if let Some(refund) = displaced {
        host.invoke_transfer(&refund.bidder, refund.amount)?;
    }

    Ok(())
}

/// Settle an auction whose window has closed: release the winning bid to
/// the seller and freeze the record. Open to any caller. Settling twice is
/// rejected, so the proceeds move at most once.
#[receive(
    mutable,
    contract = "AuctionHouse",
    name = "endAuction",
    parameter = "AuctionId",
    error = "AuctionError",
    enable_logger
)]
fn contract_end_auction<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let id: AuctionId = ctx.parameter_cursor().get()?;
    let now = ctx.metadata().slot_time();

    let outcome = host.state_mut().settle(id, now)?;

    match outcome {
        SettlementOutcome::Sale {
            seller,
            winner,
            proceeds,
        } => {
            logger.log(&AuctionHouseEvent::settled(id, &seller, Some(&winner), proceeds))?;
            host.invoke_transfer(&seller, proceeds)?;
        }
        SettlementOutcome::NoSale { seller } => {
            logger.log(&AuctionHouseEvent::settled(id, &seller, None, Amount::zero()))?;
        }
    }

    Ok(())
}

/// Full record of an item under auction.
#[receive(
    contract = "AuctionHouse",
    name = "getAuction",
    parameter = "AuctionId",
    return_value = "AuctionView",
    error = "AuctionError"
)]
fn contract_get_auction<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<AuctionView> {
    let id: AuctionId = ctx.parameter_cursor().get()?;
    host.state().view_auction(id)
}

/// Accepted bids for an item, oldest first. An item without bids, or an
/// unknown identifier, yields an empty list rather than an error.
#[receive(
    contract = "AuctionHouse",
    name = "getBid",
    parameter = "AuctionId",
    return_value = "Vec<BidEntry>",
    error = "AuctionError"
)]
fn contract_get_bid<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Vec<BidEntry>> {
    let id: AuctionId = ctx.parameter_cursor().get()?;
    Ok(host.state().bid_history(id))
}

/// Account that deployed this instance.
#[receive(
    contract = "AuctionHouse",
    name = "viewOwner",
    return_value = "AccountAddress"
)]
fn contract_view_owner<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    _host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<AccountAddress> {
    Ok(ctx.owner())
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use core::fmt::Debug;
    use test_infrastructure::*;

    const OWNER: AccountAddress = AccountAddress([0u8; 32]);
    const SELLER: AccountAddress = AccountAddress([1u8; 32]);
    const ALICE: AccountAddress = AccountAddress([2u8; 32]);

    const OPENING: u64 = 100;
    const FIVE_DAYS: u64 = 5 * 24 * 60 * 60 * 1000;
    const CLOSING: u64 = OPENING + FIVE_DAYS;

    fn start_params(id: AuctionId) -> StartAuctionParams {
        StartAuctionParams {
            id,
            name: "Sealed box".into(),
            description: "Estate lot, contents unknown".into(),
            item_ref: 650,
            seller: SELLER,
            minimum_bid: Amount::from_micro_ccd(1_000),
            start: Timestamp::from_timestamp_millis(OPENING),
            end: Timestamp::from_timestamp_millis(CLOSING),
        }
    }

    fn new_ctx<'a>(sender: AccountAddress, slot_time_ms: u64) -> TestReceiveContext<'a> {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(sender));
        ctx.set_owner(OWNER);
        ctx.set_metadata_slot_time(Timestamp::from_timestamp_millis(slot_time_ms));
        ctx
    }

    fn fresh_host() -> TestHost<State<TestStateApi>> {
        let mut state_builder = TestStateBuilder::new();
        let state = State::new(&mut state_builder);
        TestHost::new(state, state_builder)
    }

    fn expect_error<E, T>(expr: Result<T, E>, err: E, msg: &str)
    where
        E: Eq + Debug,
        T: Debug,
    {
        let actual = expr.expect_err(msg);
        assert_eq!(actual, err);
    }

    fn start_auction(
        host: &mut TestHost<State<TestStateApi>>,
        params: &StartAuctionParams,
    ) -> ContractResult<()> {
        let parameter = to_bytes(params);
        let mut ctx = new_ctx(SELLER, OPENING);
        ctx.set_parameter(&parameter);
        let mut logger = TestLogger::init();
        contract_start_auction(&ctx, host, &mut logger)
    }

    fn bid_auction(
        host: &mut TestHost<State<TestStateApi>>,
        bidder: AccountAddress,
        id: AuctionId,
        amount: Amount,
        slot_time_ms: u64,
    ) -> ContractResult<()> {
        let parameter = to_bytes(&id);
        let mut ctx = new_ctx(bidder, slot_time_ms);
        ctx.set_parameter(&parameter);
        let mut logger = TestLogger::init();
        contract_bid_auction(&ctx, host, amount, &mut logger)
    }

    fn end_auction(
        host: &mut TestHost<State<TestStateApi>>,
        id: AuctionId,
        slot_time_ms: u64,
    ) -> ContractResult<()> {
        let parameter = to_bytes(&id);
        let mut ctx = new_ctx(OWNER, slot_time_ms);
        ctx.set_parameter(&parameter);
        let mut logger = TestLogger::init();
        contract_end_auction(&ctx, host, &mut logger)
    }

    fn get_auction(
        host: &TestHost<State<TestStateApi>>,
        id: AuctionId,
    ) -> ContractResult<AuctionView> {
        let parameter = to_bytes(&id);
        let mut ctx = new_ctx(OWNER, OPENING);
        ctx.set_parameter(&parameter);
        contract_get_auction(&ctx, host)
    }

    fn get_bid(
        host: &TestHost<State<TestStateApi>>,
        id: AuctionId,
    ) -> ContractResult<Vec<BidEntry>> {
        let parameter = to_bytes(&id);
        let mut ctx = new_ctx(OWNER, OPENING);
        ctx.set_parameter(&parameter);
        contract_get_bid(&ctx, host)
    }

    #[concordium_test]
    fn test_init_builds_empty_registry() {
        let mut state_builder = TestStateBuilder::new();
        let ctx = TestInitContext::empty();

        let state = contract_init(&ctx, &mut state_builder)
            .expect("Contract initialization should succeed");

        let host = TestHost::new(state, state_builder);
        expect_error(
            get_auction(&host, 1),
            AuctionError::AuctionNotFound,
            "A fresh registry should hold no auctions",
        );
    }

    #[concordium_test]
    fn test_view_owner() {
        let host = fresh_host();
        let ctx = new_ctx(ALICE, OPENING);
        let owner = contract_view_owner(&ctx, &host).expect("Owner view should succeed");
        assert_eq!(owner, OWNER);
    }

    #[concordium_test]
    fn test_start_auction_registers_item() {
        let mut host = fresh_host();
        start_auction(&mut host, &start_params(1)).expect("Starting an auction should succeed");

        let view = get_auction(&host, 1).expect("Registered auction should be readable");
        assert_eq!(
            view,
            AuctionView {
                id: 1,
                name: "Sealed box".into(),
                description: "Estate lot, contents unknown".into(),
                item_ref: 650,
                seller: SELLER,
                minimum_bid: Amount::from_micro_ccd(1_000),
                highest_bidder: None,
                highest_bid: Amount::zero(),
                start: Timestamp::from_timestamp_millis(OPENING),
                ended: false,
                end: Timestamp::from_timestamp_millis(CLOSING),
                ended_at: None,
            }
        );
    }

    #[concordium_test]
    fn test_start_auction_rejects_duplicate_id() {
        let mut host = fresh_host();
        start_auction(&mut host, &start_params(1)).expect("Starting an auction should succeed");

        let mut second = start_params(1);
        second.name = "Replacement listing".into();
        expect_error(
            start_auction(&mut host, &second),
            AuctionError::DuplicateAuctionId,
            "Reusing an identifier should be rejected",
        );

        // The original record is untouched by the rejected registration.
        let view = get_auction(&host, 1).expect("Original auction should still be readable");
        assert_eq!(view.name, "Sealed box");
    }

    #[concordium_test]
    fn test_bid_escrows_and_refunds_displaced_leader() {
        let mut host = fresh_host();
        start_auction(&mut host, &start_params(1)).expect("Starting an auction should succeed");

        host.set_self_balance(Amount::from_micro_ccd(1_200));
        bid_auction(
            &mut host,
            ALICE,
            1,
            Amount::from_micro_ccd(1_200),
            OPENING + 10,
        )
        .expect("First bid above the minimum should be accepted");

        let view = get_auction(&host, 1).expect("Auction should be readable");
        assert_eq!(view.highest_bidder, Some(ALICE));
        assert_eq!(view.highest_bid, Amount::from_micro_ccd(1_200));
        assert!(host.get_transfers().is_empty());

        // The contract owner outbidding a third party is allowed.
        host.set_self_balance(Amount::from_micro_ccd(2_600));
        bid_auction(
            &mut host,
            OWNER,
            1,
            Amount::from_micro_ccd(1_400),
            OPENING + 20,
        )
        .expect("Higher bid should be accepted");

        // The displaced bidder is refunded in full, exactly once.
        assert_eq!(
            host.get_transfers(),
            [(ALICE, Amount::from_micro_ccd(1_200))]
        );

        let view = get_auction(&host, 1).expect("Auction should be readable");
        assert_eq!(view.highest_bidder, Some(OWNER));
        assert_eq!(view.highest_bid, Amount::from_micro_ccd(1_400));

        let history = get_bid(&host, 1).expect("Bid history should be readable");
        assert_eq!(
            history,
            [
                BidEntry {
                    bidder: ALICE,
                    amount: Amount::from_micro_ccd(1_200),
                    timestamp: Timestamp::from_timestamp_millis(OPENING + 10),
                },
                BidEntry {
                    bidder: OWNER,
                    amount: Amount::from_micro_ccd(1_400),
                    timestamp: Timestamp::from_timestamp_millis(OPENING + 20),
                },
            ]
        );
    }

    #[concordium_test]
    fn test_bid_rejects_unknown_auction() {
        let mut host = fresh_host();
        start_auction(&mut host, &start_params(1)).expect("Starting an auction should succeed");

        expect_error(
            bid_auction(&mut host, ALICE, 10, Amount::from_micro_ccd(1_200), OPENING),
            AuctionError::AuctionNotFound,
            "Bidding on an unknown identifier should be rejected",
        );
    }

    #[concordium_test]
    fn test_first_bid_must_exceed_minimum() {
        let mut host = fresh_host();
        start_auction(&mut host, &start_params(1)).expect("Starting an auction should succeed");

        expect_error(
            bid_auction(&mut host, ALICE, 1, Amount::from_micro_ccd(1_000), OPENING),
            AuctionError::BelowMinimumBid,
            "A first bid equal to the minimum should be rejected",
        );

        host.set_self_balance(Amount::from_micro_ccd(1_001));
        bid_auction(&mut host, ALICE, 1, Amount::from_micro_ccd(1_001), OPENING)
            .expect("A first bid above the minimum should be accepted");
    }

    #[concordium_test]
    fn test_bid_must_exceed_standing_bid() {
        let mut host = fresh_host();
        start_auction(&mut host, &start_params(1)).expect("Starting an auction should succeed");

        host.set_self_balance(Amount::from_micro_ccd(1_200));
        bid_auction(&mut host, ALICE, 1, Amount::from_micro_ccd(1_200), OPENING)
            .expect("First bid above the minimum should be accepted");

        expect_error(
            bid_auction(&mut host, OWNER, 1, Amount::from_micro_ccd(1_200), OPENING),
            AuctionError::BelowCurrentBid,
            "Matching the standing bid should be rejected",
        );
    }

    #[concordium_test]
    fn test_bid_rejected_once_window_closes() {
        let mut host = fresh_host();
        start_auction(&mut host, &start_params(1)).expect("Starting an auction should succeed");

        expect_error(
            bid_auction(&mut host, ALICE, 1, Amount::from_micro_ccd(1_200), CLOSING),
            AuctionError::AuctionAlreadyEnded,
            "Bidding at the closing time should be rejected",
        );
    }

    #[concordium_test]
    fn test_bid_rejects_contract_sender() {
        let mut host = fresh_host();
        start_auction(&mut host, &start_params(1)).expect("Starting an auction should succeed");

        let parameter = to_bytes(&1u64);
        let mut ctx = new_ctx(ALICE, OPENING);
        ctx.set_sender(Address::Contract(ContractAddress {
            index: 5,
            subindex: 0,
        }));
        ctx.set_parameter(&parameter);
        let mut logger = TestLogger::init();
        expect_error(
            contract_bid_auction(&ctx, &mut host, Amount::from_micro_ccd(1_200), &mut logger),
            AuctionError::OnlyAccountAddress,
            "Bids from contract addresses should be rejected",
        );
    }

    #[concordium_test]
    fn test_settlement_pays_seller_exactly_once() {
        let mut host = fresh_host();
        start_auction(&mut host, &start_params(1)).expect("Starting an auction should succeed");

        host.set_self_balance(Amount::from_micro_ccd(1_200));
        bid_auction(&mut host, ALICE, 1, Amount::from_micro_ccd(1_200), OPENING)
            .expect("First bid above the minimum should be accepted");
        host.set_self_balance(Amount::from_micro_ccd(2_600));
        bid_auction(
            &mut host,
            OWNER,
            1,
            Amount::from_micro_ccd(1_400),
            OPENING + 10,
        )
        .expect("Higher bid should be accepted");

        expect_error(
            end_auction(&mut host, 1, CLOSING - 1),
            AuctionError::AuctionNotYetEnded,
            "Settling before the closing time should be rejected",
        );

        end_auction(&mut host, 1, CLOSING).expect("Settling at the closing time should succeed");

        assert_eq!(
            host.get_transfers(),
            [
                (ALICE, Amount::from_micro_ccd(1_200)),
                (SELLER, Amount::from_micro_ccd(1_400)),
            ]
        );

        let view = get_auction(&host, 1).expect("Auction should be readable");
        assert_eq!(view.highest_bidder, Some(OWNER));
        assert_eq!(view.highest_bid, Amount::from_micro_ccd(1_400));
        assert!(view.ended);
        assert_eq!(view.ended_at, Some(Timestamp::from_timestamp_millis(CLOSING)));

        // Repeat settlement is rejected and moves no further funds.
        expect_error(
            end_auction(&mut host, 1, CLOSING + 10),
            AuctionError::AuctionAlreadyEnded,
            "Settling a second time should be rejected",
        );
        assert_eq!(host.get_transfers().len(), 2);
    }

    #[concordium_test]
    fn test_settlement_without_bids_moves_no_funds() {
        let mut host = fresh_host();
        start_auction(&mut host, &start_params(1)).expect("Starting an auction should succeed");

        end_auction(&mut host, 1, CLOSING).expect("Settling without bids should succeed");

        assert!(host.get_transfers().is_empty());
        let view = get_auction(&host, 1).expect("Auction should be readable");
        assert!(view.ended);
        assert_eq!(view.highest_bid, Amount::zero());
    }

    #[concordium_test]
    fn test_settlement_rejects_unknown_auction() {
        let mut host = fresh_host();
        expect_error(
            end_auction(&mut host, 3, CLOSING),
            AuctionError::AuctionNotFound,
            "Settling an unknown identifier should be rejected",
        );
    }

    #[concordium_test]
    fn test_bid_history_is_empty_without_bids() {
        let mut host = fresh_host();

        // Unknown identifiers read as an empty history, not an error.
        assert_eq!(get_bid(&host, 1), Ok(Vec::new()));

        start_auction(&mut host, &start_params(1)).expect("Starting an auction should succeed");
        assert_eq!(get_bid(&host, 1), Ok(Vec::new()));
    }
}
