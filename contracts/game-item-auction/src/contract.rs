use commons::{AuctionError, AuctionId, BidEntry, ContractResult, SettlementOutcome};
use concordium_std::*;

use crate::events::GameItemEvent;
use crate::external::{AuctionView, InitParams, StartAuctionParams};
use crate::state::State;

/// Initialize the contract with an empty registry and the bidding window
/// policy that every listing will use.
#[init(contract = "GameItemAuction", parameter = "InitParams")]
fn contract_init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    let params: InitParams = ctx.parameter_cursor().get()?;
    Ok(State::new(state_builder, params.bid_window))
}

/// Register a new game item under a fresh identifier. Bidding opens
/// immediately and closes after the configured window.
#[receive(
    mutable,
    contract = "GameItemAuction",
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
    let now = ctx.metadata().slot_time();

    let end = host.state_mut().start_auction(&params, now)?;

    logger.log(&GameItemEvent::started(
        params.id,
        params.item_ref,
        &params.seller,
        params.minimum_bid,
        now,
        end,
    ))?;

    Ok(())
}

/// Receive function in which accounts bid on an item before its window
/// closes. The displaced leading bid is refunded in full within the same
/// call, after the registry has been updated.
#[receive(
    mutable,
    payable,
    contract = "GameItemAuction",
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

    logger.log(&GameItemEvent::bid(id, &bidder, amount))?;

    if let Some(refund) = displaced {
        host.invoke_transfer(&refund.bidder, refund.amount)?;
    }

    Ok(())
}

/// Settle an auction whose window has closed: release the winning bid to
/// the seller and freeze the record.
#[receive(
    mutable,
    contract = "GameItemAuction",
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
            logger.log(&GameItemEvent::settled(id, &seller, Some(&winner), proceeds))?;
            host.invoke_transfer(&seller, proceeds)?;
        }
        SettlementOutcome::NoSale { seller } => {
            logger.log(&GameItemEvent::settled(id, &seller, None, Amount::zero()))?;
        }
    }

    Ok(())
}

/// Full record of an item under auction.
#[receive(
    contract = "GameItemAuction",
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

/// Accepted bids for an item, oldest first.
#[receive(
    contract = "GameItemAuction",
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
    contract = "GameItemAuction",
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

    const ONE_DAY: u64 = 24 * 60 * 60 * 1000;
    const REGISTERED: u64 = 500;

    fn start_params(id: AuctionId) -> StartAuctionParams {
        StartAuctionParams {
            item_ref: 10,
            seller: SELLER,
            minimum_bid: Amount::zero(),
            id,
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
        let state = State::new(&mut state_builder, Duration::from_days(1));
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
        slot_time_ms: u64,
    ) -> ContractResult<()> {
        let parameter = to_bytes(params);
        let mut ctx = new_ctx(SELLER, slot_time_ms);
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
        let mut ctx = new_ctx(OWNER, REGISTERED);
        ctx.set_parameter(&parameter);
        contract_get_auction(&ctx, host)
    }

    fn get_bid(
        host: &TestHost<State<TestStateApi>>,
        id: AuctionId,
    ) -> ContractResult<Vec<BidEntry>> {
        let parameter = to_bytes(&id);
        let mut ctx = new_ctx(OWNER, REGISTERED);
        ctx.set_parameter(&parameter);
        contract_get_bid(&ctx, host)
    }

    #[concordium_test]
    fn test_init_reads_bid_window() {
        let params = InitParams {
            bid_window: Duration::from_days(1),
        };
        let parameter_bytes = to_bytes(&params);
        let mut ctx = TestInitContext::empty();
        ctx.set_parameter(&parameter_bytes);
        let mut state_builder = TestStateBuilder::new();

        let state = contract_init(&ctx, &mut state_builder)
            .expect("Contract initialization should succeed");
        let mut host = TestHost::new(state, state_builder);

        // The configured window shapes every listing made afterwards.
        start_auction(&mut host, &start_params(1), REGISTERED)
            .expect("Starting an auction should succeed");
        let view = get_auction(&host, 1).expect("Registered auction should be readable");
        assert_eq!(view.start, Timestamp::from_timestamp_millis(REGISTERED));
        assert_eq!(
            view.end,
            Timestamp::from_timestamp_millis(REGISTERED + ONE_DAY)
        );
    }

    #[concordium_test]
    fn test_start_auction_registers_item() {
        let mut host = fresh_host();
        start_auction(&mut host, &start_params(1), REGISTERED)
            .expect("Starting an auction should succeed");

        let view = get_auction(&host, 1).expect("Registered auction should be readable");
        assert_eq!(view.id, 1);
        assert_eq!(view.item_ref, 10);
        assert_eq!(view.seller, SELLER);
        assert_eq!(view.highest_bidder, None);
        assert_eq!(view.highest_bid, Amount::zero());
        assert!(!view.ended);
    }

    #[concordium_test]
    fn test_start_auction_rejects_duplicate_id() {
        let mut host = fresh_host();
        start_auction(&mut host, &start_params(1), REGISTERED)
            .expect("Starting an auction should succeed");

        let mut second = start_params(1);
        second.item_ref = 11;
        expect_error(
            start_auction(&mut host, &second, REGISTERED + 5),
            AuctionError::DuplicateAuctionId,
            "Reusing an identifier should be rejected",
        );

        let view = get_auction(&host, 1).expect("Original auction should still be readable");
        assert_eq!(view.item_ref, 10);
    }

    #[concordium_test]
    fn test_bid_escrows_and_refunds_displaced_leader() {
        let mut host = fresh_host();
        start_auction(&mut host, &start_params(1), REGISTERED)
            .expect("Starting an auction should succeed");

        host.set_self_balance(Amount::from_micro_ccd(1_200));
        bid_auction(
            &mut host,
            ALICE,
            1,
            Amount::from_micro_ccd(1_200),
            REGISTERED + 10,
        )
        .expect("First bid above the minimum should be accepted");
        assert!(host.get_transfers().is_empty());

        host.set_self_balance(Amount::from_micro_ccd(2_600));
        bid_auction(
            &mut host,
            OWNER,
            1,
            Amount::from_micro_ccd(1_400),
            REGISTERED + 20,
        )
        .expect("Higher bid should be accepted");

        assert_eq!(
            host.get_transfers(),
            [(ALICE, Amount::from_micro_ccd(1_200))]
        );
        let view = get_auction(&host, 1).expect("Auction should be readable");
        assert_eq!(view.highest_bidder, Some(OWNER));
        assert_eq!(view.highest_bid, Amount::from_micro_ccd(1_400));
    }

    #[concordium_test]
    fn test_bid_rejects_unknown_auction() {
        let mut host = fresh_host();
        start_auction(&mut host, &start_params(1), REGISTERED)
            .expect("Starting an auction should succeed");

        expect_error(
            bid_auction(
                &mut host,
                ALICE,
                10,
                Amount::from_micro_ccd(1_000),
                REGISTERED,
            ),
            AuctionError::AuctionNotFound,
            "Bidding on an unknown identifier should be rejected",
        );
    }

    #[concordium_test]
    fn test_zero_bid_rejected_at_zero_minimum() {
        let mut host = fresh_host();
        start_auction(&mut host, &start_params(1), REGISTERED)
            .expect("Starting an auction should succeed");

        expect_error(
            bid_auction(&mut host, ALICE, 1, Amount::zero(), REGISTERED),
            AuctionError::BelowMinimumBid,
            "A zero first bid should be rejected even with a zero minimum",
        );
    }

    #[concordium_test]
    fn test_bid_must_exceed_standing_bid() {
        let mut host = fresh_host();
        start_auction(&mut host, &start_params(1), REGISTERED)
            .expect("Starting an auction should succeed");

        host.set_self_balance(Amount::from_micro_ccd(1_200));
        bid_auction(
            &mut host,
            OWNER,
            1,
            Amount::from_micro_ccd(1_200),
            REGISTERED,
        )
        .expect("First bid above the minimum should be accepted");

        expect_error(
            bid_auction(
                &mut host,
                ALICE,
                1,
                Amount::from_micro_ccd(1_200),
                REGISTERED + 5,
            ),
            AuctionError::BelowCurrentBid,
            "Matching the standing bid should be rejected",
        );
    }

    #[concordium_test]
    fn test_bid_rejected_once_window_closes() {
        let mut host = fresh_host();
        start_auction(&mut host, &start_params(1), REGISTERED)
            .expect("Starting an auction should succeed");

        expect_error(
            bid_auction(
                &mut host,
                ALICE,
                1,
                Amount::from_micro_ccd(1_200),
                REGISTERED + ONE_DAY,
            ),
            AuctionError::AuctionAlreadyEnded,
            "Bidding after the derived window should be rejected",
        );
    }

    #[concordium_test]
    fn test_settlement_pays_seller_exactly_once() {
        let mut host = fresh_host();
        start_auction(&mut host, &start_params(1), REGISTERED)
            .expect("Starting an auction should succeed");

        host.set_self_balance(Amount::from_micro_ccd(1_200));
        bid_auction(
            &mut host,
            ALICE,
            1,
            Amount::from_micro_ccd(1_200),
            REGISTERED + 10,
        )
        .expect("First bid above the minimum should be accepted");
        host.set_self_balance(Amount::from_micro_ccd(2_600));
        bid_auction(
            &mut host,
            OWNER,
            1,
            Amount::from_micro_ccd(1_400),
            REGISTERED + 20,
        )
        .expect("Higher bid should be accepted");

        expect_error(
            end_auction(&mut host, 1, REGISTERED + ONE_DAY - 1),
            AuctionError::AuctionNotYetEnded,
            "Settling before the window closes should be rejected",
        );

        end_auction(&mut host, 1, REGISTERED + ONE_DAY)
            .expect("Settling once the window closed should succeed");

        assert_eq!(
            host.get_transfers(),
            [
                (ALICE, Amount::from_micro_ccd(1_200)),
                (SELLER, Amount::from_micro_ccd(1_400)),
            ]
        );
        let view = get_auction(&host, 1).expect("Auction should be readable");
        assert!(view.ended);
        assert_eq!(
            view.ended_at,
            Some(Timestamp::from_timestamp_millis(REGISTERED + ONE_DAY))
        );

        expect_error(
            end_auction(&mut host, 1, REGISTERED + ONE_DAY + 10),
            AuctionError::AuctionAlreadyEnded,
            "Settling a second time should be rejected",
        );
        assert_eq!(host.get_transfers().len(), 2);
    }

    #[concordium_test]
    fn test_settlement_without_bids_moves_no_funds() {
        let mut host = fresh_host();
        start_auction(&mut host, &start_params(1), REGISTERED)
            .expect("Starting an auction should succeed");

        end_auction(&mut host, 1, REGISTERED + ONE_DAY)
            .expect("Settling without bids should succeed");

        assert!(host.get_transfers().is_empty());
        let view = get_auction(&host, 1).expect("Auction should be readable");
        assert!(view.ended);
    }

    #[concordium_test]
    fn test_bid_history_is_empty_without_bids() {
        let mut host = fresh_host();
        assert_eq!(get_bid(&host, 1), Ok(Vec::new()));

        start_auction(&mut host, &start_params(1), REGISTERED)
            .expect("Starting an auction should succeed");
        assert_eq!(get_bid(&host, 1), Ok(Vec::new()));
    }

    #[concordium_test]
    fn test_view_owner() {
        let host = fresh_host();
        let ctx = new_ctx(ALICE, REGISTERED);
        let owner = contract_view_owner(&ctx, &host).expect("Owner view should succeed");
        assert_eq!(owner, OWNER);
    }
}
