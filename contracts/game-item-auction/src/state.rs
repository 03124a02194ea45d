use commons::{AuctionCore, AuctionError, AuctionId, BidEntry, DisplacedBid, SettlementOutcome};
use concordium_std::*;

use crate::external::{AuctionView, StartAuctionParams};

/// One listed game item.
#[derive(Debug, Clone, Serialize)]
pub struct GameItemLot {
    pub item_ref: u64,
    pub core: AuctionCore,
}

/// The contract state: the registry of listed items and the bidding window
/// policy fixed at deployment.
#[derive(Serial, DeserialWithState)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    bid_window: Duration,
    auctions: StateMap<AuctionId, GameItemLot, S>,
}

impl<S: HasStateApi> State<S> {
    /// Create a state with no listings.
    pub fn new(state_builder: &mut StateBuilder<S>, bid_window: Duration) -> Self {
        State {
            bid_window,
            auctions: state_builder.new_map(),
        }
    }

    /// Register a new item. The bidding window runs from the current slot
    /// time for the configured duration.
    pub fn start_auction(
        &mut self,
        params: &StartAuctionParams,
        now: Timestamp,
    ) -> Result<Timestamp, AuctionError> {
        ensure!(
            self.auctions.get(&params.id).is_none(),
            AuctionError::DuplicateAuctionId
        );
        let end = now
            .checked_add(self.bid_window)
            .ok_or(AuctionError::InvalidBidWindow)?;
        let lot = GameItemLot {
            item_ref: params.item_ref,
            core: AuctionCore::new(params.seller, params.minimum_bid, now, end),
        };
        let _ = self.auctions.insert(params.id, lot);
        Ok(end)
    }

    pub fn bid(
        &mut self,
        id: AuctionId,
        bidder: AccountAddress,
        amount: Amount,
        now: Timestamp,
    ) -> Result<Option<DisplacedBid>, AuctionError> {
        let mut lot = self
            .auctions
            .get_mut(&id)
            .ok_or(AuctionError::AuctionNotFound)?;
        lot.get_mut().core.bid(bidder, amount, now)
    }

    pub fn settle(
        &mut self,
        id: AuctionId,
        now: Timestamp,
    ) -> Result<SettlementOutcome, AuctionError> {
        let mut lot = self
            .auctions
            .get_mut(&id)
            .ok_or(AuctionError::AuctionNotFound)?;
        lot.get_mut().core.settle(now)
    }

    pub fn view_auction(&self, id: AuctionId) -> Result<AuctionView, AuctionError> {
        let lot = self
            .auctions
            .get(&id)
            .ok_or(AuctionError::AuctionNotFound)?;
        let core = &lot.core;
        Ok(AuctionView {
            id,
            item_ref: lot.item_ref,
            seller: core.seller,
            minimum_bid: core.minimum_bid,
            highest_bidder: core.highest_bidder,
            highest_bid: core.highest_bid,
            start: core.start,
            ended: core.ended,
            end: core.end,
            ended_at: core.ended_at,
        })
    }

    /// Accepted bids for the item, oldest first. Empty when the identifier
    /// is unknown or no bids were placed.
    pub fn bid_history(&self, id: AuctionId) -> Vec<BidEntry> {
        self.auctions
            .get(&id)
            .map(|lot| lot.core.bids.clone())
            .unwrap_or_default()
    }
}
