use commons::{AuctionCore, AuctionError, AuctionId, BidEntry, DisplacedBid, SettlementOutcome};
use concordium_std::*;

use crate::external::{AuctionView, StartAuctionParams};

/// One listed item: descriptive metadata next to the lifecycle/escrow core.
#[derive(Debug, Clone, Serialize)]
pub struct AuctionItem {
    pub name: String,
    pub description: String,
    pub item_ref: u64,
    pub core: AuctionCore,
}

/// The contract state: the authoritative registry of listed items.
#[derive(Serial, DeserialWithState)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    auctions: StateMap<AuctionId, AuctionItem, S>,
}

impl<S: HasStateApi> State<S> {
    /// Create a state with no listings.
    pub fn new(state_builder: &mut StateBuilder<S>) -> Self {
        State {
            auctions: state_builder.new_map(),
        }
    }

    /// Register a new item. Identifiers are never silently overwritten.
    pub fn start_auction(&mut self, params: &StartAuctionParams) -> Result<(), AuctionError> {
        ensure!(
            self.auctions.get(&params.id).is_none(),
            AuctionError::DuplicateAuctionId
        );
        let item = AuctionItem {
            name: params.name.clone(),
            description: params.description.clone(),
            item_ref: params.item_ref,
            core: AuctionCore::new(params.seller, params.minimum_bid, params.start, params.end),
        };
        let _ = self.auctions.insert(params.id, item);
        Ok(())
    }

    /// Accept a bid on the item, returning the displaced bid that must be
    /// refunded.
    pub fn bid(
        &mut self,
        id: AuctionId,
        bidder: AccountAddress,
        amount: Amount,
        now: Timestamp,
    ) -> Result<Option<DisplacedBid>, AuctionError> {
        let mut item = self
            .auctions
            .get_mut(&id)
            .ok_or(AuctionError::AuctionNotFound)?;
        item.get_mut().core.bid(bidder, amount, now)
    }

    /// Settle the auction, returning the payout that must be released to
    /// the seller.
    pub fn settle(
        &mut self,
        id: AuctionId,
        now: Timestamp,
    ) -> Result<SettlementOutcome, AuctionError> {
        let mut item = self
            .auctions
            .get_mut(&id)
            .ok_or(AuctionError::AuctionNotFound)?;
        item.get_mut().core.settle(now)
    }

    /// Full record of the item under auction.
    pub fn view_auction(&self, id: AuctionId) -> Result<AuctionView, AuctionError> {
        let item = self
            .auctions
            .get(&id)
            .ok_or(AuctionError::AuctionNotFound)?;
        let core = &item.core;
        Ok(AuctionView {
            id,
            name: item.name.clone(),
            description: item.description.clone(),
            item_ref: item.item_ref,
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
            .map(|item| item.core.bids.clone())
            .unwrap_or_default()
    }
}
