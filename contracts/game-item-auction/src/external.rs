use commons::AuctionId;
use concordium_std::*;

/// Parameter for the one-time contract configuration.
#[derive(Debug, Serialize, SchemaType)]
pub struct InitParams {
    /// Bidding window applied to every listing, measured from its
    /// registration time.
    pub bid_window: Duration,
}

/// Parameter for `GameItemAuction.startAuction`.
#[derive(Debug, Serialize, SchemaType)]
pub struct StartAuctionParams {
    /// Numeric reference of the game item being sold.
    pub item_ref: u64,
    /// Account that receives the winning bid on settlement.
    pub seller: AccountAddress,
    /// Smallest acceptable first bid.
    pub minimum_bid: Amount,
    /// Caller-supplied auction identifier, unique within the registry.
    pub id: AuctionId,
}

/// Full auction record returned by `GameItemAuction.getAuction`.
#[derive(Debug, PartialEq, Eq, Serialize, SchemaType)]
pub struct AuctionView {
    pub id: AuctionId,
    pub item_ref: u64,
    pub seller: AccountAddress,
    pub minimum_bid: Amount,
    pub highest_bidder: Option<AccountAddress>,
    pub highest_bid: Amount,
    pub start: Timestamp,
    pub ended: bool,
    pub end: Timestamp,
    pub ended_at: Option<Timestamp>,
}
