use commons::AuctionId;
use concordium_std::*;

/// Parameter for `AuctionHouse.startAuction`.
#[derive(Debug, Serialize, SchemaType)]
pub struct StartAuctionParams {
    /// Caller-supplied auction identifier, unique within the registry.
    pub id: AuctionId,
    /// Display name of the item.
    pub name: String,
    /// Description of the item.
    pub description: String,
    /// Numeric reference of the item being sold.
    pub item_ref: u64,
    /// Account that receives the winning bid on settlement.
    pub seller: AccountAddress,
    /// Smallest acceptable first bid.
    pub minimum_bid: Amount,
    /// Bidding window opening time.
    pub start: Timestamp,
    /// Bidding window closing time.
    pub end: Timestamp,
}

/// Full auction record returned by `AuctionHouse.getAuction`.
#[derive(Debug, PartialEq, Eq, Serialize, SchemaType)]
pub struct AuctionView {
    pub id: AuctionId,
    pub name: String,
    pub description: String,
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
