use commons::{AuctionId, BID_TAG, SETTLED_TAG, STARTED_TAG};
use concordium_std::*;

use crate::external::StartAuctionParams;

/// Item registration event data.
#[derive(Debug, Serial)]
pub struct StartedEvent<'a> {
    /// Auction identifier.
    pub id: AuctionId,
    /// Display name of the item.
    pub name: &'a String,
    /// Description of the item.
    pub description: &'a String,
    /// Numeric reference of the item being sold.
    pub item_ref: u64,
    /// Account that receives the winning bid on settlement.
    pub seller: &'a AccountAddress,
    /// Smallest acceptable first bid.
    pub minimum_bid: Amount,
    /// Bidding window opening time.
    pub start: Timestamp,
    /// Bidding window closing time.
    pub end: Timestamp,
}

/// Bid event data.
#[derive(Debug, Serial)]
pub struct BidEvent<'a> {
    /// Auction identifier.
    pub id: AuctionId,
    /// Bidder account address.
    pub bidder: &'a AccountAddress,
    /// Bid amount.
    pub amount: Amount,
}

/// Settlement event data.
#[derive(Debug, Serial)]
pub struct SettledEvent<'a> {
    /// Auction identifier.
    pub id: AuctionId,
    /// Account the proceeds were released to.
    pub seller: &'a AccountAddress,
    /// Auction winner, if any bid was placed.
    pub winner: Option<&'a AccountAddress>,
    /// Winning bid amount.
    pub price: Amount,
}

/// Tagged custom event to be serialized for the event log.
#[derive(Debug)]
pub enum AuctionHouseEvent<'a> {
    Started(StartedEvent<'a>),
    Bid(BidEvent<'a>),
    Settled(SettledEvent<'a>),
}

impl<'a> AuctionHouseEvent<'a> {
    pub fn started(params: &'a StartAuctionParams) -> Self {
        Self::Started(StartedEvent {
            id: params.id,
            name: &params.name,
            description: &params.description,
            item_ref: params.item_ref,
            seller: &params.seller,
            minimum_bid: params.minimum_bid,
            start: params.start,
            end: params.end,
        })
    }

    pub fn bid(id: AuctionId, bidder: &'a AccountAddress, amount: Amount) -> Self {
        Self::Bid(BidEvent { id, bidder, amount })
    }

    pub fn settled(
        id: AuctionId,
        seller: &'a AccountAddress,
        winner: Option<&'a AccountAddress>,
        price: Amount,
    ) -> Self {
        Self::Settled(SettledEvent {
            id,
            seller,
            winner,
            price,
        })
    }
}

impl<'a> Serial for AuctionHouseEvent<'a> {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            AuctionHouseEvent::Started(event) => {
                out.write_u8(STARTED_TAG)?;
                event.serial(out)
            }
            AuctionHouseEvent::Bid(event) => {
                out.write_u8(BID_TAG)?;
                event.serial(out)
            }
            AuctionHouseEvent::Settled(event) => {
                out.write_u8(SETTLED_TAG)?;
                event.serial(out)
            }
        }
    }
}
