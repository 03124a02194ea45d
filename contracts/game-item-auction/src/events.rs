use commons::{AuctionId, BID_TAG, SETTLED_TAG, STARTED_TAG};
use concordium_std::*;

/// Item registration event data.
#[derive(Debug, Serial)]
pub struct StartedEvent<'a> {
    pub id: AuctionId,
    pub item_ref: u64,
    pub seller: &'a AccountAddress,
    pub minimum_bid: Amount,
    /// Bidding window derived at registration.
    pub start: Timestamp,
    pub end: Timestamp,
}

/// Bid event data.
#[derive(Debug, Serial)]
pub struct BidEvent<'a> {
    pub id: AuctionId,
    pub bidder: &'a AccountAddress,
    pub amount: Amount,
}

/// Settlement event data.
#[derive(Debug, Serial)]
pub struct SettledEvent<'a> {
    pub id: AuctionId,
    pub seller: &'a AccountAddress,
    pub winner: Option<&'a AccountAddress>,
    pub price: Amount,
}

/// Tagged custom event to be serialized for the event log.
#[derive(Debug)]
pub enum GameItemEvent<'a> {
    Started(StartedEvent<'a>),
    Bid(BidEvent<'a>),
    Settled(SettledEvent<'a>),
}

impl<'a> GameItemEvent<'a> {
    pub fn started(
        id: AuctionId,
        item_ref: u64,
        seller: &'a AccountAddress,
        minimum_bid: Amount,
        start: Timestamp,
        end: Timestamp,
    ) -> Self {
        Self::Started(StartedEvent {
            id,
            item_ref,
            seller,
            minimum_bid,
            start,
            end,
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

impl<'a> Serial for GameItemEvent<'a> {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            GameItemEvent::Started(event) => {
                out.write_u8(STARTED_TAG)?;
                event.serial(out)
            }
            GameItemEvent::Bid(event) => {
                out.write_u8(BID_TAG)?;
                event.serial(out)
            }
            GameItemEvent::Settled(event) => {
                out.write_u8(SETTLED_TAG)?;
                event.serial(out)
            }
        }
    }
}
