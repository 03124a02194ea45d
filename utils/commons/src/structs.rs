use super::*;

/// One accepted bid, as recorded in an auction's append-only history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SchemaType)]
pub struct BidEntry {
    /// Bidder account address.
    pub bidder: AccountAddress,
    /// Escrowed bid amount.
    pub amount: Amount,
    /// Slot time the bid was accepted at.
    pub timestamp: Timestamp,
}

/// Displaced leading bid. On overbid it must be refunded in full.
#[must_use]
#[derive(Debug, PartialEq, Eq)]
pub struct DisplacedBid {
    pub bidder: AccountAddress,
    pub amount: Amount,
}

/// Outcome of settling an auction.
#[must_use]
#[derive(Debug, PartialEq, Eq)]
pub enum SettlementOutcome {
    /// Winning bid that must be released to the seller.
    Sale {
        seller: AccountAddress,
        winner: AccountAddress,
        proceeds: Amount,
    },
    /// No bids were placed during the auction. Nothing to release.
    NoSale { seller: AccountAddress },
}

/// Lifecycle phase of an auction at a given slot time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// Bids are admissible.
    Open,
    /// The bidding window is over; settlement is admissible.
    Closed,
    /// Settled. Terminal.
    Settled,
}

/// Variant-independent auction lifecycle and escrow record.
///
/// The contract variants embed this next to their item metadata. Every
/// admission check and state transition funnels through the methods below;
/// checks always run before the first mutation, so a rejected call leaves
/// the record untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, SchemaType)]
pub struct AuctionCore {
    /// Account that receives the winning bid on settlement.
    pub seller: AccountAddress,
    /// Smallest acceptable first bid. The first bid must exceed it.
    pub minimum_bid: Amount,
    /// Bidding window opening time.
    pub start: Timestamp,
    /// Bidding window closing time.
    pub end: Timestamp,
    /// Presently winning bidder. None until the first accepted bid.
    pub highest_bidder: Option<AccountAddress>,
    /// Escrowed amount of the presently winning bid.
    pub highest_bid: Amount,
    /// Whether the auction has been settled.
    pub ended: bool,
    /// Slot time settlement actually happened at, as opposed to the
    /// scheduled closing time.
    pub ended_at: Option<Timestamp>,
    /// Accepted bids, oldest first.
    pub bids: Vec<BidEntry>,
}

impl AuctionCore {
    /// A fresh record: no leader, zero standing bid, empty history.
    pub fn new(
        seller: AccountAddress,
        minimum_bid: Amount,
        start: Timestamp,
        end: Timestamp,
    ) -> Self {
        Self {
            seller,
            minimum_bid,
            start,
            end,
            highest_bidder: None,
            highest_bid: Amount::zero(),
            ended: false,
            ended_at: None,
            bids: Vec::new(),
        }
    }

    /// Lifecycle phase at the given slot time. Bids are admissible from
    /// registration onwards; only the closing edge is gated.
    pub fn phase(&self, now: Timestamp) -> LifecyclePhase {
        if self.ended {
            LifecyclePhase::Settled
        } else if now < self.end {
            LifecyclePhase::Open
        } else {
            LifecyclePhase::Closed
        }
    }

    /// Admit and record a bid. The first bid must exceed the minimum bid,
    /// every later bid must exceed the standing bid. Returns the displaced
    /// leading bid, which the caller must refund in full.
    pub fn bid(
        &mut self,
        bidder: AccountAddress,
        amount: Amount,
        now: Timestamp,
    ) -> Result<Option<DisplacedBid>, AuctionError> {
        ensure!(
            matches!(self.phase(now), LifecyclePhase::Open),
            AuctionError::AuctionAlreadyEnded
        );
        match self.highest_bidder {
            None => ensure!(amount > self.minimum_bid, AuctionError::BelowMinimumBid),
            Some(_) => ensure!(amount > self.highest_bid, AuctionError::BelowCurrentBid),
        }

        let displaced = self
            .highest_bidder
            .replace(bidder)
            .map(|previous| DisplacedBid {
                bidder: previous,
                amount: self.highest_bid,
            });
        self.highest_bid = amount;
        self.bids.push(BidEntry {
            bidder,
            amount,
            timestamp: now,
        });
        Ok(displaced)
    }

    /// Admit and record settlement. Marks the record settled and returns
    /// the payout the caller must release to the seller. Settling twice is
    /// rejected, so the payout is produced at most once.
    pub fn settle(&mut self, now: Timestamp) -> Result<SettlementOutcome, AuctionError> {
        match self.phase(now) {
            LifecyclePhase::Open => bail!(AuctionError::AuctionNotYetEnded),
            LifecyclePhase::Settled => bail!(AuctionError::AuctionAlreadyEnded),
            LifecyclePhase::Closed => (),
        }

        self.ended = true;
        self.ended_at = Some(now);
        let outcome = match self.highest_bidder {
            Some(winner) => SettlementOutcome::Sale {
                seller: self.seller,
                winner,
                proceeds: self.highest_bid,
            },
            None => SettlementOutcome::NoSale {
                seller: self.seller,
            },
        };
        Ok(outcome)
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    const SELLER: AccountAddress = AccountAddress([7u8; 32]);
    const ALICE: AccountAddress = AccountAddress([8u8; 32]);
    const BOB: AccountAddress = AccountAddress([9u8; 32]);

    fn core() -> AuctionCore {
        AuctionCore::new(
            SELLER,
            Amount::from_micro_ccd(100),
            Timestamp::from_timestamp_millis(0),
            Timestamp::from_timestamp_millis(1_000),
        )
    }

    #[concordium_test]
    fn test_phase_transitions() {
        let mut auction = core();
        assert_eq!(
            auction.phase(Timestamp::from_timestamp_millis(999)),
            LifecyclePhase::Open
        );
        assert_eq!(
            auction.phase(Timestamp::from_timestamp_millis(1_000)),
            LifecyclePhase::Closed
        );
        let _ = auction
            .settle(Timestamp::from_timestamp_millis(1_000))
            .expect("Settling a closed auction should succeed");
        assert_eq!(
            auction.phase(Timestamp::from_timestamp_millis(1_000)),
            LifecyclePhase::Settled
        );
    }

    #[concordium_test]
    fn test_bid_displaces_previous_leader() {
        let mut auction = core();
        let now = Timestamp::from_timestamp_millis(10);

        let displaced = auction
            .bid(ALICE, Amount::from_micro_ccd(150), now)
            .expect("First bid above the minimum should be accepted");
        assert_eq!(displaced, None);

        let displaced = auction
            .bid(BOB, Amount::from_micro_ccd(200), now)
            .expect("Higher bid should be accepted");
        assert_eq!(
            displaced,
            Some(DisplacedBid {
                bidder: ALICE,
                amount: Amount::from_micro_ccd(150),
            })
        );
        assert_eq!(auction.highest_bidder, Some(BOB));
        assert_eq!(auction.highest_bid, Amount::from_micro_ccd(200));
        assert_eq!(auction.bids.len(), 2);
    }

    #[concordium_test]
    fn test_rejected_bid_leaves_record_unchanged() {
        let mut auction = core();
        let now = Timestamp::from_timestamp_millis(10);
        let _ = auction
            .bid(ALICE, Amount::from_micro_ccd(150), now)
            .expect("First bid above the minimum should be accepted");

        let before = auction.clone();
        let res = auction.bid(BOB, Amount::from_micro_ccd(150), now);
        assert_eq!(res, Err(AuctionError::BelowCurrentBid));
        assert_eq!(auction, before);
    }

    #[concordium_test]
    fn test_settle_reports_no_sale_without_bids() {
        let mut auction = core();
        let outcome = auction
            .settle(Timestamp::from_timestamp_millis(2_000))
            .expect("Settling a closed auction should succeed");
        assert_eq!(outcome, SettlementOutcome::NoSale { seller: SELLER });
        assert_eq!(auction.ended_at, Some(Timestamp::from_timestamp_millis(2_000)));
    }
}
