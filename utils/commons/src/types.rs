use super::*;

/// Auction identifier. Supplied by the caller on registration and unique
/// within a registry; never reused.
pub type AuctionId = u64;

pub type ContractResult<A> = Result<A, AuctionError>;
