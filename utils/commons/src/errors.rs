use super::*;

/// The custom errors the auction contracts can produce.
#[derive(Serialize, Debug, PartialEq, Eq, Reject, SchemaType)]
pub enum AuctionError {
    /// Failed parsing the parameter (Error code: -1).
    #[from(ParseError)]
    ParseParams,
    /// Failed logging: Log is full (Error code: -2).
    LogFull,
    /// Failed logging: Log is malformed (Error code: -3).
    LogMalformed,
    /// An auction is already registered under this identifier (Error code: -4).
    DuplicateAuctionId,
    /// No auction is registered under this identifier (Error code: -5).
    AuctionNotFound,
    /// The bidding window is over (Error code: -6).
    AuctionAlreadyEnded,
    /// First bid must be greater than the minimum bid (Error code: -7).
    BelowMinimumBid,
    /// Bid must be greater than the standing bid (Error code: -8).
    BelowCurrentBid,
    /// The bidding window has not closed yet (Error code: -9).
    AuctionNotYetEnded,
    /// Only account addresses can call this function (Error code: -10).
    OnlyAccountAddress,
    /// Failed to invoke a transfer (Error code: -11).
    InvokeTransferError,
    /// Bidding window end does not fit in a timestamp (Error code: -12).
    InvalidBidWindow,
}

/// Mapping the logging errors to AuctionError.
impl From<LogError> for AuctionError {
    fn from(le: LogError) -> Self {
        match le {
            LogError::Full => Self::LogFull,
            LogError::Malformed => Self::LogMalformed,
        }
    }
}

/// Mapping errors related to CCD transfers to AuctionError.
impl From<TransferError> for AuctionError {
    fn from(_te: TransferError) -> Self {
        Self::InvokeTransferError
    }
}
