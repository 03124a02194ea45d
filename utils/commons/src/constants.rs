/// Tag for the custom Started event.
pub const STARTED_TAG: u8 = u8::MAX - 5;

/// Tag for the custom Bid event.
pub const BID_TAG: u8 = u8::MAX - 6;

/// Tag for the custom Settled event.
pub const SETTLED_TAG: u8 = u8::MAX - 7;
