//! # Auction house smart contract
//!
//! A registry of escrow-holding ascending-price auctions with descriptive
//! listing data. A seller registers an item under a fresh identifier with a
//! minimum bid and an explicit bidding window. Accounts bid by attaching
//! CCD; the contract custodies the leading bid and refunds the displaced
//! bidder in full as soon as they are outbid. Once the window closes,
//! anyone may settle the auction, which releases the leading bid to the
//! seller exactly once.
#![cfg_attr(not(feature = "std"), no_std)]

mod contract;
mod events;
mod external;
mod state;
