//! # Game item auction smart contract
//!
//! The lightweight sibling of the auction house: items are plain numeric
//! references and every auction runs for the same fixed bidding window,
//! configured once at deployment and measured from the moment the item is
//! registered. Escrow and settlement behave as in the auction house: the
//! contract custodies the leading bid, refunds a displaced bidder in full,
//! and releases the winning bid to the seller exactly once after the
//! window closes.
#![cfg_attr(not(feature = "std"), no_std)]

mod contract;
mod events;
mod external;
mod state;
