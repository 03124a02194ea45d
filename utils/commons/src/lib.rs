//! Shared primitives for the auction contracts: the error taxonomy, the
//! variant-independent auction lifecycle and escrow record, and the custom
//! event tags.
#![cfg_attr(not(feature = "std"), no_std)]
pub use crate::{constants::*, errors::*, structs::*, types::*};
use concordium_std::*;

mod constants;
mod errors;
mod structs;
mod types;
