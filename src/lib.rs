//! FIFO tax-lot accounting engine.
//!
//! Consumes a chronologically ordered stream of trading transactions
//! (deposits, buys, sells) across currency pairs and produces Form 8949 style
//! capital gains line items: proceeds, cost basis, gain or loss, and
//! short/long-term classification. Sold quantities are matched against
//! previously acquired quantities strictly first-in-first-out, with partial
//! lot consumption, and crypto-to-crypto trades generate both a disposal of
//! the quote asset and an acquisition of the base asset.
//!
//! Persistence, transport, pricing, and report export are external
//! collaborators; see [`engine::run`] for the single entry point.

#![forbid(unsafe_code)]

pub mod engine;
pub mod errors;
pub mod model;
pub mod util;

pub use engine::{run, FiatSet, GainConfig, GainStrategy};
pub use errors::{MatchWarning, ParseError, ParseErrors};
pub use model::{RawTransaction, Report, Transaction};
