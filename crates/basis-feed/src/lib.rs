//! Quote retrieval.
//!
//! Fetches spot and futures quotes from JSON endpoints. Each instrument is
//! addressed by an endpoint URL plus a JSON pointer locating the numeric
//! value inside the response document. The two legs are fetched
//! independently so one failing source never masks the other.

pub mod client;
pub mod error;

pub use client::{parse_numeric, PairSample, QuoteClient, QuoteEndpoint};
pub use error::{FeedError, Result};
