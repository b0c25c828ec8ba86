mod error;
mod price_client;
mod quote;
mod watchlist;

pub mod indicators;

pub use error::QuoteError;
pub use price_client::{Bar, DEFAULT_BASE_API, PriceClient};
pub use quote::{Change, IndexQuote, calculate_change, round};
pub use watchlist::{Entry, Section, Watchlist, WatchlistError};
