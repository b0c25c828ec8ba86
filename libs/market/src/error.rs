use thiserror::Error;

/// Reasons a single index could not be turned into a report line.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("provider unreachable for {symbol}: {source}")]
    Unreachable {
        symbol: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("provider returned status {status} for {symbol}")]
    Provider { symbol: String, status: u16 },

    #[error("malformed response for {symbol}: {reason}")]
    Malformed { symbol: String, reason: String },

    #[error("previous close is zero for {0}")]
    DivisionByZero(String),
}

impl QuoteError {
    pub(crate) fn malformed(symbol: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }
}
