use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use reqwest::{
    Client, StatusCode,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::{IndexQuote, QuoteError};

pub const DEFAULT_BASE_API: &str = "https://query1.finance.yahoo.com";

// Covers a weekend plus a week of exchange holidays.
const LOOKBACK_DAYS: i64 = 10;

const DAILY: &str = "1d";

const BROWSER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Clone)]
pub struct PriceClient {
    client: Client,
    base_api: String,
}

impl PriceClient {
    pub fn new(base_api: impl Into<String>, timeout: StdDuration) -> reqwest::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_AGENT));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_api: base_api.into(),
        })
    }

    /// Daily bars over the last `duration`.
    pub async fn fetch_price(&self, symbol: &str, duration: Duration) -> Result<Vec<Bar>, QuoteError> {
        let end = Utc::now();
        let start = end - duration;

        let url = format!(
            "{}/v8/finance/chart/{}",
            self.base_api.trim_end_matches('/'),
            symbol
        );

        let unreachable = |source| QuoteError::Unreachable {
            symbol: symbol.to_string(),
            source,
        };

        let res = self
            .client
            .get(url)
            .query(&[
                ("interval", DAILY),
                ("period1", &start.timestamp().to_string()),
                ("period2", &end.timestamp().to_string()),
            ])
            .send()
            .await
            .map_err(unreachable)?;

        let status = res.status();
        let body = res.text().await.map_err(unreachable)?;
        debug!(symbol, %status, bytes = body.len(), "chart response");

        parse_chart(symbol, status, &body)
    }

    /// Open of the latest session against the close of the session before it.
    pub async fn fetch_quote(&self, symbol: &str, name: &str) -> Result<IndexQuote, QuoteError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(QuoteError::SymbolNotFound(symbol.to_string()));
        }

        let bars = self
            .fetch_price(symbol, Duration::days(LOOKBACK_DAYS))
            .await?;

        quote_from_bars(symbol, name, &bars)
    }
}

pub(crate) fn quote_from_bars(
    symbol: &str,
    name: &str,
    bars: &[Bar],
) -> Result<IndexQuote, QuoteError> {
    let [.., previous, latest] = bars else {
        return Err(QuoteError::malformed(
            symbol,
            format!("need two complete sessions, got {}", bars.len()),
        ));
    };

    if latest.open < Decimal::ZERO || previous.close < Decimal::ZERO {
        return Err(QuoteError::malformed(symbol, "negative price"));
    }

    Ok(IndexQuote {
        symbol: symbol.to_string(),
        name: name.to_string(),
        open: latest.open,
        previous_close: previous.close,
        session: latest.session,
    })
}

pub(crate) fn parse_chart(
    symbol: &str,
    status: StatusCode,
    body: &str,
) -> Result<Vec<Bar>, QuoteError> {
    let envelope: ChartEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if status == StatusCode::NOT_FOUND => {
            return Err(QuoteError::SymbolNotFound(symbol.to_string()));
        }
        Err(_) if !status.is_success() => {
            return Err(QuoteError::Provider {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }
        Err(e) => return Err(QuoteError::malformed(symbol, e.to_string())),
    };

    if let Some(error) = envelope.chart.error {
        if status == StatusCode::NOT_FOUND || error.code == "Not Found" {
            return Err(QuoteError::SymbolNotFound(symbol.to_string()));
        }
        return Err(QuoteError::malformed(
            symbol,
            format!(
                "{}: {}",
                error.code,
                error.description.unwrap_or_default()
            ),
        ));
    }

    if !status.is_success() {
        return Err(QuoteError::Provider {
            symbol: symbol.to_string(),
            status: status.as_u16(),
        });
    }

    let result = envelope
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| QuoteError::SymbolNotFound(symbol.to_string()))?;

    let offset = Duration::seconds(result.meta.gmtoffset.unwrap_or(0));
    let series = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| QuoteError::malformed(symbol, "no quote series"))?;

    // Rows missing the open or the close are dropped.
    let bars = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let timestamp = DateTime::<Utc>::from_timestamp(ts, 0)?;
            Some(Bar {
                session: (timestamp + offset).date_naive(),
                open: series.open.get(i).copied().flatten()?,
                close: series.close.get(i).copied().flatten()?,
            })
        })
        .collect();

    Ok(bars)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bar {
    /// Trading date in the exchange's own time zone.
    pub session: NaiveDate,
    pub open: Decimal,
    pub close: Decimal,
}

//
// Match Yahoo chart API JSON
// https://query1.finance.yahoo.com/v8/finance/chart/{symbol}
//
#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,

    #[serde(default)]
    timestamp: Vec<i64>,

    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteSeries>,
}

#[derive(Debug, Deserialize)]
struct QuoteSeries {
    #[serde(default)]
    open: Vec<Option<Decimal>>,

    #[serde(default)]
    close: Vec<Option<Decimal>>,
}
