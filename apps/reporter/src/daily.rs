use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Weekday};
use futures::{StreamExt, stream};
use market::{IndexQuote, PriceClient, QuoteError, Watchlist};
use tracing::{debug, error, info, instrument, warn};
use tracing_futures::Instrument;

use crate::{
    Clients,
    message::{Report, ReportLine, ReportSection, compose, data_lines},
};

const CONCURRENCY: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every index made it into the message.
    Published { indices: usize },
    /// Some indices were skipped; `failed` lists their symbols.
    PublishedPartial { indices: usize, failed: Vec<String> },
    /// Composed but not sent.
    DryRun { message: String },
    /// Not a trading day.
    Skipped,
}

/// Weekday check in the report time zone.
pub fn is_trading_day<Tz: TimeZone>(now: &DateTime<Tz>) -> bool {
    !matches!(now.weekday(), Weekday::Sat | Weekday::Sun)
}

#[instrument(name = "run_daily", skip(clients, watchlist), fields(symbols = watchlist.len()))]
pub async fn run_daily(
    clients: &Clients,
    watchlist: &Watchlist,
    date: NaiveDate,
    dry_run: bool,
) -> Result<Outcome> {
    let fetched = fetch_all(&clients.price_client, watchlist).await;
    let (mut report, failed) = build_report(watchlist, fetched, date);

    info!(
        fetched = report.line_count(),
        failed = failed.len(),
        "completed quote fetch"
    );

    if report.is_empty() {
        error!("no market data could be fetched, posting the no-data message");
    } else if let Some(commentary) = &clients.commentary {
        report.commentary = Some(
            commentary
                .generate_or_fallback(date, &data_lines(&report))
                .await,
        );
    }

    let message = compose(&report);
    debug!(%message, "composed message");

    if dry_run {
        info!("dry run, not publishing");
        return Ok(Outcome::DryRun { message });
    }

    clients
        .webhook
        .publish(&message)
        .await
        .context("failed to publish report")?;

    let indices = report.line_count();
    let outcome = if failed.is_empty() {
        Outcome::Published { indices }
    } else {
        Outcome::PublishedPartial { indices, failed }
    };

    info!(?outcome, "run finished");
    Ok(outcome)
}

/// One result per watchlist entry, in watchlist order.
async fn fetch_all(
    price_client: &PriceClient,
    watchlist: &Watchlist,
) -> Vec<Result<IndexQuote, QuoteError>> {
    stream::iter(watchlist.entries())
        .map(|entry| {
            let span = tracing::info_span!("fetch_quote", symbol = %entry.symbol);

            async move {
                let res = price_client.fetch_quote(&entry.symbol, &entry.name).await;
                match &res {
                    Ok(q) => debug!(open = %q.open, previous_close = %q.previous_close, session = %q.session, "fetched quote"),
                    Err(e) => warn!(error = %e, "fetch_quote failed, skipping index"),
                }
                res
            }
            .instrument(span)
        })
        .buffered(CONCURRENCY)
        .collect()
        .await
}

/// Pair fetch results with their sections and compute changes. Indices that
/// failed to fetch or compute are left out and returned by symbol.
pub fn build_report(
    watchlist: &Watchlist,
    fetched: Vec<Result<IndexQuote, QuoteError>>,
    date: NaiveDate,
) -> (Report, Vec<String>) {
    let mut results = fetched.into_iter();
    let mut failed = Vec::new();
    let mut sections = Vec::with_capacity(watchlist.sections().len());

    for section in watchlist.sections() {
        let mut lines = Vec::with_capacity(section.entries.len());

        for entry in &section.entries {
            let quote = match results.next() {
                Some(Ok(quote)) => quote,
                Some(Err(_)) | None => {
                    failed.push(entry.symbol.clone());
                    continue;
                }
            };

            match quote.change() {
                Ok(change) => lines.push(ReportLine {
                    name: quote.name,
                    open: quote.open,
                    previous_close: quote.previous_close,
                    change,
                    session: quote.session,
                }),
                Err(e) => {
                    warn!(symbol = %entry.symbol, error = %e, "change calculation failed, skipping index");
                    failed.push(entry.symbol.clone());
                }
            }
        }

        sections.push(ReportSection {
            title: section.title.clone(),
            emoji: section.emoji.clone(),
            lines,
        });
    }

    let report = Report {
        date,
        sections,
        commentary: None,
    };

    (report, failed)
}
