//! Pricing service: the public entry point for market valuations.
//!
//! Composes the freshness check, the rate-limited fetch, the comparable
//! filter, and the statistical valuator into one operation. A fetch failure
//! downgrades the answer (less fresh data, lower confidence) instead of
//! aborting it.

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::card_matching::find_comparables;
use crate::database::SaleRecordStore;
use crate::error::Result;
use crate::fetcher::SalesFetcher;
use crate::models::{CardQuery, ValuationResult};
use crate::point130::{Point130Client, SOURCE_NAME};
use crate::valuation::market_value;

/// Local sale data older than this triggers a fetch before valuation
pub const DEFAULT_MAX_AGE_DAYS: i64 = 30;

/// Listings requested per fetch
const FETCH_MAX_RESULTS: usize = 20;

/// Market valuation over a sale-record store, with on-demand acquisition of
/// fresh sold listings.
pub struct PricingService<S> {
    store: Arc<S>,
    fetcher: SalesFetcher<S>,
    max_age_days: i64,
}

impl<S: SaleRecordStore> PricingService<S> {
    pub fn new(store: Arc<S>, client: Point130Client) -> Self {
        let fetcher = SalesFetcher::new(client, Arc::clone(&store));
        Self {
            store,
            fetcher,
            max_age_days: DEFAULT_MAX_AGE_DAYS,
        }
    }

    /// Overrides the staleness threshold (days) that triggers a fetch.
    pub fn with_max_age_days(mut self, days: i64) -> Self {
        self.max_age_days = days;
        self
    }

    /// Whether the store already holds a sale for this exact player within
    /// the last `max_age_days` days.
    pub fn has_recent_data(&self, query: &CardQuery, max_age_days: i64) -> Result<bool> {
        query.validate()?;
        let since = Utc::now() - Duration::days(max_age_days);
        self.store
            .query_exists(query.sport, query.year, &query.player_name, since)
    }

    /// Produces a market value estimate for the queried card.
    ///
    /// Fetches from the source first when local data is stale; a failed fetch
    /// is logged and the valuation proceeds on whatever local records exist.
    /// The only hard error besides storage faults is an invalid query.
    pub async fn get_valuation(&self, query: &CardQuery) -> Result<ValuationResult> {
        query.validate()?;

        if !self.has_recent_data(query, self.max_age_days)? {
            log::info!(
                "No sales for {} within {} days, fetching from {}",
                query.player_name,
                self.max_age_days,
                SOURCE_NAME
            );
            let outcome = self.fetcher.fetch(query, FETCH_MAX_RESULTS).await;
            if !outcome.success {
                log::warn!(
                    "Fetch failed ({}), valuing from local data only",
                    outcome.error_message.as_deref().unwrap_or("unknown error")
                );
            }
        }

        let candidates = self.store.query_records(query.sport, query.year)?;
        let comparables = find_comparables(query, &candidates);

        Ok(market_value(&comparables, SOURCE_NAME))
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
