//! Rate-limited acquisition of sold listings.
//!
//! The external source tolerates at most one search every few seconds, so all
//! fetches in the process go through a single [`RateGate`]: one fetch in
//! flight at a time, with a minimum spacing between the start of one fetch
//! and the start of the next. Callers arriving early wait their turn; nothing
//! is rejected.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;

use crate::database::SaleRecordStore;
use crate::error::Result;
use crate::models::{CardQuery, FetchOutcome, SaleRecord};
use crate::point130::Point130Client;

/// Minimum spacing between fetch starts against the production source
pub const MIN_FETCH_SPACING: Duration = Duration::from_secs(10);

/// Serializes fetches and enforces start-to-start spacing.
///
/// Owned state, not a process global: construct one per source and share it
/// via `Arc`, so tests can run isolated gates with short spacings.
pub struct RateGate {
    min_spacing: Duration,
    last_start: Mutex<Option<Instant>>,
}

/// Proof of admission through a [`RateGate`]. Holding the permit keeps the
/// gate closed; drop it when the fetch completes.
pub struct RatePermit<'a> {
    _slot: MutexGuard<'a, Option<Instant>>,
}

impl RateGate {
    pub fn new(min_spacing: Duration) -> Self {
        Self {
            min_spacing,
            last_start: Mutex::new(None),
        }
    }

    /// Waits until this caller may start a fetch.
    ///
    /// Blocks while another fetch holds the permit, then sleeps out whatever
    /// remains of the spacing window measured from the previous fetch's
    /// start. Cancel-safe: a caller dropped while waiting leaves the
    /// recorded start time untouched.
    pub async fn admit(&self) -> RatePermit<'_> {
        let mut slot = self.last_start.lock().await;

        if let Some(last_start) = *slot {
            let elapsed = last_start.elapsed();
            if elapsed < self.min_spacing {
                let wait = self.min_spacing - elapsed;
                log::debug!("Rate gate: waiting {}ms before next fetch", wait.as_millis());
                tokio::time::sleep(wait).await;
            }
        }

        *slot = Some(Instant::now());
        RatePermit { _slot: slot }
    }
}

/// Fetch orchestrator: searches the source, converts listings, and appends
/// the resulting records to the store.
pub struct SalesFetcher<S> {
    client: Point130Client,
    store: Arc<S>,
    gate: Arc<RateGate>,
}

impl<S: SaleRecordStore> SalesFetcher<S> {
    pub fn new(client: Point130Client, store: Arc<S>) -> Self {
        Self::with_gate(client, store, Arc::new(RateGate::new(MIN_FETCH_SPACING)))
    }

    /// Constructs a fetcher with an explicit gate — used in tests and when
    /// several fetchers must share one rate budget.
    pub fn with_gate(client: Point130Client, store: Arc<S>, gate: Arc<RateGate>) -> Self {
        Self {
            client,
            store,
            gate,
        }
    }

    /// Acquires fresh sold listings for `query`.
    ///
    /// Every failure past this point — transport, decode, storage — is folded
    /// into the returned [`FetchOutcome`]; this boundary never propagates an
    /// error. New records are in the store before this returns.
    pub async fn fetch(&self, query: &CardQuery, max_results: usize) -> FetchOutcome {
        let _permit = self.gate.admit().await;

        match self.fetch_and_store(query, max_results).await {
            Ok(found) => FetchOutcome::found(found),
            Err(e) => {
                log::warn!("Sold listing fetch failed for {}: {e}", query.player_name);
                FetchOutcome::failed(e.to_string())
            }
        }
    }

    async fn fetch_and_store(&self, query: &CardQuery, max_results: usize) -> Result<usize> {
        let listings = self.client.fetch_sales(query, max_results).await?;

        let total = listings.len();
        let records: Vec<SaleRecord> = listings
            .into_iter()
            .filter_map(|listing| listing.into_record(query))
            .collect();

        if records.len() < total {
            log::warn!("Skipped {} unparseable listings", total - records.len());
        }

        let inserted = self.store.insert_records(&records)?;
        log::debug!(
            "Stored {} of {} fetched records for {}",
            inserted,
            records.len(),
            query.player_name
        );

        Ok(records.len())
    }
}

#[cfg(test)]
#[path = "fetcher_tests.rs"]
mod tests;
