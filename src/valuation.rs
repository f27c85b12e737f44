//! Market value estimation from comparable sale records.
//!
//! Summarizes sold prices with outlier trimming and grades the result with a
//! confidence tier based on sample size and how recent the sales are.

use chrono::{DateTime, Utc};

use crate::models::{Confidence, SaleRecord, ValuationResult};

/// Prices further than this many standard deviations from the mean are
/// dropped before summarizing.
const OUTLIER_STDDEV_LIMIT: f64 = 2.0;

/// High confidence: at least this many sales, none older than 30 days.
const HIGH_MIN_SALES: usize = 5;
const HIGH_MAX_AGE_DAYS: f64 = 30.0;
/// Medium confidence: at least this many sales within 60 days.
const MEDIUM_MIN_SALES: usize = 2;
const MEDIUM_MAX_AGE_DAYS: f64 = 60.0;

/// Computes a market value summary over comparable sale records.
///
/// `source` is the provenance label embedded in the result, e.g. "130point".
pub fn market_value(records: &[SaleRecord], source: &str) -> ValuationResult {
    market_value_at(records, source, Utc::now())
}

/// Inner valuation that accepts an explicit `now` — used in tests.
pub fn market_value_at(
    records: &[SaleRecord],
    source: &str,
    now: DateTime<Utc>,
) -> ValuationResult {
    if records.is_empty() {
        return ValuationResult::no_matches(source);
    }

    let prices: Vec<f64> = records.iter().map(|r| r.sold_price).collect();

    let mean = prices.iter().sum::<f64>() / prices.len() as f64;
    let std_dev = (prices.iter().map(|p| (p - mean).powi(2)).sum::<f64>()
        / prices.len() as f64)
        .sqrt();

    let mut filtered: Vec<f64> = prices
        .iter()
        .copied()
        .filter(|p| (p - mean).abs() < OUTLIER_STDDEV_LIMIT * std_dev)
        .collect();

    if filtered.is_empty() {
        // Every price was flagged as an outlier (identical prices collapse
        // the deviation to zero, tiny bimodal samples can do the same);
        // trimming is a refinement, not a requirement, so fall back to the
        // full set.
        log::debug!("Outlier trim emptied a {}-record sample, using all", records.len());
        filtered = prices;
    }

    filtered.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = filtered.len() / 2;
    let median = if filtered.len() % 2 == 0 {
        (filtered[mid - 1] + filtered[mid]) / 2.0
    } else {
        filtered[mid]
    };

    let average = filtered.iter().sum::<f64>() / filtered.len() as f64;
    let low = filtered[0];
    let high = filtered[filtered.len() - 1];

    // Recency reflects real market activity, so the most recent sale comes
    // from the full record set, not the trimmed prices.
    let most_recent = records.iter().map(|r| r.sold_date).max().unwrap();
    let days_old = (now - most_recent).num_seconds() as f64 / 86_400.0;

    let confidence = if filtered.len() >= HIGH_MIN_SALES && days_old <= HIGH_MAX_AGE_DAYS {
        Confidence::High
    } else if filtered.len() >= MEDIUM_MIN_SALES && days_old <= MEDIUM_MAX_AGE_DAYS {
        Confidence::Medium
    } else {
        Confidence::Low
    };

    log::info!(
        "Market value: median={:.2}, {} sales, {} confidence",
        median,
        filtered.len(),
        confidence
    );

    ValuationResult {
        success: true,
        median_price: Some(median),
        average_price: Some(average),
        low_price: Some(low),
        high_price: Some(high),
        sample_size: filtered.len(),
        most_recent_sale: Some(most_recent),
        confidence,
        source: format!("{} ({} sales)", source, filtered.len()),
    }
}

#[cfg(test)]
#[path = "valuation_tests.rs"]
mod tests;
