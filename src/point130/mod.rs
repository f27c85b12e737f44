//! 130point.com sold-listing client.
//!
//! 130point surfaces eBay sold listings; this client runs one search per
//! card query and returns the raw listings. Rate limiting lives in the fetch
//! orchestrator, not here.

mod listings;

pub use listings::SoldListing;

use crate::error::{PricerError, Result};
use crate::models::CardQuery;
use serde::Deserialize;

/// Provenance label used in valuation results
pub const SOURCE_NAME: &str = "130point";

const BASE_URL: &str = "https://130point.com";

/// Seconds before an in-flight search is abandoned
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct SalesResponse {
    sales: Vec<SoldListing>,
}

/// HTTP client for the 130point sales search endpoint
pub struct Point130Client {
    client: reqwest::Client,
    base_url: String,
}

impl Point130Client {
    /// Creates a client against the production endpoint.
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Creates a client against a custom endpoint — used in tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("reqwest client construction should not fail");
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Runs one sold-listing search and returns the raw listings.
    pub async fn fetch_sales(
        &self,
        query: &CardQuery,
        max_results: usize,
    ) -> Result<Vec<SoldListing>> {
        let search = build_search_query(query);
        let url = format!(
            "{}/api/sales/search?query={}&limit={}",
            self.base_url,
            urlencoding::encode(&search),
            max_results
        );

        log::debug!("Searching sold listings: {search}");

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "card_pricer/0.1")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PricerError::HttpStatus(response.status()));
        }

        let body: SalesResponse = response.json().await?;
        log::info!(
            "Found {} sold listings for \"{}\"",
            body.sales.len(),
            search
        );
        Ok(body.sales)
    }
}

impl Default for Point130Client {
    fn default() -> Self {
        Self::new()
    }
}

/// Composes the search term for a card query.
///
/// Core identifiers always go in (year, player); descriptive fields only when
/// they narrow the search without starving it: brand, a parallel unless it is
/// just "Base", and the grade for graded cards. Card numbers and serial runs
/// are deliberately left out — they cut result counts too hard for comp
/// research.
pub fn build_search_query(query: &CardQuery) -> String {
    let mut parts: Vec<&str> = Vec::new();

    let year = query.year.to_string();
    parts.push(&year);
    parts.push(&query.player_name);
    parts.push(query.sport.as_str());

    if !query.brand.is_empty() {
        parts.push(&query.brand);
    }

    if !query.parallel_name.is_empty() && !query.parallel_name.eq_ignore_ascii_case("base") {
        parts.push(&query.parallel_name);
    }

    if query.is_graded {
        if !query.grade_company.is_empty() {
            parts.push(&query.grade_company);
        }
        if !query.grade_value.is_empty() {
            parts.push(&query.grade_value);
        }
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sport;

    #[test]
    fn search_query_includes_core_identifiers() {
        let query = CardQuery::new(Sport::Baseball, 2024, "Shohei Ohtani");
        assert_eq!(build_search_query(&query), "2024 Shohei Ohtani Baseball");
    }

    #[test]
    fn search_query_includes_brand_and_parallel() {
        let mut query = CardQuery::new(Sport::Basketball, 2023, "Victor Wembanyama");
        query.brand = "Panini Prizm".to_string();
        query.parallel_name = "Silver".to_string();
        assert_eq!(
            build_search_query(&query),
            "2023 Victor Wembanyama Basketball Panini Prizm Silver"
        );
    }

    #[test]
    fn search_query_skips_base_parallel() {
        let mut query = CardQuery::new(Sport::Baseball, 2024, "Shohei Ohtani");
        query.brand = "Topps".to_string();
        query.parallel_name = "Base".to_string();
        assert_eq!(build_search_query(&query), "2024 Shohei Ohtani Baseball Topps");
    }

    #[test]
    fn search_query_includes_grade_for_graded_cards() {
        let mut query = CardQuery::new(Sport::Football, 2023, "C.J. Stroud");
        query.is_graded = true;
        query.grade_company = "PSA".to_string();
        query.grade_value = "10".to_string();
        assert_eq!(
            build_search_query(&query),
            "2023 C.J. Stroud Football PSA 10"
        );
    }
}
