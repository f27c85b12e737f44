//! Listing-price suggestion and manual research links.
//!
//! Turns a market value estimate into an asking price: base cards are
//! discounted hardest, short serial runs hold value best, and the result
//! lands on the price points buyers actually see.

use crate::models::CardQuery;
use crate::point130::build_search_query;

/// Default marketplace fee percentage
pub const DEFAULT_FEE_PERCENT: f64 = 11.0;

/// Listing attributes that shift the asking price relative to market value.
#[derive(Debug, Clone, Default)]
pub struct ListingTraits {
    /// Parallel/variation kind; "Base" (or empty) prices most conservatively
    pub variation: Option<String>,
    /// Serial run like "/99"; short runs keep more of the market value
    pub serial_numbered: Option<String>,
    pub is_rookie: bool,
    pub is_auto: bool,
}

/// Suggests an asking price from an estimated market value.
pub fn suggest_price(market_value: f64, traits: &ListingTraits) -> f64 {
    let variation = traits
        .variation
        .as_deref()
        .unwrap_or("Base")
        .to_lowercase();

    let mut price = if variation == "base" || variation.is_empty() {
        market_value * 0.80
    } else if let Some(serial) = traits.serial_numbered.as_deref() {
        let run: Option<u32> = serial.replace('/', "").trim().parse().ok();
        match run {
            Some(n) if n <= 10 => market_value * 0.95,
            Some(n) if n <= 25 => market_value * 0.92,
            _ => market_value * 0.88,
        }
    } else {
        market_value * 0.85
    };

    if traits.is_rookie {
        price *= 1.05;
    }
    if traits.is_auto {
        price *= 1.02;
    }

    round_to_price_point(price).max(0.99)
}

/// Rounds to the nearest "nice" price point: $5 steps above $100, whole
/// dollars above $20, half dollars above $5, cents below.
fn round_to_price_point(price: f64) -> f64 {
    if price >= 100.0 {
        (price / 5.0).round() * 5.0
    } else if price >= 20.0 {
        price.round()
    } else if price >= 5.0 {
        (price * 2.0).round() / 2.0
    } else {
        (price * 100.0).round() / 100.0
    }
}

/// Net proceeds after marketplace fees.
pub fn net_after_fees(sale_price: f64, fee_percent: f64) -> f64 {
    sale_price * (1.0 - fee_percent / 100.0)
}

/// Terapeak sold-item research URL for manual comp lookup.
pub fn terapeak_url(query: &CardQuery) -> String {
    format!(
        "https://www.ebay.com/sh/research?marketplace=EBAY-US&keywords={}&tabName=SOLD",
        urlencoding::encode(&build_search_query(query))
    )
}

/// eBay sold-listings search URL (sports card category).
pub fn ebay_sold_url(query: &CardQuery) -> String {
    format!(
        "https://www.ebay.com/sch/i.html?_nkw={}&_sacat=261328&LH_Sold=1&LH_Complete=1",
        urlencoding::encode(&build_search_query(query))
    )
}
