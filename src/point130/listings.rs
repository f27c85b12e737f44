//! Raw sold-listing payloads and their conversion to sale records.

use chrono::{DateTime, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{CardQuery, SaleRecord};

lazy_static! {
    /// Grading company + numeric grade in a listing title, e.g. "PSA 10",
    /// "BGS 9.5", "sgc 8"
    static ref GRADE_RE: Regex =
        Regex::new(r"(?i)\b(PSA|BGS|SGC|CGC)\s*(\d{1,2}(?:\.5)?)\b").unwrap();
    /// First dollar amount in a price string, commas allowed
    static ref PRICE_RE: Regex = Regex::new(r"(\d{1,3}(?:,\d{3})*(?:\.\d+)?|\d+(?:\.\d+)?)").unwrap();
}

/// One sold listing as returned by the search endpoint.
///
/// Prices arrive as display strings ("$54.00"); dates as RFC 3339 or plain
/// dates depending on listing age.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoldListing {
    pub title: String,
    pub price: String,
    #[serde(default)]
    pub currency: Option<String>,
    pub date: String,
}

impl SoldListing {
    /// Converts the listing into a sale record for the queried card.
    ///
    /// Identity fields (sport, year, player, brand, parallel) come from the
    /// query the listing was a search hit for; price, date, and grading come
    /// from the listing itself. Returns `None` when the price or date cannot
    /// be parsed — the caller skips such listings.
    pub fn into_record(self, query: &CardQuery) -> Option<SaleRecord> {
        let sold_price = parse_price(&self.price)?;
        let sold_date = parse_date(&self.date)?;
        let grade = parse_grade(&self.title);

        let (is_graded, grade_company, grade_value) = match grade {
            Some((company, value)) => (true, company, value),
            None => (false, String::new(), String::new()),
        };

        Some(SaleRecord {
            sport: query.sport,
            year: query.year,
            player_name: query.player_name.clone(),
            brand: query.brand.clone(),
            parallel_name: query.parallel_name.clone(),
            is_graded,
            grade_company,
            grade_value,
            sold_price,
            sold_date,
        })
    }
}

/// Parses a display price like "$1,234.56" into a positive amount.
pub fn parse_price(raw: &str) -> Option<f64> {
    let captures = PRICE_RE.captures(raw)?;
    let amount: f64 = captures[1].replace(',', "").parse().ok()?;
    if amount > 0.0 {
        Some(amount)
    } else {
        log::warn!("Ignoring non-positive listing price: {raw}");
        None
    }
}

/// Extracts a grading company and grade from a listing title, if present.
pub fn parse_grade(title: &str) -> Option<(String, String)> {
    let captures = GRADE_RE.captures(title)?;
    Some((captures[1].to_uppercase(), captures[2].to_string()))
}

/// Parses a listing date: RFC 3339, `YYYY-MM-DD`, or `MM/DD/YYYY`.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }
    log::warn!("Unparseable listing date: {raw}");
    None
}
