//! Core data types: sale records, card queries, and valuation results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PricerError, Result};

/// Represents the supported sports categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sport {
    Baseball,
    Basketball,
    Football,
    Hockey,
    Soccer,
    Other,
}

impl Sport {
    /// Returns the display name of the sport (e.g., "Baseball")
    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::Baseball => "Baseball",
            Sport::Basketball => "Basketball",
            Sport::Football => "Football",
            Sport::Hockey => "Hockey",
            Sport::Soccer => "Soccer",
            Sport::Other => "Other",
        }
    }

    /// Parse a sport name into a Sport (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "baseball" => Some(Sport::Baseball),
            "basketball" => Some(Sport::Basketball),
            "football" => Some(Sport::Football),
            "hockey" => Some(Sport::Hockey),
            "soccer" => Some(Sport::Soccer),
            "other" => Some(Sport::Other),
            _ => None,
        }
    }

    /// Returns all supported sports
    pub fn all() -> &'static [Sport] {
        &[
            Sport::Baseball,
            Sport::Basketball,
            Sport::Football,
            Sport::Hockey,
            Sport::Soccer,
            Sport::Other,
        ]
    }
}

impl std::str::FromStr for Sport {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Sport::parse(s).ok_or_else(|| format!("unknown sport: {s}"))
    }
}

impl std::fmt::Display for Sport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reliability of a valuation, derived from sample size and data recency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    /// No comparable sales at all
    None,
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Confidence::None => "None",
            Confidence::Low => "Low",
            Confidence::Medium => "Medium",
            Confidence::High => "High",
        };
        f.write_str(label)
    }
}

/// One historical sale used as a price comparable.
///
/// Immutable once created: records are only ever appended by the fetch path
/// and read back for valuation. Empty strings mean "unknown" for the
/// optional text fields (brand, parallel, grading).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub sport: Sport,
    pub year: i32,
    pub player_name: String,
    pub brand: String,
    pub parallel_name: String,
    pub is_graded: bool,
    pub grade_company: String,
    pub grade_value: String,
    pub sold_price: f64,
    pub sold_date: DateTime<Utc>,
}

/// The attributes of a card relevant for finding comparables.
///
/// Derived from the card entity at call time; never persisted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardQuery {
    pub sport: Sport,
    pub year: i32,
    pub player_name: String,
    pub brand: String,
    pub parallel_name: String,
    pub is_graded: bool,
    pub grade_company: String,
    pub grade_value: String,
}

impl CardQuery {
    /// Creates a query for a raw (ungraded) card with no brand or parallel.
    pub fn new(sport: Sport, year: i32, player_name: impl Into<String>) -> Self {
        Self {
            sport,
            year,
            player_name: player_name.into(),
            brand: String::new(),
            parallel_name: String::new(),
            is_graded: false,
            grade_company: String::new(),
            grade_value: String::new(),
        }
    }

    /// Checks that the fields required for the comp lookup are present.
    ///
    /// Sport and year index the record store; player name drives the fuzzy
    /// match. A query missing these is a caller bug, not a data problem.
    pub fn validate(&self) -> Result<()> {
        if self.player_name.trim().is_empty() {
            return Err(PricerError::InvalidQuery(
                "player name must not be empty".to_string(),
            ));
        }
        if self.year < 1800 || self.year > 2100 {
            return Err(PricerError::InvalidQuery(format!(
                "implausible card year: {}",
                self.year
            )));
        }
        if self.is_graded && self.grade_company.trim().is_empty() {
            return Err(PricerError::InvalidQuery(
                "graded query requires a grade company".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result of a market valuation.
///
/// `success` is false exactly when no comparable sales survived filtering;
/// in that case the price fields are `None` and confidence is `None`.
#[derive(Debug, Clone, Serialize)]
pub struct ValuationResult {
    pub success: bool,
    pub median_price: Option<f64>,
    pub average_price: Option<f64>,
    pub low_price: Option<f64>,
    pub high_price: Option<f64>,
    /// Number of sales in the (outlier-trimmed) sample
    pub sample_size: usize,
    pub most_recent_sale: Option<DateTime<Utc>>,
    pub confidence: Confidence,
    /// Human-readable provenance, e.g. "130point (7 sales)"
    pub source: String,
}

impl ValuationResult {
    /// A failed valuation: no comparable sales.
    pub fn no_matches(source: &str) -> Self {
        Self {
            success: false,
            median_price: None,
            average_price: None,
            low_price: None,
            high_price: None,
            sample_size: 0,
            most_recent_sale: None,
            confidence: Confidence::None,
            source: format!("{source} (no matches)"),
        }
    }
}

/// Result of one external fetch attempt. Never carries an error across the
/// orchestrator boundary; failures are folded into `error_message`.
#[derive(Debug, Clone, Serialize)]
pub struct FetchOutcome {
    pub success: bool,
    pub records_found: usize,
    pub error_message: Option<String>,
}

impl FetchOutcome {
    pub fn found(records_found: usize) -> Self {
        Self {
            success: true,
            records_found,
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            records_found: 0,
            error_message: Some(message.into()),
        }
    }
}
