//! Card Pricer - Sports Card Market Valuation
//!
//! Finds comparable sold listings for a described card, trims statistical
//! noise, and estimates a market price with a confidence tier. Sold listings
//! are pulled from 130point.com on demand (rate-limited) and cached in a
//! local SQLite database.

pub mod card_matching;
pub mod database;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod point130;
pub mod service;
pub mod suggest;
pub mod valuation;

pub use database::{SaleRecordStore, SqliteStore};
pub use error::{PricerError, Result};
pub use models::{CardQuery, Confidence, FetchOutcome, SaleRecord, Sport, ValuationResult};
pub use point130::Point130Client;
pub use service::PricingService;
