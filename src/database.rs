//! Sale record storage.
//!
//! Uses parameterized queries exclusively (no SQL string concatenation).
//! Records are append-only: the fetch path inserts, valuation reads, nothing
//! here ever updates or deletes a sale.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};

use crate::error::Result;
use crate::models::{SaleRecord, Sport};

/// Read/write access to historical sale records.
///
/// The engine itself never owns record data; everything goes through this
/// trait so tests and callers can substitute their own store.
pub trait SaleRecordStore: Send + Sync {
    /// All records sharing the coarse index key (sport + year).
    fn query_records(&self, sport: Sport, year: i32) -> Result<Vec<SaleRecord>>;

    /// Whether any record exists for this exact player sold on or after
    /// `since`. A cheap existence probe; no fuzzy matching.
    fn query_exists(
        &self,
        sport: Sport,
        year: i32,
        player_name: &str,
        since: DateTime<Utc>,
    ) -> Result<bool>;

    /// Appends records, skipping exact duplicates. Returns the number
    /// actually inserted.
    fn insert_records(&self, records: &[SaleRecord]) -> Result<usize>;
}

/// SQLite-backed record store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

/// Creates the `sold_price_records` table and indexes if missing.
///
/// The uniqueness constraint makes re-fetching idempotent: scraping the same
/// sold listing twice cannot double-count it.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS sold_price_records (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            sport         TEXT NOT NULL,
            year          INTEGER NOT NULL,
            player_name   TEXT NOT NULL,
            brand         TEXT NOT NULL,
            parallel_name TEXT NOT NULL,
            is_graded     INTEGER NOT NULL,
            grade_company TEXT NOT NULL,
            grade_value   TEXT NOT NULL,
            sold_price    REAL NOT NULL,
            sold_date     TEXT NOT NULL,
            inserted_at   TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE (sport, year, player_name, sold_price, sold_date)
        );

        CREATE INDEX IF NOT EXISTS idx_sold_price_sport_year
            ON sold_price_records(sport, year);
        CREATE INDEX IF NOT EXISTS idx_sold_price_sold_date
            ON sold_price_records(sold_date);
        ",
    )?;

    log::debug!("Sale record schema initialized");
    Ok(())
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and initializes the schema.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        log::info!("Opened sale record store: {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store, used in tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("record store mutex should not be poisoned")
    }
}

impl SaleRecordStore for SqliteStore {
    fn query_records(&self, sport: Sport, year: i32) -> Result<Vec<SaleRecord>> {
        let conn = self.lock();
        let mut stmt = conn.prepare_cached(
            "SELECT sport, year, player_name, brand, parallel_name,
                    is_graded, grade_company, grade_value, sold_price, sold_date
             FROM sold_price_records
             WHERE sport = ?1 AND year = ?2",
        )?;

        let rows = stmt.query_map(params![sport.as_str(), year], row_to_record)?;
        let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;

        log::debug!("Loaded {} records for {} {}", records.len(), year, sport);
        Ok(records)
    }

    fn query_exists(
        &self,
        sport: Sport,
        year: i32,
        player_name: &str,
        since: DateTime<Utc>,
    ) -> Result<bool> {
        let conn = self.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sold_price_records
             WHERE sport = ?1 AND year = ?2 AND player_name = ?3 AND sold_date >= ?4",
            params![sport.as_str(), year, player_name, format_date(since)],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn insert_records(&self, records: &[SaleRecord]) -> Result<usize> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let mut inserted = 0;

        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR IGNORE INTO sold_price_records
                 (sport, year, player_name, brand, parallel_name,
                  is_graded, grade_company, grade_value, sold_price, sold_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;

            for record in records {
                inserted += stmt.execute(params![
                    record.sport.as_str(),
                    record.year,
                    &record.player_name,
                    &record.brand,
                    &record.parallel_name,
                    record.is_graded,
                    &record.grade_company,
                    &record.grade_value,
                    record.sold_price,
                    format_date(record.sold_date),
                ])?;
            }
        }

        tx.commit()?;
        log::info!(
            "Inserted {} sale records ({} duplicates skipped)",
            inserted,
            records.len() - inserted
        );
        Ok(inserted)
    }
}

/// Fixed-width RFC 3339 so that `sold_date` comparisons in SQL stay correct
/// as plain text comparisons.
fn format_date(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<SaleRecord> {
    let sport_text: String = row.get(0)?;
    let sport = Sport::parse(&sport_text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("unknown sport: {sport_text}").into(),
        )
    })?;

    let date_text: String = row.get(9)?;
    let sold_date = DateTime::parse_from_rfc3339(&date_text)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(9, rusqlite::types::Type::Text, Box::new(e))
        })?
        .with_timezone(&Utc);

    Ok(SaleRecord {
        sport,
        year: row.get(1)?,
        player_name: row.get(2)?,
        brand: row.get(3)?,
        parallel_name: row.get(4)?,
        is_graded: row.get(5)?,
        grade_company: row.get(6)?,
        grade_value: row.get(7)?,
        sold_price: row.get(8)?,
        sold_date,
    })
}
