use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::Database;
use crate::errors::{IntoCore, StorageError};
use crate::utils::{format_date, parse_date, series_symbol, series_table};
use voldesk_core::bars::BarStore;
use voldesk_core::Result;
use voldesk_market_data::Bar;

/// Daily bars in one `<symbol>_data` table per instrument.
pub struct SqliteBarStore {
    db: Database,
}

impl SqliteBarStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    conn.query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![table],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
    .into_core()
}

fn create_series(conn: &Connection, table: &str) -> std::result::Result<(), StorageError> {
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS \"{}\" (
            date TEXT PRIMARY KEY,
            open REAL,
            high REAL,
            low REAL,
            close REAL
        )",
        table
    ))?;
    Ok(())
}

#[async_trait]
impl BarStore for SqliteBarStore {
    fn series_exists(&self, symbol: &str) -> Result<bool> {
        let table = series_table(symbol).into_core()?;
        let conn = self.db.connection()?;
        table_exists(&conn, &table)
    }

    fn latest_date(&self, symbol: &str) -> Result<Option<NaiveDate>> {
        let table = series_table(symbol).into_core()?;
        let conn = self.db.connection()?;
        if !table_exists(&conn, &table)? {
            return Ok(None);
        }

        let latest: Option<String> = conn
            .query_row(&format!("SELECT MAX(date) FROM \"{}\"", table), [], |row| {
                row.get(0)
            })
            .into_core()?;
        latest
            .map(|d| parse_date(&d))
            .transpose()
            .into_core()
    }

    fn load_bars(&self, symbol: &str) -> Result<Vec<Bar>> {
        let table = series_table(symbol).into_core()?;
        let conn = self.db.connection()?;
        if !table_exists(&conn, &table)? {
            return Ok(Vec::new());
        }

        let mut stmt = conn
            .prepare(&format!(
                "SELECT date, open, high, low, close FROM \"{}\" ORDER BY date ASC",
                table
            ))
            .into_core()?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, f64>(4)?,
                ))
            })
            .into_core()?;

        let mut bars = Vec::new();
        for row in rows {
            let (date, open, high, low, close) = row.into_core()?;
            bars.push(Bar::new(parse_date(&date).into_core()?, open, high, low, close));
        }
        Ok(bars)
    }

    fn list_series(&self) -> Result<Vec<String>> {
        let conn = self.db.connection()?;
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .into_core()?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .into_core()?
            .collect::<std::result::Result<Vec<_>, _>>()
            .into_core()?;

        let mut symbols: Vec<String> = names.iter().filter_map(|n| series_symbol(n)).collect();
        symbols.sort();
        Ok(symbols)
    }

    async fn ensure_series(&self, symbol: &str) -> Result<()> {
        let table = series_table(symbol).into_core()?;
        self.db
            .exec(move |conn| create_series(conn, &table).into_core())
            .await
    }

    async fn upsert_bars(&self, symbol: &str, bars: &[Bar]) -> Result<usize> {
        if bars.is_empty() {
            return Ok(0);
        }
        let table = series_table(symbol).into_core()?;
        let bars = bars.to_vec();

        let written = self
            .db
            .exec(move |conn| {
                // Table creation rolls back with the inserts
                let tx = conn.transaction().map_err(StorageError::from)?;
                create_series(&tx, &table)?;
                {
                    let mut stmt = tx
                        .prepare(&format!(
                            "INSERT OR REPLACE INTO \"{}\" (date, open, high, low, close) \
                             VALUES (?1, ?2, ?3, ?4, ?5)",
                            table
                        ))
                        .map_err(StorageError::from)?;
                    for bar in &bars {
                        stmt.execute(params![
                            format_date(bar.date),
                            bar.open,
                            bar.high,
                            bar.low,
                            bar.close
                        ])
                        .map_err(StorageError::from)?;
                    }
                }
                tx.commit().map_err(StorageError::from)?;
                Ok(bars.len())
            })
            .await?;

        debug!("{}: upserted {} bars", symbol, written);
        Ok(written)
    }
}
