use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use rusqlite::params;

use super::model::{GreeksObservationDB, GREEKS_COLUMNS};
use crate::db::Database;
use crate::errors::{IntoCore, StorageError};
use crate::utils::format_date;
use voldesk_core::greeks::{GreeksObservation, GreeksStore};
use voldesk_core::Result;

pub struct SqliteGreeksStore {
    db: Database,
}

impl SqliteGreeksStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GreeksStore for SqliteGreeksStore {
    fn has_observations(&self, symbol: &str, date: NaiveDate) -> Result<bool> {
        let conn = self.db.connection()?;
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM greeks_observations WHERE ticker = ?1 AND date = ?2)",
            params![symbol, format_date(date)],
            |row| row.get::<_, bool>(0),
        )
        .into_core()
    }

    fn load_observations(&self, symbol: &str) -> Result<Vec<GreeksObservation>> {
        let conn = self.db.connection()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM greeks_observations WHERE ticker = ?1 \
                 ORDER BY date ASC, type ASC, strike ASC",
                GREEKS_COLUMNS
            ))
            .into_core()?;
        let rows = stmt
            .query_map(params![symbol], GreeksObservationDB::from_row)
            .into_core()?
            .collect::<std::result::Result<Vec<_>, _>>()
            .into_core()?;

        rows.into_iter()
            .map(|row| GreeksObservation::try_from(row).into_core())
            .collect()
    }

    async fn upsert_observations(&self, rows: &[GreeksObservation]) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }
        let rows: Vec<GreeksObservationDB> = rows.iter().map(GreeksObservationDB::from).collect();

        let written = self
            .db
            .exec(move |conn| {
                let tx = conn.transaction().map_err(StorageError::from)?;
                {
                    let mut stmt = tx
                        .prepare(&format!(
                            "INSERT OR REPLACE INTO greeks_observations ({}) \
                             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                            GREEKS_COLUMNS
                        ))
                        .map_err(StorageError::from)?;
                    for row in &rows {
                        stmt.execute(params![
                            row.date,
                            row.ticker,
                            row.option_type,
                            row.strike,
                            row.delta,
                            row.gamma,
                            row.vega,
                            row.theta,
                            row.iv,
                            row.und_price
                        ])
                        .map_err(StorageError::from)?;
                    }
                }
                tx.commit().map_err(StorageError::from)?;
                Ok(rows.len())
            })
            .await?;

        debug!("Upserted {} greeks observations", written);
        Ok(written)
    }
}
