use async_trait::async_trait;
use log::debug;
use rusqlite::params;

use super::model::{GammaObservationDB, GEX_COLUMNS};
use crate::db::Database;
use crate::errors::{IntoCore, StorageError};
use voldesk_core::gex::{GammaObservation, GexStore};
use voldesk_core::Result;

/// Append-only gamma snapshots; one set of rows per fetch.
pub struct SqliteGexStore {
    db: Database,
}

impl SqliteGexStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GexStore for SqliteGexStore {
    fn load_observations(&self, symbol: &str, expiry: &str) -> Result<Vec<GammaObservation>> {
        let conn = self.db.connection()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM gex_observations WHERE ticker = ?1 AND expiry = ?2 \
                 ORDER BY date ASC, strike ASC, type ASC",
                GEX_COLUMNS
            ))
            .into_core()?;
        let rows = stmt
            .query_map(params![symbol, expiry], GammaObservationDB::from_row)
            .into_core()?
            .collect::<std::result::Result<Vec<_>, _>>()
            .into_core()?;

        rows.into_iter()
            .map(|row| GammaObservation::try_from(row).into_core())
            .collect()
    }

    fn symbols(&self) -> Result<Vec<String>> {
        let conn = self.db.connection()?;
        let mut stmt = conn
            .prepare("SELECT DISTINCT ticker FROM gex_observations ORDER BY ticker")
            .into_core()?;
        let symbols = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .into_core()?
            .collect::<std::result::Result<Vec<_>, _>>()
            .into_core()?;
        Ok(symbols)
    }

    async fn append_observations(&self, rows: &[GammaObservation]) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }
        let rows: Vec<GammaObservationDB> = rows.iter().map(GammaObservationDB::from).collect();

        let written = self
            .db
            .exec(move |conn| {
                let tx = conn.transaction().map_err(StorageError::from)?;
                {
                    let mut stmt = tx
                        .prepare(&format!(
                            "INSERT INTO gex_observations ({}) \
                             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                            GEX_COLUMNS
                        ))
                        .map_err(StorageError::from)?;
                    for row in &rows {
                        stmt.execute(params![
                            row.date,
                            row.ticker,
                            row.expiry,
                            row.strike,
                            row.option_type,
                            row.open_interest,
                            row.gamma,
                            row.contract_multiplier,
                            row.und_price
                        ])
                        .map_err(StorageError::from)?;
                    }
                }
                tx.commit().map_err(StorageError::from)?;
                Ok(rows.len())
            })
            .await?;

        debug!("Appended {} gamma observations", written);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;
    use voldesk_market_data::OptionRight;

    fn store() -> (TempDir, SqliteGexStore) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::init(dir.path().join("market_data.db")).unwrap();
        (dir, SqliteGexStore::new(db))
    }

    fn observation(symbol: &str, day: u32, strike: f64, right: OptionRight) -> GammaObservation {
        GammaObservation {
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            symbol: symbol.to_string(),
            expiry: "20250321".to_string(),
            strike,
            right,
            open_interest: 1200.0,
            gamma: 0.031,
            multiplier: 100.0,
            und_price: 571.2,
        }
    }

    #[tokio::test]
    async fn test_append_keeps_duplicates() {
        let (_dir, store) = store();
        let rows = vec![observation("SPY", 10, 570.0, OptionRight::Call)];
        store.append_observations(&rows).await.unwrap();
        store.append_observations(&rows).await.unwrap();

        let loaded = store.load_observations("SPY", "20250321").unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], rows[0]);
    }

    #[tokio::test]
    async fn test_load_filters_and_orders() {
        let (_dir, store) = store();
        let mut other_expiry = observation("SPY", 10, 565.0, OptionRight::Call);
        other_expiry.expiry = "20250417".to_string();
        store
            .append_observations(&[
                observation("SPY", 11, 565.0, OptionRight::Put),
                observation("SPY", 10, 575.0, OptionRight::Call),
                observation("SPY", 10, 570.0, OptionRight::Put),
                observation("SPY", 10, 570.0, OptionRight::Call),
                observation("QQQ", 10, 480.0, OptionRight::Call),
                other_expiry,
            ])
            .await
            .unwrap();

        let loaded = store.load_observations("SPY", "20250321").unwrap();
        let keys: Vec<(u32, f64, OptionRight)> = loaded
            .iter()
            .map(|o| (chrono::Datelike::day(&o.date), o.strike, o.right))
            .collect();
        assert_eq!(
            keys,
            vec![
                (10, 570.0, OptionRight::Call),
                (10, 570.0, OptionRight::Put),
                (10, 575.0, OptionRight::Call),
                (11, 565.0, OptionRight::Put),
            ]
        );
        assert_eq!(store.symbols().unwrap(), vec!["QQQ", "SPY"]);
    }

    #[tokio::test]
    async fn test_integer_columns_round_trip() {
        let (_dir, store) = store();
        store
            .append_observations(&[observation("SPY", 10, 570.0, OptionRight::Put)])
            .await
            .unwrap();

        let conn = store.db.connection().unwrap();
        let (oi, mult, right): (i64, i64, String) = conn
            .query_row(
                "SELECT openInterest, contractMultiplier, type FROM gex_observations",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!((oi, mult, right.as_str()), (1200, 100, "P"));
        assert_eq!(store.load_observations("SPY", "20250321").unwrap()[0].open_interest, 1200.0);
    }
}
