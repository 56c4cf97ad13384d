use crate::model::{ItemPrice, PriceRecord, StockQuote, StorageError};
use crate::utils::parse_date;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, ToSql, params};
use tracing::warn;

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens the database (":memory:" for a throwaway store) and runs migrations.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS price_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                fetched_at TEXT,
                items_json TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS stock_snapshots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                quotes_json TEXT NOT NULL
            );
            "
        )?;

        Self::migrate_add_column_if_missing(&conn, "price_records", "fetched_at", "TEXT")?;

        Ok(Self { conn })
    }

    /// Adds a column to an existing table when an older schema lacks it.
    fn migrate_add_column_if_missing(
        conn: &Connection,
        table: &str,
        column: &str,
        column_def: &str,
    ) -> Result<(), StorageError> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
        let existing_columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<_, _>>()?;

        if !existing_columns.iter().any(|c| c == column) {
            let alter_sql = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def);
            conn.execute(&alter_sql, [])?;
        }

        Ok(())
    }

    /// Stores a day's record as the new head of the history log. A record
    /// already stored for the same date is replaced, so the log holds one
    /// record per day.
    pub fn append_record(&self, record: &PriceRecord) -> Result<(), StorageError> {
        let date = record.date.format("%Y-%m-%d").to_string();
        let items_json = serde_json::to_string(&record.items)?;
        let tx = self.conn.unchecked_transaction()?;
        let replaced = tx.execute("DELETE FROM price_records WHERE date = ?1", params![date])?;
        if replaced > 0 {
            warn!("Replacing {} stored record(s) for {}", replaced, date);
        }
        tx.execute(
            "INSERT INTO price_records (date, fetched_at, items_json) VALUES (?1, ?2, ?3)",
            params![date, record.fetched_at.map(|t| t.to_rfc3339()), items_json],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Loads up to `limit` records, most recent first.
    ///
    /// Any row that cannot be decoded makes the whole log unusable; it is then
    /// reported as empty so the caller starts over.
    pub fn load_history(&self, limit: usize) -> Result<Vec<PriceRecord>, StorageError> {
        self.query_history(
            "SELECT date, fetched_at, items_json FROM price_records ORDER BY date DESC, id DESC LIMIT ?1",
            params![limit as i64],
        )
    }

    /// Like [`load_history`](Self::load_history), restricted to records dated
    /// before `date`. Used to analyze a re-run of a day against the days
    /// preceding it.
    pub fn load_history_before(&self, date: NaiveDate, limit: usize) -> Result<Vec<PriceRecord>, StorageError> {
        self.query_history(
            "SELECT date, fetched_at, items_json FROM price_records
             WHERE date < ?1 ORDER BY date DESC, id DESC LIMIT ?2",
            params![date.format("%Y-%m-%d").to_string(), limit as i64],
        )
    }

    fn query_history(&self, sql: &str, args: &[&dyn ToSql]) -> Result<Vec<PriceRecord>, StorageError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(args, |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            match row.map_err(StorageError::from).and_then(Self::decode_record) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("Stored history is malformed ({}), starting with an empty log", e);
                    return Ok(Vec::new());
                }
            }
        }
        Ok(records)
    }

    /// Most recent record, if any.
    pub fn last_record(&self) -> Result<Option<PriceRecord>, StorageError> {
        Ok(self.load_history(1)?.into_iter().next())
    }

    pub fn history_len(&self) -> Result<usize, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM price_records", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Keeps only the `retention` most recent records.
    pub fn truncate_history(&self, retention: usize) -> Result<usize, StorageError> {
        Self::truncate_table(&self.conn, "price_records", retention)
    }

    /// Stores the day's auxiliary quotes, retention-capped like the price log.
    pub fn save_stock_snapshot(
        &self,
        date: &str,
        quotes: &[StockQuote],
        retention: usize,
    ) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO stock_snapshots (date, quotes_json) VALUES (?1, ?2)",
            params![date, serde_json::to_string(quotes)?],
        )?;
        Self::truncate_table(&self.conn, "stock_snapshots", retention)?;
        Ok(())
    }

    pub fn last_stock_snapshot(&self) -> Result<Option<Vec<StockQuote>>, StorageError> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT quotes_json FROM stock_snapshots ORDER BY date DESC, id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        json.map(|j| serde_json::from_str(&j).map_err(StorageError::from))
            .transpose()
    }

    fn truncate_table(conn: &Connection, table: &str, retention: usize) -> Result<usize, StorageError> {
        let sql = format!(
            "DELETE FROM {t} WHERE id NOT IN (SELECT id FROM {t} ORDER BY date DESC, id DESC LIMIT ?1)",
            t = table
        );
        Ok(conn.execute(&sql, params![retention as i64])?)
    }

    /// Turns raw column values into a record.
    fn decode_record(
        (date, fetched_at, items_json): (String, Option<String>, String),
    ) -> Result<PriceRecord, StorageError> {
        let date = parse_date(&date).ok_or_else(|| StorageError::Corrupt(format!("bad date '{}'", date)))?;
        let fetched_at = fetched_at
            .map(|s| {
                s.parse::<DateTime<Utc>>()
                    .map_err(|e| StorageError::Corrupt(format!("bad timestamp '{}': {}", s, e)))
            })
            .transpose()?;
        let items: Vec<ItemPrice> = serde_json::from_str(&items_json)?;
        Ok(PriceRecord { date, fetched_at, items })
    }
}
