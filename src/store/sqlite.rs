use std::fmt;
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::store::repository::SaveRepository;

/// Fixed identifier for the single save record.
pub const SAVE_SLOT_KEY: &str = "survCraftIdleSaveV2";

const SAVE_DB_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS save_slots (
  slot_key TEXT PRIMARY KEY,
  payload TEXT NOT NULL,
  saved_at_ms REAL NOT NULL
);
"#;

#[derive(Debug)]
pub enum SaveDbError {
    Sqlite(rusqlite::Error),
}

impl fmt::Display for SaveDbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveDbError::Sqlite(source) => write!(f, "save store error: {}", source),
        }
    }
}

impl std::error::Error for SaveDbError {}

impl From<rusqlite::Error> for SaveDbError {
    fn from(source: rusqlite::Error) -> Self {
        SaveDbError::Sqlite(source)
    }
}

/// SQLite-backed key-value save surface. One textual payload lives under the
/// fixed slot key; absence is equivalent to "no save".
pub struct SaveDb {
    conn: Connection,
}

impl SaveDb {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SaveDbError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SAVE_DB_SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, SaveDbError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SAVE_DB_SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn load_slot(&self) -> Result<Option<String>, SaveDbError> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM save_slots WHERE slot_key = ?1",
                params![SAVE_SLOT_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(payload)
    }

    pub fn write_slot(&mut self, payload: &str, saved_at_ms: f64) -> Result<(), SaveDbError> {
        self.conn.execute(
            "INSERT INTO save_slots (slot_key, payload, saved_at_ms) VALUES (?1, ?2, ?3)
             ON CONFLICT(slot_key) DO UPDATE SET
               payload = excluded.payload,
               saved_at_ms = excluded.saved_at_ms",
            params![SAVE_SLOT_KEY, payload, saved_at_ms],
        )?;
        Ok(())
    }

    pub fn clear_slot(&mut self) -> Result<(), SaveDbError> {
        self.conn.execute(
            "DELETE FROM save_slots WHERE slot_key = ?1",
            params![SAVE_SLOT_KEY],
        )?;
        Ok(())
    }
}

impl SaveRepository for SaveDb {
    fn load_save(&mut self) -> Result<Option<String>, Box<dyn std::error::Error>> {
        Ok(self.load_slot()?)
    }

    fn write_save(
        &mut self,
        payload: &str,
        saved_at_ms: f64,
    ) -> Result<(), Box<dyn std::error::Error>> {
        Ok(self.write_slot(payload, saved_at_ms)?)
    }

    fn clear_save(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(self.clear_slot()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_round_trips_and_overwrites() {
        let mut db = SaveDb::open_in_memory().expect("in-memory db");
        assert_eq!(db.load_slot().unwrap(), None);

        db.write_slot("{\"a\":1}", 10.0).unwrap();
        assert_eq!(db.load_slot().unwrap().as_deref(), Some("{\"a\":1}"));

        db.write_slot("{\"a\":2}", 20.0).unwrap();
        assert_eq!(db.load_slot().unwrap().as_deref(), Some("{\"a\":2}"));

        db.clear_slot().unwrap();
        assert_eq!(db.load_slot().unwrap(), None);
    }
}
