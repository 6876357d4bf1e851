//! SQLite persistence layer for reading sessions.
//!
//! RULE: Only store.rs talks to the database.
//! The service calls store methods — it never executes SQL directly.
//!
//! save_positions runs in a single transaction per reading: the
//! exists-check, the optional delete, and the inserts commit together or
//! not at all. Concurrent readers never observe a mixed position set.

use crate::{
    error::{ReadingError, ReadingResult},
    reading::{Mode, Position, Reading},
};
use rand::RngCore;
use rusqlite::{params, Connection, OptionalExtension};

pub struct ReadingStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl ReadingStore {
    pub fn open(path: &str) -> ReadingResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> ReadingResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases, this returns a new isolated database.
    pub fn reopen(&self) -> ReadingResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> ReadingResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_readings.sql"))?;
        Ok(())
    }

    // ── Reading ────────────────────────────────────────────────

    /// Create a new reading session and persist it immediately.
    ///
    /// When the caller omits a seed, one is generated from the OS RNG —
    /// never from the deterministic draw engine. The seed is the root of
    /// determinism and must itself be unpredictable.
    pub fn create_reading(
        &self,
        mode: Mode,
        spread_id: &str,
        seed: Option<String>,
        metadata: serde_json::Value,
    ) -> ReadingResult<Reading> {
        let reading_id = uuid::Uuid::new_v4().to_string();
        let seed = seed.unwrap_or_else(generate_seed);
        let created_at = chrono::Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO reading (reading_id, mode, spread_id, seed, created_at, metadata)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                reading_id,
                mode.as_str(),
                spread_id,
                seed,
                created_at,
                serde_json::to_string(&metadata)?,
            ],
        )?;

        Ok(Reading {
            reading_id,
            mode,
            spread_id: spread_id.to_string(),
            seed,
            created_at,
            metadata,
            positions: Vec::new(),
        })
    }

    /// Fetch a reading with its positions in insertion (= draw) order.
    pub fn get_reading(&self, reading_id: &str) -> ReadingResult<Option<Reading>> {
        let row = self
            .conn
            .query_row(
                "SELECT reading_id, mode, spread_id, seed, created_at, metadata
                 FROM reading WHERE reading_id = ?1",
                params![reading_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, Option<String>>(5)?,
                    ))
                },
            )
            .optional()?;

        let Some((reading_id, mode, spread_id, seed, created_at, metadata)) = row else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT slot, card_id, reversed FROM position
             WHERE reading_id = ?1 ORDER BY id ASC",
        )?;
        let positions = stmt
            .query_map(params![reading_id], |row| {
                Ok(Position {
                    slot: row.get(0)?,
                    card_id: row.get(1)?,
                    reversed: row.get::<_, i32>(2)? != 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Reading {
            reading_id,
            mode: Mode::parse(&mode)?, // CHECK constraint keeps this infallible
            spread_id,
            seed,
            created_at,
            metadata: match metadata {
                Some(m) => serde_json::from_str(&m)?,
                None => serde_json::json!({}),
            },
            positions,
        }))
    }

    // ── Positions ──────────────────────────────────────────────

    /// Save card positions for a reading, all-or-nothing.
    ///
    /// - No positions yet: insert the full set.
    /// - Positions exist, `force` false: AlreadyAssigned; nothing changes.
    /// - Positions exist, `force` true: delete-all + insert-all in the
    ///   same transaction.
    pub fn save_positions(
        &self,
        reading_id: &str,
        positions: &[Position],
        force: bool,
    ) -> ReadingResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        let existing: i64 = tx.query_row(
            "SELECT COUNT(*) FROM position WHERE reading_id = ?1",
            params![reading_id],
            |row| row.get(0),
        )?;

        if existing > 0 && !force {
            // Dropping the open transaction rolls it back.
            return Err(ReadingError::AlreadyAssigned(reading_id.to_string()));
        }

        if existing > 0 {
            log::warn!("force redraw: replacing {existing} positions for reading {reading_id}");
            tx.execute(
                "DELETE FROM position WHERE reading_id = ?1",
                params![reading_id],
            )?;
        }

        for pos in positions {
            tx.execute(
                "INSERT INTO position (reading_id, slot, card_id, reversed)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    reading_id,
                    pos.slot,
                    pos.card_id,
                    if pos.reversed { 1i32 } else { 0i32 }
                ],
            )?;
        }

        tx.commit()?;
        log::debug!("saved {} positions for reading {reading_id}", positions.len());
        Ok(())
    }

    /// Delete a reading; positions cascade in the same statement.
    /// Returns false if no such reading existed.
    pub fn delete_reading(&self, reading_id: &str) -> ReadingResult<bool> {
        let rows = self.conn.execute(
            "DELETE FROM reading WHERE reading_id = ?1",
            params![reading_id],
        )?;
        Ok(rows > 0)
    }

    // ── Admin / test helpers ───────────────────────────────────

    /// Most recent readings, newest first, without positions.
    pub fn recent_readings(&self, limit: usize) -> ReadingResult<Vec<Reading>> {
        let mut stmt = self.conn.prepare(
            "SELECT reading_id, mode, spread_id, seed, created_at, metadata
             FROM reading ORDER BY created_at DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, Option<String>>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(reading_id, mode, spread_id, seed, created_at, metadata)| {
                Ok(Reading {
                    reading_id,
                    mode: Mode::parse(&mode)?,
                    spread_id,
                    seed,
                    created_at,
                    metadata: match metadata {
                        Some(m) => serde_json::from_str(&m)?,
                        None => serde_json::json!({}),
                    },
                    positions: Vec::new(),
                })
            })
            .collect()
    }

    pub fn position_count(&self, reading_id: &str) -> ReadingResult<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM position WHERE reading_id = ?1",
                params![reading_id],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }
}

/// A 16-byte OS-random seed, hex encoded.
fn generate_seed() -> String {
    let mut bytes = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
