//! SQLite persistence for replay event logs.
//!
//! RULE: Only store.rs talks to the database.
//! The replay itself never needs the store; recording is opt-in.

use rusqlite::{Connection, params};
use crate::{
    error::BattleResult,
    event::EventLogEntry,
};

pub struct ReplayStore {
    conn: Connection,
}

impl ReplayStore {
    /// Open (or create) the replay database at `path`.
    pub fn open(path: &str) -> BattleResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> BattleResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> BattleResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_replay_log.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(&self, run_id: &str, source: &str, started_at: i64) -> BattleResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, source, started_at) VALUES (?1, ?2, ?3)",
            params![run_id, source, started_at],
        )?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> BattleResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (run_id, round, event_type, payload)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.run_id,
                entry.round as i64,
                entry.event_type,
                entry.payload,
            ],
        )?;
        Ok(())
    }

    pub fn events_for_round(&self, run_id: &str, round: usize) -> BattleResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, round, event_type, payload
             FROM event_log WHERE run_id = ?1 AND round = ?2
             ORDER BY id ASC"
        )?;
        let entries = stmt.query_map(params![run_id, round as i64], |row| {
            Ok(EventLogEntry {
                id:         Some(row.get(0)?),
                run_id:     row.get(1)?,
                round:      row.get::<_, i64>(2)? as usize,
                event_type: row.get(3)?,
                payload:    row.get(4)?,
            })
        })?.collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn event_count(&self, run_id: &str) -> BattleResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
