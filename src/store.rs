use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, params};

use crate::state::CardReport;

const DATA_DIR: &str = "spjald_terminal";
const DB_FILE: &str = "cards.sqlite";

/// Referee directory plus card-report collection, one sqlite database.
/// Insert-only for reports; the form never reads them back.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open() -> Result<Self> {
        let path = db_path().context("no usable database path")?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("failed to create data dir")?;
        }
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).context("failed to open database")?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open database")?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// All referee names, case-insensitive alphabetical. League-scale data;
    /// no pagination.
    pub fn list_referees(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT referee_name FROM referees ORDER BY referee_name COLLATE NOCASE ASC")
            .context("prepare referee list")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .context("query referees")?;
        let mut names = Vec::new();
        for row in rows {
            names.push(row.context("read referee row")?);
        }
        Ok(names)
    }

    // No uniqueness constraint; callers check membership before inserting.
    pub fn insert_referee(&self, name: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO referees (referee_name) VALUES (?1)",
                params![name],
            )
            .context("insert referee")?;
        Ok(())
    }

    pub fn insert_report(&self, report: &CardReport) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO card_reports (
                    tournament, round, home_team, away_team, referee_name,
                    card_type, player_team, player_name, player_number,
                    minute, reason, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    report.tournament,
                    report.round,
                    report.home_team,
                    report.away_team,
                    report.referee_name,
                    report.card_type,
                    report.player_team,
                    report.player_name,
                    report.player_number,
                    report.minute,
                    report.reason,
                    Utc::now().to_rfc3339(),
                ],
            )
            .context("insert card report")?;
        Ok(())
    }

    /// Verification read used by tooling and tests; the form itself has no
    /// read path for reports.
    pub fn list_reports(&self) -> Result<Vec<CardReport>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT tournament, round, home_team, away_team, referee_name,
                        card_type, player_team, player_name, player_number,
                        minute, reason
                 FROM card_reports ORDER BY id ASC",
            )
            .context("prepare report list")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(CardReport {
                    tournament: row.get(0)?,
                    round: row.get(1)?,
                    home_team: row.get(2)?,
                    away_team: row.get(3)?,
                    referee_name: row.get(4)?,
                    card_type: row.get(5)?,
                    player_team: row.get(6)?,
                    player_name: row.get(7)?,
                    player_number: row.get(8)?,
                    minute: row.get(9)?,
                    reason: row.get(10)?,
                })
            })
            .context("query reports")?;
        let mut reports = Vec::new();
        for row in rows {
            reports.push(row.context("read report row")?);
        }
        Ok(reports)
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS referees (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            referee_name TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS card_reports (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            tournament TEXT NOT NULL,
            round TEXT NOT NULL,
            home_team TEXT NOT NULL,
            away_team TEXT NOT NULL,
            referee_name TEXT NOT NULL,
            card_type TEXT NOT NULL,
            player_team TEXT NOT NULL,
            player_name TEXT NOT NULL,
            player_number TEXT NOT NULL,
            minute TEXT NOT NULL,
            reason TEXT NOT NULL,
            created_at TEXT NOT NULL
        );",
    )
    .context("create schema")?;
    Ok(())
}

fn db_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("CARD_DB_PATH") {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    if let Ok(base) = std::env::var("XDG_DATA_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(DATA_DIR).join(DB_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(DATA_DIR)
            .join(DB_FILE),
    )
}
