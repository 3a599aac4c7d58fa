use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::config::PASS_THRESHOLD;
use crate::error::{CoreError, Result};
use crate::models::PromptAgent;
use crate::scorer::SdScorer;

/// Rough token estimate: one token per four characters of trimmed text.
pub fn estimate_tokens(text: &str) -> usize {
    let chars = text.trim().chars().count();
    chars.div_ceil(4)
}

/// Persistent store of assembled agents, SQLite-backed, keyed by agent id.
///
/// Every save rescoring the identity keeps `sd_score` consistent with the
/// stored name and domain, whatever the caller sent.
///
/// Methods take `&self`: the `Connection` serializes access itself.
pub struct AgentStore {
    conn: Connection,
    scorer: SdScorer,
}

impl AgentStore {
    /// Open a store backed by an in-memory SQLite database.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    /// Open (or create) a store backed by a SQLite file.
    pub fn persistent(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self::with_connection(conn)?;
        info!(path, "agent store opened");
        Ok(store)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn,
            scorer: SdScorer::new(),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS agents (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                domain TEXT NOT NULL,
                sd_score REAL NOT NULL,
                token_count INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                body TEXT NOT NULL            -- JSON PromptAgent
            );

            CREATE INDEX IF NOT EXISTS idx_agents_name ON agents(name);
            CREATE INDEX IF NOT EXISTS idx_agents_sd ON agents(sd_score);
            CREATE INDEX IF NOT EXISTS idx_agents_created ON agents(created_at);
            ",
        )?;
        Ok(())
    }

    /// Insert or replace an agent. Returns the stored SD score.
    pub fn save(&self, agent: &PromptAgent) -> Result<f64> {
        if agent.id.trim().is_empty() {
            return Err(CoreError::InvalidAgent("agent id is empty".to_string()));
        }

        let mut record = agent.clone();
        record.identity.sd_score = self
            .scorer
            .calculate(&record.identity.name, &record.identity.domain)
            .score;
        record.metadata.token_count = record
            .text_fields()
            .iter()
            .map(|t| estimate_tokens(t))
            .sum();

        let body = serde_json::to_string(&record)?;
        self.conn.execute(
            "INSERT INTO agents (id, name, domain, sd_score, token_count, created_at, body)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                domain = excluded.domain,
                sd_score = excluded.sd_score,
                token_count = excluded.token_count,
                body = excluded.body",
            params![
                record.id,
                record.identity.name,
                record.identity.domain,
                record.identity.sd_score,
                record.metadata.token_count as i64,
                record.metadata.created_at.to_rfc3339(),
                body,
            ],
        )?;

        debug!(
            id = %record.id,
            sd = record.identity.sd_score,
            tokens = record.metadata.token_count,
            "agent saved"
        );
        Ok(record.identity.sd_score)
    }

    /// Load one agent by id.
    pub fn get(&self, id: &str) -> Result<PromptAgent> {
        let body: Option<String> = self
            .conn
            .query_row("SELECT body FROM agents WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()?;

        match body {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Err(CoreError::AgentNotFound(id.to_string())),
        }
    }

    /// All agents, oldest first, optionally filtered by minimum SD.
    pub fn list(&self, min_sd: Option<f64>) -> Result<Vec<PromptAgent>> {
        let min_sd = min_sd.unwrap_or(0.0);
        let mut stmt = self.conn.prepare(
            "SELECT body FROM agents
             WHERE sd_score >= ?1
             ORDER BY created_at ASC, id ASC",
        )?;

        let rows = stmt.query_map(params![min_sd], |row| row.get::<_, String>(0))?;
        let mut agents = Vec::new();
        for row in rows {
            agents.push(serde_json::from_str(&row?)?);
        }
        Ok(agents)
    }

    /// Delete an agent. Returns whether a row was removed.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM agents WHERE id = ?1", params![id])?;
        debug!(id, removed, "agent delete");
        Ok(removed > 0)
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM agents", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Snapshot of the store.
    pub fn summary(&self) -> Result<StoreSummary> {
        let (total, average, passing, newest): (i64, Option<f64>, i64, Option<String>) =
            self.conn.query_row(
                "SELECT COUNT(*), AVG(sd_score),
                        COALESCE(SUM(CASE WHEN sd_score >= ?1 THEN 1 ELSE 0 END), 0),
                        MAX(created_at)
                 FROM agents",
                params![PASS_THRESHOLD],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )?;

        let newest = match newest {
            Some(s) => Some(DateTime::parse_from_rfc3339(&s)?.with_timezone(&Utc)),
            None => None,
        };

        Ok(StoreSummary {
            total_agents: total as usize,
            passing_agents: passing as usize,
            average_sd: average.unwrap_or(0.0),
            newest,
        })
    }
}

#[derive(Debug, Clone)]
pub struct StoreSummary {
    pub total_agents: usize,
    /// Agents at or above the pass bar
    pub passing_agents: usize,
    pub average_sd: f64,
    pub newest: Option<DateTime<Utc>>,
}
