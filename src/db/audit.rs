// src/db/audit.rs
use crate::db::connection::Database;
use crate::errors::RegistryError;
use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Import,
    Export,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
            AuditAction::Import => "IMPORT",
            AuditAction::Export => "EXPORT",
        }
    }
}

#[derive(Debug)]
pub struct AuditEntry {
    pub id: i64,
    /// NULL for bulk actions (IMPORT, EXPORT).
    pub record_id: Option<i64>,
    pub action: String,
    pub details: String,
    pub actor: String,
    pub timestamp: NaiveDateTime,
}

/// Append one ledger entry. There is no update or delete counterpart; the
/// ledger only grows.
pub fn append_entry(
    conn: &Connection,
    record_id: Option<i64>,
    action: AuditAction,
    details: &str,
    actor: &str,
) -> Result<(), RegistryError> {
    let now = Utc::now().naive_utc();
    conn.execute(
        "INSERT INTO audit_log (record_id, action, details, actor, timestamp)
         VALUES (?, ?, ?, ?, ?)",
        params![record_id, action.as_str(), details, actor, now],
    )
    .map_err(|e| RegistryError::DbError(e.to_string()))?;
    Ok(())
}

/// Fire-and-forget append. An audit failure must never fail the mutation
/// that triggered it, so the error is logged and swallowed here.
pub fn record_audit(
    conn: &Connection,
    record_id: Option<i64>,
    action: AuditAction,
    details: &str,
    actor: &str,
) {
    if let Err(e) = append_entry(conn, record_id, action, details, actor) {
        eprintln!("Audit append failed for {}: {e}", action.as_str());
    }
}

fn entry_from_row(row: &Row) -> rusqlite::Result<AuditEntry> {
    Ok(AuditEntry {
        id: row.get(0)?,
        record_id: row.get(1)?,
        action: row.get(2)?,
        details: row.get(3)?,
        actor: row.get(4)?,
        timestamp: row.get(5)?,
    })
}

/// Most-recent-first ledger read, optionally scoped to one record. The id
/// tiebreak keeps same-instant entries in newest-first order too.
pub fn get_audit_log(
    db: &Database,
    record_id: Option<i64>,
    limit: usize,
) -> Result<Vec<AuditEntry>, RegistryError> {
    db.with_conn(|conn| {
        let mut stmt = match record_id {
            Some(_) => conn.prepare(
                "SELECT id, record_id, action, details, actor, timestamp
                 FROM audit_log
                 WHERE record_id = ?
                 ORDER BY timestamp DESC, id DESC
                 LIMIT ?",
            ),
            None => conn.prepare(
                "SELECT id, record_id, action, details, actor, timestamp
                 FROM audit_log
                 ORDER BY timestamp DESC, id DESC
                 LIMIT ?",
            ),
        }
        .map_err(|e| RegistryError::DbError(e.to_string()))?;

        let rows = match record_id {
            Some(rid) => stmt.query_map(params![rid, limit as i64], entry_from_row),
            None => stmt.query_map(params![limit as i64], entry_from_row),
        }
        .map_err(|e| RegistryError::DbError(e.to_string()))?;

        let mut entries = Vec::new();
        for r in rows {
            entries.push(r.map_err(|e| RegistryError::DbError(e.to_string()))?);
        }
        Ok(entries)
    })
}
