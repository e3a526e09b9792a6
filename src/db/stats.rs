// src/db/stats.rs
use crate::db::connection::Database;
use crate::errors::RegistryError;
use rusqlite::Connection;

/// Aggregate snapshot for the dashboard.
#[derive(Debug)]
pub struct Statistics {
    pub total: i64,
    /// Count per block code, every group, block-ascending.
    pub by_block: Vec<(String, i64)>,
    /// Count per department, blanks excluded, top 10 by count descending.
    pub by_department: Vec<(String, i64)>,
    /// Count per raw employed-flag value. Raw means raw: "" and "No" are
    /// distinct groups, and imported oddball values get their own group.
    pub by_employed: Vec<(String, i64)>,
}

fn grouped_counts(conn: &Connection, sql: &str) -> Result<Vec<(String, i64)>, RegistryError> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| RegistryError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))
        .map_err(|e| RegistryError::DbError(e.to_string()))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| RegistryError::DbError(e.to_string()))?);
    }
    Ok(out)
}

pub fn collect_statistics(db: &Database) -> Result<Statistics, RegistryError> {
    db.with_conn(|conn| {
        let total: i64 = conn
            .query_row("SELECT COUNT(*) FROM housing_records", [], |row| row.get(0))
            .map_err(|e| RegistryError::DbError(e.to_string()))?;

        let by_block = grouped_counts(
            conn,
            "SELECT block, COUNT(*) FROM housing_records GROUP BY block ORDER BY block",
        )?;

        let by_department = grouped_counts(
            conn,
            "SELECT department, COUNT(*) FROM housing_records
             WHERE department != ''
             GROUP BY department ORDER BY COUNT(*) DESC LIMIT 10",
        )?;

        let by_employed = grouped_counts(
            conn,
            "SELECT employed, COUNT(*) FROM housing_records GROUP BY employed",
        )?;

        Ok(Statistics {
            total,
            by_block,
            by_department,
            by_employed,
        })
    })
}
