// src/db/records.rs
use crate::db::audit::{self, AuditAction};
use crate::db::connection::Database;
use crate::domain::geo;
use crate::domain::record::{HousingRecord, RecordFields, RecordFilter, DEFAULT_STATUS};
use crate::errors::RegistryError;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row, ToSql};

const RECORD_COLUMNS: &str = "id, block, unit, decision, decision_date, occupant_name, \
     employee_id, national_id, profession, job_title, department, phone, \
     employed, retired, deceased, \
     respondent_name, respondent_relation, respondent_phone, \
     state_owned, decommissioned, observation, \
     latitude, longitude, status, created_at, updated_at";

/// Text columns a caller may filter on or ask distinct values for.
const TEXT_COLUMNS: &[&str] = &[
    "block",
    "unit",
    "decision",
    "decision_date",
    "occupant_name",
    "employee_id",
    "national_id",
    "profession",
    "job_title",
    "department",
    "phone",
    "employed",
    "retired",
    "deceased",
    "respondent_name",
    "respondent_relation",
    "respondent_phone",
    "state_owned",
    "decommissioned",
    "observation",
    "status",
];

fn record_from_row(row: &Row) -> rusqlite::Result<HousingRecord> {
    Ok(HousingRecord {
        id: row.get(0)?,
        block: row.get(1)?,
        unit: row.get(2)?,
        decision: row.get(3)?,
        decision_date: row.get(4)?,
        occupant_name: row.get(5)?,
        employee_id: row.get(6)?,
        national_id: row.get(7)?,
        profession: row.get(8)?,
        job_title: row.get(9)?,
        department: row.get(10)?,
        phone: row.get(11)?,
        employed: row.get(12)?,
        retired: row.get(13)?,
        deceased: row.get(14)?,
        respondent_name: row.get(15)?,
        respondent_relation: row.get(16)?,
        respondent_phone: row.get(17)?,
        state_owned: row.get(18)?,
        decommissioned: row.get(19)?,
        observation: row.get(20)?,
        // Unlocated rows still need a place on the map.
        latitude: row.get::<_, Option<f64>>(21)?.unwrap_or(geo::DISTRICT_LAT),
        longitude: row.get::<_, Option<f64>>(22)?.unwrap_or(geo::DISTRICT_LON),
        status: row.get(23)?,
        created_at: row.get(24)?,
        updated_at: row.get(25)?,
    })
}

/// Insert a new record. Omitted text fields default to empty, omitted
/// coordinates to the district center, omitted status to "Active".
/// `created_at` and `updated_at` start equal.
pub fn create_record(
    db: &Database,
    fields: &RecordFields,
    actor: &str,
) -> Result<i64, RegistryError> {
    let now = Utc::now().naive_utc();

    db.with_conn(|conn| {
        conn.execute(
            r#"
            INSERT INTO housing_records (
                block, unit, decision, decision_date, occupant_name,
                employee_id, national_id, profession, job_title, department,
                phone, employed, retired, deceased,
                respondent_name, respondent_relation, respondent_phone,
                state_owned, decommissioned, observation,
                latitude, longitude, status, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14,
                ?15, ?16, ?17,
                ?18, ?19, ?20,
                ?21, ?22, ?23, ?24, ?25
            )
            "#,
            params![
                fields.block.as_deref().unwrap_or(""),
                fields.unit.as_deref().unwrap_or(""),
                fields.decision.as_deref().unwrap_or(""),
                fields.decision_date.as_deref().unwrap_or(""),
                fields.occupant_name.as_deref().unwrap_or(""),
                fields.employee_id.as_deref().unwrap_or(""),
                fields.national_id.as_deref().unwrap_or(""),
                fields.profession.as_deref().unwrap_or(""),
                fields.job_title.as_deref().unwrap_or(""),
                fields.department.as_deref().unwrap_or(""),
                fields.phone.as_deref().unwrap_or(""),
                fields.employed.map(|t| t.as_str()).unwrap_or(""),
                fields.retired.map(|t| t.as_str()).unwrap_or(""),
                fields.deceased.map(|t| t.as_str()).unwrap_or(""),
                fields.respondent_name.as_deref().unwrap_or(""),
                fields.respondent_relation.as_deref().unwrap_or(""),
                fields.respondent_phone.as_deref().unwrap_or(""),
                fields.state_owned.as_deref().unwrap_or(""),
                fields.decommissioned.as_deref().unwrap_or(""),
                fields.observation.as_deref().unwrap_or(""),
                fields.latitude.unwrap_or(geo::DISTRICT_LAT),
                fields.longitude.unwrap_or(geo::DISTRICT_LON),
                fields.status.as_deref().unwrap_or(DEFAULT_STATUS),
                now,
                now,
            ],
        )
        .map_err(|e| RegistryError::DbError(e.to_string()))?;

        let id = conn.last_insert_rowid();
        audit::record_audit(conn, Some(id), AuditAction::Create, &fields.snapshot(), actor);
        Ok(id)
    })
}

/// Fetch one record. A missing id is a normal outcome, not an error.
pub fn get_record(db: &Database, id: i64) -> Result<Option<HousingRecord>, RegistryError> {
    db.with_conn(|conn| {
        conn.query_row(
            &format!("SELECT {RECORD_COLUMNS} FROM housing_records WHERE id = ?"),
            params![id],
            record_from_row,
        )
        .optional()
        .map_err(|e| RegistryError::DbError(e.to_string()))
    })
}

/// All records matching the filter, ordered by (block, unit) with insertion
/// order breaking ties.
pub fn list_records(
    db: &Database,
    filter: &RecordFilter,
) -> Result<Vec<HousingRecord>, RegistryError> {
    let active = filter.active();

    db.with_conn(|conn| {
        let mut sql = format!("SELECT {RECORD_COLUMNS} FROM housing_records WHERE 1=1");
        for (col, _) in &active {
            sql.push_str(&format!(" AND {col} = ?"));
        }
        sql.push_str(" ORDER BY block, unit, id");

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| RegistryError::DbError(e.to_string()))?;

        let rows = stmt
            .query_map(
                rusqlite::params_from_iter(active.iter().map(|(_, v)| *v)),
                record_from_row,
            )
            .map_err(|e| RegistryError::DbError(e.to_string()))?;

        let mut records = Vec::new();
        for r in rows {
            records.push(r.map_err(|e| RegistryError::DbError(e.to_string()))?);
        }
        Ok(records)
    })
}

/// Case-insensitive substring search across the locator and the identifying
/// occupant fields.
pub fn search_records(db: &Database, term: &str) -> Result<Vec<HousingRecord>, RegistryError> {
    let pattern = format!("%{term}%");

    db.with_conn(|conn| {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {RECORD_COLUMNS} FROM housing_records
                 WHERE block LIKE ?1 OR unit LIKE ?1 OR occupant_name LIKE ?1
                    OR national_id LIKE ?1 OR profession LIKE ?1 OR department LIKE ?1
                 ORDER BY block, unit, id"
            ))
            .map_err(|e| RegistryError::DbError(e.to_string()))?;

        let rows = stmt
            .query_map(params![pattern], record_from_row)
            .map_err(|e| RegistryError::DbError(e.to_string()))?;

        let mut records = Vec::new();
        for r in rows {
            records.push(r.map_err(|e| RegistryError::DbError(e.to_string()))?);
        }
        Ok(records)
    })
}

/// Partial update: only the supplied fields change, everything else keeps
/// its prior value. Returns `Ok(false)` when the id does not exist.
pub fn update_record(
    db: &Database,
    id: i64,
    fields: &RecordFields,
    actor: &str,
) -> Result<bool, RegistryError> {
    let now = Utc::now().naive_utc();

    db.with_conn(|conn| {
        let mut sets: Vec<&'static str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(v) = &fields.block {
            sets.push("block = ?");
            values.push(Box::new(v.clone()));
        }
        if let Some(v) = &fields.unit {
            sets.push("unit = ?");
            values.push(Box::new(v.clone()));
        }
        if let Some(v) = &fields.decision {
            sets.push("decision = ?");
            values.push(Box::new(v.clone()));
        }
        if let Some(v) = &fields.decision_date {
            sets.push("decision_date = ?");
            values.push(Box::new(v.clone()));
        }
        if let Some(v) = &fields.occupant_name {
            sets.push("occupant_name = ?");
            values.push(Box::new(v.clone()));
        }
        if let Some(v) = &fields.employee_id {
            sets.push("employee_id = ?");
            values.push(Box::new(v.clone()));
        }
        if let Some(v) = &fields.national_id {
            sets.push("national_id = ?");
            values.push(Box::new(v.clone()));
        }
        if let Some(v) = &fields.profession {
            sets.push("profession = ?");
            values.push(Box::new(v.clone()));
        }
        if let Some(v) = &fields.job_title {
            sets.push("job_title = ?");
            values.push(Box::new(v.clone()));
        }
        if let Some(v) = &fields.department {
            sets.push("department = ?");
            values.push(Box::new(v.clone()));
        }
        if let Some(v) = &fields.phone {
            sets.push("phone = ?");
            values.push(Box::new(v.clone()));
        }
        if let Some(v) = fields.employed {
            sets.push("employed = ?");
            values.push(Box::new(v.as_str()));
        }
        if let Some(v) = fields.retired {
            sets.push("retired = ?");
            values.push(Box::new(v.as_str()));
        }
        if let Some(v) = fields.deceased {
            sets.push("deceased = ?");
            values.push(Box::new(v.as_str()));
        }
        if let Some(v) = &fields.respondent_name {
            sets.push("respondent_name = ?");
            values.push(Box::new(v.clone()));
        }
        if let Some(v) = &fields.respondent_relation {
            sets.push("respondent_relation = ?");
            values.push(Box::new(v.clone()));
        }
        if let Some(v) = &fields.respondent_phone {
            sets.push("respondent_phone = ?");
            values.push(Box::new(v.clone()));
        }
        if let Some(v) = &fields.state_owned {
            sets.push("state_owned = ?");
            values.push(Box::new(v.clone()));
        }
        if let Some(v) = &fields.decommissioned {
            sets.push("decommissioned = ?");
            values.push(Box::new(v.clone()));
        }
        if let Some(v) = &fields.observation {
            sets.push("observation = ?");
            values.push(Box::new(v.clone()));
        }
        if let Some(v) = fields.latitude {
            sets.push("latitude = ?");
            values.push(Box::new(v));
        }
        if let Some(v) = fields.longitude {
            sets.push("longitude = ?");
            values.push(Box::new(v));
        }
        if let Some(v) = &fields.status {
            sets.push("status = ?");
            values.push(Box::new(v.clone()));
        }

        sets.push("updated_at = ?");
        values.push(Box::new(now));
        values.push(Box::new(id));

        let sql = format!(
            "UPDATE housing_records SET {} WHERE id = ?",
            sets.join(", ")
        );

        let changed = conn
            .execute(
                &sql,
                rusqlite::params_from_iter(values.iter().map(|v| &**v)),
            )
            .map_err(|e| RegistryError::DbError(e.to_string()))?;

        if changed == 0 {
            return Ok(false);
        }

        audit::record_audit(conn, Some(id), AuditAction::Update, &fields.snapshot(), actor);
        Ok(true)
    })
}

/// Remove a record. The block/unit locator is captured before the row goes so
/// the DELETE audit entry keeps that context. Deleting a nonexistent id is a
/// no-op, not an error, and leaves no audit trace.
pub fn delete_record(db: &Database, id: i64, actor: &str) -> Result<(), RegistryError> {
    db.with_conn(|conn| {
        let locator: Option<(String, String)> = conn
            .query_row(
                "SELECT block, unit FROM housing_records WHERE id = ?",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(|e| RegistryError::DbError(e.to_string()))?;

        conn.execute("DELETE FROM housing_records WHERE id = ?", params![id])
            .map_err(|e| RegistryError::DbError(e.to_string()))?;

        if let Some((block, unit)) = locator {
            audit::record_audit(
                conn,
                Some(id),
                AuditAction::Delete,
                &format!("Deleted unit {block}-{unit}"),
                actor,
            );
        }

        Ok(())
    })
}

/// Non-empty distinct values of a text column, ascending. Populates the
/// filter selectboxes. The column name is checked against the schema so a
/// caller typo can't reach the SQL string.
pub fn distinct_values(db: &Database, column: &str) -> Result<Vec<String>, RegistryError> {
    if !TEXT_COLUMNS.contains(&column) {
        return Err(RegistryError::BadRequest(format!(
            "not a filterable column: {column}"
        )));
    }

    db.with_conn(|conn| {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT DISTINCT {column} FROM housing_records
                 WHERE {column} != '' ORDER BY {column}"
            ))
            .map_err(|e| RegistryError::DbError(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| RegistryError::DbError(e.to_string()))?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r.map_err(|e| RegistryError::DbError(e.to_string()))?);
        }
        Ok(out)
    })
}
