// src/spreadsheets/import_xlsx.rs
use crate::db::audit::{self, AuditAction};
use crate::db::connection::Database;
use crate::domain::geo;
use crate::domain::record::DEFAULT_STATUS;
use crate::errors::RegistryError;
use crate::spreadsheets::MAPPED_HEADERS;
use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::Utc;
use rusqlite::params;

/// Flatten one cell to the text that gets stored. Blank or unreadable cells
/// become empty strings, never NULL.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(v) => v.to_string(),
        Data::Float(v) => {
            // Unit numbers and ids come back from Excel as floats; "12.0"
            // is not a unit number.
            if v.fract() == 0.0 && v.abs() < 1e15 {
                format!("{}", *v as i64)
            } else {
                v.to_string()
            }
        }
        Data::Bool(v) => {
            if *v {
                "Yes".to_string()
            } else {
                "No".to_string()
            }
        }
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

/// Full-replace import: every existing record is dropped and the sheet
/// becomes the new record store, in one transaction — a failure partway
/// rolls back to the pre-import state. Each row gets a synthetic jittered
/// location derived from its block code. Returns the number of rows loaded.
pub fn import_workbook(db: &Database, path: &str, actor: &str) -> Result<usize, RegistryError> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e| RegistryError::XlsxError(format!("Cannot open {path}: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| RegistryError::XlsxError(format!("{path} has no worksheets")))?
        .map_err(|e| RegistryError::XlsxError(e.to_string()))?;

    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| RegistryError::XlsxError(format!("{path} has no header row")))?;
    let headers: Vec<String> = header_row
        .iter()
        .map(|c| cell_text(c).trim().to_string())
        .collect();

    // Where each mapped column sits in this particular file. A column the
    // file doesn't carry yields empty strings for every row.
    let positions: Vec<Option<usize>> = MAPPED_HEADERS
        .iter()
        .map(|wanted| headers.iter().position(|h| h == wanted))
        .collect();

    // Materialize the sheet before touching the store, so a torn file can't
    // interrupt the replace halfway.
    let mut sheet_rows: Vec<Vec<String>> = Vec::new();
    for row in rows {
        let values: Vec<String> = positions
            .iter()
            .map(|p| p.and_then(|i| row.get(i)).map(cell_text).unwrap_or_default())
            .collect();
        sheet_rows.push(values);
    }

    let now = Utc::now().naive_utc();

    db.with_conn(|conn| {
        let tx = conn
            .transaction()
            .map_err(|e| RegistryError::DbError(e.to_string()))?;

        tx.execute("DELETE FROM housing_records", [])
            .map_err(|e| RegistryError::DbError(e.to_string()))?;

        let mut count = 0usize;
        for values in &sheet_rows {
            let (lat, lon) = geo::jittered_location(&values[0]);

            tx.execute(
                r#"
                INSERT INTO housing_records (
                    block, unit, decision, decision_date, occupant_name,
                    employee_id, national_id, profession, job_title, department,
                    phone, employed, retired, deceased,
                    respondent_name, respondent_relation, respondent_phone,
                    state_owned, decommissioned,
                    latitude, longitude, status, created_at, updated_at
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5,
                    ?6, ?7, ?8, ?9, ?10,
                    ?11, ?12, ?13, ?14,
                    ?15, ?16, ?17,
                    ?18, ?19,
                    ?20, ?21, ?22, ?23, ?24
                )
                "#,
                params![
                    values[0],
                    values[1],
                    values[2],
                    values[3],
                    values[4],
                    values[5],
                    values[6],
                    values[7],
                    values[8],
                    values[9],
                    values[10],
                    values[11],
                    values[12],
                    values[13],
                    values[14],
                    values[15],
                    values[16],
                    values[17],
                    values[18],
                    lat,
                    lon,
                    DEFAULT_STATUS,
                    now,
                    now,
                ],
            )
            .map_err(|e| RegistryError::DbError(e.to_string()))?;

            count += 1;
        }

        tx.commit()
            .map_err(|e| RegistryError::DbError(e.to_string()))?;

        audit::record_audit(
            conn,
            None,
            AuditAction::Import,
            &format!("Imported {count} records from {path}"),
            actor,
        );

        Ok(count)
    })
}
