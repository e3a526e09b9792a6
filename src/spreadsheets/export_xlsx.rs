// src/spreadsheets/export_xlsx.rs
use crate::db::audit::{self, AuditAction};
use crate::db::connection::Database;
use crate::db::records::list_records;
use crate::domain::record::{HousingRecord, RecordFilter};
use crate::errors::RegistryError;
use crate::spreadsheets::MAPPED_HEADERS;
use rust_xlsxwriter::Workbook;

/// Technical-only columns (id, timestamps) stay out of the export; these
/// trail the mapped columns.
const EXTRA_HEADERS: [&str; 4] = ["Observation", "Latitude", "Longitude", "Statut"];

/// One record's mapped-column values, in [`MAPPED_HEADERS`] order.
fn mapped_fields(record: &HousingRecord) -> [&str; 19] {
    [
        record.block.as_str(),
        record.unit.as_str(),
        record.decision.as_str(),
        record.decision_date.as_str(),
        record.occupant_name.as_str(),
        record.employee_id.as_str(),
        record.national_id.as_str(),
        record.profession.as_str(),
        record.job_title.as_str(),
        record.department.as_str(),
        record.phone.as_str(),
        record.employed.as_str(),
        record.retired.as_str(),
        record.deceased.as_str(),
        record.respondent_name.as_str(),
        record.respondent_relation.as_str(),
        record.respondent_phone.as_str(),
        record.state_owned.as_str(),
        record.decommissioned.as_str(),
    ]
}

/// Dump every record to an xlsx file at `path`, mapped columns first under
/// their exact source headers so the file survives a round trip through the
/// importer. Returns the number of rows written.
pub fn export_workbook(db: &Database, path: &str, actor: &str) -> Result<usize, RegistryError> {
    let records = list_records(db, &RecordFilter::default())?;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in MAPPED_HEADERS.iter().chain(EXTRA_HEADERS.iter()).enumerate() {
        worksheet.write_string(0, col as u16, *header).map_err(|e| {
            RegistryError::XlsxError(format!("Failed to write header '{header}': {e}"))
        })?;
    }

    for (i, record) in records.iter().enumerate() {
        let r = (i + 1) as u32;

        for (col, value) in mapped_fields(record).iter().enumerate() {
            worksheet
                .write_string(r, col as u16, *value)
                .map_err(|e| RegistryError::XlsxError(format!("Failed to write row {r}: {e}")))?;
        }

        worksheet
            .write_string(r, 19, &record.observation)
            .map_err(|e| RegistryError::XlsxError(format!("Failed to write observation: {e}")))?;
        worksheet
            .write_number(r, 20, record.latitude)
            .map_err(|e| RegistryError::XlsxError(format!("Failed to write latitude: {e}")))?;
        worksheet
            .write_number(r, 21, record.longitude)
            .map_err(|e| RegistryError::XlsxError(format!("Failed to write longitude: {e}")))?;
        worksheet
            .write_string(r, 22, &record.status)
            .map_err(|e| RegistryError::XlsxError(format!("Failed to write status: {e}")))?;
    }

    workbook
        .save(path)
        .map_err(|e| RegistryError::XlsxError(format!("Failed to save {path}: {e}")))?;

    db.with_conn(|conn| {
        audit::record_audit(
            conn,
            None,
            AuditAction::Export,
            &format!("Exported {} records to {path}", records.len()),
            actor,
        );
        Ok(())
    })?;

    Ok(records.len())
}
