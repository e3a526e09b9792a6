use crate::db::connection::{init_db, Database};
use crate::db::records;
use crate::db::stats::collect_statistics;
use crate::db::audit::get_audit_log;
use crate::domain::geo;
use crate::domain::record::{HousingRecord, RecordFields, RecordFilter, TriState};
use crate::errors::RegistryError;
use crate::spreadsheets::{export_workbook, import_workbook};
use std::env;

mod db;
mod domain;
mod errors;
mod spreadsheets;

#[cfg(test)]
mod tests;

const USAGE: &str = "\
Usage: housing_registry <command> [args]

Commands:
  import <file.xlsx>            replace the whole store with a spreadsheet
  export <file.xlsx>            dump the store to a spreadsheet
  create <field=value ...>      add a record (block, unit, occupant_name required)
  update <id> <field=value ...> change only the given fields
  delete <id>                   remove a record
  show <id>                     print one record
  list [field=value ...]        list records (filters: block, department, profession, status)
  search <term>                 substring search
  distinct <column>             distinct non-empty values of a column
  stats                         aggregate statistics
  audit [record_id]             recent audit entries, newest first

Environment: REGISTRY_DB (default registry.sqlite3), REGISTRY_ACTOR (default operator)";

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("{USAGE}");
        std::process::exit(2);
    }

    let db_path = env::var("REGISTRY_DB").unwrap_or_else(|_| "registry.sqlite3".to_string());
    let actor = env::var("REGISTRY_ACTOR").unwrap_or_else(|_| "operator".to_string());

    let db = Database::new(db_path);
    if let Err(e) = init_db(&db, "sql/schema.sql") {
        eprintln!("❌ Database initialization failed: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(&db, &actor, &args) {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}

fn run(db: &Database, actor: &str, args: &[String]) -> Result<(), RegistryError> {
    match args[0].as_str() {
        "import" => {
            let path = require_arg(args, 1, "import needs a file path")?;
            let count = import_workbook(db, path, actor)?;
            println!("✅ Imported {count} records from {path}");
        }
        "export" => {
            let path = require_arg(args, 1, "export needs a file path")?;
            let count = export_workbook(db, path, actor)?;
            println!("✅ Exported {count} records to {path}");
        }
        "create" => {
            let fields = parse_fields(&args[1..])?;
            // Required-field checks live here at the caller boundary; the
            // repository itself accepts any subset.
            for (label, value) in [
                ("block", &fields.block),
                ("unit", &fields.unit),
                ("occupant_name", &fields.occupant_name),
            ] {
                if value.as_deref().map_or(true, str::is_empty) {
                    return Err(RegistryError::BadRequest(format!("{label} is required")));
                }
            }
            let id = records::create_record(db, &fields, actor)?;
            println!("✅ Created record {id}");
        }
        "update" => {
            let id = parse_id(require_arg(args, 1, "update needs a record id")?)?;
            let fields = parse_fields(&args[2..])?;
            if records::update_record(db, id, &fields, actor)? {
                println!("✅ Updated record {id}");
            } else {
                println!("⚠️ No record with id {id}");
            }
        }
        "delete" => {
            let id = parse_id(require_arg(args, 1, "delete needs a record id")?)?;
            records::delete_record(db, id, actor)?;
            println!("✅ Deleted record {id}");
        }
        "show" => {
            let id = parse_id(require_arg(args, 1, "show needs a record id")?)?;
            match records::get_record(db, id)? {
                Some(record) => print_record(&record),
                None => println!("⚠️ No record with id {id}"),
            }
        }
        "list" => {
            let filter = parse_filter(&args[1..])?;
            let found = records::list_records(db, &filter)?;
            for record in &found {
                print_record_line(record);
            }
            println!("✅ {} records", found.len());
        }
        "search" => {
            let term = require_arg(args, 1, "search needs a term")?;
            let found = records::search_records(db, term)?;
            for record in &found {
                print_record_line(record);
            }
            println!("✅ {} matches", found.len());
        }
        "distinct" => {
            let column = require_arg(args, 1, "distinct needs a column name")?;
            for value in records::distinct_values(db, column)? {
                println!("{value}");
            }
        }
        "stats" => {
            let stats = collect_statistics(db)?;
            println!("Total records: {}", stats.total);
            println!("By block:");
            for (block, n) in &stats.by_block {
                println!("  {block}: {n}");
            }
            println!("Top departments:");
            for (department, n) in &stats.by_department {
                println!("  {department}: {n}");
            }
            println!("By employed flag:");
            for (value, n) in &stats.by_employed {
                let label = if value.is_empty() { "(unknown)" } else { value };
                println!("  {label}: {n}");
            }
        }
        "audit" => {
            let record_id = match args.get(1) {
                Some(raw) => Some(parse_id(raw)?),
                None => None,
            };
            for entry in get_audit_log(db, record_id, 50)? {
                let scope = entry
                    .record_id
                    .map(|id| format!("#{id}"))
                    .unwrap_or_else(|| "bulk".to_string());
                println!(
                    "{}  {:<6} {:<8} {}  {}",
                    entry.timestamp, entry.action, scope, entry.actor, entry.details
                );
            }
        }
        other => {
            eprintln!("{USAGE}");
            return Err(RegistryError::BadRequest(format!("unknown command: {other}")));
        }
    }

    Ok(())
}

fn require_arg<'a>(args: &'a [String], index: usize, msg: &str) -> Result<&'a str, RegistryError> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| RegistryError::BadRequest(msg.to_string()))
}

fn parse_id(raw: &str) -> Result<i64, RegistryError> {
    raw.parse::<i64>()
        .map_err(|_| RegistryError::BadRequest(format!("not a record id: {raw}")))
}

/// Parse `field=value` pairs into a sparse patch. Coordinates that don't
/// parse fall back silently to the district center.
fn parse_fields(pairs: &[String]) -> Result<RecordFields, RegistryError> {
    let mut fields = RecordFields::default();

    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| RegistryError::BadRequest(format!("expected field=value: {pair}")))?;

        let text = Some(value.to_string());
        match key {
            "block" => fields.block = text,
            "unit" => fields.unit = text,
            "decision" => fields.decision = text,
            "decision_date" => fields.decision_date = text,
            "occupant_name" => fields.occupant_name = text,
            "employee_id" => fields.employee_id = text,
            "national_id" => fields.national_id = text,
            "profession" => fields.profession = text,
            "job_title" => fields.job_title = text,
            "department" => fields.department = text,
            "phone" => fields.phone = text,
            "employed" => fields.employed = Some(TriState::from_label(value)),
            "retired" => fields.retired = Some(TriState::from_label(value)),
            "deceased" => fields.deceased = Some(TriState::from_label(value)),
            "respondent_name" => fields.respondent_name = text,
            "respondent_relation" => fields.respondent_relation = text,
            "respondent_phone" => fields.respondent_phone = text,
            "state_owned" => fields.state_owned = text,
            "decommissioned" => fields.decommissioned = text,
            "observation" => fields.observation = text,
            "latitude" => fields.latitude = Some(geo::parse_coord(value, geo::DISTRICT_LAT)),
            "longitude" => fields.longitude = Some(geo::parse_coord(value, geo::DISTRICT_LON)),
            "status" => fields.status = text,
            other => {
                return Err(RegistryError::BadRequest(format!("unknown field: {other}")));
            }
        }
    }

    Ok(fields)
}

fn parse_filter(pairs: &[String]) -> Result<RecordFilter, RegistryError> {
    let mut filter = RecordFilter::default();

    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| RegistryError::BadRequest(format!("expected field=value: {pair}")))?;

        let text = Some(value.to_string());
        match key {
            "block" => filter.block = text,
            "department" => filter.department = text,
            "profession" => filter.profession = text,
            "status" => filter.status = text,
            other => {
                return Err(RegistryError::BadRequest(format!(
                    "not a filterable field: {other}"
                )));
            }
        }
    }

    Ok(filter)
}

fn print_record_line(record: &HousingRecord) {
    println!(
        "{:>5}  {}-{}  {}  {}",
        record.id, record.block, record.unit, record.occupant_name, record.status
    );
}

fn print_record(record: &HousingRecord) {
    println!("Record {}", record.id);
    println!("  Locator:     {}-{}", record.block, record.unit);
    println!(
        "  Decision:    {} ({})",
        record.decision, record.decision_date
    );
    println!("  Occupant:    {}", record.occupant_name);
    println!("  Employee id: {}", record.employee_id);
    println!("  National id: {}", record.national_id);
    println!(
        "  Work:        {} / {} / {}",
        record.profession, record.job_title, record.department
    );
    println!("  Phone:       {}", record.phone);
    println!(
        "  Flags:       employed={:?} retired={:?} deceased={:?}",
        record.employed, record.retired, record.deceased
    );
    println!(
        "  Respondent:  {} ({}) {}",
        record.respondent_name, record.respondent_relation, record.respondent_phone
    );
    println!(
        "  Location:    {:.6}, {:.6}",
        record.latitude, record.longitude
    );
    println!("  Status:      {}", record.status);
    println!("  Observation: {}", record.observation);
    println!(
        "  Created {} / updated {}",
        record.created_at, record.updated_at
    );
}
