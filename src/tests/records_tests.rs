use crate::db::records::{
    create_record, delete_record, distinct_values, get_record, list_records, search_records,
    update_record,
};
use crate::domain::geo::{DISTRICT_LAT, DISTRICT_LON};
use crate::domain::record::{RecordFields, RecordFilter, TriState, DEFAULT_STATUS, NO_FILTER};
use crate::errors::RegistryError;
use crate::tests::utils::make_db;
use std::thread;
use std::time::Duration;

fn unit_fields(block: &str, unit: &str, occupant: &str) -> RecordFields {
    RecordFields {
        block: Some(block.to_string()),
        unit: Some(unit.to_string()),
        occupant_name: Some(occupant.to_string()),
        ..Default::default()
    }
}

#[test]
fn create_then_read_round_trip() {
    let db = make_db("records_round_trip");

    let fields = RecordFields {
        block: Some("A".to_string()),
        unit: Some("12".to_string()),
        occupant_name: Some("Jane Doe".to_string()),
        profession: Some("Engineer".to_string()),
        employed: Some(TriState::Yes),
        ..Default::default()
    };

    let id = create_record(&db, &fields, "tester").unwrap();
    let record = get_record(&db, id).unwrap().expect("record should exist");

    // Supplied fields come back as given
    assert_eq!(record.block, "A");
    assert_eq!(record.unit, "12");
    assert_eq!(record.occupant_name, "Jane Doe");
    assert_eq!(record.profession, "Engineer");
    assert_eq!(record.employed, "Yes");

    // Omitted fields default to empty / district center / Active
    assert_eq!(record.decision, "");
    assert_eq!(record.department, "");
    assert_eq!(record.retired, "");
    assert_eq!(record.latitude, DISTRICT_LAT);
    assert_eq!(record.longitude, DISTRICT_LON);
    assert_eq!(record.status, DEFAULT_STATUS);

    // A fresh record has identical timestamps
    assert_eq!(record.created_at, record.updated_at);
}

#[test]
fn read_missing_id_is_none_not_error() {
    let db = make_db("records_missing");
    assert!(get_record(&db, 9999).unwrap().is_none());
}

#[test]
fn update_is_partial_and_refreshes_timestamp() {
    let db = make_db("records_partial_update");

    let id = create_record(&db, &unit_fields("A", "1", "Jane Doe"), "tester").unwrap();
    let before = get_record(&db, id).unwrap().unwrap();

    // Timestamps are sub-second but not infinitely fine
    thread::sleep(Duration::from_millis(10));

    let patch = RecordFields {
        occupant_name: Some("John Doe".to_string()),
        ..Default::default()
    };
    assert!(update_record(&db, id, &patch, "tester").unwrap());

    let after = get_record(&db, id).unwrap().unwrap();
    assert_eq!(after.occupant_name, "John Doe");
    assert_eq!(after.block, "A"); // untouched
    assert_eq!(after.unit, "1"); // untouched
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at > before.updated_at);
}

#[test]
fn update_missing_id_reports_false() {
    let db = make_db("records_update_missing");
    let patch = RecordFields {
        occupant_name: Some("Nobody".to_string()),
        ..Default::default()
    };
    assert!(!update_record(&db, 4242, &patch, "tester").unwrap());
}

#[test]
fn delete_is_noop_safe_on_missing_id() {
    let db = make_db("records_noop_delete");

    // Must not error, and must not disturb later operations
    delete_record(&db, 777, "tester").unwrap();

    let id = create_record(&db, &unit_fields("B", "2", "Alice"), "tester").unwrap();
    assert!(get_record(&db, id).unwrap().is_some());

    delete_record(&db, id, "tester").unwrap();
    assert!(get_record(&db, id).unwrap().is_none());
}

#[test]
fn list_filters_by_exact_equality() {
    let db = make_db("records_filter");

    create_record(&db, &unit_fields("A", "1", "Jane"), "tester").unwrap();
    create_record(&db, &unit_fields("A", "2", "Alice"), "tester").unwrap();
    create_record(&db, &unit_fields("B", "1", "Bob"), "tester").unwrap();

    let filter = RecordFilter {
        block: Some("A".to_string()),
        ..Default::default()
    };
    let found = list_records(&db, &filter).unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|r| r.block == "A"));

    // The sentinel means "no filter", same as an absent value
    let all_sentinel = RecordFilter {
        block: Some(NO_FILTER.to_string()),
        ..Default::default()
    };
    assert_eq!(list_records(&db, &all_sentinel).unwrap().len(), 3);
    assert_eq!(list_records(&db, &RecordFilter::default()).unwrap().len(), 3);

    // No matches is an empty list, not an error
    let none = RecordFilter {
        block: Some("Z".to_string()),
        ..Default::default()
    };
    assert!(list_records(&db, &none).unwrap().is_empty());
}

#[test]
fn list_orders_by_locator_then_insertion() {
    let db = make_db("records_order");

    let late = create_record(&db, &unit_fields("B", "01", "Bob"), "tester").unwrap();
    let first = create_record(&db, &unit_fields("A", "02", "Jane"), "tester").unwrap();
    let second = create_record(&db, &unit_fields("A", "02", "Twin"), "tester").unwrap();
    let third = create_record(&db, &unit_fields("A", "10", "Alice"), "tester").unwrap();

    let ids: Vec<i64> = list_records(&db, &RecordFilter::default())
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();

    // (block, unit) ascending; the two A-02 rows keep insertion order
    assert_eq!(ids, vec![first, second, third, late]);
}

#[test]
fn search_is_case_insensitive_substring() {
    let db = make_db("records_search");

    let mut fields = unit_fields("A", "1", "Jane Doe");
    fields.department = Some("Finance".to_string());
    create_record(&db, &fields, "tester").unwrap();
    create_record(&db, &unit_fields("B", "2", "Bob"), "tester").unwrap();

    assert_eq!(search_records(&db, "jane").unwrap().len(), 1);
    assert_eq!(search_records(&db, "FINAN").unwrap().len(), 1);
    assert_eq!(search_records(&db, "doe").unwrap().len(), 1);
    assert!(search_records(&db, "zzz").unwrap().is_empty());
}

#[test]
fn tri_state_unknown_survives_create_and_read() {
    let db = make_db("records_tri_state");

    let mut fields = unit_fields("A", "12", "Jane Doe");
    fields.employed = Some(TriState::Unknown);
    fields.retired = Some(TriState::No);

    let id = create_record(&db, &fields, "tester").unwrap();
    let record = get_record(&db, id).unwrap().unwrap();

    // Unknown reads back as the empty string, never coerced to "No"
    assert_eq!(record.employed, "");
    assert_eq!(record.retired, "No");
}

#[test]
fn distinct_values_are_sorted_and_skip_blanks() {
    let db = make_db("records_distinct");

    let mut a = unit_fields("C", "1", "Jane");
    a.department = Some("Health".to_string());
    create_record(&db, &a, "tester").unwrap();

    let mut b = unit_fields("A", "2", "Bob");
    b.department = Some("Education".to_string());
    create_record(&db, &b, "tester").unwrap();

    // Blank department must not appear
    create_record(&db, &unit_fields("B", "3", "Alice"), "tester").unwrap();

    assert_eq!(
        distinct_values(&db, "department").unwrap(),
        vec!["Education".to_string(), "Health".to_string()]
    );
    assert_eq!(
        distinct_values(&db, "block").unwrap(),
        vec!["A".to_string(), "B".to_string(), "C".to_string()]
    );
}

#[test]
fn distinct_values_rejects_unknown_column() {
    let db = make_db("records_distinct_bad");
    match distinct_values(&db, "id; DROP TABLE housing_records") {
        Err(RegistryError::BadRequest(_)) => {}
        other => panic!("expected BadRequest, got {other:?}"),
    }
}
