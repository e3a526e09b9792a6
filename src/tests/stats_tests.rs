use crate::db::records::create_record;
use crate::db::stats::collect_statistics;
use crate::domain::record::{RecordFields, TriState};
use crate::tests::utils::make_db;

fn record_in(block: &str, department: &str, employed: TriState) -> RecordFields {
    RecordFields {
        block: Some(block.to_string()),
        unit: Some("1".to_string()),
        occupant_name: Some("Someone".to_string()),
        department: if department.is_empty() {
            None
        } else {
            Some(department.to_string())
        },
        employed: Some(employed),
        ..Default::default()
    }
}

#[test]
fn empty_store_has_empty_statistics() {
    let db = make_db("stats_empty");
    let stats = collect_statistics(&db).unwrap();
    assert_eq!(stats.total, 0);
    assert!(stats.by_block.is_empty());
    assert!(stats.by_department.is_empty());
    assert!(stats.by_employed.is_empty());
}

#[test]
fn groups_count_every_block_but_skip_blank_departments() {
    let db = make_db("stats_groups");

    create_record(&db, &record_in("A", "Health", TriState::Yes), "tester").unwrap();
    create_record(&db, &record_in("A", "Health", TriState::No), "tester").unwrap();
    create_record(&db, &record_in("B", "Education", TriState::Unknown), "tester").unwrap();
    // Blank department still counts toward total and blocks
    create_record(&db, &record_in("B", "", TriState::Unknown), "tester").unwrap();

    let stats = collect_statistics(&db).unwrap();

    assert_eq!(stats.total, 4);
    assert_eq!(
        stats.by_block,
        vec![("A".to_string(), 2), ("B".to_string(), 2)]
    );

    // Blank department excluded; counts descending
    assert_eq!(
        stats.by_department,
        vec![("Health".to_string(), 2), ("Education".to_string(), 1)]
    );
}

#[test]
fn employed_groups_keep_raw_values_distinct() {
    let db = make_db("stats_employed");

    create_record(&db, &record_in("A", "X", TriState::Yes), "tester").unwrap();
    create_record(&db, &record_in("A", "X", TriState::No), "tester").unwrap();
    create_record(&db, &record_in("A", "X", TriState::Unknown), "tester").unwrap();
    create_record(&db, &record_in("A", "X", TriState::Unknown), "tester").unwrap();

    let stats = collect_statistics(&db).unwrap();
    let mut groups = stats.by_employed;
    groups.sort();

    // "" (unknown) is its own group, never folded into "No"
    assert_eq!(
        groups,
        vec![
            ("".to_string(), 2),
            ("No".to_string(), 1),
            ("Yes".to_string(), 1),
        ]
    );
}

#[test]
fn department_ranking_is_capped_at_ten() {
    let db = make_db("stats_top10");

    for i in 0..12 {
        let dept = format!("Dept{i:02}");
        // Dept00 gets 1 record, Dept01 gets 2, ... so higher indexes rank higher
        for _ in 0..=i {
            create_record(&db, &record_in("A", &dept, TriState::Yes), "tester").unwrap();
        }
    }

    let stats = collect_statistics(&db).unwrap();
    assert_eq!(stats.by_department.len(), 10);
    assert_eq!(stats.by_department[0], ("Dept11".to_string(), 12));
    // The two smallest departments fall off the ranking
    assert!(!stats
        .by_department
        .iter()
        .any(|(d, _)| d == "Dept00" || d == "Dept01"));
}
