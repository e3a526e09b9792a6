use crate::db::connection::{init_db, Database};
use std::time::{SystemTime, UNIX_EPOCH};

/// Fresh database on the production schema, one unique file per call.
pub fn make_db(tag: &str) -> Database {
    let path = std::env::temp_dir().join(format!(
        "{tag}_{}.sqlite",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let db = Database::new(path.to_string_lossy().into_owned());

    init_db(&db, "sql/schema.sql").expect("Failed to initialize DB");

    db
}

/// Unique scratch path for spreadsheet fixtures.
pub fn temp_path(tag: &str, ext: &str) -> String {
    std::env::temp_dir()
        .join(format!(
            "{tag}_{}.{ext}",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ))
        .to_string_lossy()
        .into_owned()
}
