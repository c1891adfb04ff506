use forkmap_core::db::migrations::latest_version;
use forkmap_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "restaurant");
    assert_table_exists(&conn, "review");
    assert_table_exists(&conn, "list");
    assert_table_exists(&conn, "belongs_in_list");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("forkmap.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "restaurant");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn connections_enforce_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);

    let err = conn.execute(
        "INSERT INTO belongs_in_list (list_id, restaurant_id) VALUES ('nope', 'nope');",
        [],
    );
    assert!(err.is_err());
}

#[test]
fn schema_rejects_out_of_range_values() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO restaurant (id, name, latitude, longitude) VALUES ('r', 'x', -118.24, 34.05);",
        [],
    )
    .unwrap();
    assert!(conn
        .execute(
            "INSERT INTO review (id, restaurant_id, rating) VALUES ('v', 'r', 5.5);",
            [],
        )
        .is_err());
    assert!(conn
        .execute("INSERT INTO list (id, name) VALUES ('l', '');", [])
        .is_err());
}

#[test]
fn membership_indexes_are_created() {
    let conn = open_db_in_memory().unwrap();
    assert_index_exists(&conn, "idx_belongs_in_list_restaurant");
    assert_index_exists(&conn, "idx_belongs_in_list_added");
    assert_index_exists(&conn, "idx_review_restaurant_created");
}

#[test]
fn database_at_first_version_is_upgraded_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v1.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(include_str!("../src/db/migrations/0001_init.sql"))
        .unwrap();
    conn.execute_batch("PRAGMA user_version = 1;").unwrap();
    conn.execute(
        "INSERT INTO list (id, name) VALUES ('kept', 'Before upgrade');",
        [],
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert_index_exists(&conn, "idx_belongs_in_list_added");
    let name: String = conn
        .query_row("SELECT name FROM list WHERE id = 'kept';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(name, "Before upgrade");
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_index_exists(conn: &Connection, index_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'index' AND name = ?1
            );",
            [index_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "index {index_name} does not exist");
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
