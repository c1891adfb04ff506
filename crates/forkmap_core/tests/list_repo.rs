use forkmap_core::db::open_db_in_memory;
use forkmap_core::{
    Coordinates, FoodIcon, ListId, ListPatch, ListRepository, NewList, NewRestaurant, RepoError,
    RestaurantId, RestaurantRepository, SqliteListRepository, SqliteRestaurantRepository,
    ValidationError,
};
use rusqlite::Connection;
use uuid::Uuid;

fn seed_restaurant(conn: &Connection, name: &str, latitude: f64) -> RestaurantId {
    SqliteRestaurantRepository::new(conn)
        .create(&NewRestaurant::new(name, Coordinates::new(latitude, 0.0)))
        .unwrap()
        .id
}

fn membership_count(conn: &Connection, list_id: ListId) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM belongs_in_list WHERE list_id = ?1;",
        [list_id.to_string()],
        |row| row.get(0),
    )
    .unwrap()
}

fn set_added_at(conn: &Connection, list_id: ListId, added_at: i64) {
    conn.execute(
        "UPDATE belongs_in_list SET added_at = ?1 WHERE list_id = ?2;",
        rusqlite::params![added_at, list_id.to_string()],
    )
    .unwrap();
}

#[test]
fn create_uses_store_defaults() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::new(&conn);

    let list = repo.create(&NewList::named("Want to go")).unwrap();
    assert_eq!(list.name, "Want to go");
    assert_eq!(list.description, None);
    assert_eq!(list.icon, FoodIcon::ForkAndKnifeWithPlate);
    assert!(list.restaurants.is_empty());
    assert!(list.created_at > 0);

    let custom = repo
        .create(&NewList {
            name: "Brunch".to_string(),
            description: Some("weekend spots".to_string()),
            icon: Some(FoodIcon::Pancakes),
        })
        .unwrap();
    assert_eq!(custom.icon, FoodIcon::Pancakes);
    assert_eq!(custom.description.as_deref(), Some("weekend spots"));

    assert_eq!(repo.get_by_id(custom.id).unwrap().unwrap(), custom);
    assert!(repo.get_by_id(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn create_rejects_invalid_names() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::new(&conn);

    let err = repo.create(&NewList::named("   ")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::Blank(_))
    ));

    let err = repo.create(&NewList::named("n".repeat(51))).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::TooLong { max_chars: 50, .. })
    ));

    let err = repo
        .create(&NewList {
            name: "ok".to_string(),
            description: Some("d".repeat(256)),
            icon: None,
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn add_restaurant_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::new(&conn);
    let restaurant_id = seed_restaurant(&conn, "Twice", 1.0);
    let list = repo.create(&NewList::named("Dupes")).unwrap();

    repo.add_restaurant(restaurant_id, list.id).unwrap();
    repo.add_restaurant(restaurant_id, list.id).unwrap();

    assert_eq!(membership_count(&conn, list.id), 1);
    let hydrated = repo.get_by_id(list.id).unwrap().unwrap();
    assert_eq!(hydrated.restaurants.len(), 1);
    assert_eq!(hydrated.restaurants[0].id, restaurant_id);
}

#[test]
fn add_restaurant_to_missing_list_fails() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::new(&conn);
    let restaurant_id = seed_restaurant(&conn, "Orphan", 1.0);

    let err = repo
        .add_restaurant(restaurant_id, Uuid::new_v4())
        .unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn members_are_hydrated_in_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::new(&conn);
    let list = repo.create(&NewList::named("Ordered")).unwrap();
    let ids: Vec<RestaurantId> = ["a", "b", "c"]
        .iter()
        .enumerate()
        .map(|(index, name)| seed_restaurant(&conn, name, index as f64))
        .collect();
    for id in ids.iter().rev() {
        repo.add_restaurant(*id, list.id).unwrap();
    }

    let names: Vec<String> = repo
        .get_by_id(list.id)
        .unwrap()
        .unwrap()
        .restaurants
        .into_iter()
        .map(|restaurant| restaurant.name)
        .collect();
    assert_eq!(names, ["c", "b", "a"]);
}

#[test]
fn remove_restaurant_unlinks_only_that_membership() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::new(&conn);
    let restaurant_id = seed_restaurant(&conn, "Shared", 1.0);
    let first = repo.create(&NewList::named("First")).unwrap();
    let second = repo.create(&NewList::named("Second")).unwrap();
    repo.add_restaurant(restaurant_id, first.id).unwrap();
    repo.add_restaurant(restaurant_id, second.id).unwrap();

    repo.remove_restaurant(restaurant_id, first.id).unwrap();
    repo.remove_restaurant(restaurant_id, first.id).unwrap();

    assert_eq!(membership_count(&conn, first.id), 0);
    assert_eq!(membership_count(&conn, second.id), 1);
    let restaurants = SqliteRestaurantRepository::new(&conn);
    assert!(restaurants.get_by_id(restaurant_id).unwrap().is_some());
}

#[test]
fn hydration_skips_memberships_of_missing_restaurants() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::new(&conn);
    let kept = seed_restaurant(&conn, "kept", 1.0);
    let gone = seed_restaurant(&conn, "gone", 2.0);
    let list = repo.create(&NewList::named("Stale")).unwrap();
    repo.add_restaurant(kept, list.id).unwrap();
    repo.add_restaurant(gone, list.id).unwrap();

    conn.execute_batch("PRAGMA foreign_keys = OFF;").unwrap();
    conn.execute(
        "DELETE FROM restaurant WHERE id = ?1;",
        [gone.to_string()],
    )
    .unwrap();

    let hydrated = repo.get_by_id(list.id).unwrap().unwrap();
    assert_eq!(hydrated.restaurants.len(), 1);
    assert_eq!(hydrated.restaurants[0].id, kept);
}

#[test]
fn get_all_orders_by_latest_membership_then_creation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::new(&conn);
    let restaurant_id = seed_restaurant(&conn, "r", 1.0);

    let older_activity = repo.create(&NewList::named("older activity")).unwrap();
    let newer_activity = repo.create(&NewList::named("newer activity")).unwrap();
    let empty_old = repo.create(&NewList::named("empty old")).unwrap();
    let empty_new = repo.create(&NewList::named("empty new")).unwrap();
    conn.execute(
        "UPDATE list SET created_at = 1 WHERE id = ?1;",
        [empty_old.id.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE list SET created_at = 2 WHERE id = ?1;",
        [empty_new.id.to_string()],
    )
    .unwrap();

    repo.add_restaurant(restaurant_id, newer_activity.id).unwrap();
    repo.add_restaurant(restaurant_id, older_activity.id).unwrap();
    set_added_at(&conn, older_activity.id, 1_000);
    set_added_at(&conn, newer_activity.id, 2_000);

    let names: Vec<String> = repo
        .get_all()
        .unwrap()
        .into_iter()
        .map(|list| list.name)
        .collect();
    assert_eq!(
        names,
        ["newer activity", "older activity", "empty new", "empty old"]
    );
}

#[test]
fn get_by_name_returns_oldest_match() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::new(&conn);

    let original = repo.create(&NewList::named("Tapas")).unwrap();
    repo.create(&NewList::named("Tapas")).unwrap();
    repo.create(&NewList::named("Other")).unwrap();

    let found = repo.get_by_name("Tapas").unwrap().unwrap();
    assert_eq!(found.id, original.id);
    assert!(repo.get_by_name("tapas").unwrap().is_none());
    assert!(repo.get_by_name("Missing").unwrap().is_none());
}

#[test]
fn update_can_rename_and_clear_description() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::new(&conn);
    let list = repo
        .create(&NewList {
            name: "Draft".to_string(),
            description: Some("temporary".to_string()),
            icon: None,
        })
        .unwrap();

    let updated = repo
        .update(
            list.id,
            &ListPatch {
                name: Some("Final".to_string()),
                description: Some(None),
                icon: Some(FoodIcon::Sushi),
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Final");
    assert_eq!(updated.description, None);
    assert_eq!(updated.icon, FoodIcon::Sushi);

    let untouched = repo
        .update(
            list.id,
            &ListPatch {
                description: Some(Some("back again".to_string())),
                ..ListPatch::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(untouched.name, "Final");
    assert_eq!(untouched.description.as_deref(), Some("back again"));

    let err = repo
        .update(
            list.id,
            &ListPatch {
                name: Some(String::new()),
                ..ListPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert!(repo
        .update(
            Uuid::new_v4(),
            &ListPatch {
                name: Some("x".to_string()),
                ..ListPatch::default()
            },
        )
        .unwrap()
        .is_none());
}

#[test]
fn delete_list_keeps_restaurants() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::new(&conn);
    let restaurant_id = seed_restaurant(&conn, "survivor", 1.0);
    let list = repo.create(&NewList::named("Temp")).unwrap();
    repo.add_restaurant(restaurant_id, list.id).unwrap();

    repo.delete(list.id).unwrap();

    assert!(repo.get_by_id(list.id).unwrap().is_none());
    assert_eq!(membership_count(&conn, list.id), 0);
    assert!(SqliteRestaurantRepository::new(&conn)
        .get_by_id(restaurant_id)
        .unwrap()
        .is_some());
}
