//! Restaurant repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over the `restaurant` table.
//! - Hydrate restaurants with their reviews and the derived rating.
//!
//! # Invariants
//! - `rating` is recomputed from freshly loaded reviews on every read.
//! - `get_all` hydrates restaurant by restaurant (one review query each).
//! - Deleting a restaurant relies on `ON DELETE CASCADE` for its reviews and
//!   list memberships.

use crate::geo::Coordinates;
use crate::model::restaurant::{
    restaurant_rating, NewRestaurant, Restaurant, RestaurantId, RestaurantPatch,
};
use crate::repo::review_repo::{ReviewRepository, SqliteReviewRepository};
use crate::repo::{parse_icon, parse_uuid, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use uuid::Uuid;

const RESTAURANT_COLUMNS: &str = "id, name, latitude, longitude, icon";

/// Repository interface for restaurant CRUD and hydration.
pub trait RestaurantRepository {
    fn create(&self, restaurant: &NewRestaurant) -> RepoResult<Restaurant>;
    fn get_by_id(&self, id: RestaurantId) -> RepoResult<Option<Restaurant>>;
    fn get_all(&self) -> RepoResult<Vec<Restaurant>>;
    fn update(&self, id: RestaurantId, patch: &RestaurantPatch)
        -> RepoResult<Option<Restaurant>>;
    fn delete(&self, id: RestaurantId) -> RepoResult<()>;
}

/// SQLite-backed restaurant repository.
#[derive(Clone, Copy)]
pub struct SqliteRestaurantRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRestaurantRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn hydrate(&self, raw: RawRestaurant) -> RepoResult<Restaurant> {
        let id = parse_uuid(&raw.id, "restaurant.id")?;
        let reviews = SqliteReviewRepository::new(self.conn).get_all_for_restaurant(id)?;
        Ok(Restaurant {
            id,
            name: raw.name,
            coordinates: Coordinates::new(raw.latitude, raw.longitude),
            rating: restaurant_rating(&reviews),
            reviews,
            icon: parse_icon(&raw.icon, "restaurant.icon")?,
        })
    }
}

impl RestaurantRepository for SqliteRestaurantRepository<'_> {
    fn create(&self, restaurant: &NewRestaurant) -> RepoResult<Restaurant> {
        restaurant.validate()?;

        let raw = self.conn.query_row(
            &format!(
                "INSERT INTO restaurant (id, name, latitude, longitude)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING {RESTAURANT_COLUMNS};"
            ),
            params![
                Uuid::new_v4().to_string(),
                restaurant.name.as_str(),
                restaurant.coordinates.latitude,
                restaurant.coordinates.longitude,
            ],
            RawRestaurant::from_row,
        )?;
        self.hydrate(raw)
    }

    fn get_by_id(&self, id: RestaurantId) -> RepoResult<Option<Restaurant>> {
        self.conn
            .query_row(
                &format!("SELECT {RESTAURANT_COLUMNS} FROM restaurant WHERE id = ?1;"),
                [id.to_string()],
                RawRestaurant::from_row,
            )
            .optional()?
            .map(|raw| self.hydrate(raw))
            .transpose()
    }

    fn get_all(&self) -> RepoResult<Vec<Restaurant>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM restaurant ORDER BY created_at ASC, rowid ASC;")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut restaurants = Vec::with_capacity(ids.len());
        for id_text in ids {
            let id = parse_uuid(&id_text, "restaurant.id")?;
            // A concurrent delete between the two queries just drops the row.
            if let Some(restaurant) = self.get_by_id(id)? {
                restaurants.push(restaurant);
            }
        }
        Ok(restaurants)
    }

    fn update(
        &self,
        id: RestaurantId,
        patch: &RestaurantPatch,
    ) -> RepoResult<Option<Restaurant>> {
        patch.validate()?;
        if patch.is_empty() {
            return self.get_by_id(id);
        }

        let mut assignments = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(name) = patch.name.as_ref() {
            assignments.push("name = ?");
            bind_values.push(Value::Text(name.clone()));
        }
        if let Some(icon) = patch.icon {
            assignments.push("icon = ?");
            bind_values.push(Value::Text(icon.as_str().to_string()));
        }
        bind_values.push(Value::Text(id.to_string()));

        let sql = format!(
            "UPDATE restaurant SET {} WHERE id = ?;",
            assignments.join(", ")
        );
        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Ok(None);
        }
        self.get_by_id(id)
    }

    fn delete(&self, id: RestaurantId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM restaurant WHERE id = ?1;", [id.to_string()])?;
        Ok(())
    }
}

struct RawRestaurant {
    id: String,
    name: String,
    latitude: f64,
    longitude: f64,
    icon: String,
}

impl RawRestaurant {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            latitude: row.get("latitude")?,
            longitude: row.get("longitude")?,
            icon: row.get("icon")?,
        })
    }
}
