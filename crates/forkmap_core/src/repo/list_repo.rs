//! List repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over the `list` table.
//! - Manage `belongs_in_list` membership rows.
//! - Hydrate lists with member restaurants via the restaurant repository.
//!
//! # Invariants
//! - A `(list_id, restaurant_id)` pair exists at most once; adding it again
//!   is a no-op and removing an absent pair is a no-op.
//! - Hydration silently drops memberships whose restaurant no longer exists.
//! - `get_all` orders by latest membership `added_at` descending, lists
//!   without members last.

use crate::model::icon::FoodIcon;
use crate::model::list::{List, ListId, ListPatch, NewList};
use crate::model::restaurant::RestaurantId;
use crate::repo::restaurant_repo::{RestaurantRepository, SqliteRestaurantRepository};
use crate::repo::{parse_icon, parse_uuid, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use uuid::Uuid;

const LIST_COLUMNS: &str = "id, name, description, icon, created_at";

/// Repository interface for list CRUD and membership management.
pub trait ListRepository {
    fn create(&self, list: &NewList) -> RepoResult<List>;
    fn get_by_id(&self, id: ListId) -> RepoResult<Option<List>>;
    fn get_all(&self) -> RepoResult<Vec<List>>;
    fn update(&self, id: ListId, patch: &ListPatch) -> RepoResult<Option<List>>;
    fn delete(&self, id: ListId) -> RepoResult<()>;
    fn get_by_name(&self, name: &str) -> RepoResult<Option<List>>;
    fn add_restaurant(&self, restaurant_id: RestaurantId, list_id: ListId) -> RepoResult<()>;
    fn remove_restaurant(&self, restaurant_id: RestaurantId, list_id: ListId) -> RepoResult<()>;
}

/// SQLite-backed list repository.
#[derive(Clone, Copy)]
pub struct SqliteListRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteListRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn member_ids(&self, list_id: &str) -> RepoResult<Vec<RestaurantId>> {
        let mut stmt = self.conn.prepare(
            "SELECT restaurant_id
             FROM belongs_in_list
             WHERE list_id = ?1
             ORDER BY added_at ASC, rowid ASC;",
        )?;
        let mut rows = stmt.query([list_id])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            ids.push(parse_uuid(&value, "belongs_in_list.restaurant_id")?);
        }
        Ok(ids)
    }

    fn hydrate(&self, raw: RawList) -> RepoResult<List> {
        let restaurant_repo = SqliteRestaurantRepository::new(self.conn);
        let mut restaurants = Vec::new();
        for restaurant_id in self.member_ids(&raw.id)? {
            if let Some(restaurant) = restaurant_repo.get_by_id(restaurant_id)? {
                restaurants.push(restaurant);
            }
        }

        Ok(List {
            id: parse_uuid(&raw.id, "list.id")?,
            name: raw.name,
            description: raw.description,
            created_at: raw.created_at,
            restaurants,
            icon: parse_icon(&raw.icon, "list.icon")?,
        })
    }
}

impl ListRepository for SqliteListRepository<'_> {
    fn create(&self, list: &NewList) -> RepoResult<List> {
        list.validate()?;

        let id = Uuid::new_v4().to_string();
        let raw = match list.icon {
            Some(icon) => self.conn.query_row(
                &format!(
                    "INSERT INTO list (id, name, description, icon)
                     VALUES (?1, ?2, ?3, ?4)
                     RETURNING {LIST_COLUMNS};"
                ),
                params![id, list.name, list.description, icon.as_str()],
                RawList::from_row,
            )?,
            None => self.conn.query_row(
                &format!(
                    "INSERT INTO list (id, name, description)
                     VALUES (?1, ?2, ?3)
                     RETURNING {LIST_COLUMNS};"
                ),
                params![id, list.name, list.description],
                RawList::from_row,
            )?,
        };
        self.hydrate(raw)
    }

    fn get_by_id(&self, id: ListId) -> RepoResult<Option<List>> {
        self.conn
            .query_row(
                &format!("SELECT {LIST_COLUMNS} FROM list WHERE id = ?1;"),
                [id.to_string()],
                RawList::from_row,
            )
            .optional()?
            .map(|raw| self.hydrate(raw))
            .transpose()
    }

    fn get_all(&self) -> RepoResult<Vec<List>> {
        let mut stmt = self.conn.prepare(
            "SELECT l.id
             FROM list l
             LEFT JOIN (
                 SELECT list_id, MAX(added_at) AS latest_item, MAX(rowid) AS latest_seq
                 FROM belongs_in_list
                 GROUP BY list_id
             ) i ON l.id = i.list_id
             ORDER BY i.latest_item DESC NULLS LAST,
                      i.latest_seq DESC NULLS LAST,
                      l.created_at DESC,
                      l.rowid DESC;",
        )?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut lists = Vec::with_capacity(ids.len());
        for id_text in ids {
            if let Some(list) = self.get_by_id(parse_uuid(&id_text, "list.id")?)? {
                lists.push(list);
            }
        }
        Ok(lists)
    }

    fn update(&self, id: ListId, patch: &ListPatch) -> RepoResult<Option<List>> {
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
        if let Some(description) = patch.description.as_ref() {
            assignments.push("description = ?");
            bind_values.push(match description {
                Some(text) => Value::Text(text.clone()),
                None => Value::Null,
            });
        }
        if let Some(icon) = patch.icon.map(FoodIcon::as_str) {
            assignments.push("icon = ?");
            bind_values.push(Value::Text(icon.to_string()));
        }
        bind_values.push(Value::Text(id.to_string()));

        let sql = format!("UPDATE list SET {} WHERE id = ?;", assignments.join(", "));
        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Ok(None);
        }
        self.get_by_id(id)
    }

    fn delete(&self, id: ListId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM list WHERE id = ?1;", [id.to_string()])?;
        Ok(())
    }

    fn get_by_name(&self, name: &str) -> RepoResult<Option<List>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {LIST_COLUMNS}
                     FROM list
                     WHERE name = ?1
                     ORDER BY created_at ASC, rowid ASC
                     LIMIT 1;"
                ),
                [name],
                RawList::from_row,
            )
            .optional()?
            .map(|raw| self.hydrate(raw))
            .transpose()
    }

    fn add_restaurant(&self, restaurant_id: RestaurantId, list_id: ListId) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO belongs_in_list (list_id, restaurant_id)
             VALUES (?1, ?2)
             ON CONFLICT DO NOTHING;",
            params![list_id.to_string(), restaurant_id.to_string()],
        )?;
        Ok(())
    }

    fn remove_restaurant(&self, restaurant_id: RestaurantId, list_id: ListId) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM belongs_in_list
             WHERE list_id = ?1 AND restaurant_id = ?2;",
            params![list_id.to_string(), restaurant_id.to_string()],
        )?;
        Ok(())
    }
}

struct RawList {
    id: String,
    name: String,
    description: Option<String>,
    icon: String,
    created_at: i64,
}

impl RawList {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            icon: row.get("icon")?,
            created_at: row.get("created_at")?,
        })
    }
}
