//! Review repository contract and SQLite implementation.
//!
//! # Invariants
//! - Reviews of one restaurant are listed newest-first
//!   (`created_at DESC`, then insertion order descending).
//! - Ratings are validated before every insert/update.
//! - Rating aggregation is not done here; see `restaurant_repo`.

use crate::model::restaurant::RestaurantId;
use crate::model::review::{NewReview, Review, ReviewId, ReviewPatch};
use crate::repo::{parse_uuid, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use uuid::Uuid;

const REVIEW_COLUMNS: &str = "id, restaurant_id, rating, comment, created_at";

/// Repository interface for review CRUD.
pub trait ReviewRepository {
    fn create(&self, review: &NewReview) -> RepoResult<Review>;
    fn get_by_id(&self, id: ReviewId) -> RepoResult<Option<Review>>;
    fn get_all_for_restaurant(&self, restaurant_id: RestaurantId) -> RepoResult<Vec<Review>>;
    fn update(&self, id: ReviewId, patch: &ReviewPatch) -> RepoResult<Option<Review>>;
    fn delete(&self, id: ReviewId) -> RepoResult<()>;
}

/// SQLite-backed review repository.
#[derive(Clone, Copy)]
pub struct SqliteReviewRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReviewRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ReviewRepository for SqliteReviewRepository<'_> {
    fn create(&self, review: &NewReview) -> RepoResult<Review> {
        review.validate()?;

        let row = self.conn.query_row(
            &format!(
                "INSERT INTO review (id, restaurant_id, rating, comment)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING {REVIEW_COLUMNS};"
            ),
            params![
                Uuid::new_v4().to_string(),
                review.restaurant_id.to_string(),
                review.rating,
                review.comment.as_str(),
            ],
            RawReview::from_row,
        )?;
        row.into_review()
    }

    fn get_by_id(&self, id: ReviewId) -> RepoResult<Option<Review>> {
        self.conn
            .query_row(
                &format!("SELECT {REVIEW_COLUMNS} FROM review WHERE id = ?1;"),
                [id.to_string()],
                RawReview::from_row,
            )
            .optional()?
            .map(RawReview::into_review)
            .transpose()
    }

    fn get_all_for_restaurant(&self, restaurant_id: RestaurantId) -> RepoResult<Vec<Review>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {REVIEW_COLUMNS}
             FROM review
             WHERE restaurant_id = ?1
             ORDER BY created_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([restaurant_id.to_string()])?;
        let mut reviews = Vec::new();
        while let Some(row) = rows.next()? {
            reviews.push(RawReview::from_row(row)?.into_review()?);
        }
        Ok(reviews)
    }

    fn update(&self, id: ReviewId, patch: &ReviewPatch) -> RepoResult<Option<Review>> {
        patch.validate()?;
        if patch.is_empty() {
            return self.get_by_id(id);
        }

        let mut assignments = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(rating) = patch.rating {
            assignments.push("rating = ?");
            bind_values.push(Value::Real(rating));
        }
        if let Some(comment) = patch.comment.as_ref() {
            assignments.push("comment = ?");
            bind_values.push(Value::Text(comment.clone()));
        }
        bind_values.push(Value::Text(id.to_string()));

        let sql = format!("UPDATE review SET {} WHERE id = ?;", assignments.join(", "));
        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Ok(None);
        }
        self.get_by_id(id)
    }

    fn delete(&self, id: ReviewId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM review WHERE id = ?1;", [id.to_string()])?;
        Ok(())
    }
}

/// Column values read before uuid parsing, so row errors and data errors
/// stay distinguishable.
struct RawReview {
    id: String,
    restaurant_id: String,
    rating: f64,
    comment: String,
    created_at: i64,
}

impl RawReview {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            restaurant_id: row.get("restaurant_id")?,
            rating: row.get("rating")?,
            comment: row.get("comment")?,
            created_at: row.get("created_at")?,
        })
    }

    fn into_review(self) -> RepoResult<Review> {
        Ok(Review {
            id: parse_uuid(&self.id, "review.id")?,
            restaurant_id: parse_uuid(&self.restaurant_id, "review.restaurant_id")?,
            rating: self.rating,
            comment: self.comment,
            created_at: self.created_at,
        })
    }
}
