//! Review domain model.

use crate::model::restaurant::RestaurantId;
use crate::model::{check_rating, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ReviewId = Uuid;

/// One review owned by a restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub restaurant_id: RestaurantId,
    /// In `[0, 5]`.
    pub rating: f64,
    pub comment: String,
    /// Creation time in epoch milliseconds, assigned by the store.
    pub created_at: i64,
}

/// Input for creating a review.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub restaurant_id: RestaurantId,
    pub rating: f64,
    pub comment: String,
}

impl NewReview {
    pub fn new(restaurant_id: RestaurantId, rating: f64, comment: impl Into<String>) -> Self {
        Self {
            restaurant_id,
            rating,
            comment: comment.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_rating(self.rating)
    }
}

/// Partial update for a review.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewPatch {
    pub rating: Option<f64>,
    pub comment: Option<String>,
}

impl ReviewPatch {
    pub fn is_empty(&self) -> bool {
        self.rating.is_none() && self.comment.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.rating.map_or(Ok(()), check_rating)
    }
}
