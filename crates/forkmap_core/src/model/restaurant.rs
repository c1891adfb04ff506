//! Restaurant domain model.
//!
//! # Invariants
//! - `rating` is the mean of `reviews[*].rating`, or `0` without reviews.
//! - `reviews` are ordered newest-first.

use crate::geo::Coordinates;
use crate::model::icon::FoodIcon;
use crate::model::review::Review;
use crate::model::{check_max_chars, ValidationError, RESTAURANT_NAME_MAX_CHARS};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type RestaurantId = Uuid;

/// Restaurant hydrated with its reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub coordinates: Coordinates,
    /// Derived on every read; never persisted.
    pub rating: f64,
    pub reviews: Vec<Review>,
    pub icon: FoodIcon,
}

/// Input for creating a restaurant. The icon is defaulted by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRestaurant {
    pub name: String,
    pub coordinates: Coordinates,
}

impl NewRestaurant {
    pub fn new(name: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            name: name.into(),
            coordinates,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_max_chars("restaurant name", &self.name, RESTAURANT_NAME_MAX_CHARS)?;
        self.coordinates.validate()
    }
}

/// Partial update for a restaurant. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestaurantPatch {
    pub name: Option<String>,
    pub icon: Option<FoodIcon>,
}

impl RestaurantPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.icon.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.name.as_deref() {
            Some(name) => check_max_chars("restaurant name", name, RESTAURANT_NAME_MAX_CHARS),
            None => Ok(()),
        }
    }
}

/// Arithmetic mean of review ratings; `0.0` for no reviews.
pub fn restaurant_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let total: f64 = reviews.iter().map(|review| review.rating).sum();
    total / reviews.len() as f64
}

#[cfg(test)]
mod tests {
    use super::{restaurant_rating, NewRestaurant, RestaurantPatch};
    use crate::geo::Coordinates;
    use crate::model::review::Review;
    use crate::model::ValidationError;
    use uuid::Uuid;

    fn review(rating: f64) -> Review {
        Review {
            id: Uuid::new_v4(),
            restaurant_id: Uuid::new_v4(),
            rating,
            comment: String::new(),
            created_at: 0,
        }
    }

    #[test]
    fn rating_is_mean_of_reviews() {
        let reviews = vec![review(2.0), review(4.0), review(5.0)];
        let rating = restaurant_rating(&reviews);
        assert!((rating - 11.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn rating_without_reviews_is_zero() {
        assert_eq!(restaurant_rating(&[]), 0.0);
    }

    #[test]
    fn new_restaurant_rejects_long_name_and_non_finite_coordinates() {
        let long = "x".repeat(256);
        let err = NewRestaurant::new(long, Coordinates::new(1.0, 1.0))
            .validate()
            .unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { actual_chars: 256, .. }));

        let err = NewRestaurant::new("ok", Coordinates::new(f64::NAN, 1.0))
            .validate()
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidCoordinates { .. }));
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(RestaurantPatch::default().is_empty());
        let patch = RestaurantPatch {
            name: Some("Renamed".to_string()),
            icon: None,
        };
        assert!(!patch.is_empty());
    }
}
