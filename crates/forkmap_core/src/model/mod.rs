//! Domain model for restaurants, reviews and lists.
//!
//! # Responsibility
//! - Define the hydrated read models returned by repositories.
//! - Define the write inputs (`New*`) and partial updates (`*Patch`).
//! - Own boundary validation for lengths, ratings, coordinates and icons.
//!
//! # Invariants
//! - Every entity is identified by a stable UUID assigned at creation.
//! - `Restaurant::rating` is derived from reviews and never persisted.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod icon;
pub mod list;
pub mod restaurant;
pub mod review;

pub use crate::geo::Coordinates;

/// Maximum restaurant display name length, in characters.
pub const RESTAURANT_NAME_MAX_CHARS: usize = 255;
/// Maximum list name length, in characters.
pub const LIST_NAME_MAX_CHARS: usize = 50;
/// Maximum list description length, in characters.
pub const LIST_DESCRIPTION_MAX_CHARS: usize = 255;
/// Inclusive upper bound of a review rating.
pub const MAX_RATING: f64 = 5.0;

/// Model-level validation failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A bounded text field exceeds its limit.
    TooLong {
        field: &'static str,
        max_chars: usize,
        actual_chars: usize,
    },
    /// A required text field is blank after trim.
    Blank(&'static str),
    /// Review rating is not a finite value in `[0, 5]`.
    RatingOutOfRange(f64),
    /// Latitude or longitude is NaN or infinite.
    InvalidCoordinates { latitude: f64, longitude: f64 },
    /// Icon is not part of the fixed emoji set.
    UnknownIcon(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooLong {
                field,
                max_chars,
                actual_chars,
            } => write!(
                f,
                "{field} must be at most {max_chars} characters, got {actual_chars}"
            ),
            Self::Blank(field) => write!(f, "{field} must not be blank"),
            Self::RatingOutOfRange(value) => {
                write!(f, "rating must be between 0 and {MAX_RATING}, got {value}")
            }
            Self::InvalidCoordinates {
                latitude,
                longitude,
            } => write!(f, "invalid coordinates ({latitude}, {longitude})"),
            Self::UnknownIcon(value) => write!(f, "unknown icon `{value}`"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn check_max_chars(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ValidationError> {
    let actual_chars = value.chars().count();
    if actual_chars > max_chars {
        return Err(ValidationError::TooLong {
            field,
            max_chars,
            actual_chars,
        });
    }
    Ok(())
}

pub(crate) fn check_rating(rating: f64) -> Result<(), ValidationError> {
    if rating.is_finite() && (0.0..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(ValidationError::RatingOutOfRange(rating))
    }
}

pub(crate) fn check_list_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::Blank("list name"));
    }
    check_max_chars("list name", name, LIST_NAME_MAX_CHARS)
}
