//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define CRUD and hydration contracts for restaurants, reviews and lists.
//! - Keep SQL details out of the import service.
//!
//! # Invariants
//! - Write paths validate their input model before any SQL mutation.
//! - Reads by id return `Ok(None)` for missing rows; not-found is never an
//!   error.
//! - Read paths reject invalid persisted state (`InvalidData`) instead of
//!   masking it.

use crate::db::DbError;
use crate::model::icon::FoodIcon;
use crate::model::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod list_repo;
pub mod restaurant_repo;
pub mod review_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error shared by every repository.
#[derive(Debug)]
pub enum RepoError {
    /// Input rejected before reaching the store.
    Validation(ValidationError),
    /// Store failure (connectivity, constraint violation, ...).
    Db(DbError),
    /// A persisted row cannot be converted back into a model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn parse_icon(value: &str, column: &str) -> RepoResult<FoodIcon> {
    FoodIcon::from_emoji(value)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid icon `{value}` in {column}")))
}
