//! Core domain logic for forkmap, a restaurant and list tracker.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod geo;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod takeout;

pub use config::{AppConfig, ConfigError, DatabaseConfig, ImportConfig, LoggingConfig};
pub use geo::{distance_meters, is_same_place, is_same_place_default, Coordinates};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::icon::FoodIcon;
pub use model::list::{List, ListId, ListPatch, NewList};
pub use model::restaurant::{NewRestaurant, Restaurant, RestaurantId, RestaurantPatch};
pub use model::review::{NewReview, Review, ReviewId, ReviewPatch};
pub use model::ValidationError;
pub use repo::list_repo::{ListRepository, SqliteListRepository};
pub use repo::restaurant_repo::{RestaurantRepository, SqliteRestaurantRepository};
pub use repo::review_repo::{ReviewRepository, SqliteReviewRepository};
pub use repo::{RepoError, RepoResult};
pub use service::import_service::{ImportError, ImportService, ImportSummary};
pub use takeout::parser::{parse_takeout_csv, TakeoutCandidate};
pub use takeout::resolver::{HttpPlaceResolver, PlaceCache, PlaceResolver, ResolveError};
pub use takeout::TakeoutFile;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
