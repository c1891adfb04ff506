//! List domain model.
//!
//! # Invariants
//! - `name` is non-blank and at most `LIST_NAME_MAX_CHARS` characters.
//! - `restaurants` only contains members whose restaurant still exists.

use crate::model::icon::FoodIcon;
use crate::model::restaurant::Restaurant;
use crate::model::{
    check_list_name, check_max_chars, ValidationError, LIST_DESCRIPTION_MAX_CHARS,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ListId = Uuid;

/// List hydrated with its member restaurants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    pub name: String,
    pub description: Option<String>,
    /// Creation time in epoch milliseconds, assigned by the store.
    pub created_at: i64,
    pub restaurants: Vec<Restaurant>,
    pub icon: FoodIcon,
}

/// Input for creating a list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewList {
    pub name: String,
    pub description: Option<String>,
    /// `None` lets the store pick its default icon.
    pub icon: Option<FoodIcon>,
}

impl NewList {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_list_name(&self.name)?;
        check_description(self.description.as_deref())
    }
}

/// Partial update for a list.
///
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub icon: Option<FoodIcon>,
}

impl ListPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.icon.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = self.name.as_deref() {
            check_list_name(name)?;
        }
        match &self.description {
            Some(description) => check_description(description.as_deref()),
            None => Ok(()),
        }
    }
}

fn check_description(description: Option<&str>) -> Result<(), ValidationError> {
    match description {
        Some(text) => check_max_chars("list description", text, LIST_DESCRIPTION_MAX_CHARS),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{ListPatch, NewList};
    use crate::model::ValidationError;

    #[test]
    fn blank_list_name_is_rejected() {
        let err = NewList::named("   ").validate().unwrap_err();
        assert_eq!(err, ValidationError::Blank("list name"));
    }

    #[test]
    fn list_name_is_bounded_in_characters_not_bytes() {
        assert!(NewList::named("🍕".repeat(50)).validate().is_ok());
        assert!(NewList::named("a".repeat(51)).validate().is_err());
    }

    #[test]
    fn patch_clearing_description_is_valid() {
        let patch = ListPatch {
            description: Some(None),
            ..ListPatch::default()
        };
        assert!(!patch.is_empty());
        assert!(patch.validate().is_ok());
    }
}
