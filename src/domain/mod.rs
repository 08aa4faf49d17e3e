//! Domain primitives for the recipe catalog.
//!
//! Internal recipes are keyed by integers assigned by the storage backend,
//! external recipes by a prefixed string derived from the upstream identifier.
//! The two spaces never overlap, which [`RecipeId`] encodes in the type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix that marks an identifier as belonging to an upstream `TheMealDB` item.
pub const EXTERNAL_ID_PREFIX: &str = "mealdb_";

/// Identifier of a recipe in either identifier space.
///
/// Serializes untagged, so internal ids appear as JSON numbers and external
/// ids as strings.
///
/// # Examples
///
/// ```rust
/// use recipebox::domain::RecipeId;
///
/// let id: RecipeId = "42".parse().unwrap();
/// assert_eq!(id, RecipeId::Internal(42));
///
/// let ext = RecipeId::external("52772");
/// assert_eq!(ext.to_string(), "mealdb_52772");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipeId {
    Internal(i32),
    External(String),
}

impl RecipeId {
    /// Builds the external identifier for an upstream item id.
    #[must_use]
    pub fn external(upstream_id: &str) -> Self {
        Self::External(format!("{EXTERNAL_ID_PREFIX}{upstream_id}"))
    }

    /// Returns the integer id when this is an internal record.
    #[must_use]
    pub const fn as_internal(&self) -> Option<i32> {
        match self {
            Self::Internal(id) => Some(*id),
            Self::External(_) => None,
        }
    }

    #[must_use]
    pub const fn is_external(&self) -> bool {
        matches!(self, Self::External(_))
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal(id) => write!(f, "{id}"),
            Self::External(id) => f.write_str(id),
        }
    }
}

impl From<i32> for RecipeId {
    fn from(id: i32) -> Self {
        Self::Internal(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid recipe id: {0}")]
pub struct InvalidRecipeId(pub String);

impl FromStr for RecipeId {
    type Err = InvalidRecipeId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(id) = s.parse::<i32>() {
            return Ok(Self::Internal(id));
        }

        match s.strip_prefix(EXTERNAL_ID_PREFIX) {
            Some(rest) if !rest.is_empty() => Ok(Self::External(s.to_string())),
            _ => Err(InvalidRecipeId(s.to_string())),
        }
    }
}

/// Where a recipe came from. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeSource {
    #[default]
    Internal,
    Mealdb,
}

impl RecipeSource {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::Mealdb => "mealdb",
        }
    }
}

impl fmt::Display for RecipeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_internal_ids() {
        assert_eq!("7".parse::<RecipeId>(), Ok(RecipeId::Internal(7)));
        assert_eq!("-3".parse::<RecipeId>(), Ok(RecipeId::Internal(-3)));
    }

    #[test]
    fn parses_external_ids() {
        let id: RecipeId = "mealdb_52772".parse().unwrap();
        assert!(id.is_external());
        assert_eq!(id.as_internal(), None);
        assert_eq!(id, RecipeId::external("52772"));
    }

    #[test]
    fn rejects_unknown_shapes() {
        assert!("abc".parse::<RecipeId>().is_err());
        assert!("mealdb_".parse::<RecipeId>().is_err());
        assert!("".parse::<RecipeId>().is_err());
    }

    #[test]
    fn external_id_is_deterministic() {
        assert_eq!(RecipeId::external("1"), RecipeId::external("1"));
        assert_ne!(RecipeId::external("1"), RecipeId::Internal(1));
    }

    #[test]
    fn serializes_untagged() {
        assert_eq!(serde_json::to_string(&RecipeId::Internal(3)).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&RecipeId::external("9")).unwrap(),
            "\"mealdb_9\""
        );

        let back: RecipeId = serde_json::from_str("\"mealdb_9\"").unwrap();
        assert_eq!(back, RecipeId::external("9"));
        let back: RecipeId = serde_json::from_str("12").unwrap();
        assert_eq!(back, RecipeId::Internal(12));
    }

    #[test]
    fn source_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RecipeSource::Mealdb).unwrap(),
            "\"mealdb\""
        );
        assert_eq!(RecipeSource::Internal.to_string(), "internal");
    }
}
