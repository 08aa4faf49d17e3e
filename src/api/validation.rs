use axum::{Json, extract::rejection::JsonRejection};

use super::ApiError;
use crate::domain::RecipeId;

/// Any path segment that is not a recipe id cannot name a record.
pub fn parse_recipe_id(raw: &str) -> Result<RecipeId, ApiError> {
    raw.parse().map_err(|_| ApiError::recipe_not_found())
}

/// Unwraps a JSON body, reporting every rejection as a 400.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::validation(rejection.body_text()))
}

/// Missing and blank queries both search for nothing. Anything else is
/// passed through untouched.
#[must_use]
pub fn normalize_search_query(query: Option<&str>) -> &str {
    query.filter(|q| !q.trim().is_empty()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recipe_id() {
        assert_eq!(parse_recipe_id("12").unwrap(), RecipeId::Internal(12));
        assert!(parse_recipe_id("mealdb_52772").unwrap().is_external());
        assert!(matches!(
            parse_recipe_id("abc"),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn test_normalize_search_query() {
        assert_eq!(normalize_search_query(None), "");
        assert_eq!(normalize_search_query(Some("   ")), "");
        assert_eq!(normalize_search_query(Some("curry ")), "curry ");
        assert_eq!(normalize_search_query(Some("Curry")), "Curry");
    }
}
