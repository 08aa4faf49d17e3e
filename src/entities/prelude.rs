pub use super::recipes::Entity as Recipes;
