pub mod mealdb;

pub use mealdb::{Meal, MealDbClient, MealSource};
