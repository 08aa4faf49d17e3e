pub mod external;
pub use external::ExternalSearchService;

pub mod recipe;
pub use recipe::{RecipeError, RecipeService};
