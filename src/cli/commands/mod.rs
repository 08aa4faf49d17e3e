mod cache;
mod init;
mod list;
mod search;

pub use cache::{cmd_cache_clear, cmd_cache_stats};
pub use init::cmd_init;
pub use list::cmd_list_recipes;
pub use search::cmd_search_recipes;
