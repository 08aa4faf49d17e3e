use crate::config::Config;
use crate::domain::RecipeSource;
use crate::state::SharedState;

pub async fn cmd_search_recipes(config: Config, query: &str) -> anyhow::Result<()> {
    println!("Searching for: {query}");

    let state = SharedState::new(config).await?;
    let results = state.recipes.search(query).await?;

    if results.is_empty() {
        println!("No recipes found matching '{query}'");
        return Ok(());
    }

    println!();
    println!("Search Results:");
    println!("{:-<60}", "");

    for recipe in results.iter().take(20) {
        let marker = match recipe.source {
            RecipeSource::Internal => "•",
            RecipeSource::Mealdb => "◦",
        };

        println!("{} {} ({})", marker, recipe.title(), recipe.fields.cuisine);
        println!("  ID: {} | Source: {}", recipe.id, recipe.source);
        if let Some(video) = &recipe.video {
            println!("  Video: {video}");
        }
        println!();
    }

    if results.len() > 20 {
        println!("... and {} more", results.len() - 20);
    }

    Ok(())
}
