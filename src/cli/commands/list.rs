//! List recipes command handler

use crate::config::Config;
use crate::storage::build_store;

pub async fn cmd_list_recipes(config: &Config) -> anyhow::Result<()> {
    let store = build_store(&config.storage).await?;
    let recipes = store.get_all().await?;

    if recipes.is_empty() {
        println!("No recipes stored.");
        return Ok(());
    }

    println!("Recipes ({} total)", recipes.len());
    println!("{:-<70}", "");

    for recipe in recipes {
        let fields = &recipe.fields;
        println!("{} [{}] {}", recipe.id, fields.cuisine, fields.title);
        println!(
            "  Prep: {} | Cook: {} | Difficulty: {} | {} ingredients, {} steps",
            fields.prep_time,
            fields.cook_time,
            fields.difficulty,
            fields.ingredients.len(),
            fields.steps.len()
        );
    }

    Ok(())
}
