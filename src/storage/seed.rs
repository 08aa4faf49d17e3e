use crate::models::RecipeFields;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Sample recipes every fresh backend starts with. Ids are assigned `1..=n`
/// in this order.
#[must_use]
pub fn sample_recipes() -> Vec<RecipeFields> {
    vec![
        RecipeFields {
            title: "Spaghetti Carbonara".to_string(),
            ingredients: strings(&["pasta", "eggs", "bacon", "cheese"]),
            steps: strings(&["Cook pasta", "Mix eggs", "Combine all"]),
            prep_time: "10 minutes".to_string(),
            cook_time: "15 minutes".to_string(),
            difficulty: "Medium".to_string(),
            cuisine: "Italian".to_string(),
        },
        RecipeFields {
            title: "Chicken Curry".to_string(),
            ingredients: strings(&["chicken", "curry powder", "coconut milk", "onion", "garlic"]),
            steps: strings(&[
                "Cook chicken",
                "Add onion and garlic",
                "Stir in curry powder and coconut milk",
                "Simmer",
            ]),
            prep_time: "15 minutes".to_string(),
            cook_time: "30 minutes".to_string(),
            difficulty: "Medium".to_string(),
            cuisine: "Indian".to_string(),
        },
    ]
}
