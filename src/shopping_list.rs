use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::store::RecipeStore;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ShoppingItem {
    pub name: String,
    pub quantity_g: f64,
}

/// Total quantity of each ingredient across `recipe_ids`, sorted by name.
/// Unknown recipe ids contribute nothing; a repeated id is counted each time.
pub fn generate_shopping_list(store: &RecipeStore, recipe_ids: &[i64]) -> Result<Vec<ShoppingItem>> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for &recipe_id in recipe_ids {
        for row in store.recipe_ingredients(recipe_id)? {
            *totals.entry(row.name).or_insert(0.0) += row.quantity_g;
        }
    }
    Ok(totals
        .into_iter()
        .map(|(name, quantity_g)| ShoppingItem { name, quantity_g })
        .collect())
}
