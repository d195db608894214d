//! Recipe storage on embedded SQLite.

pub mod database;
pub mod schema;

pub use database::RecipeStore;

use serde::{Deserialize, Serialize};

use crate::recipe_aggregator::NutritionProfile;

/// An ingredient with its nutrition profile per 100 g.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Ingredient {
    pub name: String,
    #[serde(flatten)]
    pub profile: NutritionProfile,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StoredIngredient {
    pub id: i64,
    #[serde(flatten)]
    pub ingredient: Ingredient,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub diet: String,
    pub instructions: String,
}

/// Recipe as written by callers and read from JSON import files.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NewRecipe {
    pub name: String,
    pub diet: String,
    #[serde(default)]
    pub instructions: String,
    pub ingredients: Vec<RecipeIngredientInput>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecipeIngredientInput {
    pub name: String,
    #[serde(alias = "quantity")]
    pub quantity_g: f64,
}

/// One join row of a recipe, resolved to the ingredient's name and profile.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeIngredientRow {
    pub name: String,
    pub quantity_g: f64,
    pub profile: NutritionProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub ingredient_count: usize,
    pub recipe_count: usize,
    pub recipe_ingredient_count: usize,
}
