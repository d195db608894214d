use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::{RecipeIngredientRow, RecipeStore};

/// Six-field nutrition profile. Stored per 100 g for ingredients; absolute once scaled.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct NutritionProfile {
    pub kcal: f64,
    pub protein_g: f64,
    pub carbohydrate_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub sodium_mg: f64,
}

macro_rules! for_each_nutrient {
    ($mac:ident) => {
        $mac!(kcal);
        $mac!(protein_g);
        $mac!(carbohydrate_g);
        $mac!(fat_g);
        $mac!(fiber_g);
        $mac!(sodium_mg);
    };
}

impl NutritionProfile {
    /// Scales a per-100 g profile to `quantity_g` grams.
    pub fn scaled(&self, quantity_g: f64) -> NutritionProfile {
        let factor = quantity_g / 100.0;
        let per_100g = self;
        let mut scaled = NutritionProfile::default();
        macro_rules! scale {
            ($field:ident) => {
                scaled.$field = per_100g.$field * factor;
            };
        }
        for_each_nutrient!(scale);
        scaled
    }

    pub fn accumulate(&mut self, other: &NutritionProfile) {
        let total = self;
        macro_rules! add_field {
            ($field:ident) => {
                total.$field += other.$field;
            };
        }
        for_each_nutrient!(add_field);
    }

    /// Field labels and values in display order.
    pub fn fields(&self) -> [(&'static str, f64); 6] {
        [
            ("Energy (kcal)", self.kcal),
            ("Protein (g)", self.protein_g),
            ("Carbohydrate (g)", self.carbohydrate_g),
            ("Fat (g)", self.fat_g),
            ("Fiber (g)", self.fiber_g),
            ("Sodium (mg)", self.sodium_mg),
        ]
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IngredientBreakdown {
    pub name: String,
    pub quantity_g: f64,
    pub nutrition: NutritionProfile,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct RecipeNutrition {
    pub totals: NutritionProfile,
    pub breakdown: Vec<IngredientBreakdown>,
}

/// Share of protein, carbohydrate and fat in their combined mass, in percent.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct MacroDistribution {
    pub protein_pct: f64,
    pub carbohydrate_pct: f64,
    pub fat_pct: f64,
}

impl RecipeNutrition {
    pub fn is_empty(&self) -> bool {
        self.breakdown.is_empty()
    }

    /// Appends another result: totals are summed, breakdowns concatenated.
    pub fn merge(&mut self, other: RecipeNutrition) {
        self.totals.accumulate(&other.totals);
        self.breakdown.extend(other.breakdown);
    }

    pub fn macro_distribution(&self) -> MacroDistribution {
        let t = &self.totals;
        let sum = t.protein_g + t.carbohydrate_g + t.fat_g;
        if sum <= 0.0 {
            return MacroDistribution::default();
        }
        MacroDistribution {
            protein_pct: t.protein_g / sum * 100.0,
            carbohydrate_pct: t.carbohydrate_g / sum * 100.0,
            fat_pct: t.fat_g / sum * 100.0,
        }
    }

    /// The `n` breakdown rows with the most energy, highest first. Ties keep their order.
    pub fn top_by_energy(&self, n: usize) -> Vec<&IngredientBreakdown> {
        let mut rows: Vec<&IngredientBreakdown> = self.breakdown.iter().collect();
        rows.sort_by(|a, b| b.nutrition.kcal.total_cmp(&a.nutrition.kcal));
        rows.truncate(n);
        rows
    }
}

/// Scales each row's per-100 g profile by its quantity and sums the results.
pub fn aggregate_nutrition(rows: &[RecipeIngredientRow]) -> RecipeNutrition {
    let mut nutrition = RecipeNutrition::default();
    for row in rows {
        let scaled = row.profile.scaled(row.quantity_g);
        nutrition.totals.accumulate(&scaled);
        nutrition.breakdown.push(IngredientBreakdown {
            name: row.name.clone(),
            quantity_g: row.quantity_g,
            nutrition: scaled,
        });
    }
    nutrition
}

/// Nutrition totals and breakdown for one recipe. An unknown id gives an empty result.
pub fn calculate_recipe_nutrition(store: &RecipeStore, recipe_id: i64) -> Result<RecipeNutrition> {
    let rows = store.recipe_ingredients(recipe_id)?;
    log::debug!("Aggregating {} ingredient rows for recipe {}", rows.len(), recipe_id);
    Ok(aggregate_nutrition(&rows))
}

pub fn calculate_consolidated_nutrition(
    store: &RecipeStore,
    recipe_ids: &[i64],
) -> Result<RecipeNutrition> {
    let mut consolidated = RecipeNutrition::default();
    for &recipe_id in recipe_ids {
        consolidated.merge(calculate_recipe_nutrition(store, recipe_id)?);
    }
    Ok(consolidated)
}
