use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::Result;
use crate::store::RecipeStore;

/// Diet filter keyword that accepts every recipe.
pub const ALL_DIETS: &str = "All";

/// Diet tags offered by the CLI. Tags are free-form; these are suggestions.
pub const KNOWN_DIETS: [&str; 5] = ["All", "Vegetarian", "Vegan", "Gluten Free", "Low Carb"];

/// Instruction previews are cut to this many characters.
pub const PREVIEW_CHARS: usize = 200;

/// Normalized set of ingredient names the user has on hand.
/// Names are trimmed and lowercased; blank names are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvailableIngredients {
    names: HashSet<String>,
}

impl AvailableIngredients {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .filter_map(|name| normalize_name(name.as_ref()))
            .collect();
        AvailableIngredients { names }
    }

    /// Parses a comma-separated list such as `"chicken, rice ,tomato"`.
    pub fn parse_list(input: &str) -> Self {
        Self::new(input.split(','))
    }

    pub fn contains(&self, name: &str) -> bool {
        normalize_name(name).is_some_and(|n| self.names.contains(&n))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn normalize_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DietFilter {
    All,
    Tag(String),
}

impl DietFilter {
    /// `"All"` (any case) or a blank string accepts every recipe; anything else must
    /// equal the recipe's diet tag.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_DIETS) {
            DietFilter::All
        } else {
            DietFilter::Tag(trimmed.to_string())
        }
    }

    pub fn accepts(&self, diet_tag: &str) -> bool {
        match self {
            DietFilter::All => true,
            DietFilter::Tag(tag) => tag == diet_tag.trim(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecipeMatch {
    pub id: i64,
    pub name: String,
    pub instructions: String,
}

impl RecipeMatch {
    pub fn instructions_preview(&self) -> String {
        preview(&self.instructions, PREVIEW_CHARS)
    }
}

/// First `max_chars` characters followed by `...`, or the text unchanged if it fits.
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

/// True when every distinct required ingredient is available. A recipe without
/// ingredients never matches.
pub fn covers_recipe(required: &[String], available: &AvailableIngredients) -> bool {
    let distinct: HashSet<String> = required.iter().filter_map(|n| normalize_name(n)).collect();
    if distinct.is_empty() {
        return false;
    }
    let matched = distinct.iter().filter(|n| available.names.contains(*n)).count();
    matched == distinct.len()
}

/// Recipes whose diet passes `diet` and whose whole ingredient list is available,
/// ordered by recipe id.
pub fn find_recipes(
    store: &RecipeStore,
    available: &AvailableIngredients,
    diet: &DietFilter,
) -> Result<Vec<RecipeMatch>> {
    let candidates = store.recipes_with_ingredient_names()?;
    let total = candidates.len();

    let matches: Vec<RecipeMatch> = candidates
        .into_iter()
        .filter(|(recipe, required)| diet.accepts(&recipe.diet) && covers_recipe(required, available))
        .map(|(recipe, _)| RecipeMatch {
            id: recipe.id,
            name: recipe.name,
            instructions: recipe.instructions,
        })
        .collect();

    log::info!(
        "Matched {} of {} recipes against {} available ingredients ({:?})",
        matches.len(),
        total,
        available.len(),
        diet
    );
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loader::seed_demo_data;
    use crate::recipe_aggregator::NutritionProfile;
    use crate::store::{Ingredient, NewRecipe, RecipeIngredientInput};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn store_with(recipes: &[(&str, &str, Vec<&str>)]) -> RecipeStore {
        let mut store = RecipeStore::memory().unwrap();
        for (_, _, ingredients) in recipes {
            for name in ingredients.iter() {
                store
                    .upsert_ingredient(&Ingredient {
                        name: name.to_string(),
                        profile: NutritionProfile::default(),
                    })
                    .unwrap();
            }
        }
        for (name, diet, ingredients) in recipes {
            store
                .upsert_recipe(&NewRecipe {
                    name: name.to_string(),
                    diet: diet.to_string(),
                    instructions: String::new(),
                    ingredients: ingredients
                        .iter()
                        .map(|n| RecipeIngredientInput {
                            name: n.to_string(),
                            quantity_g: 100.0,
                        })
                        .collect(),
                })
                .unwrap();
        }
        store
    }

    #[test]
    fn test_parse_list_trims_and_lowercases() {
        let available = AvailableIngredients::parse_list(" Chicken, rice ,, OLIVE oil ");
        assert_eq!(available.len(), 3);
        assert!(available.contains("chicken"));
        assert!(available.contains("Olive Oil"));
        assert!(!available.contains(""));
    }

    #[test]
    fn test_diet_filter_parse() {
        assert_eq!(DietFilter::parse("All"), DietFilter::All);
        assert_eq!(DietFilter::parse("all"), DietFilter::All);
        assert_eq!(DietFilter::parse("  "), DietFilter::All);
        assert_eq!(
            DietFilter::parse(" Vegetarian "),
            DietFilter::Tag("Vegetarian".to_string())
        );
        assert!(DietFilter::parse("Vegan").accepts("Vegan"));
        assert!(!DietFilter::parse("Vegan").accepts("Vegetarian"));
        assert!(DietFilter::All.accepts("anything"));
    }

    #[test]
    fn test_covers_recipe_subset_rule() {
        let available = AvailableIngredients::new(["chicken", "rice", "salt"]);
        assert!(covers_recipe(&names(&["chicken", "rice"]), &available));
        assert!(!covers_recipe(&names(&["chicken", "rice", "tomato"]), &available));
        assert!(!covers_recipe(&[], &available));
    }

    #[test]
    fn test_empty_available_set_matches_nothing() {
        let available = AvailableIngredients::parse_list("");
        assert!(available.is_empty());
        assert!(!covers_recipe(&names(&["rice"]), &available));
    }

    #[test]
    fn test_partial_set_excludes_chicken_with_rice() -> Result<()> {
        let mut store = RecipeStore::memory()?;
        seed_demo_data(&mut store)?;

        let available = AvailableIngredients::new(["chicken", "rice"]);
        let matches = find_recipes(&store, &available, &DietFilter::All)?;
        assert!(matches.is_empty());

        let available = AvailableIngredients::parse_list("chicken, rice, tomato, onion, olive oil, garlic");
        let matches = find_recipes(&store, &available, &DietFilter::All)?;
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Chicken with Rice");
        Ok(())
    }

    #[test]
    fn test_find_recipes_applies_diet_and_orders_by_id() -> Result<()> {
        let store = store_with(&[
            ("Salad", "Vegetarian", vec!["lettuce", "tomato"]),
            ("Steak", "All", vec!["beef"]),
            ("Tomato Soup", "Vegetarian", vec!["tomato"]),
        ]);
        let available = AvailableIngredients::new(["tomato", "lettuce", "beef"]);

        let all: Vec<String> = find_recipes(&store, &available, &DietFilter::All)?
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(all, names(&["Salad", "Steak", "Tomato Soup"]));

        let vegetarian: Vec<String> =
            find_recipes(&store, &available, &DietFilter::parse("Vegetarian"))?
                .into_iter()
                .map(|m| m.name)
                .collect();
        assert_eq!(vegetarian, names(&["Salad", "Tomato Soup"]));
        Ok(())
    }

    #[test]
    fn test_matching_is_case_insensitive() -> Result<()> {
        let store = store_with(&[("Toast", "All", vec!["Bread", "Butter"])]);
        let available = AvailableIngredients::parse_list("bread,BUTTER");
        assert_eq!(find_recipes(&store, &available, &DietFilter::All)?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_instruction_preview() {
        let short = RecipeMatch {
            id: 1,
            name: "Short".to_string(),
            instructions: "Mix.".to_string(),
        };
        assert_eq!(short.instructions_preview(), "Mix.");

        let long_text = "é".repeat(PREVIEW_CHARS + 5);
        let preview_text = preview(&long_text, PREVIEW_CHARS);
        assert!(preview_text.ends_with("..."));
        assert_eq!(preview_text.chars().count(), PREVIEW_CHARS + 3);
    }
}
