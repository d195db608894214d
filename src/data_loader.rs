use csv::ReaderBuilder;
use std::path::Path;

use crate::error::{RecipeError, Result};
use crate::recipe_aggregator::NutritionProfile;
use crate::store::{Ingredient, NewRecipe, RecipeIngredientInput, RecipeStore};

// Expected column headers
pub const NAME_COL: &str = "Name";
pub const ENERGY_COL: &str = "Energy (kcal/100g)";
pub const PROTEIN_COL: &str = "Protein (g/100g)";
pub const CARB_COL: &str = "Carbohydrate (g/100g)";
pub const FAT_COL: &str = "Fat (g/100g)";
pub const FIBER_COL: &str = "Fiber (g/100g)";
pub const SODIUM_COL: &str = "Sodium (mg/100g)";

/// Blank cells read as zero.
fn parse_value(cell: &str, column: &str, row_index: usize) -> Result<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(0.0);
    }
    cell.parse::<f64>().map_err(|_| {
        RecipeError::Import(format!(
            "Invalid value '{}' in column '{}' at row {}",
            cell,
            column,
            row_index + 1
        ))
    })
}

pub fn load_ingredients_csv(csv_path: &Path) -> Result<Vec<Ingredient>> {
    if !csv_path.exists() {
        return Err(RecipeError::Import(format!(
            "Ingredient CSV file not found at: {:?}",
            csv_path
        )));
    }

    let file = std::fs::File::open(csv_path)?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(file);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| RecipeError::Import(format!("Column '{}' not found", name)))
    };

    let name_idx = column(NAME_COL)?;
    let value_columns = [
        (ENERGY_COL, column(ENERGY_COL)?),
        (PROTEIN_COL, column(PROTEIN_COL)?),
        (CARB_COL, column(CARB_COL)?),
        (FAT_COL, column(FAT_COL)?),
        (FIBER_COL, column(FIBER_COL)?),
        (SODIUM_COL, column(SODIUM_COL)?),
    ];

    let mut ingredients = Vec::new();
    for (row_index, result) in rdr.records().enumerate() {
        let record = result?;

        let name = record.get(name_idx).unwrap_or("").trim().to_string();
        if name.is_empty() {
            log::warn!("Skipping row {} with an empty name", row_index + 1);
            continue;
        }

        let mut values = [0.0_f64; 6];
        for (slot, (col_name, idx)) in values.iter_mut().zip(value_columns.iter()) {
            *slot = parse_value(record.get(*idx).unwrap_or(""), col_name, row_index)?;
        }
        let [kcal, protein_g, carbohydrate_g, fat_g, fiber_g, sodium_mg] = values;

        ingredients.push(Ingredient {
            name,
            profile: NutritionProfile {
                kcal,
                protein_g,
                carbohydrate_g,
                fat_g,
                fiber_g,
                sodium_mg,
            },
        });
    }

    if ingredients.is_empty() {
        return Err(RecipeError::Import(format!(
            "No valid ingredient rows loaded from {:?}",
            csv_path
        )));
    }

    log::info!("Loaded {} ingredients from {:?}", ingredients.len(), csv_path);
    Ok(ingredients)
}

/// Reads a JSON array of recipes.
pub fn load_recipes_json(json_path: &Path) -> Result<Vec<NewRecipe>> {
    let content = std::fs::read_to_string(json_path)?;
    let recipes: Vec<NewRecipe> = serde_json::from_str(&content)?;
    log::info!("Loaded {} recipes from {:?}", recipes.len(), json_path);
    Ok(recipes)
}

pub fn demo_ingredients() -> Vec<Ingredient> {
    let rows: [(&str, [f64; 6]); 6] = [
        ("chicken", [165.0, 31.0, 0.0, 3.6, 0.0, 74.0]),
        ("rice", [130.0, 2.7, 28.0, 0.3, 0.4, 1.0]),
        ("tomato", [18.0, 0.9, 3.9, 0.2, 1.2, 5.0]),
        ("olive oil", [884.0, 0.0, 0.0, 100.0, 0.0, 0.0]),
        ("onion", [40.0, 1.1, 9.3, 0.1, 1.7, 4.0]),
        ("garlic", [149.0, 6.4, 33.1, 0.5, 2.1, 17.0]),
    ];
    rows.iter()
        .map(|(name, [kcal, protein_g, carbohydrate_g, fat_g, fiber_g, sodium_mg])| Ingredient {
            name: name.to_string(),
            profile: NutritionProfile {
                kcal: *kcal,
                protein_g: *protein_g,
                carbohydrate_g: *carbohydrate_g,
                fat_g: *fat_g,
                fiber_g: *fiber_g,
                sodium_mg: *sodium_mg,
            },
        })
        .collect()
}

pub fn demo_recipes() -> Vec<NewRecipe> {
    let ingredients = [
        ("chicken", 200.0),
        ("rice", 150.0),
        ("tomato", 50.0),
        ("onion", 30.0),
        ("olive oil", 10.0),
    ];
    vec![NewRecipe {
        name: "Chicken with Rice".to_string(),
        diet: "All".to_string(),
        instructions: "1. Cut the chicken\n2. Cook the rice\n3. Add tomato and onion\n4. Mix and serve"
            .to_string(),
        ingredients: ingredients
            .iter()
            .map(|(name, quantity_g)| RecipeIngredientInput {
                name: name.to_string(),
                quantity_g: *quantity_g,
            })
            .collect(),
    }]
}

/// Loads the demo ingredients and recipe. Safe to run repeatedly.
pub fn seed_demo_data(store: &mut RecipeStore) -> Result<()> {
    store.upsert_ingredients(&demo_ingredients())?;
    store.upsert_recipes(&demo_recipes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn header() -> String {
        [NAME_COL, ENERGY_COL, PROTEIN_COL, CARB_COL, FAT_COL, FIBER_COL, SODIUM_COL].join(",")
    }

    fn create_test_csv_file() -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{}", header())?;
        writeln!(file, "apple,52,0.3,13.8,0.2,2.4,1")?;
        writeln!(file, "banana,,1.1,22.8,0.3,2.6,1")?; // Missing energy
        writeln!(file, ",10,10,10,10,10,10")?; // Empty name
        writeln!(file, "  carrot ,41,0.9,9.6,0.2,2.8,69")?;
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn test_load_ingredients_csv_success() -> Result<()> {
        let file = create_test_csv_file()?;
        let data = load_ingredients_csv(file.path())?;

        assert_eq!(data.len(), 3); // empty name row skipped

        let apple = data.iter().find(|i| i.name == "apple").unwrap();
        assert_eq!(apple.profile.kcal, 52.0);
        assert_eq!(apple.profile.fiber_g, 2.4);

        let banana = data.iter().find(|i| i.name == "banana").unwrap();
        assert_eq!(banana.profile.kcal, 0.0);
        assert_eq!(banana.profile.carbohydrate_g, 22.8);

        assert!(data.iter().any(|i| i.name == "carrot"));
        Ok(())
    }

    #[test]
    fn test_load_ingredients_csv_missing_column() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{},{},{}", NAME_COL, PROTEIN_COL, FAT_COL)?;
        writeln!(file, "apple,0.3,0.2")?;
        file.flush()?;

        let result = load_ingredients_csv(file.path());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains(&format!("Column '{}' not found", ENERGY_COL)));
        Ok(())
    }

    #[test]
    fn test_load_ingredients_csv_invalid_number() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{}", header())?;
        writeln!(file, "apple,lots,0.3,13.8,0.2,2.4,1")?;
        file.flush()?;

        let message = load_ingredients_csv(file.path()).unwrap_err().to_string();
        assert!(message.contains("Invalid value 'lots'"));
        assert!(message.contains(ENERGY_COL));
        Ok(())
    }

    #[test]
    fn test_load_ingredients_csv_headers_only() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{}", header())?;
        file.flush()?;

        let result = load_ingredients_csv(file.path());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("No valid ingredient rows"));
        Ok(())
    }

    #[test]
    fn test_load_ingredients_csv_file_not_found() {
        let result = load_ingredients_csv(Path::new("this_file_does_not_exist.csv"));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Ingredient CSV file not found"));
    }

    #[test]
    fn test_load_recipes_json() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(
            file,
            r#"[{{"name": "Toast", "diet": "Vegetarian", "ingredients": [{{"name": "bread", "quantity": 60}}]}}]"#
        )?;
        file.flush()?;

        let recipes = load_recipes_json(file.path())?;
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].instructions, "");
        assert_eq!(recipes[0].ingredients[0].quantity_g, 60.0);
        Ok(())
    }

    #[test]
    fn test_seed_demo_data_is_idempotent() -> Result<()> {
        let mut store = RecipeStore::memory()?;
        seed_demo_data(&mut store)?;
        seed_demo_data(&mut store)?;

        let stats = store.stats()?;
        assert_eq!(stats.ingredient_count, 6);
        assert_eq!(stats.recipe_count, 1);
        assert_eq!(stats.recipe_ingredient_count, 5);
        Ok(())
    }
}
