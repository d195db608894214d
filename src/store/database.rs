//! SQLite operations for the recipe store
//!
//! One connection, three tables. Recipe writes go through a single transaction
//! so a recipe and its ingredient rows land together or not at all.

use std::collections::HashSet;
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::schema::*;
use super::{Ingredient, NewRecipe, Recipe, RecipeIngredientRow, StoreStats, StoredIngredient};
use crate::error::{RecipeError, Result};
use crate::recipe_aggregator::NutritionProfile;

pub struct RecipeStore {
    conn: Connection,
}

impl RecipeStore {
    /// Opens (creating if needed) a database file and ensures the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            RecipeError::Storage(format!("Failed to open database at {:?}: {}", path, e))
        })?;

        let store = Self { conn };
        store.initialize()?;
        log::info!("Opened recipe store at {:?}", path);
        Ok(store)
    }

    /// Create an in-memory database (for testing)
    pub fn memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            RecipeError::Storage(format!("Failed to create in-memory database: {}", e))
        })?;

        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<()> {
        self.conn
            .execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| RecipeError::Storage(format!("Failed to enable foreign keys: {}", e)))?;

        for (label, sql) in [
            ("ingredients table", CREATE_INGREDIENTS_TABLE),
            ("recipes table", CREATE_RECIPES_TABLE),
            ("recipe_ingredients table", CREATE_RECIPE_INGREDIENTS_TABLE),
            ("metadata table", CREATE_METADATA_TABLE),
            ("indexes", CREATE_RECIPE_INGREDIENTS_INDEXES),
        ] {
            self.conn
                .execute_batch(sql)
                .map_err(|e| RecipeError::Storage(format!("Failed to create {}: {}", label, e)))?;
        }

        self.conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?1)",
            params![SCHEMA_VERSION.to_string()],
        )?;

        log::debug!("Recipe store schema version {}", SCHEMA_VERSION);
        Ok(())
    }

    /// Inserts an ingredient, or updates the profile of the same-named one in place.
    /// Returns the ingredient id, which stays stable across updates.
    pub fn upsert_ingredient(&self, ingredient: &Ingredient) -> Result<i64> {
        let id = Writer { conn: &self.conn }.upsert_ingredient(ingredient)?;
        log::debug!("Upserted ingredient '{}' (id {})", ingredient.name.trim(), id);
        Ok(id)
    }

    /// Upserts many ingredients in one transaction.
    pub fn upsert_ingredients(&mut self, ingredients: &[Ingredient]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let scoped = Writer { conn: &tx };
            for ingredient in ingredients {
                scoped.upsert_ingredient(ingredient)?;
            }
        }
        tx.commit()?;
        log::info!("Upserted {} ingredients", ingredients.len());
        Ok(ingredients.len())
    }

    pub fn get_ingredient(&self, name: &str) -> Result<Option<StoredIngredient>> {
        let ingredient = self
            .conn
            .query_row(
                "SELECT id, name, energy, protein, carbohydrate, fat, fiber, sodium \
                 FROM ingredients WHERE name = ?1",
                params![name.trim()],
                row_to_stored_ingredient,
            )
            .optional()?;
        Ok(ingredient)
    }

    pub fn list_ingredients(&self) -> Result<Vec<StoredIngredient>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, energy, protein, carbohydrate, fat, fiber, sodium \
             FROM ingredients ORDER BY name",
        )?;
        let rows = stmt.query_map([], row_to_stored_ingredient)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Inserts a recipe, or replaces diet, instructions and ingredient list of the
    /// same-named recipe. Every listed ingredient must already exist.
    pub fn upsert_recipe(&mut self, recipe: &NewRecipe) -> Result<i64> {
        let tx = self.conn.transaction()?;
        let id = Writer { conn: &tx }.upsert_recipe(recipe)?;
        tx.commit()?;
        log::info!(
            "Upserted recipe '{}' (id {}) with {} ingredients",
            recipe.name.trim(),
            id,
            recipe.ingredients.len()
        );
        Ok(id)
    }

    /// Upserts many recipes; the whole batch is rolled back on the first failure.
    pub fn upsert_recipes(&mut self, recipes: &[NewRecipe]) -> Result<Vec<i64>> {
        let tx = self.conn.transaction()?;
        let mut ids = Vec::with_capacity(recipes.len());
        {
            let scoped = Writer { conn: &tx };
            for recipe in recipes {
                ids.push(scoped.upsert_recipe(recipe)?);
            }
        }
        tx.commit()?;
        log::info!("Upserted {} recipes", ids.len());
        Ok(ids)
    }

    pub fn get_recipe(&self, recipe_id: i64) -> Result<Option<Recipe>> {
        let recipe = self
            .conn
            .query_row(
                "SELECT id, name, diet, instructions FROM recipes WHERE id = ?1",
                params![recipe_id],
                row_to_recipe,
            )
            .optional()?;
        Ok(recipe)
    }

    pub fn get_recipe_by_name(&self, name: &str) -> Result<Option<Recipe>> {
        let recipe = self
            .conn
            .query_row(
                "SELECT id, name, diet, instructions FROM recipes WHERE name = ?1",
                params![name.trim()],
                row_to_recipe,
            )
            .optional()?;
        Ok(recipe)
    }

    pub fn list_recipes(&self) -> Result<Vec<Recipe>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, diet, instructions FROM recipes ORDER BY id")?;
        let rows = stmt.query_map([], row_to_recipe)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Ingredient rows of one recipe with their per-100 g profiles, in the order the
    /// recipe listed them. Empty for an unknown recipe id.
    pub fn recipe_ingredients(&self, recipe_id: i64) -> Result<Vec<RecipeIngredientRow>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT i.name, ri.quantity,
                   i.energy, i.protein, i.carbohydrate, i.fat, i.fiber, i.sodium
            FROM recipe_ingredients ri
            JOIN ingredients i ON ri.ingredient_id = i.id
            WHERE ri.recipe_id = ?1
            ORDER BY ri.rowid
            "#,
        )?;
        let rows = stmt.query_map(params![recipe_id], |row| {
            Ok(RecipeIngredientRow {
                name: row.get(0)?,
                quantity_g: row.get(1)?,
                profile: profile_from_row(row, 2)?,
            })
        })?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Every recipe with the names of the ingredients it uses, ordered by recipe id.
    pub fn recipes_with_ingredient_names(&self) -> Result<Vec<(Recipe, Vec<String>)>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT r.id, r.name, r.diet, r.instructions, i.name
            FROM recipes r
            LEFT JOIN recipe_ingredients ri ON ri.recipe_id = r.id
            LEFT JOIN ingredients i ON ri.ingredient_id = i.id
            ORDER BY r.id, ri.rowid
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row_to_recipe(row)?, row.get::<_, Option<String>>(4)?))
        })?;

        let mut result: Vec<(Recipe, Vec<String>)> = Vec::new();
        for row in rows {
            let (recipe, ingredient_name) = row?;
            if let Some((last, names)) = result.last_mut() {
                if last.id == recipe.id {
                    names.extend(ingredient_name);
                    continue;
                }
            }
            result.push((recipe, ingredient_name.into_iter().collect()));
        }
        Ok(result)
    }

    /// Distinct diet tags in use, sorted.
    pub fn diet_tags(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT diet FROM recipes ORDER BY diet")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    pub fn stats(&self) -> Result<StoreStats> {
        let count = |table: &str| -> Result<usize> {
            let n: i64 = self.conn.query_row(
                &format!("SELECT COUNT(*) FROM {}", table),
                [],
                |row| row.get(0),
            )?;
            Ok(n as usize)
        };
        Ok(StoreStats {
            ingredient_count: count("ingredients")?,
            recipe_count: count("recipes")?,
            recipe_ingredient_count: count("recipe_ingredients")?,
        })
    }
}

/// Write statements shared by the single and batch entry points. `conn` is either the
/// store connection or an open transaction.
struct Writer<'a> {
    conn: &'a Connection,
}

impl Writer<'_> {
    fn upsert_ingredient(&self, ingredient: &Ingredient) -> Result<i64> {
        let name = validate_name("Ingredient name", &ingredient.name)?;
        validate_profile(name, &ingredient.profile)?;
        let p = &ingredient.profile;
        self.conn.execute(
            r#"
            INSERT INTO ingredients (name, energy, protein, carbohydrate, fat, fiber, sodium)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(name) DO UPDATE SET
                energy = excluded.energy,
                protein = excluded.protein,
                carbohydrate = excluded.carbohydrate,
                fat = excluded.fat,
                fiber = excluded.fiber,
                sodium = excluded.sodium
            "#,
            params![name, p.kcal, p.protein_g, p.carbohydrate_g, p.fat_g, p.fiber_g, p.sodium_mg],
        )?;
        let id = self.conn.query_row(
            "SELECT id FROM ingredients WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    fn upsert_recipe(&self, recipe: &NewRecipe) -> Result<i64> {
        let name = validate_name("Recipe name", &recipe.name)?;
        let diet = validate_name("Diet tag", &recipe.diet)?;

        let mut seen = HashSet::new();
        for item in &recipe.ingredients {
            let ingredient = validate_name("Ingredient name", &item.name)?;
            if !seen.insert(ingredient) {
                return Err(RecipeError::DuplicateIngredient {
                    recipe: name.to_string(),
                    ingredient: ingredient.to_string(),
                });
            }
            validate_amount(&format!("Quantity of '{}' in '{}'", ingredient, name), item.quantity_g)?;
        }

        self.conn.execute(
            r#"
            INSERT INTO recipes (name, diet, instructions) VALUES (?1, ?2, ?3)
            ON CONFLICT(name) DO UPDATE SET
                diet = excluded.diet,
                instructions = excluded.instructions
            "#,
            params![name, diet, recipe.instructions],
        )?;
        let recipe_id: i64 = self.conn.query_row(
            "SELECT id FROM recipes WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;

        self.conn.execute(
            "DELETE FROM recipe_ingredients WHERE recipe_id = ?1",
            params![recipe_id],
        )?;

        let mut lookup = self.conn.prepare("SELECT id FROM ingredients WHERE name = ?1")?;
        let mut insert = self.conn.prepare(
            "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, quantity) VALUES (?1, ?2, ?3)",
        )?;
        for item in &recipe.ingredients {
            let ingredient = item.name.trim();
            let ingredient_id: i64 = lookup
                .query_row(params![ingredient], |row| row.get(0))
                .optional()?
                .ok_or_else(|| RecipeError::UnknownIngredient(ingredient.to_string()))?;
            insert.execute(params![recipe_id, ingredient_id, item.quantity_g])?;
        }

        Ok(recipe_id)
    }
}

fn validate_name<'a>(what: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RecipeError::InvalidValue(format!("{} must not be empty", what)));
    }
    Ok(trimmed)
}

fn validate_amount(what: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(RecipeError::InvalidValue(format!(
            "{} must be a non-negative number, got {}",
            what, value
        )));
    }
    Ok(())
}

fn validate_profile(name: &str, profile: &NutritionProfile) -> Result<()> {
    for (label, value) in profile.fields() {
        validate_amount(&format!("{} of '{}'", label, name), value)?;
    }
    Ok(())
}

fn profile_from_row(row: &Row, offset: usize) -> rusqlite::Result<NutritionProfile> {
    Ok(NutritionProfile {
        kcal: row.get(offset)?,
        protein_g: row.get(offset + 1)?,
        carbohydrate_g: row.get(offset + 2)?,
        fat_g: row.get(offset + 3)?,
        fiber_g: row.get(offset + 4)?,
        sodium_mg: row.get(offset + 5)?,
    })
}

fn row_to_stored_ingredient(row: &Row) -> rusqlite::Result<StoredIngredient> {
    Ok(StoredIngredient {
        id: row.get(0)?,
        ingredient: Ingredient {
            name: row.get(1)?,
            profile: profile_from_row(row, 2)?,
        },
    })
}

fn row_to_recipe(row: &Row) -> rusqlite::Result<Recipe> {
    Ok(Recipe {
        id: row.get(0)?,
        name: row.get(1)?,
        diet: row.get(2)?,
        instructions: row.get(3)?,
    })
}
