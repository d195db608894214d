//! Database schema definitions

/// Database schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Nutrition values are per 100 g of the ingredient.
pub const CREATE_INGREDIENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ingredients (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    energy REAL NOT NULL,
    protein REAL NOT NULL,
    carbohydrate REAL NOT NULL,
    fat REAL NOT NULL,
    fiber REAL NOT NULL,
    sodium REAL NOT NULL
);
"#;

pub const CREATE_RECIPES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS recipes (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    diet TEXT NOT NULL,
    instructions TEXT NOT NULL
);
"#;

pub const CREATE_RECIPE_INGREDIENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS recipe_ingredients (
    recipe_id INTEGER NOT NULL,
    ingredient_id INTEGER NOT NULL,
    quantity REAL NOT NULL,
    FOREIGN KEY (recipe_id) REFERENCES recipes (id) ON DELETE CASCADE,
    FOREIGN KEY (ingredient_id) REFERENCES ingredients (id),
    UNIQUE (recipe_id, ingredient_id)
);
"#;

pub const CREATE_METADATA_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

pub const CREATE_RECIPE_INGREDIENTS_INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_recipe ON recipe_ingredients(recipe_id);
CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_ingredient ON recipe_ingredients(ingredient_id);
"#;
