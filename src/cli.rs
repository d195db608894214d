use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::recipe_matcher::ALL_DIETS;

#[derive(Parser, Debug)]
#[command(name = "recipe-finder")]
#[command(author, version, about = "Find recipes you can cook with what you have, and see their nutrition", long_about = None)]
pub struct Cli {
    /// SQLite database file (overrides RECIPE_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Create the database schema
    Init,

    /// Load the demo ingredients and the "Chicken with Rice" recipe
    Seed,

    /// Add or update one ingredient (values per 100 g)
    AddIngredient {
        name: String,
        #[arg(long, default_value_t = 0.0)]
        kcal: f64,
        #[arg(long, default_value_t = 0.0)]
        protein: f64,
        #[arg(long, default_value_t = 0.0)]
        carbohydrate: f64,
        #[arg(long, default_value_t = 0.0)]
        fat: f64,
        #[arg(long, default_value_t = 0.0)]
        fiber: f64,
        /// Sodium in mg per 100 g
        #[arg(long, default_value_t = 0.0)]
        sodium: f64,
    },

    /// Import ingredient profiles from a CSV file
    ImportIngredients { csv: PathBuf },

    /// Import recipes from a JSON file
    ImportRecipes { json: PathBuf },

    /// Find recipes whose ingredients are all available
    Find {
        /// Comma-separated ingredient names, e.g. "chicken, rice, tomato"
        #[arg(short, long)]
        ingredients: String,

        /// Diet tag to filter by
        #[arg(short, long, default_value = ALL_DIETS)]
        diet: String,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a recipe with its full instructions
    Show { recipe_id: i64 },

    /// Nutrition analysis of one recipe
    Nutrition {
        recipe_id: i64,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Consolidated nutrition analysis of several recipes
    Analyze {
        #[arg(required = true)]
        recipe_ids: Vec<i64>,

        /// Number of ingredients in the energy ranking
        #[arg(long, default_value_t = 10)]
        top: usize,
    },

    /// Summed ingredient quantities for several recipes
    ShoppingList {
        #[arg(required = true)]
        recipe_ids: Vec<i64>,
    },

    /// List stored recipes
    Recipes,

    /// List stored ingredients with their profiles per 100 g
    Ingredients,

    /// List diet tags in use and suggested ones
    Diets,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
