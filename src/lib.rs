pub mod cli;
pub mod config;
pub mod data_loader;
pub mod error;
pub mod recipe_aggregator;
pub mod recipe_matcher;
pub mod report;
pub mod shopping_list;
pub mod store;

pub use error::{RecipeError, Result};
pub use store::RecipeStore;
