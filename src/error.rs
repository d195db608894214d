//! Error types for recipe_finder
//!
//! Every fallible store, matcher and loader operation returns [`RecipeError`].
//! SQLite constraint failures are kept apart from other database failures so the
//! CLI can show them as plain messages.

use thiserror::Error;

/// Main error type for recipe_finder operations
#[derive(Error, Debug)]
pub enum RecipeError {
    /// Database/storage errors with context
    #[error("Storage error: {0}")]
    Storage(String),

    /// A uniqueness or foreign-key constraint rejected the write
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// A recipe refers to an ingredient that is not in the store
    #[error("Unknown ingredient '{0}': add it before using it in a recipe")]
    UnknownIngredient(String),

    /// The same ingredient is listed twice in one recipe
    #[error("Ingredient '{ingredient}' is listed more than once in recipe '{recipe}'")]
    DuplicateIngredient { recipe: String, ingredient: String },

    /// Rejected input value (empty name, negative or non-finite number)
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Import file content errors
    #[error("Import error: {0}")]
    Import(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other SQLite errors
    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for recipe_finder operations
pub type Result<T> = std::result::Result<T, RecipeError>;

impl From<rusqlite::Error> for RecipeError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref failure, ref message)
                if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                RecipeError::Constraint(
                    message.clone().unwrap_or_else(|| failure.to_string()),
                )
            }
            other => RecipeError::Database(other),
        }
    }
}
