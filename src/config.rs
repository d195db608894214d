use std::path::PathBuf;

use crate::error::{RecipeError, Result};

/// Environment variable holding the database path.
pub const DB_PATH_ENV_VAR: &str = "RECIPE_DB_PATH";
pub const DEFAULT_DB_PATH: &str = "recipes.db";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
}

impl Config {
    /// Resolves the database path: explicit override first, then `RECIPE_DB_PATH`
    /// (a `.env` file is honoured if `dotenv` was loaded), then `recipes.db`.
    pub fn resolve(db_override: Option<PathBuf>) -> Result<Self> {
        let env_value = std::env::var(DB_PATH_ENV_VAR).ok();
        Self::from_sources(db_override, env_value)
    }

    fn from_sources(db_override: Option<PathBuf>, env_value: Option<String>) -> Result<Self> {
        let database_path = match (db_override, env_value) {
            (Some(path), _) => path,
            (None, Some(value)) => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(RecipeError::Config(format!(
                        "{} is set but empty",
                        DB_PATH_ENV_VAR
                    )));
                }
                PathBuf::from(value)
            }
            (None, None) => PathBuf::from(DEFAULT_DB_PATH),
        };
        Ok(Config { database_path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins_over_env() {
        let config = Config::from_sources(
            Some(PathBuf::from("cli.db")),
            Some("env.db".to_string()),
        )
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("cli.db"));
    }

    #[test]
    fn test_env_value_used_without_override() {
        let config = Config::from_sources(None, Some(" kitchen.db ".to_string())).unwrap();
        assert_eq!(config.database_path, PathBuf::from("kitchen.db"));
    }

    #[test]
    fn test_default_path() {
        let config = Config::from_sources(None, None).unwrap();
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DB_PATH));
    }

    #[test]
    fn test_empty_env_value_is_rejected() {
        let result = Config::from_sources(None, Some("   ".to_string()));
        assert!(matches!(result, Err(RecipeError::Config(_))));
    }
}
