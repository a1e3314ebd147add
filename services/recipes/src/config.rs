use serde::Deserialize;

use foodgram_core::config::Config;

/// Recipes service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct RecipesConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3113). Env var: `RECIPES_PORT`.
    #[serde(default = "default_recipes_port")]
    pub recipes_port: u16,
}

fn default_recipes_port() -> u16 {
    3113
}

impl Config for RecipesConfig {}
