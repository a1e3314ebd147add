//! Load catalog data into the recipes database.
//!
//! # Usage
//!
//! ```bash
//! DATABASE_URL=postgres://... cargo run -p foodgram-recipes --bin seed -- ingredients --file data/ingredients.json
//! DATABASE_URL=postgres://... cargo run -p foodgram-recipes --bin seed -- tags --file data/tags.json
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sea_orm::Database;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use foodgram_core::config::Config;
use foodgram_core::tracing::init_tracing;

use foodgram_recipes::config::RecipesConfig;
use foodgram_recipes::error::RecipesServiceError;
use foodgram_recipes::infra::db::DbCatalogRepository;
use foodgram_recipes::usecase::catalog::{
    CreateTagInput, CreateTagUseCase, UpsertIngredientInput, UpsertIngredientUseCase,
};

#[derive(Parser)]
#[command(about = "Seed the recipes catalog from JSON files")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upsert `[{"name", "measurement_unit"}]` entries
    Ingredients {
        #[arg(long)]
        file: PathBuf,
    },
    /// Create `[{"name", "color", "slug"}]` entries, skipping existing ones
    Tags {
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(serde::Deserialize)]
struct IngredientEntry {
    name: String,
    measurement_unit: String,
}

#[derive(serde::Deserialize)]
struct TagEntry {
    name: String,
    color: String,
    slug: String,
}

fn read_entries<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = RecipesConfig::from_env();
    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    let catalog = DbCatalogRepository { db };

    match args.command {
        Command::Ingredients { file } => {
            let entries: Vec<IngredientEntry> = read_entries(&file)?;
            let usecase = UpsertIngredientUseCase { catalog };
            let total = entries.len();
            for entry in entries {
                usecase
                    .execute(UpsertIngredientInput {
                        name: entry.name,
                        measurement_unit: entry.measurement_unit,
                    })
                    .await?;
            }
            info!(total, "ingredients seeded");
        }
        Command::Tags { file } => {
            let entries: Vec<TagEntry> = read_entries(&file)?;
            let usecase = CreateTagUseCase { catalog };
            let mut created = 0usize;
            for entry in entries {
                let slug = entry.slug.clone();
                match usecase
                    .execute(CreateTagInput {
                        name: entry.name,
                        color: entry.color,
                        slug: entry.slug,
                    })
                    .await
                {
                    Ok(_) => created += 1,
                    Err(RecipesServiceError::DuplicateTag) => {
                        warn!(slug = %slug, "tag already exists, skipping");
                    }
                    Err(e) => return Err(e).with_context(|| format!("failed to seed tag {slug}")),
                }
            }
            info!(created, "tags seeded");
        }
    }
    Ok(())
}
