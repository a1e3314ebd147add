use tracing::info;

use foodgram_domain::color::normalize_color;

use crate::domain::repository::CatalogRepository;
use crate::domain::types::{Ingredient, NewTag, Tag, validate_slug};
use crate::error::RecipesServiceError;

// ── ListTags ─────────────────────────────────────────────────────────────────

pub struct ListTagsUseCase<C: CatalogRepository> {
    pub catalog: C,
}

impl<C: CatalogRepository> ListTagsUseCase<C> {
    pub async fn execute(&self) -> Result<Vec<Tag>, RecipesServiceError> {
        self.catalog.list_tags().await
    }
}

// ── GetTag ───────────────────────────────────────────────────────────────────

pub struct GetTagUseCase<C: CatalogRepository> {
    pub catalog: C,
}

impl<C: CatalogRepository> GetTagUseCase<C> {
    pub async fn execute(&self, id: i32) -> Result<Tag, RecipesServiceError> {
        self.catalog
            .find_tag(id)
            .await?
            .ok_or(RecipesServiceError::TagNotFound)
    }
}

// ── CreateTag ────────────────────────────────────────────────────────────────

pub struct CreateTagInput {
    pub name: String,
    pub color: String,
    pub slug: String,
}

pub struct CreateTagUseCase<C: CatalogRepository> {
    pub catalog: C,
}

impl<C: CatalogRepository> CreateTagUseCase<C> {
    pub async fn execute(&self, input: CreateTagInput) -> Result<Tag, RecipesServiceError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(RecipesServiceError::MissingData);
        }
        let color = normalize_color(&input.color)
            .map_err(|e| RecipesServiceError::InvalidColor(e.0))?;
        if !validate_slug(&input.slug) {
            return Err(RecipesServiceError::InvalidSlug);
        }
        let tag = self
            .catalog
            .create_tag(&NewTag {
                name: name.to_owned(),
                color: color.to_owned(),
                slug: input.slug,
            })
            .await?
            .ok_or(RecipesServiceError::DuplicateTag)?;
        info!(tag_id = tag.id, slug = %tag.slug, color = %tag.color, "tag created");
        Ok(tag)
    }
}

// ── ListIngredients ──────────────────────────────────────────────────────────

pub struct ListIngredientsUseCase<C: CatalogRepository> {
    pub catalog: C,
}

impl<C: CatalogRepository> ListIngredientsUseCase<C> {
    pub async fn execute(
        &self,
        name_prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, RecipesServiceError> {
        let prefix = name_prefix.map(str::trim).filter(|p| !p.is_empty());
        self.catalog.list_ingredients(prefix).await
    }
}

// ── GetIngredient ────────────────────────────────────────────────────────────

pub struct GetIngredientUseCase<C: CatalogRepository> {
    pub catalog: C,
}

impl<C: CatalogRepository> GetIngredientUseCase<C> {
    pub async fn execute(&self, id: i32) -> Result<Ingredient, RecipesServiceError> {
        self.catalog
            .find_ingredient(id)
            .await?
            .ok_or(RecipesServiceError::IngredientNotFound)
    }
}

// ── UpsertIngredient ─────────────────────────────────────────────────────────

pub struct UpsertIngredientInput {
    pub name: String,
    pub measurement_unit: String,
}

pub struct UpsertIngredientUseCase<C: CatalogRepository> {
    pub catalog: C,
}

impl<C: CatalogRepository> UpsertIngredientUseCase<C> {
    /// Returns the stored ingredient; an existing one with the same name wins.
    pub async fn execute(
        &self,
        input: UpsertIngredientInput,
    ) -> Result<Ingredient, RecipesServiceError> {
        let name = input.name.trim();
        let unit = input.measurement_unit.trim();
        if name.is_empty() || unit.is_empty() {
            return Err(RecipesServiceError::MissingData);
        }
        self.catalog.upsert_ingredient(name, unit).await
    }
}
