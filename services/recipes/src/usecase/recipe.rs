use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use foodgram_domain::pagination::PageRequest;

use crate::domain::repository::{
    CatalogRepository, EdgeRepository, RecipeRepository, UserRepository,
};
use crate::domain::types::{
    EdgeKind, IngredientAmount, Recipe, RecipeDetail, RecipeFilter, UserProfile,
};
use crate::error::RecipesServiceError;
use crate::usecase::user::build_profile;

/// Writable recipe fields plus its tag set and ingredient lines.
#[derive(Debug, Clone)]
pub struct RecipeInput {
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i32,
    pub tag_ids: Vec<i32>,
    pub ingredients: Vec<IngredientAmount>,
}

/// Checks that need no store access. The first failing rule wins.
fn validate_shape(input: &RecipeInput) -> Result<(), RecipesServiceError> {
    if input.tag_ids.is_empty() {
        return Err(RecipesServiceError::MissingTag);
    }
    if input.ingredients.is_empty() {
        return Err(RecipesServiceError::MissingIngredient);
    }
    if input.cooking_time < 1 {
        return Err(RecipesServiceError::InvalidCookingTime);
    }
    if input.ingredients.iter().any(|line| line.amount < 1) {
        return Err(RecipesServiceError::InvalidAmount);
    }
    let mut seen = HashSet::with_capacity(input.ingredients.len());
    for line in &input.ingredients {
        if !seen.insert(line.ingredient_id) {
            return Err(RecipesServiceError::DuplicateIngredient(line.ingredient_id));
        }
    }
    if input.name.trim().is_empty() {
        return Err(RecipesServiceError::MissingData);
    }
    Ok(())
}

/// Repeated tag ids collapse to one link, keeping first-seen order.
fn dedup_tag_ids(tag_ids: &[i32]) -> Vec<i32> {
    let mut seen = HashSet::with_capacity(tag_ids.len());
    tag_ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

async fn check_references<C: CatalogRepository>(
    catalog: &C,
    tag_ids: &[i32],
    ingredients: &[IngredientAmount],
) -> Result<(), RecipesServiceError> {
    let known_tags = catalog.existing_tag_ids(tag_ids).await?;
    if let Some(&missing) = tag_ids.iter().find(|id| !known_tags.contains(id)) {
        return Err(RecipesServiceError::UnknownTag(missing));
    }
    let ingredient_ids: Vec<i32> = ingredients.iter().map(|l| l.ingredient_id).collect();
    let known_ingredients = catalog.existing_ingredient_ids(&ingredient_ids).await?;
    if let Some(&missing) = ingredient_ids
        .iter()
        .find(|id| !known_ingredients.contains(id))
    {
        return Err(RecipesServiceError::UnknownIngredient(missing));
    }
    Ok(())
}

pub(crate) async fn load_detail<R, U, E>(
    recipes: &R,
    users: &U,
    edges: &E,
    recipe: Recipe,
    viewer: Option<Uuid>,
) -> Result<RecipeDetail, RecipesServiceError>
where
    R: RecipeRepository,
    U: UserRepository,
    E: EdgeRepository,
{
    let author = users
        .find_by_id(recipe.author_id)
        .await?
        .ok_or(RecipesServiceError::UserNotFound)?;
    let author: UserProfile = build_profile(users, edges, author, viewer).await?;
    let tags = recipes.tags(recipe.id).await?;
    let ingredients = recipes.ingredient_lines(recipe.id).await?;
    let (is_favorited, is_in_shopping_cart) = match viewer {
        Some(viewer) => (
            edges.exists(EdgeKind::Favorite, viewer, recipe.id).await?,
            edges
                .exists(EdgeKind::ShoppingCart, viewer, recipe.id)
                .await?,
        ),
        None => (false, false),
    };
    Ok(RecipeDetail {
        recipe,
        author,
        tags,
        ingredients,
        is_favorited,
        is_in_shopping_cart,
    })
}

// ── CreateRecipe ─────────────────────────────────────────────────────────────

pub struct CreateRecipeUseCase<R: RecipeRepository, C: CatalogRepository> {
    pub recipes: R,
    pub catalog: C,
}

impl<R: RecipeRepository, C: CatalogRepository> CreateRecipeUseCase<R, C> {
    pub async fn execute(
        &self,
        author_id: Uuid,
        input: RecipeInput,
    ) -> Result<Recipe, RecipesServiceError> {
        validate_shape(&input)?;
        let tag_ids = dedup_tag_ids(&input.tag_ids);
        check_references(&self.catalog, &tag_ids, &input.ingredients).await?;

        let recipe = Recipe {
            id: Uuid::now_v7(),
            author_id,
            name: input.name.trim().to_owned(),
            text: input.text,
            image: input.image,
            cooking_time: input.cooking_time,
            created_at: Utc::now(),
        };
        self.recipes
            .create(&recipe, &tag_ids, &input.ingredients)
            .await?;
        info!(
            recipe_id = %recipe.id,
            author_id = %author_id,
            tags = tag_ids.len(),
            ingredients = input.ingredients.len(),
            "recipe created"
        );
        Ok(recipe)
    }
}

// ── UpdateRecipe ─────────────────────────────────────────────────────────────

pub struct UpdateRecipeUseCase<R: RecipeRepository, C: CatalogRepository> {
    pub recipes: R,
    pub catalog: C,
}

impl<R: RecipeRepository, C: CatalogRepository> UpdateRecipeUseCase<R, C> {
    /// Replace every field, the tag set and all ingredient lines of a recipe.
    pub async fn execute(
        &self,
        recipe_id: Uuid,
        requestor: Uuid,
        input: RecipeInput,
    ) -> Result<Recipe, RecipesServiceError> {
        validate_shape(&input)?;
        let current = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(RecipesServiceError::RecipeNotFound)?;
        if current.author_id != requestor {
            return Err(RecipesServiceError::NotOwner);
        }
        let tag_ids = dedup_tag_ids(&input.tag_ids);
        check_references(&self.catalog, &tag_ids, &input.ingredients).await?;

        let recipe = Recipe {
            name: input.name.trim().to_owned(),
            text: input.text,
            image: input.image,
            cooking_time: input.cooking_time,
            ..current
        };
        self.recipes
            .replace(&recipe, &tag_ids, &input.ingredients)
            .await?;
        info!(recipe_id = %recipe.id, "recipe updated");
        Ok(recipe)
    }
}

// ── DeleteRecipe ─────────────────────────────────────────────────────────────

pub struct DeleteRecipeUseCase<R: RecipeRepository> {
    pub recipes: R,
}

impl<R: RecipeRepository> DeleteRecipeUseCase<R> {
    pub async fn execute(&self, recipe_id: Uuid, requestor: Uuid) -> Result<(), RecipesServiceError> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(RecipesServiceError::RecipeNotFound)?;
        if recipe.author_id != requestor {
            return Err(RecipesServiceError::NotOwner);
        }
        if !self.recipes.delete_cascade(recipe_id).await? {
            return Err(RecipesServiceError::RecipeNotFound);
        }
        info!(recipe_id = %recipe_id, "recipe deleted");
        Ok(())
    }
}

// ── GetRecipe ────────────────────────────────────────────────────────────────

pub struct GetRecipeUseCase<R: RecipeRepository, U: UserRepository, E: EdgeRepository> {
    pub recipes: R,
    pub users: U,
    pub edges: E,
}

impl<R: RecipeRepository, U: UserRepository, E: EdgeRepository> GetRecipeUseCase<R, U, E> {
    pub async fn execute(
        &self,
        recipe_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<RecipeDetail, RecipesServiceError> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(RecipesServiceError::RecipeNotFound)?;
        load_detail(&self.recipes, &self.users, &self.edges, recipe, viewer).await
    }
}

// ── ListRecipes ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ListRecipesQuery {
    pub author_id: Option<Uuid>,
    pub tag_slugs: Vec<String>,
    /// Only the viewer's favorites. Ignored for anonymous viewers.
    pub is_favorited: bool,
    /// Only recipes in the viewer's shopping cart. Ignored for anonymous viewers.
    pub is_in_shopping_cart: bool,
}

pub struct ListRecipesUseCase<R: RecipeRepository, U: UserRepository, E: EdgeRepository> {
    pub recipes: R,
    pub users: U,
    pub edges: E,
}

impl<R: RecipeRepository, U: UserRepository, E: EdgeRepository> ListRecipesUseCase<R, U, E> {
    pub async fn execute(
        &self,
        query: ListRecipesQuery,
        page: PageRequest,
        viewer: Option<Uuid>,
    ) -> Result<Vec<RecipeDetail>, RecipesServiceError> {
        let filter = RecipeFilter {
            author_id: query.author_id,
            tag_slugs: query.tag_slugs,
            favorited_by: viewer.filter(|_| query.is_favorited),
            in_shopping_cart_of: viewer.filter(|_| query.is_in_shopping_cart),
        };
        debug!(?filter, ?page, "listing recipes");
        let recipes = self.recipes.list(&filter, page.clamped()).await?;
        let mut details = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            details.push(load_detail(&self.recipes, &self.users, &self.edges, recipe, viewer).await?);
        }
        Ok(details)
    }
}
