use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use foodgram_auth_types::identity::IdentityHeaders;

use crate::domain::types::{IngredientAmount, IngredientLine, Recipe, RecipeDetail};
use crate::error::RecipesServiceError;
use crate::handlers::tag::TagResponse;
use crate::handlers::user::UserResponse;
use crate::handlers::{page_request, parse_query};
use crate::state::AppState;
use crate::usecase::recipe::{
    CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeUseCase, ListRecipesQuery,
    ListRecipesUseCase, RecipeInput, UpdateRecipeUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct IngredientLineResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl From<IngredientLine> for IngredientLineResponse {
    fn from(line: IngredientLine) -> Self {
        Self {
            id: line.ingredient_id,
            name: line.name,
            measurement_unit: line.measurement_unit,
            amount: line.amount,
        }
    }
}

#[derive(Serialize)]
pub struct RecipeResponse {
    pub id: String,
    pub author: UserResponse,
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i32,
    pub tags: Vec<TagResponse>,
    pub ingredients: Vec<IngredientLineResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    #[serde(serialize_with = "foodgram_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<RecipeDetail> for RecipeResponse {
    fn from(detail: RecipeDetail) -> Self {
        let RecipeDetail {
            recipe,
            author,
            tags,
            ingredients,
            is_favorited,
            is_in_shopping_cart,
        } = detail;
        Self {
            id: recipe.id.to_string(),
            author: author.into(),
            name: recipe.name,
            text: recipe.text,
            image: recipe.image,
            cooking_time: recipe.cooking_time,
            tags: tags.into_iter().map(TagResponse::from).collect(),
            ingredients: ingredients
                .into_iter()
                .map(IngredientLineResponse::from)
                .collect(),
            is_favorited,
            is_in_shopping_cart,
            created_at: recipe.created_at,
        }
    }
}

/// Compact form used inside subscription listings and returned when a recipe is
/// favorited or put in the cart.
#[derive(Serialize)]
pub struct ShortRecipeResponse {
    pub id: String,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<Recipe> for ShortRecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id.to_string(),
            name: recipe.name,
            image: recipe.image,
            cooking_time: recipe.cooking_time,
        }
    }
}

// ── Request body ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct IngredientAmountRequest {
    pub id: i32,
    pub amount: i32,
}

#[derive(Deserialize)]
pub struct RecipeRequest {
    pub name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image: String,
    pub cooking_time: i32,
    #[serde(default)]
    pub tags: Vec<i32>,
    #[serde(default)]
    pub ingredients: Vec<IngredientAmountRequest>,
}

impl From<RecipeRequest> for RecipeInput {
    fn from(body: RecipeRequest) -> Self {
        Self {
            name: body.name,
            text: body.text,
            image: body.image,
            cooking_time: body.cooking_time,
            tag_ids: body.tags,
            ingredients: body
                .ingredients
                .into_iter()
                .map(|i| IngredientAmount {
                    ingredient_id: i.id,
                    amount: i.amount,
                })
                .collect(),
        }
    }
}

// ── GET /recipes ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct RecipeListQuery {
    pub author: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

/// `1` and `true` switch a flag filter on.
fn flag(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "true"))
}

pub async fn list_recipes(
    identity: Option<IdentityHeaders>,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<RecipeResponse>>, RecipesServiceError> {
    let query: RecipeListQuery = parse_query(raw_query)?;
    let usecase = ListRecipesUseCase {
        recipes: state.recipe_repo(),
        users: state.user_repo(),
        edges: state.edge_repo(),
    };
    let details = usecase
        .execute(
            ListRecipesQuery {
                author_id: query.author,
                tag_slugs: query.tags,
                is_favorited: flag(query.is_favorited.as_deref()),
                is_in_shopping_cart: flag(query.is_in_shopping_cart.as_deref()),
            },
            page_request(query.per_page, query.page),
            identity.map(|i| i.user_id),
        )
        .await?;
    Ok(Json(details.into_iter().map(RecipeResponse::from).collect()))
}

// ── POST /recipes ────────────────────────────────────────────────────────────

pub async fn create_recipe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<RecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), RecipesServiceError> {
    let usecase = CreateRecipeUseCase {
        recipes: state.recipe_repo(),
        catalog: state.catalog_repo(),
    };
    let recipe = usecase.execute(identity.user_id, body.into()).await?;
    let detail = get_detail(&state, recipe.id, identity.user_id).await?;
    Ok((StatusCode::CREATED, Json(detail.into())))
}

// ── GET /recipes/{id} ────────────────────────────────────────────────────────

pub async fn get_recipe(
    identity: Option<IdentityHeaders>,
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
) -> Result<Json<RecipeResponse>, RecipesServiceError> {
    let usecase = GetRecipeUseCase {
        recipes: state.recipe_repo(),
        users: state.user_repo(),
        edges: state.edge_repo(),
    };
    let detail = usecase
        .execute(recipe_id, identity.map(|i| i.user_id))
        .await?;
    Ok(Json(detail.into()))
}

// ── PATCH /recipes/{id} ──────────────────────────────────────────────────────

pub async fn update_recipe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
    Json(body): Json<RecipeRequest>,
) -> Result<Json<RecipeResponse>, RecipesServiceError> {
    let usecase = UpdateRecipeUseCase {
        recipes: state.recipe_repo(),
        catalog: state.catalog_repo(),
    };
    usecase
        .execute(recipe_id, identity.user_id, body.into())
        .await?;
    let detail = get_detail(&state, recipe_id, identity.user_id).await?;
    Ok(Json(detail.into()))
}

// ── DELETE /recipes/{id} ─────────────────────────────────────────────────────

pub async fn delete_recipe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
) -> Result<StatusCode, RecipesServiceError> {
    let usecase = DeleteRecipeUseCase {
        recipes: state.recipe_repo(),
    };
    usecase.execute(recipe_id, identity.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_detail(
    state: &AppState,
    recipe_id: Uuid,
    viewer: Uuid,
) -> Result<RecipeDetail, RecipesServiceError> {
    GetRecipeUseCase {
        recipes: state.recipe_repo(),
        users: state.user_repo(),
        edges: state.edge_repo(),
    }
    .execute(recipe_id, Some(viewer))
    .await
}
