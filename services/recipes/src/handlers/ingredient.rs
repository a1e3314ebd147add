use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use foodgram_auth_types::identity::IdentityHeaders;

use crate::domain::types::Ingredient;
use crate::error::RecipesServiceError;
use crate::handlers::require_admin;
use crate::state::AppState;
use crate::usecase::catalog::{
    GetIngredientUseCase, ListIngredientsUseCase, UpsertIngredientInput, UpsertIngredientUseCase,
};

#[derive(Serialize)]
pub struct IngredientResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

// ── GET /ingredients ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct IngredientListQuery {
    /// Case-insensitive name prefix.
    pub name: Option<String>,
}

pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(query): Query<IngredientListQuery>,
) -> Result<Json<Vec<IngredientResponse>>, RecipesServiceError> {
    let usecase = ListIngredientsUseCase {
        catalog: state.catalog_repo(),
    };
    let ingredients = usecase.execute(query.name.as_deref()).await?;
    Ok(Json(
        ingredients.into_iter().map(IngredientResponse::from).collect(),
    ))
}

// ── GET /ingredients/{id} ────────────────────────────────────────────────────

pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<IngredientResponse>, RecipesServiceError> {
    let usecase = GetIngredientUseCase {
        catalog: state.catalog_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── POST /ingredients ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpsertIngredientRequest {
    pub name: String,
    pub measurement_unit: String,
}

pub async fn upsert_ingredient(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<UpsertIngredientRequest>,
) -> Result<(StatusCode, Json<IngredientResponse>), RecipesServiceError> {
    require_admin(&identity)?;
    let usecase = UpsertIngredientUseCase {
        catalog: state.catalog_repo(),
    };
    let ingredient = usecase
        .execute(UpsertIngredientInput {
            name: body.name,
            measurement_unit: body.measurement_unit,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ingredient.into())))
}
