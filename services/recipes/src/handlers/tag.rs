use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use foodgram_auth_types::identity::IdentityHeaders;

use crate::domain::types::Tag;
use crate::error::RecipesServiceError;
use crate::handlers::require_admin;
use crate::state::AppState;
use crate::usecase::catalog::{CreateTagInput, CreateTagUseCase, GetTagUseCase, ListTagsUseCase};

#[derive(Serialize)]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            color: tag.color,
            slug: tag.slug,
        }
    }
}

// ── GET /tags ────────────────────────────────────────────────────────────────

pub async fn list_tags(
    State(state): State<AppState>,
) -> Result<Json<Vec<TagResponse>>, RecipesServiceError> {
    let usecase = ListTagsUseCase {
        catalog: state.catalog_repo(),
    };
    let tags = usecase.execute().await?;
    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}

// ── GET /tags/{id} ───────────────────────────────────────────────────────────

pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TagResponse>, RecipesServiceError> {
    let usecase = GetTagUseCase {
        catalog: state.catalog_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── POST /tags ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
    pub color: String,
    pub slug: String,
}

pub async fn create_tag(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<TagResponse>), RecipesServiceError> {
    require_admin(&identity)?;
    let usecase = CreateTagUseCase {
        catalog: state.catalog_repo(),
    };
    let tag = usecase
        .execute(CreateTagInput {
            name: body.name,
            color: body.color,
            slug: body.slug,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(tag.into())))
}
