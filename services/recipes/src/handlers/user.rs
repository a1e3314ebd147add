use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use foodgram_auth_types::identity::IdentityHeaders;

use crate::domain::types::UserProfile;
use crate::error::RecipesServiceError;
use crate::handlers::{require_admin, role_of};
use crate::state::AppState;
use crate::usecase::user::{CreateUserInput, CreateUserUseCase, DeleteUserUseCase, GetUserUseCase};

/// Public profile, also embedded as the author of recipes and subscriptions.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub recipes_count: u64,
}

impl From<UserProfile> for UserResponse {
    fn from(profile: UserProfile) -> Self {
        let UserProfile {
            user,
            recipes_count,
            is_subscribed,
        } = profile;
        Self {
            id: user.id.to_string(),
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
            recipes_count,
        }
    }
}

// ── POST /users ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Serialize)]
pub struct CreatedUserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(serialize_with = "foodgram_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn create_user(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), RecipesServiceError> {
    require_admin(&identity)?;
    let usecase = CreateUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase
        .execute(CreateUserInput {
            email: body.email,
            username: body.username,
            first_name: body.first_name,
            last_name: body.last_name,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedUserResponse {
            id: user.id.to_string(),
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: user.created_at,
        }),
    ))
}

// ── GET /users/@me ───────────────────────────────────────────────────────────

pub async fn get_me(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, RecipesServiceError> {
    let usecase = GetUserUseCase {
        users: state.user_repo(),
        edges: state.edge_repo(),
    };
    let profile = usecase
        .execute(identity.user_id, Some(identity.user_id))
        .await?;
    Ok(Json(profile.into()))
}

// ── GET /users/{id} ──────────────────────────────────────────────────────────

pub async fn get_user(
    identity: Option<IdentityHeaders>,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, RecipesServiceError> {
    let usecase = GetUserUseCase {
        users: state.user_repo(),
        edges: state.edge_repo(),
    };
    let profile = usecase
        .execute(user_id, identity.map(|i| i.user_id))
        .await?;
    Ok(Json(profile.into()))
}

// ── DELETE /users/{id} ───────────────────────────────────────────────────────

pub async fn delete_user(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, RecipesServiceError> {
    let usecase = DeleteUserUseCase {
        users: state.user_repo(),
    };
    usecase
        .execute(identity.user_id, role_of(&identity), user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
