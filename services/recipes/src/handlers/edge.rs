use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use foodgram_auth_types::identity::IdentityHeaders;

use crate::domain::types::{EdgeKind, Subscription};
use crate::error::RecipesServiceError;
use crate::handlers::recipe::ShortRecipeResponse;
use crate::handlers::user::UserResponse;
use crate::handlers::{page_request, parse_query};
use crate::infra::db::{DbEdgeRepository, DbRecipeRepository, DbUserRepository};
use crate::state::AppState;
use crate::usecase::edge::{AddEdgeUseCase, ListSubscriptionsUseCase, RemoveEdgeUseCase};

fn add_usecase(
    state: &AppState,
) -> AddEdgeUseCase<DbEdgeRepository, DbRecipeRepository, DbUserRepository> {
    AddEdgeUseCase {
        edges: state.edge_repo(),
        recipes: state.recipe_repo(),
        users: state.user_repo(),
    }
}

async fn add_recipe_edge(
    state: &AppState,
    kind: EdgeKind,
    subject_id: Uuid,
    recipe_id: Uuid,
) -> Result<(StatusCode, Json<ShortRecipeResponse>), RecipesServiceError> {
    let recipe = add_usecase(state)
        .add_recipe(kind, subject_id, recipe_id)
        .await?;
    Ok((StatusCode::CREATED, Json(recipe.into())))
}

async fn remove_edge(
    state: &AppState,
    kind: EdgeKind,
    subject_id: Uuid,
    object_id: Uuid,
) -> Result<StatusCode, RecipesServiceError> {
    let usecase = RemoveEdgeUseCase {
        edges: state.edge_repo(),
    };
    usecase.execute(kind, subject_id, object_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST|DELETE /recipes/{id}/favorite ───────────────────────────────────────

pub async fn add_favorite(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ShortRecipeResponse>), RecipesServiceError> {
    add_recipe_edge(&state, EdgeKind::Favorite, identity.user_id, recipe_id).await
}

pub async fn remove_favorite(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
) -> Result<StatusCode, RecipesServiceError> {
    remove_edge(&state, EdgeKind::Favorite, identity.user_id, recipe_id).await
}

// ── POST|DELETE /recipes/{id}/shopping-cart ──────────────────────────────────

pub async fn add_to_shopping_cart(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ShortRecipeResponse>), RecipesServiceError> {
    add_recipe_edge(&state, EdgeKind::ShoppingCart, identity.user_id, recipe_id).await
}

pub async fn remove_from_shopping_cart(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
) -> Result<StatusCode, RecipesServiceError> {
    remove_edge(&state, EdgeKind::ShoppingCart, identity.user_id, recipe_id).await
}

// ── POST|DELETE /users/{id}/subscribe ────────────────────────────────────────

pub async fn subscribe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
) -> Result<(StatusCode, Json<UserResponse>), RecipesServiceError> {
    let author = add_usecase(&state)
        .subscribe(identity.user_id, author_id)
        .await?;
    Ok((StatusCode::CREATED, Json(author.into())))
}

pub async fn unsubscribe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
) -> Result<StatusCode, RecipesServiceError> {
    remove_edge(&state, EdgeKind::Subscription, identity.user_id, author_id).await
}

// ── GET /users/@me/subscriptions ─────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct SubscriptionListQuery {
    pub recipes_limit: Option<u64>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Serialize)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub author: UserResponse,
    pub recipes: Vec<ShortRecipeResponse>,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        Self {
            author: subscription.author.into(),
            recipes: subscription
                .recipes
                .into_iter()
                .map(ShortRecipeResponse::from)
                .collect(),
        }
    }
}

pub async fn get_subscriptions(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<SubscriptionResponse>>, RecipesServiceError> {
    let query: SubscriptionListQuery = parse_query(raw_query)?;
    let usecase = ListSubscriptionsUseCase {
        edges: state.edge_repo(),
        users: state.user_repo(),
        recipes: state.recipe_repo(),
    };
    let subscriptions = usecase
        .execute(
            identity.user_id,
            query.recipes_limit,
            page_request(query.per_page, query.page),
        )
        .await?;
    Ok(Json(
        subscriptions
            .into_iter()
            .map(SubscriptionResponse::from)
            .collect(),
    ))
}
