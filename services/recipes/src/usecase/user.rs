use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use foodgram_domain::user::UserRole;

use crate::domain::repository::{EdgeRepository, UserRepository};
use crate::domain::types::{EdgeKind, User, UserProfile, validate_username};
use crate::error::RecipesServiceError;

/// Attach the derived `recipes_count` and the viewer's `is_subscribed` flag.
pub(crate) async fn build_profile<U: UserRepository, E: EdgeRepository>(
    users: &U,
    edges: &E,
    user: User,
    viewer: Option<Uuid>,
) -> Result<UserProfile, RecipesServiceError> {
    let recipes_count = users.count_recipes(user.id).await?;
    let is_subscribed = match viewer {
        Some(viewer) if viewer != user.id => {
            edges
                .exists(EdgeKind::Subscription, viewer, user.id)
                .await?
        }
        _ => false,
    };
    Ok(UserProfile {
        user,
        recipes_count,
        is_subscribed,
    })
}

// ── CreateUser ───────────────────────────────────────────────────────────────

pub struct CreateUserInput {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

pub struct CreateUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> CreateUserUseCase<U> {
    pub async fn execute(&self, input: CreateUserInput) -> Result<User, RecipesServiceError> {
        if !validate_username(&input.username) {
            return Err(RecipesServiceError::InvalidUsername);
        }
        let email = input.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(RecipesServiceError::MissingData);
        }
        let user = User {
            id: Uuid::now_v7(),
            email: email.to_owned(),
            username: input.username,
            first_name: input.first_name,
            last_name: input.last_name,
            created_at: Utc::now(),
        };
        self.users.create(&user).await?;
        info!(user_id = %user.id, username = %user.username, "user created");
        Ok(user)
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<U: UserRepository, E: EdgeRepository> {
    pub users: U,
    pub edges: E,
}

impl<U: UserRepository, E: EdgeRepository> GetUserUseCase<U, E> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<UserProfile, RecipesServiceError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(RecipesServiceError::UserNotFound)?;
        build_profile(&self.users, &self.edges, user, viewer).await
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> DeleteUserUseCase<U> {
    /// Only the user themselves or an admin may delete an account.
    pub async fn execute(
        &self,
        requestor: Uuid,
        requestor_role: UserRole,
        user_id: Uuid,
    ) -> Result<(), RecipesServiceError> {
        if requestor != user_id && !requestor_role.is_admin() {
            return Err(RecipesServiceError::Forbidden);
        }
        if !self.users.delete_cascade(user_id).await? {
            return Err(RecipesServiceError::UserNotFound);
        }
        info!(user_id = %user_id, deleted_by = %requestor, "user deleted");
        Ok(())
    }
}
