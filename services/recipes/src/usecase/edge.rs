use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use foodgram_domain::pagination::PageRequest;

use crate::domain::repository::{EdgeRepository, RecipeRepository, UserRepository};
use crate::domain::types::{Edge, EdgeKind, EdgeTarget, Recipe, Subscription, UserProfile};
use crate::error::RecipesServiceError;
use crate::usecase::user::build_profile;

// ── AddEdge ──────────────────────────────────────────────────────────────────

pub struct AddEdgeUseCase<E: EdgeRepository, R: RecipeRepository, U: UserRepository> {
    pub edges: E,
    pub recipes: R,
    pub users: U,
}

impl<E: EdgeRepository, R: RecipeRepository, U: UserRepository> AddEdgeUseCase<E, R, U> {
    /// Record that `subject_id` favorites, carts or follows `object_id`.
    ///
    /// The store checks that the object exists under a row lock and detects duplicates
    /// by its uniqueness constraint, so two racing inserts of the same pair yield one
    /// success and one `DuplicateEdge`.
    pub async fn execute(
        &self,
        kind: EdgeKind,
        subject_id: Uuid,
        object_id: Uuid,
    ) -> Result<(), RecipesServiceError> {
        if kind == EdgeKind::Subscription && subject_id == object_id {
            return Err(RecipesServiceError::SelfSubscription);
        }
        let edge = Edge {
            kind,
            subject_id,
            object_id,
            created_at: Utc::now(),
        };
        if !self.edges.insert(&edge).await? {
            return Err(RecipesServiceError::DuplicateEdge);
        }
        info!(%kind, subject_id = %subject_id, object_id = %object_id, "edge added");
        Ok(())
    }

    /// Favorite or cart a recipe, then return it.
    pub async fn add_recipe(
        &self,
        kind: EdgeKind,
        subject_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<Recipe, RecipesServiceError> {
        debug_assert_eq!(kind.target(), EdgeTarget::Recipe);
        self.execute(kind, subject_id, recipe_id).await?;
        self.recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(RecipesServiceError::RecipeNotFound)
    }

    /// Follow an author, then return their profile as the new follower sees it.
    pub async fn subscribe(
        &self,
        subject_id: Uuid,
        author_id: Uuid,
    ) -> Result<UserProfile, RecipesServiceError> {
        self.execute(EdgeKind::Subscription, subject_id, author_id)
            .await?;
        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or(RecipesServiceError::UserNotFound)?;
        build_profile(&self.users, &self.edges, author, Some(subject_id)).await
    }
}

// ── RemoveEdge ───────────────────────────────────────────────────────────────

pub struct RemoveEdgeUseCase<E: EdgeRepository> {
    pub edges: E,
}

impl<E: EdgeRepository> RemoveEdgeUseCase<E> {
    pub async fn execute(
        &self,
        kind: EdgeKind,
        subject_id: Uuid,
        object_id: Uuid,
    ) -> Result<(), RecipesServiceError> {
        if !self.edges.delete(kind, subject_id, object_id).await? {
            return Err(RecipesServiceError::EdgeNotFound);
        }
        info!(%kind, subject_id = %subject_id, object_id = %object_id, "edge removed");
        Ok(())
    }
}

// ── ListSubscriptions ────────────────────────────────────────────────────────

pub struct ListSubscriptionsUseCase<E: EdgeRepository, U: UserRepository, R: RecipeRepository> {
    pub edges: E,
    pub users: U,
    pub recipes: R,
}

impl<E: EdgeRepository, U: UserRepository, R: RecipeRepository> ListSubscriptionsUseCase<E, U, R> {
    /// Followed authors, oldest subscription first, each with up to `recipes_limit`
    /// of their recipes.
    pub async fn execute(
        &self,
        user_id: Uuid,
        recipes_limit: Option<u64>,
        page: PageRequest,
    ) -> Result<Vec<Subscription>, RecipesServiceError> {
        let followed = self
            .edges
            .list_objects(EdgeKind::Subscription, user_id)
            .await?;
        let mut subscriptions = Vec::new();
        for author_id in followed
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
        {
            let Some(author) = self.users.find_by_id(author_id).await? else {
                debug!(author_id = %author_id, "skipping subscription to missing user");
                continue;
            };
            let author = build_profile(&self.users, &self.edges, author, Some(user_id)).await?;
            let recipes = self
                .recipes
                .list_by_author(author_id, recipes_limit)
                .await?;
            subscriptions.push(Subscription { author, recipes });
        }
        Ok(subscriptions)
    }
}
