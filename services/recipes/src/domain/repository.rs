#![allow(async_fn_in_trait)]

use uuid::Uuid;

use foodgram_domain::pagination::PageRequest;

use crate::domain::types::{
    Edge, EdgeKind, Ingredient, IngredientAmount, IngredientLine, NewTag, Recipe, RecipeFilter,
    Tag, User,
};
use crate::error::RecipesServiceError;

/// Repository for user profiles.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RecipesServiceError>;

    /// Insert a user. Fails with `UserAlreadyExists` when the email or username is taken.
    async fn create(&self, user: &User) -> Result<(), RecipesServiceError>;

    async fn count_recipes(&self, author_id: Uuid) -> Result<u64, RecipesServiceError>;

    /// Delete a user with their recipes and every edge touching them.
    /// Returns `true` if the user existed.
    async fn delete_cascade(&self, id: Uuid) -> Result<bool, RecipesServiceError>;
}

/// Repository for tags and ingredients.
pub trait CatalogRepository: Send + Sync {
    /// All tags ordered by id.
    async fn list_tags(&self) -> Result<Vec<Tag>, RecipesServiceError>;

    async fn find_tag(&self, id: i32) -> Result<Option<Tag>, RecipesServiceError>;

    /// Insert a tag. Returns `None` when the name or slug is already taken.
    async fn create_tag(&self, tag: &NewTag) -> Result<Option<Tag>, RecipesServiceError>;

    /// Ingredients whose name starts with `prefix` (case-insensitive), ordered by name.
    async fn list_ingredients(
        &self,
        prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, RecipesServiceError>;

    async fn find_ingredient(&self, id: i32) -> Result<Option<Ingredient>, RecipesServiceError>;

    /// Insert an ingredient unless one with `name` exists. The existing row is returned
    /// unchanged in that case.
    async fn upsert_ingredient(
        &self,
        name: &str,
        measurement_unit: &str,
    ) -> Result<Ingredient, RecipesServiceError>;

    /// The subset of `ids` that exist as tags.
    async fn existing_tag_ids(&self, ids: &[i32]) -> Result<Vec<i32>, RecipesServiceError>;

    /// The subset of `ids` that exist as ingredients.
    async fn existing_ingredient_ids(&self, ids: &[i32]) -> Result<Vec<i32>, RecipesServiceError>;
}

/// Repository for recipes, their tag links and ingredient lines.
pub trait RecipeRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipe>, RecipesServiceError>;

    /// Filtered page of recipes, oldest first.
    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Vec<Recipe>, RecipesServiceError>;

    /// Recipes by one author, oldest first, at most `limit` when given.
    async fn list_by_author(
        &self,
        author_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<Recipe>, RecipesServiceError>;

    /// Insert the recipe, its tag links and lines in one transaction.
    async fn create(
        &self,
        recipe: &Recipe,
        tag_ids: &[i32],
        ingredients: &[IngredientAmount],
    ) -> Result<(), RecipesServiceError>;

    /// Overwrite the recipe fields and replace its tag set and lines in one transaction.
    async fn replace(
        &self,
        recipe: &Recipe,
        tag_ids: &[i32],
        ingredients: &[IngredientAmount],
    ) -> Result<(), RecipesServiceError>;

    /// Delete the recipe, its lines, tag links and the edges pointing at it.
    /// Returns `true` if the recipe existed.
    async fn delete_cascade(&self, id: Uuid) -> Result<bool, RecipesServiceError>;

    /// Tags of one recipe ordered by id.
    async fn tags(&self, recipe_id: Uuid) -> Result<Vec<Tag>, RecipesServiceError>;

    /// Ingredient lines of one recipe ordered by ingredient name.
    async fn ingredient_lines(
        &self,
        recipe_id: Uuid,
    ) -> Result<Vec<IngredientLine>, RecipesServiceError>;

    /// Ingredient lines of every listed recipe, one entry per stored line.
    async fn ingredient_lines_for(
        &self,
        recipe_ids: &[Uuid],
    ) -> Result<Vec<IngredientLine>, RecipesServiceError>;
}

/// Repository for favorite, shopping cart and subscription edges.
pub trait EdgeRepository: Send + Sync {
    /// Insert an edge. Returns `false` when the same (kind, subject, object) already exists.
    ///
    /// The object must exist for as long as the insert runs: a missing recipe fails with
    /// `RecipeNotFound` and a missing followee with `UserNotFound`, and a cascade delete
    /// racing the insert either waits for it or makes it fail.
    async fn insert(&self, edge: &Edge) -> Result<bool, RecipesServiceError>;

    /// Delete an edge. Returns `true` if a row was deleted.
    async fn delete(
        &self,
        kind: EdgeKind,
        subject_id: Uuid,
        object_id: Uuid,
    ) -> Result<bool, RecipesServiceError>;

    async fn exists(
        &self,
        kind: EdgeKind,
        subject_id: Uuid,
        object_id: Uuid,
    ) -> Result<bool, RecipesServiceError>;

    /// Object ids of every `kind` edge held by `subject_id`, oldest first.
    async fn list_objects(
        &self,
        kind: EdgeKind,
        subject_id: Uuid,
    ) -> Result<Vec<Uuid>, RecipesServiceError>;
}
