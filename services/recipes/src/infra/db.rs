use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionError,
    TransactionTrait,
    sea_query::{Expr, Func, LikeExpr, OnConflict, Query, SelectStatement},
};
use uuid::Uuid;

use foodgram_domain::pagination::PageRequest;
use foodgram_recipes_schema::{
    edges, ingredients, recipe_ingredients, recipe_tags, recipes, tags, users,
};

use crate::domain::repository::{
    CatalogRepository, EdgeRepository, RecipeRepository, UserRepository,
};
use crate::domain::types::{
    Edge, EdgeKind, EdgeTarget, Ingredient, IngredientAmount, IngredientLine, NewTag, Recipe,
    RecipeFilter, Tag, User,
};
use crate::error::RecipesServiceError;

fn txn_db_err(err: TransactionError<DbErr>) -> DbErr {
    match err {
        TransactionError::Connection(e) | TransactionError::Transaction(e) => e,
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn is_foreign_key_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}

/// Edge kinds whose object is a recipe.
fn recipe_edge_kinds() -> [&'static str; 2] {
    [EdgeKind::Favorite.as_str(), EdgeKind::ShoppingCart.as_str()]
}

/// `SELECT object_id FROM edges WHERE kind = $1 AND subject_id = $2`
fn edge_objects(kind: EdgeKind, subject_id: Uuid) -> SelectStatement {
    Query::select()
        .column(edges::Column::ObjectId)
        .from(edges::Entity)
        .and_where(Expr::col(edges::Column::Kind).eq(kind.as_str()))
        .and_where(Expr::col(edges::Column::SubjectId).eq(subject_id))
        .to_owned()
}

/// Lock the row an edge points at until the transaction ends. `FOR SHARE` lets
/// concurrent edge inserts proceed while blocking the `FOR UPDATE` taken by cascade
/// deletes. Returns `false` when the row is gone.
async fn lock_edge_target<C: ConnectionTrait>(
    conn: &C,
    kind: EdgeKind,
    object_id: Uuid,
) -> Result<bool, DbErr> {
    let found = match kind.target() {
        EdgeTarget::Recipe => {
            recipes::Entity::find_by_id(object_id)
                .select_only()
                .column(recipes::Column::Id)
                .lock_shared()
                .into_tuple::<Uuid>()
                .one(conn)
                .await?
        }
        EdgeTarget::User => {
            users::Entity::find_by_id(object_id)
                .select_only()
                .column(users::Column::Id)
                .lock_shared()
                .into_tuple::<Uuid>()
                .one(conn)
                .await?
        }
    };
    Ok(found.is_some())
}

/// Escape `%`, `_` and `\` so user input matches literally inside a LIKE pattern.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RecipesServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &User) -> Result<(), RecipesServiceError> {
        let result = users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            username: Set(user.username.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            created_at: Set(user.created_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(RecipesServiceError::UserAlreadyExists),
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }

    async fn count_recipes(&self, author_id: Uuid) -> Result<u64, RecipesServiceError> {
        let count = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .context("count recipes by author")?;
        Ok(count)
    }

    async fn delete_cascade(&self, id: Uuid) -> Result<bool, RecipesServiceError> {
        let deleted = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    let user = users::Entity::find_by_id(id)
                        .select_only()
                        .column(users::Column::Id)
                        .lock_exclusive()
                        .into_tuple::<Uuid>()
                        .one(txn)
                        .await?;
                    if user.is_none() {
                        return Ok(false);
                    }
                    // edge inserts on these recipes now wait for the delete
                    recipes::Entity::find()
                        .select_only()
                        .column(recipes::Column::Id)
                        .filter(recipes::Column::AuthorId.eq(id))
                        .lock_exclusive()
                        .into_tuple::<Uuid>()
                        .all(txn)
                        .await?;

                    let authored = Query::select()
                        .column(recipes::Column::Id)
                        .from(recipes::Entity)
                        .and_where(Expr::col(recipes::Column::AuthorId).eq(id))
                        .to_owned();

                    // edges the user holds
                    edges::Entity::delete_many()
                        .filter(edges::Column::SubjectId.eq(id))
                        .exec(txn)
                        .await?;
                    // followers of the user
                    edges::Entity::delete_many()
                        .filter(edges::Column::Kind.eq(EdgeKind::Subscription.as_str()))
                        .filter(edges::Column::ObjectId.eq(id))
                        .exec(txn)
                        .await?;
                    // other users' favorites and carts of the user's recipes
                    edges::Entity::delete_many()
                        .filter(edges::Column::Kind.is_in(recipe_edge_kinds()))
                        .filter(edges::Column::ObjectId.in_subquery(authored.clone()))
                        .exec(txn)
                        .await?;
                    recipe_ingredients::Entity::delete_many()
                        .filter(recipe_ingredients::Column::RecipeId.in_subquery(authored.clone()))
                        .exec(txn)
                        .await?;
                    recipe_tags::Entity::delete_many()
                        .filter(recipe_tags::Column::RecipeId.in_subquery(authored))
                        .exec(txn)
                        .await?;
                    recipes::Entity::delete_many()
                        .filter(recipes::Column::AuthorId.eq(id))
                        .exec(txn)
                        .await?;
                    let result = users::Entity::delete_by_id(id).exec(txn).await?;
                    Ok(result.rows_affected > 0)
                })
            })
            .await
            .context("delete user cascade")?;
        Ok(deleted)
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        username: model.username,
        first_name: model.first_name,
        last_name: model.last_name,
        created_at: model.created_at,
    }
}

// ── Catalog repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCatalogRepository {
    pub db: DatabaseConnection,
}

impl CatalogRepository for DbCatalogRepository {
    async fn list_tags(&self) -> Result<Vec<Tag>, RecipesServiceError> {
        let models = tags::Entity::find()
            .order_by_asc(tags::Column::Id)
            .all(&self.db)
            .await
            .context("list tags")?;
        Ok(models.into_iter().map(tag_from_model).collect())
    }

    async fn find_tag(&self, id: i32) -> Result<Option<Tag>, RecipesServiceError> {
        let model = tags::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find tag by id")?;
        Ok(model.map(tag_from_model))
    }

    async fn create_tag(&self, tag: &NewTag) -> Result<Option<Tag>, RecipesServiceError> {
        let result = tags::ActiveModel {
            name: Set(tag.name.clone()),
            color: Set(tag.color.clone()),
            slug: Set(tag.slug.clone()),
            ..Default::default()
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(model) => Ok(Some(tag_from_model(model))),
            Err(e) if is_unique_violation(&e) => Ok(None),
            Err(e) => Err(anyhow::Error::new(e).context("create tag").into()),
        }
    }

    async fn list_ingredients(
        &self,
        prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, RecipesServiceError> {
        let mut query = ingredients::Entity::find();
        if let Some(prefix) = prefix {
            let pattern = format!("{}%", escape_like(&prefix.to_lowercase()));
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(ingredients::Column::Name)))
                    .like(LikeExpr::new(pattern).escape('\\')),
            );
        }
        let models = query
            .order_by_asc(ingredients::Column::Name)
            .all(&self.db)
            .await
            .context("list ingredients")?;
        Ok(models.into_iter().map(ingredient_from_model).collect())
    }

    async fn find_ingredient(&self, id: i32) -> Result<Option<Ingredient>, RecipesServiceError> {
        let model = ingredients::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find ingredient by id")?;
        Ok(model.map(ingredient_from_model))
    }

    async fn upsert_ingredient(
        &self,
        name: &str,
        measurement_unit: &str,
    ) -> Result<Ingredient, RecipesServiceError> {
        ingredients::Entity::insert(ingredients::ActiveModel {
            name: Set(name.to_owned()),
            measurement_unit: Set(measurement_unit.to_owned()),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(ingredients::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("insert ingredient")?;

        let model = ingredients::Entity::find()
            .filter(ingredients::Column::Name.eq(name))
            .one(&self.db)
            .await
            .context("find ingredient by name")?
            .with_context(|| format!("ingredient {name:?} missing after upsert"))?;
        Ok(ingredient_from_model(model))
    }

    async fn existing_tag_ids(&self, ids: &[i32]) -> Result<Vec<i32>, RecipesServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let found = tags::Entity::find()
            .select_only()
            .column(tags::Column::Id)
            .filter(tags::Column::Id.is_in(ids.iter().copied()))
            .into_tuple::<i32>()
            .all(&self.db)
            .await
            .context("find existing tag ids")?;
        Ok(found)
    }

    async fn existing_ingredient_ids(&self, ids: &[i32]) -> Result<Vec<i32>, RecipesServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let found = ingredients::Entity::find()
            .select_only()
            .column(ingredients::Column::Id)
            .filter(ingredients::Column::Id.is_in(ids.iter().copied()))
            .into_tuple::<i32>()
            .all(&self.db)
            .await
            .context("find existing ingredient ids")?;
        Ok(found)
    }
}

fn tag_from_model(model: tags::Model) -> Tag {
    Tag {
        id: model.id,
        name: model.name,
        color: model.color,
        slug: model.slug,
    }
}

fn ingredient_from_model(model: ingredients::Model) -> Ingredient {
    Ingredient {
        id: model.id,
        name: model.name,
        measurement_unit: model.measurement_unit,
    }
}

// ── Recipe repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRecipeRepository {
    pub db: DatabaseConnection,
}

/// Insert tag links and ingredient lines for a recipe whose old ones are gone.
async fn insert_links<C: ConnectionTrait>(
    conn: &C,
    recipe_id: Uuid,
    tag_ids: &[i32],
    ingredients: &[IngredientAmount],
) -> Result<(), DbErr> {
    if !tag_ids.is_empty() {
        recipe_tags::Entity::insert_many(tag_ids.iter().map(|&tag_id| recipe_tags::ActiveModel {
            recipe_id: Set(recipe_id),
            tag_id: Set(tag_id),
        }))
        .exec_without_returning(conn)
        .await?;
    }
    if !ingredients.is_empty() {
        recipe_ingredients::Entity::insert_many(ingredients.iter().map(|line| {
            recipe_ingredients::ActiveModel {
                recipe_id: Set(recipe_id),
                ingredient_id: Set(line.ingredient_id),
                amount: Set(line.amount),
            }
        }))
        .exec_without_returning(conn)
        .await?;
    }
    Ok(())
}

impl RecipeRepository for DbRecipeRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipe>, RecipesServiceError> {
        let model = recipes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find recipe by id")?;
        Ok(model.map(recipe_from_model))
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Vec<Recipe>, RecipesServiceError> {
        let mut query = recipes::Entity::find();
        if let Some(author_id) = filter.author_id {
            query = query.filter(recipes::Column::AuthorId.eq(author_id));
        }
        if !filter.tag_slugs.is_empty() {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column((recipe_tags::Entity, recipe_tags::Column::RecipeId))
                        .from(recipe_tags::Entity)
                        .inner_join(
                            tags::Entity,
                            Expr::col((tags::Entity, tags::Column::Id))
                                .equals((recipe_tags::Entity, recipe_tags::Column::TagId)),
                        )
                        .and_where(
                            Expr::col((tags::Entity, tags::Column::Slug))
                                .is_in(filter.tag_slugs.iter().cloned()),
                        )
                        .to_owned(),
                ),
            );
        }
        if let Some(user_id) = filter.favorited_by {
            query = query
                .filter(recipes::Column::Id.in_subquery(edge_objects(EdgeKind::Favorite, user_id)));
        }
        if let Some(user_id) = filter.in_shopping_cart_of {
            query = query.filter(
                recipes::Column::Id.in_subquery(edge_objects(EdgeKind::ShoppingCart, user_id)),
            );
        }
        let models = query
            .order_by_asc(recipes::Column::CreatedAt)
            .order_by_asc(recipes::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list recipes")?;
        Ok(models.into_iter().map(recipe_from_model).collect())
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<Recipe>, RecipesServiceError> {
        let models = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author_id))
            .order_by_asc(recipes::Column::CreatedAt)
            .order_by_asc(recipes::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list recipes by author")?;
        Ok(models.into_iter().map(recipe_from_model).collect())
    }

    async fn create(
        &self,
        recipe: &Recipe,
        tag_ids: &[i32],
        ingredients: &[IngredientAmount],
    ) -> Result<(), RecipesServiceError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                let recipe = recipe.clone();
                let tag_ids = tag_ids.to_vec();
                let ingredients = ingredients.to_vec();
                Box::pin(async move {
                    recipes::ActiveModel {
                        id: Set(recipe.id),
                        author_id: Set(recipe.author_id),
                        name: Set(recipe.name.clone()),
                        text: Set(recipe.text.clone()),
                        image: Set(recipe.image.clone()),
                        cooking_time: Set(recipe.cooking_time),
                        created_at: Set(recipe.created_at),
                    }
                    .insert(txn)
                    .await?;
                    insert_links(txn, recipe.id, &tag_ids, &ingredients).await
                })
            })
            .await
            .map_err(|e| match txn_db_err(e) {
                // the only parent not checked beforehand is the author
                e if is_foreign_key_violation(&e) => RecipesServiceError::UserNotFound,
                e => anyhow::Error::new(e).context("create recipe").into(),
            })
    }

    async fn replace(
        &self,
        recipe: &Recipe,
        tag_ids: &[i32],
        ingredients: &[IngredientAmount],
    ) -> Result<(), RecipesServiceError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                let recipe = recipe.clone();
                let tag_ids = tag_ids.to_vec();
                let ingredients = ingredients.to_vec();
                Box::pin(async move {
                    recipes::ActiveModel {
                        id: Set(recipe.id),
                        name: Set(recipe.name.clone()),
                        text: Set(recipe.text.clone()),
                        image: Set(recipe.image.clone()),
                        cooking_time: Set(recipe.cooking_time),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;
                    recipe_tags::Entity::delete_many()
                        .filter(recipe_tags::Column::RecipeId.eq(recipe.id))
                        .exec(txn)
                        .await?;
                    recipe_ingredients::Entity::delete_many()
                        .filter(recipe_ingredients::Column::RecipeId.eq(recipe.id))
                        .exec(txn)
                        .await?;
                    insert_links(txn, recipe.id, &tag_ids, &ingredients).await
                })
            })
            .await
            .map_err(|e| match txn_db_err(e) {
                DbErr::RecordNotUpdated => RecipesServiceError::RecipeNotFound,
                e => anyhow::Error::new(e).context("replace recipe").into(),
            })
    }

    async fn delete_cascade(&self, id: Uuid) -> Result<bool, RecipesServiceError> {
        let deleted = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    let recipe = recipes::Entity::find_by_id(id)
                        .select_only()
                        .column(recipes::Column::Id)
                        .lock_exclusive()
                        .into_tuple::<Uuid>()
                        .one(txn)
                        .await?;
                    if recipe.is_none() {
                        return Ok(false);
                    }
                    edges::Entity::delete_many()
                        .filter(edges::Column::Kind.is_in(recipe_edge_kinds()))
                        .filter(edges::Column::ObjectId.eq(id))
                        .exec(txn)
                        .await?;
                    recipe_ingredients::Entity::delete_many()
                        .filter(recipe_ingredients::Column::RecipeId.eq(id))
                        .exec(txn)
                        .await?;
                    recipe_tags::Entity::delete_many()
                        .filter(recipe_tags::Column::RecipeId.eq(id))
                        .exec(txn)
                        .await?;
                    let result = recipes::Entity::delete_by_id(id).exec(txn).await?;
                    Ok(result.rows_affected > 0)
                })
            })
            .await
            .context("delete recipe cascade")?;
        Ok(deleted)
    }

    async fn tags(&self, recipe_id: Uuid) -> Result<Vec<Tag>, RecipesServiceError> {
        let rows = recipe_tags::Entity::find()
            .filter(recipe_tags::Column::RecipeId.eq(recipe_id))
            .find_also_related(tags::Entity)
            .all(&self.db)
            .await
            .context("list recipe tags")?;
        let mut tags: Vec<Tag> = rows
            .into_iter()
            .filter_map(|(_, tag)| tag.map(tag_from_model))
            .collect();
        tags.sort_by_key(|tag| tag.id);
        Ok(tags)
    }

    async fn ingredient_lines(
        &self,
        recipe_id: Uuid,
    ) -> Result<Vec<IngredientLine>, RecipesServiceError> {
        let mut lines = self.ingredient_lines_for(&[recipe_id]).await?;
        lines.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then(a.ingredient_id.cmp(&b.ingredient_id))
        });
        Ok(lines)
    }

    async fn ingredient_lines_for(
        &self,
        recipe_ids: &[Uuid],
    ) -> Result<Vec<IngredientLine>, RecipesServiceError> {
        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = recipe_ingredients::Entity::find()
            .filter(recipe_ingredients::Column::RecipeId.is_in(recipe_ids.iter().copied()))
            .find_also_related(ingredients::Entity)
            .all(&self.db)
            .await
            .context("list recipe ingredient lines")?;
        Ok(rows
            .into_iter()
            .filter_map(|(line, ingredient)| {
                ingredient.map(|ingredient| IngredientLine {
                    ingredient_id: line.ingredient_id,
                    name: ingredient.name,
                    measurement_unit: ingredient.measurement_unit,
                    amount: line.amount,
                })
            })
            .collect())
    }
}

fn recipe_from_model(model: recipes::Model) -> Recipe {
    Recipe {
        id: model.id,
        author_id: model.author_id,
        name: model.name,
        text: model.text,
        image: model.image,
        cooking_time: model.cooking_time,
        created_at: model.created_at,
    }
}

// ── Edge repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEdgeRepository {
    pub db: DatabaseConnection,
}

impl EdgeRepository for DbEdgeRepository {
    async fn insert(&self, edge: &Edge) -> Result<bool, RecipesServiceError> {
        let inserted = self
            .db
            .transaction::<_, Option<bool>, DbErr>(|txn| {
                let edge = edge.clone();
                Box::pin(async move {
                    if !lock_edge_target(txn, edge.kind, edge.object_id).await? {
                        return Ok(None);
                    }
                    let rows = edges::Entity::insert(edges::ActiveModel {
                        kind: Set(edge.kind.as_str().to_owned()),
                        subject_id: Set(edge.subject_id),
                        object_id: Set(edge.object_id),
                        created_at: Set(edge.created_at),
                    })
                    .on_conflict(
                        OnConflict::columns([
                            edges::Column::Kind,
                            edges::Column::SubjectId,
                            edges::Column::ObjectId,
                        ])
                        .do_nothing()
                        .to_owned(),
                    )
                    .exec_without_returning(txn)
                    .await?;
                    Ok(Some(rows > 0))
                })
            })
            .await
            .map_err(txn_db_err);
        match inserted {
            Ok(Some(inserted)) => Ok(inserted),
            Ok(None) => Err(match edge.kind.target() {
                EdgeTarget::Recipe => RecipesServiceError::RecipeNotFound,
                EdgeTarget::User => RecipesServiceError::UserNotFound,
            }),
            // the subject has no users row
            Err(e) if is_foreign_key_violation(&e) => Err(RecipesServiceError::UserNotFound),
            Err(e) => Err(anyhow::Error::new(e).context("insert edge").into()),
        }
    }

    async fn delete(
        &self,
        kind: EdgeKind,
        subject_id: Uuid,
        object_id: Uuid,
    ) -> Result<bool, RecipesServiceError> {
        let result = edges::Entity::delete_many()
            .filter(edges::Column::Kind.eq(kind.as_str()))
            .filter(edges::Column::SubjectId.eq(subject_id))
            .filter(edges::Column::ObjectId.eq(object_id))
            .exec(&self.db)
            .await
            .context("delete edge")?;
        Ok(result.rows_affected > 0)
    }

    async fn exists(
        &self,
        kind: EdgeKind,
        subject_id: Uuid,
        object_id: Uuid,
    ) -> Result<bool, RecipesServiceError> {
        let model = edges::Entity::find_by_id((kind.as_str().to_owned(), subject_id, object_id))
            .one(&self.db)
            .await
            .context("find edge")?;
        Ok(model.is_some())
    }

    async fn list_objects(
        &self,
        kind: EdgeKind,
        subject_id: Uuid,
    ) -> Result<Vec<Uuid>, RecipesServiceError> {
        let ids = edges::Entity::find()
            .select_only()
            .column(edges::Column::ObjectId)
            .filter(edges::Column::Kind.eq(kind.as_str()))
            .filter(edges::Column::SubjectId.eq(subject_id))
            .order_by_asc(edges::Column::CreatedAt)
            .order_by_asc(edges::Column::ObjectId)
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
            .context("list edge objects")?;
        Ok(ids)
    }
}
