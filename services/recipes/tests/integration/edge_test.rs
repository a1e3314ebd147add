use chrono::{Duration, Utc};
use uuid::Uuid;

use foodgram_domain::pagination::PageRequest;
use foodgram_domain::user::UserRole;
use foodgram_recipes::domain::repository::{EdgeRepository, UserRepository};
use foodgram_recipes::domain::types::{Edge, EdgeKind};
use foodgram_recipes::error::RecipesServiceError;
use foodgram_recipes::usecase::edge::{
    AddEdgeUseCase, ListSubscriptionsUseCase, RemoveEdgeUseCase,
};
use foodgram_recipes::usecase::recipe::DeleteRecipeUseCase;
use foodgram_recipes::usecase::user::DeleteUserUseCase;

use crate::helpers::{MemoryStore, insert_recipe};

fn add_usecase(store: &MemoryStore) -> AddEdgeUseCase<MemoryStore, MemoryStore, MemoryStore> {
    AddEdgeUseCase {
        edges: store.clone(),
        recipes: store.clone(),
        users: store.clone(),
    }
}

fn subscribe_at(store: &MemoryStore, subject_id: Uuid, object_id: Uuid, age_secs: i64) {
    store.tables.lock().unwrap().edges.push(Edge {
        kind: EdgeKind::Subscription,
        subject_id,
        object_id,
        created_at: Utc::now() - Duration::seconds(age_secs),
    });
}

// ── AddEdge / RemoveEdge ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_accept_first_edge_and_reject_duplicate_for_every_kind() {
    let store = MemoryStore::new();
    let user = store.add_user("alice");
    let author = store.add_user("julia");
    let recipe = insert_recipe(&store, author, "Pancakes", 0);
    let uc = add_usecase(&store);

    for (kind, object) in [
        (EdgeKind::Favorite, recipe),
        (EdgeKind::ShoppingCart, recipe),
        (EdgeKind::Subscription, author),
    ] {
        uc.execute(kind, user, object).await.unwrap();
        let again = uc.execute(kind, user, object).await;
        assert!(
            matches!(again, Err(RecipesServiceError::DuplicateEdge)),
            "expected DuplicateEdge for {kind}, got {again:?}"
        );
        assert_eq!(store.edge_count(kind), 1);
    }
}

#[tokio::test]
async fn should_always_reject_self_subscription() {
    let store = MemoryStore::new();
    let user = store.add_user("alice");
    let result = add_usecase(&store)
        .execute(EdgeKind::Subscription, user, user)
        .await;
    assert!(matches!(result, Err(RecipesServiceError::SelfSubscription)));
    assert_eq!(store.edge_count(EdgeKind::Subscription), 0);
}

#[tokio::test]
async fn should_require_existing_targets() {
    let store = MemoryStore::new();
    let user = store.add_user("alice");
    let uc = add_usecase(&store);

    let missing_recipe = uc.execute(EdgeKind::Favorite, user, Uuid::now_v7()).await;
    assert!(matches!(missing_recipe, Err(RecipesServiceError::RecipeNotFound)));

    let missing_author = uc
        .execute(EdgeKind::Subscription, user, Uuid::now_v7())
        .await;
    assert!(matches!(missing_author, Err(RecipesServiceError::UserNotFound)));
}

#[tokio::test]
async fn should_not_leave_edges_to_deleted_recipes() {
    let store = MemoryStore::new();
    let user = store.add_user("alice");
    let recipe = insert_recipe(&store, user, "Pancakes", 0);
    DeleteRecipeUseCase {
        recipes: store.clone(),
    }
    .execute(recipe, user)
    .await
    .unwrap();

    let result = add_usecase(&store)
        .execute(EdgeKind::ShoppingCart, user, recipe)
        .await;
    assert!(matches!(result, Err(RecipesServiceError::RecipeNotFound)));
    assert!(
        store
            .list_objects(EdgeKind::ShoppingCart, user)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn should_return_targets_of_new_edges() {
    let store = MemoryStore::new();
    let reader = store.add_user("reader");
    let julia = store.add_user("julia");
    let recipe = insert_recipe(&store, julia, "Soup", 0);
    let uc = add_usecase(&store);

    let favorited = uc
        .add_recipe(EdgeKind::Favorite, reader, recipe)
        .await
        .unwrap();
    assert_eq!(favorited.name, "Soup");

    let followed = uc.subscribe(reader, julia).await.unwrap();
    assert_eq!(followed.user.username, "julia");
    assert_eq!(followed.recipes_count, 1);
    assert!(followed.is_subscribed);
}

#[tokio::test]
async fn should_report_edge_not_found_on_second_remove() {
    let store = MemoryStore::new();
    let user = store.add_user("alice");
    let recipe = insert_recipe(&store, user, "Pancakes", 0);
    add_usecase(&store)
        .execute(EdgeKind::Favorite, user, recipe)
        .await
        .unwrap();

    let remove = RemoveEdgeUseCase {
        edges: store.clone(),
    };
    remove.execute(EdgeKind::Favorite, user, recipe).await.unwrap();
    let again = remove.execute(EdgeKind::Favorite, user, recipe).await;
    assert!(matches!(again, Err(RecipesServiceError::EdgeNotFound)));
}

#[tokio::test]
async fn should_keep_edge_kinds_apart() {
    let store = MemoryStore::new();
    let user = store.add_user("alice");
    let recipe = insert_recipe(&store, user, "Pancakes", 0);
    add_usecase(&store)
        .execute(EdgeKind::Favorite, user, recipe)
        .await
        .unwrap();

    assert!(store.exists(EdgeKind::Favorite, user, recipe).await.unwrap());
    assert!(!store.exists(EdgeKind::ShoppingCart, user, recipe).await.unwrap());
    let remove = RemoveEdgeUseCase {
        edges: store.clone(),
    };
    let wrong_kind = remove.execute(EdgeKind::ShoppingCart, user, recipe).await;
    assert!(matches!(wrong_kind, Err(RecipesServiceError::EdgeNotFound)));
}

// ── ListSubscriptions ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_followed_authors_with_limited_recipes() {
    let store = MemoryStore::new();
    let reader = store.add_user("reader");
    let julia = store.add_user("julia");
    let jamie = store.add_user("jamie");
    for (i, name) in ["Soup", "Stew", "Pie"].iter().enumerate() {
        insert_recipe(&store, julia, name, 30 - i as i64);
    }
    insert_recipe(&store, jamie, "Salad", 5);
    subscribe_at(&store, reader, julia, 100);
    subscribe_at(&store, reader, jamie, 50);

    let uc = ListSubscriptionsUseCase {
        edges: store.clone(),
        users: store.clone(),
        recipes: store.clone(),
    };
    let subscriptions = uc
        .execute(reader, Some(2), PageRequest::default())
        .await
        .unwrap();

    assert_eq!(subscriptions.len(), 2);
    assert_eq!(subscriptions[0].author.user.id, julia);
    assert_eq!(subscriptions[0].author.recipes_count, 3);
    assert!(subscriptions[0].author.is_subscribed);
    let names: Vec<&str> = subscriptions[0]
        .recipes
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(names, vec!["Soup", "Stew"]);
    assert_eq!(subscriptions[1].author.user.id, jamie);
    assert_eq!(subscriptions[1].recipes.len(), 1);

    let second_page = uc
        .execute(reader, None, PageRequest { per_page: 1, page: 2 })
        .await
        .unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].author.user.id, jamie);
}

// ── DeleteUser cascade ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_remove_user_recipes_and_edges_on_delete() {
    let store = MemoryStore::new();
    let julia = store.add_user("julia");
    let reader = store.add_user("reader");
    let her_recipe = insert_recipe(&store, julia, "Soup", 10);
    let his_recipe = insert_recipe(&store, reader, "Toast", 5);
    let uc = add_usecase(&store);
    uc.execute(EdgeKind::Favorite, reader, her_recipe).await.unwrap();
    uc.execute(EdgeKind::Favorite, reader, his_recipe).await.unwrap();
    uc.execute(EdgeKind::Subscription, reader, julia).await.unwrap();
    uc.execute(EdgeKind::ShoppingCart, julia, his_recipe).await.unwrap();

    let delete = DeleteUserUseCase {
        users: store.clone(),
    };
    delete.execute(julia, UserRole::User, julia).await.unwrap();

    assert!(store.find_by_id(julia).await.unwrap().is_none());
    assert_eq!(store.recipe_count(), 1);
    assert_eq!(store.edge_count(EdgeKind::Subscription), 0);
    assert_eq!(store.edge_count(EdgeKind::ShoppingCart), 0);
    assert_eq!(store.edge_count(EdgeKind::Favorite), 1);
    assert!(store.exists(EdgeKind::Favorite, reader, his_recipe).await.unwrap());
}
