use uuid::Uuid;

use foodgram_domain::pagination::PageRequest;
use foodgram_recipes::domain::repository::RecipeRepository;
use foodgram_recipes::domain::types::EdgeKind;
use foodgram_recipes::error::RecipesServiceError;
use foodgram_recipes::usecase::edge::AddEdgeUseCase;
use foodgram_recipes::usecase::recipe::{
    CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeUseCase, ListRecipesQuery,
    ListRecipesUseCase, UpdateRecipeUseCase,
};

use crate::helpers::{MemoryStore, insert_recipe, recipe_input};

struct Kitchen {
    store: MemoryStore,
    author: Uuid,
    breakfast: i32,
    dinner: i32,
    flour: i32,
    milk: i32,
    salt: i32,
}

fn kitchen() -> Kitchen {
    let store = MemoryStore::new();
    let author = store.add_user("julia");
    let breakfast = store.add_tag("Breakfast", "breakfast");
    let dinner = store.add_tag("Dinner", "dinner");
    let flour = store.add_ingredient("Flour", "g");
    let milk = store.add_ingredient("Milk", "ml");
    let salt = store.add_ingredient("Salt", "g");
    Kitchen {
        store,
        author,
        breakfast,
        dinner,
        flour,
        milk,
        salt,
    }
}

fn create_usecase(store: &MemoryStore) -> CreateRecipeUseCase<MemoryStore, MemoryStore> {
    CreateRecipeUseCase {
        recipes: store.clone(),
        catalog: store.clone(),
    }
}

fn add_edge_usecase(store: &MemoryStore) -> AddEdgeUseCase<MemoryStore, MemoryStore, MemoryStore> {
    AddEdgeUseCase {
        edges: store.clone(),
        recipes: store.clone(),
        users: store.clone(),
    }
}

// ── CreateRecipe ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_persist_recipe_with_tags_and_lines() {
    let k = kitchen();
    let recipe = create_usecase(&k.store)
        .execute(
            k.author,
            recipe_input("Pancakes", vec![k.breakfast], &[(k.flour, 200), (k.milk, 300)]),
        )
        .await
        .unwrap();

    assert_eq!(k.store.recipe_count(), 1);
    assert_eq!(k.store.line_count(recipe.id), 2);
    let lines = k.store.ingredient_lines(recipe.id).await.unwrap();
    let names: Vec<&str> = lines.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Flour", "Milk"]);
}

#[tokio::test]
async fn should_write_nothing_for_invalid_recipes() {
    let k = kitchen();
    let uc = create_usecase(&k.store);

    let no_tags = uc
        .execute(k.author, recipe_input("Toast", vec![], &[(k.flour, 1)]))
        .await;
    assert!(matches!(no_tags, Err(RecipesServiceError::MissingTag)));

    let no_lines = uc
        .execute(k.author, recipe_input("Toast", vec![k.breakfast], &[]))
        .await;
    assert!(matches!(no_lines, Err(RecipesServiceError::MissingIngredient)));

    let mut zero_time = recipe_input("Toast", vec![k.breakfast], &[(k.flour, 1)]);
    zero_time.cooking_time = 0;
    let zero_time = uc.execute(k.author, zero_time).await;
    assert!(matches!(zero_time, Err(RecipesServiceError::InvalidCookingTime)));

    let unknown_tag = uc
        .execute(k.author, recipe_input("Toast", vec![99], &[(k.flour, 1)]))
        .await;
    assert!(matches!(unknown_tag, Err(RecipesServiceError::UnknownTag(99))));

    let unknown_ingredient = uc
        .execute(k.author, recipe_input("Toast", vec![k.breakfast], &[(42, 1)]))
        .await;
    assert!(matches!(
        unknown_ingredient,
        Err(RecipesServiceError::UnknownIngredient(42))
    ));

    assert_eq!(k.store.recipe_count(), 0);
    assert!(k.store.tables.lock().unwrap().lines.is_empty());
    assert!(k.store.tables.lock().unwrap().recipe_tags.is_empty());
}

// ── UpdateRecipe ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_replace_lines_and_tags_entirely_on_update() {
    let k = kitchen();
    let recipe = create_usecase(&k.store)
        .execute(
            k.author,
            recipe_input("Pancakes", vec![k.breakfast], &[(k.flour, 200), (k.milk, 300)]),
        )
        .await
        .unwrap();

    let uc = UpdateRecipeUseCase {
        recipes: k.store.clone(),
        catalog: k.store.clone(),
    };
    let updated = uc
        .execute(
            recipe.id,
            k.author,
            recipe_input("Salted pancakes", vec![k.dinner], &[(k.salt, 5)]),
        )
        .await
        .unwrap();
    assert_eq!(updated.id, recipe.id);
    assert_eq!(updated.created_at, recipe.created_at);

    let lines = k.store.ingredient_lines(recipe.id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].name, "Salt");
    assert_eq!(lines[0].amount, 5);
    let tags = k.store.tags(recipe.id).await.unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].slug, "dinner");
}

#[tokio::test]
async fn should_reject_update_by_non_author() {
    let k = kitchen();
    let stranger = k.store.add_user("stranger");
    let recipe = create_usecase(&k.store)
        .execute(k.author, recipe_input("Pancakes", vec![k.breakfast], &[(k.flour, 200)]))
        .await
        .unwrap();

    let uc = UpdateRecipeUseCase {
        recipes: k.store.clone(),
        catalog: k.store.clone(),
    };
    let result = uc
        .execute(
            recipe.id,
            stranger,
            recipe_input("Mine now", vec![k.dinner], &[(k.salt, 1)]),
        )
        .await;
    assert!(matches!(result, Err(RecipesServiceError::NotOwner)));
    assert_eq!(k.store.ingredient_lines(recipe.id).await.unwrap()[0].name, "Flour");
}

// ── DeleteRecipe ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_remove_cart_edges_of_every_user_on_delete() {
    let k = kitchen();
    let alice = k.store.add_user("alice");
    let bob = k.store.add_user("bob");
    let doomed = create_usecase(&k.store)
        .execute(k.author, recipe_input("Pancakes", vec![k.breakfast], &[(k.flour, 200)]))
        .await
        .unwrap();
    let kept = create_usecase(&k.store)
        .execute(k.author, recipe_input("Soup", vec![k.dinner], &[(k.salt, 3)]))
        .await
        .unwrap();

    let add = add_edge_usecase(&k.store);
    add.execute(EdgeKind::ShoppingCart, alice, doomed.id).await.unwrap();
    add.execute(EdgeKind::ShoppingCart, bob, doomed.id).await.unwrap();
    add.execute(EdgeKind::Favorite, alice, kept.id).await.unwrap();

    let uc = DeleteRecipeUseCase {
        recipes: k.store.clone(),
    };
    uc.execute(doomed.id, k.author).await.unwrap();

    assert_eq!(k.store.edge_count(EdgeKind::ShoppingCart), 0);
    assert_eq!(k.store.edge_count(EdgeKind::Favorite), 1);
    assert_eq!(k.store.line_count(doomed.id), 0);
    assert_eq!(k.store.line_count(kept.id), 1);
    assert!(k.store.find_by_id(doomed.id).await.unwrap().is_none());

    let again = uc.execute(doomed.id, k.author).await;
    assert!(matches!(again, Err(RecipesServiceError::RecipeNotFound)));
}

// ── GetRecipe / ListRecipes ──────────────────────────────────────────────────

#[tokio::test]
async fn should_derive_viewer_flags_on_read() {
    let k = kitchen();
    let viewer = k.store.add_user("viewer");
    let recipe = create_usecase(&k.store)
        .execute(k.author, recipe_input("Pancakes", vec![k.breakfast], &[(k.flour, 200)]))
        .await
        .unwrap();
    let add = add_edge_usecase(&k.store);
    add.execute(EdgeKind::Favorite, viewer, recipe.id).await.unwrap();
    add.execute(EdgeKind::Subscription, viewer, k.author).await.unwrap();

    let uc = GetRecipeUseCase {
        recipes: k.store.clone(),
        users: k.store.clone(),
        edges: k.store.clone(),
    };
    let detail = uc.execute(recipe.id, Some(viewer)).await.unwrap();
    assert!(detail.is_favorited);
    assert!(!detail.is_in_shopping_cart);
    assert!(detail.author.is_subscribed);
    assert_eq!(detail.author.recipes_count, 1);

    let anonymous = uc.execute(recipe.id, None).await.unwrap();
    assert!(!anonymous.is_favorited);
    assert!(!anonymous.author.is_subscribed);
}

#[tokio::test]
async fn should_filter_recipes_by_tag_and_viewer_lists() {
    let k = kitchen();
    let viewer = k.store.add_user("viewer");
    let pancakes = insert_recipe(&k.store, k.author, "Pancakes", 30);
    let soup = insert_recipe(&k.store, k.author, "Soup", 20);
    let omelette = insert_recipe(&k.store, k.author, "Omelette", 10);
    {
        let mut tables = k.store.tables.lock().unwrap();
        tables.recipe_tags.push((pancakes, k.breakfast));
        tables.recipe_tags.push((soup, k.dinner));
        tables.recipe_tags.push((omelette, k.breakfast));
    }
    add_edge_usecase(&k.store)
        .execute(EdgeKind::Favorite, viewer, omelette)
        .await
        .unwrap();

    let uc = ListRecipesUseCase {
        recipes: k.store.clone(),
        users: k.store.clone(),
        edges: k.store.clone(),
    };

    let by_tag = uc
        .execute(
            ListRecipesQuery {
                tag_slugs: vec!["breakfast".into()],
                ..Default::default()
            },
            PageRequest::default(),
            None,
        )
        .await
        .unwrap();
    let ids: Vec<Uuid> = by_tag.iter().map(|d| d.recipe.id).collect();
    assert_eq!(ids, vec![pancakes, omelette]);

    let favorited = ListRecipesQuery {
        is_favorited: true,
        ..Default::default()
    };
    let mine = uc
        .execute(favorited.clone(), PageRequest::default(), Some(viewer))
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].recipe.id, omelette);
    assert!(mine[0].is_favorited);

    let anonymous = uc
        .execute(favorited, PageRequest::default(), None)
        .await
        .unwrap();
    assert_eq!(anonymous.len(), 3);
}

#[tokio::test]
async fn should_paginate_recipes_oldest_first() {
    let k = kitchen();
    let first = insert_recipe(&k.store, k.author, "First", 30);
    let second = insert_recipe(&k.store, k.author, "Second", 20);
    let third = insert_recipe(&k.store, k.author, "Third", 10);

    let uc = ListRecipesUseCase {
        recipes: k.store.clone(),
        users: k.store.clone(),
        edges: k.store.clone(),
    };
    let page = |page| PageRequest { per_page: 2, page };
    let one = uc
        .execute(ListRecipesQuery::default(), page(1), None)
        .await
        .unwrap();
    let two = uc
        .execute(ListRecipesQuery::default(), page(2), None)
        .await
        .unwrap();
    assert_eq!(
        one.iter().map(|d| d.recipe.id).collect::<Vec<_>>(),
        vec![first, second]
    );
    assert_eq!(
        two.iter().map(|d| d.recipe.id).collect::<Vec<_>>(),
        vec![third]
    );
}
