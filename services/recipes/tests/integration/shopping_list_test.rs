use chrono::{Duration, Utc};
use uuid::Uuid;

use foodgram_recipes::domain::types::{Edge, EdgeKind, IngredientAmount, ShoppingListItem};
use foodgram_recipes::render::ShoppingListFormat;
use foodgram_recipes::usecase::shopping_list::CompileShoppingListUseCase;

use crate::helpers::{MemoryStore, insert_recipe};

struct Pantry {
    store: MemoryStore,
    shopper: Uuid,
    recipe_a: Uuid,
    recipe_b: Uuid,
}

/// A = (Flour, g, 200); B = (Flour, g, 300), (Salt, g, 5)
fn pantry() -> Pantry {
    let store = MemoryStore::new();
    let author = store.add_user("julia");
    let shopper = store.add_user("shopper");
    let flour = store.add_ingredient("Flour", "g");
    let salt = store.add_ingredient("Salt", "g");
    let recipe_a = insert_recipe(&store, author, "Bread", 20);
    let recipe_b = insert_recipe(&store, author, "Pretzels", 10);
    {
        let mut tables = store.tables.lock().unwrap();
        let line = |ingredient_id, amount| IngredientAmount {
            ingredient_id,
            amount,
        };
        tables.lines.push((recipe_a, line(flour, 200)));
        tables.lines.push((recipe_b, line(flour, 300)));
        tables.lines.push((recipe_b, line(salt, 5)));
    }
    Pantry {
        store,
        shopper,
        recipe_a,
        recipe_b,
    }
}

fn put_in_cart(store: &MemoryStore, subject_id: Uuid, object_id: Uuid, age_secs: i64) {
    store.tables.lock().unwrap().edges.push(Edge {
        kind: EdgeKind::ShoppingCart,
        subject_id,
        object_id,
        created_at: Utc::now() - Duration::seconds(age_secs),
    });
}

fn item(name: &str, unit: &str, amount: i64) -> ShoppingListItem {
    ShoppingListItem {
        name: name.into(),
        measurement_unit: unit.into(),
        amount,
    }
}

async fn compile_for(store: &MemoryStore, user_id: Uuid) -> Vec<ShoppingListItem> {
    CompileShoppingListUseCase {
        edges: store.clone(),
        recipes: store.clone(),
    }
    .execute(user_id)
    .await
    .unwrap()
}

#[tokio::test]
async fn should_sum_lines_across_cart_recipes() {
    let p = pantry();
    put_in_cart(&p.store, p.shopper, p.recipe_a, 10);
    put_in_cart(&p.store, p.shopper, p.recipe_b, 5);

    let items = compile_for(&p.store, p.shopper).await;
    assert_eq!(items, vec![item("Flour", "g", 500), item("Salt", "g", 5)]);
}

#[tokio::test]
async fn should_not_depend_on_cart_insertion_order() {
    let forward = pantry();
    put_in_cart(&forward.store, forward.shopper, forward.recipe_a, 10);
    put_in_cart(&forward.store, forward.shopper, forward.recipe_b, 5);

    let backward = pantry();
    put_in_cart(&backward.store, backward.shopper, backward.recipe_b, 10);
    put_in_cart(&backward.store, backward.shopper, backward.recipe_a, 5);

    assert_eq!(
        compile_for(&forward.store, forward.shopper).await,
        compile_for(&backward.store, backward.shopper).await
    );
}

#[tokio::test]
async fn should_only_use_the_requesting_users_cart() {
    let p = pantry();
    let other = p.store.add_user("other");
    put_in_cart(&p.store, other, p.recipe_b, 10);
    put_in_cart(&p.store, p.shopper, p.recipe_a, 5);

    let items = compile_for(&p.store, p.shopper).await;
    assert_eq!(items, vec![item("Flour", "g", 200)]);
}

#[tokio::test]
async fn should_render_empty_cart_as_header_only_csv() {
    let p = pantry();
    let items = compile_for(&p.store, p.shopper).await;
    assert!(items.is_empty());
    assert_eq!(
        ShoppingListFormat::Csv.render(&items),
        "name,measurement_unit,amount\r\n"
    );
}

#[tokio::test]
async fn should_render_compiled_list_as_txt() {
    let p = pantry();
    put_in_cart(&p.store, p.shopper, p.recipe_a, 10);
    put_in_cart(&p.store, p.shopper, p.recipe_b, 5);

    let items = compile_for(&p.store, p.shopper).await;
    assert_eq!(
        ShoppingListFormat::Txt.render(&items),
        "Flour (g) - 500\nSalt (g) - 5\n"
    );
}
