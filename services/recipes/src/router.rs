use axum::{
    Router,
    routing::{get, post},
};

use foodgram_core::health::healthz;
use foodgram_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    edge::{
        add_favorite, add_to_shopping_cart, get_subscriptions, remove_favorite,
        remove_from_shopping_cart, subscribe, unsubscribe,
    },
    health::readyz,
    ingredient::{get_ingredient, list_ingredients, upsert_ingredient},
    recipe::{create_recipe, delete_recipe, get_recipe, list_recipes, update_recipe},
    shopping_list::download_shopping_cart,
    tag::{create_tag, get_tag, list_tags},
    user::{create_user, delete_user, get_me, get_user},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Catalog
        .route("/tags", get(list_tags).post(create_tag))
        .route("/tags/{id}", get(get_tag))
        .route("/ingredients", get(list_ingredients).post(upsert_ingredient))
        .route("/ingredients/{id}", get(get_ingredient))
        // Recipes
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/recipes/download-shopping-cart",
            get(download_shopping_cart),
        )
        .route(
            "/recipes/{id}",
            get(get_recipe).patch(update_recipe).delete(delete_recipe),
        )
        .route(
            "/recipes/{id}/favorite",
            post(add_favorite).delete(remove_favorite),
        )
        .route(
            "/recipes/{id}/shopping-cart",
            post(add_to_shopping_cart).delete(remove_from_shopping_cart),
        )
        // Users
        .route("/users", post(create_user))
        .route("/users/@me", get(get_me))
        .route("/users/@me/subscriptions", get(get_subscriptions))
        .route("/users/{id}", get(get_user).delete(delete_user))
        .route("/users/{id}/subscribe", post(subscribe).delete(unsubscribe))
        .with_state(state)
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
}
