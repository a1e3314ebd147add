use tracing::debug;
use uuid::Uuid;

use crate::domain::repository::{EdgeRepository, RecipeRepository};
use crate::domain::shopping_list::compile;
use crate::domain::types::{EdgeKind, ShoppingListItem};
use crate::error::RecipesServiceError;

// ── CompileShoppingList ──────────────────────────────────────────────────────

pub struct CompileShoppingListUseCase<E: EdgeRepository, R: RecipeRepository> {
    pub edges: E,
    pub recipes: R,
}

impl<E: EdgeRepository, R: RecipeRepository> CompileShoppingListUseCase<E, R> {
    /// Sum the ingredients of every recipe in the user's cart.
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<ShoppingListItem>, RecipesServiceError> {
        let recipe_ids = self
            .edges
            .list_objects(EdgeKind::ShoppingCart, user_id)
            .await?;
        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }
        let lines = self.recipes.ingredient_lines_for(&recipe_ids).await?;
        let items = compile(&lines);
        debug!(
            user_id = %user_id,
            recipes = recipe_ids.len(),
            lines = lines.len(),
            items = items.len(),
            "shopping list compiled"
        );
        Ok(items)
    }
}
