use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Minimal user profile. Credentials are handled by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

/// A user as seen by a viewer, with values derived on read.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: User,
    pub recipes_count: u64,
    pub is_subscribed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    /// Canonical lowercase CSS color name.
    pub color: String,
    pub slug: String,
}

/// Tag fields before the store assigns an id. `color` is already normalized.
#[derive(Debug, Clone)]
pub struct NewTag {
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

/// Recipe header. Tags and ingredient lines are loaded separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: Uuid,
    pub author_id: Uuid,
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
}

/// Requested quantity of one ingredient in a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub ingredient_id: i32,
    pub amount: i32,
}

/// A stored recipe ingredient joined with its catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientLine {
    pub ingredient_id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Full recipe read model for a (possibly anonymous) viewer.
#[derive(Debug, Clone)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub author: UserProfile,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<IngredientLine>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// A followed author with a preview of their recipes.
#[derive(Debug, Clone)]
pub struct Subscription {
    pub author: UserProfile,
    pub recipes: Vec<Recipe>,
}

/// Recipe list filter. Viewer-relative filters are resolved to user ids by the caller.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub author_id: Option<Uuid>,
    /// Matches recipes carrying any of these tag slugs. Empty means no tag filter.
    pub tag_slugs: Vec<String>,
    pub favorited_by: Option<Uuid>,
    pub in_shopping_cart_of: Option<Uuid>,
}

/// One merged shopping list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

// ── Edges ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Favorite,
    ShoppingCart,
    Subscription,
}

/// What the object side of an edge points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeTarget {
    Recipe,
    User,
}

impl EdgeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Favorite => "favorite",
            Self::ShoppingCart => "shopping_cart",
            Self::Subscription => "subscription",
        }
    }

    pub fn target(self) -> EdgeTarget {
        match self {
            Self::Favorite | Self::ShoppingCart => EdgeTarget::Recipe,
            Self::Subscription => EdgeTarget::User,
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directed relationship: `subject` favorites, carts, or follows `object`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub kind: EdgeKind,
    pub subject_id: Uuid,
    pub object_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// ── Validation ───────────────────────────────────────────────────────────────

/// Validate a username: 1-150 chars of letters, digits and `_ . @ + -`.
pub fn validate_username(username: &str) -> bool {
    let len = username.chars().count();
    if len == 0 || len > 150 {
        return false;
    }
    username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-'))
}

/// Validate a tag slug: non-empty ASCII letters, digits, `-` and `_`.
pub fn validate_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
