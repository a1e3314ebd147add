use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Recipes service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum RecipesServiceError {
    #[error("invalid color: {0}")]
    InvalidColor(String),
    #[error("invalid slug")]
    InvalidSlug,
    #[error("tag already exists")]
    DuplicateTag,
    #[error("unknown tag: {0}")]
    UnknownTag(i32),
    #[error("unknown ingredient: {0}")]
    UnknownIngredient(i32),
    #[error("recipe needs at least one tag")]
    MissingTag,
    #[error("recipe needs at least one ingredient")]
    MissingIngredient,
    #[error("cooking time must be at least 1 minute")]
    InvalidCookingTime,
    #[error("ingredient amount must be at least 1")]
    InvalidAmount,
    #[error("duplicate ingredient: {0}")]
    DuplicateIngredient(i32),
    #[error("not the recipe author")]
    NotOwner,
    #[error("already exists")]
    DuplicateEdge,
    #[error("cannot subscribe to yourself")]
    SelfSubscription,
    #[error("not found in list")]
    EdgeNotFound,
    #[error("invalid username")]
    InvalidUsername,
    #[error("invalid format")]
    InvalidFormat,
    #[error("missing data")]
    MissingData,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("recipe not found")]
    RecipeNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("tag not found")]
    TagNotFound,
    #[error("ingredient not found")]
    IngredientNotFound,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl RecipesServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidColor(_) => "INVALID_COLOR",
            Self::InvalidSlug => "INVALID_SLUG",
            Self::DuplicateTag => "DUPLICATE_TAG",
            Self::UnknownTag(_) => "UNKNOWN_TAG",
            Self::UnknownIngredient(_) => "UNKNOWN_INGREDIENT",
            Self::MissingTag => "MISSING_TAG",
            Self::MissingIngredient => "MISSING_INGREDIENT",
            Self::InvalidCookingTime => "INVALID_COOKING_TIME",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::DuplicateIngredient(_) => "DUPLICATE_INGREDIENT",
            Self::NotOwner => "NOT_OWNER",
            Self::DuplicateEdge => "DUPLICATE_EDGE",
            Self::SelfSubscription => "SELF_SUBSCRIPTION",
            Self::EdgeNotFound => "EDGE_NOT_FOUND",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::InvalidFormat => "INVALID_FORMAT",
            Self::MissingData => "MISSING_DATA",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::RecipeNotFound => "RECIPE_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::TagNotFound => "TAG_NOT_FOUND",
            Self::IngredientNotFound => "INGREDIENT_NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for RecipesServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::RecipeNotFound
            | Self::UserNotFound
            | Self::TagNotFound
            | Self::IngredientNotFound => StatusCode::NOT_FOUND,
            Self::UserAlreadyExists => StatusCode::CONFLICT,
            Self::NotOwner | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InvalidColor(_)
            | Self::InvalidSlug
            | Self::DuplicateTag
            | Self::UnknownTag(_)
            | Self::UnknownIngredient(_)
            | Self::MissingTag
            | Self::MissingIngredient
            | Self::InvalidCookingTime
            | Self::InvalidAmount
            | Self::DuplicateIngredient(_)
            | Self::DuplicateEdge
            | Self::SelfSubscription
            | Self::EdgeNotFound
            | Self::InvalidUsername
            | Self::InvalidFormat
            | Self::MissingData => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
