use axum::{
    extract::{RawQuery, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;

use foodgram_auth_types::identity::IdentityHeaders;

use crate::error::RecipesServiceError;
use crate::handlers::parse_query;
use crate::render::ShoppingListFormat;
use crate::state::AppState;
use crate::usecase::shopping_list::CompileShoppingListUseCase;

#[derive(Deserialize, Default)]
pub struct DownloadQuery {
    pub format: Option<String>,
}

// ── GET /recipes/download-shopping-cart ──────────────────────────────────────

pub async fn download_shopping_cart(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<impl IntoResponse, RecipesServiceError> {
    let query: DownloadQuery = parse_query(raw_query)?;
    let format = match query.format.as_deref() {
        None => ShoppingListFormat::default(),
        Some(raw) => raw
            .parse::<ShoppingListFormat>()
            .map_err(|()| RecipesServiceError::InvalidFormat)?,
    };

    let usecase = CompileShoppingListUseCase {
        edges: state.edge_repo(),
        recipes: state.recipe_repo(),
    };
    let items = usecase.execute(identity.user_id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_owned()),
            (header::CONTENT_DISPOSITION, format.content_disposition()),
        ],
        format.render(&items),
    ))
}
