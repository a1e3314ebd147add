pub mod edge;
pub mod health;
pub mod ingredient;
pub mod recipe;
pub mod shopping_list;
pub mod tag;
pub mod user;

use serde::de::DeserializeOwned;

use foodgram_auth_types::identity::IdentityHeaders;
use foodgram_domain::pagination::{DEFAULT_PER_PAGE, PageRequest};
use foodgram_domain::user::UserRole;

use crate::error::RecipesServiceError;

/// Parse a query string with `serde_qs`. An absent query yields `T::default()`.
pub(crate) fn parse_query<T: DeserializeOwned + Default>(
    raw_query: Option<String>,
) -> Result<T, RecipesServiceError> {
    Ok(raw_query
        .as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|_| RecipesServiceError::MissingData)?
        .unwrap_or_default())
}

pub(crate) fn page_request(per_page: Option<u32>, page: Option<u32>) -> PageRequest {
    PageRequest {
        per_page: per_page.unwrap_or(DEFAULT_PER_PAGE),
        page: page.unwrap_or(1),
    }
    .clamped()
}

/// Gateway role. Values above admin are treated as admin.
pub(crate) fn role_of(identity: &IdentityHeaders) -> UserRole {
    UserRole::from_u8(identity.user_role).unwrap_or(UserRole::Admin)
}

pub(crate) fn require_admin(identity: &IdentityHeaders) -> Result<(), RecipesServiceError> {
    if role_of(identity).is_admin() {
        Ok(())
    } else {
        Err(RecipesServiceError::Forbidden)
    }
}
