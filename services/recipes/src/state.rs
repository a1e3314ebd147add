use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbCatalogRepository, DbEdgeRepository, DbRecipeRepository, DbUserRepository,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn catalog_repo(&self) -> DbCatalogRepository {
        DbCatalogRepository {
            db: self.db.clone(),
        }
    }

    pub fn recipe_repo(&self) -> DbRecipeRepository {
        DbRecipeRepository {
            db: self.db.clone(),
        }
    }

    pub fn edge_repo(&self) -> DbEdgeRepository {
        DbEdgeRepository {
            db: self.db.clone(),
        }
    }
}
