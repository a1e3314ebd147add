use sea_orm::entity::prelude::*;

/// Directed relationship between a user and a recipe or another user.
///
/// `kind` is one of `favorite`, `shopping_cart`, `subscription`. `object_id` points at
/// `recipes.id` for the first two and `users.id` for subscriptions, so it carries no
/// foreign key. Inserts hold a `FOR SHARE` lock on the object row and deletes of either
/// side lock it `FOR UPDATE` before removing matching edges.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "edges")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub kind: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub subject_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub object_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SubjectId",
        to = "super::users::Column::Id"
    )]
    Subject,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
