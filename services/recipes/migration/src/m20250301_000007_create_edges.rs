use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Edges::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Edges::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(Edges::SubjectId).uuid().not_null())
                    .col(ColumnDef::new(Edges::ObjectId).uuid().not_null())
                    .col(
                        ColumnDef::new(Edges::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // The primary key is the uniqueness constraint that settles
                    // concurrent duplicate inserts.
                    .primary_key(
                        Index::create()
                            .col(Edges::Kind)
                            .col(Edges::SubjectId)
                            .col(Edges::ObjectId),
                    )
                    .check(Expr::col(Edges::Kind).is_in([
                        "favorite",
                        "shopping_cart",
                        "subscription",
                    ]))
                    .check(
                        Expr::col(Edges::Kind)
                            .ne("subscription")
                            .or(Expr::col(Edges::SubjectId).ne(Expr::col(Edges::ObjectId))),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Edges::Table, Edges::SubjectId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Edges::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Edges {
    Table,
    Kind,
    SubjectId,
    ObjectId,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
