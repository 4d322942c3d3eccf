use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tips::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tips::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tips::AuthorId).uuid().not_null())
                    .col(ColumnDef::new(Tips::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Tips::Content).text().not_null())
                    .col(
                        ColumnDef::new(Tips::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tips::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Tips {
    Table,
    Id,
    AuthorId,
    Title,
    Content,
    CreatedAt,
}
