use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BinLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BinLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(BinLogs::BinId).uuid().not_null())
                    .col(ColumnDef::new(BinLogs::UserId).uuid().not_null())
                    .col(ColumnDef::new(BinLogs::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(BinLogs::TemperatureC).double())
                    .col(ColumnDef::new(BinLogs::Moisture).string_len(16))
                    .col(ColumnDef::new(BinLogs::Notes).text())
                    .col(
                        ColumnDef::new(BinLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(BinLogs::Table, BinLogs::BinId)
                            .to(Bins::Table, Bins::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(BinLogs::Table)
                    .col(BinLogs::BinId)
                    .col(BinLogs::CreatedAt)
                    .name("idx_bin_logs_bin_id_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BinLogs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum BinLogs {
    Table,
    Id,
    BinId,
    UserId,
    Kind,
    TemperatureC,
    Moisture,
    Notes,
    CreatedAt,
}

#[derive(Iden)]
enum Bins {
    Table,
    Id,
}
