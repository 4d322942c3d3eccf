use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bins::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bins::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Bins::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Bins::Location).string())
                    .col(ColumnDef::new(Bins::Description).text())
                    .col(ColumnDef::new(Bins::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Bins::LatestTemperatureC).double())
                    .col(ColumnDef::new(Bins::LatestMoisture).string_len(16))
                    .col(
                        ColumnDef::new(Bins::HealthStatus)
                            .string_len(16)
                            .not_null()
                            .default("needs_attention"),
                    )
                    .col(
                        ColumnDef::new(Bins::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Bins::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BinMembers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BinMembers::BinId).uuid().not_null())
                    .col(ColumnDef::new(BinMembers::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(BinMembers::Role)
                            .string_len(16)
                            .not_null()
                            .default("member"),
                    )
                    .col(
                        ColumnDef::new(BinMembers::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(BinMembers::BinId)
                            .col(BinMembers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(BinMembers::Table, BinMembers::BinId)
                            .to(Bins::Table, Bins::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // "My bins" looks members up by user.
        manager
            .create_index(
                Index::create()
                    .table(BinMembers::Table)
                    .col(BinMembers::UserId)
                    .name("idx_bin_members_user_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BinMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bins::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Bins {
    Table,
    Id,
    Name,
    Location,
    Description,
    OwnerId,
    LatestTemperatureC,
    LatestMoisture,
    HealthStatus,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum BinMembers {
    Table,
    BinId,
    UserId,
    Role,
    JoinedAt,
}
