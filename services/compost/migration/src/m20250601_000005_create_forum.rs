use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ForumPosts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ForumPosts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ForumPosts::AuthorId).uuid().not_null())
                    .col(ColumnDef::new(ForumPosts::Title).string_len(200).not_null())
                    .col(ColumnDef::new(ForumPosts::Content).text().not_null())
                    .col(
                        ColumnDef::new(ForumPosts::CreatedAt)
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
                    .table(ForumReplies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ForumReplies::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ForumReplies::PostId).uuid().not_null())
                    .col(ColumnDef::new(ForumReplies::AuthorId).uuid().not_null())
                    .col(ColumnDef::new(ForumReplies::Content).text().not_null())
                    .col(
                        ColumnDef::new(ForumReplies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ForumReplies::Table, ForumReplies::PostId)
                            .to(ForumPosts::Table, ForumPosts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ForumReplies::Table)
                    .col(ForumReplies::PostId)
                    .name("idx_forum_replies_post_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ForumReplies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ForumPosts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ForumPosts {
    Table,
    Id,
    AuthorId,
    Title,
    Content,
    CreatedAt,
}

#[derive(Iden)]
enum ForumReplies {
    Table,
    Id,
    PostId,
    AuthorId,
    Content,
    CreatedAt,
}
