use std::collections::HashMap;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionError, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use compost_domain::activity::LogKind;
use compost_domain::bin::{HealthStatus, MemberRole, MoistureLevel};
use compost_domain::pagination::PageRequest;
use compost_domain::task::{TaskStatus, TaskUrgency};
use compost_hub_schema::{
    bin_logs, bin_members, bins, forum_posts, forum_replies, profiles, tasks, tips,
};

use crate::domain::repository::{
    BinLogRepository, BinRepository, ForumRepository, ProfileRepository, TaskRepository,
    TipRepository,
};
use crate::domain::types::{
    Bin, BinLog, BinMember, BinUpdate, ForumPost, ForumReply, PostSummary, Profile, Task,
    TaskFilter, Tip,
};
use crate::error::CompostServiceError;

/// Blank text is stored as NULL.
fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

// ── Profile repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProfileRepository {
    pub db: DatabaseConnection,
}

impl ProfileRepository for DbProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, CompostServiceError> {
        let model = profiles::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find profile")?;
        Ok(model.map(profile_from_model))
    }

    async fn upsert(&self, profile: &Profile) -> Result<Profile, CompostServiceError> {
        profiles::Entity::insert(profiles::ActiveModel {
            id: Set(profile.id),
            display_name: Set(profile.display_name.clone()),
            created_at: Set(profile.created_at),
            updated_at: Set(profile.updated_at),
        })
        .on_conflict(
            OnConflict::column(profiles::Column::Id)
                .update_columns([profiles::Column::DisplayName, profiles::Column::UpdatedAt])
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("upsert profile")?;

        let model = profiles::Entity::find_by_id(profile.id)
            .one(&self.db)
            .await
            .context("reload profile")?
            .context("profile missing after upsert")?;
        Ok(profile_from_model(model))
    }
}

fn profile_from_model(model: profiles::Model) -> Profile {
    Profile {
        id: model.id,
        display_name: model.display_name,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Bin repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbBinRepository {
    pub db: DatabaseConnection,
}

impl BinRepository for DbBinRepository {
    async fn list_for_member(&self, user_id: Uuid) -> Result<Vec<Bin>, CompostServiceError> {
        let models = bins::Entity::find()
            .inner_join(bin_members::Entity)
            .filter(bin_members::Column::UserId.eq(user_id))
            .order_by_desc(bins::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list bins for member")?;
        models.into_iter().map(bin_from_model).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Bin>, CompostServiceError> {
        bins::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find bin")?
            .map(bin_from_model)
            .transpose()
    }

    async fn create_with_owner(
        &self,
        bin: &Bin,
        owner: &BinMember,
    ) -> Result<(), CompostServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let bin = bin.clone();
                let owner = owner.clone();
                Box::pin(async move {
                    bins::ActiveModel {
                        id: Set(bin.id),
                        name: Set(bin.name),
                        location: Set(bin.location),
                        description: Set(bin.description),
                        owner_id: Set(bin.owner_id),
                        latest_temperature_c: Set(bin.latest_temperature_c),
                        latest_moisture: Set(bin.latest_moisture.map(|m| m.as_str().to_owned())),
                        health_status: Set(bin.health_status.as_str().to_owned()),
                        created_at: Set(bin.created_at),
                        updated_at: Set(bin.updated_at),
                    }
                    .insert(txn)
                    .await?;

                    member_to_active(&owner).insert(txn).await?;
                    Ok(())
                })
            })
            .await
            .context("create bin with owner")?;
        Ok(())
    }

    async fn update(
        &self,
        id: Uuid,
        update: &BinUpdate,
        at: DateTime<Utc>,
    ) -> Result<Bin, CompostServiceError> {
        let mut model = bins::ActiveModel {
            id: Set(id),
            updated_at: Set(at),
            ..Default::default()
        };
        if let Some(name) = &update.name {
            model.name = Set(name.clone());
        }
        if let Some(location) = &update.location {
            model.location = Set(non_blank(location));
        }
        if let Some(description) = &update.description {
            model.description = Set(non_blank(description));
        }
        let updated = model.update(&self.db).await.context("update bin")?;
        bin_from_model(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<(), CompostServiceError> {
        bins::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete bin")?;
        Ok(())
    }

    async fn count_members(&self, bin_id: Uuid) -> Result<u64, CompostServiceError> {
        let count = bin_members::Entity::find()
            .filter(bin_members::Column::BinId.eq(bin_id))
            .count(&self.db)
            .await
            .context("count bin members")?;
        Ok(count)
    }

    async fn find_member(
        &self,
        bin_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<BinMember>, CompostServiceError> {
        bin_members::Entity::find_by_id((bin_id, user_id))
            .one(&self.db)
            .await
            .context("find bin member")?
            .map(member_from_model)
            .transpose()
    }

    async fn add_member(&self, member: &BinMember) -> Result<bool, CompostServiceError> {
        // Existing rows, including the owner's, are left untouched.
        let inserted = bin_members::Entity::insert(member_to_active(member))
            .on_conflict(
                OnConflict::columns([bin_members::Column::BinId, bin_members::Column::UserId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("add bin member")?;
        Ok(inserted > 0)
    }

    async fn list_members(&self, bin_id: Uuid) -> Result<Vec<BinMember>, CompostServiceError> {
        let models = bin_members::Entity::find()
            .filter(bin_members::Column::BinId.eq(bin_id))
            .order_by_asc(bin_members::Column::JoinedAt)
            .all(&self.db)
            .await
            .context("list bin members")?;
        models.into_iter().map(member_from_model).collect()
    }
}

fn bin_from_model(model: bins::Model) -> Result<Bin, CompostServiceError> {
    Ok(Bin {
        id: model.id,
        name: model.name,
        location: model.location,
        description: model.description,
        owner_id: model.owner_id,
        latest_temperature_c: model.latest_temperature_c,
        latest_moisture: model
            .latest_moisture
            .as_deref()
            .map(str::parse::<MoistureLevel>)
            .transpose()
            .context("stored bin moisture")?,
        health_status: model
            .health_status
            .parse::<HealthStatus>()
            .context("stored bin health status")?,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn member_to_active(member: &BinMember) -> bin_members::ActiveModel {
    bin_members::ActiveModel {
        bin_id: Set(member.bin_id),
        user_id: Set(member.user_id),
        role: Set(member.role.as_str().to_owned()),
        joined_at: Set(member.joined_at),
    }
}

fn member_from_model(model: bin_members::Model) -> Result<BinMember, CompostServiceError> {
    Ok(BinMember {
        bin_id: model.bin_id,
        user_id: model.user_id,
        role: model.role.parse::<MemberRole>().context("stored member role")?,
        joined_at: model.joined_at,
    })
}

// ── Bin log repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbBinLogRepository {
    pub db: DatabaseConnection,
}

impl BinLogRepository for DbBinLogRepository {
    async fn list(
        &self,
        bin_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<BinLog>, CompostServiceError> {
        let models = bin_logs::Entity::find()
            .filter(bin_logs::Column::BinId.eq(bin_id))
            .order_by_desc(bin_logs::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list bin logs")?;
        models.into_iter().map(log_from_model).collect()
    }

    async fn append(&self, log: &BinLog) -> Result<Option<Bin>, CompostServiceError> {
        self.db
            .transaction::<_, Option<Bin>, CompostServiceError>(|txn| {
                let log = log.clone();
                Box::pin(async move {
                    bin_logs::ActiveModel {
                        id: Set(log.id),
                        bin_id: Set(log.bin_id),
                        user_id: Set(log.user_id),
                        kind: Set(log.kind.as_str().to_owned()),
                        temperature_c: Set(log.temperature_c),
                        moisture: Set(log.moisture.map(|m| m.as_str().to_owned())),
                        notes: Set(log.notes.clone()),
                        created_at: Set(log.created_at),
                    }
                    .insert(txn)
                    .await
                    .context("insert bin log")?;

                    if !log.has_readings() {
                        return Ok(None);
                    }

                    // Row lock serialises concurrent readings on the same bin.
                    let Some(model) = bins::Entity::find_by_id(log.bin_id)
                        .lock_exclusive()
                        .one(txn)
                        .await
                        .context("lock bin for readings")?
                    else {
                        return Ok(None);
                    };
                    let mut bin = bin_from_model(model)?;
                    // A newer reading committed first; keep it.
                    if !bin.apply_readings(log.temperature_c, log.moisture, log.created_at) {
                        return Ok(Some(bin));
                    }

                    bins::ActiveModel {
                        id: Set(bin.id),
                        latest_temperature_c: Set(bin.latest_temperature_c),
                        latest_moisture: Set(bin.latest_moisture.map(|m| m.as_str().to_owned())),
                        health_status: Set(bin.health_status.as_str().to_owned()),
                        updated_at: Set(bin.updated_at),
                        ..Default::default()
                    }
                    .update(txn)
                    .await
                    .context("update bin readings")?;
                    Ok(Some(bin))
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(e) => {
                    CompostServiceError::Internal(anyhow::Error::new(e).context("append bin log"))
                }
                TransactionError::Transaction(e) => e,
            })
    }
}

fn log_from_model(model: bin_logs::Model) -> Result<BinLog, CompostServiceError> {
    Ok(BinLog {
        id: model.id,
        bin_id: model.bin_id,
        user_id: model.user_id,
        kind: model.kind.parse::<LogKind>().context("stored log kind")?,
        temperature_c: model.temperature_c,
        moisture: model
            .moisture
            .as_deref()
            .map(str::parse::<MoistureLevel>)
            .transpose()
            .context("stored log moisture")?,
        notes: model.notes,
        created_at: model.created_at,
    })
}

// ── Task repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTaskRepository {
    pub db: DatabaseConnection,
}

impl TaskRepository for DbTaskRepository {
    async fn list(
        &self,
        filter: TaskFilter,
        page: PageRequest,
    ) -> Result<Vec<Task>, CompostServiceError> {
        let mut query = tasks::Entity::find();
        if let Some(bin_id) = filter.bin_id {
            query = query.filter(tasks::Column::BinId.eq(bin_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(tasks::Column::Status.eq(status.as_str()));
        }
        let models = query
            .order_by_desc(tasks::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list tasks")?;
        models.into_iter().map(task_from_model).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, CompostServiceError> {
        tasks::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find task")?
            .map(task_from_model)
            .transpose()
    }

    async fn create(&self, task: &Task) -> Result<(), CompostServiceError> {
        tasks::ActiveModel {
            id: Set(task.id),
            bin_id: Set(task.bin_id),
            title: Set(task.title.clone()),
            description: Set(task.description.clone()),
            urgency: Set(task.urgency.as_str().to_owned()),
            status: Set(task.status.as_str().to_owned()),
            created_by: Set(task.created_by),
            accepted_by: Set(task.accepted_by),
            accepted_at: Set(task.accepted_at),
            completed_at: Set(task.completed_at),
            due_date: Set(task.due_date),
            created_at: Set(task.created_at),
        }
        .insert(&self.db)
        .await
        .context("create task")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), CompostServiceError> {
        tasks::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete task")?;
        Ok(())
    }

    async fn mark_accepted(
        &self,
        id: Uuid,
        acceptor: Uuid,
        at: DateTime<Utc>,
    ) -> Result<bool, CompostServiceError> {
        let result = tasks::Entity::update_many()
            .col_expr(tasks::Column::Status, Expr::value(TaskStatus::Accepted.as_str()))
            .col_expr(tasks::Column::AcceptedBy, Expr::value(acceptor))
            .col_expr(tasks::Column::AcceptedAt, Expr::value(at))
            .filter(tasks::Column::Id.eq(id))
            .filter(tasks::Column::Status.eq(TaskStatus::Open.as_str()))
            .exec(&self.db)
            .await
            .context("accept task")?;
        Ok(result.rows_affected > 0)
    }

    async fn mark_completed(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<bool, CompostServiceError> {
        let result = tasks::Entity::update_many()
            .col_expr(tasks::Column::Status, Expr::value(TaskStatus::Completed.as_str()))
            .col_expr(tasks::Column::CompletedAt, Expr::value(at))
            .filter(tasks::Column::Id.eq(id))
            .filter(tasks::Column::Status.eq(TaskStatus::Accepted.as_str()))
            .exec(&self.db)
            .await
            .context("complete task")?;
        Ok(result.rows_affected > 0)
    }
}

fn task_from_model(model: tasks::Model) -> Result<Task, CompostServiceError> {
    Ok(Task {
        id: model.id,
        bin_id: model.bin_id,
        title: model.title,
        description: model.description,
        urgency: model.urgency.parse::<TaskUrgency>().context("stored task urgency")?,
        status: model.status.parse::<TaskStatus>().context("stored task status")?,
        created_by: model.created_by,
        accepted_by: model.accepted_by,
        accepted_at: model.accepted_at,
        completed_at: model.completed_at,
        due_date: model.due_date,
        created_at: model.created_at,
    })
}

// ── Forum repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbForumRepository {
    pub db: DatabaseConnection,
}

impl ForumRepository for DbForumRepository {
    async fn list_posts(&self, page: PageRequest) -> Result<Vec<PostSummary>, CompostServiceError> {
        let posts = forum_posts::Entity::find()
            .order_by_desc(forum_posts::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list forum posts")?;
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let counts: HashMap<Uuid, i64> = forum_replies::Entity::find()
            .select_only()
            .column(forum_replies::Column::PostId)
            .column_as(Expr::col(forum_replies::Column::Id).count(), "reply_count")
            .filter(forum_replies::Column::PostId.is_in(post_ids))
            .group_by(forum_replies::Column::PostId)
            .into_tuple::<(Uuid, i64)>()
            .all(&self.db)
            .await
            .context("count forum replies")?
            .into_iter()
            .collect();

        Ok(posts
            .into_iter()
            .map(|model| {
                let reply_count = counts.get(&model.id).copied().unwrap_or(0);
                PostSummary {
                    post: post_from_model(model),
                    reply_count: u64::try_from(reply_count).unwrap_or(0),
                }
            })
            .collect())
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<ForumPost>, CompostServiceError> {
        let model = forum_posts::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find forum post")?;
        Ok(model.map(post_from_model))
    }

    async fn create_post(&self, post: &ForumPost) -> Result<(), CompostServiceError> {
        forum_posts::ActiveModel {
            id: Set(post.id),
            author_id: Set(post.author_id),
            title: Set(post.title.clone()),
            content: Set(post.content.clone()),
            created_at: Set(post.created_at),
        }
        .insert(&self.db)
        .await
        .context("create forum post")?;
        Ok(())
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), CompostServiceError> {
        forum_posts::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete forum post")?;
        Ok(())
    }

    async fn list_replies(&self, post_id: Uuid) -> Result<Vec<ForumReply>, CompostServiceError> {
        let models = forum_replies::Entity::find()
            .filter(forum_replies::Column::PostId.eq(post_id))
            .order_by_asc(forum_replies::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list forum replies")?;
        Ok(models
            .into_iter()
            .map(|m| ForumReply {
                id: m.id,
                post_id: m.post_id,
                author_id: m.author_id,
                content: m.content,
                created_at: m.created_at,
            })
            .collect())
    }

    async fn create_reply(&self, reply: &ForumReply) -> Result<(), CompostServiceError> {
        forum_replies::ActiveModel {
            id: Set(reply.id),
            post_id: Set(reply.post_id),
            author_id: Set(reply.author_id),
            content: Set(reply.content.clone()),
            created_at: Set(reply.created_at),
        }
        .insert(&self.db)
        .await
        .context("create forum reply")?;
        Ok(())
    }
}

fn post_from_model(model: forum_posts::Model) -> ForumPost {
    ForumPost {
        id: model.id,
        author_id: model.author_id,
        title: model.title,
        content: model.content,
        created_at: model.created_at,
    }
}

// ── Tip repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTipRepository {
    pub db: DatabaseConnection,
}

impl TipRepository for DbTipRepository {
    async fn list(&self, page: PageRequest) -> Result<Vec<Tip>, CompostServiceError> {
        let models = tips::Entity::find()
            .order_by_desc(tips::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list tips")?;
        Ok(models
            .into_iter()
            .map(|m| Tip {
                id: m.id,
                author_id: m.author_id,
                title: m.title,
                content: m.content,
                created_at: m.created_at,
            })
            .collect())
    }

    async fn create(&self, tip: &Tip) -> Result<(), CompostServiceError> {
        tips::ActiveModel {
            id: Set(tip.id),
            author_id: Set(tip.author_id),
            title: Set(tip.title.clone()),
            content: Set(tip.content.clone()),
            created_at: Set(tip.created_at),
        }
        .insert(&self.db)
        .await
        .context("create tip")?;
        Ok(())
    }
}
