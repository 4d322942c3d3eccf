#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use compost_domain::pagination::PageRequest;

use crate::domain::types::{
    Bin, BinLog, BinMember, BinUpdate, ForumPost, ForumReply, PostSummary, Profile, Task,
    TaskFilter, Tip,
};
use crate::error::CompostServiceError;

pub trait ProfileRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, CompostServiceError>;
    /// Insert or replace the display name, keeping the original `created_at`.
    async fn upsert(&self, profile: &Profile) -> Result<Profile, CompostServiceError>;
}

pub trait BinRepository: Send + Sync {
    /// Bins the user is a member of, newest first.
    async fn list_for_member(&self, user_id: Uuid) -> Result<Vec<Bin>, CompostServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Bin>, CompostServiceError>;
    /// Create the bin and its owner membership atomically.
    async fn create_with_owner(
        &self,
        bin: &Bin,
        owner: &BinMember,
    ) -> Result<(), CompostServiceError>;
    async fn update(
        &self,
        id: Uuid,
        update: &BinUpdate,
        at: DateTime<Utc>,
    ) -> Result<Bin, CompostServiceError>;
    /// Members, logs and tasks go with the bin.
    async fn delete(&self, id: Uuid) -> Result<(), CompostServiceError>;
    async fn count_members(&self, bin_id: Uuid) -> Result<u64, CompostServiceError>;
    async fn find_member(
        &self,
        bin_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<BinMember>, CompostServiceError>;
    /// Returns `true` if the user was not a member before.
    async fn add_member(&self, member: &BinMember) -> Result<bool, CompostServiceError>;
    /// Members in join order.
    async fn list_members(&self, bin_id: Uuid) -> Result<Vec<BinMember>, CompostServiceError>;
}

pub trait BinLogRepository: Send + Sync {
    /// Newest first.
    async fn list(&self, bin_id: Uuid, page: PageRequest)
    -> Result<Vec<BinLog>, CompostServiceError>;
    /// Store the log. When it carries readings, fold them into the bin in the
    /// same transaction and return the updated bin.
    async fn append(&self, log: &BinLog) -> Result<Option<Bin>, CompostServiceError>;
}

pub trait TaskRepository: Send + Sync {
    /// Newest first.
    async fn list(
        &self,
        filter: TaskFilter,
        page: PageRequest,
    ) -> Result<Vec<Task>, CompostServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, CompostServiceError>;
    async fn create(&self, task: &Task) -> Result<(), CompostServiceError>;
    async fn delete(&self, id: Uuid) -> Result<(), CompostServiceError>;
    /// `open -> accepted`, only if still open. Returns `false` when another
    /// request got there first.
    async fn mark_accepted(
        &self,
        id: Uuid,
        acceptor: Uuid,
        at: DateTime<Utc>,
    ) -> Result<bool, CompostServiceError>;
    /// `accepted -> completed`, only if still accepted.
    async fn mark_completed(&self, id: Uuid, at: DateTime<Utc>)
    -> Result<bool, CompostServiceError>;
}

pub trait ForumRepository: Send + Sync {
    /// Newest first, with reply counts.
    async fn list_posts(&self, page: PageRequest) -> Result<Vec<PostSummary>, CompostServiceError>;
    async fn find_post(&self, id: Uuid) -> Result<Option<ForumPost>, CompostServiceError>;
    async fn create_post(&self, post: &ForumPost) -> Result<(), CompostServiceError>;
    /// Replies go with the post.
    async fn delete_post(&self, id: Uuid) -> Result<(), CompostServiceError>;
    /// Oldest first.
    async fn list_replies(&self, post_id: Uuid) -> Result<Vec<ForumReply>, CompostServiceError>;
    async fn create_reply(&self, reply: &ForumReply) -> Result<(), CompostServiceError>;
}

pub trait TipRepository: Send + Sync {
    /// Newest first.
    async fn list(&self, page: PageRequest) -> Result<Vec<Tip>, CompostServiceError>;
    async fn create(&self, tip: &Tip) -> Result<(), CompostServiceError>;
}
