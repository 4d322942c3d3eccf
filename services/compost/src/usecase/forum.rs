use chrono::Utc;
use uuid::Uuid;

use compost_domain::pagination::PageRequest;

use crate::domain::repository::ForumRepository;
use crate::domain::types::{ForumPost, ForumReply, PostSummary, PostThread, TITLE_MAX_LEN};
use crate::error::CompostServiceError;
use crate::usecase::required_text;

/// Upper bound for post and reply bodies.
pub const CONTENT_MAX_LEN: usize = 10_000;

// ── ListPosts ────────────────────────────────────────────────────────────────

pub struct ListPostsUseCase<R: ForumRepository> {
    pub repo: R,
}

impl<R: ForumRepository> ListPostsUseCase<R> {
    pub async fn execute(&self, page: PageRequest) -> Result<Vec<PostSummary>, CompostServiceError> {
        self.repo.list_posts(page.clamped()).await
    }
}

// ── CreatePost ───────────────────────────────────────────────────────────────

pub struct CreatePostInput {
    pub title: String,
    pub content: String,
}

pub struct CreatePostUseCase<R: ForumRepository> {
    pub repo: R,
}

impl<R: ForumRepository> CreatePostUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: CreatePostInput,
    ) -> Result<ForumPost, CompostServiceError> {
        let post = ForumPost {
            id: Uuid::now_v7(),
            author_id: user_id,
            title: required_text(&input.title, "title", TITLE_MAX_LEN)?,
            content: required_text(&input.content, "content", CONTENT_MAX_LEN)?,
            created_at: Utc::now(),
        };
        self.repo.create_post(&post).await?;
        Ok(post)
    }
}

// ── GetPost ──────────────────────────────────────────────────────────────────

pub struct GetPostUseCase<R: ForumRepository> {
    pub repo: R,
}

impl<R: ForumRepository> GetPostUseCase<R> {
    pub async fn execute(&self, post_id: Uuid) -> Result<PostThread, CompostServiceError> {
        let post = self
            .repo
            .find_post(post_id)
            .await?
            .ok_or(CompostServiceError::PostNotFound)?;
        let replies = self.repo.list_replies(post_id).await?;
        Ok(PostThread { post, replies })
    }
}

// ── CreateReply ──────────────────────────────────────────────────────────────

pub struct CreateReplyUseCase<R: ForumRepository> {
    pub repo: R,
}

impl<R: ForumRepository> CreateReplyUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        content: &str,
    ) -> Result<ForumReply, CompostServiceError> {
        let content = required_text(content, "content", CONTENT_MAX_LEN)?;
        if self.repo.find_post(post_id).await?.is_none() {
            return Err(CompostServiceError::PostNotFound);
        }
        let reply = ForumReply {
            id: Uuid::now_v7(),
            post_id,
            author_id: user_id,
            content,
            created_at: Utc::now(),
        };
        self.repo.create_reply(&reply).await?;
        Ok(reply)
    }
}

// ── DeletePost ───────────────────────────────────────────────────────────────

pub struct DeletePostUseCase<R: ForumRepository> {
    pub repo: R,
}

impl<R: ForumRepository> DeletePostUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, post_id: Uuid) -> Result<(), CompostServiceError> {
        let post = self
            .repo
            .find_post(post_id)
            .await?
            .ok_or(CompostServiceError::PostNotFound)?;
        if post.author_id != user_id {
            return Err(CompostServiceError::NotPostAuthor);
        }
        self.repo.delete_post(post_id).await
    }
}
