use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use compost_auth_types::identity::Identity;

use crate::domain::types::{ForumPost, ForumReply, PostSummary};
use crate::error::CompostServiceError;
use crate::handlers::{PageQuery, parse_query};
use crate::state::AppState;
use crate::usecase::forum::{
    CreatePostInput, CreatePostUseCase, CreateReplyUseCase, DeletePostUseCase, GetPostUseCase,
    ListPostsUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(serialize_with = "compost_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ForumPost> for PostResponse {
    fn from(p: ForumPost) -> Self {
        Self {
            id: p.id,
            author_id: p.author_id,
            title: p.title,
            content: p.content,
            created_at: p.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct PostSummaryResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub reply_count: u64,
}

impl From<PostSummary> for PostSummaryResponse {
    fn from(s: PostSummary) -> Self {
        Self {
            post: s.post.into(),
            reply_count: s.reply_count,
        }
    }
}

#[derive(Serialize)]
pub struct ReplyResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    #[serde(serialize_with = "compost_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ForumReply> for ReplyResponse {
    fn from(r: ForumReply) -> Self {
        Self {
            id: r.id,
            post_id: r.post_id,
            author_id: r.author_id,
            content: r.content,
            created_at: r.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct PostThreadResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub replies: Vec<ReplyResponse>,
}

// ── GET /forum/posts ─────────────────────────────────────────────────────────

pub async fn list_posts(
    _identity: Identity,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<PostSummaryResponse>>, CompostServiceError> {
    let query: PageQuery = parse_query(raw_query)?;
    let usecase = ListPostsUseCase {
        repo: state.forum_repo(),
    };
    let posts = usecase.execute(query.page_request()).await?;
    Ok(Json(
        posts.into_iter().map(PostSummaryResponse::from).collect(),
    ))
}

// ── POST /forum/posts ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

pub async fn create_post(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), CompostServiceError> {
    let usecase = CreatePostUseCase {
        repo: state.forum_repo(),
    };
    let post = usecase
        .execute(
            identity.user_id,
            CreatePostInput {
                title: body.title,
                content: body.content,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(post.into())))
}

// ── GET /forum/posts/{id} ────────────────────────────────────────────────────

pub async fn get_post(
    _identity: Identity,
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<PostThreadResponse>, CompostServiceError> {
    let usecase = GetPostUseCase {
        repo: state.forum_repo(),
    };
    let thread = usecase.execute(post_id).await?;
    Ok(Json(PostThreadResponse {
        post: thread.post.into(),
        replies: thread.replies.into_iter().map(ReplyResponse::from).collect(),
    }))
}

// ── POST /forum/posts/{id}/replies ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateReplyRequest {
    #[serde(default)]
    pub content: String,
}

pub async fn create_reply(
    identity: Identity,
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Json(body): Json<CreateReplyRequest>,
) -> Result<(StatusCode, Json<ReplyResponse>), CompostServiceError> {
    let usecase = CreateReplyUseCase {
        repo: state.forum_repo(),
    };
    let reply = usecase
        .execute(identity.user_id, post_id, &body.content)
        .await?;
    Ok((StatusCode::CREATED, Json(reply.into())))
}

// ── DELETE /forum/posts/{id} ─────────────────────────────────────────────────

pub async fn delete_post(
    identity: Identity,
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<StatusCode, CompostServiceError> {
    let usecase = DeletePostUseCase {
        repo: state.forum_repo(),
    };
    usecase.execute(identity.user_id, post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
