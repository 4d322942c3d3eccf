use uuid::Uuid;

use compost_domain::pagination::PageRequest;
use compost_hub::domain::types::ForumPost;
use compost_hub::error::CompostServiceError;
use compost_hub::usecase::forum::{
    CreatePostInput, CreatePostUseCase, CreateReplyUseCase, DeletePostUseCase, GetPostUseCase,
    ListPostsUseCase,
};

use crate::helpers::MemStore;

async fn post(store: &MemStore, author: Uuid, title: &str) -> ForumPost {
    CreatePostUseCase {
        repo: store.clone(),
    }
    .execute(
        author,
        CreatePostInput {
            title: title.to_owned(),
            content: "Anyone else seeing fruit flies?".to_owned(),
        },
    )
    .await
    .unwrap()
}

async fn reply(store: &MemStore, author: Uuid, post_id: Uuid, content: &str) {
    CreateReplyUseCase {
        repo: store.clone(),
    }
    .execute(author, post_id, content)
    .await
    .unwrap();
}

#[tokio::test]
async fn should_validate_new_post() {
    let store = MemStore::new();
    let uc = CreatePostUseCase {
        repo: store.clone(),
    };

    let err = uc
        .execute(
            Uuid::new_v4(),
            CreatePostInput {
                title: "".to_owned(),
                content: "Body".to_owned(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "title is required");

    let err = uc
        .execute(
            Uuid::new_v4(),
            CreatePostInput {
                title: "Title".to_owned(),
                content: "\n".to_owned(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "content is required");
    assert!(store.tables().posts.is_empty());
}

#[tokio::test]
async fn should_list_posts_newest_first_with_reply_counts() {
    let store = MemStore::new();
    let author = Uuid::new_v4();
    let older = post(&store, author, "Fruit flies").await;
    let newer = post(&store, author, "Best browns?").await;
    reply(&store, Uuid::new_v4(), older.id, "Bury the greens deeper.").await;
    reply(&store, Uuid::new_v4(), older.id, "Cover with cardboard.").await;

    let posts = ListPostsUseCase { repo: store }
        .execute(PageRequest::default())
        .await
        .unwrap();
    let listed: Vec<_> = posts.iter().map(|s| (s.post.id, s.reply_count)).collect();
    assert_eq!(listed, [(newer.id, 0), (older.id, 2)]);
}

#[tokio::test]
async fn should_show_thread_with_replies_oldest_first() {
    let store = MemStore::new();
    let thread_post = post(&store, Uuid::new_v4(), "Fruit flies").await;
    reply(&store, Uuid::new_v4(), thread_post.id, "first").await;
    reply(&store, Uuid::new_v4(), thread_post.id, "second").await;

    let thread = GetPostUseCase { repo: store }
        .execute(thread_post.id)
        .await
        .unwrap();
    assert_eq!(thread.post.title, "Fruit flies");
    let contents: Vec<_> = thread.replies.iter().map(|r| r.content.as_str()).collect();
    assert_eq!(contents, ["first", "second"]);
}

#[tokio::test]
async fn should_not_reply_to_missing_post() {
    let err = CreateReplyUseCase {
        repo: MemStore::new(),
    }
    .execute(Uuid::new_v4(), Uuid::new_v4(), "hello")
    .await
    .unwrap_err();
    assert!(matches!(err, CompostServiceError::PostNotFound));
}

#[tokio::test]
async fn should_reject_blank_reply() {
    let store = MemStore::new();
    let target = post(&store, Uuid::new_v4(), "Fruit flies").await;
    let err = CreateReplyUseCase { repo: store }
        .execute(Uuid::new_v4(), target.id, "   ")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "content is required");
}

#[tokio::test]
async fn should_only_let_author_delete_post() {
    let store = MemStore::new();
    let author = Uuid::new_v4();
    let target = post(&store, author, "Fruit flies").await;
    reply(&store, Uuid::new_v4(), target.id, "Bury the greens deeper.").await;
    let uc = DeletePostUseCase {
        repo: store.clone(),
    };

    let err = uc.execute(Uuid::new_v4(), target.id).await.unwrap_err();
    assert!(matches!(err, CompostServiceError::NotPostAuthor));

    uc.execute(author, target.id).await.unwrap();
    let tables = store.tables();
    assert!(tables.posts.is_empty());
    assert!(tables.replies.is_empty());
}
