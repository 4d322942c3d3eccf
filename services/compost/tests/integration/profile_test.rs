use uuid::Uuid;

use compost_domain::pagination::PageRequest;
use compost_hub::error::CompostServiceError;
use compost_hub::usecase::profile::{GetProfileUseCase, UpdateProfileUseCase};
use compost_hub::usecase::tip::{CreateTipInput, CreateTipUseCase, ListTipsUseCase};

use crate::helpers::MemStore;

// ── Profiles ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_not_found_before_first_save() {
    let err = GetProfileUseCase {
        repo: MemStore::new(),
    }
    .execute(Uuid::new_v4())
    .await
    .unwrap_err();
    assert!(matches!(err, CompostServiceError::ProfileNotFound));
}

#[tokio::test]
async fn should_create_then_rename_keeping_created_at() {
    let store = MemStore::new();
    let user_id = Uuid::new_v4();
    let uc = UpdateProfileUseCase {
        repo: store.clone(),
    };

    let first = uc.execute(user_id, "  Auntie Lim ").await.unwrap();
    assert_eq!(first.display_name, "Auntie Lim");

    let renamed = uc.execute(user_id, "Lim Composter").await.unwrap();
    assert_eq!(renamed.display_name, "Lim Composter");
    assert_eq!(renamed.created_at, first.created_at);

    let fetched = GetProfileUseCase { repo: store }
        .execute(user_id)
        .await
        .unwrap();
    assert_eq!(fetched.display_name, "Lim Composter");
}

#[tokio::test]
async fn should_enforce_display_name_length() {
    let uc = UpdateProfileUseCase {
        repo: MemStore::new(),
    };
    let user_id = Uuid::new_v4();

    let err = uc.execute(user_id, "   ").await.unwrap_err();
    assert_eq!(err.to_string(), "display_name is required");

    let err = uc.execute(user_id, &"k".repeat(51)).await.unwrap_err();
    assert!(matches!(err, CompostServiceError::Validation(_)));

    assert!(uc.execute(user_id, &"k".repeat(50)).await.is_ok());
}

// ── Tips ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_tips_newest_first() {
    let store = MemStore::new();
    let author = Uuid::new_v4();
    let create = CreateTipUseCase {
        repo: store.clone(),
    };
    for title in ["Chop your greens", "Brown-to-green ratio"] {
        create
            .execute(
                author,
                CreateTipInput {
                    title: title.to_owned(),
                    content: "Smaller pieces break down faster.".to_owned(),
                },
            )
            .await
            .unwrap();
    }

    let tips = ListTipsUseCase { repo: store }
        .execute(PageRequest::default())
        .await
        .unwrap();
    let titles: Vec<_> = tips.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["Brown-to-green ratio", "Chop your greens"]);
}

#[tokio::test]
async fn should_reject_tip_without_content() {
    let store = MemStore::new();
    let err = CreateTipUseCase {
        repo: store.clone(),
    }
    .execute(
        Uuid::new_v4(),
        CreateTipInput {
            title: "Empty".to_owned(),
            content: " ".to_owned(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "content is required");
    assert!(store.tables().tips.is_empty());
}
