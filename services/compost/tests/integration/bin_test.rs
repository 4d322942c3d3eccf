use uuid::Uuid;

use compost_domain::bin::{HealthStatus, MemberRole};
use compost_hub::domain::types::BinUpdate;
use compost_hub::error::CompostServiceError;
use compost_hub::usecase::bin::{
    CreateBinInput, CreateBinUseCase, DeleteBinUseCase, GetBinUseCase, JoinBinUseCase,
    ListMembersUseCase, ListMyBinsUseCase, UpdateBinUseCase,
};

use crate::helpers::{MemStore, join, seed_bin};

#[tokio::test]
async fn should_make_creator_owner_and_member() {
    let store = MemStore::new();
    let owner = Uuid::new_v4();

    let bin = CreateBinUseCase {
        repo: store.clone(),
    }
    .execute(
        owner,
        CreateBinInput {
            name: " Block 231 community bin ".to_owned(),
            location: Some("Tampines St 21".to_owned()),
            description: Some("   ".to_owned()),
        },
    )
    .await
    .unwrap();

    assert_eq!(bin.name, "Block 231 community bin");
    assert_eq!(bin.owner_id, owner);
    assert_eq!(bin.description, None);
    assert_eq!(bin.health_status, HealthStatus::NeedsAttention);

    let tables = store.tables();
    assert_eq!(tables.members.len(), 1);
    assert_eq!(tables.members[0].user_id, owner);
    assert_eq!(tables.members[0].role, MemberRole::Owner);
}

#[tokio::test]
async fn should_reject_blank_bin_name() {
    let store = MemStore::new();
    let err = CreateBinUseCase {
        repo: store.clone(),
    }
    .execute(
        Uuid::new_v4(),
        CreateBinInput {
            name: "  ".to_owned(),
            location: None,
            description: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "name is required");
    assert!(store.tables().bins.is_empty());
}

#[tokio::test]
async fn should_list_only_bins_the_caller_belongs_to() {
    let store = MemStore::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let garden = seed_bin(&store, alice, "Garden").await;
    let rooftop = seed_bin(&store, bob, "Rooftop").await;
    join(&store, alice, rooftop.id).await;
    seed_bin(&store, bob, "Private").await;

    let bins = ListMyBinsUseCase { repo: store }
        .execute(alice)
        .await
        .unwrap();
    let ids: Vec<_> = bins.iter().map(|b| b.id).collect();
    assert_eq!(ids, [rooftop.id, garden.id]);
}

#[tokio::test]
async fn should_report_member_count_on_detail() {
    let store = MemStore::new();
    let bin = seed_bin(&store, Uuid::new_v4(), "Garden").await;
    join(&store, Uuid::new_v4(), bin.id).await;

    let detail = GetBinUseCase { repo: store }
        .execute(bin.id)
        .await
        .unwrap();
    assert_eq!(detail.bin.id, bin.id);
    assert_eq!(detail.member_count, 2);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_bin() {
    let err = GetBinUseCase {
        repo: MemStore::new(),
    }
    .execute(Uuid::new_v4())
    .await
    .unwrap_err();
    assert!(matches!(err, CompostServiceError::BinNotFound));
}

#[tokio::test]
async fn should_let_owner_edit_and_clear_fields() {
    let store = MemStore::new();
    let owner = Uuid::new_v4();
    let bin = CreateBinUseCase {
        repo: store.clone(),
    }
    .execute(
        owner,
        CreateBinInput {
            name: "Garden".to_owned(),
            location: Some("Void deck".to_owned()),
            description: None,
        },
    )
    .await
    .unwrap();

    let updated = UpdateBinUseCase { repo: store }
        .execute(
            owner,
            bin.id,
            BinUpdate {
                name: Some("Garden bin A".to_owned()),
                location: Some(String::new()),
                description: Some("Three-bay system".to_owned()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Garden bin A");
    assert_eq!(updated.location, None);
    assert_eq!(updated.description.as_deref(), Some("Three-bay system"));
}

#[tokio::test]
async fn should_forbid_members_from_editing_or_deleting() {
    let store = MemStore::new();
    let bin = seed_bin(&store, Uuid::new_v4(), "Garden").await;
    let member = Uuid::new_v4();
    join(&store, member, bin.id).await;

    let err = UpdateBinUseCase {
        repo: store.clone(),
    }
    .execute(
        member,
        bin.id,
        BinUpdate {
            name: Some("Mine now".to_owned()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CompostServiceError::NotBinOwner));

    let err = DeleteBinUseCase {
        repo: store.clone(),
    }
    .execute(member, bin.id)
    .await
    .unwrap_err();
    assert!(matches!(err, CompostServiceError::NotBinOwner));
    assert_eq!(store.tables().bins.len(), 1);
}

#[tokio::test]
async fn should_remove_members_with_deleted_bin() {
    let store = MemStore::new();
    let owner = Uuid::new_v4();
    let bin = seed_bin(&store, owner, "Garden").await;
    join(&store, Uuid::new_v4(), bin.id).await;

    DeleteBinUseCase {
        repo: store.clone(),
    }
    .execute(owner, bin.id)
    .await
    .unwrap();

    let tables = store.tables();
    assert!(tables.bins.is_empty());
    assert!(tables.members.is_empty());
}

#[tokio::test]
async fn should_join_once_and_report_existing_membership() {
    let store = MemStore::new();
    let bin = seed_bin(&store, Uuid::new_v4(), "Garden").await;
    let volunteer = Uuid::new_v4();
    let uc = JoinBinUseCase {
        repo: store.clone(),
    };

    assert!(uc.execute(volunteer, bin.id).await.unwrap());
    assert!(!uc.execute(volunteer, bin.id).await.unwrap());
    assert_eq!(store.tables().members.len(), 2);
}

#[tokio::test]
async fn should_keep_owner_role_when_owner_joins() {
    let store = MemStore::new();
    let owner = Uuid::new_v4();
    let bin = seed_bin(&store, owner, "Garden").await;

    let joined = JoinBinUseCase {
        repo: store.clone(),
    }
    .execute(owner, bin.id)
    .await
    .unwrap();
    assert!(!joined);

    let members = ListMembersUseCase { repo: store }
        .execute(bin.id)
        .await
        .unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].role, MemberRole::Owner);
}

#[tokio::test]
async fn should_not_join_unknown_bin() {
    let err = JoinBinUseCase {
        repo: MemStore::new(),
    }
    .execute(Uuid::new_v4(), Uuid::new_v4())
    .await
    .unwrap_err();
    assert!(matches!(err, CompostServiceError::BinNotFound));
}

#[tokio::test]
async fn should_list_members_in_join_order() {
    let store = MemStore::new();
    let owner = Uuid::new_v4();
    let volunteer = Uuid::new_v4();
    let bin = seed_bin(&store, owner, "Garden").await;
    join(&store, volunteer, bin.id).await;

    let members = ListMembersUseCase { repo: store }
        .execute(bin.id)
        .await
        .unwrap();
    let users: Vec<_> = members.iter().map(|m| (m.user_id, m.role)).collect();
    assert_eq!(
        users,
        [(owner, MemberRole::Owner), (volunteer, MemberRole::Member)]
    );
}
