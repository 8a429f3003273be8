#![cfg(feature = "inmem-store")]

use chrono::Utc;
use gripe::models::{AdminComment, ComplaintFilter, NewComplaint, Profile, Status};
use gripe::store::inmem::InMemStore;
use gripe::store::{ComplaintStore, ProfileStore, StoreError};
use gripe::tags::Tag;

fn new_complaint(owner: &str, title: &str, tags: Vec<Tag>) -> NewComplaint {
    NewComplaint {
        owner_id: owner.to_string(),
        title: title.to_string(),
        description: "details".to_string(),
        tags,
        image_url: None,
    }
}

#[tokio::test]
async fn insert_defaults_and_owner_listing_order() {
    let store = InMemStore::new();
    let first = store
        .insert_complaint(new_complaint("alice", "first", vec![Tag::Campus]))
        .await
        .unwrap();
    assert_eq!(first.status, Status::Pending);
    assert_eq!(first.upvotes, 0);
    assert!(first.admin_comments.is_empty());
    assert!(first.assigned_to.is_none());

    store
        .insert_complaint(new_complaint("alice", "second", vec![]))
        .await
        .unwrap();
    store
        .insert_complaint(new_complaint("bob", "other", vec![]))
        .await
        .unwrap();

    let mine = store.list_by_owner("alice", None).await.unwrap();
    assert_eq!(mine.len(), 2);
    // newest first
    assert_eq!(mine[0].title, "second");
    assert_eq!(mine[1].title, "first");

    let tagged = store.list_by_owner("alice", Some(Tag::Campus)).await.unwrap();
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0].title, "first");
}

#[tokio::test]
async fn filters_are_conjunctive() {
    let store = InMemStore::new();
    let a = store
        .insert_complaint(new_complaint("alice", "a", vec![Tag::Electricity]))
        .await
        .unwrap();
    store
        .insert_complaint(new_complaint("bob", "b", vec![Tag::Electricity]))
        .await
        .unwrap();
    store.set_status(&a.id, Status::Working).await.unwrap();

    let filter = ComplaintFilter {
        status: Some(Status::Working),
        owner_id: Some("alice".to_string()),
        since: None,
        tag: Some(Tag::Electricity),
    };
    let got = store.list_filtered(filter).await.unwrap();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].title, "a");

    // one mismatching conjunct empties the result
    let filter = ComplaintFilter {
        status: Some(Status::Working),
        owner_id: Some("bob".to_string()),
        since: None,
        tag: None,
    };
    assert!(store.list_filtered(filter).await.unwrap().is_empty());

    let filter = ComplaintFilter { since: Some(Utc::now()), ..Default::default() };
    assert!(store.list_filtered(filter).await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_upvotes_both_land() {
    let store = InMemStore::new();
    let c = store
        .insert_complaint(new_complaint("alice", "hot path", vec![]))
        .await
        .unwrap();

    let (r1, r2) = tokio::join!(store.increment_upvotes(&c.id), store.increment_upvotes(&c.id));
    r1.unwrap();
    r2.unwrap();

    let after = store.get_complaint(&c.id).await.unwrap();
    assert_eq!(after.upvotes, 2);
}

#[tokio::test]
async fn comment_appends_preserve_order() {
    let store = InMemStore::new();
    let c = store
        .insert_complaint(new_complaint("alice", "log", vec![]))
        .await
        .unwrap();

    for text in ["first", "second", "third"] {
        store
            .append_comment(
                &c.id,
                AdminComment { text: text.to_string(), at: Utc::now(), admin_id: "root".into() },
            )
            .await
            .unwrap();
    }
    let after = store.get_complaint(&c.id).await.unwrap();
    let texts: Vec<&str> = after.admin_comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let store = InMemStore::new();
    assert!(matches!(store.get_complaint("nope").await, Err(StoreError::NotFound)));
    assert!(matches!(store.delete_complaint("nope").await, Err(StoreError::NotFound)));
    assert!(matches!(store.increment_upvotes("nope").await, Err(StoreError::NotFound)));
    assert!(matches!(
        store.set_status("nope", Status::Working).await,
        Err(StoreError::NotFound)
    ));
}

#[tokio::test]
async fn profile_update_requires_existing_row() {
    let store = InMemStore::new();
    assert!(matches!(
        store.update_display_name("ghost", "Ghost").await,
        Err(StoreError::NotFound)
    ));

    let profile = Profile {
        id: "u1".into(),
        email: "u1@example.com".into(),
        display_name: "One".into(),
        admin: false,
    };
    store.insert_profile(profile.clone()).await.unwrap();
    // double insert conflicts
    assert!(matches!(store.insert_profile(profile).await, Err(StoreError::Conflict)));

    let updated = store.update_display_name("u1", "One Renamed").await.unwrap();
    assert_eq!(updated.display_name, "One Renamed");
    assert_eq!(store.get_profile("u1").await.unwrap().display_name, "One Renamed");
}
