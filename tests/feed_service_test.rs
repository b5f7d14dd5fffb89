//! Feed visibility engine behavior over in-memory stores.

mod common;

use uuid::Uuid;

use connect_core::error::ErrorKind;
use connect_core::types::pagination::PageRequest;
use connect_database::store::FeedStore;
use connect_entity::feed::{FeedCategory, NewFeedPost, Visibility};
use connect_entity::user::UserRole;
use connect_service::RequestContext;

use common::{feed_service, post, profile};

fn ctx(id: Uuid, role: UserRole) -> RequestContext {
    RequestContext::new(id, role, "tester".to_string())
}

#[tokio::test]
async fn test_unknown_viewer_is_rejected() {
    let (service, _, _, _, _) = feed_service();

    let err = service
        .get_feed(Uuid::new_v4(), None, PageRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_own_posts_survive_category_filter() {
    let (service, store, profiles, _, _) = feed_service();
    let viewer = Uuid::new_v4();
    profiles.add(profile(viewer, UserRole::Student));

    let own = post(viewer, FeedCategory::Personal, Visibility::FollowersOnly);
    store.insert(own.clone()).await.unwrap();

    // Filtering by a category the post does NOT have still returns it.
    let feed = service
        .get_feed(
            viewer,
            Some(FeedCategory::JobTeaser),
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(feed.items.len(), 1);
    assert_eq!(feed.items[0].id, own.id);
}

#[tokio::test]
async fn test_admin_broadcast_visible_to_every_viewer() {
    let (service, store, profiles, _, _) = feed_service();
    let viewer = Uuid::new_v4();
    profiles.add(profile(viewer, UserRole::Alumni));

    let broadcast = post(
        Uuid::new_v4(),
        FeedCategory::AdminBroadcast,
        Visibility::FollowersOnly,
    );
    store.insert(broadcast.clone()).await.unwrap();

    let feed = service
        .get_feed(viewer, None, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(feed.items.len(), 1);
    assert_eq!(feed.items[0].id, broadcast.id);
}

#[tokio::test]
async fn test_followers_only_hidden_from_strangers() {
    let (service, store, profiles, _, _) = feed_service();
    let viewer = Uuid::new_v4();
    let author = Uuid::new_v4();
    profiles.add(profile(viewer, UserRole::Student));

    store
        .insert(post(author, FeedCategory::Personal, Visibility::FollowersOnly))
        .await
        .unwrap();

    let feed = service
        .get_feed(viewer, None, PageRequest::default())
        .await
        .unwrap();
    assert!(feed.items.is_empty());
}

#[tokio::test]
async fn test_unfollow_removes_followed_content() {
    let (service, store, profiles, _, _) = feed_service();
    let viewer = Uuid::new_v4();
    let author = Uuid::new_v4();

    let mut viewer_profile = profile(viewer, UserRole::Student);
    viewer_profile.following.push(author);
    profiles.add(viewer_profile);

    store
        .insert(post(author, FeedCategory::Personal, Visibility::FollowersOnly))
        .await
        .unwrap();

    let feed = service
        .get_feed(viewer, None, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(feed.items.len(), 1);

    // A fresh call after unfollowing reflects the new relationship set.
    profiles.set_following(viewer, Vec::new());
    let feed = service
        .get_feed(viewer, None, PageRequest::default())
        .await
        .unwrap();
    assert!(feed.items.is_empty());
}

#[tokio::test]
async fn test_soft_deleted_posts_never_appear() {
    let (service, store, profiles, _, _) = feed_service();
    let author = Uuid::new_v4();
    profiles.add(profile(author, UserRole::Student));

    let p = post(author, FeedCategory::Personal, Visibility::Public);
    store.insert(p.clone()).await.unwrap();

    service
        .delete_post(&ctx(author, UserRole::Student), p.id)
        .await
        .unwrap();

    // Hidden even from the author.
    let feed = service
        .get_feed(author, None, PageRequest::default())
        .await
        .unwrap();
    assert!(feed.items.is_empty());

    let err = service.get_post(author, p.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_pinned_posts_sort_before_newer_posts() {
    let (service, store, profiles, _, _) = feed_service();
    let viewer = Uuid::new_v4();
    profiles.add(profile(viewer, UserRole::Student));

    let mut pinned = post(Uuid::new_v4(), FeedCategory::Personal, Visibility::Public);
    pinned.is_pinned = true;
    store.insert(pinned.clone()).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    let newer = post(Uuid::new_v4(), FeedCategory::Personal, Visibility::Public);
    store.insert(newer.clone()).await.unwrap();

    let feed = service
        .get_feed(viewer, None, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(feed.items[0].id, pinned.id);
    assert_eq!(feed.items[1].id, newer.id);
}

#[tokio::test]
async fn test_feed_pagination() {
    let (service, store, profiles, _, _) = feed_service();
    let viewer = Uuid::new_v4();
    profiles.add(profile(viewer, UserRole::Student));

    for _ in 0..5 {
        store
            .insert(post(Uuid::new_v4(), FeedCategory::Personal, Visibility::Public))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let page1 = service
        .get_feed(viewer, None, PageRequest::new(1, 2))
        .await
        .unwrap();
    let page2 = service
        .get_feed(viewer, None, PageRequest::new(2, 2))
        .await
        .unwrap();

    assert_eq!(page1.items.len(), 2);
    assert_eq!(page2.items.len(), 2);
    assert_eq!(page1.total_items, 5);
    assert_eq!(page1.total_pages, 3);

    let ids1: Vec<Uuid> = page1.items.iter().map(|p| p.id).collect();
    assert!(page2.items.iter().all(|p| !ids1.contains(&p.id)));
}

#[tokio::test]
async fn test_create_post_validations() {
    let (service, _, profiles, _, _) = feed_service();
    let author = Uuid::new_v4();
    profiles.add(profile(author, UserRole::Student));
    let author_ctx = ctx(author, UserRole::Student);

    // Empty posts are rejected.
    let err = service
        .create_post(
            &author_ctx,
            NewFeedPost {
                author_id: author,
                body: Some("   ".to_string()),
                ..NewFeedPost::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    // Announcements need the admin role.
    let err = service
        .create_post(
            &author_ctx,
            NewFeedPost {
                author_id: author,
                category: Some(FeedCategory::AdminBroadcast),
                body: Some("hi".to_string()),
                ..NewFeedPost::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    // Community-only visibility needs a community reference.
    let err = service
        .create_post(
            &author_ctx,
            NewFeedPost {
                author_id: author,
                body: Some("hi".to_string()),
                visibility: Some(Visibility::CommunityOnly),
                ..NewFeedPost::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_like_toggle_notifies_author_once() {
    let (service, store, profiles, notifications, _) = feed_service();
    let author = Uuid::new_v4();
    let liker = Uuid::new_v4();
    profiles.add(profile(author, UserRole::Student));
    profiles.add(profile(liker, UserRole::Student));

    let p = post(author, FeedCategory::Personal, Visibility::Public);
    store.insert(p.clone()).await.unwrap();

    let outcome = service
        .toggle_like(&ctx(liker, UserRole::Student), p.id)
        .await
        .unwrap();
    assert!(outcome.liked);
    assert_eq!(outcome.like_count, 1);

    // The author got a reaction notification.
    assert_eq!(notifications.unread_count(author).await.unwrap(), 1);

    // Unliking does not notify.
    let outcome = service
        .toggle_like(&ctx(liker, UserRole::Student), p.id)
        .await
        .unwrap();
    assert!(!outcome.liked);
    assert_eq!(outcome.like_count, 0);
    assert_eq!(notifications.unread_count(author).await.unwrap(), 1);
}

#[tokio::test]
async fn test_self_like_does_not_notify() {
    let (service, store, profiles, notifications, _) = feed_service();
    let author = Uuid::new_v4();
    profiles.add(profile(author, UserRole::Student));

    let p = post(author, FeedCategory::Personal, Visibility::Public);
    store.insert(p.clone()).await.unwrap();

    service
        .toggle_like(&ctx(author, UserRole::Student), p.id)
        .await
        .unwrap();
    assert_eq!(notifications.unread_count(author).await.unwrap(), 0);
}

#[tokio::test]
async fn test_comment_notifies_author() {
    let (service, store, profiles, notifications, _) = feed_service();
    let author = Uuid::new_v4();
    let commenter = Uuid::new_v4();
    profiles.add(profile(author, UserRole::Student));
    profiles.add(profile(commenter, UserRole::Alumni));

    let p = post(author, FeedCategory::Personal, Visibility::Public);
    store.insert(p.clone()).await.unwrap();

    let updated = service
        .add_comment(
            &ctx(commenter, UserRole::Alumni),
            p.id,
            "great post".to_string(),
        )
        .await
        .unwrap();
    assert_eq!(updated.comments.0.len(), 1);
    assert_eq!(notifications.unread_count(author).await.unwrap(), 1);

    // Blank comments are rejected.
    let err = service
        .add_comment(&ctx(commenter, UserRole::Alumni), p.id, "  ".to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_non_author_cannot_update_or_delete() {
    let (service, store, profiles, _, _) = feed_service();
    let author = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    profiles.add(profile(author, UserRole::Student));
    profiles.add(profile(stranger, UserRole::Student));

    let p = post(author, FeedCategory::Personal, Visibility::Public);
    store.insert(p.clone()).await.unwrap();

    let err = service
        .update_post(
            &ctx(stranger, UserRole::Student),
            p.id,
            Some("hijacked".to_string()),
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = service
        .delete_post(&ctx(stranger, UserRole::Student), p.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    // Admins may delete anyone's post.
    service
        .delete_post(&ctx(Uuid::new_v4(), UserRole::Admin), p.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_new_post_notifies_followers() {
    let (service, _, profiles, notifications, _) = feed_service();
    let author = Uuid::new_v4();
    let follower = Uuid::new_v4();
    profiles.add(profile(author, UserRole::Student));

    let mut follower_profile = profile(follower, UserRole::Student);
    follower_profile.following.push(author);
    profiles.add(follower_profile);

    service
        .create_post(
            &ctx(author, UserRole::Student),
            NewFeedPost {
                author_id: author,
                body: Some("fresh post".to_string()),
                ..NewFeedPost::default()
            },
        )
        .await
        .unwrap();

    // Follower fan-out runs detached; give it a moment.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    assert_eq!(notifications.unread_count(follower).await.unwrap(), 1);
    assert_eq!(notifications.unread_count(author).await.unwrap(), 0);
}
