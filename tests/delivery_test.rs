//! Delivery registry fan-out behavior and housekeeping archival.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use connect_core::config::realtime::RealtimeConfig;
use connect_database::store::NotificationStore;
use connect_entity::notification::{Notification, NotificationCategory, NotificationPriority};
use connect_entity::user::UserRole;
use connect_realtime::connection::registry::DeliveryRegistry;
use connect_realtime::message::types::ServerEvent;
use connect_worker::NotificationArchiver;

use common::InMemoryNotificationStore;

fn notification_aged(recipient: Uuid, days_old: i64) -> Notification {
    Notification {
        id: Uuid::new_v4(),
        recipient_id: recipient,
        actor_id: None,
        category: NotificationCategory::Generic,
        title: "old".to_string(),
        message: None,
        redirect_url: None,
        payload: None,
        priority: NotificationPriority::Normal,
        is_read: false,
        read_at: None,
        is_dismissed: false,
        is_archived: false,
        created_at: Utc::now() - Duration::days(days_old),
    }
}

#[tokio::test]
async fn test_multi_device_fan_out_counts_each_channel() {
    let registry = DeliveryRegistry::new(RealtimeConfig::default());
    let principal = Uuid::new_v4();

    let (_h1, mut rx1) = registry.register(principal, UserRole::Student);
    let (_h2, mut rx2) = registry.register(principal, UserRole::Student);
    let (_h3, mut rx3) = registry.register(principal, UserRole::Student);
    assert_eq!(registry.channel_count(), 3);
    assert_eq!(registry.principal_count(), 1);

    let reached = registry.push_to_principal(principal, &ServerEvent::NotificationsAllRead);
    assert_eq!(reached, 3);

    for rx in [&mut rx1, &mut rx2, &mut rx3] {
        let raw = rx.recv().await.expect("event");
        let event: ServerEvent = serde_json::from_str(&raw).unwrap();
        assert!(matches!(event, ServerEvent::NotificationsAllRead));
    }
}

#[tokio::test]
async fn test_disconnect_shrinks_the_target_set() {
    let registry = DeliveryRegistry::new(RealtimeConfig::default());
    let principal = Uuid::new_v4();

    let (h1, _rx1) = registry.register(principal, UserRole::Faculty);
    let (_h2, _rx2) = registry.register(principal, UserRole::Faculty);

    registry.unregister(&h1.id);
    assert_eq!(registry.channel_count(), 1);
    assert!(registry.is_principal_connected(&principal));

    let reached = registry.push_to_principal(principal, &ServerEvent::NotificationsAllRead);
    assert_eq!(reached, 1);

    // A second unregister of the same channel is a no-op.
    assert!(registry.unregister(&h1.id).is_none());
}

#[tokio::test]
async fn test_role_index_follows_unregistration() {
    let registry = DeliveryRegistry::new(RealtimeConfig::default());

    let (admin_handle, _rx) = registry.register(Uuid::new_v4(), UserRole::Admin);
    assert_eq!(
        registry.push_to_role(UserRole::Admin, &ServerEvent::NotificationsAllRead),
        1
    );

    registry.unregister(&admin_handle.id);
    assert_eq!(
        registry.push_to_role(UserRole::Admin, &ServerEvent::NotificationsAllRead),
        0
    );
}

#[tokio::test]
async fn test_close_all_empties_the_registry() {
    let registry = DeliveryRegistry::new(RealtimeConfig::default());
    for _ in 0..4 {
        let (_h, _rx) = registry.register(Uuid::new_v4(), UserRole::Student);
    }
    assert_eq!(registry.channel_count(), 4);

    registry.close_all();
    assert_eq!(registry.channel_count(), 0);
    assert_eq!(registry.principal_count(), 0);
}

#[tokio::test]
async fn test_saturated_channel_is_skipped_not_fatal() {
    let config = RealtimeConfig {
        channel_buffer_size: 1,
        ..RealtimeConfig::default()
    };
    let registry = DeliveryRegistry::new(config);
    let principal = Uuid::new_v4();
    let (_h, _rx) = registry.register(principal, UserRole::Student);

    // First push fills the single-slot buffer; the second is dropped.
    assert_eq!(
        registry.push_to_principal(principal, &ServerEvent::NotificationsAllRead),
        1
    );
    assert_eq!(
        registry.push_to_principal(principal, &ServerEvent::NotificationsAllRead),
        0
    );
}

#[tokio::test]
async fn test_archiver_ages_out_and_trims_overflow() {
    let store = Arc::new(InMemoryNotificationStore::new());
    let recipient = Uuid::new_v4();

    // Two stale notifications and three fresh ones.
    store.insert(notification_aged(recipient, 40)).await.unwrap();
    store.insert(notification_aged(recipient, 35)).await.unwrap();
    for _ in 0..3 {
        store.insert(notification_aged(recipient, 0)).await.unwrap();
    }

    let archiver = NotificationArchiver::new(
        store.clone() as Arc<dyn NotificationStore>,
        30, // archive_after_days
        2,  // max_stored_per_principal
    );

    let (aged, overflow) = archiver.run_once().await.unwrap();
    assert_eq!(aged, 2);
    // Three fresh ones remain; keeping two archives one more.
    assert_eq!(overflow, 1);

    assert_eq!(store.count(recipient, false).await.unwrap(), 2);
}
