//! Convenience producers — fixed-shape wrappers around `create` for the
//! actions that generate notifications.

use tracing::{info, warn};
use uuid::Uuid;

use connect_core::result::AppResult;
use connect_entity::notification::{NewNotification, NotificationCategory, NotificationPriority};
use connect_entity::user::UserRole;
use connect_realtime::message::types::ServerEvent;

use super::service::NotificationService;

/// Who a broadcast is addressed to.
#[derive(Debug, Clone)]
pub enum BroadcastAudience {
    /// Every known principal.
    All,
    /// Every principal holding a role.
    Role(UserRole),
    /// An explicit recipient list.
    Principals(Vec<Uuid>),
}

impl NotificationService {
    /// A followed author published a new post.
    pub async fn notify_post_published(
        &self,
        recipient_id: Uuid,
        actor_id: Uuid,
        post_id: Uuid,
    ) -> AppResult<()> {
        self.create(NewNotification {
            recipient_id,
            actor_id: Some(actor_id),
            category: Some(NotificationCategory::ContentUpdate),
            title: "New post".to_string(),
            message: Some("Someone you follow shared a new post".to_string()),
            redirect_url: Some(format!("/feed/{post_id}")),
            ..NewNotification::default()
        })
        .await?;
        Ok(())
    }

    /// Someone liked the recipient's post.
    pub async fn notify_reaction(
        &self,
        recipient_id: Uuid,
        actor_id: Uuid,
        post_id: Uuid,
    ) -> AppResult<()> {
        self.create(NewNotification {
            recipient_id,
            actor_id: Some(actor_id),
            category: Some(NotificationCategory::Reaction),
            title: "New like".to_string(),
            message: Some("Someone liked your post".to_string()),
            redirect_url: Some(format!("/feed/{post_id}")),
            ..NewNotification::default()
        })
        .await?;
        Ok(())
    }

    /// Someone commented on the recipient's post.
    pub async fn notify_comment(
        &self,
        recipient_id: Uuid,
        actor_id: Uuid,
        post_id: Uuid,
    ) -> AppResult<()> {
        self.create(NewNotification {
            recipient_id,
            actor_id: Some(actor_id),
            category: Some(NotificationCategory::Comment),
            title: "New comment".to_string(),
            message: Some("Someone commented on your post".to_string()),
            redirect_url: Some(format!("/feed/{post_id}")),
            ..NewNotification::default()
        })
        .await?;
        Ok(())
    }

    /// Admin broadcast: persists a high-priority record per recipient,
    /// then pushes to the live audience.
    ///
    /// For an explicit recipient list (or everyone) each create pushes
    /// individually; for a role audience the durable rows are written
    /// silently and a single role-wide announcement is pushed instead.
    /// Returns the number of records persisted.
    pub async fn broadcast(
        &self,
        actor_id: Uuid,
        audience: BroadcastAudience,
        title: String,
        message: Option<String>,
        redirect_url: Option<String>,
    ) -> AppResult<u64> {
        let role_target = match &audience {
            BroadcastAudience::Role(role) => Some(*role),
            _ => None,
        };

        let recipients = match audience {
            BroadcastAudience::All => self.profiles.list_all_ids().await?,
            BroadcastAudience::Role(role) => self.profiles.list_ids_by_role(role).await?,
            BroadcastAudience::Principals(ids) => ids,
        };

        let mut persisted = 0u64;
        for recipient_id in recipients {
            let new = NewNotification {
                recipient_id,
                actor_id: Some(actor_id),
                category: Some(NotificationCategory::Broadcast),
                title: title.clone(),
                message: message.clone(),
                redirect_url: redirect_url.clone(),
                priority: Some(NotificationPriority::High),
                ..NewNotification::default()
            };

            // One bad recipient must not sink the rest of the audience.
            let result = if role_target.is_some() {
                self.create_silent(new).await
            } else {
                self.create(new).await
            };

            match result {
                Ok(_) => persisted += 1,
                Err(e) => {
                    warn!(recipient_id = %recipient_id, error = %e, "Broadcast record failed")
                }
            }
        }

        if let Some(role) = role_target {
            let reached = self.registry.push_to_role(
                role,
                &ServerEvent::Announcement {
                    title: title.clone(),
                    message: message.clone(),
                    priority: NotificationPriority::High,
                    timestamp: chrono::Utc::now(),
                },
            );
            info!(role = %role, persisted, reached, "Role broadcast delivered");
        } else {
            info!(persisted, "Broadcast delivered");
        }

        Ok(persisted)
    }
}
