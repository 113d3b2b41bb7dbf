use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    EventCreated,
    EventApproved,
    EventRejected,
    EventCanceled,
    UserJoined,
    UserLeft,
    EventReminder,
    ApproachingDeadline,
    NewEventPending,
    NewMessage,
    System,
    #[serde(other)]
    Unknown,
}

/// One row of `/notifications/unread`. Only `id` is required; the server's
/// other fields (such as the owning user) are ignored.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: Option<NotificationKind>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub created_at: Option<Value>,
    #[serde(default)]
    pub read: bool,
}

impl Notification {
    pub fn kind(&self) -> NotificationKind {
        self.kind.unwrap_or(NotificationKind::System)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_server_payload() {
        let raw = json!({
            "id": 12,
            "type": "NEW_MESSAGE",
            "message": "You have a new message",
            "link": "/messages/4",
            "createdAt": "2024-05-01T18:30:00",
            "read": false,
            "user": {"id": 3, "username": "ana"}
        });
        let notification: Notification = serde_json::from_value(raw).unwrap();
        assert_eq!(notification.id, 12);
        assert_eq!(notification.kind(), NotificationKind::NewMessage);
        assert_eq!(notification.link.as_deref(), Some("/messages/4"));
        assert!(!notification.read);
    }

    #[test]
    fn unknown_and_null_types_fall_back() {
        let unknown: Notification =
            serde_json::from_value(json!({"id": 1, "type": "BIRTHDAY"})).unwrap();
        assert_eq!(unknown.kind(), NotificationKind::Unknown);

        let null: Notification = serde_json::from_value(json!({"id": 2, "type": null})).unwrap();
        assert_eq!(null.kind(), NotificationKind::System);
        assert!(null.message.is_empty());
        assert!(null.created_at.is_none());
    }
}
