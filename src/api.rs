use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::PortalResult;
use crate::notification::Notification;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Every server call the page makes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    MessagesUnreadCount,
    NotificationsUnreadCount,
    NotificationsUnread,
    MarkAllRead,
    MarkRead(i64),
    Delete(i64),
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::MessagesUnreadCount
            | Endpoint::NotificationsUnreadCount
            | Endpoint::NotificationsUnread => Method::Get,
            Endpoint::MarkAllRead | Endpoint::MarkRead(_) | Endpoint::Delete(_) => Method::Post,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Endpoint::MessagesUnreadCount => "/api/messages/unread-count".into(),
            Endpoint::NotificationsUnreadCount => "/notifications/unread-count".into(),
            Endpoint::NotificationsUnread => "/notifications/unread".into(),
            Endpoint::MarkAllRead => "/notifications/mark-all-read".into(),
            Endpoint::MarkRead(id) => format!("/notifications/mark-read/{id}"),
            Endpoint::Delete(id) => format!("/notifications/delete/{id}"),
        }
    }

    /// Short label used in log lines.
    pub fn operation(&self) -> &'static str {
        match self {
            Endpoint::MessagesUnreadCount => "messages.unread_count",
            Endpoint::NotificationsUnreadCount => "notifications.unread_count",
            Endpoint::NotificationsUnread => "notifications.unread",
            Endpoint::MarkAllRead => "notifications.mark_all_read",
            Endpoint::MarkRead(_) => "notifications.mark_read",
            Endpoint::Delete(_) => "notifications.delete",
        }
    }
}

/// Join an endpoint path onto a configured base, which may be empty (same origin).
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Moves bytes to and from the server. Implementations return the response
/// body for 2xx responses and an error for everything else.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, endpoint: Endpoint) -> PortalResult<String>;
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
pub struct CountResponse {
    #[serde(default)]
    pub count: i64,
}

/// Typed access to the endpoint table on top of a [`Transport`].
pub struct PortalClient<T> {
    transport: T,
}

impl<T: Transport> PortalClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn unread_message_count(&self) -> PortalResult<i64> {
        let resp: CountResponse = self.get_json(Endpoint::MessagesUnreadCount).await?;
        Ok(resp.count)
    }

    pub async fn unread_notification_count(&self) -> PortalResult<i64> {
        let resp: CountResponse = self.get_json(Endpoint::NotificationsUnreadCount).await?;
        Ok(resp.count)
    }

    pub async fn unread_notifications(&self) -> PortalResult<Vec<Notification>> {
        self.get_json(Endpoint::NotificationsUnread).await
    }

    pub async fn mark_all_read(&self) -> PortalResult<()> {
        self.transport.send(Endpoint::MarkAllRead).await.map(|_| ())
    }

    pub async fn mark_read(&self, id: i64) -> PortalResult<()> {
        self.transport.send(Endpoint::MarkRead(id)).await.map(|_| ())
    }

    pub async fn delete(&self, id: i64) -> PortalResult<()> {
        self.transport.send(Endpoint::Delete(id)).await.map(|_| ())
    }

    async fn get_json<R: DeserializeOwned>(&self, endpoint: Endpoint) -> PortalResult<R> {
        let body = self.transport.send(endpoint).await?;
        Ok(serde_json::from_str(&body)?)
    }
}
