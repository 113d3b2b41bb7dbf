use crate::notification::{Notification, NotificationKind};
use crate::timestamp::TimestampFormatter;

pub const NOTIFICATION_BADGE_ID: &str = "notificationBadge";
pub const NOTIFICATION_COUNT_ID: &str = "notificationCount";
pub const NOTIFICATION_LIST_ID: &str = "notificationList";
pub const MARK_ALL_READ_ID: &str = "markAllRead";
pub const ITEM_CLASS: &str = "notification-item";
pub const DELETE_CLASS: &str = "delete-notification";
pub const EMPTY_ICON_CLASS: &str = "bi bi-bell text-muted fs-3";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotificationIcon {
    pub glyph: &'static str,
    pub tone: &'static str,
}

impl NotificationIcon {
    pub fn class(&self) -> String {
        format!("bi {} {}", self.glyph, self.tone)
    }
}

pub fn icon_for(kind: NotificationKind) -> NotificationIcon {
    let (glyph, tone) = match kind {
        NotificationKind::EventApproved => ("bi-check-circle-fill", "text-success"),
        NotificationKind::EventRejected => ("bi-x-circle-fill", "text-danger"),
        NotificationKind::EventCanceled => ("bi-slash-circle-fill", "text-warning"),
        NotificationKind::NewEventPending => ("bi-hourglass-split", "text-primary"),
        NotificationKind::NewMessage => ("bi-envelope-fill", "text-info"),
        _ => ("bi-gear-fill", "text-secondary"),
    };
    NotificationIcon { glyph, tone }
}

/// What the dropdown shows for one row of state.
#[derive(Clone, Debug, PartialEq)]
pub struct NotificationRowView {
    pub id: i64,
    pub icon: NotificationIcon,
    pub message: String,
    pub timestamp: String,
    pub link: Option<String>,
    pub unread: bool,
    pub fading: bool,
}

impl NotificationRowView {
    pub fn item_class(&self) -> String {
        let mut class = String::from(ITEM_CLASS);
        if self.unread {
            class.push_str(" unread");
        }
        class.push_str(" p-3 border-bottom position-relative");
        if self.fading {
            class.push_str(" fading");
        }
        class
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmptyStateView {
    pub icon_class: &'static str,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NotificationListView {
    Empty(EmptyStateView),
    Items(Vec<NotificationRowView>),
}

impl NotificationListView {
    pub fn is_empty(&self) -> bool {
        matches!(self, NotificationListView::Empty(_))
    }
}

pub struct RowInput<'a> {
    pub notification: &'a Notification,
    pub unread: bool,
    pub fading: bool,
}

pub fn render_notification(input: RowInput<'_>, formatter: &TimestampFormatter) -> NotificationRowView {
    let notification = input.notification;
    NotificationRowView {
        id: notification.id,
        icon: icon_for(notification.kind()),
        message: notification.message.clone(),
        timestamp: formatter.format(notification.created_at.as_ref()),
        link: notification.link.as_deref().and_then(safe_link),
        unread: input.unread,
        fading: input.fading,
    }
}

pub fn render_notification_list<'a>(
    rows: impl IntoIterator<Item = RowInput<'a>>,
    formatter: &TimestampFormatter,
    empty_message: &str,
) -> NotificationListView {
    let items: Vec<NotificationRowView> = rows
        .into_iter()
        .map(|row| render_notification(row, formatter))
        .collect();
    if items.is_empty() {
        NotificationListView::Empty(EmptyStateView {
            icon_class: EMPTY_ICON_CLASS,
            message: empty_message.to_string(),
        })
    } else {
        NotificationListView::Items(items)
    }
}

/// Where a click inside a row landed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClickTarget {
    /// Inside the row's [`DELETE_CLASS`] control.
    pub delete_control: bool,
    /// Inside any other `<button>` in the row.
    pub button: bool,
}

/// What a click on row `id` should do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowClick {
    /// Mark the row read. Link clicks land here too and still navigate.
    Open(i64),
    /// Delete the row; the click must not reach the row itself.
    Delete(i64),
    Ignore,
}

impl RowClick {
    pub fn route(id: i64, target: ClickTarget) -> Self {
        if target.delete_control {
            RowClick::Delete(id)
        } else if target.button {
            RowClick::Ignore
        } else {
            RowClick::Open(id)
        }
    }

    /// Delete clicks stop here: default action prevented, propagation stopped.
    pub fn consumes_event(&self) -> bool {
        matches!(self, RowClick::Delete(_))
    }
}

/// Keep links that stay on the site or use http(s); drop script and data URLs.
pub fn safe_link(raw: &str) -> Option<String> {
    let link = raw.trim();
    if link.is_empty() || link.starts_with("//") {
        return None;
    }
    let lower = link.to_ascii_lowercase();
    let allowed = link.starts_with('/')
        || lower.starts_with("http://")
        || lower.starts_with("https://")
        || !lower.contains(':');
    allowed.then(|| link.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use serde_json::json;

    fn formatter() -> TimestampFormatter {
        TimestampFormatter::new("%Y-%m-%d %H:%M", FixedOffset::east_opt(0).unwrap())
    }

    fn notification(kind: &str) -> Notification {
        serde_json::from_value(json!({
            "id": 5,
            "type": kind,
            "message": "<b>Event approved</b>",
            "link": "/events/5",
            "createdAt": "2024-05-01T18:30:00"
        }))
        .unwrap()
    }

    #[test]
    fn icon_table() {
        assert_eq!(icon_for(NotificationKind::NewMessage).class(), "bi bi-envelope-fill text-info");
        assert_eq!(icon_for(NotificationKind::EventApproved).glyph, "bi-check-circle-fill");
        assert_eq!(icon_for(NotificationKind::EventRejected).tone, "text-danger");
        assert_eq!(icon_for(NotificationKind::EventCanceled).glyph, "bi-slash-circle-fill");
        assert_eq!(icon_for(NotificationKind::NewEventPending).glyph, "bi-hourglass-split");
        for fallback in [
            NotificationKind::System,
            NotificationKind::Unknown,
            NotificationKind::UserJoined,
            NotificationKind::EventReminder,
        ] {
            assert_eq!(icon_for(fallback).class(), "bi bi-gear-fill text-secondary");
        }
    }

    #[test]
    fn row_carries_raw_message_text() {
        let n = notification("EVENT_APPROVED");
        let row = render_notification(
            RowInput {
                notification: &n,
                unread: true,
                fading: false,
            },
            &formatter(),
        );
        assert_eq!(row.message, "<b>Event approved</b>");
        assert_eq!(row.timestamp, "2024-05-01 18:30");
        assert_eq!(row.link.as_deref(), Some("/events/5"));
        assert_eq!(
            row.item_class(),
            "notification-item unread p-3 border-bottom position-relative"
        );
    }

    #[test]
    fn fading_rows_get_the_transition_class() {
        let n = notification("SYSTEM");
        let row = render_notification(
            RowInput {
                notification: &n,
                unread: false,
                fading: true,
            },
            &formatter(),
        );
        assert_eq!(
            row.item_class(),
            "notification-item p-3 border-bottom position-relative fading"
        );
    }

    #[test]
    fn empty_input_renders_empty_state() {
        let view = render_notification_list(Vec::new(), &formatter(), "No new notifications");
        assert_eq!(
            view,
            NotificationListView::Empty(EmptyStateView {
                icon_class: EMPTY_ICON_CLASS,
                message: "No new notifications".into(),
            })
        );
    }

    #[test]
    fn delete_control_never_opens() {
        for button in [false, true] {
            let click = RowClick::route(
                7,
                ClickTarget {
                    delete_control: true,
                    button,
                },
            );
            assert_eq!(click, RowClick::Delete(7));
            assert!(click.consumes_event());
        }
    }

    #[test]
    fn body_and_link_clicks_open() {
        let click = RowClick::route(7, ClickTarget::default());
        assert_eq!(click, RowClick::Open(7));
        assert!(!click.consumes_event());
    }

    #[test]
    fn other_buttons_are_ignored() {
        let target = ClickTarget {
            delete_control: false,
            button: true,
        };
        assert_eq!(RowClick::route(7, target), RowClick::Ignore);
    }

    #[test]
    fn link_filter() {
        assert_eq!(safe_link("/events/1").as_deref(), Some("/events/1"));
        assert_eq!(safe_link("events/1").as_deref(), Some("events/1"));
        assert_eq!(safe_link("HTTPS://example.org").as_deref(), Some("HTTPS://example.org"));
        assert!(safe_link("javascript:alert(1)").is_none());
        assert!(safe_link(" JavaScript:alert(1)").is_none());
        assert!(safe_link("data:text/html,hi").is_none());
        assert!(safe_link("//evil.example").is_none());
        assert!(safe_link("   ").is_none());
    }
}
