use crate::api::{PortalClient, Transport};
use crate::error::PortalResult;
use crate::logging::report_failure;

pub const ADMIN_BADGE_ID: &str = "unreadBadge";

/// A count indicator that hides itself at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BadgeState {
    count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BadgeView {
    pub visible: bool,
    pub text: String,
}

impl BadgeState {
    /// Negative counts from the server are treated as zero.
    pub fn from_count(count: i64) -> Self {
        Self {
            count: u64::try_from(count).unwrap_or(0),
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn view(&self) -> BadgeView {
        BadgeView {
            visible: self.count > 0,
            text: self.count.to_string(),
        }
    }
}

impl BadgeView {
    /// Value for the host element's `style.display`.
    pub fn display_value(&self) -> &'static str {
        if self.visible {
            "inline-block"
        } else {
            "none"
        }
    }

    /// Text to write into the page. A hidden badge keeps whatever it showed.
    pub fn shown_text(&self) -> Option<&str> {
        self.visible.then_some(self.text.as_str())
    }
}

/// One admin poll: fetch the unread message count and turn it into a badge.
pub async fn fetch_unread_messages<T: Transport>(
    client: &PortalClient<T>,
) -> PortalResult<BadgeState> {
    match client.unread_message_count().await {
        Ok(count) => Ok(BadgeState::from_count(count)),
        Err(err) => {
            report_failure("messages.unread_count", &err);
            Err(err)
        }
    }
}
