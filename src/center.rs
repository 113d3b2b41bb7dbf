use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tracing::debug;

use crate::api::{Endpoint, PortalClient, Transport};
use crate::badge::{BadgeState, BadgeView};
use crate::error::PortalResult;
use crate::logging::report_failure;
use crate::notification::Notification;
use crate::schedule::Sleeper;
use crate::templates::notification_template::{
    render_notification_list, NotificationListView, RowInput,
};
use crate::timestamp::TimestampFormatter;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Orders responses from overlapping polls. A response is applied only when
/// its ticket is newer than the last one applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sequencer {
    issued: u64,
    applied: u64,
}

impl Sequencer {
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    pub fn accept(&mut self, ticket: Ticket) -> bool {
        if ticket.0 > self.applied {
            self.applied = ticket.0;
            true
        } else {
            false
        }
    }

    /// Drop every response still in flight.
    pub fn invalidate(&mut self) {
        self.applied = self.issued;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NotificationRow {
    pub notification: Notification,
    pub unread: bool,
    pub fading: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CenterState {
    badge: BadgeState,
    rows: Vec<NotificationRow>,
    count_seen: bool,
    list_seen: bool,
    counts: Sequencer,
    lists: Sequencer,
}

impl CenterState {
    pub fn badge(&self) -> BadgeState {
        self.badge
    }

    pub fn rows(&self) -> &[NotificationRow] {
        &self.rows
    }

    /// False until a count has been applied; the page's own badge stands until then.
    pub fn has_count(&self) -> bool {
        self.count_seen
    }

    /// False until a list has been applied.
    pub fn has_list(&self) -> bool {
        self.list_seen
    }

    pub fn begin_refresh(&mut self) -> (Ticket, Ticket) {
        (self.counts.issue(), self.lists.issue())
    }

    pub fn apply_count(&mut self, ticket: Ticket, count: i64) -> bool {
        if !self.counts.accept(ticket) {
            return false;
        }
        self.badge = BadgeState::from_count(count);
        self.count_seen = true;
        true
    }

    pub fn apply_items(&mut self, ticket: Ticket, items: Vec<Notification>) -> bool {
        if !self.lists.accept(ticket) {
            return false;
        }
        self.rows = items
            .into_iter()
            .map(|notification| NotificationRow {
                unread: !notification.read,
                notification,
                fading: false,
            })
            .collect();
        self.list_seen = true;
        true
    }

    pub fn mark_all_read_locally(&mut self) {
        self.badge = BadgeState::default();
        self.count_seen = true;
        for row in &mut self.rows {
            row.unread = false;
        }
        self.counts.invalidate();
        self.lists.invalidate();
    }

    pub fn start_fade(&mut self, id: i64) -> bool {
        self.lists.invalidate();
        match self.rows.iter_mut().find(|row| row.notification.id == id) {
            Some(row) => {
                row.fading = true;
                true
            }
            None => false,
        }
    }

    pub fn remove_row(&mut self, id: i64) -> bool {
        self.lists.invalidate();
        let before = self.rows.len();
        self.rows.retain(|row| row.notification.id != id);
        self.rows.len() != before
    }

    pub fn list_view(
        &self,
        formatter: &TimestampFormatter,
        empty_message: &str,
    ) -> NotificationListView {
        render_notification_list(
            self.rows.iter().map(|row| RowInput {
                notification: &row.notification,
                unread: row.unread,
                fading: row.fading,
            }),
            formatter,
            empty_message,
        )
    }
}

/// Where the center keeps its state. The browser build stores it in a
/// reactive signal so every write re-renders the dropdown.
pub trait CenterStore {
    fn read<R>(&self, f: impl FnOnce(&CenterState) -> R) -> R;
    fn write<R>(&self, f: impl FnOnce(&mut CenterState) -> R) -> R;
}

impl CenterStore for Rc<RefCell<CenterState>> {
    fn read<R>(&self, f: impl FnOnce(&CenterState) -> R) -> R {
        f(&self.borrow())
    }

    fn write<R>(&self, f: impl FnOnce(&mut CenterState) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}

pub struct NotificationCenter<T, St, Sl> {
    client: Rc<PortalClient<T>>,
    store: St,
    sleeper: Rc<Sl>,
    fade: Duration,
}

impl<T, St: Clone, Sl> Clone for NotificationCenter<T, St, Sl> {
    fn clone(&self) -> Self {
        Self {
            client: Rc::clone(&self.client),
            store: self.store.clone(),
            sleeper: Rc::clone(&self.sleeper),
            fade: self.fade,
        }
    }
}

impl<T, St, Sl> NotificationCenter<T, St, Sl>
where
    T: Transport,
    St: CenterStore,
    Sl: Sleeper,
{
    pub fn new(client: PortalClient<T>, store: St, sleeper: Sl, fade: Duration) -> Self {
        Self {
            client: Rc::new(client),
            store,
            sleeper: Rc::new(sleeper),
            fade,
        }
    }

    pub fn client(&self) -> &PortalClient<T> {
        &self.client
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    pub fn view(
        &self,
        formatter: &TimestampFormatter,
        empty_message: &str,
    ) -> (BadgeView, NotificationListView) {
        self.store.read(|state| {
            (
                state.badge().view(),
                state.list_view(formatter, empty_message),
            )
        })
    }

    /// Fetch the unread count and list together and apply whichever arrive.
    pub async fn refresh(&self) -> PortalResult<()> {
        let (count_ticket, list_ticket) = self.store.write(CenterState::begin_refresh);
        let (count, items) = futures::join!(
            self.client.unread_notification_count(),
            self.client.unread_notifications()
        );

        let mut outcome = Ok(());
        match count {
            Ok(count) => {
                if !self.store.write(|state| state.apply_count(count_ticket, count)) {
                    debug!(count, "discarding stale unread count");
                }
            }
            Err(err) => {
                report_failure(Endpoint::NotificationsUnreadCount.operation(), &err);
                outcome = Err(err);
            }
        }
        match items {
            Ok(items) => {
                let len = items.len();
                if !self.store.write(|state| state.apply_items(list_ticket, items)) {
                    debug!(len, "discarding stale notification list");
                }
            }
            Err(err) => {
                report_failure(Endpoint::NotificationsUnread.operation(), &err);
                if outcome.is_ok() {
                    outcome = Err(err);
                }
            }
        }
        outcome
    }

    pub async fn mark_read(&self, id: i64) -> PortalResult<()> {
        logged(Endpoint::MarkRead(id), self.client.mark_read(id).await)?;
        self.refresh().await
    }

    /// Clears unread styling locally instead of refetching.
    pub async fn mark_all_read(&self) -> PortalResult<()> {
        logged(Endpoint::MarkAllRead, self.client.mark_all_read().await)?;
        self.store.write(CenterState::mark_all_read_locally);
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> PortalResult<()> {
        logged(Endpoint::Delete(id), self.client.delete(id).await)?;
        if self.store.write(|state| state.start_fade(id)) {
            self.sleeper.sleep(self.fade).await;
            self.store.write(|state| state.remove_row(id));
        }
        self.refresh().await
    }
}

fn logged<R>(endpoint: Endpoint, result: PortalResult<R>) -> PortalResult<R> {
    if let Err(err) = &result {
        report_failure(endpoint.operation(), err);
    }
    result
}
