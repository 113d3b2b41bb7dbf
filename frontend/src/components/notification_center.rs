use std::ops::ControlFlow;
use std::rc::Rc;

use dioxus::prelude::*;
use event_portal_web::api::PortalClient;
use event_portal_web::center::{CenterState, CenterStore, NotificationCenter};
use event_portal_web::config::PortalConfig;
use event_portal_web::schedule::{run_schedule, PollHandle, Schedule};
use event_portal_web::templates::notification_template::{
    NotificationListView, NotificationRowView, RowClick, DELETE_CLASS, MARK_ALL_READ_ID,
    NOTIFICATION_BADGE_ID, NOTIFICATION_COUNT_ID, NOTIFICATION_LIST_ID,
};
use futures::StreamExt;
use tracing::{debug, info};
use web_sys::wasm_bindgen::JsCast;

use crate::dom::{apply_badge, click_target, element_by_id, EventListener};
use crate::http::HttpTransport;
use crate::locale::timestamp_formatter;
use crate::timer::BrowserSleeper;

const STYLE: &str = r#"
.notification-item { cursor: pointer; transition-property: opacity; transition-timing-function: ease; }
.notification-item.fading { opacity: 0; }
"#;

/// Keeps center state in a signal so every write re-renders the list.
#[derive(Clone, Copy)]
pub struct SignalStore(pub Signal<CenterState>);

impl CenterStore for SignalStore {
    fn read<R>(&self, f: impl FnOnce(&CenterState) -> R) -> R {
        self.0.with(f)
    }

    fn write<R>(&self, f: impl FnOnce(&mut CenterState) -> R) -> R {
        let mut signal = self.0;
        signal.with_mut(f)
    }
}

pub type BrowserCenter = NotificationCenter<HttpTransport, SignalStore, BrowserSleeper>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CenterAction {
    Open(i64),
    Delete(i64),
    MarkAllRead,
}

/// Drives the page's notification badge and `#markAllRead` control, and
/// renders the rows when mounted inside `#notificationList`.
#[component]
pub fn NotificationCenterView(config: PortalConfig) -> Element {
    let state = use_signal(CenterState::default);
    let center: BrowserCenter = use_hook(|| {
        NotificationCenter::new(
            PortalClient::new(HttpTransport::new(&config)),
            SignalStore(state),
            BrowserSleeper,
            config.fade_duration(),
        )
    });
    let formatter = use_hook(|| timestamp_formatter(&config));
    let poll = use_hook(|| Rc::new(PollHandle::new()));
    let owns_list = use_hook(|| element_by_id(NOTIFICATION_LIST_ID).is_some());
    let period = config.notification_poll_interval();

    let poller = center.clone();
    use_future(move || {
        let center = poller.clone();
        let token = poll.token();
        async move {
            info!(period_secs = period.as_secs(), "notification polling started");
            run_schedule(&BrowserSleeper, Schedule::every(period).immediately(), token, || {
                let center = center.clone();
                async move {
                    let _ = center.refresh().await;
                    ControlFlow::Continue(())
                }
            })
            .await;
        }
    });

    // one at a time, in click order
    let worker = center.clone();
    let actions = use_coroutine(move |mut rx: UnboundedReceiver<CenterAction>| {
        let center = worker.clone();
        async move {
            while let Some(action) = rx.next().await {
                debug!(?action, "notification action");
                let _ = match action {
                    CenterAction::Open(id) => center.mark_read(id).await,
                    CenterAction::Delete(id) => center.delete(id).await,
                    CenterAction::MarkAllRead => center.mark_all_read().await,
                };
            }
        }
    });

    let _mark_all = use_hook(|| {
        let tx = actions.tx();
        Rc::new(element_by_id(MARK_ALL_READ_ID).and_then(|button| {
            EventListener::new(button.into(), "click", move |_| {
                let _ = tx.unbounded_send(CenterAction::MarkAllRead);
            })
        }))
    });

    use_effect(move || {
        let state = state.read();
        if state.has_count() {
            let view = state.badge().view();
            apply_badge(NOTIFICATION_BADGE_ID, Some(NOTIFICATION_COUNT_ID), &view);
        }
    });

    if !owns_list || !state.read().has_list() {
        return rsx! {};
    }

    let (_, list) = center.view(&formatter, &config.empty_message);
    let fade_millis = config.fade_millis;
    let on_action = move |action: CenterAction| actions.send(action);

    let list_body = match list {
        NotificationListView::Empty(empty) => {
            let message = empty.message;
            rsx! {
                div { class: "text-center py-4 notification-empty",
                    i { class: empty.icon_class }
                    p { class: "text-muted mt-2", "{message}" }
                }
            }
        }
        NotificationListView::Items(rows) => rsx! {
            {rows.into_iter().map(|row| {
                let id = row.id;
                rsx! {
                    NotificationItem { key: "{id}", row, fade_millis, on_action }
                }
            })}
        },
    };

    rsx! {
        style { {STYLE} }
        {list_body}
    }
}

#[component]
fn NotificationItem(
    row: NotificationRowView,
    fade_millis: u64,
    on_action: EventHandler<CenterAction>,
) -> Element {
    let id = row.id;
    let item_class = row.item_class();
    let icon_class = row.icon.class();
    let message = row.message.clone();
    let timestamp = row.timestamp.clone();
    let link = row.link.clone();

    rsx! {
        div {
            class: item_class,
            style: "transition-duration: {fade_millis}ms;",
            "data-notification-id": "{id}",
            onclick: move |evt: MouseEvent| {
                let element = evt
                    .data()
                    .downcast::<web_sys::MouseEvent>()
                    .and_then(|native| native.target())
                    .and_then(|target| target.dyn_into::<web_sys::Element>().ok());
                let click = RowClick::route(id, click_target(element.as_ref()));
                if click.consumes_event() {
                    evt.prevent_default();
                    evt.stop_propagation();
                }
                match click {
                    RowClick::Open(id) => on_action.call(CenterAction::Open(id)),
                    RowClick::Delete(id) => on_action.call(CenterAction::Delete(id)),
                    RowClick::Ignore => {}
                }
            },
            if row.unread {
                div {
                    class: "notification-item-indicator position-absolute bg-primary",
                    style: "width: 4px; height: 100%; left: 0; top: 0;",
                }
            }
            div { class: "d-flex",
                div { class: "me-3", i { class: icon_class } }
                div { class: "flex-grow-1",
                    div { class: "d-flex justify-content-between",
                        p { class: "mb-1 text-white", "{message}" }
                        button {
                            class: "{DELETE_CLASS} btn btn-sm",
                            r#type: "button",
                            "data-notification-id": "{id}",
                            i { class: "bi bi-x" }
                        }
                    }
                    div { class: "d-flex justify-content-between align-items-center",
                        small { class: "text-white-50", "{timestamp}" }
                        {link.map(|href| rsx! {
                            a { href, class: "btn btn-sm btn-link text-white p-0", "View" }
                        })}
                    }
                }
            }
        }
    }
}
