use std::ops::ControlFlow;
use std::rc::Rc;

use dioxus::prelude::*;
use event_portal_web::api::PortalClient;
use event_portal_web::badge::{fetch_unread_messages, BadgeState, ADMIN_BADGE_ID};
use event_portal_web::config::PortalConfig;
use event_portal_web::schedule::{run_schedule, PollHandle, Schedule};
use tracing::info;

use crate::dom::apply_badge;
use crate::http::HttpTransport;
use crate::timer::BrowserSleeper;

/// Unread admin messages, written onto the page's `#unreadBadge`. Only
/// mounted on pages carrying the admin marker.
#[component]
pub fn AdminBadge(config: PortalConfig) -> Element {
    let badge = use_signal(|| None::<BadgeState>);
    let client = use_hook(|| Rc::new(PortalClient::new(HttpTransport::new(&config))));
    let poll = use_hook(|| Rc::new(PollHandle::new()));
    let period = config.admin_poll_interval();

    use_future(move || {
        let client = client.clone();
        let token = poll.token();
        async move {
            info!(period_secs = period.as_secs(), "admin badge polling started");
            run_schedule(&BrowserSleeper, Schedule::every(period).immediately(), token, || {
                let client = client.clone();
                let mut badge = badge;
                async move {
                    // failures are logged inside; the old badge stays up
                    if let Ok(state) = fetch_unread_messages(&*client).await {
                        badge.set(Some(state));
                    }
                    ControlFlow::Continue(())
                }
            })
            .await;
        }
    });

    // the server-rendered badge stands until the first answer arrives
    use_effect(move || {
        if let Some(state) = *badge.read() {
            apply_badge(ADMIN_BADGE_ID, None, &state.view());
        }
    });

    rsx! {}
}
