mod affordances;
mod components;
mod dom;
mod http;
mod locale;
mod timer;

use std::rc::Rc;

use components::admin_badge::AdminBadge;
use components::notification_center::NotificationCenterView;
use dioxus::prelude::*;
use event_portal_web::templates::notification_template::NOTIFICATION_LIST_ID;
use tracing::{error, info};

fn main() {
    dioxus::logger::initialize_default();
    // the page owns its badges and dropdown; we render rows into its list
    let Some(root) = dom::prepare_mount_root(NOTIFICATION_LIST_ID) else {
        error!("no document to mount into");
        return;
    };
    info!(root = %root, "mounting portal widgets");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname(root))
        .launch(App);
}

fn App() -> Element {
    let config = use_hook(dom::load_config);
    let is_admin = use_hook(|| dom::has_admin_marker(&config.admin_marker));
    // dropped with the app, which detaches listeners and stops countdowns
    let _bindings = use_hook(|| Rc::new(affordances::bind_page(&config)));

    rsx! {
        if is_admin {
            AdminBadge { config: config.clone() }
        }
        NotificationCenterView { config: config.clone() }
    }
}
