use event_portal_web::badge::BadgeView;
use event_portal_web::config::{PortalConfig, CONFIG_META_NAME};
use event_portal_web::templates::notification_template::{ClickTarget, DELETE_CLASS};
use tracing::{debug, warn};
use web_sys::wasm_bindgen::closure::Closure;
use web_sys::wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement};

const CSRF_META: &str = "_csrf";
const CSRF_HEADER_META: &str = "_csrf_header";
const DEFAULT_CSRF_HEADER: &str = "X-CSRF-TOKEN";
/// Created when the page has no notification list to mount into.
const DETACHED_ROOT_ID: &str = "portal-root";

pub fn document() -> Option<Document> {
    web_sys::window().and_then(|win| win.document())
}

pub fn query_all(doc: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = doc.query_selector_all(selector) else {
        warn!(selector, "invalid selector");
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|idx| list.item(idx))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn element_by_id(id: &str) -> Option<Element> {
    document().and_then(|doc| doc.get_element_by_id(id))
}

/// Write a badge onto the host page's element, if the page has one.
pub fn apply_badge(badge_id: &str, text_id: Option<&str>, view: &BadgeView) {
    let Some(badge) = element_by_id(badge_id) else {
        debug!(badge_id, "badge element not on this page");
        return;
    };
    if let Some(text) = view.shown_text() {
        let target = text_id.and_then(element_by_id).unwrap_or_else(|| badge.clone());
        target.set_text_content(Some(text));
    }
    if let Some(badge) = badge.dyn_ref::<HtmlElement>() {
        let _ = badge.style().set_property("display", view.display_value());
    }
}

/// Pick the element Dioxus renders into: the page's notification list when
/// present (emptied first), otherwise a hidden element appended to the body.
pub fn prepare_mount_root(list_id: &str) -> Option<String> {
    let doc = document()?;
    if let Some(list) = doc.get_element_by_id(list_id) {
        list.set_inner_html("");
        return Some(list_id.to_string());
    }
    if doc.get_element_by_id(DETACHED_ROOT_ID).is_some() {
        return Some(DETACHED_ROOT_ID.to_string());
    }
    let root = doc.create_element("div").ok()?;
    root.set_id(DETACHED_ROOT_ID);
    let _ = root.set_attribute("hidden", "");
    doc.body()?.append_child(&root).ok()?;
    Some(DETACHED_ROOT_ID.to_string())
}

/// Classify the element a row click started on.
pub fn click_target(element: Option<&Element>) -> ClickTarget {
    let within = |selector: &str| {
        element
            .and_then(|el| el.closest(selector).ok().flatten())
            .is_some()
    };
    ClickTarget {
        delete_control: within(&format!(".{DELETE_CLASS}")),
        button: within("button"),
    }
}

/// A DOM listener that removes itself when dropped.
pub struct EventListener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    pub fn new(
        target: EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Option<Self> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        match target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref()) {
            Ok(()) => Some(Self {
                target,
                kind,
                callback,
            }),
            Err(err) => {
                warn!(kind, error = ?err, "failed to attach listener");
                None
            }
        }
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

fn meta_content(doc: &Document, name: &str) -> Option<String> {
    doc.query_selector(&format!("meta[name=\"{name}\"]"))
        .ok()
        .flatten()
        .and_then(|meta| meta.get_attribute("content"))
}

/// Read `<meta name="portal-config">`, falling back to defaults when it is
/// missing or invalid.
pub fn load_config() -> PortalConfig {
    let Some(raw) = document().and_then(|doc| meta_content(&doc, CONFIG_META_NAME)) else {
        return PortalConfig::default();
    };
    PortalConfig::from_json(&raw).unwrap_or_else(|err| {
        warn!(error = %err, "ignoring invalid portal config");
        PortalConfig::default()
    })
}

pub fn has_admin_marker(selector: &str) -> bool {
    document()
        .and_then(|doc| doc.query_selector(selector).ok().flatten())
        .is_some()
}

#[derive(Clone, Debug, PartialEq)]
pub struct CsrfHeader {
    pub name: String,
    pub token: String,
}

/// Spring Security publishes its token in `_csrf` / `_csrf_header` meta tags.
pub fn csrf_header() -> Option<CsrfHeader> {
    let doc = document()?;
    let token = meta_content(&doc, CSRF_META)?;
    if token.trim().is_empty() {
        return None;
    }
    let name = meta_content(&doc, CSRF_HEADER_META)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CSRF_HEADER.to_string());
    Some(CsrfHeader { name, token })
}
