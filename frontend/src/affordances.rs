use std::ops::ControlFlow;

use event_portal_web::affordances::{
    toggled_input_type, SubmitDecision, CARD_ANIMATION_CLASS, CARD_SELECTOR,
    COUNTDOWN_DATE_ATTR, COUNTDOWN_SELECTOR, PASSWORD_ICON_CLASSES, PASSWORD_ICON_SELECTOR,
    PASSWORD_TARGET_ATTR, PASSWORD_TOGGLE_SELECTOR, TOOLTIP_SELECTOR, VALIDATED_CLASS,
    VALIDATION_FORM_SELECTOR,
};
use event_portal_web::config::PortalConfig;
use event_portal_web::countdown::{parse_event_date, Countdown};
use event_portal_web::schedule::{run_schedule, PollHandle, Schedule};
use futures::future::ready;
use tracing::{debug, info, warn};
use web_sys::wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, EventTarget, HtmlFormElement};

use crate::dom::{document, query_all, EventListener};
use crate::timer::{local_offset, now_millis, BrowserSleeper};

/// Everything bound onto the server-rendered page.
#[derive(Default)]
pub struct PageBindings {
    listeners: Vec<EventListener>,
    countdowns: Vec<PollHandle>,
}

pub fn bind_page(config: &PortalConfig) -> PageBindings {
    let Some(doc) = document() else {
        warn!("no document available, page affordances skipped");
        return PageBindings::default();
    };
    decorate_cards(&doc);
    init_tooltips(&doc);

    let mut bindings = PageBindings::default();
    bindings.listeners.extend(bind_validation(&doc));
    bindings.listeners.extend(bind_password_toggles(&doc));
    bindings.countdowns.extend(start_countdowns(&doc, config));
    info!(
        listeners = bindings.listeners.len(),
        countdowns = bindings.countdowns.len(),
        "page affordances bound"
    );
    bindings
}

fn decorate_cards(doc: &Document) {
    for card in query_all(doc, CARD_SELECTOR) {
        let _ = card.class_list().add_1(CARD_ANIMATION_CLASS);
    }
}

fn bind_validation(doc: &Document) -> Vec<EventListener> {
    query_all(doc, VALIDATION_FORM_SELECTOR)
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlFormElement>().ok())
        .filter_map(|form| {
            let target: EventTarget = form.clone().into();
            EventListener::new(target, "submit", move |event: Event| {
                let decision = SubmitDecision::for_validity(form.check_validity());
                if decision.block {
                    event.prevent_default();
                    event.stop_propagation();
                }
                if decision.mark_validated {
                    let _ = form.class_list().add_1(VALIDATED_CLASS);
                }
            })
        })
        .collect()
}

fn init_tooltips(doc: &Document) {
    let elements = query_all(doc, TOOLTIP_SELECTOR);
    if elements.is_empty() {
        return;
    }
    let Some(tooltip) = bootstrap_tooltip() else {
        debug!("bootstrap.Tooltip not loaded, tooltips skipped");
        return;
    };
    for element in elements {
        let args = js_sys::Array::of1(&element);
        if let Err(err) = js_sys::Reflect::construct(&tooltip, &args) {
            warn!(error = ?err, "tooltip init failed");
        }
    }
}

fn bootstrap_tooltip() -> Option<js_sys::Function> {
    let window = web_sys::window()?;
    let bootstrap = js_sys::Reflect::get(&window, &JsValue::from_str("bootstrap")).ok()?;
    if bootstrap.is_undefined() || bootstrap.is_null() {
        return None;
    }
    js_sys::Reflect::get(&bootstrap, &JsValue::from_str("Tooltip"))
        .ok()?
        .dyn_into::<js_sys::Function>()
        .ok()
}

fn start_countdowns(doc: &Document, config: &PortalConfig) -> Vec<PollHandle> {
    let offset = local_offset();
    query_all(doc, COUNTDOWN_SELECTOR)
        .into_iter()
        .filter_map(|element| {
            let raw = element.get_attribute(COUNTDOWN_DATE_ATTR)?;
            let Some(target) = parse_event_date(&raw, &offset) else {
                warn!(raw = %raw, "unreadable event date, countdown skipped");
                return None;
            };
            let handle = PollHandle::new();
            let token = handle.token();
            let period = config.countdown_tick();
            let started_message = config.countdown_started_message.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let mut countdown = Countdown::new(target);
                run_schedule(&BrowserSleeper, Schedule::every(period).immediately(), token, || {
                    let tick = countdown.tick(now_millis());
                    element.set_text_content(Some(&tick.text(&started_message)));
                    ready(if tick.is_started() {
                        ControlFlow::Break(())
                    } else {
                        ControlFlow::Continue(())
                    })
                })
                .await;
            });
            Some(handle)
        })
        .collect()
}

fn bind_password_toggles(doc: &Document) -> Vec<EventListener> {
    query_all(doc, PASSWORD_TOGGLE_SELECTOR)
        .into_iter()
        .filter_map(|button| {
            let doc = doc.clone();
            let target: EventTarget = button.clone().into();
            EventListener::new(target, "click", move |_event: Event| {
                toggle_password(&doc, &button)
            })
        })
        .collect()
}

fn toggle_password(doc: &Document, button: &Element) {
    let Some(selector) = button.get_attribute(PASSWORD_TARGET_ATTR) else {
        debug!("password toggle without data-target");
        return;
    };
    let Some(field) = doc.query_selector(&selector).ok().flatten() else {
        warn!(selector = %selector, "password field not found");
        return;
    };
    let next = toggled_input_type(field.get_attribute("type").as_deref());
    let _ = field.set_attribute("type", next);
    if let Ok(Some(icon)) = button.query_selector(PASSWORD_ICON_SELECTOR) {
        for class in PASSWORD_ICON_CLASSES {
            let _ = icon.class_list().toggle(class);
        }
    }
}
