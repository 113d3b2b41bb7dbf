use chrono::{DateTime, FixedOffset};
use event_portal_web::config::PortalConfig;
use event_portal_web::timestamp::{TimestampFormatter, TimestampStyle};
use js_sys::{Array, Date, Function, Object, Reflect};
use web_sys::wasm_bindgen::{JsCast, JsValue};

use crate::timer::local_offset;

/// `toLocaleDateString()` + `toLocaleTimeString([], {hour, minute})` in the
/// browser's own locale and time zone.
pub struct BrowserLocale;

impl TimestampStyle for BrowserLocale {
    fn render(&self, instant: DateTime<FixedOffset>) -> Option<String> {
        let date = Date::new(&JsValue::from_f64(instant.timestamp_millis() as f64));
        let day = call_method(&date, "toLocaleDateString", &Array::new())?;

        let options = Object::new();
        Reflect::set(&options, &"hour".into(), &"2-digit".into()).ok()?;
        Reflect::set(&options, &"minute".into(), &"2-digit".into()).ok()?;
        let args = Array::of2(&Array::new(), &options);
        let time = call_method(&date, "toLocaleTimeString", &args)?;
        Some(format!("{day} {time}"))
    }
}

fn call_method(target: &Date, name: &str, args: &Array) -> Option<String> {
    let method = Reflect::get(target, &JsValue::from_str(name))
        .ok()?
        .dyn_into::<Function>()
        .ok()?;
    Reflect::apply(&method, target, args).ok()?.as_string()
}

/// A configured pattern wins; otherwise times follow the browser locale.
pub fn timestamp_formatter(config: &PortalConfig) -> TimestampFormatter {
    match &config.timestamp_format {
        Some(pattern) => TimestampFormatter::new(pattern.clone(), local_offset()),
        None => TimestampFormatter::with_style(BrowserLocale, local_offset()),
    }
}
