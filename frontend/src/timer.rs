use std::time::Duration;

use async_trait::async_trait;
use chrono::{FixedOffset, Offset, Utc};
use event_portal_web::schedule::Sleeper;
use js_sys::{Date, Promise};
use wasm_bindgen_futures::JsFuture;

/// `setTimeout` wrapped in a promise.
pub struct BrowserSleeper;

#[async_trait(?Send)]
impl Sleeper for BrowserSleeper {
    async fn sleep(&self, duration: Duration) {
        let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
        let promise = Promise::new(&mut |resolve, _reject| {
            if let Some(win) = web_sys::window() {
                let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis);
            }
        });
        let _ = JsFuture::from(promise).await;
    }
}

pub fn now_millis() -> i64 {
    Date::now() as i64
}

/// The browser's current UTC offset. `getTimezoneOffset` counts minutes west of UTC.
pub fn local_offset() -> FixedOffset {
    let minutes_west = Date::new_0().get_timezone_offset();
    FixedOffset::west_opt((minutes_west * 60.0) as i32).unwrap_or_else(|| Utc.fix())
}
