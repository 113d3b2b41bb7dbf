use std::ops::ControlFlow;
use std::time::Duration;

use chrono::FixedOffset;
use event_portal_web::affordances::{toggled_input_type, SubmitDecision};
use event_portal_web::badge::BadgeState;
use event_portal_web::countdown::{parse_event_date, Countdown, CountdownTick};
use event_portal_web::schedule::{run_schedule, Finished, PollHandle, Schedule};
use event_portal_web::testing::TokioSleeper;
use event_portal_web::PortalConfig;
use futures::future::ready;

#[test]
fn badge_visibility_tracks_count() {
    for count in 0..50_i64 {
        let view = BadgeState::from_count(count).view();
        assert_eq!(view.visible, count > 0, "count {count}");
        assert_eq!(view.text, count.to_string());
    }
}

#[tokio::test(start_paused = true)]
async fn past_event_countdown_stops_after_first_tick() {
    let config = PortalConfig::default();
    let offset = FixedOffset::east_opt(0).unwrap();
    let target = parse_event_date("2001-01-01T00:00:00", &offset).unwrap();
    let now = parse_event_date("2024-01-01T00:00:00Z", &offset)
        .unwrap()
        .timestamp_millis();

    let mut countdown = Countdown::new(target);
    let mut rendered = Vec::new();
    let handle = PollHandle::new();
    let finished = run_schedule(
        &TokioSleeper,
        Schedule::every(config.countdown_tick()).immediately(),
        handle.token(),
        || {
            let tick = countdown.tick(now);
            rendered.push(tick.text(&config.countdown_started_message));
            ready(if tick.is_started() {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            })
        },
    )
    .await;

    assert_eq!(finished, Finished::Completed);
    assert_eq!(rendered, vec!["Event has started!".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn future_event_counts_down_then_starts() {
    let start = tokio::time::Instant::now();
    let mut countdown = Countdown::from_millis(2_500);
    let mut rendered = Vec::new();
    let handle = PollHandle::new();
    run_schedule(
        &TokioSleeper,
        Schedule::every(Duration::from_secs(1)).immediately(),
        handle.token(),
        || {
            let now = start.elapsed().as_millis() as i64;
            let tick = countdown.tick(now);
            rendered.push(tick.text("started"));
            ready(if tick.is_started() {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            })
        },
    )
    .await;

    assert_eq!(rendered, vec!["0d 0h 0m 2s", "0d 0h 0m 1s", "0d 0h 0m 0s", "started"]);
    assert!(countdown.is_started());
    assert_eq!(countdown.tick(0), CountdownTick::Started);
}

#[test]
fn form_and_password_helpers() {
    assert!(SubmitDecision::for_validity(false).block);
    assert!(SubmitDecision::for_validity(true).mark_validated);
    let mut kind = "password";
    kind = toggled_input_type(Some(kind));
    assert_eq!(kind, "text");
    kind = toggled_input_type(Some(kind));
    assert_eq!(kind, "password");
}
