use std::cell::Cell;
use std::future::Future;
use std::ops::ControlFlow;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;

/// Suspends the current task. The browser build wraps `setTimeout`.
#[async_trait(?Send)]
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

/// Read side of a [`PollHandle`], moved into the polling task.
#[derive(Clone, Debug, Default)]
pub struct StopToken {
    stopped: Rc<Cell<bool>>,
}

impl StopToken {
    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }
}

/// Owns a polling loop. The loop ends at its next wake-up once the handle is
/// stopped or dropped.
#[derive(Debug, Default)]
pub struct PollHandle {
    token: StopToken,
}

impl PollHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> StopToken {
        self.token.clone()
    }

    pub fn stop(&self) {
        self.token.stopped.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_stopped()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Schedule {
    period: Duration,
    immediate: bool,
}

impl Schedule {
    /// First tick after one full period, like `setInterval`.
    pub fn every(period: Duration) -> Self {
        Self {
            period,
            immediate: false,
        }
    }

    /// Also tick once right away.
    pub fn immediately(mut self) -> Self {
        self.immediate = true;
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Finished {
    /// The owning handle was stopped or dropped.
    Stopped,
    /// The tick itself asked to stop.
    Completed,
}

pub async fn run_schedule<S, F, Fut>(
    sleeper: &S,
    schedule: Schedule,
    token: StopToken,
    mut tick: F,
) -> Finished
where
    S: Sleeper + ?Sized,
    F: FnMut() -> Fut,
    Fut: Future<Output = ControlFlow<()>>,
{
    if schedule.immediate {
        if token.is_stopped() {
            return Finished::Stopped;
        }
        if tick().await.is_break() {
            return Finished::Completed;
        }
    }
    loop {
        sleeper.sleep(schedule.period).await;
        if token.is_stopped() {
            return Finished::Stopped;
        }
        if tick().await.is_break() {
            return Finished::Completed;
        }
    }
}
