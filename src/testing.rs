//! Test doubles for the transport and sleeper seams.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::api::{Endpoint, Transport};
use crate::error::{PortalError, PortalResult};
use crate::schedule::Sleeper;

/// Canned responses keyed by endpoint, with a log of every call.
#[derive(Default)]
pub struct MockTransport {
    responses: RefCell<HashMap<Endpoint, PortalResult<String>>>,
    calls: RefCell<Vec<Endpoint>>,
}

impl MockTransport {
    pub fn respond(&self, endpoint: Endpoint, body: &str) {
        self.responses
            .borrow_mut()
            .insert(endpoint, Ok(body.to_string()));
    }

    pub fn fail(&self, endpoint: Endpoint, error: PortalError) {
        self.responses.borrow_mut().insert(endpoint, Err(error));
    }

    pub fn calls(&self) -> Vec<Endpoint> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, endpoint: Endpoint) -> PortalResult<String> {
        self.calls.borrow_mut().push(endpoint);
        self.responses
            .borrow()
            .get(&endpoint)
            .cloned()
            .unwrap_or_else(|| Err(PortalError::Network(format!("no response for {}", endpoint.path()))))
    }
}

/// Sleeps on the tokio clock, so paused-time tests advance instantly.
pub struct TokioSleeper;

#[async_trait(?Send)]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
