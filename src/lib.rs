pub mod affordances;
pub mod api;
pub mod badge;
pub mod center;
pub mod config;
pub mod countdown;
pub mod error;
pub mod logging;
pub mod notification;
pub mod schedule;
pub mod templates;
pub mod timestamp;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use api::{Endpoint, PortalClient, Transport};
pub use center::{CenterState, CenterStore, NotificationCenter};
pub use config::PortalConfig;
pub use error::{PortalError, PortalResult};
