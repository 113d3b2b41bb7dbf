use tracing::warn;

use crate::error::PortalError;

/// Log a failed request. The caller keeps whatever state it already rendered;
/// the next scheduled poll is the only recovery.
pub fn report_failure(operation: &'static str, error: &PortalError) {
    warn!(operation, error = %error, "request failed, keeping previous state");
}
