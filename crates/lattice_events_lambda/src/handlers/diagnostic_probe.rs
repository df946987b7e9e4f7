use std::panic::{catch_unwind, AssertUnwindSafe};

use serde_json::Value;
use tracing::{error, info};

use crate::runtime::config::ProbeConfig;
use crate::runtime::contract::HandlerResponse;

pub const COMPONENT: &str = "diagnostic_probe";
pub const FAILURE_BODY: &str = "Server error - check lambda logs\n";

#[derive(Debug, thiserror::Error)]
enum ProbeError {
    #[error("execution region is not configured")]
    RegionUnavailable,
}

/// Reports the region this handler runs in.
///
/// Never fails the invocation: any error or panic inside the probe becomes a
/// 500 response with a fixed body.
pub fn handle_probe_event(event: &Value, config: &ProbeConfig) -> HandlerResponse {
    guarded(|| probe_region(event, config))
}

fn guarded(body: impl FnOnce() -> Result<String, ProbeError>) -> HandlerResponse {
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(region)) => HandlerResponse::ok(region).with_description("200 OK"),
        Ok(Err(probe_error)) => {
            error!(
                component = COMPONENT,
                event = "probe_failed",
                error = %probe_error,
                "probe failed"
            );
            failure_response()
        }
        Err(panic) => {
            let detail = panic
                .downcast_ref::<&str>()
                .map(|message| message.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic payload".to_string());
            error!(
                component = COMPONENT,
                event = "probe_panicked",
                error = %detail,
                "probe panicked"
            );
            failure_response()
        }
    }
}

fn probe_region(event: &Value, config: &ProbeConfig) -> Result<String, ProbeError> {
    let region = config
        .region
        .clone()
        .ok_or(ProbeError::RegionUnavailable)?;
    info!(
        component = COMPONENT,
        event = "probe_received",
        trigger = %event,
        "received event"
    );
    Ok(region)
}

fn failure_response() -> HandlerResponse {
    HandlerResponse {
        status_code: 500,
        status_description: Some("500 Internal Server Error".to_string()),
        body: Value::from(FAILURE_BODY),
    }
}
