use lambda_runtime::{service_fn, Error, LambdaEvent};
use lattice_events_lambda::handlers::diagnostic_probe::handle_probe_event;
use lattice_events_lambda::runtime::config::ProbeConfig;
use lattice_events_lambda::runtime::contract::HandlerResponse;
use lattice_events_lambda::telemetry::init_tracing;
use serde_json::Value;

async fn handle_request(
    event: LambdaEvent<Value>,
    config: &ProbeConfig,
) -> Result<HandlerResponse, Error> {
    Ok(handle_probe_event(&event.payload, config))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let config = ProbeConfig::from_env();
    let config = &config;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        handle_request(event, config)
    }))
    .await
}
