use lambda_runtime::{service_fn, Error, LambdaEvent};
use lattice_events_lambda::adapters::aws::{LatticeServiceRegistry, SnsTopicClient};
use lattice_events_lambda::dispatch::TracingDispatcher;
use lattice_events_lambda::handlers::service_created::{handle_service_created_event, COMPONENT};
use lattice_events_lambda::runtime::config::NotifierConfig;
use lattice_events_lambda::runtime::contract::HandlerResponse;
use lattice_events_lambda::telemetry::init_tracing;
use serde_json::Value;

struct RuntimeDependencies {
    config: NotifierConfig,
    registry: LatticeServiceRegistry,
    publisher: SnsTopicClient,
    dispatcher: TracingDispatcher,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &RuntimeDependencies,
) -> Result<HandlerResponse, Error> {
    let response = handle_service_created_event(
        event.payload,
        &deps.config,
        &deps.registry,
        &deps.publisher,
        &deps.dispatcher,
    )?;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let config = NotifierConfig::from_env()?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let deps = RuntimeDependencies {
        config,
        registry: LatticeServiceRegistry::new(aws_sdk_vpclattice::Client::new(&aws_config)),
        publisher: SnsTopicClient::new(aws_sdk_sns::Client::new(&aws_config)),
        dispatcher: TracingDispatcher::new(COMPONENT),
    };

    let deps = &deps;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        handle_request(event, deps)
    }))
    .await
}
