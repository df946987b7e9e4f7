use lambda_runtime::{service_fn, Error, LambdaEvent};
use lattice_events_lambda::adapters::aws::{Route53ZoneWriter, SnsTopicClient};
use lattice_events_lambda::dispatch::TracingDispatcher;
use lattice_events_lambda::handlers::dns_configurator::{handle_queued_notification, COMPONENT};
use lattice_events_lambda::runtime::config::DnsConfiguratorConfig;
use lattice_events_lambda::runtime::contract::HandlerResponse;
use lattice_events_lambda::telemetry::init_tracing;
use serde_json::Value;

struct RuntimeDependencies {
    config: DnsConfiguratorConfig,
    zone_writer: Route53ZoneWriter,
    publisher: SnsTopicClient,
    dispatcher: TracingDispatcher,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &RuntimeDependencies,
) -> Result<HandlerResponse, Error> {
    let response = handle_queued_notification(
        event.payload,
        &deps.config,
        &deps.zone_writer,
        &deps.publisher,
        &deps.dispatcher,
    )?;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let config = DnsConfiguratorConfig::from_env()?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let deps = RuntimeDependencies {
        config,
        zone_writer: Route53ZoneWriter::new(aws_sdk_route53::Client::new(&aws_config)),
        publisher: SnsTopicClient::new(aws_sdk_sns::Client::new(&aws_config)),
        dispatcher: TracingDispatcher::new(COMPONENT),
    };

    let deps = &deps;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        handle_request(event, deps)
    }))
    .await
}
