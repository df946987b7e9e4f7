use serde_json::{json, Value};
use tracing::info;

use crate::adapters::topic::TopicSubscriber;
use crate::dispatch::EventDispatcher;
use crate::runtime::config::BinderConfig;
use crate::runtime::contract::{HandlerResponse, SubscriptionRequest, TagChangeEvent};
use crate::runtime::error::HandlerError;
use crate::runtime::events::ChainEvent;
use crate::runtime::tags::NEW_TOPIC_TAG;

pub const COMPONENT: &str = "subscription_binder";

/// Subscribes the configured queue to a topic whose `NewSNS` tag turned
/// `"true"`.
///
/// The response body is defined on both branches: `Subscribed` is false and
/// `SubscriptionArn` null when the tag is not affirmative.
pub fn handle_topic_tagged_event(
    event: Value,
    config: &BinderConfig,
    subscriber: &impl TopicSubscriber,
    dispatcher: &impl EventDispatcher,
) -> Result<HandlerResponse, HandlerError> {
    let change = TagChangeEvent::parse(event, NEW_TOPIC_TAG)?;

    if !change.flag.is_affirmative() {
        info!(
            component = COMPONENT,
            event = "subscription_skipped",
            topic_arn = %change.resource,
            tag_value = ?change.tag_value,
            "tag is not affirmative; queue not subscribed"
        );
        return Ok(subscription_response(None, false));
    }

    info!(
        component = COMPONENT,
        event = "subscription_started",
        topic_arn = %change.resource,
        queue_arn = %config.queue_arn,
        "new service topic tag found"
    );

    let request = SubscriptionRequest::queue(change.resource, config.queue_arn.clone());
    let subscription_arn = subscriber.subscribe(&request)?;

    dispatcher.dispatch(ChainEvent::QueueSubscribed {
        topic_arn: request.topic_arn,
        queue_arn: request.endpoint,
        subscription_arn: subscription_arn.clone(),
    })?;

    Ok(subscription_response(subscription_arn, true))
}

fn subscription_response(subscription_arn: Option<String>, subscribed: bool) -> HandlerResponse {
    HandlerResponse::ok(json!({
        "SubscriptionArn": subscription_arn,
        "Subscribed": subscribed,
    }))
}
