use serde_json::Value;
use tracing::info;

use crate::adapters::notify::NotificationPublisher;
use crate::adapters::registry::ServiceRegistry;
use crate::dispatch::EventDispatcher;
use crate::runtime::config::NotifierConfig;
use crate::runtime::contract::{
    HandlerResponse, PublishRequest, ServiceDescriptor, ServiceNotification, TagChangeEvent,
    SERVICE_CREATED_BODY, SERVICE_CREATED_SUBJECT,
};
use crate::runtime::error::HandlerError;
use crate::runtime::events::ChainEvent;
use crate::runtime::tags::{AFFIRMATIVE_TAG_VALUE, NEW_SERVICE_TAG};

pub const COMPONENT: &str = "service_created_notifier";

/// Announces a newly tagged service on the notification topic.
///
/// Events whose `NewService` tag is not exactly `"true"` succeed without any
/// registry lookup or publish.
pub fn handle_service_created_event(
    event: Value,
    config: &NotifierConfig,
    registry: &impl ServiceRegistry,
    publisher: &impl NotificationPublisher,
    dispatcher: &impl EventDispatcher,
) -> Result<HandlerResponse, HandlerError> {
    let change = TagChangeEvent::parse(event, NEW_SERVICE_TAG)?;

    if !change.flag.is_affirmative() {
        info!(
            component = COMPONENT,
            event = "service_skipped",
            service_identifier = %change.resource,
            tag_value = ?change.tag_value,
            "tag is not affirmative; nothing to announce"
        );
        return Ok(HandlerResponse::ok(SERVICE_CREATED_BODY));
    }

    let description = registry.describe_service(&change.resource)?;
    let descriptor = ServiceDescriptor::from_description(&change.resource, description)?;
    let notification = ServiceNotification::new(descriptor, AFFIRMATIVE_TAG_VALUE);

    for (field, value) in notification.fields() {
        info!(component = COMPONENT, field, value, "service detail");
    }

    let fingerprint = notification.dns_change_request().fingerprint();
    let message = serde_json::to_string(&notification).map_err(|source| HandlerError::Encode {
        what: "service notification",
        source,
    })?;
    let message_id = publisher.publish(&PublishRequest {
        topic_arn: config.topic_arn.clone(),
        message,
        subject: SERVICE_CREATED_SUBJECT.to_string(),
    })?;

    info!(
        component = COMPONENT,
        event = "service_announced",
        topic_arn = %config.topic_arn,
        message_id = ?message_id,
        fingerprint = %fingerprint,
        "published service notification"
    );

    dispatcher.dispatch(ChainEvent::ServiceAnnounced {
        service_arn: notification.service_arn,
        custom_domain_name: notification.custom_domain_name,
        fingerprint,
        message_id,
    })?;

    Ok(HandlerResponse::ok(SERVICE_CREATED_BODY))
}
