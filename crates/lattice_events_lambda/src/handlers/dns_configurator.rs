use serde_json::{json, Value};
use tracing::{info, warn};

use crate::adapters::dns::DnsZoneWriter;
use crate::adapters::notify::NotificationPublisher;
use crate::dispatch::EventDispatcher;
use crate::runtime::config::DnsConfiguratorConfig;
use crate::runtime::contract::{
    DnsChangeRequest, HandlerResponse, PublishRequest, QueueDeliveryEvent, ZONE_UPDATED_MESSAGE,
    ZONE_UPDATED_SUBJECT,
};
use crate::runtime::error::HandlerError;
use crate::runtime::events::ChainEvent;

pub const COMPONENT: &str = "dns_configurator";

/// Points a service's custom domain at its alias target in the private zone.
///
/// The change is an UPSERT, so redelivery of the same queue message converges
/// on the same record. With a completion topic configured, a `PHZ updated`
/// message is published once the upsert has succeeded.
///
/// Only `Records[0]` is applied, so the queue trigger must be configured with a
/// batch size of 1; any further records are logged and dropped.
pub fn handle_queued_notification(
    event: Value,
    config: &DnsConfiguratorConfig,
    zone_writer: &impl DnsZoneWriter,
    publisher: &impl NotificationPublisher,
    dispatcher: &impl EventDispatcher,
) -> Result<HandlerResponse, HandlerError> {
    let queued = QueueDeliveryEvent::parse(event)?;
    if queued.ignored_records > 0 {
        warn!(
            component = COMPONENT,
            event = "records_ignored",
            ignored_records = queued.ignored_records,
            "only the first queue record is processed"
        );
    }
    info!(
        component = COMPONENT,
        event = "notification_received",
        queue_message_id = ?queued.queue_message_id,
        subject = ?queued.subject,
        message = %queued.message,
        "received service notification"
    );

    let request = DnsChangeRequest::from_envelope(&queued.message)?;
    let fingerprint = request.fingerprint();
    let change_info = zone_writer.upsert_alias(&config.hosted_zone_id, &request)?;

    info!(
        component = COMPONENT,
        event = "record_upserted",
        hosted_zone_id = %config.hosted_zone_id,
        record_name = %request.record_name,
        alias_dns_name = %request.alias_dns_name,
        change_id = %change_info.id,
        change_status = %change_info.status,
        fingerprint = %fingerprint,
        "alias record upserted"
    );

    dispatcher.dispatch(ChainEvent::DnsRecordUpserted {
        hosted_zone_id: config.hosted_zone_id.clone(),
        record_name: request.record_name.clone(),
        alias_dns_name: request.alias_dns_name.clone(),
        fingerprint,
        change_id: change_info.id.clone(),
    })?;

    let completion_message_id = match &config.completion_topic_arn {
        Some(topic_arn) => Some(announce_zone_update(topic_arn, publisher, dispatcher)?),
        None => None,
    };

    Ok(HandlerResponse::ok(json!({
        "ChangeInfo": change_info,
        "RecordName": request.record_name,
        "CompletionMessageId": completion_message_id.flatten(),
    })))
}

fn announce_zone_update(
    topic_arn: &str,
    publisher: &impl NotificationPublisher,
    dispatcher: &impl EventDispatcher,
) -> Result<Option<String>, HandlerError> {
    let message = serde_json::to_string(ZONE_UPDATED_MESSAGE).map_err(|source| {
        HandlerError::Encode {
            what: "zone update message",
            source,
        }
    })?;
    let message_id = publisher.publish(&PublishRequest {
        topic_arn: topic_arn.to_string(),
        message,
        subject: ZONE_UPDATED_SUBJECT.to_string(),
    })?;

    dispatcher.dispatch(ChainEvent::ZoneUpdateAnnounced {
        topic_arn: topic_arn.to_string(),
        message_id: message_id.clone(),
    })?;
    Ok(message_id)
}
