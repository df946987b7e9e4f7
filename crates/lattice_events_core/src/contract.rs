use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::{HandlerError, PayloadError, RemoteCallError};
use crate::tags::TagFlag;

pub const SERVICE_CREATED_SUBJECT: &str = "VPC Lattice Service Created";
pub const SERVICE_CREATED_BODY: &str = "VPC Lattice service information retrieved successfully";
pub const ZONE_UPDATED_SUBJECT: &str = "PHZ updated";
pub const ZONE_UPDATED_MESSAGE: &str = "PHZ updated";
pub const QUEUE_PROTOCOL: &str = "sqs";

pub const ALIAS_RECORD_TYPE: &str = "A";
pub const EVALUATE_TARGET_HEALTH: bool = false;

pub const KEY_SERVICE_IDENTIFIER: &str = "Service Identifier";
pub const KEY_ACCOUNT_ID: &str = "Account ID";
pub const KEY_SERVICE_ARN: &str = "Service ARN";
pub const KEY_CUSTOM_DOMAIN_NAME: &str = "Custom Domain Name";
pub const KEY_ALIAS_DOMAIN_NAME: &str = "VPC Lattice Domain Name";
pub const KEY_ALIAS_HOSTED_ZONE_ID: &str = "VPC Lattice Hosted Zone ID";
pub const KEY_NEW_SERVICE_TAG_VALUE: &str = "NewService Tag Value";

const GET_SERVICE_OPERATION: &str = "vpc-lattice:GetService";

// ── trigger payloads ───────────────────────────────────────────────

/// Raw shape of a tag-change event delivered by the event bus.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagChangeEvent {
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub detail: Option<TagChangeDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagChangeDetail {
    #[serde(default)]
    pub tags: Option<BTreeMap<String, Value>>,
}

/// A validated tag change: the resource it concerns and the state of one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagChange {
    pub resource: String,
    pub tag_value: Option<String>,
    pub flag: TagFlag,
}

impl TagChangeEvent {
    pub fn parse(payload: Value, tag_name: &str) -> Result<TagChange, PayloadError> {
        let event: TagChangeEvent = serde_json::from_value(payload)
            .map_err(|error| PayloadError::invalid_json("event", error))?;
        event.validate(tag_name)
    }

    pub fn validate(self, tag_name: &str) -> Result<TagChange, PayloadError> {
        let resource = self
            .resources
            .into_iter()
            .next()
            .ok_or_else(|| PayloadError::missing("resources[0]"))?;
        if resource.trim().is_empty() {
            return Err(PayloadError::blank("resources[0]"));
        }

        let raw_value = self
            .detail
            .and_then(|detail| detail.tags)
            .and_then(|mut tags| tags.remove(tag_name));

        let (tag_value, flag) = match raw_value {
            None | Some(Value::Null) => (None, TagFlag::Absent),
            Some(Value::String(text)) => {
                let flag = TagFlag::from_value(Some(&text));
                (Some(text), flag)
            }
            Some(other) => (Some(other.to_string()), TagFlag::Other),
        };

        Ok(TagChange {
            resource,
            tag_value,
            flag,
        })
    }
}

/// Raw shape of a queue delivery batch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueueDeliveryEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<QueueRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueueRecord {
    #[serde(rename = "messageId", default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub body: Option<Value>,
}

/// Notification-channel wrapper carried in a queue record body.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(any(test, feature = "test-support"), derive(Serialize))]
pub struct ChannelMessage {
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,
    #[serde(rename = "TopicArn", default, skip_serializing_if = "Option::is_none")]
    pub topic_arn: Option<String>,
    #[serde(rename = "Subject", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
}

/// The first record of a queue delivery, unwrapped down to its envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedNotification {
    pub queue_message_id: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub ignored_records: usize,
}

impl QueueDeliveryEvent {
    pub fn parse(payload: Value) -> Result<QueuedNotification, PayloadError> {
        let event: QueueDeliveryEvent = serde_json::from_value(payload)
            .map_err(|error| PayloadError::invalid_json("event", error))?;
        event.first_notification()
    }

    pub fn first_notification(self) -> Result<QueuedNotification, PayloadError> {
        let ignored_records = self.records.len().saturating_sub(1);
        let record = self
            .records
            .into_iter()
            .next()
            .ok_or_else(|| PayloadError::missing("Records[0]"))?;

        let body = match record.body {
            Some(Value::String(text)) => text,
            Some(_) => return Err(PayloadError::wrong_type("Records[0].body", "a string")),
            None => return Err(PayloadError::missing("Records[0].body")),
        };

        let wrapper: ChannelMessage = serde_json::from_str(&body)
            .map_err(|error| PayloadError::invalid_json("Records[0].body", error))?;
        let message = wrapper
            .message
            .ok_or_else(|| PayloadError::missing("Records[0].body.Message"))?;

        Ok(QueuedNotification {
            queue_message_id: record.message_id,
            subject: wrapper.subject,
            message,
            ignored_records,
        })
    }
}

/// Builds the queue delivery a notification-channel subscription produces for
/// one published message.
#[cfg(any(test, feature = "test-support"))]
pub fn queue_delivery_for(topic_arn: &str, subject: &str, message: &str) -> Value {
    let wrapper = ChannelMessage {
        message_type: Some("Notification".to_string()),
        topic_arn: Some(topic_arn.to_string()),
        subject: Some(subject.to_string()),
        message: Some(message.to_string()),
    };
    serde_json::json!({
        "Records": [
            {
                "eventSource": "aws:sqs",
                "body": stable_contract_json(&wrapper),
            }
        ]
    })
}

// ── service descriptor and notification envelope ───────────────────

/// Registry answer for one service, as returned by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDescription {
    pub arn: Option<String>,
    pub custom_domain_name: Option<String>,
    pub dns_entry: Option<ServiceDnsEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDnsEntry {
    pub domain_name: Option<String>,
    pub hosted_zone_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub service_identifier: String,
    pub account_id: String,
    pub service_arn: String,
    pub custom_domain_name: String,
    pub alias_domain_name: String,
    pub alias_hosted_zone_id: String,
}

impl ServiceDescriptor {
    pub fn from_description(
        service_identifier: &str,
        description: ServiceDescription,
    ) -> Result<Self, HandlerError> {
        let incomplete = |field: &str| {
            RemoteCallError::new(
                GET_SERVICE_OPERATION,
                format!("response is missing {field}"),
            )
        };

        let service_arn = description.arn.ok_or_else(|| incomplete("arn"))?;
        let custom_domain_name = description
            .custom_domain_name
            .ok_or_else(|| incomplete("customDomainName"))?;
        let dns_entry = description.dns_entry.ok_or_else(|| incomplete("dnsEntry"))?;
        let alias_domain_name = dns_entry
            .domain_name
            .ok_or_else(|| incomplete("dnsEntry.domainName"))?;
        let alias_hosted_zone_id = dns_entry
            .hosted_zone_id
            .ok_or_else(|| incomplete("dnsEntry.hostedZoneId"))?;
        let account_id = account_id_from_arn(&service_arn)?.to_string();

        Ok(Self {
            service_identifier: service_identifier.to_string(),
            account_id,
            service_arn,
            custom_domain_name,
            alias_domain_name,
            alias_hosted_zone_id,
        })
    }
}

/// Returns the account field of `arn:<partition>:<service>:<region>:<account>:<resource>`.
pub fn account_id_from_arn(arn: &str) -> Result<&str, PayloadError> {
    let invalid = || PayloadError::InvalidArn {
        arn: arn.to_string(),
    };
    let fields: Vec<&str> = arn.splitn(6, ':').collect();
    if fields.len() < 6 || fields[0] != "arn" {
        return Err(invalid());
    }
    let account = fields[4];
    if account.is_empty() {
        return Err(invalid());
    }
    Ok(account)
}

/// Message published when a tagged service is announced. The key names are a
/// wire contract with every subscriber of the notification topic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceNotification {
    #[serde(rename = "Service Identifier")]
    pub service_identifier: String,
    #[serde(rename = "Account ID")]
    pub account_id: String,
    #[serde(rename = "Service ARN")]
    pub service_arn: String,
    #[serde(rename = "Custom Domain Name")]
    pub custom_domain_name: String,
    #[serde(rename = "VPC Lattice Domain Name")]
    pub alias_domain_name: String,
    #[serde(rename = "VPC Lattice Hosted Zone ID")]
    pub alias_hosted_zone_id: String,
    #[serde(rename = "NewService Tag Value")]
    pub tag_value: String,
}

impl ServiceNotification {
    pub fn new(descriptor: ServiceDescriptor, tag_value: impl Into<String>) -> Self {
        Self {
            service_identifier: descriptor.service_identifier,
            account_id: descriptor.account_id,
            service_arn: descriptor.service_arn,
            custom_domain_name: descriptor.custom_domain_name,
            alias_domain_name: descriptor.alias_domain_name,
            alias_hosted_zone_id: descriptor.alias_hosted_zone_id,
            tag_value: tag_value.into(),
        }
    }

    /// Field name / value pairs in publication order.
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            (KEY_SERVICE_IDENTIFIER, &self.service_identifier),
            (KEY_ACCOUNT_ID, &self.account_id),
            (KEY_SERVICE_ARN, &self.service_arn),
            (KEY_CUSTOM_DOMAIN_NAME, &self.custom_domain_name),
            (KEY_ALIAS_DOMAIN_NAME, &self.alias_domain_name),
            (KEY_ALIAS_HOSTED_ZONE_ID, &self.alias_hosted_zone_id),
            (KEY_NEW_SERVICE_TAG_VALUE, &self.tag_value),
        ]
    }

    pub fn dns_change_request(&self) -> DnsChangeRequest {
        DnsChangeRequest {
            record_name: self.custom_domain_name.clone(),
            alias_dns_name: self.alias_domain_name.clone(),
            alias_hosted_zone_id: self.alias_hosted_zone_id.clone(),
        }
    }
}

// ── DNS change request ─────────────────────────────────────────────

/// A single alias `A` record upsert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DnsChangeRequest {
    pub record_name: String,
    pub alias_dns_name: String,
    pub alias_hosted_zone_id: String,
}

impl DnsChangeRequest {
    /// Extracts the three DNS keys from a JSON-encoded notification envelope.
    /// Other keys are ignored.
    pub fn from_envelope(message: &str) -> Result<Self, PayloadError> {
        let envelope: Value = serde_json::from_str(message)
            .map_err(|error| PayloadError::invalid_json("Message", error))?;
        let Value::Object(fields) = envelope else {
            return Err(PayloadError::wrong_type("Message", "a JSON object"));
        };

        Ok(Self {
            record_name: required_text(&fields, KEY_CUSTOM_DOMAIN_NAME)?,
            alias_dns_name: required_text(&fields, KEY_ALIAS_DOMAIN_NAME)?,
            alias_hosted_zone_id: required_text(&fields, KEY_ALIAS_HOSTED_ZONE_ID)?,
        })
    }

    /// Stable digest identifying this change across redeliveries.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(stable_contract_json(self));
        format!("{:x}", hasher.finalize())
    }
}

fn required_text(fields: &Map<String, Value>, key: &str) -> Result<String, PayloadError> {
    let path = format!("Message.{key}");
    match fields.get(key) {
        None | Some(Value::Null) => Err(PayloadError::missing(path)),
        Some(Value::String(text)) if text.trim().is_empty() => Err(PayloadError::blank(path)),
        Some(Value::String(text)) => Ok(text.trim().to_string()),
        Some(_) => Err(PayloadError::wrong_type(path, "a string")),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DnsChangeInfo {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Status")]
    pub status: String,
}

// ── outbound requests ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub topic_arn: String,
    pub message: String,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionRequest {
    pub topic_arn: String,
    pub protocol: String,
    pub endpoint: String,
    pub return_subscription_arn: bool,
}

impl SubscriptionRequest {
    pub fn queue(topic_arn: impl Into<String>, queue_arn: impl Into<String>) -> Self {
        Self {
            topic_arn: topic_arn.into(),
            protocol: QUEUE_PROTOCOL.to_string(),
            endpoint: queue_arn.into(),
            return_subscription_arn: true,
        }
    }
}

// ── handler response ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    #[serde(
        rename = "statusDescription",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub status_description: Option<String>,
    pub body: Value,
}

impl HandlerResponse {
    pub fn ok(body: impl Into<Value>) -> Self {
        Self {
            status_code: 200,
            status_description: None,
            body: body.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.status_description = Some(description.into());
        self
    }
}

pub fn stable_contract_json(value: impl Serialize) -> String {
    serde_json::to_string(&value).expect("serialization of contract value should not fail")
}
