//! Provider-backed adapter implementations.
//!
//! Handlers are synchronous; each adapter bridges to the async SDK client on
//! the Lambda runtime's multi-threaded executor.

use std::future::Future;

use aws_sdk_route53::types::{
    AliasTarget, Change, ChangeAction, ChangeBatch, ResourceRecordSet, RrType,
};

use crate::adapters::dns::DnsZoneWriter;
use crate::adapters::notify::NotificationPublisher;
use crate::adapters::registry::ServiceRegistry;
use crate::adapters::topic::{TopicSubscriber, TopicTagWriter};
use crate::runtime::contract::{
    DnsChangeInfo, DnsChangeRequest, PublishRequest, ServiceDescription, ServiceDnsEntry,
    SubscriptionRequest, EVALUATE_TARGET_HEALTH,
};
use crate::runtime::error::RemoteCallError;
use crate::runtime::tags::ResourceTag;

const GET_SERVICE: &str = "vpc-lattice:GetService";
const PUBLISH: &str = "sns:Publish";
const TAG_RESOURCE: &str = "sns:TagResource";
const SUBSCRIBE: &str = "sns:Subscribe";
const CHANGE_RECORD_SETS: &str = "route53:ChangeResourceRecordSets";

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

pub struct LatticeServiceRegistry {
    client: aws_sdk_vpclattice::Client,
}

impl LatticeServiceRegistry {
    pub fn new(client: aws_sdk_vpclattice::Client) -> Self {
        Self { client }
    }
}

impl ServiceRegistry for LatticeServiceRegistry {
    fn describe_service(
        &self,
        service_identifier: &str,
    ) -> Result<ServiceDescription, RemoteCallError> {
        let client = self.client.clone();
        let identifier = service_identifier.to_string();

        let output = block_on(async move {
            client
                .get_service()
                .service_identifier(identifier)
                .send()
                .await
        })
        .map_err(|error| {
            RemoteCallError::new(
                GET_SERVICE,
                aws_sdk_vpclattice::error::DisplayErrorContext(&error).to_string(),
            )
        })?;

        Ok(ServiceDescription {
            arn: output.arn().map(str::to_string),
            custom_domain_name: output.custom_domain_name().map(str::to_string),
            dns_entry: output.dns_entry().map(|entry| ServiceDnsEntry {
                domain_name: entry.domain_name().map(str::to_string),
                hosted_zone_id: entry.hosted_zone_id().map(str::to_string),
            }),
        })
    }
}

#[derive(Clone)]
pub struct SnsTopicClient {
    client: aws_sdk_sns::Client,
}

impl SnsTopicClient {
    pub fn new(client: aws_sdk_sns::Client) -> Self {
        Self { client }
    }
}

impl NotificationPublisher for SnsTopicClient {
    fn publish(&self, request: &PublishRequest) -> Result<Option<String>, RemoteCallError> {
        let client = self.client.clone();
        let request = request.clone();

        block_on(async move {
            client
                .publish()
                .topic_arn(request.topic_arn)
                .message(request.message)
                .subject(request.subject)
                .send()
                .await
        })
        .map(|output| output.message_id().map(str::to_string))
        .map_err(|error| {
            RemoteCallError::new(
                PUBLISH,
                aws_sdk_sns::error::DisplayErrorContext(&error).to_string(),
            )
        })
    }
}

impl TopicTagWriter for SnsTopicClient {
    fn tag_topic(&self, topic_arn: &str, tag: &ResourceTag) -> Result<(), RemoteCallError> {
        let tag = aws_sdk_sns::types::Tag::builder()
            .key(tag.key.clone())
            .value(tag.value.clone())
            .build()
            .map_err(|error| RemoteCallError::new(TAG_RESOURCE, error.to_string()))?;
        let client = self.client.clone();
        let resource_arn = topic_arn.to_string();

        block_on(async move {
            client
                .tag_resource()
                .resource_arn(resource_arn)
                .tags(tag)
                .send()
                .await
        })
        .map(|_| ())
        .map_err(|error| {
            RemoteCallError::new(
                TAG_RESOURCE,
                aws_sdk_sns::error::DisplayErrorContext(&error).to_string(),
            )
        })
    }
}

impl TopicSubscriber for SnsTopicClient {
    fn subscribe(&self, request: &SubscriptionRequest) -> Result<Option<String>, RemoteCallError> {
        let client = self.client.clone();
        let request = request.clone();

        block_on(async move {
            client
                .subscribe()
                .topic_arn(request.topic_arn)
                .protocol(request.protocol)
                .endpoint(request.endpoint)
                .return_subscription_arn(request.return_subscription_arn)
                .send()
                .await
        })
        .map(|output| output.subscription_arn().map(str::to_string))
        .map_err(|error| {
            RemoteCallError::new(
                SUBSCRIBE,
                aws_sdk_sns::error::DisplayErrorContext(&error).to_string(),
            )
        })
    }
}

pub struct Route53ZoneWriter {
    client: aws_sdk_route53::Client,
}

impl Route53ZoneWriter {
    pub fn new(client: aws_sdk_route53::Client) -> Self {
        Self { client }
    }
}

fn alias_change_batch(request: &DnsChangeRequest) -> Result<ChangeBatch, RemoteCallError> {
    let invalid = |error: aws_sdk_route53::error::BuildError| {
        RemoteCallError::new(CHANGE_RECORD_SETS, format!("invalid change batch: {error}"))
    };

    let alias_target = AliasTarget::builder()
        .hosted_zone_id(request.alias_hosted_zone_id.clone())
        .dns_name(request.alias_dns_name.clone())
        .evaluate_target_health(EVALUATE_TARGET_HEALTH)
        .build()
        .map_err(invalid)?;
    let record_set = ResourceRecordSet::builder()
        .name(request.record_name.clone())
        .r#type(RrType::A)
        .alias_target(alias_target)
        .build()
        .map_err(invalid)?;
    let change = Change::builder()
        .action(ChangeAction::Upsert)
        .resource_record_set(record_set)
        .build()
        .map_err(invalid)?;
    ChangeBatch::builder().changes(change).build().map_err(invalid)
}

impl DnsZoneWriter for Route53ZoneWriter {
    fn upsert_alias(
        &self,
        hosted_zone_id: &str,
        request: &DnsChangeRequest,
    ) -> Result<DnsChangeInfo, RemoteCallError> {
        let change_batch = alias_change_batch(request)?;
        let client = self.client.clone();
        let zone_id = hosted_zone_id.to_string();

        let output = block_on(async move {
            client
                .change_resource_record_sets()
                .hosted_zone_id(zone_id)
                .change_batch(change_batch)
                .send()
                .await
        })
        .map_err(|error| {
            RemoteCallError::new(
                CHANGE_RECORD_SETS,
                aws_sdk_route53::error::DisplayErrorContext(&error).to_string(),
            )
        })?;

        let info = output.change_info().ok_or_else(|| {
            RemoteCallError::new(CHANGE_RECORD_SETS, "response is missing ChangeInfo")
        })?;
        Ok(DnsChangeInfo {
            id: info.id().to_string(),
            status: info.status().as_str().to_string(),
        })
    }
}
