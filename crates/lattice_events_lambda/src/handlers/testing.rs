use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::adapters::dns::DnsZoneWriter;
use crate::adapters::notify::NotificationPublisher;
use crate::adapters::registry::ServiceRegistry;
use crate::adapters::topic::{TopicSubscriber, TopicTagWriter};
use crate::dispatch::EventDispatcher;
use crate::runtime::contract::{
    DnsChangeInfo, DnsChangeRequest, PublishRequest, ServiceDescription, ServiceDnsEntry,
    SubscriptionRequest, ALIAS_RECORD_TYPE,
};
use crate::runtime::error::{DispatchError, RemoteCallError};
use crate::runtime::events::ChainEvent;
use crate::runtime::tags::ResourceTag;

pub const SERVICE_ARN: &str = "arn:aws:vpc-lattice:eu-west-1:111122223333:service/svc-0abc";
pub const TOPIC_ARN: &str = "arn:aws:sns:eu-west-1:111122223333:lattice-services";
pub const QUEUE_ARN: &str = "arn:aws:sqs:eu-west-1:111122223333:dns-updates";

pub fn complete_description() -> ServiceDescription {
    ServiceDescription {
        arn: Some(SERVICE_ARN.to_string()),
        custom_domain_name: Some("svc.example.com".to_string()),
        dns_entry: Some(ServiceDnsEntry {
            domain_name: Some("abc.lattice.aws".to_string()),
            hosted_zone_id: Some("Z123".to_string()),
        }),
    }
}

#[derive(Default)]
pub struct CapturingDispatcher {
    events: Mutex<Vec<ChainEvent>>,
}

impl CapturingDispatcher {
    pub fn events(&self) -> Vec<ChainEvent> {
        self.events.lock().expect("poisoned mutex").clone()
    }
}

impl EventDispatcher for CapturingDispatcher {
    fn dispatch(&self, event: ChainEvent) -> Result<(), DispatchError> {
        self.events.lock().expect("poisoned mutex").push(event);
        Ok(())
    }
}

pub struct StaticRegistry {
    description: Result<ServiceDescription, RemoteCallError>,
    lookups: Mutex<Vec<String>>,
}

impl StaticRegistry {
    pub fn new(description: ServiceDescription) -> Self {
        Self {
            description: Ok(description),
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            description: Err(RemoteCallError::new("vpc-lattice:GetService", message)),
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().expect("poisoned mutex").clone()
    }
}

impl ServiceRegistry for StaticRegistry {
    fn describe_service(
        &self,
        service_identifier: &str,
    ) -> Result<ServiceDescription, RemoteCallError> {
        self.lookups
            .lock()
            .expect("poisoned mutex")
            .push(service_identifier.to_string());
        self.description.clone()
    }
}

#[derive(Default)]
pub struct CapturingPublisher {
    requests: Mutex<Vec<PublishRequest>>,
    failure: Option<String>,
}

impl CapturingPublisher {
    pub fn failing(message: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
        }
    }

    pub fn requests(&self) -> Vec<PublishRequest> {
        self.requests.lock().expect("poisoned mutex").clone()
    }
}

impl NotificationPublisher for CapturingPublisher {
    fn publish(&self, request: &PublishRequest) -> Result<Option<String>, RemoteCallError> {
        if let Some(message) = &self.failure {
            return Err(RemoteCallError::new("sns:Publish", message.clone()));
        }
        let mut requests = self.requests.lock().expect("poisoned mutex");
        requests.push(request.clone());
        Ok(Some(format!("msg-{}", requests.len())))
    }
}

/// Topic tags and subscriptions held the way the provider holds them: tags
/// keyed per topic, so re-tagging overwrites rather than accumulates.
#[derive(Default)]
pub struct InMemoryTopics {
    tags: Mutex<BTreeMap<String, BTreeMap<String, String>>>,
    tag_calls: Mutex<usize>,
    subscriptions: Mutex<Vec<SubscriptionRequest>>,
}

impl InMemoryTopics {
    pub fn tags_of(&self, topic_arn: &str) -> BTreeMap<String, String> {
        self.tags
            .lock()
            .expect("poisoned mutex")
            .get(topic_arn)
            .cloned()
            .unwrap_or_default()
    }

    pub fn tag_calls(&self) -> usize {
        *self.tag_calls.lock().expect("poisoned mutex")
    }

    pub fn subscriptions(&self) -> Vec<SubscriptionRequest> {
        self.subscriptions.lock().expect("poisoned mutex").clone()
    }
}

impl TopicTagWriter for InMemoryTopics {
    fn tag_topic(&self, topic_arn: &str, tag: &ResourceTag) -> Result<(), RemoteCallError> {
        *self.tag_calls.lock().expect("poisoned mutex") += 1;
        self.tags
            .lock()
            .expect("poisoned mutex")
            .entry(topic_arn.to_string())
            .or_default()
            .insert(tag.key.clone(), tag.value.clone());
        Ok(())
    }
}

impl TopicSubscriber for InMemoryTopics {
    fn subscribe(&self, request: &SubscriptionRequest) -> Result<Option<String>, RemoteCallError> {
        let mut subscriptions = self.subscriptions.lock().expect("poisoned mutex");
        subscriptions.push(request.clone());
        Ok(Some(format!("{}:sub-{}", request.topic_arn, subscriptions.len())))
    }
}

/// Records keyed by (zone, name, type); an upsert replaces the previous target.
#[derive(Default)]
pub struct InMemoryZone {
    records: Mutex<BTreeMap<(String, String, String), DnsChangeRequest>>,
    submissions: Mutex<usize>,
    failure: Option<String>,
}

impl InMemoryZone {
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<((String, String, String), DnsChangeRequest)> {
        self.records
            .lock()
            .expect("poisoned mutex")
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    pub fn submissions(&self) -> usize {
        *self.submissions.lock().expect("poisoned mutex")
    }
}

impl DnsZoneWriter for InMemoryZone {
    fn upsert_alias(
        &self,
        hosted_zone_id: &str,
        request: &DnsChangeRequest,
    ) -> Result<DnsChangeInfo, RemoteCallError> {
        if let Some(message) = &self.failure {
            return Err(RemoteCallError::new(
                "route53:ChangeResourceRecordSets",
                message.clone(),
            ));
        }
        let mut submissions = self.submissions.lock().expect("poisoned mutex");
        *submissions += 1;
        self.records.lock().expect("poisoned mutex").insert(
            (
                hosted_zone_id.to_string(),
                request.record_name.clone(),
                ALIAS_RECORD_TYPE.to_string(),
            ),
            request.clone(),
        );
        Ok(DnsChangeInfo {
            id: format!("/change/C{:04}", *submissions),
            status: "PENDING".to_string(),
        })
    }
}
