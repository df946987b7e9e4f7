use serde::{Deserialize, Serialize};

/// Side effects one handler produces that the surrounding event bus turns into
/// the next handler's trigger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChainEvent {
    ServiceAnnounced {
        service_arn: String,
        custom_domain_name: String,
        fingerprint: String,
        message_id: Option<String>,
    },
    TopicTagged {
        topic_arn: String,
        tag_key: String,
        tag_value: String,
    },
    QueueSubscribed {
        topic_arn: String,
        queue_arn: String,
        subscription_arn: Option<String>,
    },
    DnsRecordUpserted {
        hosted_zone_id: String,
        record_name: String,
        alias_dns_name: String,
        fingerprint: String,
        change_id: String,
    },
    ZoneUpdateAnnounced {
        topic_arn: String,
        message_id: Option<String>,
    },
}

impl ChainEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ServiceAnnounced { .. } => "service_announced",
            Self::TopicTagged { .. } => "topic_tagged",
            Self::QueueSubscribed { .. } => "queue_subscribed",
            Self::DnsRecordUpserted { .. } => "dns_record_upserted",
            Self::ZoneUpdateAnnounced { .. } => "zone_update_announced",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_type_matches_event_name() {
        let event = ChainEvent::TopicTagged {
            topic_arn: "arn:aws:sns:eu-west-1:111122223333:services".to_string(),
            tag_key: "NewSNS".to_string(),
            tag_value: "true".to_string(),
        };
        let value = serde_json::to_value(&event).expect("event serializes");
        assert_eq!(value["type"], event.name());
    }
}
