use chrono::Utc;
use serde_json::json;

use crate::runtime::error::DispatchError;
use crate::runtime::events::ChainEvent;

/// Receives the chain event a handler produced after its remote mutation
/// succeeded. Handlers that perform no mutation dispatch nothing.
pub trait EventDispatcher {
    fn dispatch(&self, event: ChainEvent) -> Result<(), DispatchError>;
}

/// Records chain events as structured log lines so the path of one change
/// through the chain can be followed across handler invocations.
#[derive(Debug, Clone)]
pub struct TracingDispatcher {
    component: &'static str,
}

impl TracingDispatcher {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }

    fn record(&self, event: &ChainEvent) -> Result<serde_json::Value, DispatchError> {
        let details = serde_json::to_value(event).map_err(|error| DispatchError(error.to_string()))?;
        Ok(json!({
            "component": self.component,
            "event": event.name(),
            "occurred_at": Utc::now().to_rfc3339(),
            "details": details,
        }))
    }
}

impl EventDispatcher for TracingDispatcher {
    fn dispatch(&self, event: ChainEvent) -> Result<(), DispatchError> {
        let record = self.record(&event)?;
        tracing::info!(
            component = self.component,
            event = event.name(),
            chain_event = %record,
            "chain event emitted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_carries_component_and_event_details() {
        let dispatcher = TracingDispatcher::new("subscription_binder");
        let record = dispatcher
            .record(&ChainEvent::QueueSubscribed {
                topic_arn: "arn:aws:sns:eu-west-1:111122223333:services".to_string(),
                queue_arn: "arn:aws:sqs:eu-west-1:111122223333:dns-updates".to_string(),
                subscription_arn: None,
            })
            .expect("record builds");

        assert_eq!(record["component"], "subscription_binder");
        assert_eq!(record["event"], "queue_subscribed");
        assert_eq!(record["details"]["type"], "queue_subscribed");
        assert!(record["occurred_at"].is_string());
    }

    #[test]
    fn dispatch_without_subscriber_succeeds() {
        let dispatcher = TracingDispatcher::new("topic_tagger");
        dispatcher
            .dispatch(ChainEvent::TopicTagged {
                topic_arn: "arn:aws:sns:eu-west-1:111122223333:services".to_string(),
                tag_key: "NewSNS".to_string(),
                tag_value: "true".to_string(),
            })
            .expect("dispatch succeeds");
    }
}
