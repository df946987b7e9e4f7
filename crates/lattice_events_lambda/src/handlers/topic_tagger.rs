use serde_json::{json, Value};
use tracing::info;

use crate::adapters::topic::TopicTagWriter;
use crate::dispatch::EventDispatcher;
use crate::runtime::config::TaggerConfig;
use crate::runtime::contract::HandlerResponse;
use crate::runtime::error::HandlerError;
use crate::runtime::events::ChainEvent;
use crate::runtime::tags::ResourceTag;

pub const COMPONENT: &str = "topic_tagger";

/// Marks the configured notification topic with `NewSNS=true`. The event is
/// only logged.
pub fn handle_topic_tag_event(
    event: &Value,
    config: &TaggerConfig,
    tag_writer: &impl TopicTagWriter,
    dispatcher: &impl EventDispatcher,
) -> Result<HandlerResponse, HandlerError> {
    info!(
        component = COMPONENT,
        event = "tagging_started",
        topic_arn = %config.topic_arn,
        trigger = %event,
        "tagging notification topic"
    );

    let tag = ResourceTag::new_topic_marker();
    tag_writer.tag_topic(&config.topic_arn, &tag)?;

    dispatcher.dispatch(ChainEvent::TopicTagged {
        topic_arn: config.topic_arn.clone(),
        tag_key: tag.key.clone(),
        tag_value: tag.value.clone(),
    })?;

    Ok(HandlerResponse::ok(json!({
        "ResourceArn": config.topic_arn,
        "Tags": [tag],
    })))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::handlers::testing::{CapturingDispatcher, InMemoryTopics, TOPIC_ARN};

    fn config() -> TaggerConfig {
        TaggerConfig {
            topic_arn: TOPIC_ARN.to_string(),
        }
    }

    #[test]
    fn applies_marker_tag_to_configured_topic() {
        let topics = InMemoryTopics::default();
        let dispatcher = CapturingDispatcher::default();

        let response = handle_topic_tag_event(&json!({}), &config(), &topics, &dispatcher)
            .expect("tagging should succeed");

        assert_eq!(response.status_code, 200);
        assert_eq!(
            response.body,
            json!({
                "ResourceArn": TOPIC_ARN,
                "Tags": [{"Key": "NewSNS", "Value": "true"}]
            })
        );
        assert_eq!(
            dispatcher.events(),
            vec![ChainEvent::TopicTagged {
                topic_arn: TOPIC_ARN.to_string(),
                tag_key: "NewSNS".to_string(),
                tag_value: "true".to_string(),
            }]
        );
    }

    #[test]
    fn repeated_tagging_leaves_a_single_tag() {
        let topics = InMemoryTopics::default();
        let dispatcher = CapturingDispatcher::default();

        for _ in 0..2 {
            handle_topic_tag_event(&json!({"source": "aws.events"}), &config(), &topics, &dispatcher)
                .expect("tagging should succeed");
        }

        assert_eq!(topics.tag_calls(), 2);
        assert_eq!(
            topics.tags_of(TOPIC_ARN),
            BTreeMap::from([("NewSNS".to_string(), "true".to_string())])
        );
    }
}
