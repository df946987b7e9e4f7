use crate::runtime::contract::SubscriptionRequest;
use crate::runtime::error::RemoteCallError;
use crate::runtime::tags::ResourceTag;

pub trait TopicTagWriter {
    fn tag_topic(&self, topic_arn: &str, tag: &ResourceTag) -> Result<(), RemoteCallError>;
}

pub trait TopicSubscriber {
    /// Returns the subscription ARN when the provider reports one.
    fn subscribe(&self, request: &SubscriptionRequest) -> Result<Option<String>, RemoteCallError>;
}
