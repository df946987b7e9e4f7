use crate::runtime::contract::PublishRequest;
use crate::runtime::error::RemoteCallError;

pub trait NotificationPublisher {
    /// Publishes one message and returns the provider's message id, if any.
    fn publish(&self, request: &PublishRequest) -> Result<Option<String>, RemoteCallError>;
}
