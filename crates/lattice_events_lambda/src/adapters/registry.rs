use crate::runtime::contract::ServiceDescription;
use crate::runtime::error::RemoteCallError;

pub trait ServiceRegistry {
    fn describe_service(&self, service_identifier: &str)
        -> Result<ServiceDescription, RemoteCallError>;
}
