use crate::runtime::contract::{DnsChangeInfo, DnsChangeRequest};
use crate::runtime::error::RemoteCallError;

pub trait DnsZoneWriter {
    /// Upserts an alias `A` record in `hosted_zone_id`. Submitting the same
    /// request twice leaves the zone in the same state as submitting it once.
    fn upsert_alias(
        &self,
        hosted_zone_id: &str,
        request: &DnsChangeRequest,
    ) -> Result<DnsChangeInfo, RemoteCallError>;
}
