pub mod diagnostic_probe;
pub mod dns_configurator;
pub mod service_created;
pub mod subscription_binder;
pub mod topic_tagger;

#[cfg(test)]
pub(crate) mod testing;
