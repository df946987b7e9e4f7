pub mod aws;
pub mod dns;
pub mod notify;
pub mod registry;
pub mod topic;
