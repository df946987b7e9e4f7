//! Per-handler configuration, read once when a handler binary starts.
//!
//! Each struct is built through `from_lookup` so tests can supply values
//! without mutating the process environment; `from_env` is the thin wrapper the
//! binaries call.

use crate::error::ConfigError;

pub const SNS_TOPIC_VAR: &str = "SNS_TOPIC";
pub const SQS_ARN_VAR: &str = "SQS_ARN";
pub const PHZ_ID_VAR: &str = "PHZ_ID";
pub const PHZ_UPDATED_TOPIC_VAR: &str = "PHZ_UPDATED_TOPIC";
pub const AWS_REGION_VAR: &str = "AWS_REGION";

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, name: &'static str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    optional(lookup, name).ok_or(ConfigError::Missing { name })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    pub topic_arn: String,
}

impl NotifierConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            topic_arn: required(&lookup, SNS_TOPIC_VAR)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggerConfig {
    pub topic_arn: String,
}

impl TaggerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            topic_arn: required(&lookup, SNS_TOPIC_VAR)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinderConfig {
    pub queue_arn: String,
}

impl BinderConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            queue_arn: required(&lookup, SQS_ARN_VAR)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsConfiguratorConfig {
    pub hosted_zone_id: String,
    /// When set, a completion message is published after every successful upsert.
    pub completion_topic_arn: Option<String>,
}

impl DnsConfiguratorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            hosted_zone_id: required(&lookup, PHZ_ID_VAR)?,
            completion_topic_arn: optional(&lookup, PHZ_UPDATED_TOPIC_VAR),
        })
    }
}

/// The probe reports a missing region through its failure response instead of
/// refusing to start, so the region stays optional here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    pub region: Option<String>,
}

impl ProbeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            region: optional(&lookup, AWS_REGION_VAR),
        }
    }
}
