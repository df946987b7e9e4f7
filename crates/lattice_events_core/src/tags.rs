use serde::{Deserialize, Serialize};

/// Tag set on a service-network service once it is ready to be announced.
pub const NEW_SERVICE_TAG: &str = "NewService";
/// Tag set on a notification topic once queues may subscribe to it.
pub const NEW_TOPIC_TAG: &str = "NewSNS";
pub const AFFIRMATIVE_TAG_VALUE: &str = "true";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFlag {
    Affirmative,
    /// Present, but with any value other than exactly `"true"`.
    Other,
    Absent,
}

impl TagFlag {
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some(AFFIRMATIVE_TAG_VALUE) => Self::Affirmative,
            Some(_) => Self::Other,
            None => Self::Absent,
        }
    }

    pub fn is_affirmative(self) -> bool {
        matches!(self, Self::Affirmative)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceTag {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Value")]
    pub value: String,
}

impl ResourceTag {
    pub fn new_topic_marker() -> Self {
        Self {
            key: NEW_TOPIC_TAG.to_string(),
            value: AFFIRMATIVE_TAG_VALUE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_true_is_affirmative() {
        assert!(TagFlag::from_value(Some("true")).is_affirmative());
        for value in ["True", "TRUE", "yes", " true", "true ", "1", ""] {
            assert_eq!(TagFlag::from_value(Some(value)), TagFlag::Other, "{value:?}");
        }
        assert_eq!(TagFlag::from_value(None), TagFlag::Absent);
        assert!(!TagFlag::Absent.is_affirmative());
    }

    #[test]
    fn topic_marker_serializes_with_provider_casing() {
        let tag = serde_json::to_value(ResourceTag::new_topic_marker()).expect("tag serializes");
        assert_eq!(tag, serde_json::json!({"Key": "NewSNS", "Value": "true"}));
    }
}
