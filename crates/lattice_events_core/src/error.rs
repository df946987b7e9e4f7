use thiserror::Error;

/// Malformed-input failures raised while decoding a trigger payload.
///
/// Every variant names the path of the offending field so a failed invocation
/// can be traced back to the layer of the payload that was wrong.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("missing field `{path}`")]
    MissingField { path: String },

    #[error("field `{path}` must be {expected}")]
    WrongType {
        path: String,
        expected: &'static str,
    },

    #[error("field `{path}` cannot be blank")]
    BlankField { path: String },

    #[error("field `{path}` could not be decoded: {source}")]
    InvalidJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("`{arn}` is not a well-formed ARN")]
    InvalidArn { arn: String },
}

impl PayloadError {
    pub fn missing(path: impl Into<String>) -> Self {
        Self::MissingField { path: path.into() }
    }

    pub fn blank(path: impl Into<String>) -> Self {
        Self::BlankField { path: path.into() }
    }

    pub fn invalid_json(path: impl Into<String>, source: serde_json::Error) -> Self {
        Self::InvalidJson {
            path: path.into(),
            source,
        }
    }

    pub fn wrong_type(path: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongType {
            path: path.into(),
            expected,
        }
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            Self::MissingField { path }
            | Self::WrongType { path, .. }
            | Self::BlankField { path }
            | Self::InvalidJson { path, .. } => Some(path),
            Self::InvalidArn { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} must be configured")]
    Missing { name: &'static str },
}

/// A remote service rejected or failed a request.
///
/// Transient and permanent failures are not distinguished; the hosting
/// platform's redelivery policy decides what happens next.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed: {message}")]
pub struct RemoteCallError {
    pub operation: &'static str,
    pub message: String,
}

impl RemoteCallError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to dispatch chain event: {0}")]
pub struct DispatchError(pub String);

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("malformed event: {0}")]
    MalformedEvent(#[from] PayloadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    RemoteCall(#[from] RemoteCallError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("failed to encode {what}: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
