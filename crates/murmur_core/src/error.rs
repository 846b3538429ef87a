use miette::Diagnostic;
use thiserror::Error;

use crate::channel::{Capability, ChannelKind};

/// What kind of platform object a lookup was aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Guild,
    Channel,
    Thread,
    Message,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Guild => write!(f, "Server"),
            Self::Channel => write!(f, "Channel"),
            Self::Thread => write!(f, "Thread"),
            Self::Message => write!(f, "Message"),
        }
    }
}

#[derive(Error, Diagnostic, Debug)]
pub enum MurmurError {
    #[error("{resource} {id} not found")]
    #[diagnostic(
        code(murmur::not_found),
        help("Check the ID and that the bot has been invited to the server that owns it")
    )]
    NotFound { resource: ResourceKind, id: String },

    #[error("No permission to access {resource} {id}")]
    #[diagnostic(
        code(murmur::forbidden),
        help("Grant the bot View Channel and Read Message History on {resource} {id}")
    )]
    Forbidden { resource: ResourceKind, id: String },

    #[error("Invalid '{field}' filter: {reason}")]
    #[diagnostic(code(murmur::invalid_filter), help("Expected {expected}"))]
    InvalidFilter {
        field: String,
        reason: String,
        expected: String,
    },

    #[error(
        "Invalid '{field}' timestamp format: '{value}'. Use ISO format: YYYY-MM-DDTHH:MM:SS.sssZ"
    )]
    #[diagnostic(
        code(murmur::invalid_timestamp),
        help("Fractional seconds and the Z/offset suffix are optional; timestamps without an offset are read as UTC")
    )]
    InvalidTimestamp { field: String, value: String },

    #[error("Channel type {kind} does not support {capability}")]
    #[diagnostic(
        code(murmur::unsupported_channel),
        help("Channel {channel_id} cannot serve this request; pick a text channel or thread")
    )]
    UnsupportedChannel {
        channel_id: String,
        kind: ChannelKind,
        capability: Capability,
    },

    #[error("Channel {channel_id} is not a thread")]
    #[diagnostic(
        code(murmur::not_a_thread),
        help("Channel {channel_id} is a {kind} channel; use read_messages_from_channel instead")
    )]
    NotAThread {
        channel_id: String,
        kind: ChannelKind,
    },

    #[error("{operation} failed: {cause}")]
    #[diagnostic(
        code(murmur::platform_request_failed),
        help("The chat platform rejected or failed the request; it is not retried automatically")
    )]
    Platform {
        operation: String,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Configuration error in {config_path}")]
    #[diagnostic(
        code(murmur::configuration_error),
        help("Field '{field}' should be {expected}")
    )]
    Configuration {
        config_path: String,
        field: String,
        expected: String,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Prompt template '{name}' failed to render")]
    #[diagnostic(code(murmur::template_failed))]
    Template {
        name: String,
        #[source]
        cause: minijinja::Error,
    },
}

pub type Result<T> = std::result::Result<T, MurmurError>;

impl MurmurError {
    pub fn not_found(resource: ResourceKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn forbidden(resource: ResourceKind, id: impl Into<String>) -> Self {
        Self::Forbidden {
            resource,
            id: id.into(),
        }
    }

    pub fn invalid_filter(
        field: impl Into<String>,
        reason: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidFilter {
            field: field.into(),
            reason: reason.into(),
            expected: expected.into(),
        }
    }

    pub fn invalid_timestamp(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn platform(
        operation: impl Into<String>,
        cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Platform {
            operation: operation.into(),
            cause: cause.into(),
        }
    }
}
