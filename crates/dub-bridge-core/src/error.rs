//! Error types for bridge operations.
//!
//! None of these are ever shown to the end user. The coordinator logs them
//! and degrades to doing nothing further.

use smol_str::SmolStr;
use thiserror::Error;

/// A DOM or runtime operation failed on the host platform.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct PlatformError(pub String);

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        PlatformError(s.to_string())
    }
}

impl From<String> for PlatformError {
    fn from(s: String) -> Self {
        PlatformError(s)
    }
}

/// Invalid bridge configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The managed content region id is empty.
    #[error("content region id must not be empty")]
    EmptyContentRegion,

    /// A notification event name is empty.
    #[error("event name for {0} must not be empty")]
    EmptyEventName(&'static str),

    /// A request endpoint is empty.
    #[error("endpoint for {0} must not be empty")]
    EmptyEndpoint(&'static str),

    /// No file extensions are configured for name imports.
    #[error("at least one import extension is required")]
    NoImportExtensions,
}

/// Failures of the optional desktop capabilities (dialog, drop).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CapabilityError {
    /// The capability is not provided by the host runtime.
    #[error("capability unavailable")]
    Unavailable,

    /// The user dismissed the dialog.
    #[error("cancelled by user")]
    Cancelled,

    /// The runtime call failed.
    #[error("capability call failed: {0}")]
    Failed(String),
}

/// Errors surfaced by coordinator operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BridgeError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// No text field with the given name exists in the live document.
    #[error("no field named {0:?}")]
    FieldNotFound(SmolStr),

    /// The bridge was already handling an event when the call arrived.
    #[error("bridge is busy handling another event")]
    Busy,
}
