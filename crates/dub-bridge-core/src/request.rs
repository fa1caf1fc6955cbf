//! Requests the bridge hands to the external request dispatcher.

use std::fmt;

use serde::Serialize;

use crate::config::BridgeConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestKind {
    /// Scan a directory (or a file's parent directory) for renamable files.
    Scan,
    /// Load new names from a text/CSV file.
    ImportNames,
}

/// A path-carrying submission that targets the managed content region.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BridgeRequest {
    pub kind: RequestKind,
    pub path: String,
}

impl BridgeRequest {
    pub fn scan(path: impl Into<String>) -> Self {
        Self {
            kind: RequestKind::Scan,
            path: path.into(),
        }
    }

    pub fn import_names(path: impl Into<String>) -> Self {
        Self {
            kind: RequestKind::ImportNames,
            path: path.into(),
        }
    }

    pub fn method(&self) -> &'static str {
        "POST"
    }

    pub fn endpoint<'a>(&self, config: &'a BridgeConfig) -> &'a str {
        match self.kind {
            RequestKind::Scan => &config.scan_endpoint,
            RequestKind::ImportNames => &config.import_names_endpoint,
        }
    }

    pub fn target_selector(&self, config: &BridgeConfig) -> String {
        config.content_region_selector()
    }

    /// Bind to a configuration for display.
    pub fn display<'a>(&'a self, config: &'a BridgeConfig) -> DisplayRequest<'a> {
        DisplayRequest {
            request: self,
            config,
        }
    }
}

/// `POST /api/scan path=/some/dir`, for logs.
pub struct DisplayRequest<'a> {
    request: &'a BridgeRequest,
    config: &'a BridgeConfig,
}

impl fmt::Display for DisplayRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} path={}",
            self.request.method(),
            self.request.endpoint(self.config),
            self.request.path
        )
    }
}
