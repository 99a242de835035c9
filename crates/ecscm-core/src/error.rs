// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the ECSCM client toolkit.

use thiserror::Error;

/// Server error code returned when a property path does not exist.
pub const NO_SUCH_PROPERTY: &str = "NoSuchProperty";

/// The primary error type used across the ECSCM transports, catalog and panels.
#[derive(Debug, Error)]
pub enum EcscmError {
    /// Configuration errors (invalid TOML, bad server URL, missing settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// Network or protocol failure while reaching an endpoint.
    #[error("{message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A well-formed response that carried an `error` field. The message is
    /// kept verbatim.
    #[error("{0}")]
    Application(String),

    /// The server answered with a coded error (e.g. `NoSuchProperty`).
    #[error("{code}: {message}")]
    Server { code: String, message: String },

    /// The named SCM configuration is not in the catalog.
    #[error("SCM configuration '{name}' not found")]
    ConfigNotFound { name: String },

    /// A plugin has no (or an empty) editor definition for the requested editor.
    #[error("editor '{editor}' not found for plugin '{plugin}'")]
    EditorNotFound { editor: String, plugin: String },

    /// A payload could not be decoded into its schema type.
    #[error("failed to parse {what}: {message}")]
    Parse { what: String, message: String },

    /// Submitted form values failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EcscmError {
    /// Builds a transport error with a context message and an optional cause.
    pub fn transport(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        EcscmError::Transport {
            message: message.into(),
            source,
        }
    }

    /// Returns true for the server's "no such property" error code.
    pub fn is_no_such_property(&self) -> bool {
        matches!(self, EcscmError::Server { code, .. } if code == NO_SUCH_PROPERTY)
    }

    /// This error followed by each of its causes, separated by `: `.
    ///
    /// Transport errors keep the cause out of their own message, so this is
    /// what gets shown to users.
    pub fn chain(&self) -> String {
        let mut rendered = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            rendered.push_str(": ");
            rendered.push_str(&cause.to_string());
            source = std::error::Error::source(cause);
        }
        rendered
    }

    /// Returns true for the not-found family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EcscmError::ConfigNotFound { .. } | EcscmError::EditorNotFound { .. }
        ) || self.is_no_such_property()
    }
}
