// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the ECSCM client toolkit.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is a
//! startup error instead of a silently ignored setting.

use serde::{Deserialize, Serialize};

/// Placeholder replaced by the plugin name in [`EditorsConfig::form_path_template`].
pub const PLUGIN_PLACEHOLDER: &str = "{plugin}";
/// Placeholder replaced by the editor name in [`EditorsConfig::form_path_template`].
pub const EDITOR_PLACEHOLDER: &str = "{editor}";

/// Top-level ECSCM configuration.
///
/// Every section is optional and falls back to the defaults below.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EcscmConfig {
    /// Orchestration server connection.
    #[serde(default)]
    pub server: ServerConfig,

    /// Location of the SCM enumeration CGI scripts.
    #[serde(default)]
    pub cgi: CgiConfig,

    /// Where per-plugin editor forms live in the property tree.
    #[serde(default)]
    pub editors: EditorsConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server connection settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Base URL of the server, e.g. `https://commander.example.com:8443`.
    #[serde(default = "default_server_url")]
    pub url: String,

    /// User for HTTP basic authentication.
    #[serde(default)]
    pub user: Option<String>,

    /// Password for HTTP basic authentication.
    #[serde(default)]
    pub password: Option<String>,

    /// Existing session id, sent as the `sessionId` cookie. Takes precedence
    /// over user/password.
    #[serde(default)]
    pub session_id: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Accept self-signed server certificates.
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            user: None,
            password: None,
            session_id: None,
            timeout_secs: default_timeout_secs(),
            accept_invalid_certs: false,
        }
    }
}

fn default_server_url() -> String {
    "https://localhost:8443".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// CGI script locations.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CgiConfig {
    /// Plugin hosting the scripts.
    #[serde(default = "default_cgi_plugin")]
    pub plugin: String,

    /// Script answering `getCfgList` / `getImplementingCfgs`.
    #[serde(default = "default_cgi_script")]
    pub script: String,

    /// Script reporting the outcome of a configuration-creation job.
    #[serde(default = "default_monitor_script")]
    pub monitor_script: String,
}

impl Default for CgiConfig {
    fn default() -> Self {
        Self {
            plugin: default_cgi_plugin(),
            script: default_cgi_script(),
            monitor_script: default_monitor_script(),
        }
    }
}

fn default_cgi_plugin() -> String {
    "ECSCM".to_string()
}

fn default_cgi_script() -> String {
    "ecscm.cgi".to_string()
}

fn default_monitor_script() -> String {
    "monitorJob.cgi".to_string()
}

/// Editor form lookup settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EditorsConfig {
    /// Property path of an editor definition, with `{plugin}` and `{editor}`
    /// placeholders.
    #[serde(default = "default_form_path_template")]
    pub form_path_template: String,
}

impl Default for EditorsConfig {
    fn default() -> Self {
        Self {
            form_path_template: default_form_path_template(),
        }
    }
}

impl EditorsConfig {
    /// Expands the template for one plugin/editor pair.
    pub fn form_path(&self, plugin: &str, editor: &str) -> String {
        self.form_path_template
            .replace(PLUGIN_PLACEHOLDER, plugin)
            .replace(EDITOR_PLACEHOLDER, editor)
    }
}

fn default_form_path_template() -> String {
    "/plugins/{plugin}/project/scm_form/{editor}".to_string()
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Level for the `ecscm` targets (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
