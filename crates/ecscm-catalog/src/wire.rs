// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema of the enumeration CGI's XML response.
//!
//! ```xml
//! <response>
//!   <cfgs>
//!     <cfg><name>config1</name><plugin>pluginA</plugin><desc>...</desc></cfg>
//!   </cfgs>
//! </response>
//! ```
//!
//! or, on failure, `<response><error>message</error></response>`.

use ecscm_core::{ConfigEntry, EcscmError};
use serde::Deserialize;

/// The whole `<response>` document.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigListResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub cfgs: Option<ConfigList>,
}

/// The `<cfgs>` element.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigList {
    #[serde(default, rename = "cfg")]
    pub entries: Vec<WireConfig>,
}

/// One `<cfg>` element.
#[derive(Debug, Deserialize)]
pub struct WireConfig {
    pub name: String,
    pub plugin: String,
    #[serde(default)]
    pub desc: String,
}

impl From<WireConfig> for ConfigEntry {
    fn from(cfg: WireConfig) -> Self {
        ConfigEntry {
            name: cfg.name,
            plugin: cfg.plugin,
            description: cfg.desc,
        }
    }
}

impl ConfigListResponse {
    /// Decodes a CGI body. Malformed XML and `<cfg>` elements without a name
    /// or plugin are parse errors.
    pub fn decode(body: &str) -> Result<Self, EcscmError> {
        quick_xml::de::from_str(body).map_err(|e| EcscmError::Parse {
            what: "SCM configuration list".to_string(),
            message: e.to_string(),
        })
    }

    /// The server-reported error, if the `<error>` element is present and
    /// not blank.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.trim().is_empty())
    }

    /// Consumes the response into catalog entries.
    pub fn into_entries(self) -> Vec<ConfigEntry> {
        self.cfgs
            .map(|list| list.entries.into_iter().map(ConfigEntry::from).collect())
            .unwrap_or_default()
    }
}
