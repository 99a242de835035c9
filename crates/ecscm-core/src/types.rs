// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the transports, the catalog and the panels.
//!
//! The request structs double as the JSON bodies sent to the server, so
//! their field names follow the server's camelCase convention.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Query parameters for a CGI GET request, kept sorted for stable URLs.
pub type CgiParams = BTreeMap<String, String>;

/// A CGI script shipped inside a server-side plugin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CgiEndpoint {
    /// Plugin that owns the script (e.g. `ECSCM`).
    pub plugin: String,
    /// Script file name (e.g. `ecscm.cgi`).
    pub script: String,
}

impl CgiEndpoint {
    pub fn new(plugin: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            script: script.into(),
        }
    }
}

impl fmt::Display for CgiEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.plugin, self.script)
    }
}

/// One SCM configuration as listed by the enumeration endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub name: String,
    pub plugin: String,
    pub description: String,
}

/// A single server-side property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub property_name: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property_name: name.into(),
            value: Some(value.into()),
        }
    }

    /// The value, treating an empty string the same as no value.
    pub fn non_empty_value(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.is_empty())
    }
}

/// The direct children of a property sheet, keyed by property name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySheet {
    pub properties: BTreeMap<String, Property>,
}

impl PropertySheet {
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }
}

impl FromIterator<Property> for PropertySheet {
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        Self {
            properties: iter
                .into_iter()
                .map(|p| (p.property_name.clone(), p))
                .collect(),
        }
    }
}

/// A name/value pair passed to a procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualParameter {
    pub actual_parameter_name: String,
    pub value: String,
}

impl ActualParameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            actual_parameter_name: name.into(),
            value: value.into(),
        }
    }
}

/// How a credential field was filled in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CredentialType {
    Password,
    Key,
    Choose,
}

/// A credential handed to a procedure run.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialParameter {
    pub credential_name: String,
    pub user_name: String,
    pub password: String,
}

impl fmt::Debug for CredentialParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialParameter")
            .field("credential_name", &self.credential_name)
            .field("user_name", &self.user_name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of a `createSchedule` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    pub project_name: String,
    pub schedule_name: String,
    pub procedure_name: String,
    pub schedule_disabled: bool,
}

/// Body of a `createStep` call that runs a subprocedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStepRequest {
    pub project_name: String,
    pub procedure_name: String,
    pub step_name: String,
    pub subproject: String,
    pub subprocedure: String,
    #[serde(default)]
    pub actual_parameters: Vec<ActualParameter>,
}

/// Body of a `runProcedure` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunProcedureRequest {
    pub project_name: String,
    pub procedure_name: String,
    #[serde(default)]
    pub actual_parameters: Vec<ActualParameter>,
    #[serde(default)]
    pub credentials: Vec<CredentialParameter>,
}

/// Identifier of a job started by `runProcedure`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
