// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! What a panel is handed when it is created.

use std::collections::BTreeMap;
use std::sync::Arc;

use ecscm_config::EcscmConfig;
use ecscm_core::{CgiEndpoint, CgiTransport, CommanderRpc, EcscmError, ErrorSink, PropertyStore};
use ecscm_catalog::ScmConfigLoader;

use crate::links::LinkBuilder;

/// Server collaborators shared by every panel.
#[derive(Clone)]
pub struct PanelServices {
    pub transport: Arc<dyn CgiTransport>,
    pub properties: Arc<dyn PropertyStore>,
    pub commander: Arc<dyn CommanderRpc>,
    pub config: EcscmConfig,
    pub links: LinkBuilder,
}

impl std::fmt::Debug for PanelServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelServices")
            .field("server", &self.config.server.url)
            .field("links", &self.links)
            .finish_non_exhaustive()
    }
}

impl PanelServices {
    /// A catalog loader wired to these services and `sink`.
    pub fn loader(&self, sink: Arc<dyn ErrorSink>) -> ScmConfigLoader {
        ScmConfigLoader::new(self.transport.clone(), self.properties.clone(), sink)
            .with_settings(&self.config)
    }

    /// Property path of `plugin`'s form named `editor`.
    pub fn form_path(&self, plugin: &str, editor: &str) -> String {
        self.config.editors.form_path(plugin, editor)
    }

    /// The job-monitor CGI script.
    pub fn monitor_endpoint(&self) -> CgiEndpoint {
        CgiEndpoint::new(
            self.config.cgi.plugin.clone(),
            self.config.cgi.monitor_script.clone(),
        )
    }
}

/// The procedure a panel is opened on, e.g. `/projects/Default/procedures/Build`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectContext {
    pub project: String,
    pub procedure: Option<String>,
}

impl ObjectContext {
    /// Parses `/projects/<project>[/procedures/<procedure>]`.
    ///
    /// Components are percent-decoded.
    pub fn parse(raw: &str) -> Result<Self, EcscmError> {
        let invalid = || EcscmError::Validation(format!("invalid object context '{raw}'"));

        let parts: Vec<String> = raw
            .trim()
            .trim_matches('/')
            .split('/')
            .map(decode)
            .collect();
        match parts.as_slice() {
            [kind, project] if kind == "projects" && !project.is_empty() => Ok(Self {
                project: project.clone(),
                procedure: None,
            }),
            [kind, project, sub, procedure]
                if kind == "projects"
                    && sub == "procedures"
                    && !project.is_empty()
                    && !procedure.is_empty() =>
            {
                Ok(Self {
                    project: project.clone(),
                    procedure: Some(procedure.clone()),
                })
            }
            _ => Err(invalid()),
        }
    }

    /// The procedure name, or a validation error naming `what` needs it.
    pub fn require_procedure(&self, what: &str) -> Result<&str, EcscmError> {
        self.procedure.as_deref().ok_or_else(|| {
            EcscmError::Validation(format!("{what} must be opened on a procedure"))
        })
    }
}

fn decode(component: &str) -> String {
    // `form_urlencoded` would turn '+' into a space; object names may contain '+'.
    let escaped = component.replace('+', "%2B");
    url::form_urlencoded::parse(format!("x={escaped}").as_bytes())
        .next()
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

/// Everything a factory needs to build one panel.
#[derive(Clone)]
pub struct PanelContext {
    pub services: PanelServices,
    pub sink: Arc<dyn ErrorSink>,
    pub object: Option<ObjectContext>,
    /// Request parameters the panel was opened with (`debug`, actual parameters).
    pub parameters: BTreeMap<String, String>,
}

impl std::fmt::Debug for PanelContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelContext")
            .field("services", &self.services)
            .field("object", &self.object)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

impl PanelContext {
    pub fn new(services: PanelServices, sink: Arc<dyn ErrorSink>) -> Self {
        Self {
            services,
            sink,
            object: None,
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_object(mut self, object: ObjectContext) -> Self {
        self.object = Some(object);
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// The object context, or a validation error naming `what` needs it.
    pub fn require_object(&self, what: &str) -> Result<&ObjectContext, EcscmError> {
        self.object.as_ref().ok_or_else(|| {
            EcscmError::Validation(format!("{what} needs an object context"))
        })
    }

    pub fn debug_requested(&self) -> bool {
        self.parameters.get("debug").is_some_and(|v| v == "1")
    }
}
