// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Two-phase catalog loader.
//!
//! Phase 1 issues a single enumeration request to the ECSCM CGI script and
//! parses the answer into a [`ScmConfigCatalog`]. Phase 2, when an editor name
//! is configured, fetches that editor's form for every distinct plugin in the
//! catalog concurrently and waits for all of them before completing.
//!
//! Errors never escape [`ScmConfigLoader::load`]; they go to the injected
//! [`ErrorSink`]. A failed phase 1 aborts the load and the completion callback
//! is dropped without being called.

use std::sync::Arc;

use ecscm_config::EcscmConfig;
use ecscm_config::model::EditorsConfig;
use ecscm_core::{CgiEndpoint, CgiParams, CgiTransport, EcscmError, ErrorSink, PropertyStore};
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::catalog::ScmConfigCatalog;

/// Enumeration command listing every configuration.
pub const CMD_GET_CFG_LIST: &str = "getCfgList";
/// Enumeration command listing configurations whose plugin implements a method.
pub const CMD_GET_IMPLEMENTING_CFGS: &str = "getImplementingCfgs";

type CompletionCallback = Box<dyn FnOnce(&ScmConfigCatalog) + Send>;

/// Counters describing a completed load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Entries read from the enumeration response.
    pub configs: usize,
    /// Editor lookups issued in phase 2 (one per distinct plugin).
    pub editors_requested: usize,
    /// Editor lookups that produced a definition.
    pub editors_loaded: usize,
}

/// How a load ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Every issued request settled; the completion callback (if any) ran.
    Complete(LoadReport),
    /// Phase 1 failed; the error was reported and phase 2 never started.
    Aborted,
}

impl LoadOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, LoadOutcome::Complete(_))
    }

    pub fn report(&self) -> Option<LoadReport> {
        match self {
            LoadOutcome::Complete(report) => Some(*report),
            LoadOutcome::Aborted => None,
        }
    }
}

/// Populates a [`ScmConfigCatalog`] from the server.
///
/// A loader is single-use: [`load`](Self::load) consumes it, so the completion
/// callback cannot fire twice.
pub struct ScmConfigLoader {
    transport: Arc<dyn CgiTransport>,
    properties: Arc<dyn PropertyStore>,
    sink: Arc<dyn ErrorSink>,
    endpoint: CgiEndpoint,
    editors: EditorsConfig,
    implemented_method: Option<String>,
    editor_name: Option<String>,
    on_complete: Option<CompletionCallback>,
}

impl ScmConfigLoader {
    /// Create a loader using the default endpoint and editor path template.
    pub fn new(
        transport: Arc<dyn CgiTransport>,
        properties: Arc<dyn PropertyStore>,
        sink: Arc<dyn ErrorSink>,
    ) -> Self {
        let defaults = EcscmConfig::default();
        Self {
            transport,
            properties,
            sink,
            endpoint: CgiEndpoint::new(defaults.cgi.plugin, defaults.cgi.script),
            editors: defaults.editors,
            implemented_method: None,
            editor_name: None,
            on_complete: None,
        }
    }

    /// Take the CGI endpoint and editor path template from `config`.
    pub fn with_settings(mut self, config: &EcscmConfig) -> Self {
        self.endpoint = CgiEndpoint::new(config.cgi.plugin.clone(), config.cgi.script.clone());
        self.editors = config.editors.clone();
        self
    }

    /// Only list configurations whose plugin implements `method`.
    ///
    /// An empty method name means no filter.
    pub fn implementing(mut self, method: impl Into<String>) -> Self {
        let method = method.into();
        self.implemented_method = (!method.is_empty()).then_some(method);
        self
    }

    /// Fetch the editor form called `editor` for each plugin after listing.
    pub fn with_editor(mut self, editor: impl Into<String>) -> Self {
        let editor = editor.into();
        self.editor_name = (!editor.is_empty()).then_some(editor);
        self
    }

    /// Run `callback` once every issued request has settled.
    pub fn on_complete(mut self, callback: impl FnOnce(&ScmConfigCatalog) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn endpoint(&self) -> &CgiEndpoint {
        &self.endpoint
    }

    /// Parameters of the phase-1 request.
    pub fn request_params(&self) -> CgiParams {
        let mut params = CgiParams::new();
        match &self.implemented_method {
            Some(method) => {
                params.insert("cmd".to_string(), CMD_GET_IMPLEMENTING_CFGS.to_string());
                params.insert("method".to_string(), method.clone());
            }
            None => {
                params.insert("cmd".to_string(), CMD_GET_CFG_LIST.to_string());
            }
        }
        params
    }

    /// Property path of `plugin`'s form for the configured editor.
    pub fn editor_path(&self, plugin: &str) -> Option<String> {
        self.editor_name
            .as_deref()
            .map(|editor| self.editors.form_path(plugin, editor))
    }

    /// Run both phases against `catalog`.
    pub async fn load(self, catalog: &mut ScmConfigCatalog) -> LoadOutcome {
        let params = self.request_params();
        // Only owned, `Sync` pieces are held across awaits so the future stays `Send`.
        let Self {
            transport,
            properties,
            sink,
            endpoint,
            editors,
            editor_name,
            on_complete,
            ..
        } = self;
        debug!(endpoint = %endpoint, ?params, "requesting SCM configuration list");

        let body = match transport.get(&endpoint, &params).await {
            Ok(body) => body,
            Err(e) => {
                warn!(endpoint = %endpoint, error = %e, "SCM configuration list request failed");
                sink.report(&EcscmError::transport(
                    "error loading SCM configuration list",
                    Some(Box::new(e)),
                ));
                return LoadOutcome::Aborted;
            }
        };
        debug!(bytes = body.len(), body = %body, "SCM configuration list response");

        let configs = match catalog.parse_response(&body) {
            Ok(count) => count,
            Err(e) => {
                sink.report(&e);
                return LoadOutcome::Aborted;
            }
        };

        let mut report = LoadReport {
            configs,
            ..LoadReport::default()
        };

        if let Some(editor) = editor_name
            && !catalog.is_empty()
        {
            let lookup = EditorLookupBatch {
                properties: properties.as_ref(),
                sink: sink.as_ref(),
                editors: &editors,
                editor: &editor,
            };
            let (requested, loaded) = lookup.run(catalog).await;
            report.editors_requested = requested;
            report.editors_loaded = loaded;
        }

        info!(
            configs = report.configs,
            editors_requested = report.editors_requested,
            editors_loaded = report.editors_loaded,
            "SCM configuration catalog loaded"
        );

        if let Some(callback) = on_complete {
            callback(catalog);
        }
        LoadOutcome::Complete(report)
    }
}

/// Phase 2: one editor lookup per distinct plugin, joined.
struct EditorLookupBatch<'a> {
    properties: &'a dyn PropertyStore,
    sink: &'a dyn ErrorSink,
    editors: &'a EditorsConfig,
    editor: &'a str,
}

impl EditorLookupBatch<'_> {
    /// Returns (requested, loaded).
    async fn run(&self, catalog: &mut ScmConfigCatalog) -> (usize, usize) {
        let plugins: Vec<String> = catalog.plugins().into_iter().map(str::to_string).collect();

        let lookups = plugins.iter().map(|plugin| {
            let path = self.editors.form_path(plugin, self.editor);
            async move {
                debug!(plugin = %plugin, path = %path, "requesting editor definition");
                let result = self.properties.get_property(&path).await;
                (plugin.as_str(), result)
            }
        });
        let results = join_all(lookups).await;

        let mut loaded = 0;
        for (plugin, result) in results {
            match result {
                Ok(property) => match property.as_ref().and_then(|p| p.non_empty_value()) {
                    Some(xml) => {
                        debug!(plugin, bytes = xml.len(), "editor definition loaded");
                        catalog.set_editor_definition(plugin, xml);
                        loaded += 1;
                    }
                    None => self.sink.report(&EcscmError::EditorNotFound {
                        editor: self.editor.to_string(),
                        plugin: plugin.to_string(),
                    }),
                },
                Err(e) => {
                    warn!(plugin, error = %e, "editor definition request failed");
                    self.sink.report(&e);
                }
            }
        }
        (plugins.len(), loaded)
    }
}
