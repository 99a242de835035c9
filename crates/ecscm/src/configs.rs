// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ecscm configs` command implementation.
//!
//! Runs the catalog loader once and prints what it found, plus whatever the
//! loader reported along the way.

use std::io::IsTerminal;
use std::sync::Arc;

use ecscm_catalog::{LoadOutcome, ScmConfigCatalog};
use ecscm_core::{CollectingErrorSink, EcscmError};
use ecscm_panels::PanelServices;
use serde::Serialize;

/// One configuration in the output.
#[derive(Debug, Serialize)]
pub struct ConfigRow {
    pub name: String,
    pub plugin: String,
    pub description: String,
    /// Whether the requested editor was loaded for this configuration's plugin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor_loaded: Option<bool>,
}

/// Structured output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct ConfigsResponse {
    pub complete: bool,
    pub configs: Vec<ConfigRow>,
    pub errors: Vec<String>,
}

/// Load the catalog with the given filter and editor.
pub async fn collect(
    services: &PanelServices,
    method: Option<String>,
    editor: Option<String>,
) -> ConfigsResponse {
    let sink = Arc::new(CollectingErrorSink::new());
    let mut loader = services.loader(sink.clone());
    if let Some(method) = method {
        loader = loader.implementing(method);
    }
    let with_editor = editor.is_some();
    if let Some(editor) = editor {
        loader = loader.with_editor(editor);
    }

    let mut catalog = ScmConfigCatalog::new();
    let outcome = loader.load(&mut catalog).await;

    let configs = catalog
        .entries()
        .map(|entry| ConfigRow {
            name: entry.name.clone(),
            plugin: entry.plugin.clone(),
            description: entry.description.clone(),
            editor_loaded: with_editor.then(|| catalog.has_editor_definition(&entry.plugin)),
        })
        .collect();

    ConfigsResponse {
        complete: matches!(outcome, LoadOutcome::Complete(_)),
        configs,
        errors: sink.messages(),
    }
}

/// Run the `ecscm configs` command.
///
/// An aborted load is an error; problems during editor lookups are printed
/// as warnings.
pub async fn run_configs(
    services: &PanelServices,
    method: Option<String>,
    editor: Option<String>,
    json: bool,
    plain: bool,
) -> Result<(), EcscmError> {
    let response = collect(services, method, editor).await;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&response).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print!("{}", render(&response, use_color));
    }

    if response.complete {
        Ok(())
    } else {
        Err(EcscmError::Application(
            "SCM configurations could not be loaded".to_string(),
        ))
    }
}

/// Human-readable table of `response`.
pub fn render(response: &ConfigsResponse, use_color: bool) -> String {
    use colored::Colorize;

    let mut out = String::new();
    if response.configs.is_empty() && response.complete {
        out.push_str("  no SCM configurations\n");
    }

    let name_width = response
        .configs
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(0)
        .max("NAME".len());
    let plugin_width = response
        .configs
        .iter()
        .map(|c| c.plugin.len())
        .max()
        .unwrap_or(0)
        .max("PLUGIN".len());

    if !response.configs.is_empty() {
        let header = format!("  {:name_width$}  {:plugin_width$}  DESCRIPTION", "NAME", "PLUGIN");
        if use_color {
            out.push_str(&format!("{}\n", header.bold()));
        } else {
            out.push_str(&format!("{header}\n"));
        }
    }

    for config in &response.configs {
        let marker = match (config.editor_loaded, use_color) {
            (None, _) => String::new(),
            (Some(true), true) => format!(" {}", "✓".green()),
            (Some(false), true) => format!(" {}", "✗".red()),
            (Some(true), false) => " [editor]".to_string(),
            (Some(false), false) => " [no editor]".to_string(),
        };
        out.push_str(&format!(
            "  {:name_width$}  {:plugin_width$}  {}{marker}\n",
            config.name, config.plugin, config.description
        ));
    }

    for error in &response.errors {
        if use_color {
            out.push_str(&format!("  {} {error}\n", "!".yellow()));
        } else {
            out.push_str(&format!("  [WARN] {error}\n"));
        }
    }
    out
}
