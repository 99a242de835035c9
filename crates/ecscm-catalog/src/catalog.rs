// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory catalog of SCM configurations and per-plugin editor forms.
//!
//! Configurations are keyed by name and iterate in name order. Editor
//! definitions are keyed by plugin; a plugin without an entry simply has not
//! been loaded yet.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use ecscm_core::{ConfigEntry, EcscmError};
use tracing::debug;

use crate::wire::ConfigListResponse;

/// Result of resolving a configuration name to its editor definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorLookup<'a> {
    /// The configuration name is not in the catalog.
    UnknownConfig,
    /// The configuration exists but its plugin's editor has not been loaded.
    NotLoaded { plugin: &'a str },
    /// The editor form XML.
    Loaded(&'a str),
}

impl<'a> EditorLookup<'a> {
    pub fn definition(self) -> Option<&'a str> {
        match self {
            EditorLookup::Loaded(xml) => Some(xml),
            _ => None,
        }
    }
}

/// The SCM configurations known to one panel, plus the editor forms of the
/// plugins they belong to.
#[derive(Debug, Clone, Default)]
pub struct ScmConfigCatalog {
    configs: BTreeMap<String, ConfigEntry>,
    editors: HashMap<String, String>,
}

impl ScmConfigCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the configuration called `name`.
    pub fn add_config(
        &mut self,
        name: impl Into<String>,
        plugin: impl Into<String>,
        description: impl Into<String>,
    ) {
        let name = name.into();
        self.configs.insert(
            name.clone(),
            ConfigEntry {
                name,
                plugin: plugin.into(),
                description: description.into(),
            },
        );
    }

    /// Parse an enumeration response and add every configuration it lists.
    ///
    /// A non-blank `<error>` comes back as [`EcscmError::Application`] with the
    /// server's message unchanged. Nothing is inserted unless the whole
    /// document decodes and carries no error. Returns the number of entries
    /// read (zero is a success).
    pub fn parse_response(&mut self, body: &str) -> Result<usize, EcscmError> {
        let response = ConfigListResponse::decode(body)?;
        if let Some(error) = response.error_message() {
            return Err(EcscmError::Application(error.to_string()));
        }

        let entries = response.into_entries();
        let count = entries.len();
        for entry in entries {
            self.configs.insert(entry.name.clone(), entry);
        }
        debug!(count, total = self.configs.len(), "parsed SCM configuration list");
        Ok(count)
    }

    pub fn get(&self, name: &str) -> Option<&ConfigEntry> {
        self.configs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.configs.contains_key(name)
    }

    /// The plugin owning `name`.
    pub fn config_plugin(&self, name: &str) -> Result<&str, EcscmError> {
        self.require(name).map(|entry| entry.plugin.as_str())
    }

    /// The description of `name`.
    pub fn config_description(&self, name: &str) -> Result<&str, EcscmError> {
        self.require(name).map(|entry| entry.description.as_str())
    }

    fn require(&self, name: &str) -> Result<&ConfigEntry, EcscmError> {
        self.configs.get(name).ok_or_else(|| EcscmError::ConfigNotFound {
            name: name.to_string(),
        })
    }

    /// Editor form XML for the plugin behind configuration `name`.
    ///
    /// `None` both when `name` is unknown and when the plugin's editor has
    /// not been loaded; use [`editor_lookup`](Self::editor_lookup) to tell
    /// the two apart.
    pub fn editor_definition(&self, name: &str) -> Option<&str> {
        self.editor_lookup(name).definition()
    }

    pub fn editor_lookup(&self, name: &str) -> EditorLookup<'_> {
        let Some(entry) = self.configs.get(name) else {
            return EditorLookup::UnknownConfig;
        };
        match self.editors.get(&entry.plugin) {
            Some(xml) => EditorLookup::Loaded(xml),
            None => EditorLookup::NotLoaded {
                plugin: &entry.plugin,
            },
        }
    }

    /// Store (or replace) the editor form for `plugin`.
    pub fn set_editor_definition(&mut self, plugin: impl Into<String>, xml: impl Into<String>) {
        self.editors.insert(plugin.into(), xml.into());
    }

    pub fn has_editor_definition(&self, plugin: &str) -> bool {
        self.editors.contains_key(plugin)
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Configuration names in sorted order.
    pub fn config_names(&self) -> impl Iterator<Item = &str> {
        self.configs.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ConfigEntry> {
        self.configs.values()
    }

    /// Distinct plugins referenced by the catalog, sorted.
    pub fn plugins(&self) -> BTreeSet<&str> {
        self.configs.values().map(|e| e.plugin.as_str()).collect()
    }
}
