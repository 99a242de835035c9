// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Panel registry.
//!
//! The `PanelRegistry` maps panel identifiers to factories. It is built once
//! at startup and handed to whatever routes requests to panels; an unknown
//! identifier is an error rather than a fallback to some default panel.

use std::collections::HashMap;

use ecscm_core::EcscmError;
use tracing::debug;

use crate::context::PanelContext;
use crate::panel::Panel;
use crate::panels::{
    CiCheckoutPanel, CreateConfigPanel, PreflightPanel, SentryPanel, ci_checkout, create_config,
    preflight, sentry,
};

/// Creates one kind of panel.
pub trait PanelFactory: Send + Sync {
    /// Identifier the panel is registered under.
    fn id(&self) -> &'static str;

    fn create(&self, ctx: PanelContext) -> Result<Box<dyn Panel>, EcscmError>;
}

struct SentryFactory;

impl PanelFactory for SentryFactory {
    fn id(&self) -> &'static str {
        sentry::ID
    }

    fn create(&self, ctx: PanelContext) -> Result<Box<dyn Panel>, EcscmError> {
        Ok(Box::new(SentryPanel::new(ctx)?))
    }
}

struct PreflightFactory;

impl PanelFactory for PreflightFactory {
    fn id(&self) -> &'static str {
        preflight::ID
    }

    fn create(&self, ctx: PanelContext) -> Result<Box<dyn Panel>, EcscmError> {
        Ok(Box::new(PreflightPanel::new(ctx)?))
    }
}

struct CreateConfigFactory;

impl PanelFactory for CreateConfigFactory {
    fn id(&self) -> &'static str {
        create_config::ID
    }

    fn create(&self, ctx: PanelContext) -> Result<Box<dyn Panel>, EcscmError> {
        Ok(Box::new(CreateConfigPanel::new(ctx)))
    }
}

struct CiCheckoutFactory;

impl PanelFactory for CiCheckoutFactory {
    fn id(&self) -> &'static str {
        ci_checkout::ID
    }

    fn create(&self, ctx: PanelContext) -> Result<Box<dyn Panel>, EcscmError> {
        Ok(Box::new(CiCheckoutPanel::new(ctx)))
    }
}

/// Registry of panel factories keyed by identifier.
pub struct PanelRegistry {
    factories: HashMap<&'static str, Box<dyn PanelFactory>>,
}

impl PanelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A registry holding every built-in panel.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SentryFactory));
        registry.register(Box::new(PreflightFactory));
        registry.register(Box::new(CreateConfigFactory));
        registry.register(Box::new(CiCheckoutFactory));
        registry
    }

    /// Register `factory`, replacing any factory with the same id.
    pub fn register(&mut self, factory: Box<dyn PanelFactory>) {
        self.factories.insert(factory.id(), factory);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Registered identifiers, sorted.
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = self.factories.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Build the panel registered as `id`.
    pub fn create(&self, id: &str, ctx: PanelContext) -> Result<Box<dyn Panel>, EcscmError> {
        let factory = self.factories.get(id).ok_or_else(|| {
            EcscmError::Validation(format!(
                "unknown panel '{id}' (available: {})",
                self.ids().join(", ")
            ))
        })?;
        debug!(panel = id, "creating panel");
        factory.create(ctx)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for PanelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PanelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}
