// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hierarchical key-path property store.

use async_trait::async_trait;

use crate::error::EcscmError;
use crate::types::{Property, PropertySheet};

/// Reads and writes string properties at paths such as
/// `/plugins/ECSCM-Git/project/scm_form/sentry`.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// Fetches one property without expanding `$[...]` references.
    ///
    /// Returns `Ok(None)` when the path does not exist.
    async fn get_property(&self, path: &str) -> Result<Option<Property>, EcscmError>;

    /// Lists the properties directly under the sheet at `path`.
    async fn get_property_sheet(&self, path: &str) -> Result<PropertySheet, EcscmError>;

    /// Creates or overwrites the property at `path`.
    async fn set_property(&self, path: &str, value: &str) -> Result<(), EcscmError>;
}
