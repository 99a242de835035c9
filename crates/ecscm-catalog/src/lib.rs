// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SCM configuration catalog and its loader.
//!
//! [`ScmConfigCatalog`] holds the configurations returned by the ECSCM
//! enumeration CGI and the per-plugin editor forms. [`ScmConfigLoader`] fills
//! it in two phases: one list request, then a concurrent batch of editor
//! lookups (one per distinct plugin) joined before completion.

pub mod catalog;
pub mod editor;
pub mod loader;
pub mod wire;

pub use catalog::{EditorLookup, ScmConfigCatalog};
pub use editor::{EditorForm, FieldKind, FormElement};
pub use loader::{LoadOutcome, LoadReport, ScmConfigLoader};
