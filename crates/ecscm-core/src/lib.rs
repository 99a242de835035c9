// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the ECSCM client toolkit.
//!
//! This crate provides the collaborator traits (CGI transport, property
//! store, server RPC, error sink), the shared error type and the wire types
//! used throughout the workspace. The catalog, the HTTP client and the panels
//! all depend on it; nothing here performs I/O.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::EcscmError;
pub use traits::sink::{CollectingErrorSink, TracingErrorSink};
pub use traits::{CgiTransport, CommanderRpc, ErrorSink, PropertyStore};
pub use types::{CgiEndpoint, CgiParams, ConfigEntry, JobId, Property, PropertySheet};
