// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for ECSCM integration tests.
//!
//! Provides in-memory stand-ins for the server collaborators so loader and
//! panel tests run without a live server.
//!
//! # Components
//!
//! - [`FakeCgiTransport`] - CGI transport with scripted bodies and a request log
//! - [`MockCommander`] - property store plus RPC surface backed by a map
//! - [`fixtures`] - canned enumeration responses and editor forms

pub mod fake_transport;
pub mod fixtures;
pub mod mock_commander;

pub use fake_transport::FakeCgiTransport;
pub use mock_commander::{Call, MockCommander};
