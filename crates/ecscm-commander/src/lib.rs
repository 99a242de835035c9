// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `reqwest` implementation of the ECSCM server collaborators.
//!
//! One [`CommanderClient`] serves as [`CgiTransport`](ecscm_core::CgiTransport),
//! [`PropertyStore`](ecscm_core::PropertyStore) and
//! [`CommanderRpc`](ecscm_core::CommanderRpc).

pub mod client;
pub mod types;

pub use client::CommanderClient;
