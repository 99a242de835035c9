// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits the catalog loader and the panels are written against.
//!
//! All traits use `#[async_trait]` so they can be held as `Arc<dyn _>` and
//! swapped for mocks in tests.

pub mod commander;
pub mod property;
pub mod sink;
pub mod transport;

pub use commander::CommanderRpc;
pub use property::PropertyStore;
pub use sink::ErrorSink;
pub use transport::CgiTransport;
