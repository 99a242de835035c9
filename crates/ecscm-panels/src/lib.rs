// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Headless SCM panels.
//!
//! Each panel is a form driven by the caller: load it, render its rows,
//! validate the values the user entered and submit them. Submitting talks to
//! the server through the collaborators in [`PanelServices`] and returns a
//! [`Submission`] telling the caller where to go next.

pub mod context;
pub mod form;
pub mod links;
pub mod panel;
pub mod panels;
pub mod registry;

pub use context::{ObjectContext, PanelContext, PanelServices};
pub use form::{CredentialInput, FormRow, FormValues};
pub use links::LinkBuilder;
pub use panel::{Panel, Submission};
pub use registry::{PanelFactory, PanelRegistry};
