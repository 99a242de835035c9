// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in panels.

pub mod ci_checkout;
pub mod create_config;
pub mod preflight;
pub mod sentry;

pub use ci_checkout::CiCheckoutPanel;
pub use create_config::CreateConfigPanel;
pub use preflight::PreflightPanel;
pub use sentry::SentryPanel;
