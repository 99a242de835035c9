// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CGI request transport.

use async_trait::async_trait;

use crate::error::EcscmError;
use crate::types::{CgiEndpoint, CgiParams};

/// Issues GET-style requests against CGI scripts hosted by server plugins.
#[async_trait]
pub trait CgiTransport: Send + Sync {
    /// Sends `params` as the query string of a GET to `endpoint` and returns
    /// the raw response body.
    ///
    /// Any failure to reach the script or read its body is a
    /// [`EcscmError::Transport`].
    async fn get(&self, endpoint: &CgiEndpoint, params: &CgiParams) -> Result<String, EcscmError>;
}
