// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted CGI transport for deterministic testing.
//!
//! Responses are matched on the script name plus the exact parameter set.
//! A script-wide fallback answers any parameters. Unmatched requests fail
//! with a transport error so tests notice unexpected calls.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use ecscm_core::{CgiEndpoint, CgiParams, CgiTransport, EcscmError};

#[derive(Debug, Clone)]
enum Scripted {
    Body(String),
    Fail(String),
}

/// A CGI transport that replays pre-configured bodies.
#[derive(Debug, Default)]
pub struct FakeCgiTransport {
    exact: HashMap<(String, CgiParams), Scripted>,
    fallback: HashMap<String, Scripted>,
    delay: Option<Duration>,
    requests: Mutex<Vec<(CgiEndpoint, CgiParams)>>,
}

fn to_params(params: &[(&str, &str)]) -> CgiParams {
    params
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl FakeCgiTransport {
    /// Create a transport with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `script` called with exactly `params` with `body`.
    pub fn respond(mut self, script: &str, params: &[(&str, &str)], body: impl Into<String>) -> Self {
        self.exact
            .insert((script.to_string(), to_params(params)), Scripted::Body(body.into()));
        self
    }

    /// Answer any call to `script` with `body`.
    pub fn respond_any(mut self, script: &str, body: impl Into<String>) -> Self {
        self.fallback
            .insert(script.to_string(), Scripted::Body(body.into()));
        self
    }

    /// Fail any call to `script` with a transport error carrying `message`.
    pub fn fail_any(mut self, script: &str, message: impl Into<String>) -> Self {
        self.fallback
            .insert(script.to_string(), Scripted::Fail(message.into()));
        self
    }

    /// Sleep before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every request received so far, in order.
    pub async fn requests(&self) -> Vec<(CgiEndpoint, CgiParams)> {
        self.requests.lock().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl CgiTransport for FakeCgiTransport {
    async fn get(&self, endpoint: &CgiEndpoint, params: &CgiParams) -> Result<String, EcscmError> {
        self.requests
            .lock()
            .await
            .push((endpoint.clone(), params.clone()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self
            .exact
            .get(&(endpoint.script.clone(), params.clone()))
            .or_else(|| self.fallback.get(&endpoint.script));

        match scripted {
            Some(Scripted::Body(body)) => Ok(body.clone()),
            Some(Scripted::Fail(message)) => Err(EcscmError::transport(message.clone(), None)),
            None => {
                tracing::warn!(%endpoint, ?params, "unscripted CGI request");
                Err(EcscmError::transport(
                    format!("no scripted response for {endpoint} {params:?}"),
                    None,
                ))
            }
        }
    }
}
