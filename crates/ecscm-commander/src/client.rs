// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the orchestration server.
//!
//! [`CommanderClient`] implements every collaborator trait the catalog and
//! the panels need: CGI GETs against plugin scripts, the property store and
//! the object-creation RPCs of the REST facade.

use std::time::Duration;

use async_trait::async_trait;
use ecscm_config::model::ServerConfig;
use ecscm_core::types::{CreateScheduleRequest, CreateStepRequest, RunProcedureRequest};
use ecscm_core::{
    CgiEndpoint, CgiParams, CgiTransport, CommanderRpc, EcscmError, JobId, Property,
    PropertySheet, PropertyStore,
};
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::types::{
    ApiErrorResponse, JobEnvelope, PropertyEnvelope, PropertySheetEnvelope, SetPropertyBody,
};

/// Prefix of every REST resource.
const REST_PREFIX: [&str; 2] = ["rest", "v1.0"];

/// HTTP client for one server.
#[derive(Debug, Clone)]
pub struct CommanderClient {
    client: reqwest::Client,
    base_url: Url,
    credentials: Option<(String, Option<String>)>,
}

impl CommanderClient {
    /// Builds a client from the `[server]` settings.
    pub fn new(config: &ServerConfig) -> Result<Self, EcscmError> {
        let base_url = Url::parse(&config.url)
            .map_err(|e| EcscmError::Config(format!("invalid server url '{}': {e}", config.url)))?;
        if base_url.cannot_be_a_base() {
            return Err(EcscmError::Config(format!(
                "server url '{}' cannot be used as a base",
                config.url
            )));
        }

        let mut headers = HeaderMap::new();
        if let Some(session) = &config.session_id {
            headers.insert(
                COOKIE,
                HeaderValue::from_str(&format!("sessionId={session}")).map_err(|e| {
                    EcscmError::Config(format!("invalid session id header value: {e}"))
                })?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| EcscmError::transport("failed to build HTTP client", Some(Box::new(e))))?;

        Ok(Self {
            client,
            base_url,
            credentials: config
                .user
                .clone()
                .map(|user| (user, config.password.clone())),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `<base>/commander/plugins/<plugin>/cgi-bin/<script>?<params>`
    pub fn cgi_url(&self, endpoint: &CgiEndpoint, params: &CgiParams) -> Result<Url, EcscmError> {
        let mut url = self.url_with(&[
            "commander",
            "plugins",
            &endpoint.plugin,
            "cgi-bin",
            &endpoint.script,
        ])?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        Ok(url)
    }

    /// `<base>/rest/v1.0/<segments...>`
    fn rest_url(&self, segments: &[&str]) -> Result<Url, EcscmError> {
        let mut all: Vec<&str> = REST_PREFIX.to_vec();
        all.extend_from_slice(segments);
        self.url_with(&all)
    }

    /// REST url of the property at `path`, one url segment per path element.
    pub fn property_url(&self, path: &str) -> Result<Url, EcscmError> {
        let mut segments = vec!["properties"];
        segments.extend(path.split('/').filter(|s| !s.is_empty()));
        self.rest_url(&segments)
    }

    fn url_with(&self, segments: &[&str]) -> Result<Url, EcscmError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| EcscmError::Config(format!("server url '{}' cannot be used as a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some((user, password)) => request.basic_auth(user, password.as_deref()),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, EcscmError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| EcscmError::transport("HTTP request failed", Some(Box::new(e))))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, body = %body, "server returned an error");
        match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_err) => Err(api_err.error.into()),
            Err(_) => Err(EcscmError::transport(
                format!("server returned {status}: {body}"),
                None,
            )),
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, EcscmError> {
        let body = response.text().await.map_err(|e| {
            EcscmError::transport("failed to read response body", Some(Box::new(e)))
        })?;
        serde_json::from_str(&body).map_err(|e| EcscmError::Parse {
            what: what.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl CgiTransport for CommanderClient {
    async fn get(&self, endpoint: &CgiEndpoint, params: &CgiParams) -> Result<String, EcscmError> {
        let url = self.cgi_url(endpoint, params)?;
        debug!(%url, "CGI request");

        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(|e| EcscmError::transport("HTTP request failed", Some(Box::new(e))))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            EcscmError::transport("failed to read response body", Some(Box::new(e)))
        })?;
        debug!(status = %status, bytes = body.len(), "CGI response");

        if !status.is_success() {
            return Err(EcscmError::transport(
                format!("{endpoint} returned {status}"),
                None,
            ));
        }
        Ok(body)
    }
}

#[async_trait]
impl PropertyStore for CommanderClient {
    async fn get_property(&self, path: &str) -> Result<Option<Property>, EcscmError> {
        let mut url = self.property_url(path)?;
        url.query_pairs_mut().append_pair("expand", "0");
        debug!(path, "getProperty");

        match self.send(self.client.get(url)).await {
            Ok(response) => {
                let envelope: PropertyEnvelope = Self::read_json(response, "property").await?;
                Ok(Some(envelope.property))
            }
            Err(e) if e.is_no_such_property() => {
                debug!(path, "property does not exist");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn get_property_sheet(&self, path: &str) -> Result<PropertySheet, EcscmError> {
        let mut url = self.rest_url(&["properties"])?;
        url.query_pairs_mut().append_pair("path", path);
        debug!(path, "getProperties");

        let response = self.send(self.client.get(url)).await?;
        let envelope: PropertySheetEnvelope = Self::read_json(response, "property sheet").await?;
        Ok(envelope.into())
    }

    async fn set_property(&self, path: &str, value: &str) -> Result<(), EcscmError> {
        let url = self.property_url(path)?;
        debug!(path, "setProperty");

        self.send(self.client.put(url).json(&SetPropertyBody { value }))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CommanderRpc for CommanderClient {
    async fn create_schedule(&self, request: &CreateScheduleRequest) -> Result<(), EcscmError> {
        let url = self.rest_url(&["projects", &request.project_name, "schedules"])?;
        debug!(project = %request.project_name, schedule = %request.schedule_name, "createSchedule");

        self.send(self.client.post(url).json(request)).await?;
        Ok(())
    }

    async fn create_step(&self, request: &CreateStepRequest) -> Result<(), EcscmError> {
        let url = self.rest_url(&[
            "projects",
            &request.project_name,
            "procedures",
            &request.procedure_name,
            "steps",
        ])?;
        debug!(
            project = %request.project_name,
            procedure = %request.procedure_name,
            step = %request.step_name,
            "createStep"
        );

        self.send(self.client.post(url).json(request)).await?;
        Ok(())
    }

    async fn run_procedure(&self, request: &RunProcedureRequest) -> Result<JobId, EcscmError> {
        let mut url = self.rest_url(&["jobs"])?;
        url.query_pairs_mut().append_pair("request", "runProcedure");
        debug!(project = %request.project_name, procedure = %request.procedure_name, "runProcedure");

        let response = self.send(self.client.post(url).json(request)).await?;
        let envelope: JobEnvelope = Self::read_json(response, "runProcedure response").await?;
        Ok(JobId(envelope.job_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> CommanderClient {
        CommanderClient::new(&ServerConfig {
            url: url.to_string(),
            ..ServerConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn cgi_url_layout() {
        let mut params = CgiParams::new();
        params.insert("cmd".into(), "getImplementingCfgs".into());
        params.insert("method".into(), "getSCMTag".into());

        let url = client("https://commander:8443")
            .cgi_url(&CgiEndpoint::new("ECSCM", "ecscm.cgi"), &params)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://commander:8443/commander/plugins/ECSCM/cgi-bin/ecscm.cgi?cmd=getImplementingCfgs&method=getSCMTag"
        );
    }

    #[test]
    fn property_url_encodes_each_segment() {
        let url = client("https://commander:8443/")
            .property_url("/projects/My Project/schedules/nightly/ec_customEditorData/formType")
            .unwrap();
        assert_eq!(
            url.path(),
            "/rest/v1.0/properties/projects/My%20Project/schedules/nightly/ec_customEditorData/formType"
        );
    }

    #[test]
    fn invalid_server_url_is_config_error() {
        let err = CommanderClient::new(&ServerConfig {
            url: "not a url".into(),
            ..ServerConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, EcscmError::Config(_)));
    }
}
