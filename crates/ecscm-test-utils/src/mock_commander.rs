// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory property store and RPC surface.
//!
//! `MockCommander` implements both [`PropertyStore`] and [`CommanderRpc`].
//! Properties live in a path-keyed map; a sheet is every property one level
//! below the sheet path. Every call is recorded, and reads can be delayed or
//! failed per path to exercise out-of-order completion and error handling.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use ecscm_core::error::NO_SUCH_PROPERTY;
use ecscm_core::types::{CreateScheduleRequest, CreateStepRequest, RunProcedureRequest};
use ecscm_core::{CommanderRpc, EcscmError, JobId, Property, PropertySheet, PropertyStore};

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetProperty(String),
    GetPropertySheet(String),
    SetProperty { path: String, value: String },
    CreateSchedule(CreateScheduleRequest),
    CreateStep(CreateStepRequest),
    RunProcedure(RunProcedureRequest),
}

#[derive(Debug, Clone)]
enum Failure {
    Server(String),
    Transport,
}

/// A mock server backing the property store and RPC traits.
#[derive(Debug)]
pub struct MockCommander {
    properties: Mutex<BTreeMap<String, String>>,
    delays: HashMap<String, Duration>,
    failures: HashMap<String, Failure>,
    failing_operations: HashSet<&'static str>,
    job_id: String,
    calls: Mutex<Vec<Call>>,
    completed: Mutex<Vec<String>>,
}

impl Default for MockCommander {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCommander {
    /// Create an empty mock server.
    pub fn new() -> Self {
        Self {
            properties: Mutex::new(BTreeMap::new()),
            delays: HashMap::new(),
            failures: HashMap::new(),
            failing_operations: HashSet::new(),
            job_id: "job-1".to_string(),
            calls: Mutex::new(Vec::new()),
            completed: Mutex::new(Vec::new()),
        }
    }

    /// Seed the property at `path`.
    pub fn with_property(mut self, path: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.get_mut().insert(path.into(), value.into());
        self
    }

    /// Sleep for `delay` before answering reads of `path`.
    pub fn with_delay(mut self, path: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(path.into(), delay);
        self
    }

    /// Answer reads of `path` with a server error carrying `code`.
    pub fn with_server_error(mut self, path: impl Into<String>, code: impl Into<String>) -> Self {
        self.failures.insert(path.into(), Failure::Server(code.into()));
        self
    }

    /// Answer reads of `path` with a transport error.
    pub fn with_transport_error(mut self, path: impl Into<String>) -> Self {
        self.failures.insert(path.into(), Failure::Transport);
        self
    }

    /// Fail one RPC: `create_schedule`, `create_step`, `run_procedure` or
    /// `set_property`.
    pub fn with_failing_operation(mut self, operation: &'static str) -> Self {
        self.failing_operations.insert(operation);
        self
    }

    /// Job id returned by `run_procedure`.
    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = job_id.into();
        self
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    /// Paths of reads, in the order their responses were produced.
    pub async fn completion_order(&self) -> Vec<String> {
        self.completed.lock().await.clone()
    }

    /// Number of recorded `get_property` calls.
    pub async fn property_reads(&self) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| matches!(c, Call::GetProperty(_)))
            .count()
    }

    pub async fn property(&self, path: &str) -> Option<String> {
        self.properties.lock().await.get(path).cloned()
    }

    async fn record(&self, call: Call) {
        self.calls.lock().await.push(call);
    }

    async fn read_gate(&self, path: &str) -> Result<(), EcscmError> {
        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        }
        self.completed.lock().await.push(path.to_string());
        match self.failures.get(path) {
            Some(Failure::Server(code)) => Err(EcscmError::Server {
                code: code.clone(),
                message: format!("property '{path}' could not be read"),
            }),
            Some(Failure::Transport) => Err(EcscmError::transport(
                format!("connection reset while reading '{path}'"),
                None,
            )),
            None => Ok(()),
        }
    }

    fn operation_gate(&self, operation: &'static str) -> Result<(), EcscmError> {
        if self.failing_operations.contains(operation) {
            return Err(EcscmError::Server {
                code: "InvalidRequest".to_string(),
                message: format!("{operation} rejected"),
            });
        }
        Ok(())
    }
}

fn property_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[async_trait]
impl PropertyStore for MockCommander {
    async fn get_property(&self, path: &str) -> Result<Option<Property>, EcscmError> {
        self.record(Call::GetProperty(path.to_string())).await;
        self.read_gate(path).await?;
        Ok(self
            .properties
            .lock()
            .await
            .get(path)
            .map(|value| Property::new(property_name(path), value.clone())))
    }

    async fn get_property_sheet(&self, path: &str) -> Result<PropertySheet, EcscmError> {
        self.record(Call::GetPropertySheet(path.to_string())).await;
        self.read_gate(path).await?;

        let prefix = format!("{}/", path.trim_end_matches('/'));
        let properties = self.properties.lock().await;
        let children: Vec<Property> = properties
            .iter()
            .filter_map(|(key, value)| {
                let name = key.strip_prefix(&prefix)?;
                (!name.contains('/')).then(|| Property::new(name, value.clone()))
            })
            .collect();

        if children.is_empty() && !properties.keys().any(|k| k.starts_with(&prefix)) {
            return Err(EcscmError::Server {
                code: NO_SUCH_PROPERTY.to_string(),
                message: format!("property sheet '{path}' does not exist"),
            });
        }
        Ok(children.into_iter().collect())
    }

    async fn set_property(&self, path: &str, value: &str) -> Result<(), EcscmError> {
        self.record(Call::SetProperty {
            path: path.to_string(),
            value: value.to_string(),
        })
        .await;
        self.operation_gate("set_property")?;
        self.properties
            .lock()
            .await
            .insert(path.to_string(), value.to_string());
        Ok(())
    }
}

#[async_trait]
impl CommanderRpc for MockCommander {
    async fn create_schedule(&self, request: &CreateScheduleRequest) -> Result<(), EcscmError> {
        self.record(Call::CreateSchedule(request.clone())).await;
        self.operation_gate("create_schedule")
    }

    async fn create_step(&self, request: &CreateStepRequest) -> Result<(), EcscmError> {
        self.record(Call::CreateStep(request.clone())).await;
        self.operation_gate("create_step")
    }

    async fn run_procedure(&self, request: &RunProcedureRequest) -> Result<JobId, EcscmError> {
        self.record(Call::RunProcedure(request.clone())).await;
        self.operation_gate("run_procedure")?;
        Ok(JobId(self.job_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sheet_lists_direct_children_only() {
        let mock = MockCommander::new()
            .with_property("/plugins/ECSCM/project/scm_types/ECSCM-Git", "Git")
            .with_property("/plugins/ECSCM/project/scm_types/ECSCM-P4", "Perforce")
            .with_property("/plugins/ECSCM/project/scm_types/nested/deep", "x");

        let sheet = mock
            .get_property_sheet("/plugins/ECSCM/project/scm_types")
            .await
            .unwrap();
        assert_eq!(sheet.properties.len(), 2);
        assert_eq!(sheet.get("ECSCM-Git").unwrap().value.as_deref(), Some("Git"));
    }

    #[tokio::test]
    async fn missing_sheet_is_no_such_property() {
        let err = MockCommander::new()
            .get_property_sheet("/nowhere")
            .await
            .unwrap_err();
        assert!(err.is_no_such_property());
    }

    #[tokio::test]
    async fn missing_property_is_none() {
        let mock = MockCommander::new();
        assert_eq!(mock.get_property("/a/b").await.unwrap(), None);
        assert_eq!(mock.calls().await, vec![Call::GetProperty("/a/b".into())]);
    }

    #[tokio::test]
    async fn failing_operation_is_recorded_then_rejected() {
        let mock = MockCommander::new().with_failing_operation("create_step");
        let request = CreateStepRequest {
            project_name: "p".into(),
            procedure_name: "proc".into(),
            step_name: "s".into(),
            subproject: "/plugins/x/project".into(),
            subprocedure: "Preflight".into(),
            actual_parameters: Vec::new(),
        };
        assert!(mock.create_step(&request).await.is_err());
        assert_eq!(mock.calls().await.len(), 1);
    }
}
