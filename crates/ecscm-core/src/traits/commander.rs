// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Object-creation and procedure RPCs used by the panels.

use async_trait::async_trait;

use crate::error::EcscmError;
use crate::types::{CreateScheduleRequest, CreateStepRequest, JobId, RunProcedureRequest};

/// The subset of the server's object-management API the panels call.
#[async_trait]
pub trait CommanderRpc: Send + Sync {
    async fn create_schedule(&self, request: &CreateScheduleRequest) -> Result<(), EcscmError>;

    async fn create_step(&self, request: &CreateStepRequest) -> Result<(), EcscmError>;

    /// Starts a procedure and returns the id of the launched job.
    async fn run_procedure(&self, request: &RunProcedureRequest) -> Result<JobId, EcscmError>;
}
