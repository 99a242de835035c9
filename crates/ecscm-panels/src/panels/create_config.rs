// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! New source control configuration panel.
//!
//! The SCM types come from the `scm_types` sheet of the ECSCM plugin project
//! (plugin name to display type). Picking a type pulls that plugin's
//! `createConfig` form. Submitting runs the plugin's `CreateConfiguration`
//! procedure and asks the monitor script once how the job went.

use std::collections::BTreeMap;

use async_trait::async_trait;
use ecscm_catalog::EditorForm;
use ecscm_core::types::{ActualParameter, CredentialParameter, CredentialType, RunProcedureRequest};
use ecscm_core::{CgiParams, EcscmError, JobId};
use tracing::{debug, info, warn};

use crate::context::PanelContext;
use crate::form::{FormRow, FormValues, rows_from_editor, validate_rows};
use crate::panel::{Panel, Submission};

pub const ID: &str = "createConfiguration";
const TITLE: &str = "New Source Control Configuration";
const EDITOR: &str = "createConfig";
const PROCEDURE: &str = "CreateConfiguration";
const SCM_TYPE_ROW: &str = "scmType";

/// Prefix of a successful monitor response.
const MONITOR_SUCCESS: &str = "Success";

struct TypeForm {
    plugin: String,
    rows: Vec<FormRow>,
}

pub struct CreateConfigPanel {
    ctx: PanelContext,
    /// Display type to plugin name.
    types: BTreeMap<String, String>,
    form: Option<TypeForm>,
}

impl CreateConfigPanel {
    pub fn new(ctx: PanelContext) -> Self {
        Self {
            ctx,
            types: BTreeMap::new(),
            form: None,
        }
    }

    /// Display type to plugin name, as loaded.
    pub fn scm_types(&self) -> &BTreeMap<String, String> {
        &self.types
    }

    fn types_path(&self) -> String {
        format!("/plugins/{}/project/scm_types", self.ctx.services.config.cgi.plugin)
    }

    fn selected_plugin(&self, values: &FormValues) -> Option<&str> {
        values
            .non_blank(SCM_TYPE_ROW)
            .and_then(|scm_type| self.types.get(scm_type))
            .map(String::as_str)
    }

    fn form_rows(&self, values: &FormValues) -> &[FormRow] {
        match (&self.form, self.selected_plugin(values)) {
            (Some(form), Some(plugin)) if form.plugin == plugin => &form.rows,
            _ => &[],
        }
    }

    fn no_types(&self) -> EcscmError {
        let err = EcscmError::Application("No SCM types found".to_string());
        self.ctx.sink.report(&err);
        err
    }

    fn build_request(&self, plugin: &str, values: &FormValues) -> RunProcedureRequest {
        let mut actual_parameters = Vec::new();
        let mut credentials = Vec::new();
        for row in self.form_rows(values) {
            if !row.is_credential() {
                actual_parameters.push(ActualParameter::new(row.id.clone(), values.value_for(row)));
                continue;
            }
            let Some(input) = values.credential(&row.id) else {
                continue;
            };
            if input.kind == CredentialType::Key {
                actual_parameters.push(ActualParameter::new(
                    "credentialType",
                    CredentialType::Key.to_string(),
                ));
            }
            credentials.push(CredentialParameter {
                credential_name: row.id.clone(),
                user_name: input.user_name.clone(),
                password: input.password.clone(),
            });
        }

        RunProcedureRequest {
            project_name: format!("/plugins/{plugin}/project"),
            procedure_name: PROCEDURE.to_string(),
            actual_parameters,
            credentials,
        }
    }

    /// Asks the monitor script once for the job's outcome.
    async fn check_job(&self, job: &JobId) -> Result<Submission, EcscmError> {
        let services = &self.ctx.services;
        let mut params = CgiParams::new();
        params.insert("jobId".to_string(), job.to_string());
        if self.ctx.debug_requested() {
            params.insert("debug".to_string(), "1".to_string());
        }

        let body = match services.transport.get(&services.monitor_endpoint(), &params).await {
            Ok(body) => body,
            Err(e) => {
                let err = EcscmError::transport("CGI request failed", Some(Box::new(e)));
                self.ctx.sink.report(&err);
                return Err(err);
            }
        };
        debug!(job = %job, body = %body, "monitor response");

        if body.starts_with(MONITOR_SUCCESS) {
            info!(job = %job, "SCM configuration created");
            return Ok(Submission::Redirect(
                services.links.page(&services.config.cgi.plugin, "configurations"),
            ));
        }

        let details = services.links.url("jobDetails.php", &[("jobId", &job.0)]);
        let err = EcscmError::Application(format!(
            "Error occurred during configuration creation: {} (see job for details: {details})",
            body.trim_end()
        ));
        warn!(job = %job, "configuration creation failed");
        self.ctx.sink.report(&err);
        Err(err)
    }
}

#[async_trait]
impl Panel for CreateConfigPanel {
    fn id(&self) -> &'static str {
        ID
    }

    fn title(&self) -> &'static str {
        TITLE
    }

    async fn load(&mut self) -> Result<(), EcscmError> {
        let path = self.types_path();
        debug!(path = %path, "loading SCM types");
        let sheet = match self.ctx.services.properties.get_property_sheet(&path).await {
            Ok(sheet) => sheet,
            Err(e) if e.is_no_such_property() => return Err(self.no_types()),
            Err(e) => {
                self.ctx.sink.report(&e);
                return Err(e);
            }
        };
        if sheet.is_empty() {
            return Err(self.no_types());
        }

        self.types = sheet
            .properties
            .into_values()
            .filter_map(|p| {
                let scm_type = p.non_empty_value()?.to_string();
                Some((scm_type, p.property_name))
            })
            .collect();
        if self.types.is_empty() {
            return Err(self.no_types());
        }
        debug!(types = self.types.len(), "SCM types loaded");
        Ok(())
    }

    /// Fetches the `createConfig` form of the selected type's plugin.
    async fn refresh(&mut self, values: &FormValues) -> Result<(), EcscmError> {
        let Some(plugin) = self.selected_plugin(values).map(str::to_string) else {
            self.form = None;
            return Ok(());
        };
        if self.form.as_ref().is_some_and(|f| f.plugin == plugin) {
            return Ok(());
        }

        let path = self.ctx.services.form_path(&plugin, EDITOR);
        let fetched = self.ctx.services.properties.get_property(&path).await;
        let rows = fetched.and_then(|property| {
            match property.as_ref().and_then(|p| p.non_empty_value()) {
                Some(xml) => Ok(rows_from_editor(&EditorForm::parse(xml)?)),
                None => Err(EcscmError::EditorNotFound {
                    editor: EDITOR.to_string(),
                    plugin: plugin.clone(),
                }),
            }
        });

        match rows {
            Ok(rows) => {
                self.form = Some(TypeForm { plugin, rows });
                Ok(())
            }
            Err(e) => {
                self.form = None;
                self.ctx.sink.report(&e);
                Err(e)
            }
        }
    }

    fn rows(&self, values: &FormValues) -> Vec<FormRow> {
        let mut options = vec![String::new()];
        options.extend(self.types.keys().cloned());
        let mut rows = vec![FormRow::select(SCM_TYPE_ROW, "SCM Type:", true, options)];
        rows.extend(self.form_rows(values).iter().cloned());
        rows
    }

    fn validate(&self, values: &FormValues) -> Result<(), EcscmError> {
        validate_rows(&self.rows(values), values)
    }

    async fn submit(&mut self, values: &FormValues) -> Result<Submission, EcscmError> {
        self.refresh(values).await?;
        self.validate(values)?;
        let plugin = self
            .selected_plugin(values)
            .ok_or_else(|| EcscmError::Validation("SCM Type is required".to_string()))?
            .to_string();

        let request = self.build_request(&plugin, values);
        debug!(?request, "running configuration procedure");
        let job = match self.ctx.services.commander.run_procedure(&request).await {
            Ok(job) => job,
            Err(e) => {
                self.ctx.sink.report(&e);
                return Err(e);
            }
        };
        debug!(job = %job, "configuration procedure started");

        self.check_job(&job).await
    }
}
