// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extract-preflight-sources step panel.

use async_trait::async_trait;
use ecscm_catalog::{EditorForm, EditorLookup, ScmConfigCatalog};
use ecscm_core::EcscmError;
use ecscm_core::types::{ActualParameter, CreateStepRequest};
use tracing::{debug, info, warn};

use crate::context::PanelContext;
use crate::form::{FormRow, FormValues, rows_from_editor, validate_rows};
use crate::panel::{Panel, SCM_CONFIG_ROW, Submission, config_row, loaded, selected_config};

pub const ID: &str = "preflightStep";
const TITLE: &str = "New Extract Preflight Sources Step";
const IMPLEMENTED_METHOD: &str = "apf_driver";
const EDITOR: &str = "preflight";
const SUBPROCEDURE: &str = "Preflight";

const STEP_NAME_ROW: &str = "stepName";

/// Editor rows parsed for one configuration.
struct EditorRows {
    config: String,
    rows: Vec<FormRow>,
}

pub struct PreflightPanel {
    ctx: PanelContext,
    project: String,
    procedure: String,
    catalog: ScmConfigCatalog,
    editor: Option<EditorRows>,
}

impl PreflightPanel {
    pub fn new(ctx: PanelContext) -> Result<Self, EcscmError> {
        let object = ctx.require_object("a preflight step")?;
        let project = object.project.clone();
        let procedure = object.require_procedure("a preflight step")?.to_string();
        Ok(Self {
            ctx,
            project,
            procedure,
            catalog: ScmConfigCatalog::new(),
            editor: None,
        })
    }

    pub fn catalog(&self) -> &ScmConfigCatalog {
        &self.catalog
    }

    /// Rows of the selected configuration's preflight editor, if parsed.
    fn editor_rows(&self, values: &FormValues) -> &[FormRow] {
        match (&self.editor, values.non_blank(SCM_CONFIG_ROW)) {
            (Some(editor), Some(config)) if editor.config == config => &editor.rows,
            _ => &[],
        }
    }

    fn parse_editor(&self, config: &str) -> Result<Vec<FormRow>, EcscmError> {
        match self.catalog.editor_lookup(config) {
            EditorLookup::Loaded(xml) => Ok(rows_from_editor(&EditorForm::parse(xml)?)),
            EditorLookup::NotLoaded { plugin } => {
                debug!(config, plugin, "configuration has no preflight editor");
                Ok(Vec::new())
            }
            EditorLookup::UnknownConfig => Err(EcscmError::ConfigNotFound {
                name: config.to_string(),
            }),
        }
    }

    fn redirect(&self, step: &str) -> String {
        let links = &self.ctx.services.links;
        let back = links.link(
            "procedureDetails",
            &["projects", &self.project, "procedures", &self.procedure],
            &[],
        );
        links.link(
            "editStep",
            &["projects", &self.project, "procedures", &self.procedure, "steps", step],
            &[("redirectTo", &back)],
        )
    }
}

#[async_trait]
impl Panel for PreflightPanel {
    fn id(&self) -> &'static str {
        ID
    }

    fn title(&self) -> &'static str {
        TITLE
    }

    async fn load(&mut self) -> Result<(), EcscmError> {
        let outcome = self
            .ctx
            .services
            .loader(self.ctx.sink.clone())
            .implementing(IMPLEMENTED_METHOD)
            .with_editor(EDITOR)
            .load(&mut self.catalog)
            .await;
        loaded(outcome)
    }

    /// Swaps in the editor rows of the newly selected configuration.
    async fn refresh(&mut self, values: &FormValues) -> Result<(), EcscmError> {
        let Some(config) = values.non_blank(SCM_CONFIG_ROW) else {
            self.editor = None;
            return Ok(());
        };
        if self.editor.as_ref().is_some_and(|e| e.config == config) {
            return Ok(());
        }

        match self.parse_editor(config) {
            Ok(rows) => {
                self.editor = Some(EditorRows {
                    config: config.to_string(),
                    rows,
                });
                Ok(())
            }
            Err(e) => {
                warn!(config, error = %e, "failed to render preflight editor");
                self.editor = None;
                self.ctx.sink.report(&e);
                Err(e)
            }
        }
    }

    fn rows(&self, values: &FormValues) -> Vec<FormRow> {
        let mut config = config_row(&self.catalog);
        // Nothing is selected until the user picks a configuration.
        config.options.insert(0, String::new());
        config.default = String::new();

        let mut rows = vec![FormRow::text(STEP_NAME_ROW, "Step Name:", true), config];
        rows.extend(self.editor_rows(values).iter().cloned());
        rows
    }

    fn validate(&self, values: &FormValues) -> Result<(), EcscmError> {
        validate_rows(&self.rows(values), values)
    }

    async fn submit(&mut self, values: &FormValues) -> Result<Submission, EcscmError> {
        self.refresh(values).await?;
        self.validate(values)?;
        let (config, plugin) = selected_config(&self.catalog, values)?;
        let step = values.non_blank(STEP_NAME_ROW).unwrap_or_default();

        let mut actual_parameters = vec![ActualParameter::new("config", config)];
        actual_parameters.extend(
            self.editor_rows(values)
                .iter()
                .filter(|row| !row.is_credential())
                .map(|row| ActualParameter::new(row.id.clone(), values.value_for(row))),
        );

        let request = CreateStepRequest {
            project_name: self.project.clone(),
            procedure_name: self.procedure.clone(),
            step_name: step.to_string(),
            subproject: format!("/plugins/{plugin}/project"),
            subprocedure: SUBPROCEDURE.to_string(),
            actual_parameters,
        };
        debug!(?request, "creating step");
        if let Err(e) = self.ctx.services.commander.create_step(&request).await {
            self.ctx.sink.report(&e);
            return Err(e);
        }

        info!(project = %self.project, procedure = %self.procedure, step, config, "preflight step created");
        Ok(Submission::Redirect(self.redirect(step)))
    }
}
