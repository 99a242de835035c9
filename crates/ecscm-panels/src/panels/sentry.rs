// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Continuous-integration schedule panel.
//!
//! Creates a disabled schedule, then tags it with the sentry editor of the
//! selected configuration's plugin so the web UI renders the plugin's form
//! when the schedule is edited.

use async_trait::async_trait;
use ecscm_catalog::ScmConfigCatalog;
use ecscm_core::EcscmError;
use ecscm_core::types::CreateScheduleRequest;
use futures::future::join_all;
use tracing::{debug, info};

use crate::context::PanelContext;
use crate::form::{FormRow, FormValues, validate_rows};
use crate::panel::{Panel, Submission, config_row, loaded, selected_config};

pub const ID: &str = "sentrySchedule";
const TITLE: &str = "New Continuous Integration Schedule";
/// Enumeration filter: plugins that can report an SCM tag.
const IMPLEMENTED_METHOD: &str = "getSCMTag";
const EDITOR: &str = "sentry";

const OBJECT_NAME_ROW: &str = "objectName";
const PROJECT_ROW: &str = "projectName";
const PROCEDURE_ROW: &str = "procedureName";

/// The schedule always lives in the panel's project; this row only narrows
/// which procedures are offered.
const PROJECT_ROW_DOC: &str =
    "Project whose procedures are offered. The schedule is created in the current project.";

pub struct SentryPanel {
    ctx: PanelContext,
    project: String,
    catalog: ScmConfigCatalog,
}

impl SentryPanel {
    pub fn new(ctx: PanelContext) -> Result<Self, EcscmError> {
        let project = ctx.require_object("a sentry schedule")?.project.clone();
        Ok(Self {
            ctx,
            project,
            catalog: ScmConfigCatalog::new(),
        })
    }

    pub fn catalog(&self) -> &ScmConfigCatalog {
        &self.catalog
    }

    fn schedule_path(&self, schedule: &str) -> String {
        format!("/projects/{}/schedules/{schedule}", self.project)
    }

    fn redirect(&self, schedule: &str) -> String {
        let links = &self.ctx.services.links;
        let back = links.link(
            "projectDetails",
            &[],
            &[("projectName", &self.project), ("tabGroup", "schedulesHeader")],
        );
        links.link(
            "editSchedule",
            &["projects", &self.project, "schedules", schedule],
            &[("redirectTo", &back)],
        )
    }
}

#[async_trait]
impl Panel for SentryPanel {
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
            .load(&mut self.catalog)
            .await;
        loaded(outcome)
    }

    fn rows(&self, _values: &FormValues) -> Vec<FormRow> {
        vec![
            FormRow::text(OBJECT_NAME_ROW, "Schedule Name:", true),
            config_row(&self.catalog),
            FormRow::text(PROJECT_ROW, "Project Name:", true)
                .with_default(self.project.clone())
                .with_documentation(PROJECT_ROW_DOC),
            FormRow::text(PROCEDURE_ROW, "Procedure Name:", true),
        ]
    }

    fn validate(&self, values: &FormValues) -> Result<(), EcscmError> {
        validate_rows(&self.rows(values), values)
    }

    async fn submit(&mut self, values: &FormValues) -> Result<Submission, EcscmError> {
        self.validate(values)?;
        let (config, plugin) = selected_config(&self.catalog, values)?;
        let schedule = values.non_blank(OBJECT_NAME_ROW).unwrap_or_default();
        let procedure = values.non_blank(PROCEDURE_ROW).unwrap_or_default();

        let services = &self.ctx.services;
        let request = CreateScheduleRequest {
            project_name: self.project.clone(),
            schedule_name: schedule.to_string(),
            procedure_name: procedure.to_string(),
            schedule_disabled: true,
        };
        debug!(?request, "creating schedule");
        if let Err(e) = services.commander.create_schedule(&request).await {
            self.ctx.sink.report(&e);
            return Err(e);
        }

        let editor_data = format!("{}/ec_customEditorData", self.schedule_path(schedule));
        let form_type = format!("$[{}]", services.form_path(plugin, EDITOR));
        let writes = [
            (format!("{editor_data}/formType"), form_type),
            (format!("{editor_data}/scmConfig"), config.to_string()),
        ];
        let results = join_all(writes.iter().map(|(path, value)| {
            debug!(path = %path, value = %value, "setting property");
            services.properties.set_property(path, value)
        }))
        .await;

        // Every write is reported; the first failure is returned.
        let mut first_error = None;
        for result in results {
            if let Err(e) = result {
                self.ctx.sink.report(&e);
                first_error.get_or_insert(e);
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        let redirect = self.redirect(schedule);
        info!(project = %self.project, schedule, config, "sentry schedule created");
        Ok(Submission::Redirect(redirect))
    }
}
