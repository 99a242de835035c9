// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parameter panel of the CI checkout procedure.
//!
//! Each parameter defaults to the job property of the same name, so a
//! procedure launched by a sentry schedule picks up what the schedule set.

use std::collections::BTreeMap;

use async_trait::async_trait;
use ecscm_core::EcscmError;

use crate::context::PanelContext;
use crate::form::{FormRow, FormValues};
use crate::panel::{Panel, Submission};

pub const ID: &str = "ciCheckout";
const TITLE: &str = "CI Checkout Parameters";

pub const PROJECT_PARAM: &str = "ec_ci_projectName";
pub const CONFIGURATION_PARAM: &str = "ec_ci_configurationName";
pub const PREFLIGHT_PARAM: &str = "ec_ci_preflight";

const PARAMS: [(&str, &str, &str); 3] = [
    (PROJECT_PARAM, "Project:", "Project the SCM configuration is checked out for."),
    (CONFIGURATION_PARAM, "SCM Configuration:", "Name of the SCM configuration to check out."),
    (PREFLIGHT_PARAM, "Preflight:", "Set when the checkout runs for a preflight build."),
];

fn job_reference(name: &str) -> String {
    format!("$[/myJob/{name}]")
}

pub struct CiCheckoutPanel {
    values: BTreeMap<String, String>,
}

impl CiCheckoutPanel {
    /// Parameters present in `ctx.parameters` override the job-property defaults.
    pub fn new(ctx: PanelContext) -> Self {
        let mut panel = Self::with_defaults();
        panel.set_actual_parameters(&ctx.parameters);
        panel
    }

    fn with_defaults() -> Self {
        Self {
            values: PARAMS
                .iter()
                .map(|(name, _, _)| (name.to_string(), job_reference(name)))
                .collect(),
        }
    }

    /// Overwrites the known parameters that `actual` carries; others are ignored.
    pub fn set_actual_parameters(&mut self, actual: &BTreeMap<String, String>) {
        for (name, value) in self.values.iter_mut() {
            if let Some(actual) = actual.get(name) {
                value.clone_from(actual);
            }
        }
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}

#[async_trait]
impl Panel for CiCheckoutPanel {
    fn id(&self) -> &'static str {
        ID
    }

    fn title(&self) -> &'static str {
        TITLE
    }

    async fn load(&mut self) -> Result<(), EcscmError> {
        Ok(())
    }

    fn rows(&self, _values: &FormValues) -> Vec<FormRow> {
        PARAMS
            .iter()
            .map(|(name, label, doc)| {
                FormRow::text(name, label, false)
                    .with_default(self.values.get(*name).cloned().unwrap_or_default())
                    .with_documentation(*doc)
            })
            .collect()
    }

    fn validate(&self, _values: &FormValues) -> Result<(), EcscmError> {
        Ok(())
    }

    async fn submit(&mut self, values: &FormValues) -> Result<Submission, EcscmError> {
        for (name, value) in self.values.iter_mut() {
            if let Some(entered) = values.get(name) {
                *value = entered.to_string();
            }
        }
        Ok(Submission::Parameters(self.values.clone()))
    }
}
