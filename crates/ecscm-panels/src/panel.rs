// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The panel trait.

use std::collections::BTreeMap;

use async_trait::async_trait;
use ecscm_catalog::{LoadOutcome, ScmConfigCatalog};
use ecscm_core::EcscmError;
use serde::Serialize;

use crate::form::{FormRow, FormValues};

/// Id of the SCM configuration row shared by the catalog-backed panels.
pub const SCM_CONFIG_ROW: &str = "scmConfig";

/// What a successful submit asks the caller to do next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum Submission {
    /// Navigate to this web UI link.
    Redirect(String),
    /// Hand these parameter values back to the enclosing form.
    Parameters(BTreeMap<String, String>),
}

/// One interactive panel.
///
/// The caller drives a panel through `load`, then any number of
/// `refresh`/`rows` rounds as the user edits values, then `validate` and
/// `submit`.
#[async_trait]
pub trait Panel: Send + Sync {
    /// Registry identifier.
    fn id(&self) -> &'static str;

    fn title(&self) -> &'static str;

    /// Fetch whatever the panel needs before its rows can be rendered.
    async fn load(&mut self) -> Result<(), EcscmError>;

    /// Re-fetch data that depends on the current values, such as the editor
    /// form of the selected configuration.
    async fn refresh(&mut self, _values: &FormValues) -> Result<(), EcscmError> {
        Ok(())
    }

    fn rows(&self, values: &FormValues) -> Vec<FormRow>;

    fn validate(&self, values: &FormValues) -> Result<(), EcscmError>;

    async fn submit(&mut self, values: &FormValues) -> Result<Submission, EcscmError>;
}

/// Maps a loader outcome to the panel-level result.
pub(crate) fn loaded(outcome: LoadOutcome) -> Result<(), EcscmError> {
    match outcome {
        LoadOutcome::Complete(_) => Ok(()),
        LoadOutcome::Aborted => Err(EcscmError::Application(
            "SCM configurations could not be loaded".to_string(),
        )),
    }
}

/// Looks up the selected configuration and its plugin.
pub(crate) fn selected_config<'a>(
    catalog: &'a ScmConfigCatalog,
    values: &'a FormValues,
) -> Result<(&'a str, &'a str), EcscmError> {
    let name = values
        .non_blank(SCM_CONFIG_ROW)
        .ok_or_else(|| EcscmError::Validation("SCM Configuration is required".to_string()))?;
    let plugin = catalog.config_plugin(name)?;
    Ok((name, plugin))
}

/// The configuration row: a select over every configuration in `catalog`.
pub(crate) fn config_row(catalog: &ScmConfigCatalog) -> FormRow {
    let names: Vec<String> = catalog.config_names().map(str::to_string).collect();
    let default = names.first().cloned().unwrap_or_default();
    FormRow::select(SCM_CONFIG_ROW, "SCM Configuration:", true, names).with_default(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecscm_test_utils::fixtures::GOOD_RESPONSE;

    fn catalog() -> ScmConfigCatalog {
        let mut catalog = ScmConfigCatalog::new();
        catalog.parse_response(GOOD_RESPONSE).unwrap();
        catalog
    }

    #[test]
    fn config_row_lists_names_and_defaults_to_first() {
        let row = config_row(&catalog());
        assert_eq!(row.options, vec!["config1", "config2", "config3"]);
        assert_eq!(row.default, "config1");
        assert!(row.required);
    }

    #[test]
    fn selected_config_resolves_plugin() {
        let catalog = catalog();
        let values = FormValues::new().with(SCM_CONFIG_ROW, "config3");
        assert_eq!(selected_config(&catalog, &values).unwrap(), ("config3", "pluginB"));

        let values = FormValues::new().with(SCM_CONFIG_ROW, "nope");
        assert!(selected_config(&catalog, &values).unwrap_err().is_not_found());
    }

    #[test]
    fn aborted_load_is_application_error() {
        let err = loaded(LoadOutcome::Aborted).unwrap_err();
        assert_eq!(err.to_string(), "SCM configurations could not be loaded");
    }

    #[test]
    fn submission_serializes_tagged() {
        let json = serde_json::to_string(&Submission::Redirect("/x".into())).unwrap();
        assert_eq!(json, r#"{"kind":"redirect","value":"/x"}"#);
    }
}
