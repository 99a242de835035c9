// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Form rows and submitted values.

use std::collections::BTreeMap;

use ecscm_catalog::{EditorForm, FieldKind, FormElement};
use ecscm_core::EcscmError;
use ecscm_core::types::CredentialType;
use serde::Serialize;

/// One row a panel renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormRow {
    pub id: String,
    pub label: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(serialize_with = "serialize_kind")]
    pub kind: FieldKind,
    /// Allowed values for choice rows.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub default: String,
}

fn serialize_kind<S: serde::Serializer>(kind: &FieldKind, s: S) -> Result<S::Ok, S::Error> {
    match kind {
        FieldKind::Other(raw) => s.serialize_str(raw),
        known => s.serialize_str(&known.to_string()),
    }
}

impl FormRow {
    pub fn text(id: &str, label: &str, required: bool) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            required,
            documentation: None,
            kind: FieldKind::Entry,
            options: Vec::new(),
            default: String::new(),
        }
    }

    pub fn select(id: &str, label: &str, required: bool, options: Vec<String>) -> Self {
        Self {
            kind: FieldKind::Select,
            options,
            ..Self::text(id, label, required)
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn is_credential(&self) -> bool {
        self.kind == FieldKind::Credential
    }
}

impl From<&FormElement> for FormRow {
    fn from(element: &FormElement) -> Self {
        Self {
            id: element.property.clone(),
            label: element.label.clone(),
            required: element.is_required(),
            documentation: element.documentation.clone(),
            kind: element.field_kind(),
            options: element.options.iter().map(|o| o.value.clone()).collect(),
            default: element.default_value(),
        }
    }
}

/// Rows contributed by a plugin's editor form.
pub fn rows_from_editor(form: &EditorForm) -> Vec<FormRow> {
    form.elements.iter().map(FormRow::from).collect()
}

/// What the user typed into a credential row.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialInput {
    pub kind: CredentialType,
    pub user_name: String,
    pub password: String,
}

impl std::fmt::Debug for CredentialInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialInput")
            .field("kind", &self.kind)
            .field("user_name", &self.user_name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Values submitted for a panel, keyed by row id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: BTreeMap<String, String>,
    credentials: BTreeMap<String, CredentialInput>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(id, value);
        self
    }

    pub fn with_credential(mut self, id: impl Into<String>, credential: CredentialInput) -> Self {
        self.credentials.insert(id.into(), credential);
        self
    }

    pub fn set(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.values.insert(id.into(), value.into());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.values.get(id).map(String::as_str)
    }

    /// The value of `id`, or `None` when it is missing or blank.
    pub fn non_blank(&self, id: &str) -> Option<&str> {
        self.get(id).filter(|v| !v.trim().is_empty())
    }

    pub fn credential(&self, id: &str) -> Option<&CredentialInput> {
        self.credentials.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Value the row submits: the entered value, else the row default.
    pub fn value_for<'a>(&'a self, row: &'a FormRow) -> &'a str {
        self.get(&row.id).unwrap_or(&row.default)
    }
}

impl From<BTreeMap<String, String>> for FormValues {
    fn from(values: BTreeMap<String, String>) -> Self {
        Self {
            values,
            credentials: BTreeMap::new(),
        }
    }
}

/// Checks every required row and every choice row, collecting all problems
/// into one validation error.
pub fn validate_rows(rows: &[FormRow], values: &FormValues) -> Result<(), EcscmError> {
    let mut problems = Vec::new();
    for row in rows {
        let label = row.label.trim_end_matches(':');
        if row.is_credential() {
            let filled = values
                .credential(&row.id)
                .is_some_and(|c| !c.user_name.trim().is_empty());
            if row.required && !filled {
                problems.push(format!("{label} is required"));
            }
            continue;
        }

        let value = values.value_for(row);
        if row.required && value.trim().is_empty() {
            problems.push(format!("{label} is required"));
        } else if !row.options.is_empty()
            && !value.is_empty()
            && !row.options.iter().any(|o| o == value)
        {
            problems.push(format!("'{value}' is not a valid choice for {label}"));
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(EcscmError::Validation(problems.join("; ")))
    }
}
