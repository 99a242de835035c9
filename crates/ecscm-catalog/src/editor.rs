// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsed view of a plugin's custom editor form.
//!
//! The catalog stores editor definitions as opaque XML. Panels that need to
//! know which parameter rows a plugin contributes parse them with
//! [`EditorForm::parse`].

use std::collections::BTreeMap;
use std::str::FromStr;

use ecscm_core::EcscmError;
use serde::Deserialize;
use strum::{Display, EnumString};

/// Widget kind of one form element.
#[derive(Debug, Clone, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum FieldKind {
    Entry,
    Textarea,
    Checkbox,
    Select,
    Radio,
    Credential,
    Project,
    Procedure,
    /// A kind this client does not render specially.
    #[strum(default)]
    Other(String),
}

/// One `<option>` of a select or radio element.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FormOption {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// One `<formElement>`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormElement {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub label: String,
    pub property: String,
    #[serde(default)]
    pub documentation: Option<String>,
    #[serde(default)]
    pub required: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub checked_value: Option<String>,
    #[serde(default)]
    pub unchecked_value: Option<String>,
    #[serde(default)]
    pub initially_checked: Option<String>,
    #[serde(default, rename = "option")]
    pub options: Vec<FormOption>,
}

impl FormElement {
    pub fn field_kind(&self) -> FieldKind {
        // `strum(default)` makes this infallible.
        FieldKind::from_str(self.kind.trim()).unwrap_or_else(|_| FieldKind::Other(self.kind.clone()))
    }

    pub fn is_required(&self) -> bool {
        self.required.as_deref().is_some_and(is_truthy)
    }

    /// The value a freshly rendered form would submit for this element.
    ///
    /// Checkboxes submit their checked or unchecked value (defaulting to
    /// `1`/`0`); selects fall back to their first option.
    pub fn default_value(&self) -> String {
        match self.field_kind() {
            FieldKind::Checkbox => {
                let checked = self.initially_checked.as_deref().is_some_and(is_truthy);
                let value = if checked {
                    self.checked_value.as_deref().unwrap_or("1")
                } else {
                    self.unchecked_value.as_deref().unwrap_or("0")
                };
                value.to_string()
            }
            FieldKind::Select | FieldKind::Radio => self
                .value
                .clone()
                .or_else(|| self.options.first().map(|o| o.value.clone()))
                .unwrap_or_default(),
            _ => self.value.clone().unwrap_or_default(),
        }
    }
}

fn is_truthy(raw: &str) -> bool {
    matches!(raw.trim(), "1" | "true")
}

/// The `<editor>` document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditorForm {
    #[serde(default, rename = "formElement")]
    pub elements: Vec<FormElement>,
}

impl EditorForm {
    pub fn parse(xml: &str) -> Result<Self, EcscmError> {
        quick_xml::de::from_str(xml).map_err(|e| EcscmError::Parse {
            what: "editor form".to_string(),
            message: e.to_string(),
        })
    }

    /// Property names in document order.
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(|e| e.property.as_str())
    }

    pub fn element(&self, property: &str) -> Option<&FormElement> {
        self.elements.iter().find(|e| e.property == property)
    }

    /// Default values keyed by property.
    pub fn defaults(&self) -> BTreeMap<String, String> {
        self.elements
            .iter()
            .map(|e| (e.property.clone(), e.default_value()))
            .collect()
    }

    /// Properties rendered as credential editors.
    pub fn credential_properties(&self) -> impl Iterator<Item = &str> {
        self.elements
            .iter()
            .filter(|e| e.field_kind() == FieldKind::Credential)
            .map(|e| e.property.as_str())
    }
}
