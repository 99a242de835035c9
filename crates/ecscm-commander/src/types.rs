// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON envelopes of the server's REST facade.

use ecscm_core::{EcscmError, Property, PropertySheet};
use serde::{Deserialize, Serialize};

/// `{"property": {...}}`
#[derive(Debug, Deserialize)]
pub struct PropertyEnvelope {
    pub property: Property,
}

/// `{"propertySheet": {"property": [...]}}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySheetEnvelope {
    pub property_sheet: SheetBody,
}

#[derive(Debug, Default, Deserialize)]
pub struct SheetBody {
    #[serde(default)]
    pub property: Vec<Property>,
}

impl From<PropertySheetEnvelope> for PropertySheet {
    fn from(envelope: PropertySheetEnvelope) -> Self {
        envelope.property_sheet.property.into_iter().collect()
    }
}

/// Body of a property write.
#[derive(Debug, Serialize)]
pub struct SetPropertyBody<'a> {
    pub value: &'a str,
}

/// `{"jobId": "..."}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobEnvelope {
    pub job_id: String,
}

/// `{"error": {"code": "...", "message": "..."}}`
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl From<ApiError> for EcscmError {
    fn from(error: ApiError) -> Self {
        EcscmError::Server {
            code: error.code,
            message: error.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_envelope_collects_properties() {
        let json = r#"{"propertySheet":{"property":[
            {"propertyName":"ECSCM-Git","value":"Git"},
            {"propertyName":"ECSCM-SVN","value":"Subversion"}
        ]}}"#;
        let envelope: PropertySheetEnvelope = serde_json::from_str(json).unwrap();
        let sheet = PropertySheet::from(envelope);
        assert_eq!(sheet.properties.len(), 2);
        assert_eq!(sheet.get("ECSCM-SVN").unwrap().value.as_deref(), Some("Subversion"));
    }

    #[test]
    fn empty_sheet_body_is_allowed() {
        let envelope: PropertySheetEnvelope =
            serde_json::from_str(r#"{"propertySheet":{}}"#).unwrap();
        assert!(PropertySheet::from(envelope).is_empty());
    }

    #[test]
    fn api_error_maps_to_server_error() {
        let body = r#"{"error":{"code":"NoSuchProperty","message":"Invalid property path"}}"#;
        let parsed: ApiErrorResponse = serde_json::from_str(body).unwrap();
        let err = EcscmError::from(parsed.error);
        assert!(err.is_no_such_property());
        assert_eq!(err.to_string(), "NoSuchProperty: Invalid property path");
    }
}
