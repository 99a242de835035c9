// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ecscm panel` command implementation.

use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::sync::Arc;

use ecscm_core::{CollectingErrorSink, EcscmError};
use ecscm_panels::{
    CredentialInput, FormRow, FormValues, ObjectContext, Panel, PanelContext, PanelRegistry,
    PanelServices, Submission,
};
use serde::Serialize;

use crate::args::CredentialArg;

/// Environment variable holding the password of `--credential` rows.
pub const CREDENTIAL_PASSWORD_ENV_VAR: &str = "ECSCM_CREDENTIAL_PASSWORD";

/// A fully parsed panel invocation.
#[derive(Debug)]
pub struct PanelRequest {
    pub id: String,
    pub object: Option<ObjectContext>,
    pub parameters: BTreeMap<String, String>,
    pub values: BTreeMap<String, String>,
    pub credentials: Vec<CredentialArg>,
}

/// Structured output of `panel rows --json`.
#[derive(Debug, Serialize)]
struct RowsResponse<'a> {
    id: &'a str,
    title: &'a str,
    rows: Vec<FormRow>,
    errors: Vec<String>,
}

/// Structured output of `panel submit --json`.
#[derive(Debug, Serialize)]
struct SubmitResponse<'a> {
    id: &'a str,
    submission: &'a Submission,
    errors: Vec<String>,
}

/// Creates the panel, loads it and refreshes it against the given values.
async fn open(
    registry: &PanelRegistry,
    services: PanelServices,
    request: &PanelRequest,
    values: &FormValues,
) -> Result<(Box<dyn Panel>, Arc<CollectingErrorSink>), EcscmError> {
    let sink = Arc::new(CollectingErrorSink::new());
    let mut ctx = PanelContext::new(services, sink.clone());
    ctx.object = request.object.clone();
    ctx.parameters = request.parameters.clone();

    let mut panel = registry.create(&request.id, ctx)?;
    panel.load().await?;
    panel.refresh(values).await?;
    Ok((panel, sink))
}

/// Run `ecscm panel rows`.
pub async fn run_rows(
    registry: &PanelRegistry,
    services: PanelServices,
    request: &PanelRequest,
    json: bool,
    plain: bool,
) -> Result<(), EcscmError> {
    let values = FormValues::from(request.values.clone());
    let (panel, sink) = open(registry, services, request, &values).await?;
    let rows = panel.rows(&values);

    if json {
        let response = RowsResponse {
            id: panel.id(),
            title: panel.title(),
            rows,
            errors: sink.messages(),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&response).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print!("{}", render_rows(panel.title(), &rows, &values, &sink.messages(), use_color));
    }
    Ok(())
}

/// Run `ecscm panel submit`.
pub async fn run_submit(
    registry: &PanelRegistry,
    services: PanelServices,
    request: &PanelRequest,
    json: bool,
) -> Result<(), EcscmError> {
    let mut values = FormValues::from(request.values.clone());
    if !request.credentials.is_empty() {
        let password = credential_password()?;
        for credential in &request.credentials {
            values = values.with_credential(
                credential.id.clone(),
                CredentialInput {
                    kind: credential.kind,
                    user_name: credential.user_name.clone(),
                    password: password.clone(),
                },
            );
        }
    }

    let (mut panel, sink) = open(registry, services, request, &values).await?;
    let submission = panel.submit(&values).await?;

    if json {
        let response = SubmitResponse {
            id: panel.id(),
            submission: &submission,
            errors: sink.messages(),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&response).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        print!("{}", render_submission(&submission));
    }
    Ok(())
}

/// Password for credential rows: environment first, then a TTY prompt.
fn credential_password() -> Result<String, EcscmError> {
    if let Ok(password) = std::env::var(CREDENTIAL_PASSWORD_ENV_VAR)
        && !password.is_empty()
    {
        return Ok(password);
    }

    if std::io::stdin().is_terminal() {
        eprint!("Credential password: ");
        return rpassword::read_password()
            .map_err(|e| EcscmError::Internal(format!("failed to read password: {e}")));
    }

    Err(EcscmError::Validation(format!(
        "no credential password provided. Set {CREDENTIAL_PASSWORD_ENV_VAR} or run interactively."
    )))
}

fn render_rows(
    title: &str,
    rows: &[FormRow],
    values: &FormValues,
    errors: &[String],
    use_color: bool,
) -> String {
    use colored::Colorize;

    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!("  {title}\n"));
    out.push_str(&format!("  {}\n", "-".repeat(title.len().max(35))));

    let label_width = rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
    for row in rows {
        let value = values.value_for(row);
        let required = if row.required { "*" } else { " " };
        let mut line = format!("    {required} {:label_width$}  {value}", row.label);
        if !row.options.is_empty() {
            let choices: Vec<&str> = row
                .options
                .iter()
                .map(|o| if o.is_empty() { "<none>" } else { o.as_str() })
                .collect();
            line.push_str(&format!("  [{}]", choices.join(" | ")));
        }
        if use_color {
            out.push_str(&format!("{}  {}\n", line, row.id.dimmed()));
        } else {
            out.push_str(&format!("{line}  ({})\n", row.id));
        }
    }

    for error in errors {
        if use_color {
            out.push_str(&format!("  {} {error}\n", "!".yellow()));
        } else {
            out.push_str(&format!("  [WARN] {error}\n"));
        }
    }
    out
}

fn render_submission(submission: &Submission) -> String {
    match submission {
        Submission::Redirect(url) => format!("{url}\n"),
        Submission::Parameters(params) => params
            .iter()
            .map(|(name, value)| format!("{name}={value}\n"))
            .collect(),
    }
}
