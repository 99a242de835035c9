// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Panel submission sequences against the in-memory server.

use std::sync::Arc;

use ecscm_config::EcscmConfig;
use ecscm_core::types::{ActualParameter, CredentialType};
use ecscm_core::{CollectingErrorSink, EcscmError};
use ecscm_panels::{
    CredentialInput, FormValues, LinkBuilder, ObjectContext, Panel, PanelContext, PanelRegistry,
    PanelServices, Submission,
};
use ecscm_test_utils::fixtures::{CREATE_CONFIG_FORM, EDITOR_DEFINITION_B, GOOD_RESPONSE};
use ecscm_test_utils::{Call, FakeCgiTransport, MockCommander};

const SCM_TYPES: &str = "/plugins/ECSCM/project/scm_types";

struct Harness {
    transport: Arc<FakeCgiTransport>,
    commander: Arc<MockCommander>,
    sink: Arc<CollectingErrorSink>,
}

impl Harness {
    fn new(transport: FakeCgiTransport, commander: MockCommander) -> Self {
        Self {
            transport: Arc::new(transport),
            commander: Arc::new(commander),
            sink: Arc::new(CollectingErrorSink::new()),
        }
    }

    fn context(&self) -> PanelContext {
        let services = PanelServices {
            transport: self.transport.clone(),
            properties: self.commander.clone(),
            commander: self.commander.clone(),
            config: EcscmConfig::default(),
            links: LinkBuilder::relative(),
        };
        PanelContext::new(services, self.sink.clone())
    }

    fn on(&self, object: &str) -> PanelContext {
        self.context()
            .with_object(ObjectContext::parse(object).expect("valid object context"))
    }

    fn panel(&self, id: &str, ctx: PanelContext) -> Box<dyn Panel> {
        PanelRegistry::with_defaults()
            .create(id, ctx)
            .expect("panel should be registered")
    }
}

fn listing() -> FakeCgiTransport {
    FakeCgiTransport::new().respond_any("ecscm.cgi", GOOD_RESPONSE)
}

fn redirect(submission: Submission) -> String {
    match submission {
        Submission::Redirect(url) => url,
        other => panic!("expected a redirect, got {other:?}"),
    }
}

#[tokio::test]
async fn sentry_creates_disabled_schedule_then_tags_it() {
    let h = Harness::new(listing(), MockCommander::new());
    let mut panel = h.panel("sentrySchedule", h.on("/projects/Default"));
    panel.load().await.unwrap();

    let values = FormValues::new()
        .with("objectName", "nightly")
        .with("scmConfig", "config3")
        .with("procedureName", "Build");
    let url = redirect(panel.submit(&values).await.unwrap());

    let calls = h.commander.calls().await;
    assert_eq!(calls.len(), 3, "{calls:?}");
    let Call::CreateSchedule(request) = &calls[0] else {
        panic!("schedule must be created first: {calls:?}");
    };
    assert_eq!(request.project_name, "Default");
    assert_eq!(request.schedule_name, "nightly");
    assert_eq!(request.procedure_name, "Build");
    assert!(request.schedule_disabled);

    let editor_data = "/projects/Default/schedules/nightly/ec_customEditorData";
    assert_eq!(
        h.commander.property(&format!("{editor_data}/formType")).await.as_deref(),
        Some("$[/plugins/pluginB/project/scm_form/sentry]")
    );
    assert_eq!(
        h.commander.property(&format!("{editor_data}/scmConfig")).await.as_deref(),
        Some("config3")
    );

    assert!(url.starts_with("/commander/link/editSchedule/projects/Default/schedules/nightly?redirectTo="));
    assert!(url.contains("projectDetails"));
    assert!(h.sink.is_empty());
}

#[tokio::test]
async fn sentry_project_row_only_scopes_the_procedure() {
    let h = Harness::new(listing(), MockCommander::new());
    let mut panel = h.panel("sentrySchedule", h.on("/projects/Default"));
    panel.load().await.unwrap();

    let values = FormValues::new()
        .with("objectName", "nightly")
        .with("scmConfig", "config1")
        .with("projectName", "Shared")
        .with("procedureName", "Build");
    let rows = panel.rows(&values);
    let project = rows.iter().find(|r| r.id == "projectName").unwrap();
    assert_eq!(project.default, "Default");
    assert!(project.documentation.as_deref().unwrap().contains("current project"));

    redirect(panel.submit(&values).await.unwrap());
    let calls = h.commander.calls().await;
    let Call::CreateSchedule(request) = &calls[0] else {
        panic!("schedule must be created first: {calls:?}");
    };
    assert_eq!(request.project_name, "Default");
    assert!(h
        .commander
        .property("/projects/Default/schedules/nightly/ec_customEditorData/scmConfig")
        .await
        .is_some());
}

#[tokio::test]
async fn sentry_loads_only_tag_capable_configs() {
    let h = Harness::new(listing(), MockCommander::new());
    let mut panel = h.panel("sentrySchedule", h.on("/projects/Default"));
    panel.load().await.unwrap();

    let requests = h.transport.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].1["cmd"], "getImplementingCfgs");
    assert_eq!(requests[0].1["method"], "getSCMTag");
    // No editor is fetched for schedules.
    assert_eq!(h.commander.property_reads().await, 0);

    let rows = panel.rows(&FormValues::new());
    let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["objectName", "scmConfig", "projectName", "procedureName"]);
    assert_eq!(rows[2].default, "Default");
}

#[tokio::test]
async fn sentry_schedule_failure_skips_property_writes() {
    let h = Harness::new(
        listing(),
        MockCommander::new().with_failing_operation("create_schedule"),
    );
    let mut panel = h.panel("sentrySchedule", h.on("/projects/Default"));
    panel.load().await.unwrap();

    let values = FormValues::new()
        .with("objectName", "nightly")
        .with("scmConfig", "config1")
        .with("procedureName", "Build");
    let err = panel.submit(&values).await.unwrap_err();
    assert!(matches!(err, EcscmError::Server { .. }));

    let calls = h.commander.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(h.sink.messages(), vec!["InvalidRequest: create_schedule rejected"]);
}

#[tokio::test]
async fn sentry_validation_blocks_submit() {
    let h = Harness::new(listing(), MockCommander::new());
    let mut panel = h.panel("sentrySchedule", h.on("/projects/Default"));
    panel.load().await.unwrap();

    let values = FormValues::new().with("scmConfig", "config1");
    let err = panel.submit(&values).await.unwrap_err();
    assert!(matches!(err, EcscmError::Validation(_)));
    assert!(err.to_string().contains("Schedule Name is required"));
    assert!(h.commander.calls().await.is_empty());
}

#[tokio::test]
async fn failed_listing_fails_load() {
    let h = Harness::new(
        FakeCgiTransport::new().fail_any("ecscm.cgi", "connection refused"),
        MockCommander::new(),
    );
    let mut panel = h.panel("sentrySchedule", h.on("/projects/Default"));

    let err = panel.load().await.unwrap_err();
    assert_eq!(err.to_string(), "SCM configurations could not be loaded");
    assert_eq!(
        h.sink.messages(),
        vec!["error loading SCM configuration list: connection refused"]
    );
}

#[tokio::test]
async fn preflight_step_carries_config_and_editor_values() {
    let h = Harness::new(
        listing(),
        MockCommander::new()
            .with_property("/plugins/pluginA/project/scm_form/preflight", EDITOR_DEFINITION_B),
    );
    let mut panel = h.panel("preflightStep", h.on("/projects/Default/procedures/Build"));
    panel.load().await.unwrap();
    // pluginB has no preflight editor.
    assert_eq!(
        h.sink.messages(),
        vec!["editor 'preflight' not found for plugin 'pluginB'"]
    );

    let values = FormValues::new()
        .with("stepName", "extract")
        .with("scmConfig", "config2")
        .with("field2", "trunk");
    panel.refresh(&values).await.unwrap();
    let ids: Vec<String> = panel.rows(&values).into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["stepName", "scmConfig", "field1", "field2"]);

    let url = redirect(panel.submit(&values).await.unwrap());
    let calls = h.commander.calls().await;
    let Some(Call::CreateStep(request)) = calls.last() else {
        panic!("expected a createStep call: {calls:?}");
    };
    assert_eq!(request.project_name, "Default");
    assert_eq!(request.procedure_name, "Build");
    assert_eq!(request.step_name, "extract");
    assert_eq!(request.subproject, "/plugins/pluginA/project");
    assert_eq!(request.subprocedure, "Preflight");
    assert_eq!(
        request.actual_parameters,
        vec![
            ActualParameter::new("config", "config2"),
            ActualParameter::new("field1", "1"),
            ActualParameter::new("field2", "trunk"),
        ]
    );

    assert!(url.starts_with("/commander/link/editStep/projects/Default/procedures/Build/steps/extract?redirectTo="));
    assert!(url.contains("procedureDetails"));
}

#[tokio::test]
async fn preflight_without_editor_sends_only_config() {
    let h = Harness::new(listing(), MockCommander::new());
    let mut panel = h.panel("preflightStep", h.on("/projects/Default/procedures/Build"));
    panel.load().await.unwrap();

    let values = FormValues::new()
        .with("stepName", "extract")
        .with("scmConfig", "config3");
    panel.submit(&values).await.unwrap();

    let calls = h.commander.calls().await;
    let Some(Call::CreateStep(request)) = calls.last() else {
        panic!("expected a createStep call: {calls:?}");
    };
    assert_eq!(request.actual_parameters, vec![ActualParameter::new("config", "config3")]);
    assert_eq!(request.subproject, "/plugins/pluginB/project");
}

#[tokio::test]
async fn preflight_requires_a_configuration() {
    let h = Harness::new(listing(), MockCommander::new());
    let mut panel = h.panel("preflightStep", h.on("/projects/Default/procedures/Build"));
    panel.load().await.unwrap();

    let rows = panel.rows(&FormValues::new());
    assert_eq!(rows[1].default, "");
    assert_eq!(rows[1].options[0], "");

    let err = panel
        .validate(&FormValues::new().with("stepName", "extract"))
        .unwrap_err();
    assert!(err.to_string().contains("SCM Configuration is required"));
}

#[tokio::test]
async fn preflight_needs_a_procedure_context() {
    let h = Harness::new(listing(), MockCommander::new());
    let err = PanelRegistry::with_defaults()
        .create("preflightStep", h.on("/projects/Default"))
        .err()
        .expect("project-only context must be rejected");
    assert!(matches!(err, EcscmError::Validation(_)));
}

fn config_types() -> MockCommander {
    MockCommander::new()
        .with_property(format!("{SCM_TYPES}/ECSCM-Git"), "Git")
        .with_property(format!("{SCM_TYPES}/ECSCM-Perforce"), "Perforce")
        .with_property("/plugins/ECSCM-Git/project/scm_form/createConfig", CREATE_CONFIG_FORM)
        .with_job_id("4711")
}

fn git_config_values(kind: CredentialType) -> FormValues {
    FormValues::new()
        .with("scmType", "Git")
        .with("config", "git-main")
        .with("desc", "Main repository")
        .with_credential(
            "credential",
            CredentialInput {
                kind,
                user_name: "builder".into(),
                password: "secret".into(),
            },
        )
}

#[tokio::test]
async fn create_configuration_runs_procedure_and_checks_job() {
    let h = Harness::new(
        FakeCgiTransport::new().respond(
            "monitorJob.cgi",
            &[("jobId", "4711")],
            "Success: configuration created\n",
        ),
        config_types(),
    );
    let mut panel = h.panel("createConfiguration", h.context());
    panel.load().await.unwrap();

    let type_row = &panel.rows(&FormValues::new())[0];
    assert_eq!(type_row.options, vec!["", "Git", "Perforce"]);

    let values = git_config_values(CredentialType::Key);
    panel.refresh(&values).await.unwrap();
    let url = redirect(panel.submit(&values).await.unwrap());
    assert_eq!(url, "/commander/pages/ECSCM/configurations");

    let calls = h.commander.calls().await;
    let Some(Call::RunProcedure(request)) = calls.last() else {
        panic!("expected a runProcedure call: {calls:?}");
    };
    assert_eq!(request.project_name, "/plugins/ECSCM-Git/project");
    assert_eq!(request.procedure_name, "CreateConfiguration");
    assert_eq!(
        request.actual_parameters,
        vec![
            ActualParameter::new("config", "git-main"),
            ActualParameter::new("desc", "Main repository"),
            ActualParameter::new("credentialType", "key"),
        ]
    );
    assert_eq!(request.credentials.len(), 1);
    assert_eq!(request.credentials[0].credential_name, "credential");
    assert_eq!(request.credentials[0].user_name, "builder");

    let requests = h.transport.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0.to_string(), "ECSCM/monitorJob.cgi");
    assert!(!requests[0].1.contains_key("debug"));
    assert!(h.sink.is_empty());
}

#[tokio::test]
async fn password_credential_adds_no_type_parameter() {
    let h = Harness::new(
        FakeCgiTransport::new().respond_any("monitorJob.cgi", "Success"),
        config_types(),
    );
    let mut panel = h.panel("createConfiguration", h.context());
    panel.load().await.unwrap();
    panel
        .submit(&git_config_values(CredentialType::Password))
        .await
        .unwrap();

    let calls = h.commander.calls().await;
    let Some(Call::RunProcedure(request)) = calls.last() else {
        panic!("expected a runProcedure call: {calls:?}");
    };
    assert!(
        request
            .actual_parameters
            .iter()
            .all(|p| p.actual_parameter_name != "credentialType")
    );
}

#[tokio::test]
async fn failed_job_reports_body_and_job_link() {
    let h = Harness::new(
        FakeCgiTransport::new().respond(
            "monitorJob.cgi",
            &[("debug", "1"), ("jobId", "4711")],
            "Error: repository unreachable",
        ),
        config_types(),
    );
    let ctx = h.context().with_parameter("debug", "1");
    let mut panel = h.panel("createConfiguration", ctx);
    panel.load().await.unwrap();

    let err = panel
        .submit(&git_config_values(CredentialType::Password))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error occurred during configuration creation: Error: repository unreachable \
         (see job for details: /commander/jobDetails.php?jobId=4711)"
    );
    assert_eq!(h.sink.messages(), vec![err.to_string()]);
}

#[tokio::test]
async fn monitor_transport_failure_is_reported() {
    let h = Harness::new(
        FakeCgiTransport::new().fail_any("monitorJob.cgi", "timed out"),
        config_types(),
    );
    let mut panel = h.panel("createConfiguration", h.context());
    panel.load().await.unwrap();

    let err = panel
        .submit(&git_config_values(CredentialType::Password))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "CGI request failed");
    assert_eq!(err.chain(), "CGI request failed: timed out");
    assert_eq!(h.sink.messages(), vec!["CGI request failed: timed out"]);
}

#[tokio::test]
async fn missing_scm_types_are_reported() {
    let h = Harness::new(FakeCgiTransport::new(), MockCommander::new());
    let mut panel = h.panel("createConfiguration", h.context());

    let err = panel.load().await.unwrap_err();
    assert_eq!(err.to_string(), "No SCM types found");
    assert_eq!(h.sink.messages(), vec!["No SCM types found"]);
}

#[tokio::test]
async fn scm_types_read_errors_are_passed_through() {
    let h = Harness::new(
        FakeCgiTransport::new(),
        MockCommander::new().with_server_error(SCM_TYPES, "AccessDenied"),
    );
    let mut panel = h.panel("createConfiguration", h.context());

    let err = panel.load().await.unwrap_err();
    assert!(matches!(err, EcscmError::Server { ref code, .. } if code == "AccessDenied"));
}

#[tokio::test]
async fn missing_create_form_is_reported_on_refresh() {
    let h = Harness::new(
        FakeCgiTransport::new(),
        MockCommander::new().with_property(format!("{SCM_TYPES}/ECSCM-Svn"), "Subversion"),
    );
    let mut panel = h.panel("createConfiguration", h.context());
    panel.load().await.unwrap();

    let err = panel
        .refresh(&FormValues::new().with("scmType", "Subversion"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        h.sink.messages(),
        vec!["editor 'createConfig' not found for plugin 'ECSCM-Svn'"]
    );
}

#[tokio::test]
async fn ci_checkout_takes_actual_parameters() {
    let h = Harness::new(FakeCgiTransport::new(), MockCommander::new());
    let ctx = h.context().with_parameter("ec_ci_configurationName", "git-main");
    let mut panel = h.panel("ciCheckout", ctx);
    panel.load().await.unwrap();

    let rows = panel.rows(&FormValues::new());
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].default, "$[/myJob/ec_ci_projectName]");
    assert_eq!(rows[1].default, "git-main");

    let Submission::Parameters(params) = panel.submit(&FormValues::new()).await.unwrap() else {
        panic!("expected parameters");
    };
    assert_eq!(params["ec_ci_configurationName"], "git-main");
    assert_eq!(params["ec_ci_preflight"], "$[/myJob/ec_ci_preflight]");
    assert!(h.commander.calls().await.is_empty());
}

#[test]
fn registry_lists_builtin_panels_and_rejects_unknown_ids() {
    let registry = PanelRegistry::with_defaults();
    assert_eq!(
        registry.ids(),
        vec!["ciCheckout", "createConfiguration", "preflightStep", "sentrySchedule"]
    );

    let h = Harness::new(FakeCgiTransport::new(), MockCommander::new());
    let err = registry.create("scmEdit", h.context()).err().expect("unknown id");
    assert_eq!(
        err.to_string(),
        "validation error: unknown panel 'scmEdit' \
         (available: ciCheckout, createConfiguration, preflightStep, sentrySchedule)"
    );
}
