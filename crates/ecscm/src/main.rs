// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ECSCM - SCM configuration tooling for the orchestration server.
//!
//! This is the binary entry point: it loads the configuration, connects to
//! the server and routes subcommands to the catalog loader or to a panel.

mod args;
mod configs;
mod panel;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use ecscm_commander::CommanderClient;
use ecscm_config::EcscmConfig;
use ecscm_core::EcscmError;
use ecscm_panels::{LinkBuilder, PanelRegistry, PanelServices};

use crate::args::{CredentialArg, KeyValue};

/// ECSCM - SCM configuration tooling for the orchestration server.
#[derive(Parser, Debug)]
#[command(name = "ecscm", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List SCM configurations known to the server.
    Configs {
        /// Only list configurations whose plugin implements this method.
        #[arg(long)]
        method: Option<String>,
        /// Also fetch this editor form for every plugin.
        #[arg(long)]
        editor: Option<String>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// Work with form panels.
    Panel {
        #[command(subcommand)]
        action: PanelCommands,
    },
}

/// Panel subcommands.
#[derive(Subcommand, Debug)]
enum PanelCommands {
    /// List registered panel identifiers.
    List,
    /// Load a panel and show the rows it would render.
    Rows {
        #[command(flatten)]
        target: PanelTarget,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// Load a panel, validate the given values and submit them.
    Submit {
        #[command(flatten)]
        target: PanelTarget,
        /// Credential row as `id=kind:user`; the password is read from
        /// `ECSCM_CREDENTIAL_PASSWORD` or prompted for.
        #[arg(long = "credential", value_name = "ID=KIND:USER")]
        credentials: Vec<CredentialArg>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Which panel to open and with what.
#[derive(clap::Args, Debug)]
struct PanelTarget {
    /// Panel identifier (see `ecscm panel list`).
    id: String,
    /// Object the panel is opened on, e.g. `/projects/Default/procedures/Build`.
    #[arg(long)]
    context: Option<String>,
    /// Request parameter such as `debug=1` or an actual parameter value.
    #[arg(long = "param", value_name = "NAME=VALUE")]
    params: Vec<KeyValue>,
    /// Row value as `row=value`.
    #[arg(long = "set", value_name = "ROW=VALUE")]
    values: Vec<KeyValue>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => ecscm_config::load_and_validate_path(path),
        None => ecscm_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            ecscm_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config.logging.level);

    if let Err(e) = run(cli.command, config).await {
        eprintln!("error: {}", e.chain());
        std::process::exit(1);
    }
}

async fn run(command: Option<Commands>, config: EcscmConfig) -> Result<(), EcscmError> {
    let registry = PanelRegistry::with_defaults();

    match command {
        Some(Commands::Configs {
            method,
            editor,
            json,
            plain,
        }) => {
            let services = connect(config)?;
            configs::run_configs(&services, method, editor, json, plain).await
        }
        Some(Commands::Panel { action }) => match action {
            PanelCommands::List => {
                for id in registry.ids() {
                    println!("{id}");
                }
                Ok(())
            }
            PanelCommands::Rows {
                target,
                json,
                plain,
            } => {
                let services = connect(config)?;
                let request = target.into_request(Vec::new())?;
                panel::run_rows(&registry, services, &request, json, plain).await
            }
            PanelCommands::Submit {
                target,
                credentials,
                json,
            } => {
                let services = connect(config)?;
                let request = target.into_request(credentials)?;
                panel::run_submit(&registry, services, &request, json).await
            }
        },
        None => {
            println!("ecscm: use --help for available commands");
            Ok(())
        }
    }
}

impl PanelTarget {
    fn into_request(self, credentials: Vec<CredentialArg>) -> Result<panel::PanelRequest, EcscmError> {
        let object = self
            .context
            .as_deref()
            .map(ecscm_panels::ObjectContext::parse)
            .transpose()?;
        Ok(panel::PanelRequest {
            id: self.id,
            object,
            parameters: self.params.into_iter().map(KeyValue::into_pair).collect(),
            values: self.values.into_iter().map(KeyValue::into_pair).collect(),
            credentials,
        })
    }
}

/// Wires one HTTP client into every panel collaborator.
fn connect(config: EcscmConfig) -> Result<PanelServices, EcscmError> {
    let client = Arc::new(CommanderClient::new(&config.server)?);
    let links = LinkBuilder::absolute(&config.server.url)?;
    tracing::debug!(server = %config.server.url, "connected");
    Ok(PanelServices {
        transport: client.clone(),
        properties: client.clone(),
        commander: client,
        config,
        links,
    })
}

/// Logs go to stderr so `--json` output stays parseable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ecscm={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_panel_submit() {
        let cli = Cli::try_parse_from([
            "ecscm",
            "panel",
            "submit",
            "preflightStep",
            "--context",
            "/projects/Default/procedures/Build",
            "--set",
            "stepName=extract",
            "--set",
            "scmConfig=git-main",
            "--credential",
            "credential=key:builder",
        ])
        .unwrap();

        let Some(Commands::Panel {
            action:
                PanelCommands::Submit {
                    target,
                    credentials,
                    json,
                },
        }) = cli.command
        else {
            panic!("expected panel submit");
        };
        assert!(!json);
        assert_eq!(credentials.len(), 1);

        let request = target.into_request(credentials).unwrap();
        assert_eq!(request.id, "preflightStep");
        assert_eq!(request.object.unwrap().procedure.as_deref(), Some("Build"));
        assert_eq!(request.values["scmConfig"], "git-main");
    }

    #[test]
    fn bad_context_is_rejected() {
        let cli = Cli::try_parse_from(["ecscm", "panel", "rows", "sentrySchedule", "--context", "/jobs/1"])
            .unwrap();
        let Some(Commands::Panel {
            action: PanelCommands::Rows { target, .. },
        }) = cli.command
        else {
            panic!("expected panel rows");
        };
        assert!(matches!(target.into_request(Vec::new()), Err(EcscmError::Validation(_))));
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["ecscm", "configs", "--json", "--config", "ecscm.toml"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("ecscm.toml")));
        assert!(matches!(cli.command, Some(Commands::Configs { json: true, .. })));
    }

    #[test]
    fn default_config_is_valid() {
        let config = ecscm_config::load_and_validate_str("").expect("defaults should be valid");
        assert_eq!(config.cgi.plugin, "ECSCM");
        assert!(connect(config).is_ok());
    }
}
