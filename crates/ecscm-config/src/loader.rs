// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./ecscm.toml` > `~/.config/ecscm/ecscm.toml` >
//! `/etc/ecscm/ecscm.toml`, with `ECSCM_` environment variables on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::EcscmConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/ecscm/ecscm.toml";
/// Config file in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "ecscm.toml";

/// Per-user config file under the XDG config dir, if one can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ecscm").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/ecscm/ecscm.toml`
/// 3. `~/.config/ecscm/ecscm.toml`
/// 4. `./ecscm.toml`
/// 5. `ECSCM_*` environment variables
pub fn load_config() -> Result<EcscmConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string on top of the defaults only.
pub fn load_config_from_str(toml_content: &str) -> Result<EcscmConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EcscmConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file (e.g. `--config`) plus env overrides.
pub fn load_config_from_path(path: &Path) -> Result<EcscmConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EcscmConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The full provider stack used by [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(EcscmConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Top-level tables that environment variables may target.
const SECTIONS: [&str; 4] = ["server", "cgi", "editors", "logging"];

/// `ECSCM_<SECTION>_<KEY>` to `section.key`.
///
/// Only the first underscore after the section name is a separator, so
/// `ECSCM_SERVER_TIMEOUT_SECS` becomes `server.timeout_secs`. Variables that
/// name no section (such as `ECSCM_CREDENTIAL_PASSWORD`) are not configuration
/// and are skipped.
fn env_provider() -> Env {
    Env::prefixed("ECSCM_")
        .filter(|key| section_key(key.as_str()).is_some())
        .map(|key| section_key(key.as_str()).unwrap_or_default().into())
}

/// Dotted figment key for an unprefixed variable name, if it names a section.
fn section_key(name: &str) -> Option<String> {
    let name = name.to_ascii_lowercase();
    SECTIONS.iter().find_map(|section| {
        name.strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
            .filter(|rest| !rest.is_empty())
            .map(|rest| format!("{section}.{rest}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_vars_map_to_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("ECSCM_SERVER_URL", "http://from-env:8000");
            jail.set_env("ECSCM_SERVER_TIMEOUT_SECS", "5");
            jail.set_env("ECSCM_CGI_MONITOR_SCRIPT", "watch.cgi");

            let config: EcscmConfig = Figment::new()
                .merge(Serialized::defaults(EcscmConfig::default()))
                .merge(env_provider())
                .extract()?;

            assert_eq!(config.server.url, "http://from-env:8000");
            assert_eq!(config.server.timeout_secs, 5);
            assert_eq!(config.cgi.monitor_script, "watch.cgi");
            Ok(())
        });
    }

    #[test]
    fn non_config_variables_are_ignored() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("ECSCM_CREDENTIAL_PASSWORD", "hunter2");
            jail.set_env("ECSCM_LOGGING_LEVEL", "debug");

            let config: EcscmConfig = Figment::new()
                .merge(Serialized::defaults(EcscmConfig::default()))
                .merge(env_provider())
                .extract()?;

            assert_eq!(config.logging.level, "debug");
            assert_eq!(config, EcscmConfig {
                logging: config.logging.clone(),
                ..EcscmConfig::default()
            });
            Ok(())
        });
    }

    #[test]
    fn full_hierarchy_applies_env_overrides() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("XDG_CONFIG_HOME", jail.directory().display().to_string());
            jail.create_file(LOCAL_CONFIG_FILE, "[server]\nurl = \"http://from-file:8000\"\n")?;
            jail.set_env("ECSCM_SERVER_USER", "builder");
            jail.set_env("ECSCM_CREDENTIAL_PASSWORD", "hunter2");

            let config: EcscmConfig = build_figment().extract()?;
            assert_eq!(config.server.url, "http://from-file:8000");
            assert_eq!(config.server.user.as_deref(), Some("builder"));
            Ok(())
        });
    }

    #[test]
    fn section_keys_are_case_insensitive() {
        assert_eq!(section_key("SERVER_TIMEOUT_SECS").as_deref(), Some("server.timeout_secs"));
        assert_eq!(section_key("cgi_plugin").as_deref(), Some("cgi.plugin"));
        assert_eq!(section_key("CREDENTIAL_PASSWORD"), None);
        assert_eq!(section_key("SERVERURL"), None);
        assert_eq!(section_key("SERVER_"), None);
    }

    #[test]
    fn local_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                LOCAL_CONFIG_FILE,
                r#"
[cgi]
plugin = "ECSCM-2.3"
"#,
            )?;

            let config: EcscmConfig = Figment::new()
                .merge(Serialized::defaults(EcscmConfig::default()))
                .merge(Toml::file(LOCAL_CONFIG_FILE))
                .extract()?;

            assert_eq!(config.cgi.plugin, "ECSCM-2.3");
            assert_eq!(config.cgi.script, "ecscm.cgi");
            Ok(())
        });
    }
}
