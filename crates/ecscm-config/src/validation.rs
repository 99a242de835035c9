// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::{EcscmConfig, EDITOR_PLACEHOLDER, PLUGIN_PLACEHOLDER};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_config(config: &EcscmConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let url = config.server.url.trim();
    if url.is_empty() {
        fail("server.url must not be empty".to_string());
    } else if !(url.starts_with("http://") || url.starts_with("https://")) {
        fail(format!("server.url `{url}` must start with http:// or https://"));
    }

    if config.server.timeout_secs == 0 {
        fail("server.timeout_secs must be at least 1".to_string());
    }

    if config.server.password.is_some() && config.server.user.is_none() {
        fail("server.password is set but server.user is not".to_string());
    }

    for (key, value) in [
        ("cgi.plugin", &config.cgi.plugin),
        ("cgi.script", &config.cgi.script),
        ("cgi.monitor_script", &config.cgi.monitor_script),
    ] {
        if value.trim().is_empty() {
            fail(format!("{key} must not be empty"));
        } else if value.contains('/') {
            fail(format!("{key} `{value}` must be a single path segment"));
        }
    }

    let template = &config.editors.form_path_template;
    for placeholder in [PLUGIN_PLACEHOLDER, EDITOR_PLACEHOLDER] {
        if !template.contains(placeholder) {
            fail(format!(
                "editors.form_path_template `{template}` is missing the {placeholder} placeholder"
            ));
        }
    }
    if !template.starts_with('/') {
        fail(format!("editors.form_path_template `{template}` must be an absolute property path"));
    }

    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        fail(format!(
            "logging.level `{}` must be one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
