// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Web UI link construction.

use ecscm_core::EcscmError;
use url::{Url, form_urlencoded};

/// Builds links into the server's web UI.
///
/// Links are absolute when a base url is set and root-relative otherwise,
/// which is what the UI itself expects in `redirectTo` parameters.
#[derive(Debug, Clone, Default)]
pub struct LinkBuilder {
    base: Option<String>,
}

impl LinkBuilder {
    /// Links rooted at `/`.
    pub fn relative() -> Self {
        Self::default()
    }

    /// Links prefixed with `base`.
    pub fn absolute(base: &str) -> Result<Self, EcscmError> {
        let parsed = Url::parse(base)
            .map_err(|e| EcscmError::Config(format!("invalid link base '{base}': {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(EcscmError::Config(format!("link base '{base}' cannot be used as a base")));
        }
        Ok(Self {
            base: Some(parsed.as_str().trim_end_matches('/').to_string()),
        })
    }

    /// `/commander/link/<page>/<segments...>?<params>`
    pub fn link(&self, page: &str, segments: &[&str], params: &[(&str, &str)]) -> String {
        let mut path = vec!["commander", "link", page];
        path.extend_from_slice(segments);
        self.render(&path, params)
    }

    /// `/commander/pages/<plugin>/<page>`
    pub fn page(&self, plugin: &str, page: &str) -> String {
        self.render(&["commander", "pages", plugin, page], &[])
    }

    /// `/commander/<file>?<params>` for the classic PHP pages.
    pub fn url(&self, file: &str, params: &[(&str, &str)]) -> String {
        self.render(&["commander", file], params)
    }

    fn render(&self, segments: &[&str], params: &[(&str, &str)]) -> String {
        let mut out = self.base.clone().unwrap_or_default();
        for segment in segments {
            out.push('/');
            out.push_str(&encode_segment(segment));
        }
        if !params.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params.iter())
                .finish();
            out.push('?');
            out.push_str(&query);
        }
        out
    }
}

/// Percent-encodes one path segment. Spaces become `%20`, not `+`.
fn encode_segment(segment: &str) -> String {
    // `byte_serialize` escapes a literal '+', so every '+' left is a space.
    form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
