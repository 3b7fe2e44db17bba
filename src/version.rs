/*============================================================
  Synavera Project: Footer-Core
  Module: footer_core::version
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Derive display URLs from the queried backend version and
    the configured frontend version: the backend source link,
    the frontend source link and the pre-filled issue form.

  Security / Safety Notes:
    Pure string derivation; no I/O. Query values are percent
    encoded, path segments are passed through verbatim.

  Dependencies:
    urlencoding for query parameter encoding.

  Operational Scope:
    Called by the footer view builder on every render.

  Revision History:
    2026-10-16 COD  Authored version link derivation.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Total functions over present and absent inputs
    - Deterministic output for identical input
============================================================*/

use std::fmt;

use serde::{Deserialize, Serialize};
use urlencoding::encode;

use crate::config::{FooterConfig, RepositoryConfig};

const ISSUE_TEMPLATE: &str = "bug_report.yml";
const ISSUE_LABELS: &str = "triage";

/// Opaque identifier of the deployed backend build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendVersion(String);

impl BackendVersion {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BackendVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds version-dependent links against the configured repositories.
#[derive(Debug, Clone)]
pub struct VersionResolver<'a> {
    repositories: &'a RepositoryConfig,
    footer: &'a FooterConfig,
    page_url: Option<&'a str>,
}

impl<'a> VersionResolver<'a> {
    pub fn new(repositories: &'a RepositoryConfig, footer: &'a FooterConfig) -> Self {
        Self {
            repositories,
            footer,
            page_url: None,
        }
    }

    /// Page the issue report refers to, filled into the `link` field.
    pub fn with_page_url(mut self, page_url: Option<&'a str>) -> Self {
        self.page_url = page_url;
        self
    }

    /// Source tree of the backend build, or `None` until the version is known.
    pub fn resolve_api_version_url(&self, version: Option<&BackendVersion>) -> Option<String> {
        let version = version?;
        Some(format!(
            "{}/tree/{}",
            trim_base(&self.repositories.backend),
            version.as_str()
        ))
    }

    /// "New issue" form with the version context pre-filled. The
    /// `backend-version` field is left blank while the version is absent.
    pub fn resolve_issue_url(&self, version: Option<&BackendVersion>) -> String {
        let frontend = self.frontend_label().unwrap_or_default();
        let mut params: Vec<(&str, &str)> = vec![
            ("template", ISSUE_TEMPLATE),
            ("labels", ISSUE_LABELS),
            ("backend-version", version.map(BackendVersion::as_str).unwrap_or("")),
            ("frontend-version", frontend.as_str()),
        ];
        if let Some(link) = self.page_url {
            params.push(("link", link));
        }

        let query = params
            .iter()
            .map(|(key, value)| format!("{key}={}", encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}/issues/new?{query}", trim_base(&self.repositories.issues))
    }

    /// Source tree of the frontend build, when a version or commit is set.
    pub fn resolve_frontend_version_url(&self) -> Option<String> {
        let reference = self
            .footer
            .frontend_version()
            .or_else(|| self.footer.frontend_commit())?;
        Some(format!(
            "{}/tree/{reference}",
            trim_base(&self.repositories.frontend)
        ))
    }

    /// Display label for the frontend build: `version+commit`, skipping gaps.
    pub fn frontend_label(&self) -> Option<String> {
        let parts: Vec<&str> = [self.footer.frontend_version(), self.footer.frontend_commit()]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("+"))
        }
    }
}

fn trim_base(base: &str) -> &str {
    base.trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repos() -> RepositoryConfig {
        RepositoryConfig {
            backend: "https://git.test/backend/".into(),
            frontend: "https://git.test/frontend".into(),
            issues: "https://git.test/backend".into(),
        }
    }

    fn query_value<'u>(url: &'u str, key: &str) -> Option<&'u str> {
        let (_, query) = url.split_once('?')?;
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    #[test]
    fn api_url_absent_without_version() {
        let repos = repos();
        let footer = FooterConfig::default();
        let resolver = VersionResolver::new(&repos, &footer);
        assert_eq!(resolver.resolve_api_version_url(None), None);
    }

    #[test]
    fn api_url_embeds_version_verbatim() {
        let repos = repos();
        let footer = FooterConfig::default();
        let resolver = VersionResolver::new(&repos, &footer);
        for raw in ["v5.2.0", "v6.0.0.+commit.1a2b3c", "not a version?"] {
            let version = BackendVersion::new(raw);
            let first = resolver.resolve_api_version_url(Some(&version)).unwrap();
            let second = resolver.resolve_api_version_url(Some(&version)).unwrap();
            assert_eq!(first, second);
            assert!(first.contains(raw), "{first} should contain {raw}");
        }
        assert_eq!(
            resolver
                .resolve_api_version_url(Some(&BackendVersion::new("v5.2.0")))
                .as_deref(),
            Some("https://git.test/backend/tree/v5.2.0")
        );
    }

    #[test]
    fn issue_url_without_version_has_blank_field() {
        let repos = repos();
        let footer = FooterConfig::default();
        let url = VersionResolver::new(&repos, &footer).resolve_issue_url(None);
        assert!(url.starts_with("https://git.test/backend/issues/new?"));
        assert_eq!(query_value(&url, "backend-version"), Some(""));
        assert_eq!(query_value(&url, "template"), Some("bug_report.yml"));
        assert_eq!(query_value(&url, "link"), None);
    }

    #[test]
    fn issue_url_carries_encoded_context() {
        let repos = repos();
        let footer = FooterConfig {
            frontend_version: Some("v1.4.0".into()),
            frontend_commit: Some("deadbeef".into()),
            links: None,
        };
        let url = VersionResolver::new(&repos, &footer)
            .with_page_url(Some("https://explorer.test/tx/0x1?tab=logs"))
            .resolve_issue_url(Some(&BackendVersion::new("v5.2.0")));
        assert_eq!(query_value(&url, "backend-version"), Some("v5.2.0"));
        assert_eq!(query_value(&url, "frontend-version"), Some("v1.4.0%2Bdeadbeef"));
        assert_eq!(
            query_value(&url, "link"),
            Some("https%3A%2F%2Fexplorer.test%2Ftx%2F0x1%3Ftab%3Dlogs")
        );
    }

    #[test]
    fn frontend_url_prefers_version_over_commit() {
        let repos = repos();
        let only_commit = FooterConfig {
            frontend_commit: Some("deadbeef".into()),
            ..FooterConfig::default()
        };
        let resolver = VersionResolver::new(&repos, &only_commit);
        assert_eq!(
            resolver.resolve_frontend_version_url().as_deref(),
            Some("https://git.test/frontend/tree/deadbeef")
        );
        assert_eq!(resolver.frontend_label().as_deref(), Some("deadbeef"));

        let neither = FooterConfig::default();
        let resolver = VersionResolver::new(&repos, &neither);
        assert_eq!(resolver.resolve_frontend_version_url(), None);
        assert_eq!(resolver.frontend_label(), None);
    }
}
