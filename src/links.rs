/*============================================================
  Synavera Project: Footer-Core
  Module: footer_core::links
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Static brand links and the operator-supplied custom link
    groups: payload validation and the session-cached loader.

  Security / Safety Notes:
    Remote payloads are untrusted; they are validated against a
    fixed shape and escaped at render time.

  Dependencies:
    serde / serde_json for payload parsing.

  Operational Scope:
    Feeds the layout planner and the footer view builder.

  Revision History:
    2026-10-16 COD  Authored custom links loader.
  ------------------------------------------------------------
  SSE Principles Observed:
    - No request issued unless a links URL is configured
    - Failures kept distinct from the disabled state
============================================================*/

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SourceError;
use crate::query::{QueryCache, QueryState, FOOTER_LINKS_KEY};

/// One hard-coded brand link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StaticLinkEntry {
    pub icon: &'static str,
    pub icon_size: &'static str,
    pub text: &'static str,
    pub url: &'static str,
}

pub const BRAND_LINKS: [StaticLinkEntry; 4] = [
    StaticLinkEntry {
        icon: "social/git",
        icon_size: "18px",
        text: "Contribute",
        url: "https://github.com/Doric-Blockchain/doric-explorer-frontend",
    },
    StaticLinkEntry {
        icon: "social/tweet",
        icon_size: "18px",
        text: "Twitter",
        url: "https://twitter.com/DoricOfficial",
    },
    StaticLinkEntry {
        icon: "social/telegram_filled",
        icon_size: "18px",
        text: "Telegram",
        url: "https://t.me/doricnetwork",
    },
    StaticLinkEntry {
        icon: "discussions",
        icon_size: "20px",
        text: "Discussions",
        url: "https://github.com/orgs/Doric-Blockchain/discussions",
    },
];

/// A remote link group. Fields this crate does not know are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomLinksGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub links: Vec<CustomLink>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomLink {
    pub text: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(
        default,
        rename = "iconSize",
        alias = "icon_size",
        skip_serializing_if = "Option::is_none"
    )]
    pub icon_size: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Validate a links document fetched from `url`. Link targets must be
/// `http(s)` or relative; any other scheme rejects the whole document.
pub fn parse_links_payload(url: &str, body: &[u8]) -> Result<Vec<CustomLinksGroup>, SourceError> {
    let groups: Vec<CustomLinksGroup> =
        serde_json::from_slice(body).map_err(|err| SourceError::Malformed {
            url: url.to_string(),
            reason: err.to_string(),
        })?;

    let unsafe_target = groups
        .iter()
        .flat_map(|group| &group.links)
        .find(|link| !is_safe_href(&link.url));
    if let Some(link) = unsafe_target {
        return Err(SourceError::Malformed {
            url: url.to_string(),
            reason: format!("link `{}` has a disallowed URL scheme", link.text),
        });
    }
    Ok(groups)
}

/// `http`, `https` or scheme-less. Browsers ignore whitespace and control
/// characters inside a scheme, so they are stripped before the check.
fn is_safe_href(href: &str) -> bool {
    let head = href.split(['/', '?', '#']).next().unwrap_or_default();
    let head: String = head
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .collect();
    match head.split_once(':') {
        None => true,
        Some((scheme, _)) => {
            scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
        }
    }
}

/// Anything able to fetch the remote links document.
pub trait LinksSource {
    async fn fetch_links(&self, url: &str) -> Result<Vec<CustomLinksGroup>, SourceError>;
}

/// What the footer knows about the custom links at a given moment.
#[derive(Debug, Clone, PartialEq)]
pub enum LinksState {
    /// No links URL configured; nothing is ever fetched.
    Disabled,
    Loading,
    Loaded(Vec<CustomLinksGroup>),
    Failed(SourceError),
}

impl LinksState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LinksState::Loading)
    }

    pub fn data(&self) -> Option<&[CustomLinksGroup]> {
        match self {
            LinksState::Loaded(groups) => Some(groups),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SourceError> {
        match self {
            LinksState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Whether the layout should reserve columns for link groups.
    /// A failed fetch degrades to the unconfigured layout.
    pub fn shapes_layout(&self) -> bool {
        matches!(self, LinksState::Loading | LinksState::Loaded(_))
    }

    pub fn group_count(&self) -> Option<usize> {
        self.data().map(<[CustomLinksGroup]>::len)
    }
}

/// Loads custom links through the session cache.
pub struct CustomLinksLoader<'a, S> {
    source: &'a S,
    cache: &'a QueryCache<Vec<CustomLinksGroup>>,
}

impl<'a, S: LinksSource> CustomLinksLoader<'a, S> {
    pub fn new(source: &'a S, cache: &'a QueryCache<Vec<CustomLinksGroup>>) -> Self {
        Self { source, cache }
    }

    /// Resolve the links for `url`. Blank or absent URLs are `Disabled`
    /// without touching the source.
    pub async fn load_custom_links(&self, url: Option<&str>) -> LinksState {
        let Some(url) = enabled_url(url) else {
            return LinksState::Disabled;
        };
        self.cache
            .fetch(&cache_key(url), || self.source.fetch_links(url))
            .await
            .into()
    }

    /// Current state without waiting or fetching.
    pub fn snapshot(&self, url: Option<&str>) -> LinksState {
        let Some(url) = enabled_url(url) else {
            return LinksState::Disabled;
        };
        match self.cache.state(&cache_key(url)) {
            QueryState::Idle | QueryState::Pending => LinksState::Loading,
            QueryState::Ready(groups) => LinksState::Loaded(groups),
            QueryState::Failed(err) => LinksState::Failed(err),
        }
    }
}

impl From<Result<Vec<CustomLinksGroup>, SourceError>> for LinksState {
    fn from(outcome: Result<Vec<CustomLinksGroup>, SourceError>) -> Self {
        match outcome {
            Ok(groups) => LinksState::Loaded(groups),
            Err(err) => LinksState::Failed(err),
        }
    }
}

fn enabled_url(url: Option<&str>) -> Option<&str> {
    url.map(str::trim).filter(|url| !url.is_empty())
}

fn cache_key(url: &str) -> String {
    format!("{FOOTER_LINKS_KEY}:{url}")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory links source that counts requests.
    pub(crate) struct FakeLinks {
        pub calls: AtomicUsize,
        pub body: Vec<u8>,
        pub delay: Duration,
    }

    impl FakeLinks {
        pub(crate) fn with_body(body: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                body: body.as_bytes().to_vec(),
                delay: Duration::from_millis(0),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl LinksSource for FakeLinks {
        async fn fetch_links(&self, url: &str) -> Result<Vec<CustomLinksGroup>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            parse_links_payload(url, &self.body)
        }
    }

    pub(crate) const TWO_GROUPS: &str = r#"[
        {"title": "A", "links": [{"text": "Docs", "url": "https://a.test/docs"}]},
        {"title": "B", "links": [{"text": "Status", "url": "https://b.test", "iconSize": "16px"}]}
    ]"#;

    #[test]
    fn payload_keeps_unknown_fields() {
        let groups = parse_links_payload(
            "https://x/links.json",
            br#"[{"title": "A", "order": 2, "links": [{"text": "t", "url": "https://u", "rel": "me"}]}]"#,
        )
        .unwrap();
        assert_eq!(groups[0].extra.get("order"), Some(&Value::from(2)));
        assert_eq!(groups[0].links[0].extra.get("rel"), Some(&Value::from("me")));
    }

    #[test]
    fn untitled_group_is_accepted() {
        let groups =
            parse_links_payload("https://x", br#"[{"links": []}]"#).unwrap();
        assert_eq!(groups[0].title, None);
        assert!(groups[0].links.is_empty());
    }

    #[test]
    fn payload_shape_violations_are_malformed() {
        for body in [
            r#"{"title": "A", "links": []}"#,
            r#"[{"title": "A"}]"#,
            r#"[{"links": [{"text": "no url"}]}]"#,
            r#"[{"links": [{"text": 1, "url": "https://u"}]}]"#,
            "not json",
        ] {
            let err = parse_links_payload("https://x", body.as_bytes()).unwrap_err();
            assert_eq!(err.code(), "MALFORMED", "{body}");
        }
    }

    #[test]
    fn link_targets_must_be_http_or_relative() {
        for href in [
            "javascript:alert(document.cookie)",
            "JavaScript:alert(1)",
            " java\tscript:alert(1)",
            "data:text/html,<b>x</b>",
            "vbscript:msgbox(1)",
        ] {
            let body = serde_json::json!([{"links": [{"text": "x", "url": href}]}]).to_string();
            let err = parse_links_payload("https://x", body.as_bytes()).unwrap_err();
            assert_eq!(err.code(), "MALFORMED", "{href}");
        }

        for href in ["https://a.test", "HTTP://a.test", "/docs", "docs?a=b:c", "#top"] {
            let body = serde_json::json!([{"links": [{"text": "x", "url": href}]}]).to_string();
            assert!(parse_links_payload("https://x", body.as_bytes()).is_ok(), "{href}");
        }
    }

    #[tokio::test]
    async fn absent_url_is_disabled_without_requests() {
        let source = FakeLinks::with_body(TWO_GROUPS);
        let cache = QueryCache::new();
        let loader = CustomLinksLoader::new(&source, &cache);

        for url in [None, Some(""), Some("   ")] {
            let state = loader.load_custom_links(url).await;
            assert_eq!(state, LinksState::Disabled);
            assert!(!state.is_loading());
            assert!(state.data().is_none());
            assert_eq!(loader.snapshot(url), LinksState::Disabled);
        }
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn concurrent_loads_issue_one_request() {
        let mut source = FakeLinks::with_body(TWO_GROUPS);
        source.delay = Duration::from_millis(20);
        let cache = QueryCache::new();
        let loader = CustomLinksLoader::new(&source, &cache);
        let url = Some("https://x/links.json");

        assert!(loader.snapshot(url).is_loading());
        let (first, second) = tokio::join!(loader.load_custom_links(url), loader.load_custom_links(url));
        assert_eq!(first, second);
        assert_eq!(first.group_count(), Some(2));
        assert_eq!(source.calls(), 1);

        let again = loader.load_custom_links(url).await;
        assert_eq!(again.group_count(), Some(2));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn malformed_payload_is_a_visible_failure() {
        let source = FakeLinks::with_body(r#"{"unexpected": true}"#);
        let cache = QueryCache::new();
        let loader = CustomLinksLoader::new(&source, &cache);

        let state = loader.load_custom_links(Some("https://x/links.json")).await;
        assert!(state.error().is_some());
        assert!(!state.is_loading());
        assert!(state.data().is_none());
        assert!(!state.shapes_layout());
        assert_ne!(state, LinksState::Disabled);
    }
}
