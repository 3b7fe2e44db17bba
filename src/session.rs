/*============================================================
  Synavera Project: Footer-Core
  Module: footer_core::session
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    One footer session: owns the query caches and drives the
    version query and the custom links fetch concurrently up to
    a deadline.

  Security / Safety Notes:
    Caches live and die with the session; nothing is persisted.

  Dependencies:
    tokio for joining and bounding the two sources.

  Operational Scope:
    Created once per render by the runtime.

  Revision History:
    2026-10-16 COD  Authored footer session.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Either source may settle first, or never
    - Pending sources never block the render
============================================================*/

use std::time::Duration;

use tokio::time::timeout;

use crate::backend::{BackendVersionQuery, VersionSource};
use crate::links::{CustomLinksGroup, CustomLinksLoader, LinksSource, LinksState};
use crate::query::{QueryCache, QueryState};
use crate::version::BackendVersion;

/// What the footer knows once the session stops waiting.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSnapshot {
    pub version: QueryState<BackendVersion>,
    pub links: LinksState,
}

impl SourceSnapshot {
    pub fn backend_version(&self) -> Option<&BackendVersion> {
        self.version.value()
    }
}

#[derive(Default)]
pub struct FooterSession {
    versions: QueryCache<BackendVersion>,
    links: QueryCache<Vec<CustomLinksGroup>>,
}

impl FooterSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run both sources concurrently and return their state once both have
    /// settled or `wait` has elapsed, whichever comes first.
    pub async fn settle<V, L>(
        &self,
        version_source: &V,
        links_source: &L,
        links_url: Option<&str>,
        wait: Duration,
    ) -> SourceSnapshot
    where
        V: VersionSource,
        L: LinksSource,
    {
        let version_query = BackendVersionQuery::new(version_source, &self.versions);
        let links_loader = CustomLinksLoader::new(links_source, &self.links);

        let both = async {
            tokio::join!(
                version_query.load(),
                links_loader.load_custom_links(links_url)
            )
        };
        match timeout(wait, both).await {
            Ok((version, links)) => SourceSnapshot { version, links },
            Err(_) => SourceSnapshot {
                version: version_query.snapshot(),
                links: links_loader.snapshot(links_url),
            },
        }
    }
}
