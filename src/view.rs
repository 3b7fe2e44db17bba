/*============================================================
  Synavera Project: Footer-Core
  Module: footer_core::view
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Compose configuration, resolved versions, custom links and
    the layout plan into the footer document, and render that
    document as an HTML fragment or JSON.

  Security / Safety Notes:
    Every configured or fetched string is escaped before it is
    placed in markup. Output goes to operator-chosen paths.

  Dependencies:
    serde for JSON output, htmlize for escaping.

  Operational Scope:
    Final stage of the runtime; consumed by the page layout.

  Revision History:
    2026-10-16 COD  Reworked the manifest builder into the
                    footer document builder.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Wiring only; layout and link policy live elsewhere
    - Deterministic output for identical inputs
============================================================*/

use std::fmt::{self, Write as _};
use std::fs::File;
use std::io::Write as _;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use htmlize::{escape_attribute, escape_text};
use serde::Serialize;

use crate::config::FooterCoreConfig;
use crate::error::{FooterError, Result};
use crate::layout::{compute_column_template, GridTrack, LayoutSpec};
use crate::links::{CustomLink, CustomLinksGroup, LinksState, StaticLinkEntry, BRAND_LINKS};
use crate::query::QueryState;
use crate::session::SourceSnapshot;
use crate::version::{BackendVersion, VersionResolver};

/// Breakpoint at which the wide layout applies.
const WIDE_MEDIA_QUERY: &str = "(min-width: 62em)";

/// Full footer document.
#[derive(Debug, Serialize)]
pub struct FooterDocument {
    pub metadata: FooterMetadata,
    pub widgets: Vec<Widget>,
    pub brand: BrandBlock,
    pub backend: VersionLine,
    pub frontend: Option<VersionLink>,
    pub issue_url: String,
    pub layout: LayoutSpec,
    pub custom_groups: Vec<CustomLinksGroup>,
}

/// Source diagnostics carried with the document.
#[derive(Debug, Serialize)]
pub struct FooterMetadata {
    pub generated_at: String,
    pub generated_by: String,
    pub backend_version: SourceStatus,
    pub custom_links: SourceStatus,
    pub custom_links_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Disabled,
    Pending,
    Ready,
    Failed,
}

/// Externally rendered sub-widgets, emitted as mount points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Widget {
    ColorModeToggle,
    IndexingAlert,
    AddToWallet,
}

impl Widget {
    fn mount_id(self) -> &'static str {
        match self {
            Widget::ColorModeToggle => "color-mode-toggle",
            Widget::IndexingAlert => "indexing-alert",
            Widget::AddToWallet => "add-to-wallet",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BrandBlock {
    pub name: String,
    pub site_url: String,
    pub site_label: String,
    pub description: String,
    pub links: Vec<StaticLinkEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionLink {
    pub label: String,
    pub url: String,
}

/// Backend line: only shown once the version has arrived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum VersionLine {
    Hidden,
    Pending,
    Shown(VersionLink),
}

/// Builds the footer document; holds no state of its own.
pub struct FooterView<'a> {
    config: &'a FooterCoreConfig,
    page_url: Option<&'a str>,
}

impl<'a> FooterView<'a> {
    pub fn new(config: &'a FooterCoreConfig) -> Self {
        Self {
            config,
            page_url: None,
        }
    }

    pub fn with_page_url(mut self, page_url: Option<&'a str>) -> Self {
        self.page_url = page_url;
        self
    }

    pub fn compose(&self, sources: &SourceSnapshot) -> FooterDocument {
        let resolver = VersionResolver::new(&self.config.repositories, &self.config.footer)
            .with_page_url(self.page_url);
        let version = sources.backend_version();

        let backend = match (&sources.version, resolver.resolve_api_version_url(version)) {
            (_, Some(url)) => VersionLine::Shown(VersionLink {
                label: version.map(BackendVersion::to_string).unwrap_or_default(),
                url,
            }),
            (QueryState::Pending, None) => VersionLine::Pending,
            _ => VersionLine::Hidden,
        };

        let frontend = resolver
            .resolve_frontend_version_url()
            .map(|url| VersionLink {
                label: self
                    .config
                    .footer
                    .frontend_version()
                    .or_else(|| self.config.footer.frontend_commit())
                    .unwrap_or_default()
                    .to_string(),
                url,
            });

        let mut widgets = vec![Widget::ColorModeToggle];
        if !self.config.indexing_alert.is_hidden {
            widgets.push(Widget::IndexingAlert);
        }
        widgets.push(Widget::AddToWallet);

        let links = &sources.links;
        let layout = compute_column_template(links.group_count(), links.shapes_layout());
        let brand = &self.config.brand;

        FooterDocument {
            metadata: FooterMetadata {
                generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                generated_by: "footer_core".to_string(),
                backend_version: version_status(&sources.version),
                custom_links: links_status(links),
                custom_links_error: links.error().map(ToString::to_string),
            },
            widgets,
            brand: BrandBlock {
                name: brand.name.clone(),
                site_url: brand.site_url.clone(),
                site_label: brand.site_label.clone(),
                description: brand.description.clone(),
                links: BRAND_LINKS.to_vec(),
            },
            backend,
            frontend,
            issue_url: resolver.resolve_issue_url(version),
            layout,
            custom_groups: links.data().map(<[CustomLinksGroup]>::to_vec).unwrap_or_default(),
        }
    }
}

fn version_status(state: &QueryState<BackendVersion>) -> SourceStatus {
    match state {
        QueryState::Idle => SourceStatus::Disabled,
        QueryState::Pending => SourceStatus::Pending,
        QueryState::Ready(_) => SourceStatus::Ready,
        QueryState::Failed(_) => SourceStatus::Failed,
    }
}

fn links_status(state: &LinksState) -> SourceStatus {
    match state {
        LinksState::Disabled => SourceStatus::Disabled,
        LinksState::Loading => SourceStatus::Pending,
        LinksState::Loaded(_) => SourceStatus::Ready,
        LinksState::Failed(_) => SourceStatus::Failed,
    }
}

/// Render the document as a self-contained HTML fragment.
pub fn render_html(document: &FooterDocument) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    if write_footer(&mut out, document).is_err() {
        out.clear();
    }
    out
}

fn write_footer(out: &mut String, document: &FooterDocument) -> fmt::Result {
    let layout = &document.layout;

    out.push_str("<style>\n");
    write_grid_rule(out, ".footer-links", &layout.container.compact)?;
    write_grid_rule(out, ".footer-brand-links", &layout.brand.compact)?;
    writeln!(out, "@media {WIDE_MEDIA_QUERY} {{")?;
    write_grid_rule(out, ".footer-links", &layout.container.wide)?;
    write_grid_rule(out, ".footer-brand-links", &layout.brand.wide)?;
    out.push_str("}\n</style>\n");

    out.push_str("<footer class=\"footer\">\n<div class=\"footer-main\">\n");
    out.push_str("<div class=\"footer-widgets\">");
    for widget in &document.widgets {
        write!(out, "<div data-widget=\"{}\"></div>", widget.mount_id())?;
    }
    out.push_str("</div>\n");

    let brand = &document.brand;
    writeln!(
        out,
        "<a class=\"footer-site\" href=\"{}\">{}</a>",
        escape_attribute(brand.site_url.as_str()),
        escape_text(brand.site_label.as_str())
    )?;
    writeln!(
        out,
        "<p class=\"footer-description\">{}</p>",
        escape_text(brand.description.as_str())
    )?;

    out.push_str("<div class=\"footer-versions\">\n");
    match &document.backend {
        VersionLine::Shown(link) => writeln!(out, "<p>Backend: {}</p>", external_link(link))?,
        VersionLine::Pending => {
            out.push_str("<p>Backend: <span class=\"footer-skeleton\" aria-busy=\"true\"></span></p>\n");
        }
        VersionLine::Hidden => {}
    }
    if let Some(link) = &document.frontend {
        writeln!(out, "<p>Frontend: {}</p>", external_link(link))?;
    }
    writeln!(
        out,
        "<p><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">Report an issue</a></p>",
        escape_attribute(document.issue_url.as_str())
    )?;
    out.push_str("</div>\n</div>\n");

    out.push_str("<div class=\"footer-links\">\n");
    let width = if layout.brand_full_width { "100%" } else { "160px" };
    writeln!(
        out,
        "<div class=\"footer-brand\" style=\"min-width: 160px; width: {width}\">"
    )?;
    if layout.brand_heading {
        writeln!(
            out,
            "<p class=\"footer-group-title\">{}</p>",
            escape_text(brand.name.as_str())
        )?;
    }
    out.push_str("<div class=\"footer-brand-links\">\n");
    for link in &brand.links {
        write_static_link(out, link)?;
    }
    out.push_str("</div>\n</div>\n");

    for group in &document.custom_groups {
        out.push_str("<div class=\"footer-group\">\n");
        if let Some(title) = &group.title {
            writeln!(
                out,
                "<p class=\"footer-group-title\">{}</p>",
                escape_text(title.as_str())
            )?;
        }
        for link in &group.links {
            write_custom_link(out, link)?;
        }
        out.push_str("</div>\n");
    }
    out.push_str("</div>\n</footer>\n");
    Ok(())
}

fn write_grid_rule(out: &mut String, selector: &str, track: &GridTrack) -> fmt::Result {
    writeln!(
        out,
        "{selector} {{ display: grid; grid-template-columns: {}; grid-template-rows: {}; grid-auto-flow: {}; }}",
        track.columns, track.rows, track.auto_flow
    )
}

fn external_link(link: &VersionLink) -> String {
    format!(
        "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
        escape_attribute(link.url.as_str()),
        escape_text(link.label.as_str())
    )
}

fn write_static_link(out: &mut String, link: &StaticLinkEntry) -> fmt::Result {
    writeln!(
        out,
        "<a class=\"footer-link\" href=\"{}\" target=\"_blank\" data-icon=\"{}\" data-icon-size=\"{}\">{}</a>",
        escape_attribute(link.url),
        link.icon,
        link.icon_size,
        escape_text(link.text)
    )
}

fn write_custom_link(out: &mut String, link: &CustomLink) -> fmt::Result {
    write!(
        out,
        "<a class=\"footer-link\" href=\"{}\" target=\"_blank\"",
        escape_attribute(link.url.as_str())
    )?;
    if let Some(icon) = &link.icon {
        write!(out, " data-icon=\"{}\"", escape_attribute(icon.as_str()))?;
    }
    if let Some(size) = &link.icon_size {
        write!(out, " data-icon-size=\"{}\"", escape_attribute(size.as_str()))?;
    }
    writeln!(out, ">{}</a>", escape_text(link.text.as_str()))
}

/// Render the document as pretty JSON.
pub fn render_json(document: &FooterDocument) -> Result<String> {
    serde_json::to_string_pretty(document)
        .map_err(|err| FooterError::Serialization(format!("Failed to encode footer: {err}")))
}

/// Persist rendered output to the given path.
pub fn write_output(contents: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| {
            FooterError::Filesystem(format!(
                "Failed to create output directory {}: {err}",
                parent.display()
            ))
        })?;
    }
    let mut file = File::create(path).map_err(|err| {
        FooterError::Filesystem(format!(
            "Failed to create output file {}: {err}",
            path.display()
        ))
    })?;
    file.write_all(contents.as_bytes()).map_err(|err| {
        FooterError::Filesystem(format!("Failed to write output {}: {err}", path.display()))
    })?;
    Ok(())
}
