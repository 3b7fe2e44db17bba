/*============================================================
  Synavera Project: Footer-Core
  Module: footer_core::layout
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Compute the footer grid arrangement from the custom link
    group count, for the compact and wide breakpoints.

  Security / Safety Notes:
    Pure computation; no I/O.

  Dependencies:
    serde for serialising the plan alongside the document.

  Operational Scope:
    Called once per render by the footer view builder.

  Revision History:
    2026-10-16 COD  Authored footer layout planner.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Layout policy isolated from markup
    - Total over every group count
============================================================*/

use std::fmt;

use serde::Serialize;

/// Brand grid column cap when no custom links are configured.
pub const MAX_LINKS_COLUMNS: usize = 3;
/// Width of one link column.
pub const LINK_COLUMN_WIDTH_PX: u32 = 160;

/// `grid-template-columns` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnTemplate {
    Auto,
    /// As many fixed-width columns as fit, wrapping.
    AutoFill { width_px: u32 },
    Fixed { count: usize, width_px: u32 },
}

impl ColumnTemplate {
    pub fn count(&self) -> Option<usize> {
        match self {
            ColumnTemplate::Fixed { count, .. } => Some(*count),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnTemplate::Auto => f.write_str("auto"),
            ColumnTemplate::AutoFill { width_px } => write!(f, "repeat(auto-fill, {width_px}px)"),
            // Zero-count repeat() is invalid CSS.
            ColumnTemplate::Fixed { count: 0, .. } => f.write_str("auto"),
            ColumnTemplate::Fixed { count, width_px } => write!(f, "repeat({count}, {width_px}px)"),
        }
    }
}

/// `grid-template-rows` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowTemplate {
    Auto,
    Fixed(usize),
}

impl fmt::Display for RowTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowTemplate::Auto => f.write_str("auto"),
            RowTemplate::Fixed(rows) => write!(f, "repeat({rows}, auto)"),
        }
    }
}

/// `grid-auto-flow` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoFlow {
    Row,
    Column,
}

impl fmt::Display for AutoFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AutoFlow::Row => "row",
            AutoFlow::Column => "column",
        })
    }
}

/// One grid at one breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridTrack {
    pub columns: ColumnTemplate,
    pub rows: RowTemplate,
    pub auto_flow: AutoFlow,
}

impl GridTrack {
    fn flowing(columns: ColumnTemplate) -> Self {
        Self {
            columns,
            rows: RowTemplate::Auto,
            auto_flow: AutoFlow::Row,
        }
    }
}

/// A grid at both breakpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Responsive {
    pub compact: GridTrack,
    pub wide: GridTrack,
}

/// Resolved footer grid parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutSpec {
    /// Grid holding the brand block followed by one column per link group.
    pub container: Responsive,
    /// Grid of the static brand links.
    pub brand: Responsive,
    pub brand_heading: bool,
    pub brand_full_width: bool,
}

impl LayoutSpec {
    /// Column count that governs the wide layout.
    pub fn wide_column_count(&self) -> usize {
        self.container
            .wide
            .columns
            .count()
            .or_else(|| self.brand.wide.columns.count())
            .unwrap_or(1)
    }
}

/// Plan the footer grid. `count` is the number of fetched link groups
/// (`None` while unknown); `configured` is whether a links URL is in effect.
pub fn compute_column_template(count: Option<usize>, configured: bool) -> LayoutSpec {
    let auto_fill = ColumnTemplate::AutoFill {
        width_px: LINK_COLUMN_WIDTH_PX,
    };

    if configured {
        let groups = count.unwrap_or(MAX_LINKS_COLUMNS);
        let single = GridTrack::flowing(ColumnTemplate::Fixed {
            count: 1,
            width_px: LINK_COLUMN_WIDTH_PX,
        });
        LayoutSpec {
            container: Responsive {
                compact: GridTrack::flowing(auto_fill),
                wide: GridTrack::flowing(ColumnTemplate::Fixed {
                    count: groups.saturating_add(1),
                    width_px: LINK_COLUMN_WIDTH_PX,
                }),
            },
            brand: Responsive {
                compact: single,
                wide: single,
            },
            brand_heading: true,
            brand_full_width: false,
        }
    } else {
        LayoutSpec {
            container: Responsive {
                compact: GridTrack::flowing(ColumnTemplate::Auto),
                wide: GridTrack::flowing(ColumnTemplate::Auto),
            },
            brand: Responsive {
                compact: GridTrack::flowing(auto_fill),
                wide: GridTrack {
                    columns: ColumnTemplate::Fixed {
                        count: MAX_LINKS_COLUMNS,
                        width_px: LINK_COLUMN_WIDTH_PX,
                    },
                    rows: RowTemplate::Fixed(2),
                    auto_flow: AutoFlow::Column,
                },
            },
            brand_heading: false,
            brand_full_width: true,
        }
    }
}
