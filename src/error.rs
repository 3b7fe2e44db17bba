/*============================================================
  Synavera Project: Footer-Core
  Module: footer_core::error
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Centralise Footer-Core error types: process-level failures
    with exit semantics, and the cacheable per-source failures
    that degrade the footer instead of aborting it.

  Security / Safety Notes:
    Error contexts expose URLs and paths only; response bodies
    are never echoed back into diagnostics.

  Dependencies:
    thiserror for ergonomic error definitions.

  Operational Scope:
    Used across modules to propagate recoverable failures and
    consolidate exit codes for the binary entry point.

  Revision History:
    2026-10-16 COD  Split source failures from process failures.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit error taxonomy with actionable context
    - No silent failure paths
    - Stable exit codes for operational tooling
============================================================*/

use std::io;
use std::process::ExitCode;

use thiserror::Error;

/// Result alias for Footer-Core operations.
pub type Result<T> = std::result::Result<T, FooterError>;

/// Enumerates high-level error domains surfaced by Footer-Core.
#[derive(Debug, Error)]
pub enum FooterError {
    #[error("Configuration: {0}")]
    Config(String),
    #[error("Network: {0}")]
    Network(String),
    #[error("Serialization: {0}")]
    Serialization(String),
    #[error("Filesystem: {0}")]
    Filesystem(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl FooterError {
    /// Map error category to a deterministic exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            FooterError::Config(_) => ExitCode::from(20),
            FooterError::Network(_) => ExitCode::from(30),
            FooterError::Serialization(_) => ExitCode::from(31),
            FooterError::Filesystem(_) => ExitCode::from(40),
            FooterError::Io(_) => ExitCode::from(41),
        }
    }
}

/// Failure of one asynchronous footer source.
///
/// Cloneable so a single failed fetch can be cached and handed to every
/// consumer of the same key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("malformed payload from {url}: {reason}")]
    Malformed { url: String, reason: String },
}

impl SourceError {
    /// Short code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            SourceError::Transport { .. } => "TRANSPORT",
            SourceError::Status { .. } => "STATUS",
            SourceError::Malformed { .. } => "MALFORMED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_stable() {
        assert_eq!(
            format!("{:?}", FooterError::Config("x".into()).exit_code()),
            format!("{:?}", ExitCode::from(20))
        );
        assert_eq!(
            format!("{:?}", FooterError::Filesystem("x".into()).exit_code()),
            format!("{:?}", ExitCode::from(40))
        );
    }

    #[test]
    fn source_error_codes_name_the_failure() {
        let err = SourceError::Status {
            url: "https://x/links.json".into(),
            status: 503,
        };
        assert_eq!(err.code(), "STATUS");
        assert_eq!(err.to_string(), "https://x/links.json answered with status 503");
    }
}
