/*============================================================
  Synavera Project: Syn-HLE
  Module: synhle_core::error
  Etiquette: Synavera Script Etiquette (Rust Profile v1.1.1)
  ------------------------------------------------------------
  Purpose:
    Centralise Syn-HLE error types so both reconciliation
    pipelines report failures in one vocabulary with stable
    exit semantics.

  Security / Safety Notes:
    Error contexts carry paths and command names only; raw
    platform payloads are trimmed before being surfaced.

  Dependencies:
    thiserror for ergonomic error definitions.

  Operational Scope:
    Used across modules to propagate recoverable failures and
    consolidate exit codes for the binary entry point.

  Revision History:
    2026-03-02 COD  Established shared error definitions.
    2026-04-18 COD  Added repair and acquisition outcomes.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit error taxonomy with actionable context
    - No silent failure paths
    - Stable exit codes for operational tooling
============================================================*/

use std::io;
use std::process::ExitCode;

use thiserror::Error;

use crate::arch::ArchitectureVariant;

/// Result alias for Syn-HLE operations.
pub type Result<T> = std::result::Result<T, HleError>;

/// Enumerates high-level error domains surfaced by Syn-HLE.
#[derive(Debug, Error)]
pub enum HleError {
    #[error("Required command `{command}` not found in PATH")]
    CommandMissing { command: String },
    #[error("Command `{command}` failed with status {status}: {stderr}")]
    CommandFailure {
        command: String,
        status: i32,
        stderr: String,
    },
    #[error("`{operation}` did not finish within {seconds}s")]
    Timeout { operation: String, seconds: u64 },
    #[error("Configuration: {0}")]
    Config(String),
    #[error("Network: {0}")]
    Network(String),
    #[error("Serialization: {0}")]
    Serialization(String),
    #[error("Filesystem: {0}")]
    Filesystem(String),
    #[error("Core acquisition: {0}")]
    Acquisition(String),
    #[error(
        "Core is still {plugin} but RetroArch runs as {host} after one repair; \
         clear the Rosetta preference for RetroArch (--reset-translation) and retry"
    )]
    MismatchAfterRepair {
        plugin: ArchitectureVariant,
        host: ArchitectureVariant,
    },
    #[error("Launch: {0}")]
    Launch(String),
    #[error("Runtime: {0}")]
    Runtime(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl HleError {
    /// Map error category to a deterministic exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            HleError::CommandMissing { .. } => ExitCode::from(10),
            HleError::CommandFailure { .. } => ExitCode::from(11),
            HleError::Timeout { .. } => ExitCode::from(12),
            HleError::Config(_) => ExitCode::from(20),
            HleError::Network(_) => ExitCode::from(30),
            HleError::Serialization(_) => ExitCode::from(31),
            HleError::Filesystem(_) => ExitCode::from(40),
            HleError::Io(_) => ExitCode::from(41),
            HleError::Acquisition(_) => ExitCode::from(60),
            HleError::MismatchAfterRepair { .. } => ExitCode::from(61),
            HleError::Launch(_) => ExitCode::from(70),
            HleError::Runtime(_) => ExitCode::from(50),
        }
    }
}
