/*============================================================
  Synavera Project: Syn-HLE
  Module: synhle_core::arch::probe
  Etiquette: Synavera Script Etiquette (Rust Profile v1.1.1)
  ------------------------------------------------------------
  Purpose:
    Report which instruction-set variants an executable or
    shared library on disk was built for.

  Security / Safety Notes:
    Read-only; runs `lipo` on macOS and reads at most an ELF
    header elsewhere.

  Dependencies:
    tokio for bounded command execution and file reads.

  Operational Scope:
    Probing is advisory: every failure becomes `Unknown`.

  Revision History:
    2026-03-04 COD  Added lipo and ELF introspection.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Narrow trait seam with a fake for tests
    - Timeouts on every platform call
============================================================*/

use std::path::Path;
use std::time::Duration;

use crate::error::{HleError, Result};
use crate::logger::Logger;

use super::ArchitectureVariant;

/// Platform facility returning the architecture tags of a binary.
pub trait BinaryIntrospector {
    async fn architecture_tags(&self, path: &Path) -> Result<Vec<String>>;
}

/// Probe `path`, folding absence and every failure into `Unknown`.
pub async fn probe_variant<I: BinaryIntrospector>(
    introspector: &I,
    path: &Path,
    logger: &Logger,
) -> ArchitectureVariant {
    if !path.exists() {
        logger.debug("PROBE", format!("{} absent; variant unknown", path.display()));
        return ArchitectureVariant::Unknown;
    }

    match introspector.architecture_tags(path).await {
        Ok(tags) => {
            let variant = ArchitectureVariant::from_tags(&tags);
            logger.debug(
                "PROBE",
                format!("{} tags=[{}] -> {variant}", path.display(), tags.join(" ")),
            );
            variant
        }
        Err(err) => {
            logger.warn("PROBE", format!("Could not inspect {}: {err}", path.display()));
            ArchitectureVariant::Unknown
        }
    }
}

/// Production introspector for the current platform.
pub struct SystemIntrospector {
    timeout: Duration,
}

impl SystemIntrospector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[cfg(target_os = "macos")]
impl BinaryIntrospector for SystemIntrospector {
    async fn architecture_tags(&self, path: &Path) -> Result<Vec<String>> {
        let args = [std::ffi::OsStr::new("-archs"), path.as_os_str()];
        let stdout = crate::command::run_checked("lipo", args, self.timeout).await?;
        Ok(stdout.split_whitespace().map(str::to_string).collect())
    }
}

#[cfg(not(target_os = "macos"))]
impl BinaryIntrospector for SystemIntrospector {
    async fn architecture_tags(&self, path: &Path) -> Result<Vec<String>> {
        use tokio::io::AsyncReadExt;

        let read = async {
            let mut file = tokio::fs::File::open(path).await?;
            let mut header = [0u8; 20];
            file.read_exact(&mut header).await?;
            Ok::<_, std::io::Error>(header)
        };
        let header = tokio::time::timeout(self.timeout, read)
            .await
            .map_err(|_| HleError::Timeout {
                operation: format!("read header of {}", path.display()),
                seconds: self.timeout.as_secs(),
            })??;
        elf_machine_tag(&header)
            .map(|tag| vec![tag.to_string()])
            .ok_or_else(|| HleError::Serialization(format!("{} is not an ELF object", path.display())))
    }
}

/// Architecture tag for the `e_machine` field of an ELF header.
#[cfg_attr(target_os = "macos", allow(dead_code))]
fn elf_machine_tag(header: &[u8; 20]) -> Option<&'static str> {
    const EM_X86_64: u16 = 0x3E;
    const EM_AARCH64: u16 = 0xB7;

    if &header[..4] != b"\x7fELF" {
        return None;
    }
    let machine = match header[5] {
        1 => u16::from_le_bytes([header[18], header[19]]),
        2 => u16::from_be_bytes([header[18], header[19]]),
        _ => return None,
    };
    match machine {
        EM_X86_64 => Some("x86_64"),
        EM_AARCH64 => Some("aarch64"),
        _ => Some("other"),
    }
}
