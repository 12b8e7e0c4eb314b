/*============================================================
  Synavera Project: Syn-HLE
  Module: synhle_core::arch::preferences
  Etiquette: Synavera Script Etiquette (Rust Profile v1.1.1)
  ------------------------------------------------------------
  Purpose:
    Read the settings that force RetroArch onto the Rosetta
    translation layer regardless of what its binary supports.

  Security / Safety Notes:
    Reads through `defaults`; the only writes are explicit
    deletions requested by the operator (--reset-translation).

  Dependencies:
    tokio::process via the command helper.

  Operational Scope:
    Consulted by the host runtime resolver for fat binaries.

  Revision History:
    2026-03-05 COD  Added LSArchitecturePriority and Rosetta
                    marker lookups.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Absent or unreadable preference means "no override"
    - Narrow trait seam with a fake for tests
============================================================*/

use std::path::PathBuf;
use std::time::Duration;

use crate::logger::Logger;

use super::ArchitectureVariant;

/// Domain holding per-application Rosetta markers.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
const ROSETTA_DOMAIN: &str = "com.apple.rosetta";

/// Key store for translation-layer preferences.
pub trait ArchitecturePreferences {
    /// Application-scoped architecture priority, raw as stored.
    async fn architecture_priority(&self) -> Option<String>;

    /// System-scoped marker forcing the translation layer for `app_name`.
    async fn translation_forced(&self, app_name: &str) -> bool;
}

/// First recognised architecture named in a priority value.
///
/// `defaults` prints arrays as `(\n    "x86_64",\n    arm64\n)`, so the value
/// is split on anything that cannot appear in an architecture tag.
pub fn preferred_variant(priority: &str) -> Option<ArchitectureVariant> {
    priority
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .find_map(ArchitectureVariant::from_tag)
}

/// Production preference store backed by `defaults` on macOS.
pub struct SystemPreferences {
    #[cfg_attr(not(target_os = "macos"), allow(dead_code))]
    info_plist: Option<PathBuf>,
    #[cfg_attr(not(target_os = "macos"), allow(dead_code))]
    timeout: Duration,
}

impl SystemPreferences {
    pub fn new(info_plist: Option<PathBuf>, timeout: Duration) -> Self {
        Self {
            info_plist,
            timeout,
        }
    }
}

#[cfg(target_os = "macos")]
impl ArchitecturePreferences for SystemPreferences {
    async fn architecture_priority(&self) -> Option<String> {
        let plist = self.info_plist.as_ref()?;
        let args = [
            std::ffi::OsStr::new("read"),
            plist.as_os_str(),
            std::ffi::OsStr::new("LSArchitecturePriority"),
        ];
        crate::command::run_checked("defaults", args, self.timeout)
            .await
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    async fn translation_forced(&self, app_name: &str) -> bool {
        crate::command::run_bounded("defaults", ["read", ROSETTA_DOMAIN, app_name], self.timeout)
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }
}

#[cfg(not(target_os = "macos"))]
impl ArchitecturePreferences for SystemPreferences {
    async fn architecture_priority(&self) -> Option<String> {
        None
    }

    async fn translation_forced(&self, _app_name: &str) -> bool {
        false
    }
}

/// Delete both translation preferences for the host application.
///
/// Missing keys are not an error; `defaults delete` exits non-zero for them
/// and the outcome is logged only.
#[cfg(target_os = "macos")]
pub async fn clear_translation_preferences(
    info_plist: Option<&std::path::Path>,
    app_name: &str,
    timeout: Duration,
    logger: &Logger,
) {
    let rosetta = crate::command::run_bounded(
        "defaults",
        ["delete", ROSETTA_DOMAIN, app_name],
        timeout,
    )
    .await;
    report_delete(logger, &format!("{ROSETTA_DOMAIN} {app_name}"), rosetta);

    if let Some(plist) = info_plist {
        let args = [
            std::ffi::OsStr::new("delete"),
            plist.as_os_str(),
            std::ffi::OsStr::new("LSArchitecturePriority"),
        ];
        let priority = crate::command::run_bounded("defaults", args, timeout).await;
        report_delete(logger, "LSArchitecturePriority", priority);
    }
}

#[cfg(not(target_os = "macos"))]
pub async fn clear_translation_preferences(
    _info_plist: Option<&std::path::Path>,
    _app_name: &str,
    _timeout: Duration,
    logger: &Logger,
) {
    logger.info("RESET", "No translation layer on this platform; nothing to clear");
}

#[cfg(target_os = "macos")]
fn report_delete(
    logger: &Logger,
    key: &str,
    result: crate::error::Result<std::process::Output>,
) {
    match result {
        Ok(output) if output.status.success() => {
            logger.info("RESET", format!("Cleared {key}"));
        }
        Ok(_) => logger.debug("RESET", format!("{key} was not set")),
        Err(err) => logger.warn("RESET", format!("Could not clear {key}: {err}")),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// In-memory preference store.
    #[derive(Default)]
    pub struct FakePreferences {
        pub priority: Option<String>,
        pub forced_apps: Vec<String>,
    }

    impl ArchitecturePreferences for FakePreferences {
        async fn architecture_priority(&self) -> Option<String> {
            self.priority.clone()
        }

        async fn translation_forced(&self, app_name: &str) -> bool {
            self.forced_apps.iter().any(|app| app == app_name)
        }
    }

    #[test]
    fn priority_array_yields_first_architecture() {
        let raw = "(\n    \"x86_64\",\n    arm64\n)\n";
        assert_eq!(preferred_variant(raw), Some(ArchitectureVariant::X86_64));
        assert_eq!(preferred_variant("(arm64, x86_64)"), Some(ArchitectureVariant::Arm64));
    }

    #[test]
    fn priority_without_known_tags_is_none() {
        assert_eq!(preferred_variant("()"), None);
        assert_eq!(preferred_variant("ppc i386"), None);
    }

    #[cfg(not(target_os = "macos"))]
    #[tokio::test]
    async fn non_mac_store_reports_no_overrides() {
        let store = SystemPreferences::new(None, Duration::from_secs(1));
        assert_eq!(store.architecture_priority().await, None);
        assert!(!store.translation_forced("RetroArch").await);
    }
}
