/*============================================================
  Synavera Project: Syn-HLE
  Module: synhle_core::arch::resolver
  Etiquette: Synavera Script Etiquette (Rust Profile v1.1.1)
  ------------------------------------------------------------
  Purpose:
    Decide the single variant the RetroArch process will run
    as at launch, accounting for forced Rosetta translation.

  Security / Safety Notes:
    Read-only; delegates I/O to the prober and preference
    store.

  Dependencies:
    serde for report serialization.

  Operational Scope:
    First stage of the core reconciliation pipeline.

  Revision History:
    2026-03-05 COD  Authored resolver with override ordering.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit overrides win over platform defaults
    - Every resolution records its basis
============================================================*/

use std::path::Path;

use serde::Serialize;

use crate::logger::Logger;

use super::preferences::{preferred_variant, ArchitecturePreferences};
use super::probe::{probe_variant, BinaryIntrospector};
use super::ArchitectureVariant;

/// Why the resolver settled on its variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionBasis {
    /// Host binary carries exactly one variant.
    SingleArchitecture,
    /// Fat binary; the application's architecture priority names a
    /// non-native variant.
    ArchitecturePriority,
    /// Fat binary; the system marker forces the translation layer.
    ForcedTranslation,
    /// Fat binary without overrides: the machine's native variant.
    NativeDefault,
    /// Host binary absent or unreadable.
    ProbeUnavailable,
}

/// Variant the host process will execute as, with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HostResolution {
    pub variant: ArchitectureVariant,
    pub native: ArchitectureVariant,
    pub basis: ResolutionBasis,
}

impl HostResolution {
    /// Host will run on the translation layer rather than natively.
    pub fn is_translated(&self) -> bool {
        self.native.is_concrete() && self.variant.is_concrete() && self.variant != self.native
    }
}

/// Inputs identifying the host application.
#[derive(Debug, Clone, Copy)]
pub struct HostTarget<'a> {
    pub executable: &'a Path,
    pub app_name: &'a str,
}

/// Resolve the variant the host executable will run as.
pub async fn resolve_host<I, P>(
    introspector: &I,
    preferences: &P,
    target: HostTarget<'_>,
    native: ArchitectureVariant,
    logger: &Logger,
) -> HostResolution
where
    I: BinaryIntrospector,
    P: ArchitecturePreferences,
{
    let probed = probe_variant(introspector, target.executable, logger).await;
    let resolution = match probed {
        ArchitectureVariant::Arm64 | ArchitectureVariant::X86_64 => HostResolution {
            variant: probed,
            native,
            basis: ResolutionBasis::SingleArchitecture,
        },
        ArchitectureVariant::Universal => {
            resolve_fat_host(preferences, target.app_name, native, logger).await
        }
        ArchitectureVariant::Unknown => HostResolution {
            variant: native,
            native,
            basis: ResolutionBasis::ProbeUnavailable,
        },
    };

    logger.info(
        "RESOLVE",
        format!(
            "{} runs as {} ({:?}, native {})",
            target.app_name, resolution.variant, resolution.basis, native
        ),
    );
    resolution
}

async fn resolve_fat_host<P: ArchitecturePreferences>(
    preferences: &P,
    app_name: &str,
    native: ArchitectureVariant,
    logger: &Logger,
) -> HostResolution {
    if let Some(raw) = preferences.architecture_priority().await {
        match preferred_variant(&raw) {
            Some(preferred) if preferred != native => {
                logger.warn(
                    "RESOLVE",
                    format!("LSArchitecturePriority prefers {preferred} over native {native}"),
                );
                return HostResolution {
                    variant: preferred,
                    native,
                    basis: ResolutionBasis::ArchitecturePriority,
                };
            }
            Some(_) => {}
            None => logger.debug(
                "RESOLVE",
                format!("Ignoring unrecognised architecture priority `{raw}`"),
            ),
        }
    }

    if let Some(translated) = native.counterpart() {
        if preferences.translation_forced(app_name).await {
            logger.warn(
                "RESOLVE",
                format!("Rosetta is forced for {app_name}; host runs as {translated}"),
            );
            return HostResolution {
                variant: translated,
                native,
                basis: ResolutionBasis::ForcedTranslation,
            };
        }
    }

    HostResolution {
        variant: native,
        native,
        basis: ResolutionBasis::NativeDefault,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::super::preferences::tests::FakePreferences;
    use super::super::probe::tests::FakeIntrospector;
    use super::*;
    use ArchitectureVariant::*;

    struct Fixture {
        _dir: tempfile::TempDir,
        exe: PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("RetroArch");
        std::fs::write(&exe, b"binary").unwrap();
        Fixture { _dir: dir, exe }
    }

    async fn resolve(
        exe: &Path,
        tags: &[&str],
        prefs: FakePreferences,
        native: ArchitectureVariant,
    ) -> HostResolution {
        let introspector = FakeIntrospector::with(exe, tags);
        let target = HostTarget {
            executable: exe,
            app_name: "RetroArch",
        };
        resolve_host(&introspector, &prefs, target, native, &Logger::quiet()).await
    }

    #[tokio::test]
    async fn single_variant_binary_wins_outright() {
        let fx = fixture();
        let prefs = FakePreferences {
            priority: Some("(arm64)".into()),
            forced_apps: vec!["RetroArch".into()],
        };
        let resolved = resolve(&fx.exe, &["x86_64"], prefs, Arm64).await;
        assert_eq!(resolved.variant, X86_64);
        assert_eq!(resolved.basis, ResolutionBasis::SingleArchitecture);
        assert!(resolved.is_translated());
    }

    #[tokio::test]
    async fn fat_binary_without_overrides_uses_native() {
        let fx = fixture();
        let resolved = resolve(&fx.exe, &["arm64", "x86_64"], FakePreferences::default(), Arm64).await;
        assert_eq!(resolved.variant, Arm64);
        assert_eq!(resolved.basis, ResolutionBasis::NativeDefault);
        assert!(!resolved.is_translated());
    }

    #[tokio::test]
    async fn application_priority_names_non_native_variant() {
        let fx = fixture();
        let prefs = FakePreferences {
            priority: Some("(\n    x86_64,\n    arm64\n)".into()),
            forced_apps: vec![],
        };
        let resolved = resolve(&fx.exe, &["arm64", "x86_64"], prefs, Arm64).await;
        assert_eq!(resolved.variant, X86_64);
        assert_eq!(resolved.basis, ResolutionBasis::ArchitecturePriority);
    }

    #[tokio::test]
    async fn priority_naming_native_is_not_an_override() {
        let fx = fixture();
        let prefs = FakePreferences {
            priority: Some("(arm64, x86_64)".into()),
            forced_apps: vec![],
        };
        let resolved = resolve(&fx.exe, &["arm64", "x86_64"], prefs, Arm64).await;
        assert_eq!(resolved.variant, Arm64);
        assert_eq!(resolved.basis, ResolutionBasis::NativeDefault);
    }

    #[tokio::test]
    async fn rosetta_marker_forces_counterpart() {
        let fx = fixture();
        let prefs = FakePreferences {
            priority: None,
            forced_apps: vec!["RetroArch".into()],
        };
        let resolved = resolve(&fx.exe, &["arm64", "x86_64"], prefs, Arm64).await;
        assert_eq!(resolved.variant, X86_64);
        assert_eq!(resolved.basis, ResolutionBasis::ForcedTranslation);
    }

    #[tokio::test]
    async fn marker_for_another_app_is_ignored() {
        let fx = fixture();
        let prefs = FakePreferences {
            priority: None,
            forced_apps: vec!["OpenEmu".into()],
        };
        let resolved = resolve(&fx.exe, &["arm64", "x86_64"], prefs, Arm64).await;
        assert_eq!(resolved.variant, Arm64);
    }

    #[tokio::test]
    async fn unprobeable_host_falls_back_to_native() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("RetroArch");
        let resolved = resolve(&missing, &["x86_64"], FakePreferences::default(), Arm64).await;
        assert_eq!(resolved.variant, Arm64);
        assert_eq!(resolved.basis, ResolutionBasis::ProbeUnavailable);
    }
}
