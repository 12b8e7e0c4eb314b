/*============================================================
  Synavera Project: Syn-HLE
  Module: synhle_core::report
  Etiquette: Synavera Script Etiquette (Rust Profile v1.1.1)
  ------------------------------------------------------------
  Purpose:
    Structured JSON account of one run: host resolution,
    core reconciliation, detected controllers and bindings.

  Security / Safety Notes:
    Writes only to the operator-selected report path.

  Dependencies:
    serde/serde_json for output, chrono for timestamps.

  Operational Scope:
    Built once after both pipelines complete; written with
    --report or summarised on --dry-run.

  Revision History:
    2026-03-19 COD  Report document and summary line.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Every decision carries its provenance
    - Output is pretty-printed and stable
============================================================*/

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::arch::remediation::{PluginArtifact, RemediationOutcome};
use crate::arch::resolver::HostResolution;
use crate::arch::CompatibilityVerdict;
use crate::controller::emitter::EmittedMapping;
use crate::controller::scanner::ScanSnapshot;
use crate::controller::{ConnectionKind, DetectedController};
use crate::error::{HleError, Result};

/// Full report document.
#[derive(Debug, Serialize)]
pub struct LaunchReport {
    pub metadata: ReportMetadata,
    pub host: Option<HostResolution>,
    pub plugin: Option<PluginReport>,
    pub controllers: Option<ControllerReport>,
}

#[derive(Debug, Serialize)]
pub struct ReportMetadata {
    pub generated_at: String,
    pub generated_by: String,
    pub version: String,
    pub dry_run: bool,
    pub warnings: usize,
}

/// Core reconciliation as it happened, or as it would happen.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PluginReport {
    Reconciled {
        result: RemediationOutcome,
    },
    Planned {
        artifact: Option<PluginArtifact>,
        verdict: CompatibilityVerdict,
        would_acquire: bool,
    },
    Failed {
        path: PathBuf,
        error: String,
    },
}

/// Controller identification summary.
#[derive(Debug, Serialize)]
pub struct ControllerReport {
    pub devices: Vec<DeviceReport>,
    pub active: Option<ActiveController>,
    /// `None` when there is no active controller or its layout is native.
    pub bindings: Option<EmittedMapping>,
}

#[derive(Debug, Serialize)]
pub struct DeviceReport {
    pub name: String,
    pub connection: ConnectionKind,
    pub vendor_id: Option<String>,
    pub product_id: Option<String>,
    pub profile: Option<String>,
    pub display_name: Option<String>,
    pub release_year: Option<u16>,
    pub priority: bool,
}

#[derive(Debug, Serialize)]
pub struct ActiveController {
    pub name: String,
    pub profile: String,
    pub display_name: String,
    pub native_layout: bool,
}

impl ControllerReport {
    pub fn new(
        snapshot: &ScanSnapshot<'_>,
        active: Option<&DetectedController<'_>>,
        bindings: Option<&EmittedMapping>,
    ) -> Self {
        let devices = snapshot
            .devices()
            .iter()
            .map(|controller| DeviceReport {
                name: controller.record.name.clone(),
                connection: controller.record.connection,
                vendor_id: controller.record.vendor_id.map(|id| format!("0x{id:04x}")),
                product_id: controller.record.product_id.map(|id| format!("0x{id:04x}")),
                profile: controller.matched.as_ref().map(|m| m.id().to_string()),
                display_name: controller
                    .matched
                    .as_ref()
                    .map(|m| m.display_name().to_string()),
                release_year: controller.matched.as_ref().map(|m| m.release_year()),
                priority: controller
                    .matched
                    .as_ref()
                    .is_some_and(|m| m.is_priority()),
            })
            .collect();

        let active = active.and_then(|controller| {
            let matched = controller.matched.as_ref()?;
            Some(ActiveController {
                name: controller.record.name.clone(),
                profile: matched.id().to_string(),
                display_name: matched.display_name().to_string(),
                native_layout: bindings.is_none(),
            })
        });

        Self {
            devices,
            active,
            bindings: bindings.cloned(),
        }
    }
}

impl LaunchReport {
    pub fn new(
        dry_run: bool,
        warnings: usize,
        host: Option<HostResolution>,
        plugin: Option<PluginReport>,
        controllers: Option<ControllerReport>,
    ) -> Self {
        Self {
            metadata: ReportMetadata {
                generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                generated_by: "synhle_core".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                dry_run,
                warnings,
            },
            host,
            plugin,
            controllers,
        }
    }

    /// One-line human summary.
    pub fn summary(&self) -> String {
        let host = self
            .host
            .map(|host| host.variant.to_string())
            .unwrap_or_else(|| "skipped".into());
        let core = match &self.plugin {
            None => "skipped".to_string(),
            Some(PluginReport::Reconciled { result }) => format!(
                "{} ({:?})",
                result.artifact().variant,
                result.verdict()
            ),
            Some(PluginReport::Planned {
                verdict,
                would_acquire,
                ..
            }) => {
                if *would_acquire {
                    format!("{verdict:?}, would reacquire")
                } else {
                    format!("{verdict:?}")
                }
            }
            Some(PluginReport::Failed { error, .. }) => format!("failed: {error}"),
        };
        let controller = match &self.controllers {
            None => "skipped".to_string(),
            Some(report) => match &report.active {
                Some(active) => format!("{} of {} device(s)", active.display_name, report.devices.len()),
                None => format!("none of {} device(s)", report.devices.len()),
            },
        };
        format!("→ Syn-HLE. Host={host} Core={core} Controller={controller}")
    }
}

/// Persist the report to the given path.
pub fn write_report(report: &LaunchReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| {
            HleError::Filesystem(format!(
                "Failed to create report directory {}: {err}",
                parent.display()
            ))
        })?;
    }
    let file = File::create(path).map_err(|err| {
        HleError::Filesystem(format!("Failed to create report {}: {err}", path.display()))
    })?;
    serde_json::to_writer_pretty(file, report).map_err(|err| {
        HleError::Serialization(format!("Failed to write report {}: {err}", path.display()))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::resolver::ResolutionBasis;
    use crate::arch::ArchitectureVariant;
    use crate::controller::emitter::emit_mapping;
    use crate::controller::registry::ControllerRegistry;
    use crate::controller::{DeviceRecord, MatchedProfile};

    fn host() -> HostResolution {
        HostResolution {
            variant: ArchitectureVariant::X86_64,
            native: ArchitectureVariant::Arm64,
            basis: ResolutionBasis::ForcedTranslation,
        }
    }

    #[test]
    fn report_serializes_decisions_with_provenance() {
        let registry = ControllerRegistry::builtin();
        let ps4 = registry.get("ps4").unwrap();
        let snapshot = ScanSnapshot::from_controllers(vec![DetectedController {
            record: DeviceRecord {
                name: "Wireless Controller".into(),
                vendor_id: Some(0x054C),
                product_id: Some(0x09CC),
                connection: ConnectionKind::ShortRangeWireless,
            },
            matched: Some(MatchedProfile::Known(ps4)),
        }]);
        let active = snapshot.devices().first();
        let bindings = emit_mapping(&ps4.mapping);
        let controllers = ControllerReport::new(&snapshot, active, bindings.as_ref());

        let plugin = PluginReport::Reconciled {
            result: RemediationOutcome::Repaired {
                artifact: PluginArtifact {
                    path: "/cores/core.dylib".into(),
                    variant: ArchitectureVariant::X86_64,
                },
                verdict: CompatibilityVerdict::Compatible,
                replaced: Some(ArchitectureVariant::Arm64),
            },
        };
        let report = LaunchReport::new(false, 1, Some(host()), Some(plugin), Some(controllers));

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["metadata"]["generated_by"], "synhle_core");
        assert_eq!(value["host"]["basis"], "forced_translation");
        assert_eq!(value["plugin"]["status"], "reconciled");
        assert_eq!(value["plugin"]["result"]["outcome"], "repaired");
        let device = &value["controllers"]["devices"][0];
        assert_eq!(device["vendor_id"], "0x054c");
        assert_eq!(device["connection"], "wireless");
        assert_eq!(value["controllers"]["active"]["profile"], "ps4");
        assert_eq!(value["controllers"]["bindings"]["a"], "X");

        let summary = report.summary();
        assert!(summary.contains("Host=x86_64"));
        assert!(summary.contains("PlayStation 4 DualShock 4 of 1 device(s)"));
    }

    #[test]
    fn report_is_written_pretty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");
        let report = LaunchReport::new(
            true,
            0,
            None,
            Some(PluginReport::Failed {
                path: "/cores/core.so".into(),
                error: "Core acquisition: offline".into(),
            }),
            None,
        );
        write_report(&report, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"metadata\": {"));
        assert!(report.summary().contains("Core=failed: Core acquisition: offline"));
        assert!(report.summary().contains("Controller=skipped"));
    }
}
