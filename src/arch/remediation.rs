/*============================================================
  Synavera Project: Syn-HLE
  Module: synhle_core::arch::remediation
  Etiquette: Synavera Script Etiquette (Rust Profile v1.1.1)
  ------------------------------------------------------------
  Purpose:
    Validate the installed core against the resolved host
    variant and perform at most one repair when they differ.

  Security / Safety Notes:
    Only the configured core path is ever retired, restored or
    removed.

  Dependencies:
    tokio for filesystem moves; serde for report output.

  Operational Scope:
    Final stage of the core reconciliation pipeline.

  Revision History:
    2026-03-10 COD  Replaced global re-detection with an
                    explicit request/state machine.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Bounded repair: one acquisition per invocation
    - Previous artifact restored when acquisition fails
    - Request threaded through states, never reassigned
============================================================*/

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{HleError, Result};
use crate::logger::Logger;

use super::acquire::PluginAcquirer;
use super::probe::{probe_variant, BinaryIntrospector};
use super::resolver::HostResolution;
use super::{validate, ArchitectureVariant, CompatibilityVerdict};

/// A core on disk together with the variant it was probed as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginArtifact {
    pub path: PathBuf,
    pub variant: ArchitectureVariant,
}

/// What the remediation loop needs to know; immutable for the whole run.
#[derive(Debug, Clone)]
pub struct RemediationRequest {
    pub host: HostResolution,
    pub plugin_path: PathBuf,
}

impl RemediationRequest {
    fn cores_dir(&self) -> &Path {
        self.plugin_path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Successful end states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RemediationOutcome {
    /// Installed core was acceptable as found.
    Verified {
        artifact: PluginArtifact,
        verdict: CompatibilityVerdict,
    },
    /// Core was replaced once and now validates.
    Repaired {
        artifact: PluginArtifact,
        verdict: CompatibilityVerdict,
        replaced: Option<ArchitectureVariant>,
    },
}

impl RemediationOutcome {
    pub fn artifact(&self) -> &PluginArtifact {
        match self {
            Self::Verified { artifact, .. } | Self::Repaired { artifact, .. } => artifact,
        }
    }

    pub fn verdict(&self) -> CompatibilityVerdict {
        match self {
            Self::Verified { verdict, .. } | Self::Repaired { verdict, .. } => *verdict,
        }
    }
}

#[derive(Debug)]
enum State {
    Idle,
    Validating(PluginArtifact),
    Reacquiring { previous: Option<PluginArtifact> },
    Reverifying { replaced: Option<ArchitectureVariant> },
    Done(Result<RemediationOutcome>),
}

/// Drive probe, validate and, if needed, a single reacquire-and-reverify.
pub async fn reconcile_plugin<I, A>(
    introspector: &I,
    acquirer: &A,
    request: &RemediationRequest,
    logger: &Logger,
) -> Result<RemediationOutcome>
where
    I: BinaryIntrospector,
    A: PluginAcquirer,
{
    let mut state = State::Idle;
    loop {
        state = match state {
            State::Idle => {
                if request.plugin_path.exists() {
                    let variant = probe_variant(introspector, &request.plugin_path, logger).await;
                    State::Validating(PluginArtifact {
                        path: request.plugin_path.clone(),
                        variant,
                    })
                } else {
                    logger.info(
                        "REPAIR",
                        format!("No core at {}; acquiring", request.plugin_path.display()),
                    );
                    State::Reacquiring { previous: None }
                }
            }
            State::Validating(artifact) => {
                let verdict = validate(artifact.variant, request.host.variant);
                logger.info(
                    "VERDICT",
                    format!(
                        "core {} vs host {} -> {verdict:?}",
                        artifact.variant, request.host.variant
                    ),
                );
                if verdict.is_acceptable() {
                    State::Done(Ok(RemediationOutcome::Verified { artifact, verdict }))
                } else {
                    State::Reacquiring {
                        previous: Some(artifact),
                    }
                }
            }
            State::Reacquiring { previous } => reacquire(acquirer, request, previous, logger).await,
            State::Reverifying { replaced } => {
                let variant = probe_variant(introspector, &request.plugin_path, logger).await;
                let artifact = PluginArtifact {
                    path: request.plugin_path.clone(),
                    variant,
                };
                let verdict = validate(variant, request.host.variant);
                logger.info(
                    "VERDICT",
                    format!(
                        "reinstalled core {variant} vs host {} -> {verdict:?}",
                        request.host.variant
                    ),
                );
                if verdict.is_acceptable() {
                    State::Done(Ok(RemediationOutcome::Repaired {
                        artifact,
                        verdict,
                        replaced,
                    }))
                } else {
                    logger.error(
                        "REPAIR",
                        "Core still mismatched after one repair; the host's translation preference needs attention",
                    );
                    State::Done(Err(HleError::MismatchAfterRepair {
                        plugin: variant,
                        host: request.host.variant,
                    }))
                }
            }
            State::Done(result) => return result,
        };
    }
}

async fn reacquire<A: PluginAcquirer>(
    acquirer: &A,
    request: &RemediationRequest,
    previous: Option<PluginArtifact>,
    logger: &Logger,
) -> State {
    let retired = match &previous {
        Some(artifact) => match retire(&artifact.path).await {
            Ok(path) => Some(path),
            Err(err) => return State::Done(Err(err)),
        },
        None => None,
    };

    logger.info(
        "REPAIR",
        format!("Requesting {} core", request.host.variant),
    );
    match acquirer.acquire(request.host.variant, request.cores_dir()).await {
        Ok(()) => {
            if let Some(retired) = &retired {
                if let Err(err) = tokio::fs::remove_file(retired).await {
                    logger.warn(
                        "REPAIR",
                        format!("Could not delete retired core {}: {err}", retired.display()),
                    );
                }
            }
            State::Reverifying {
                replaced: previous.map(|artifact| artifact.variant),
            }
        }
        Err(err) => {
            if let Some(retired) = &retired {
                if let Err(restore) = tokio::fs::rename(retired, &request.plugin_path).await {
                    logger.error(
                        "REPAIR",
                        format!("Could not restore {}: {restore}", request.plugin_path.display()),
                    );
                }
            }
            logger.error("REPAIR", format!("Core acquisition failed: {err}"));
            State::Done(Err(match err {
                HleError::Acquisition(_) => err,
                other => HleError::Acquisition(other.to_string()),
            }))
        }
    }
}

/// Move a mismatched core out of the install slot.
async fn retire(path: &Path) -> Result<PathBuf> {
    let mut name: OsString = path.as_os_str().to_os_string();
    name.push(".mismatched");
    let retired = PathBuf::from(name);
    if retired.exists() {
        tokio::fs::remove_file(&retired).await?;
    }
    tokio::fs::rename(path, &retired).await.map_err(|err| {
        HleError::Filesystem(format!("Failed to retire {}: {err}", path.display()))
    })?;
    Ok(retired)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::super::probe::tests::FakeIntrospector;
    use super::super::resolver::ResolutionBasis;
    use super::*;
    use ArchitectureVariant::*;

    /// Acquirer that writes a file and teaches the fake prober its tags.
    struct FakeAcquirer<'a> {
        introspector: &'a FakeIntrospector,
        installs_as: Option<&'static str>,
        calls: AtomicUsize,
        requested: Mutex<Vec<ArchitectureVariant>>,
    }

    impl<'a> FakeAcquirer<'a> {
        fn new(introspector: &'a FakeIntrospector, installs_as: Option<&'static str>) -> Self {
            Self {
                introspector,
                installs_as,
                calls: AtomicUsize::new(0),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    impl PluginAcquirer for FakeAcquirer<'_> {
        async fn acquire(&self, variant: ArchitectureVariant, target_dir: &Path) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requested.lock().unwrap().push(variant);
            let Some(tag) = self.installs_as else {
                return Err(HleError::Network("buildbot unreachable".into()));
            };
            let path = target_dir.join("core.dylib");
            std::fs::write(&path, tag).unwrap();
            self.introspector.set(&path, &[tag]);
            Ok(())
        }
    }

    fn request(dir: &Path, host: ArchitectureVariant) -> RemediationRequest {
        RemediationRequest {
            host: HostResolution {
                variant: host,
                native: Arm64,
                basis: ResolutionBasis::NativeDefault,
            },
            plugin_path: dir.join("core.dylib"),
        }
    }

    #[tokio::test]
    async fn compatible_core_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let req = request(dir.path(), Arm64);
        std::fs::write(&req.plugin_path, b"core").unwrap();
        let introspector = FakeIntrospector::with(&req.plugin_path, &["arm64"]);
        let acquirer = FakeAcquirer::new(&introspector, Some("arm64"));

        let outcome = reconcile_plugin(&introspector, &acquirer, &req, &Logger::quiet())
            .await
            .unwrap();
        assert_eq!(outcome.verdict(), CompatibilityVerdict::Compatible);
        assert!(matches!(outcome, RemediationOutcome::Verified { .. }));
        assert_eq!(acquirer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn indeterminate_core_is_accepted_optimistically() {
        let dir = tempfile::tempdir().unwrap();
        let req = request(dir.path(), Arm64);
        std::fs::write(&req.plugin_path, b"core").unwrap();
        let introspector = FakeIntrospector::default();
        let acquirer = FakeAcquirer::new(&introspector, Some("arm64"));

        let outcome = reconcile_plugin(&introspector, &acquirer, &req, &Logger::quiet())
            .await
            .unwrap();
        assert_eq!(outcome.verdict(), CompatibilityVerdict::Indeterminate);
        assert_eq!(acquirer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn mismatched_core_is_replaced_once() {
        let dir = tempfile::tempdir().unwrap();
        let req = request(dir.path(), Arm64);
        std::fs::write(&req.plugin_path, b"x86 core").unwrap();
        let introspector = FakeIntrospector::with(&req.plugin_path, &["x86_64"]);
        let acquirer = FakeAcquirer::new(&introspector, Some("arm64"));

        let outcome = reconcile_plugin(&introspector, &acquirer, &req, &Logger::quiet())
            .await
            .unwrap();
        match outcome {
            RemediationOutcome::Repaired {
                artifact, replaced, ..
            } => {
                assert_eq!(artifact.variant, Arm64);
                assert_eq!(replaced, Some(X86_64));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(acquirer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*acquirer.requested.lock().unwrap(), vec![Arm64]);
        assert!(!dir.path().join("core.dylib.mismatched").exists());
    }

    #[tokio::test]
    async fn absent_core_skips_straight_to_acquisition() {
        let dir = tempfile::tempdir().unwrap();
        let req = request(dir.path(), X86_64);
        let introspector = FakeIntrospector::default();
        let acquirer = FakeAcquirer::new(&introspector, Some("x86_64"));

        let outcome = reconcile_plugin(&introspector, &acquirer, &req, &Logger::quiet())
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            RemediationOutcome::Repaired { replaced: None, .. }
        ));
        assert_eq!(acquirer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn second_mismatch_is_surfaced_without_retry() {
        let dir = tempfile::tempdir().unwrap();
        let req = request(dir.path(), X86_64);
        std::fs::write(&req.plugin_path, b"arm core").unwrap();
        let introspector = FakeIntrospector::with(&req.plugin_path, &["arm64"]);
        // Buildbot keeps serving the wrong build.
        let acquirer = FakeAcquirer::new(&introspector, Some("arm64"));

        let err = reconcile_plugin(&introspector, &acquirer, &req, &Logger::quiet())
            .await
            .unwrap_err();
        match err {
            HleError::MismatchAfterRepair { plugin, host } => {
                assert_eq!(plugin, Arm64);
                assert_eq!(host, X86_64);
            }
            other => panic!("unexpected error {other}"),
        }
        assert_eq!(acquirer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_acquisition_restores_previous_core() {
        let dir = tempfile::tempdir().unwrap();
        let req = request(dir.path(), Arm64);
        std::fs::write(&req.plugin_path, b"x86 core").unwrap();
        let introspector = FakeIntrospector::with(&req.plugin_path, &["x86_64"]);
        let acquirer = FakeAcquirer::new(&introspector, None);

        let err = reconcile_plugin(&introspector, &acquirer, &req, &Logger::quiet())
            .await
            .unwrap_err();
        assert!(matches!(err, HleError::Acquisition(_)));
        assert_eq!(std::fs::read(&req.plugin_path).unwrap(), b"x86 core");
        assert!(!dir.path().join("core.dylib.mismatched").exists());
        assert_eq!(acquirer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_acquisition_without_previous_core_leaves_slot_empty() {
        let dir = tempfile::tempdir().unwrap();
        let req = request(dir.path(), Arm64);
        let introspector = FakeIntrospector::default();
        let acquirer = FakeAcquirer::new(&introspector, None);

        let err = reconcile_plugin(&introspector, &acquirer, &req, &Logger::quiet())
            .await
            .unwrap_err();
        assert!(matches!(err, HleError::Acquisition(_)));
        assert!(!req.plugin_path.exists());
    }
}
