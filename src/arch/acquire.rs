/*============================================================
  Synavera Project: Syn-HLE
  Module: synhle_core::arch::acquire
  Etiquette: Synavera Script Etiquette (Rust Profile v1.1.1)
  ------------------------------------------------------------
  Purpose:
    Fetch and install the variant-specific core archive from
    the libretro buildbot.

  Security / Safety Notes:
    Read-only HTTPS GETs; archives are unpacked into a private
    staging directory and only the expected core file is moved
    into the cores directory.

  Dependencies:
    reqwest for HTTP, tokio for file I/O and the unzip tool.

  Operational Scope:
    Called at most once per remediation pass.

  Revision History:
    2026-03-09 COD  Adapted the HTTP client to core downloads.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Retry with exponential backoff on transient statuses
    - Per-chunk stall timeout on every transfer
    - No partially written core ever installed
============================================================*/

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::StatusCode;
use tokio::io::AsyncWriteExt;
use tokio::time::{sleep, timeout};

use crate::command::run_checked;
use crate::config::{plugin_extension, PluginConfig};
use crate::error::{HleError, Result};
use crate::logger::Logger;

use super::ArchitectureVariant;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const STALL_TIMEOUT: Duration = Duration::from_secs(9);
const UNPACK_TIMEOUT: Duration = Duration::from_secs(9);

/// External collaborator that installs a core built for one variant.
pub trait PluginAcquirer {
    /// Fetch and unpack the core for `variant` into `target_dir`.
    ///
    /// Either the core ends up fully installed or nothing is written.
    async fn acquire(&self, variant: ArchitectureVariant, target_dir: &Path) -> Result<()>;
}

/// Buildbot-backed acquirer.
pub struct BuildbotAcquirer<'a> {
    client: reqwest::Client,
    base_url: String,
    core_name: String,
    max_retries: usize,
    logger: &'a Logger,
}

impl<'a> BuildbotAcquirer<'a> {
    pub fn new(config: &PluginConfig, logger: &'a Logger) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(concat!("Syn-HLE-Core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| HleError::Network(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            core_name: config.name.clone(),
            max_retries: config.max_retries.max(1),
            logger,
        })
    }

    fn core_file_name(&self) -> String {
        format!("{}{}", self.core_name, plugin_extension())
    }

    fn archive_url(&self, variant: ArchitectureVariant) -> String {
        format!(
            "{}/{}/{}/latest/{}.zip",
            self.base_url,
            platform_segment(),
            variant,
            self.core_file_name()
        )
    }

    async fn download(&self, url: &str, destination: &Path) -> Result<u64> {
        let mut attempt = 0;
        let mut response = loop {
            let response = self.client.get(url).send().await.map_err(|err| {
                HleError::Network(format!("Request to {url} failed: {err}"))
            })?;
            if response.status() == StatusCode::OK {
                break response;
            }
            attempt += 1;
            if response.status().is_client_error() || attempt >= self.max_retries {
                return Err(HleError::Network(format!(
                    "{url} answered {} after {attempt} attempt(s)",
                    response.status()
                )));
            }
            let exponent = (attempt as u32).min(8);
            sleep(Duration::from_millis(200_u64.saturating_mul(1_u64 << exponent))).await;
        };

        let mut file = tokio::fs::File::create(destination).await.map_err(|err| {
            HleError::Filesystem(format!("Failed to create {}: {err}", destination.display()))
        })?;
        let mut written = 0u64;
        loop {
            let chunk = timeout(STALL_TIMEOUT, response.chunk())
                .await
                .map_err(|_| HleError::Timeout {
                    operation: format!("download {url}"),
                    seconds: STALL_TIMEOUT.as_secs(),
                })?
                .map_err(|err| HleError::Network(format!("Transfer from {url} failed: {err}")))?;
            let Some(chunk) = chunk else {
                break;
            };
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok(written)
    }

    async fn install(
        &self,
        variant: ArchitectureVariant,
        staging: &Path,
        target_dir: &Path,
    ) -> Result<PathBuf> {
        let url = self.archive_url(variant);
        let archive = staging.join("core.zip");
        self.logger.info("ACQUIRE", format!("Fetching {url}"));
        let bytes = self.download(&url, &archive).await?;
        self.logger.debug("ACQUIRE", format!("Received {bytes} bytes"));

        let unpacked = staging.join("unpacked");
        let args = [
            OsStr::new("-o"),
            OsStr::new("-q"),
            archive.as_os_str(),
            OsStr::new("-d"),
            unpacked.as_os_str(),
        ];
        run_checked("unzip", args, UNPACK_TIMEOUT).await?;

        let core = unpacked.join(self.core_file_name());
        if !core.is_file() {
            return Err(HleError::Acquisition(format!(
                "{url} did not contain {}",
                self.core_file_name()
            )));
        }

        let installed = target_dir.join(self.core_file_name());
        tokio::fs::rename(&core, &installed).await.map_err(|err| {
            HleError::Filesystem(format!("Failed to install {}: {err}", installed.display()))
        })?;
        Ok(installed)
    }
}

impl PluginAcquirer for BuildbotAcquirer<'_> {
    async fn acquire(&self, variant: ArchitectureVariant, target_dir: &Path) -> Result<()> {
        if !variant.is_concrete() {
            return Err(HleError::Acquisition(format!(
                "No buildbot core exists for variant {variant}"
            )));
        }
        tokio::fs::create_dir_all(target_dir).await.map_err(|err| {
            HleError::Filesystem(format!("Failed to create {}: {err}", target_dir.display()))
        })?;

        // Staging sits inside the target so the final rename never crosses devices.
        let staging = target_dir.join(format!(".synhle-staging-{}", std::process::id()));
        tokio::fs::create_dir_all(&staging).await?;
        let result = self.install(variant, &staging, target_dir).await;
        if let Err(err) = tokio::fs::remove_dir_all(&staging).await {
            self.logger.warn(
                "ACQUIRE",
                format!("Could not remove staging {}: {err}", staging.display()),
            );
        }

        let installed = result.map_err(|err| match err {
            HleError::Acquisition(_) => err,
            other => HleError::Acquisition(other.to_string()),
        })?;
        prepare_installed_core(&installed, self.logger).await;
        self.logger.info(
            "ACQUIRE",
            format!("Installed {variant} core at {}", installed.display()),
        );
        Ok(())
    }
}

fn platform_segment() -> &'static str {
    if cfg!(target_os = "macos") {
        "apple/osx"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else {
        "linux"
    }
}

/// Make a fresh core loadable: executable bit, and no Gatekeeper quarantine.
async fn prepare_installed_core(path: &Path, logger: &Logger) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(err) =
            tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).await
        {
            logger.warn("ACQUIRE", format!("chmod {} failed: {err}", path.display()));
        }
    }

    #[cfg(target_os = "macos")]
    {
        let args = [
            OsStr::new("-rd"),
            OsStr::new("com.apple.quarantine"),
            path.as_os_str(),
        ];
        if let Err(err) = crate::command::run_bounded("xattr", args, UNPACK_TIMEOUT).await {
            logger.debug("ACQUIRE", format!("xattr on {} skipped: {err}", path.display()));
        }
    }

    #[cfg(not(unix))]
    let _ = (path, logger);
}
