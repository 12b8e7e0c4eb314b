/*============================================================
  Synavera Project: Syn-HLE
  Module: synhle_core::config
  Etiquette: Synavera Script Etiquette (Rust Profile v1.1.1)
  ------------------------------------------------------------
  Purpose:
    Load operator configuration (paths, buildbot source and
    timeouts) from TOML with per-platform defaults.

  Security / Safety Notes:
    Read-only access to the configuration file; no secrets are
    expected or stored.

  Dependencies:
    serde + toml for parsing, dirs for platform directories.

  Operational Scope:
    Loaded once by the entry point and passed by reference to
    both reconciliation pipelines.

  Revision History:
    2026-03-02 COD  Authored configuration layer.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit defaults per platform
    - Validation before use
    - Immutable after load
============================================================*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{HleError, Result};

const CONFIG_DIR_NAME: &str = "syn-hle";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Top-level Syn-HLE configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HleConfig {
    pub host: HostConfig,
    pub plugin: PluginConfig,
    pub probe: ProbeConfig,
    pub devices: DeviceConfig,
    pub log_dir: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
}

/// Where the host application (RetroArch) lives and how it is named.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub executable: PathBuf,
    /// Bundle Info.plist holding `LSArchitecturePriority` (macOS only).
    pub info_plist: Option<PathBuf>,
    /// Key under `com.apple.rosetta` marking a forced translation.
    pub app_name: String,
    pub config_dir: PathBuf,
}

/// Core plugin source and install location.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    pub name: String,
    pub cores_dir: PathBuf,
    pub base_url: String,
    /// Ceiling for a whole archive transfer, in seconds.
    pub timeout: u64,
    pub max_retries: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub timeout: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub timeout: u64,
    /// Optional TOML catalog replacing the built-in controller profiles.
    pub catalog: Option<PathBuf>,
}

impl Default for HleConfig {
    fn default() -> Self {
        Self {
            host: HostConfig::default(),
            plugin: PluginConfig::default(),
            probe: ProbeConfig::default(),
            devices: DeviceConfig::default(),
            log_dir: None,
            report_path: None,
        }
    }
}

impl Default for HostConfig {
    #[cfg(target_os = "macos")]
    fn default() -> Self {
        let app = PathBuf::from("/Applications/RetroArch.app");
        Self {
            executable: app.join("Contents/MacOS/RetroArch"),
            info_plist: Some(app.join("Contents/Info.plist")),
            app_name: "RetroArch".into(),
            config_dir: home().join("Library/Application Support/RetroArch"),
        }
    }

    #[cfg(target_os = "windows")]
    fn default() -> Self {
        let root = dirs::config_dir()
            .unwrap_or_else(|| home().join("AppData").join("Roaming"))
            .join("RetroArch");
        Self {
            executable: root.join("retroarch.exe"),
            info_plist: None,
            app_name: "RetroArch".into(),
            config_dir: root,
        }
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    fn default() -> Self {
        Self {
            executable: home().join(".local/share/retroarch/retroarch"),
            info_plist: None,
            app_name: "RetroArch".into(),
            config_dir: home().join(".config/retroarch"),
        }
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            name: "mupen64plus_next_libretro".into(),
            cores_dir: default_cores_dir(),
            base_url: "https://buildbot.libretro.com/nightly".into(),
            timeout: 60,
            max_retries: 3,
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { timeout: 5 }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            timeout: 9,
            catalog: None,
        }
    }
}

#[cfg(target_os = "macos")]
fn default_cores_dir() -> PathBuf {
    home().join("Library/Application Support/RetroArch/cores")
}

#[cfg(target_os = "windows")]
fn default_cores_dir() -> PathBuf {
    HostConfig::default().config_dir.join("cores")
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn default_cores_dir() -> PathBuf {
    home().join(".local/share/retroarch/cores")
}

fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Expand a leading `~/` against the user's home directory.
fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home().join(rest),
        Err(_) => path.to_path_buf(),
    }
}

impl HleConfig {
    /// Load configuration from an explicit path, or the default location
    /// when present, falling back to built-in defaults.
    pub fn load_from_optional_path(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (Some(path.to_path_buf()), true),
            None => (default_config_path(), false),
        };

        let config = match path {
            Some(path) if path.exists() => Self::load(&path)?,
            Some(path) if required => {
                return Err(HleError::Config(format!(
                    "Configuration file {} does not exist",
                    path.display()
                )));
            }
            _ => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            HleError::Config(format!("Failed to read {}: {err}", path.display()))
        })?;
        Self::parse(&raw)
            .map_err(|err| HleError::Config(format!("Failed to parse {}: {err}", path.display())))
    }

    fn parse(raw: &str) -> std::result::Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(raw)?;
        config.host.executable = expand_home(&config.host.executable);
        config.host.config_dir = expand_home(&config.host.config_dir);
        config.host.info_plist = config.host.info_plist.as_deref().map(expand_home);
        config.plugin.cores_dir = expand_home(&config.plugin.cores_dir);
        config.devices.catalog = config.devices.catalog.as_deref().map(expand_home);
        config.log_dir = config.log_dir.as_deref().map(expand_home);
        config.report_path = config.report_path.as_deref().map(expand_home);
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (name, seconds) in [
            ("probe.timeout", self.probe.timeout),
            ("devices.timeout", self.devices.timeout),
        ] {
            if !(1..=9).contains(&seconds) {
                return Err(HleError::Config(format!(
                    "{name} must be between 1 and 9 seconds (got {seconds})"
                )));
            }
        }
        if self.plugin.timeout == 0 {
            return Err(HleError::Config("plugin.timeout must be positive".into()));
        }
        if self.plugin.name.trim().is_empty() {
            return Err(HleError::Config("plugin.name must not be empty".into()));
        }
        if self.host.app_name.trim().is_empty() {
            return Err(HleError::Config("host.app_name must not be empty".into()));
        }
        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe.timeout)
    }

    pub fn device_timeout(&self) -> Duration {
        Duration::from_secs(self.devices.timeout)
    }

    /// Directory receiving session logs.
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(home)
                .join(CONFIG_DIR_NAME)
                .join("logs")
        })
    }

    /// Install path of the core plugin for the current platform.
    pub fn plugin_path(&self) -> PathBuf {
        self.plugin
            .cores_dir
            .join(format!("{}{}", self.plugin.name, plugin_extension()))
    }
}

/// Shared-library suffix used by cores on this platform.
pub fn plugin_extension() -> &'static str {
    if cfg!(target_os = "macos") {
        ".dylib"
    } else if cfg!(target_os = "windows") {
        ".dll"
    } else {
        ".so"
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = HleConfig::parse(
            r#"
            [plugin]
            name = "parallel_n64_libretro"
            cores_dir = "~/cores"

            [probe]
            timeout = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.plugin.name, "parallel_n64_libretro");
        assert!(config.plugin.cores_dir.ends_with("cores"));
        assert!(!config.plugin.cores_dir.starts_with("~"));
        assert_eq!(config.plugin.max_retries, 3);
        assert_eq!(config.probe_timeout(), Duration::from_secs(3));
        assert_eq!(config.devices.timeout, 9);
        assert_eq!(config.host.app_name, "RetroArch");
        config.validate().unwrap();
    }

    #[test]
    fn introspection_timeouts_stay_single_digit() {
        let mut config = HleConfig::default();
        config.devices.timeout = 30;
        assert!(matches!(config.validate(), Err(HleError::Config(_))));
        config.devices.timeout = 0;
        assert!(matches!(config.validate(), Err(HleError::Config(_))));
    }

    #[test]
    fn explicit_missing_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let err = HleConfig::load_from_optional_path(Some(&missing)).unwrap_err();
        assert!(matches!(err, HleError::Config(_)));
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "log_dir = \"/tmp/hle-logs\"\n[devices]\ntimeout = 4\n").unwrap();
        let config = HleConfig::load_from_optional_path(Some(&path)).unwrap();
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/hle-logs"));
        assert_eq!(config.device_timeout(), Duration::from_secs(4));
    }

    #[test]
    fn plugin_path_carries_platform_extension() {
        let config = HleConfig::default();
        let path = config.plugin_path();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("mupen64plus_next_libretro"));
        assert!(name.ends_with(plugin_extension()));
    }
}
