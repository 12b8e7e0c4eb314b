/*============================================================
  Synavera Project: Syn-HLE
  Module: synhle_core::launch
  Etiquette: Synavera Script Etiquette (Rust Profile v1.1.1)
  ------------------------------------------------------------
  Purpose:
    Persist the controller append-config and core options,
    prepare the host install, then start RetroArch with the
    reconciled core.

  Security / Safety Notes:
    Writes only inside the RetroArch configuration directory.
    Host preparation is best effort and never blocks a launch.
    The host is spawned directly with an argument vector; no
    shell is involved.

  Dependencies:
    tokio for process spawning.

  Operational Scope:
    Final step of a launch, after both pipelines completed.

  Revision History:
    2026-03-18 COD  Renderer options and detached host spawn.
    2026-04-02 COD  glcore video driver and quarantine removal
                    ahead of the spawn.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Inputs verified before any process starts
    - Host outlives this helper
============================================================*/

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::controller::emitter::EmittedMapping;
use crate::error::{HleError, Result};
use crate::logger::Logger;

const INPUT_CONFIG_FILE: &str = "synhle_input.cfg";
const CORE_OPTIONS_DIR: &str = "config/Mupen64Plus-Next";
const CORE_OPTIONS_FILE: &str = "Mupen64Plus-Next.opt";
const HOST_CONFIG_FILE: &str = "config/retroarch.cfg";
const LEGACY_VIDEO_DRIVER: &str = "video_driver = \"gl\"";
const CORE_VIDEO_DRIVER: &str = "video_driver = \"glcore\"";
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
const QUARANTINE_TIMEOUT: Duration = Duration::from_secs(9);

/// RDP renderer the core should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renderer {
    /// Hardware renderer for native execution.
    GlideN64,
    /// Software renderer; the only reliable choice under translation.
    Angrylion,
}

impl Renderer {
    pub fn for_translation(translated: bool) -> Self {
        if translated {
            Renderer::Angrylion
        } else {
            Renderer::GlideN64
        }
    }

    fn plugin_value(self) -> &'static str {
        match self {
            Renderer::GlideN64 => "gliden64",
            Renderer::Angrylion => "angrylion",
        }
    }

    fn core_options(self) -> String {
        let mut options = format!(
            "mupen64plus-rdp-plugin = \"{}\"\n\
             mupen64plus-rsp-plugin = \"hle\"\n\
             mupen64plus-43screensize = \"640x480\"\n\
             mupen64plus-aspect = \"4:3\"\n\
             mupen64plus-cpucore = \"dynamic_recompiler\"\n",
            self.plugin_value()
        );
        if self == Renderer::GlideN64 {
            options.push_str("mupen64plus-EnableHWLighting = \"True\"\n");
        }
        options
    }
}

/// Everything needed to start the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub executable: PathBuf,
    pub core: PathBuf,
    pub input_config: Option<PathBuf>,
    pub rom: PathBuf,
}

impl LaunchPlan {
    pub fn arguments(&self) -> Vec<OsString> {
        let mut args = vec![OsString::from("-L"), self.core.clone().into_os_string()];
        if let Some(config) = &self.input_config {
            args.push(OsString::from("--appendconfig"));
            args.push(config.clone().into_os_string());
        }
        args.push(OsString::from("--verbose"));
        args.push(self.rom.clone().into_os_string());
        args
    }

    fn verify(&self) -> Result<()> {
        for (what, path) in [
            ("RetroArch executable", &self.executable),
            ("core", &self.core),
            ("ROM", &self.rom),
        ] {
            if !path.is_file() {
                return Err(HleError::Launch(format!("{what} not found at {}", path.display())));
            }
        }
        Ok(())
    }
}

/// Write the player-one append-config; returns its path.
pub fn write_input_config(
    config_dir: &Path,
    mapping: &EmittedMapping,
    controller_name: &str,
) -> Result<PathBuf> {
    let path = config_dir.join(INPUT_CONFIG_FILE);
    write_file(&path, &mapping.render_retroarch(controller_name))?;
    Ok(path)
}

/// Select the RDP renderer through the core's options file; returns its path.
pub fn write_core_options(config_dir: &Path, renderer: Renderer) -> Result<PathBuf> {
    let path = config_dir.join(CORE_OPTIONS_DIR).join(CORE_OPTIONS_FILE);
    write_file(&path, &renderer.core_options())?;
    Ok(path)
}

/// Switch the host from the legacy `gl` video driver to `glcore`.
///
/// Returns whether the file changed. A missing config is left alone;
/// RetroArch writes its defaults on first start.
pub fn ensure_glcore_driver(config_dir: &Path) -> Result<bool> {
    let path = config_dir.join(HOST_CONFIG_FILE);
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(err) => {
            return Err(HleError::Filesystem(format!(
                "Failed to read {}: {err}",
                path.display()
            )))
        }
    };
    if !contents.contains(LEGACY_VIDEO_DRIVER) {
        return Ok(false);
    }
    write_file(
        &path,
        &contents.replace(LEGACY_VIDEO_DRIVER, CORE_VIDEO_DRIVER),
    )?;
    Ok(true)
}

/// Bundle directory enclosing the host executable, if any.
pub fn app_bundle(executable: &Path) -> Option<&Path> {
    executable
        .ancestors()
        .skip(1)
        .find(|dir| dir.extension().is_some_and(|ext| ext == "app"))
}

/// Best-effort host preparation; failures are logged and the launch proceeds.
pub async fn prepare_host(plan: &LaunchPlan, config_dir: &Path, logger: &Logger) {
    match ensure_glcore_driver(config_dir) {
        Ok(true) => logger.info("LAUNCH", "Video driver switched from gl to glcore"),
        Ok(false) => {}
        Err(err) => logger.warn("LAUNCH", format!("Video driver left unchanged: {err}")),
    }

    let mut quarantined = vec![plan.core.as_path()];
    if let Some(bundle) = app_bundle(&plan.executable) {
        quarantined.insert(0, bundle);
    }
    for path in quarantined {
        clear_quarantine(path, logger).await;
    }
}

#[cfg(target_os = "macos")]
async fn clear_quarantine(path: &Path, logger: &Logger) {
    if !path.exists() {
        return;
    }
    let args = [
        std::ffi::OsStr::new("-rd"),
        std::ffi::OsStr::new("com.apple.quarantine"),
        path.as_os_str(),
    ];
    match crate::command::run_bounded("xattr", args, QUARANTINE_TIMEOUT).await {
        Ok(output) if output.status.success() => {
            logger.debug("LAUNCH", format!("Quarantine cleared on {}", path.display()))
        }
        // xattr exits non-zero when the attribute was never set.
        Ok(_) => logger.debug("LAUNCH", format!("No quarantine on {}", path.display())),
        Err(err) => logger.warn(
            "LAUNCH",
            format!("Quarantine left on {}: {err}", path.display()),
        ),
    }
}

#[cfg(not(target_os = "macos"))]
async fn clear_quarantine(_path: &Path, _logger: &Logger) {}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| {
            HleError::Filesystem(format!("Failed to create {}: {err}", parent.display()))
        })?;
    }
    std::fs::write(path, contents)
        .map_err(|err| HleError::Filesystem(format!("Failed to write {}: {err}", path.display())))
}

/// Start the host detached and return its process id.
pub fn launch(plan: &LaunchPlan, logger: &Logger) -> Result<Option<u32>> {
    plan.verify()?;
    logger.info(
        "LAUNCH",
        format!(
            "{} {}",
            plan.executable.display(),
            plan.arguments()
                .iter()
                .map(|arg| arg.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        ),
    );

    let child = Command::new(&plan.executable)
        .args(plan.arguments())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|err| {
            HleError::Launch(format!("Failed to start {}: {err}", plan.executable.display()))
        })?;
    Ok(child.id())
}
