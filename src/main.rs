/*============================================================
  Synavera Project: Syn-HLE
  Module: synhle_core::main
  Etiquette: Synavera Script Etiquette (Rust Profile v1.1.1)
  ------------------------------------------------------------
  Purpose:
    Entry point for Syn-HLE Core. Reconciles the N64 core with
    the architecture RetroArch will run as, identifies the
    active controller, and optionally launches a ROM.

  Security / Safety Notes:
    Operates within user privileges. Executes lipo, defaults,
    system_profiler, unzip and xattr, and performs HTTPS GET
    requests against the configured buildbot only.

  Dependencies:
    clap for CLI parsing, chrono for timestamps, tokio for the
    runtime.

  Operational Scope:
    Invoked by the launcher front-end before every session, or
    standalone for diagnostics (--dry-run, --report).

  Revision History:
    2026-03-02 COD  Authored Syn-HLE Core runtime.
    2026-03-19 COD  Concurrent pipelines and JSON report.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Result-first error handling with deterministic exits
    - Structured logging following Synavera cadence
    - Configurable execution via CLI and config file
============================================================*/

mod arch;
mod command;
mod config;
mod controller;
mod error;
mod launch;
mod logger;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::{ArgAction, Parser};

use arch::acquire::BuildbotAcquirer;
use arch::native::{native_variant, process_is_translated};
use arch::preferences::{clear_translation_preferences, SystemPreferences};
use arch::probe::{probe_variant, SystemIntrospector};
use arch::remediation::{reconcile_plugin, PluginArtifact, RemediationRequest};
use arch::resolver::{resolve_host, HostResolution, HostTarget};
use arch::{validate, ArchitectureVariant, CompatibilityVerdict};
use config::HleConfig;
use controller::emitter::emit_mapping;
use controller::enumerate::SystemEnumerator;
use controller::registry::ControllerRegistry;
use controller::scanner::{scan, ScanSnapshot};
use controller::selection::select_active;
use error::{HleError, Result};
use launch::{
    launch, prepare_host, write_core_options, write_input_config, LaunchPlan, Renderer,
};
use logger::Logger;
use report::{write_report, ControllerReport, LaunchReport, PluginReport};

/// Command-line arguments for Syn-HLE-Core.
#[derive(Debug, Parser)]
#[command(
    name = "Syn-HLE-Core",
    version,
    author = "Synavera Systems",
    about = "Core and controller reconciliation for RetroArch N64 sessions"
)]
struct Cli {
    /// Override configuration file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Explicit log file path.
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,
    /// Launch this ROM after reconciliation.
    #[arg(long, value_name = "PATH")]
    rom: Option<PathBuf>,
    /// Skip core reconciliation.
    #[arg(long, action = ArgAction::SetTrue)]
    no_core: bool,
    /// Skip controller identification.
    #[arg(long, action = ArgAction::SetTrue)]
    no_controllers: bool,
    /// Write nothing and launch nothing; print a summary only.
    #[arg(long, action = ArgAction::SetTrue)]
    dry_run: bool,
    /// Write a JSON report of the run.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
    /// Clear Rosetta preferences for RetroArch before resolving.
    #[arg(long, action = ArgAction::SetTrue)]
    reset_translation: bool,
    /// Print the controller catalog and exit.
    #[arg(long, action = ArgAction::SetTrue)]
    list_profiles: bool,
    /// Enable verbose logging to stderr.
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
}

/// Core pipeline result; reconciliation failures are carried, not raised.
struct CoreRun {
    host: HostResolution,
    plugin: PluginReport,
    failure: Option<HleError>,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("[Syn-HLE] {}", err);
            err.exit_code()
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.no_core && cli.no_controllers {
        return Err(HleError::Config(
            "Cannot disable both core reconciliation and controller identification".into(),
        ));
    }

    let config = HleConfig::load_from_optional_path(cli.config.as_deref())?;
    let registry = ControllerRegistry::load(config.devices.catalog.as_deref())?;

    if cli.list_profiles {
        print!("{}", registry.render_listing());
        return Ok(ExitCode::SUCCESS);
    }

    let session_stamp = Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let log_path = cli
        .log
        .clone()
        .or_else(|| Some(config.log_dir().join(format!("hle_{session_stamp}.log"))));
    let logger = Logger::new(log_path, cli.verbose)?;
    logger.info("INIT", "Syn-HLE Core awakening.");

    let native = native_variant();
    logger.info("INIT", format!("Machine native variant: {native}"));
    if process_is_translated() {
        logger.warn("INIT", "Syn-HLE itself is running under Rosetta");
    }

    if cli.reset_translation && !cli.no_core {
        if cli.dry_run {
            logger.info("RESET", "Dry run; translation preferences left untouched");
        } else {
            clear_translation_preferences(
                config.host.info_plist.as_deref(),
                &config.host.app_name,
                config.probe_timeout(),
                &logger,
            )
            .await;
        }
    }

    let (core, snapshot) = tokio::join!(
        async {
            if cli.no_core {
                None
            } else {
                Some(core_pipeline(&config, native, cli.dry_run, &logger).await)
            }
        },
        async {
            if cli.no_controllers {
                None
            } else {
                Some(controller_pipeline(&config, &registry, &logger).await)
            }
        }
    );
    let core = core.transpose()?;

    let active = snapshot.as_ref().and_then(select_active);
    let bindings = active
        .and_then(|controller| controller.matched.as_ref())
        .and_then(|matched| emit_mapping(matched.mapping()));
    match active.and_then(|controller| controller.matched.as_ref().map(|m| (controller, m))) {
        Some((controller, matched)) => logger.info(
            "ACTIVE",
            format!(
                "{} ({}, {}){}",
                matched.display_name(),
                controller.record.name,
                controller.record.connection,
                if bindings.is_none() { " native layout" } else { "" }
            ),
        ),
        None if snapshot.is_some() => logger.info("ACTIVE", "No controller selected"),
        None => {}
    }

    let controllers = snapshot
        .as_ref()
        .map(|snapshot| ControllerReport::new(snapshot, active, bindings.as_ref()));
    let (host, plugin, failure) = match core {
        Some(run) => (Some(run.host), Some(run.plugin), run.failure),
        None => (None, None, None),
    };
    let report = LaunchReport::new(
        cli.dry_run,
        logger.warning_count(),
        host,
        plugin,
        controllers,
    );

    if cli.dry_run {
        println!("{}", report.summary());
    } else if let Some(path) = cli.report.clone().or_else(|| config.report_path.clone()) {
        write_report(&report, &path)?;
        logger.info("REPORT", format!("Report written to {}", path.display()));
    }

    if let Some(err) = failure {
        logger.error("CORE", err.to_string());
        logger.finalize()?;
        return Err(err);
    }

    if let Some(rom) = &cli.rom {
        if cli.dry_run {
            logger.info("LAUNCH", format!("Dry run; would launch {}", rom.display()));
        } else {
            let core_path = match &report.plugin {
                Some(PluginReport::Reconciled { result }) => result.artifact().path.clone(),
                _ => config.plugin_path(),
            };
            let translated = host.is_some_and(|host| host.is_translated());
            let renderer = Renderer::for_translation(translated);
            let options = write_core_options(&config.host.config_dir, renderer)?;
            logger.info(
                "LAUNCH",
                format!("{renderer:?} renderer selected in {}", options.display()),
            );

            let input_config = match (active, &bindings) {
                (Some(controller), Some(bindings)) => Some(write_input_config(
                    &config.host.config_dir,
                    bindings,
                    &controller.record.name,
                )?),
                _ => None,
            };

            let plan = LaunchPlan {
                executable: config.host.executable.clone(),
                core: core_path,
                input_config,
                rom: rom.clone(),
            };
            prepare_host(&plan, &config.host.config_dir, &logger).await;
            match launch(&plan, &logger)? {
                Some(pid) => logger.info("LAUNCH", format!("RetroArch started (pid {pid})")),
                None => logger.info("LAUNCH", "RetroArch started"),
            }
        }
    }

    logger.info("COMPLETE", "Session reconciled.");
    logger.finalize()?;

    Ok(ExitCode::SUCCESS)
}

async fn core_pipeline(
    config: &HleConfig,
    native: ArchitectureVariant,
    dry_run: bool,
    logger: &Logger,
) -> Result<CoreRun> {
    let introspector = SystemIntrospector::new(config.probe_timeout());
    let preferences =
        SystemPreferences::new(config.host.info_plist.clone(), config.probe_timeout());
    let target = HostTarget {
        executable: &config.host.executable,
        app_name: &config.host.app_name,
    };
    let host = resolve_host(&introspector, &preferences, target, native, logger).await;
    let plugin_path = config.plugin_path();

    if dry_run {
        let present = plugin_path.exists();
        let variant = probe_variant(&introspector, &plugin_path, logger).await;
        let verdict = validate(variant, host.variant);
        return Ok(CoreRun {
            host,
            plugin: PluginReport::Planned {
                artifact: present.then(|| PluginArtifact {
                    path: plugin_path,
                    variant,
                }),
                verdict,
                would_acquire: !present || verdict == CompatibilityVerdict::Mismatched,
            },
            failure: None,
        });
    }

    let acquirer = BuildbotAcquirer::new(&config.plugin, logger)?;
    let request = RemediationRequest {
        host,
        plugin_path: plugin_path.clone(),
    };
    Ok(match reconcile_plugin(&introspector, &acquirer, &request, logger).await {
        Ok(result) => CoreRun {
            host,
            plugin: PluginReport::Reconciled { result },
            failure: None,
        },
        Err(err) => CoreRun {
            host,
            plugin: PluginReport::Failed {
                path: plugin_path,
                error: err.to_string(),
            },
            failure: Some(err),
        },
    })
}

async fn controller_pipeline<'r>(
    config: &HleConfig,
    registry: &'r ControllerRegistry,
    logger: &Logger,
) -> ScanSnapshot<'r> {
    let enumerator = SystemEnumerator::new(config.device_timeout());
    scan(&enumerator, registry, logger).await
}
