/*============================================================
  Synavera Project: Syn-HLE
  Module: synhle_core::controller::scanner
  Etiquette: Synavera Script Etiquette (Rust Profile v1.1.1)
  ------------------------------------------------------------
  Purpose:
    One complete controller scan: enumerate, normalise,
    match, and publish an immutable snapshot.

  Security / Safety Notes:
    Malformed nodes are skipped; enumeration failures degrade
    to an empty source.

  Dependencies:
    tokio via the enumerator.

  Operational Scope:
    Second pipeline of a launch, independent of the core
    reconciliation.

  Revision History:
    2026-03-15 COD  Depth-first scan with atomic snapshot.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Snapshot exposed only once fully built
    - Sequential, no fan-out
============================================================*/

use crate::logger::Logger;

use super::enumerate::{DeviceEnumerator, DeviceNode};
use super::matcher::match_device;
use super::registry::ControllerRegistry;
use super::{parse_usb_id, ConnectionKind, DetectedController, DeviceRecord};

/// Immutable result of one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSnapshot<'r> {
    controllers: Vec<DetectedController<'r>>,
}

impl<'r> ScanSnapshot<'r> {
    /// Every usable device, USB tree first (depth-first), then wireless.
    pub fn devices(&self) -> &[DetectedController<'r>] {
        &self.controllers
    }

    pub fn matched(&self) -> impl Iterator<Item = &DetectedController<'r>> {
        self.controllers
            .iter()
            .filter(|controller| controller.matched.is_some())
    }

    #[cfg(test)]
    pub(crate) fn from_controllers(controllers: Vec<DetectedController<'r>>) -> Self {
        Self { controllers }
    }
}

/// Enumerate every source and match each usable device against `registry`.
pub async fn scan<'r, E: DeviceEnumerator>(
    enumerator: &E,
    registry: &'r ControllerRegistry,
    logger: &Logger,
) -> ScanSnapshot<'r> {
    let mut records = Vec::new();

    match enumerator.usb_tree().await {
        Ok(tree) => {
            for node in &tree {
                collect(node, ConnectionKind::Usb, &mut records);
            }
        }
        Err(err) => logger.warn("SCAN", format!("USB enumeration unavailable: {err}")),
    }

    match enumerator.wireless_devices().await {
        Ok(devices) => {
            for node in &devices {
                collect(node, ConnectionKind::ShortRangeWireless, &mut records);
            }
        }
        Err(err) => logger.warn("SCAN", format!("Wireless enumeration unavailable: {err}")),
    }

    let controllers: Vec<_> = records
        .into_iter()
        .map(|record| {
            let matched = match_device(registry, &record);
            match &matched {
                Some(profile) => logger.info(
                    "MATCH",
                    format!(
                        "{} via {} -> {} ({})",
                        record.name,
                        record.connection,
                        profile.display_name(),
                        profile.release_year()
                    ),
                ),
                None => logger.debug("MATCH", format!("{} not a known controller", record.name)),
            }
            DetectedController { record, matched }
        })
        .collect();

    logger.info(
        "SCAN",
        format!(
            "{} device(s) seen, {} matched",
            controllers.len(),
            controllers
                .iter()
                .filter(|controller| controller.matched.is_some())
                .count()
        ),
    );
    ScanSnapshot { controllers }
}

fn collect(node: &DeviceNode, connection: ConnectionKind, records: &mut Vec<DeviceRecord>) {
    if let Some(record) = normalise(node, connection) {
        records.push(record);
    }
    for child in &node.children {
        collect(child, connection, records);
    }
}

fn normalise(node: &DeviceNode, connection: ConnectionKind) -> Option<DeviceRecord> {
    let name = node.name.as_deref()?.trim();
    if name.is_empty() {
        return None;
    }
    Some(DeviceRecord {
        name: name.to_string(),
        vendor_id: node.vendor_id.as_deref().and_then(parse_usb_id),
        product_id: node.product_id.as_deref().and_then(parse_usb_id),
        connection,
    })
}
