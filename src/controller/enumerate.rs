/*============================================================
  Synavera Project: Syn-HLE
  Module: synhle_core::controller::enumerate
  Etiquette: Synavera Script Etiquette (Rust Profile v1.1.1)
  ------------------------------------------------------------
  Purpose:
    Enumerate attached USB hardware and connected wireless
    devices as raw, untrusted nodes.

  Security / Safety Notes:
    Read-only queries (system_profiler, /proc); output is
    parsed tolerantly and never trusted for structure.

  Dependencies:
    serde_json for system_profiler output, tokio for bounded
    I/O.

  Operational Scope:
    Source of raw records for the controller scanner.

  Revision History:
    2026-03-14 COD  system_profiler and /proc enumerators.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Bounded waits on every OS query
    - Partial nodes kept raw; judgement left to the scanner
============================================================*/

use std::time::Duration;

use serde_json::Value;

use crate::error::{HleError, Result};

/// Raw hardware node as reported by the OS.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceNode {
    pub name: Option<String>,
    pub vendor_id: Option<String>,
    pub product_id: Option<String>,
    pub children: Vec<DeviceNode>,
}

#[cfg(test)]
impl DeviceNode {
    pub fn leaf(name: &str, vendor_id: Option<&str>, product_id: Option<&str>) -> Self {
        Self {
            name: Some(name.to_string()),
            vendor_id: vendor_id.map(str::to_string),
            product_id: product_id.map(str::to_string),
            children: Vec::new(),
        }
    }
}

/// OS facility listing attached devices.
pub trait DeviceEnumerator {
    /// Nested tree of USB buses, hubs and devices.
    async fn usb_tree(&self) -> Result<Vec<DeviceNode>>;
    /// Paired and currently connected short-range wireless devices.
    async fn wireless_devices(&self) -> Result<Vec<DeviceNode>>;
}

/// Production enumerator for the current platform.
pub struct SystemEnumerator {
    timeout: Duration,
}

impl SystemEnumerator {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[cfg(target_os = "macos")]
impl DeviceEnumerator for SystemEnumerator {
    async fn usb_tree(&self) -> Result<Vec<DeviceNode>> {
        let raw = crate::command::run_checked(
            "system_profiler",
            ["SPUSBDataType", "-json"],
            self.timeout,
        )
        .await?;
        parse_usb_json(&raw)
    }

    async fn wireless_devices(&self) -> Result<Vec<DeviceNode>> {
        let raw = crate::command::run_checked(
            "system_profiler",
            ["SPBluetoothDataType", "-json"],
            self.timeout,
        )
        .await?;
        parse_bluetooth_json(&raw)
    }
}

#[cfg(target_os = "linux")]
impl SystemEnumerator {
    async fn input_devices(&self) -> Result<InputDevices> {
        const SOURCE: &str = "/proc/bus/input/devices";
        let raw = tokio::time::timeout(self.timeout, tokio::fs::read_to_string(SOURCE))
            .await
            .map_err(|_| HleError::Timeout {
                operation: format!("read {SOURCE}"),
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|err| HleError::Filesystem(format!("Failed to read {SOURCE}: {err}")))?;
        Ok(parse_input_devices(&raw))
    }
}

#[cfg(target_os = "linux")]
impl DeviceEnumerator for SystemEnumerator {
    async fn usb_tree(&self) -> Result<Vec<DeviceNode>> {
        Ok(self.input_devices().await?.usb)
    }

    async fn wireless_devices(&self) -> Result<Vec<DeviceNode>> {
        Ok(self.input_devices().await?.wireless)
    }
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
impl DeviceEnumerator for SystemEnumerator {
    async fn usb_tree(&self) -> Result<Vec<DeviceNode>> {
        Err(HleError::Runtime(
            "USB enumeration is not available on this platform".into(),
        ))
    }

    async fn wireless_devices(&self) -> Result<Vec<DeviceNode>> {
        let _ = self.timeout;
        Ok(Vec::new())
    }
}

/// Parse `system_profiler SPUSBDataType -json` into a node tree.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
pub fn parse_usb_json(raw: &str) -> Result<Vec<DeviceNode>> {
    let root: Value = serde_json::from_str(raw)
        .map_err(|err| HleError::Serialization(format!("USB report is not JSON: {err}")))?;
    Ok(root
        .get("SPUSBDataType")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(usb_node).collect())
        .unwrap_or_default())
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn usb_node(value: &Value) -> DeviceNode {
    let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
    DeviceNode {
        name: text("_name"),
        vendor_id: text("vendor_id"),
        product_id: text("product_id"),
        children: value
            .get("_items")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(usb_node).collect())
            .unwrap_or_default(),
    }
}

/// Parse `system_profiler SPBluetoothDataType -json` into connected devices.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
pub fn parse_bluetooth_json(raw: &str) -> Result<Vec<DeviceNode>> {
    let root: Value = serde_json::from_str(raw)
        .map_err(|err| HleError::Serialization(format!("Bluetooth report is not JSON: {err}")))?;
    let mut devices = Vec::new();
    let controllers = root
        .get("SPBluetoothDataType")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    for controller in controllers {
        let Some(connected) = controller.get("device_connected").and_then(Value::as_array) else {
            continue;
        };
        // Each entry is a single-key object: { "<device name>": { ...properties } }.
        for entry in connected.iter().filter_map(Value::as_object) {
            for (name, properties) in entry {
                let text = |key: &str| {
                    properties
                        .get(key)
                        .and_then(Value::as_str)
                        .map(str::to_string)
                };
                devices.push(DeviceNode {
                    name: Some(name.clone()),
                    vendor_id: text("device_vendorID"),
                    product_id: text("device_productID"),
                    children: Vec::new(),
                });
            }
        }
    }
    Ok(devices)
}

/// Input devices split by bus.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InputDevices {
    pub usb: Vec<DeviceNode>,
    pub wireless: Vec<DeviceNode>,
}

const BUS_USB: &str = "0003";
const BUS_BLUETOOTH: &str = "0005";

/// Parse the Linux `/proc/bus/input/devices` listing.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
pub fn parse_input_devices(raw: &str) -> InputDevices {
    let mut devices = InputDevices::default();
    for block in raw.split("\n\n") {
        let mut bus = None;
        let mut node = DeviceNode::default();
        for line in block.lines() {
            if let Some(rest) = line.strip_prefix("I:") {
                for field in rest.split_whitespace() {
                    match field.split_once('=') {
                        Some(("Bus", value)) => bus = Some(value.to_ascii_lowercase()),
                        Some(("Vendor", value)) => node.vendor_id = Some(value.to_string()),
                        Some(("Product", value)) => node.product_id = Some(value.to_string()),
                        _ => {}
                    }
                }
            } else if let Some(rest) = line.strip_prefix("N: Name=") {
                node.name = Some(rest.trim().trim_matches('"').to_string());
            }
        }
        match bus.as_deref() {
            Some(BUS_USB) => devices.usb.push(node),
            Some(BUS_BLUETOOTH) => devices.wireless.push(node),
            _ => {}
        }
    }
    devices
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Enumerator answering from fixed lists; `None` simulates a failing source.
    #[derive(Default)]
    pub struct FakeEnumerator {
        pub usb: Option<Vec<DeviceNode>>,
        pub wireless: Option<Vec<DeviceNode>>,
    }

    impl DeviceEnumerator for FakeEnumerator {
        async fn usb_tree(&self) -> Result<Vec<DeviceNode>> {
            self.usb.clone().ok_or_else(|| HleError::Timeout {
                operation: "usb".into(),
                seconds: 9,
            })
        }

        async fn wireless_devices(&self) -> Result<Vec<DeviceNode>> {
            self.wireless
                .clone()
                .ok_or_else(|| HleError::Runtime("bluetooth off".into()))
        }
    }

    #[test]
    fn usb_json_keeps_nesting_and_partial_nodes() {
        let raw = r#"{
          "SPUSBDataType": [
            { "_name": "USB31Bus",
              "_items": [
                { "_name": "USB2.0 Hub", "vendor_id": "0x05e3",
                  "_items": [
                    { "_name": "Xbox Wireless Controller",
                      "vendor_id": "0x045e  (Microsoft Corporation)",
                      "product_id": "0x0b12" },
                    { "vendor_id": 17 }
                  ] }
              ] }
          ]
        }"#;
        let tree = parse_usb_json(raw).unwrap();
        let hub = &tree[0].children[0];
        assert_eq!(hub.name.as_deref(), Some("USB2.0 Hub"));
        assert_eq!(hub.children.len(), 2);
        assert_eq!(
            hub.children[0].vendor_id.as_deref(),
            Some("0x045e  (Microsoft Corporation)")
        );
        assert_eq!(hub.children[1], DeviceNode::default());
    }

    #[test]
    fn usb_json_without_section_is_empty_and_garbage_fails() {
        assert!(parse_usb_json("{}").unwrap().is_empty());
        assert!(matches!(parse_usb_json("not json"), Err(HleError::Serialization(_))));
    }

    #[test]
    fn bluetooth_json_lists_connected_devices() {
        let raw = r#"{
          "SPBluetoothDataType": [
            { "controller_properties": {},
              "device_connected": [
                { "DualSense Wireless Controller":
                    { "device_vendorID": "0x054C", "device_productID": "0x0CE6" } },
                { "Magic Mouse": {} }
              ],
              "device_not_connected": [ { "Old Pad": {} } ] }
          ]
        }"#;
        let devices = parse_bluetooth_json(raw).unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(
            devices[0],
            DeviceNode::leaf("DualSense Wireless Controller", Some("0x054C"), Some("0x0CE6"))
        );
        assert_eq!(devices[1].vendor_id, None);
    }

    #[test]
    fn proc_input_devices_split_by_bus() {
        let raw = "\
I: Bus=0003 Vendor=045e Product=028e Version=0114
N: Name=\"Microsoft X-Box 360 pad\"
P: Phys=usb-0000:00:14.0-2/input0

I: Bus=0005 Vendor=057e Product=2009 Version=8001
N: Name=\"Pro Controller\"

I: Bus=0011 Vendor=0001 Product=0001 Version=ab41
N: Name=\"AT Translated Set 2 keyboard\"
";
        let devices = parse_input_devices(raw);
        assert_eq!(
            devices.usb,
            vec![DeviceNode::leaf("Microsoft X-Box 360 pad", Some("045e"), Some("028e"))]
        );
        assert_eq!(devices.wireless.len(), 1);
        assert_eq!(devices.wireless[0].name.as_deref(), Some("Pro Controller"));
    }
}
