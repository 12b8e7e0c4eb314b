/*============================================================
  Synavera Project: Syn-HLE
  Module: synhle_core::controller
  Etiquette: Synavera Script Etiquette (Rust Profile v1.1.1)
  ------------------------------------------------------------
  Purpose:
    Identify attached game controllers, choose the active one
    and express its layout on the Nintendo 64 pad.

  Security / Safety Notes:
    Device data is untrusted text from the OS; it is only
    normalised and compared, never executed or persisted raw.

  Dependencies:
    serde for catalog loading and report output.

  Operational Scope:
    Shared types for registry, matcher, scanner, selection
    and emitter.

  Revision History:
    2026-03-12 COD  Typed target-button table replaces string
                    keyed maps.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Fixed target scheme as an enumeration
    - Registry borrowed, never mutated after load
============================================================*/

pub mod catalog;
pub mod emitter;
pub mod enumerate;
pub mod matcher;
pub mod registry;
pub mod scanner;
pub mod selection;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Buttons and controls of the Nintendo 64 pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetButton {
    A,
    B,
    Z,
    L,
    R,
    Start,
    CUp,
    CDown,
    CLeft,
    CRight,
    Analog,
    CButtons,
    Dpad,
}

impl TargetButton {
    pub const COUNT: usize = 13;

    pub const ALL: [TargetButton; Self::COUNT] = [
        TargetButton::A,
        TargetButton::B,
        TargetButton::Z,
        TargetButton::L,
        TargetButton::R,
        TargetButton::Start,
        TargetButton::CUp,
        TargetButton::CDown,
        TargetButton::CLeft,
        TargetButton::CRight,
        TargetButton::Analog,
        TargetButton::CButtons,
        TargetButton::Dpad,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TargetButton::A => "a",
            TargetButton::B => "b",
            TargetButton::Z => "z",
            TargetButton::L => "l",
            TargetButton::R => "r",
            TargetButton::Start => "start",
            TargetButton::CUp => "c_up",
            TargetButton::CDown => "c_down",
            TargetButton::CLeft => "c_left",
            TargetButton::CRight => "c_right",
            TargetButton::Analog => "analog",
            TargetButton::CButtons => "c_buttons",
            TargetButton::Dpad => "dpad",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TargetButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetButton {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|button| button.name() == wanted)
            .ok_or_else(|| format!("unknown N64 button `{value}`"))
    }
}

/// Profile layout on the target scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonMapping {
    /// Device already produces N64 signals; nothing to remap.
    Native,
    /// Source button name per target button; `None` passes the target through.
    Remap([Option<String>; TargetButton::COUNT]),
}

impl ButtonMapping {
    /// Build a remap table from `(target, source)` pairs.
    ///
    /// When a target appears twice the first source listed wins.
    pub fn remap<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (TargetButton, S)>,
        S: Into<String>,
    {
        let mut table: [Option<String>; TargetButton::COUNT] = Default::default();
        for (target, source) in pairs {
            let slot = &mut table[target.index()];
            if slot.is_none() {
                *slot = Some(source.into());
            }
        }
        ButtonMapping::Remap(table)
    }

    pub fn identity() -> Self {
        ButtonMapping::Remap(Default::default())
    }

    /// Source button explicitly bound to `target`, if any.
    pub fn source_for(&self, target: TargetButton) -> Option<&str> {
        match self {
            ButtonMapping::Native => None,
            ButtonMapping::Remap(table) => table[target.index()].as_deref(),
        }
    }
}

/// One immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerProfile {
    pub id: String,
    pub display_name: String,
    pub release_year: u16,
    /// Lower-cased at load; checked in listed order.
    pub name_patterns: Vec<String>,
    pub vendor_ids: Vec<u16>,
    /// Narrows `vendor_ids` when non-empty.
    pub product_ids: Vec<u16>,
    pub mapping: ButtonMapping,
    pub is_priority: bool,
}

/// Transport a device was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConnectionKind {
    #[serde(rename = "usb")]
    Usb,
    #[serde(rename = "wireless")]
    ShortRangeWireless,
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionKind::Usb => f.write_str("USB"),
            ConnectionKind::ShortRangeWireless => f.write_str("Bluetooth"),
        }
    }
}

/// Placeholder profile for devices that only look like controllers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProfile {
    pub display_name: String,
    pub release_year: u16,
    pub mapping: ButtonMapping,
}

/// Result of matching one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchedProfile<'r> {
    Known(&'r ControllerProfile),
    Unknown(UnknownProfile),
}

impl MatchedProfile<'_> {
    pub fn id(&self) -> &str {
        match self {
            MatchedProfile::Known(profile) => &profile.id,
            MatchedProfile::Unknown(_) => "unknown",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            MatchedProfile::Known(profile) => &profile.display_name,
            MatchedProfile::Unknown(unknown) => &unknown.display_name,
        }
    }

    pub fn release_year(&self) -> u16 {
        match self {
            MatchedProfile::Known(profile) => profile.release_year,
            MatchedProfile::Unknown(unknown) => unknown.release_year,
        }
    }

    pub fn is_priority(&self) -> bool {
        match self {
            MatchedProfile::Known(profile) => profile.is_priority,
            MatchedProfile::Unknown(_) => false,
        }
    }

    pub fn mapping(&self) -> &ButtonMapping {
        match self {
            MatchedProfile::Known(profile) => &profile.mapping,
            MatchedProfile::Unknown(unknown) => &unknown.mapping,
        }
    }
}

/// Device record after normalisation; unusable records never get this far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    pub name: String,
    pub vendor_id: Option<u16>,
    pub product_id: Option<u16>,
    pub connection: ConnectionKind,
}

/// One device from a scan together with its match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedController<'r> {
    pub record: DeviceRecord,
    pub matched: Option<MatchedProfile<'r>>,
}

/// Parse a USB vendor/product id as reported by the OS.
///
/// Accepts `0x057e`, `057E`, and `0x057e  (Nintendo Co., Ltd.)`.
pub fn parse_usb_id(raw: &str) -> Option<u16> {
    let token = raw.split_whitespace().next()?;
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    if digits.is_empty() || digits.len() > 4 {
        return None;
    }
    u16::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_button_names_round_trip_through_from_str() {
        for button in TargetButton::ALL {
            assert_eq!(button.name().parse::<TargetButton>().unwrap(), button);
        }
        assert!("c_diag".parse::<TargetButton>().is_err());
        assert_eq!(TargetButton::ALL.len(), TargetButton::COUNT);
    }

    #[test]
    fn remap_keeps_first_source_per_target() {
        let mapping = ButtonMapping::remap([
            (TargetButton::Z, "L2"),
            (TargetButton::Z, "ZL"),
            (TargetButton::A, "Cross"),
        ]);
        assert_eq!(mapping.source_for(TargetButton::Z), Some("L2"));
        assert_eq!(mapping.source_for(TargetButton::A), Some("Cross"));
        assert_eq!(mapping.source_for(TargetButton::B), None);
        assert_eq!(ButtonMapping::Native.source_for(TargetButton::A), None);
    }

    #[test]
    fn usb_ids_normalise_from_os_formats() {
        assert_eq!(parse_usb_id("0x057e  (Nintendo Co., Ltd.)"), Some(0x057E));
        assert_eq!(parse_usb_id("0X054C"), Some(0x054C));
        assert_eq!(parse_usb_id("045e"), Some(0x045E));
        assert_eq!(parse_usb_id(""), None);
        assert_eq!(parse_usb_id("apple_vendor_id"), None);
        assert_eq!(parse_usb_id("0x12345"), None);
    }
}
