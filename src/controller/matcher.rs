/*============================================================
  Synavera Project: Syn-HLE
  Module: synhle_core::controller::matcher
  Etiquette: Synavera Script Etiquette (Rust Profile v1.1.1)
  ------------------------------------------------------------
  Purpose:
    Match one device record against the registry: name
    patterns, then vendor/product ids, then generic keywords.

  Security / Safety Notes:
    Pure function over borrowed data.

  Dependencies:
    None.

  Operational Scope:
    Called by the scanner once per enumerated device.

  Revision History:
    2026-03-13 COD  Three-tier matcher.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Registry order decides ties
    - Specific signals before shared ones
============================================================*/

use super::registry::ControllerRegistry;
use super::{DeviceRecord, MatchedProfile, UnknownProfile};

const GENERIC_KEYWORDS: [&str; 5] = ["controller", "gamepad", "joystick", "joypad", "game pad"];
const UNKNOWN_RELEASE_YEAR: u16 = 2000;

/// Find the profile describing `device`, if any.
pub fn match_device<'r>(
    registry: &'r ControllerRegistry,
    device: &DeviceRecord,
) -> Option<MatchedProfile<'r>> {
    let name = device.name.to_lowercase();

    // Tier 1 runs over the whole registry before ids are consulted.
    for profile in registry.profiles() {
        if profile
            .name_patterns
            .iter()
            .any(|pattern| !pattern.is_empty() && name.contains(pattern.as_str()))
        {
            return Some(MatchedProfile::Known(profile));
        }
    }

    if let Some(vendor) = device.vendor_id {
        for profile in registry.profiles() {
            if !profile.vendor_ids.contains(&vendor) {
                continue;
            }
            if profile.product_ids.is_empty()
                || device
                    .product_id
                    .is_some_and(|product| profile.product_ids.contains(&product))
            {
                return Some(MatchedProfile::Known(profile));
            }
        }
    }

    if GENERIC_KEYWORDS.iter().any(|keyword| name.contains(keyword)) {
        return Some(MatchedProfile::Unknown(UnknownProfile {
            display_name: format!("Unknown Controller ({})", device.name),
            release_year: UNKNOWN_RELEASE_YEAR,
            mapping: registry.generic_mapping(),
        }));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::super::registry::tests::registry_from;
    use super::super::{ButtonMapping, ConnectionKind};
    use super::*;

    fn device(name: &str, vendor: Option<u16>, product: Option<u16>) -> DeviceRecord {
        DeviceRecord {
            name: name.into(),
            vendor_id: vendor,
            product_id: product,
            connection: ConnectionKind::Usb,
        }
    }

    fn sample_registry() -> ControllerRegistry {
        registry_from(
            r#"
            [[profile]]
            id = "by_vendor"
            name = "Vendor Pad"
            year = 1996
            vendor_ids = ["0x057e"]
            mapping = "native"

            [[profile]]
            id = "by_name"
            name = "Named Pad"
            year = 2013
            patterns = ["Xbox Wireless"]
            vendor_ids = ["0x045e"]
            mapping = { a = "A" }

            [[profile]]
            id = "narrowed"
            name = "Narrowed Pad"
            year = 2020
            vendor_ids = ["0x054c"]
            product_ids = ["0x0ce6"]
            mapping = { a = "X" }
            "#,
        )
    }

    #[test]
    fn name_pattern_beats_vendor_id() {
        let registry = sample_registry();
        let matched = match_device(&registry, &device("Xbox Wireless Pad", Some(0x057E), None));
        assert_eq!(matched.unwrap().id(), "by_name");
    }

    #[test]
    fn name_pattern_ignores_case_and_missing_ids() {
        let registry = sample_registry();
        for name in ["Xbox Wireless Controller", "XBOX wireless controller"] {
            let matched = match_device(&registry, &device(name, None, None)).unwrap();
            assert_eq!(matched.id(), "by_name");
        }
    }

    #[test]
    fn product_ids_narrow_vendor_membership() {
        let registry = sample_registry();
        let hit = match_device(&registry, &device("Pad", Some(0x054C), Some(0x0CE6)));
        assert_eq!(hit.unwrap().id(), "narrowed");
        assert!(match_device(&registry, &device("Pad", Some(0x054C), Some(0x05C4))).is_none());
        assert!(match_device(&registry, &device("Pad", Some(0x054C), None)).is_none());
    }

    #[test]
    fn generic_keyword_synthesizes_unknown_profile() {
        let registry = sample_registry();
        let matched = match_device(&registry, &device("Acme USB Joypad", None, None)).unwrap();
        assert_eq!(matched.id(), "unknown");
        assert_eq!(matched.display_name(), "Unknown Controller (Acme USB Joypad)");
        assert_eq!(matched.release_year(), 2000);
        assert!(!matched.is_priority());
        assert_eq!(matched.mapping(), &ButtonMapping::identity());
    }

    #[test]
    fn unrelated_device_has_no_match() {
        let registry = sample_registry();
        assert!(match_device(&registry, &device("USB Keyboard", Some(0x05AC), None)).is_none());
    }

    #[test]
    fn vendor_only_profile_accepts_any_product() {
        let registry = sample_registry();
        let matched = match_device(&registry, &device("Pad", Some(0x057E), Some(0x1234)));
        assert_eq!(matched.unwrap().id(), "by_vendor");
        let matched = match_device(&registry, &device("Pad", Some(0x057E), None));
        assert_eq!(matched.unwrap().id(), "by_vendor");
    }

    #[test]
    fn builtin_catalog_resolves_common_names() {
        let registry = ControllerRegistry::builtin();
        let cases = [
            ("Xbox Wireless Controller", "xbox_series"),
            ("Xbox One Wireless Controller", "xbox_one"),
            ("Xbox Elite Wireless Controller Series 2", "xbox_elite_2"),
            ("PS5 Controller", "ps5"),
            ("Pro Controller", "switch_pro"),
            ("raphnet technologies N64 to USB", "raphnet_n64"),
        ];
        for (name, expected) in cases {
            let matched = match_device(&registry, &device(name, None, None)).unwrap();
            assert_eq!(matched.id(), expected, "{name}");
        }
    }

    #[test]
    fn broad_patterns_do_not_shadow_named_pads() {
        let registry = ControllerRegistry::builtin();
        let cases = [
            ("DualSense Wireless Controller", "ps5", true),
            ("DualSense Edge Wireless Controller", "ps5_edge", true),
            ("Wireless Controller", "ps4", false),
            ("HORI Real Arcade Pro", "hori_rap", false),
            ("Real Arcade Pro.4", "hori_rap", false),
            ("HORI Split Pad Pro", "hori_split_pad", true),
            ("Fight Stick", "arcade_stick", false),
        ];
        for (name, expected, priority) in cases {
            let matched = match_device(&registry, &device(name, None, None)).unwrap();
            assert_eq!(matched.id(), expected, "{name}");
            assert_eq!(matched.is_priority(), priority, "{name}");
        }
    }
}
