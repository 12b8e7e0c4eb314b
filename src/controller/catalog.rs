/*============================================================
  Synavera Project: Syn-HLE
  Module: synhle_core::controller::catalog
  Etiquette: Synavera Script Etiquette (Rust Profile v1.1.1)
  ------------------------------------------------------------
  Purpose:
    Built-in catalog of historical controller profiles, 1980
    onwards, with their N64 layouts.

  Security / Safety Notes:
    Static data only.

  Dependencies:
    None beyond the controller types.

  Operational Scope:
    Default source for the controller registry when no TOML
    catalog is configured.

  Revision History:
    2026-03-12 COD  Seeded catalog from the frontend database.
    2026-04-02 COD  Named pads ordered ahead of the broader
                    patterns that contain their names.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Declaration order is match order
    - Data, not code
============================================================*/

use super::TargetButton::{self, *};

/// Id of the profile whose mapping is reused for unrecognised controllers.
pub const GENERIC_PROFILE_ID: &str = "generic_xinput";

/// Static description of one profile.
#[derive(Debug)]
pub struct ProfileSeed {
    pub id: &'static str,
    pub name: &'static str,
    pub year: u16,
    pub patterns: &'static [&'static str],
    pub vendor_ids: &'static [u16],
    pub product_ids: &'static [u16],
    /// `None` marks a native N64 layout.
    pub mapping: Option<&'static [(TargetButton, &'static str)]>,
    pub priority: bool,
}

const PLAYSTATION: &[(TargetButton, &str)] = &[
    (A, "X"),
    (B, "O"),
    (CLeft, "Square"),
    (CUp, "Triangle"),
    (L, "L1"),
    (R, "R1"),
    (Z, "L2"),
    (Start, "Start"),
    (Analog, "Left Stick"),
];

const PLAYSTATION_DUAL_STICK: &[(TargetButton, &str)] = &[
    (A, "X"),
    (B, "O"),
    (CLeft, "Square"),
    (CUp, "Triangle"),
    (L, "L1"),
    (R, "R1"),
    (Z, "L2"),
    (Start, "Options"),
    (Analog, "Left Stick"),
    (CButtons, "Right Stick"),
];

const XBOX_MODERN: &[(TargetButton, &str)] = &[
    (A, "A"),
    (B, "B"),
    (CUp, "X"),
    (CLeft, "Y"),
    (L, "LB"),
    (R, "RB"),
    (Z, "LT"),
    (Start, "Menu"),
    (Analog, "Left Stick"),
    (CButtons, "Right Stick"),
];

const NINTENDO_DUAL_STICK: &[(TargetButton, &str)] = &[
    (A, "A"),
    (B, "B"),
    (CUp, "X"),
    (CLeft, "Y"),
    (L, "L"),
    (R, "R"),
    (Z, "ZL"),
    (Start, "+"),
    (Analog, "Left Stick"),
    (CButtons, "Right Stick"),
];

const FACE_L1_DUAL_STICK: &[(TargetButton, &str)] = &[
    (A, "A"),
    (B, "B"),
    (CUp, "X"),
    (CLeft, "Y"),
    (L, "L1"),
    (R, "R1"),
    (Z, "L2"),
    (Start, "Menu"),
    (Analog, "Left Stick"),
    (CButtons, "Right Stick"),
];

pub static BUILTIN_PROFILES: &[ProfileSeed] = &[
    // 1985-1989
    ProfileSeed {
        id: "nes",
        name: "NES Controller",
        year: 1985,
        patterns: &[],
        vendor_ids: &[0x0079],
        product_ids: &[],
        mapping: Some(&[(A, "A"), (B, "B"), (Start, "Start")]),
        priority: false,
    },
    ProfileSeed {
        id: "atari_7800",
        name: "Atari 7800 ProLine",
        year: 1986,
        patterns: &[],
        vendor_ids: &[0x0001],
        product_ids: &[],
        mapping: Some(&[(A, "Fire1"), (B, "Fire2")]),
        priority: false,
    },
    ProfileSeed {
        id: "master_system",
        name: "Sega Master System",
        year: 1986,
        patterns: &[],
        vendor_ids: &[],
        product_ids: &[],
        mapping: Some(&[(A, "1"), (B, "2")]),
        priority: false,
    },
    // 1990-1994
    ProfileSeed {
        id: "snes",
        name: "SNES Controller",
        year: 1990,
        patterns: &[],
        vendor_ids: &[0x0079, 0x081F],
        product_ids: &[],
        mapping: Some(&[
            (A, "A"),
            (B, "B"),
            (CUp, "X"),
            (CLeft, "Y"),
            (L, "L"),
            (R, "R"),
            (Start, "Start"),
        ]),
        priority: false,
    },
    ProfileSeed {
        id: "genesis_3btn",
        name: "Sega Genesis 3-Button",
        year: 1989,
        patterns: &[],
        vendor_ids: &[0x0079],
        product_ids: &[],
        mapping: Some(&[(A, "A"), (B, "B"), (CDown, "C"), (Start, "Start")]),
        priority: false,
    },
    ProfileSeed {
        id: "genesis_6btn",
        name: "Sega Genesis 6-Button",
        year: 1993,
        patterns: &[],
        vendor_ids: &[0x0079, 0x1BAD],
        product_ids: &[],
        mapping: Some(&[
            (A, "A"),
            (B, "B"),
            (CDown, "C"),
            (CUp, "X"),
            (CLeft, "Y"),
            (CRight, "Z"),
            (Start, "Start"),
        ]),
        priority: false,
    },
    ProfileSeed {
        id: "turbografx",
        name: "TurboGrafx-16",
        year: 1989,
        patterns: &[],
        vendor_ids: &[],
        product_ids: &[],
        mapping: Some(&[(A, "I"), (B, "II"), (Start, "Run")]),
        priority: false,
    },
    ProfileSeed {
        id: "neo_geo",
        name: "Neo Geo AES",
        year: 1990,
        patterns: &[],
        vendor_ids: &[],
        product_ids: &[],
        mapping: Some(&[(A, "A"), (B, "B"), (CDown, "C"), (CRight, "D"), (Start, "Start")]),
        priority: false,
    },
    // 1995-1999
    ProfileSeed {
        id: "ps1",
        name: "PlayStation DualShock",
        year: 1997,
        patterns: &[],
        vendor_ids: &[0x054C],
        product_ids: &[],
        mapping: Some(PLAYSTATION),
        priority: false,
    },
    ProfileSeed {
        id: "saturn",
        name: "Sega Saturn",
        year: 1995,
        patterns: &[],
        vendor_ids: &[0x0CA3],
        product_ids: &[],
        mapping: Some(&[
            (A, "A"),
            (B, "B"),
            (CDown, "C"),
            (CUp, "X"),
            (CLeft, "Y"),
            (CRight, "Z"),
            (L, "L"),
            (R, "R"),
            (Start, "Start"),
        ]),
        priority: false,
    },
    ProfileSeed {
        id: "n64",
        name: "Nintendo 64",
        year: 1996,
        patterns: &[],
        vendor_ids: &[0x0079, 0x057E],
        product_ids: &[],
        mapping: None,
        priority: false,
    },
    ProfileSeed {
        id: "dreamcast",
        name: "Sega Dreamcast",
        year: 1999,
        patterns: &[],
        vendor_ids: &[0x0CA3],
        product_ids: &[],
        mapping: Some(&[
            (A, "A"),
            (B, "B"),
            (CUp, "X"),
            (CLeft, "Y"),
            (L, "L"),
            (R, "R"),
            (Start, "Start"),
            (Analog, "Analog Stick"),
        ]),
        priority: false,
    },
    // 2000-2004
    ProfileSeed {
        id: "ps2",
        name: "PlayStation 2 DualShock 2",
        year: 2000,
        patterns: &[],
        vendor_ids: &[0x054C],
        product_ids: &[],
        mapping: Some(PLAYSTATION),
        priority: false,
    },
    ProfileSeed {
        id: "xbox_duke",
        name: "Xbox Duke",
        year: 2001,
        patterns: &[],
        vendor_ids: &[0x045E],
        product_ids: &[],
        mapping: Some(&[
            (A, "A"),
            (B, "B"),
            (CUp, "X"),
            (CLeft, "Y"),
            (CRight, "Black"),
            (CDown, "White"),
            (L, "L"),
            (R, "R"),
            (Start, "Start"),
            (Analog, "Left Stick"),
        ]),
        priority: false,
    },
    ProfileSeed {
        id: "xbox_s",
        name: "Xbox Controller S",
        year: 2002,
        patterns: &[],
        vendor_ids: &[0x045E],
        product_ids: &[],
        mapping: Some(&[
            (A, "A"),
            (B, "B"),
            (CUp, "X"),
            (CLeft, "Y"),
            (L, "L"),
            (R, "R"),
            (Start, "Start"),
            (Analog, "Left Stick"),
        ]),
        priority: false,
    },
    ProfileSeed {
        id: "gamecube",
        name: "Nintendo GameCube",
        year: 2001,
        patterns: &[],
        vendor_ids: &[0x057E, 0x0079],
        product_ids: &[],
        mapping: Some(&[
            (A, "A"),
            (B, "B"),
            (CUp, "X"),
            (CLeft, "Y"),
            (Z, "Z"),
            (L, "L"),
            (R, "R"),
            (Start, "Start"),
            (Analog, "Control Stick"),
            (CButtons, "C-Stick"),
        ]),
        priority: false,
    },
    // 2005-2009
    ProfileSeed {
        id: "xbox_360",
        name: "Xbox 360",
        year: 2005,
        patterns: &["Xbox 360", "X360"],
        vendor_ids: &[0x045E, 0x24C6, 0x0738],
        product_ids: &[],
        mapping: Some(&[
            (A, "A"),
            (B, "B"),
            (CUp, "X"),
            (CLeft, "Y"),
            (L, "LB"),
            (R, "RB"),
            (Z, "LT"),
            (Start, "Start"),
            (Analog, "Left Stick"),
            (CButtons, "Right Stick"),
        ]),
        priority: false,
    },
    ProfileSeed {
        id: "ps3",
        name: "PlayStation 3 DualShock 3/Sixaxis",
        year: 2006,
        patterns: &["PLAYSTATION(R)3", "DUALSHOCK 3", "SIXAXIS"],
        vendor_ids: &[0x054C],
        product_ids: &[],
        mapping: Some(&[
            (A, "X"),
            (B, "O"),
            (CLeft, "Square"),
            (CUp, "Triangle"),
            (L, "L1"),
            (R, "R1"),
            (Z, "L2"),
            (Start, "Start"),
            (Analog, "Left Stick"),
            (CButtons, "Right Stick"),
        ]),
        priority: false,
    },
    ProfileSeed {
        id: "wii_remote",
        name: "Wii Remote",
        year: 2006,
        patterns: &["Wii Remote", "RVL-CNT"],
        vendor_ids: &[0x057E],
        product_ids: &[],
        mapping: Some(&[(A, "A"), (B, "B"), (CDown, "1"), (CUp, "2"), (Start, "+")]),
        priority: false,
    },
    ProfileSeed {
        id: "wii_classic",
        name: "Wii Classic Controller",
        year: 2006,
        patterns: &[],
        vendor_ids: &[0x057E],
        product_ids: &[],
        mapping: Some(&[
            (A, "a"),
            (B, "b"),
            (CUp, "x"),
            (CLeft, "y"),
            (L, "L"),
            (R, "R"),
            (Z, "ZL"),
            (Start, "+"),
            (Analog, "Left Stick"),
        ]),
        priority: false,
    },
    // 2010-2014
    ProfileSeed {
        id: "wii_u_pro",
        name: "Wii U Pro Controller",
        year: 2012,
        patterns: &["Wii U Pro"],
        vendor_ids: &[0x057E],
        product_ids: &[],
        mapping: Some(NINTENDO_DUAL_STICK),
        priority: false,
    },
    ProfileSeed {
        id: "wii_u_gamepad",
        name: "Wii U GamePad",
        year: 2012,
        patterns: &[],
        vendor_ids: &[0x057E],
        product_ids: &[],
        mapping: Some(&[
            (A, "A"),
            (B, "B"),
            (CUp, "X"),
            (CLeft, "Y"),
            (L, "L"),
            (R, "R"),
            (Z, "ZL"),
            (Start, "+"),
            (Analog, "Left Stick"),
        ]),
        priority: false,
    },
    // 2015-2019
    ProfileSeed {
        id: "steam_controller",
        name: "Steam Controller",
        year: 2015,
        patterns: &["Steam Controller", "Valve Software Steam Controller"],
        vendor_ids: &[0x28DE],
        product_ids: &[],
        mapping: Some(&[
            (A, "A"),
            (B, "B"),
            (CUp, "X"),
            (CLeft, "Y"),
            (L, "LB"),
            (R, "RB"),
            (Z, "LT"),
            (Start, "Start"),
            (Analog, "Joystick"),
            (CButtons, "Right Trackpad"),
        ]),
        priority: false,
    },
    // Nintendo Switch
    ProfileSeed {
        id: "switch_pro",
        name: "Nintendo Switch Pro Controller",
        year: 2017,
        patterns: &["Pro Controller", "Switch Pro"],
        vendor_ids: &[0x057E],
        product_ids: &[0x2009],
        mapping: Some(NINTENDO_DUAL_STICK),
        priority: true,
    },
    ProfileSeed {
        id: "joycon_l",
        name: "Nintendo Switch Joy-Con (L)",
        year: 2017,
        patterns: &["Joy-Con (L)", "Joy-Con Left"],
        vendor_ids: &[0x057E],
        product_ids: &[0x2006],
        mapping: Some(&[(L, "L"), (Z, "ZL"), (Start, "-"), (Analog, "Stick")]),
        priority: true,
    },
    ProfileSeed {
        id: "joycon_r",
        name: "Nintendo Switch Joy-Con (R)",
        year: 2017,
        patterns: &["Joy-Con (R)", "Joy-Con Right"],
        vendor_ids: &[0x057E],
        product_ids: &[0x2007],
        mapping: Some(&[
            (A, "A"),
            (B, "B"),
            (CUp, "X"),
            (CLeft, "Y"),
            (R, "R"),
            (Z, "ZR"),
            (Start, "+"),
            (CButtons, "Stick"),
        ]),
        priority: true,
    },
    ProfileSeed {
        id: "joycon_pair",
        name: "Nintendo Switch Joy-Con Pair",
        year: 2017,
        patterns: &["Joy-Con", "Combined Joy-Con"],
        vendor_ids: &[0x057E],
        product_ids: &[],
        mapping: Some(NINTENDO_DUAL_STICK),
        priority: true,
    },
    ProfileSeed {
        id: "switch_snes",
        name: "Nintendo Switch SNES Controller",
        year: 2019,
        patterns: &[],
        vendor_ids: &[0x057E],
        product_ids: &[0x2017],
        mapping: Some(&[
            (A, "A"),
            (B, "B"),
            (CUp, "X"),
            (CLeft, "Y"),
            (L, "L"),
            (R, "R"),
            (Start, "+"),
        ]),
        priority: false,
    },
    ProfileSeed {
        id: "switch_n64",
        name: "Nintendo Switch N64 Controller",
        year: 2021,
        patterns: &[],
        vendor_ids: &[0x057E],
        product_ids: &[0x2019],
        mapping: None,
        priority: true,
    },
    // Xbox and PlayStation, newest hardware first
    ProfileSeed {
        id: "xbox_series",
        name: "Xbox Series X|S",
        year: 2020,
        patterns: &["Xbox Series", "Xbox Wireless Controller"],
        vendor_ids: &[0x045E],
        product_ids: &[0x0B13, 0x0B20, 0x0B21, 0x0B22],
        mapping: Some(XBOX_MODERN),
        priority: true,
    },
    ProfileSeed {
        id: "xbox_elite_2",
        name: "Xbox Elite Series 2",
        year: 2019,
        patterns: &["Xbox Elite"],
        vendor_ids: &[0x045E],
        product_ids: &[0x0B00, 0x0B05],
        mapping: Some(XBOX_MODERN),
        priority: true,
    },
    ProfileSeed {
        id: "xbox_one",
        name: "Xbox One",
        year: 2013,
        patterns: &["Xbox One", "Xbox Wireless"],
        vendor_ids: &[0x045E, 0x0E6F, 0x24C6],
        product_ids: &[0x02D1, 0x02DD, 0x02E3, 0x02EA, 0x0B00, 0x0B0A, 0x0B12],
        mapping: Some(XBOX_MODERN),
        priority: false,
    },
    ProfileSeed {
        id: "ps5_edge",
        name: "PlayStation 5 DualSense Edge",
        year: 2023,
        patterns: &["DualSense Edge"],
        vendor_ids: &[0x054C],
        product_ids: &[0x0D5E],
        mapping: Some(PLAYSTATION_DUAL_STICK),
        priority: true,
    },
    ProfileSeed {
        id: "ps5",
        name: "PlayStation 5 DualSense",
        year: 2020,
        patterns: &["DualSense", "PS5 Controller"],
        vendor_ids: &[0x054C],
        product_ids: &[0x0CE6, 0x0DF2],
        mapping: Some(PLAYSTATION_DUAL_STICK),
        priority: true,
    },
    // Third party
    ProfileSeed {
        id: "8bitdo_pro2",
        name: "8BitDo Pro 2",
        year: 2021,
        patterns: &["8BitDo Pro 2", "Pro 2"],
        vendor_ids: &[0x2DC8, 0x045E],
        product_ids: &[],
        mapping: Some(&[
            (A, "A"),
            (B, "B"),
            (CUp, "X"),
            (CLeft, "Y"),
            (L, "L"),
            (R, "R"),
            (Z, "L2"),
            (Start, "+"),
            (Analog, "Left Stick"),
            (CButtons, "Right Stick"),
        ]),
        priority: true,
    },
    ProfileSeed {
        id: "8bitdo_sn30",
        name: "8BitDo SN30 Pro",
        year: 2018,
        patterns: &["8BitDo SN30", "SN30 Pro"],
        vendor_ids: &[0x2DC8],
        product_ids: &[],
        mapping: Some(&[
            (A, "A"),
            (B, "B"),
            (CUp, "X"),
            (CLeft, "Y"),
            (L, "L"),
            (R, "R"),
            (Z, "L2"),
            (Start, "+"),
            (Analog, "Left Stick"),
        ]),
        priority: false,
    },
    ProfileSeed {
        id: "8bitdo_ultimate",
        name: "8BitDo Ultimate Controller",
        year: 2022,
        patterns: &["8BitDo Ultimate", "Ultimate Controller"],
        vendor_ids: &[0x2DC8],
        product_ids: &[],
        mapping: Some(&[
            (A, "A"),
            (B, "B"),
            (CUp, "X"),
            (CLeft, "Y"),
            (L, "L"),
            (R, "R"),
            (Z, "L2"),
            (Start, "+"),
            (Analog, "Left Stick"),
            (CButtons, "Right Stick"),
        ]),
        priority: true,
    },
    ProfileSeed {
        id: "backbone_one",
        name: "Backbone One",
        year: 2020,
        patterns: &["Backbone One", "Backbone"],
        vendor_ids: &[0x358A],
        product_ids: &[],
        mapping: Some(FACE_L1_DUAL_STICK),
        priority: true,
    },
    ProfileSeed {
        id: "razer_kishi",
        name: "Razer Kishi",
        year: 2020,
        patterns: &["Razer Kishi", "Kishi"],
        vendor_ids: &[0x1532],
        product_ids: &[],
        mapping: Some(FACE_L1_DUAL_STICK),
        priority: true,
    },
    ProfileSeed {
        id: "gulikit_kingkong",
        name: "GuliKit KingKong Pro",
        year: 2021,
        patterns: &["GuliKit", "KingKong"],
        vendor_ids: &[0x0E8F],
        product_ids: &[],
        mapping: Some(NINTENDO_DUAL_STICK),
        priority: true,
    },
    // Arcade and fight sticks ahead of the catch-all "HORI" pattern
    ProfileSeed {
        id: "hori_rap",
        name: "HORI Real Arcade Pro",
        year: 2005,
        patterns: &["Real Arcade Pro", "HORI RAP", "HORI Arcade"],
        vendor_ids: &[0x0F0D],
        product_ids: &[],
        mapping: Some(&[
            (A, "X"),
            (B, "O"),
            (CLeft, "Square"),
            (CUp, "Triangle"),
            (L, "L1"),
            (R, "R1"),
            (Z, "L2"),
            (Start, "Options"),
            (Analog, "Joystick"),
        ]),
        priority: false,
    },
    ProfileSeed {
        id: "arcade_stick",
        name: "Generic Arcade Stick",
        year: 1980,
        patterns: &["Arcade", "Fight Stick", "Fightstick"],
        vendor_ids: &[],
        product_ids: &[],
        mapping: Some(&[
            (A, "1"),
            (B, "2"),
            (CDown, "3"),
            (CUp, "4"),
            (L, "5"),
            (R, "6"),
            (Start, "Start"),
            (Analog, "Joystick"),
        ]),
        priority: false,
    },
    ProfileSeed {
        id: "hori_split_pad",
        name: "HORI Split Pad Pro",
        year: 2019,
        patterns: &["Split Pad", "HORI"],
        vendor_ids: &[0x0F0D],
        product_ids: &[],
        mapping: Some(NINTENDO_DUAL_STICK),
        priority: true,
    },
    // DualShock 4 pairs as a bare "Wireless Controller"; named pads precede it.
    ProfileSeed {
        id: "ps4",
        name: "PlayStation 4 DualShock 4",
        year: 2013,
        patterns: &["DualShock 4", "Wireless Controller"],
        vendor_ids: &[0x054C],
        product_ids: &[0x05C4, 0x09CC, 0x0BA0],
        mapping: Some(PLAYSTATION_DUAL_STICK),
        priority: false,
    },
    // Retro USB adapters
    ProfileSeed {
        id: "raphnet_n64",
        name: "Raphnet N64 to USB",
        year: 2010,
        patterns: &["raphnet", "N64 to USB"],
        vendor_ids: &[0x289B],
        product_ids: &[],
        mapping: None,
        priority: false,
    },
    ProfileSeed {
        id: "mayflash_n64",
        name: "Mayflash N64 Adapter",
        year: 2012,
        patterns: &["Mayflash", "N64"],
        vendor_ids: &[0x0079, 0x0E8F],
        product_ids: &[],
        mapping: None,
        priority: false,
    },
    ProfileSeed {
        id: "retro_usb",
        name: "RetroUSB AVS/Retro Controller",
        year: 2010,
        patterns: &["RetroUSB", "AVS"],
        vendor_ids: &[0x1781],
        product_ids: &[],
        mapping: Some(&[(A, "A"), (B, "B"), (Start, "Start")]),
        priority: false,
    },
    // Generic
    ProfileSeed {
        id: GENERIC_PROFILE_ID,
        name: "Generic XInput Controller",
        year: 2005,
        patterns: &["XInput", "Controller", "Gamepad", "Game Controller"],
        vendor_ids: &[],
        product_ids: &[],
        mapping: Some(&[
            (A, "A"),
            (B, "B"),
            (CUp, "X"),
            (CLeft, "Y"),
            (L, "LB"),
            (R, "RB"),
            (Z, "LT"),
            (Start, "Start"),
            (Analog, "Left Stick"),
            (CButtons, "Right Stick"),
        ]),
        priority: false,
    },
    ProfileSeed {
        id: "generic_dinput",
        name: "Generic DirectInput Controller",
        year: 1995,
        patterns: &["DirectInput", "USB Gamepad", "USB Joystick"],
        vendor_ids: &[],
        product_ids: &[],
        mapping: Some(&[
            (A, "Button 1"),
            (B, "Button 2"),
            (CDown, "Button 3"),
            (CUp, "Button 4"),
            (L, "L1"),
            (R, "R1"),
            (Start, "Start"),
        ]),
        priority: false,
    },
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn ids_are_unique_and_generic_present() {
        let mut seen = HashSet::new();
        for seed in BUILTIN_PROFILES {
            assert!(seen.insert(seed.id), "duplicate id {}", seed.id);
        }
        assert!(seen.contains(GENERIC_PROFILE_ID));
    }

    #[test]
    fn product_ids_only_appear_with_vendor_ids() {
        for seed in BUILTIN_PROFILES {
            if !seed.product_ids.is_empty() {
                assert!(!seed.vendor_ids.is_empty(), "{} narrows nothing", seed.id);
            }
        }
    }
}
