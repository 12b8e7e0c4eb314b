/*============================================================
  Synavera Project: Syn-HLE
  Module: synhle_core::controller::registry
  Etiquette: Synavera Script Etiquette (Rust Profile v1.1.1)
  ------------------------------------------------------------
  Purpose:
    Immutable controller registry, built once from the
    built-in catalog or an operator supplied TOML catalog.

  Security / Safety Notes:
    Catalog files are parsed, validated and normalised before
    any profile becomes visible to the matcher.

  Dependencies:
    serde + toml for catalog files.

  Operational Scope:
    Loaded by the entry point and lent to the scanner and
    matcher for the lifetime of the process.

  Revision History:
    2026-03-12 COD  Registry with TOML catalog override.
    2026-03-20 COD  Era listing for --list-profiles.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Load once, never mutate
    - Reject malformed catalogs with a precise message
============================================================*/

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::{HleError, Result};

use super::catalog::{ProfileSeed, BUILTIN_PROFILES, GENERIC_PROFILE_ID};
use super::{parse_usb_id, ButtonMapping, ControllerProfile, TargetButton};

const NATIVE_KEYWORD: &str = "native";

/// Read-only catalog of controller profiles in declaration order.
#[derive(Debug, Clone)]
pub struct ControllerRegistry {
    profiles: Vec<ControllerProfile>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "profile")]
    profiles: Vec<ProfileEntry>,
}

#[derive(Debug, Deserialize)]
struct ProfileEntry {
    id: String,
    name: String,
    year: u16,
    #[serde(default)]
    patterns: Vec<String>,
    #[serde(default)]
    vendor_ids: Vec<String>,
    #[serde(default)]
    product_ids: Vec<String>,
    #[serde(default)]
    priority: bool,
    mapping: MappingEntry,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MappingEntry {
    Keyword(String),
    Table(BTreeMap<String, String>),
}

impl ControllerRegistry {
    pub fn builtin() -> Self {
        Self {
            profiles: BUILTIN_PROFILES.iter().map(profile_from_seed).collect(),
        }
    }

    /// Built-in catalog, or the TOML catalog at `path` when one is configured.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            None => Ok(Self::builtin()),
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|err| {
                    HleError::Config(format!(
                        "Failed to read controller catalog {}: {err}",
                        path.display()
                    ))
                })?;
                Self::from_toml(&raw).map_err(|err| match err {
                    HleError::Config(msg) => {
                        HleError::Config(format!("{}: {msg}", path.display()))
                    }
                    other => other,
                })
            }
        }
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(raw)
            .map_err(|err| HleError::Config(format!("Invalid controller catalog: {err}")))?;
        if file.profiles.is_empty() {
            return Err(HleError::Config("Controller catalog defines no profiles".into()));
        }

        let mut seen = HashSet::new();
        let mut profiles = Vec::with_capacity(file.profiles.len());
        for entry in file.profiles {
            if !seen.insert(entry.id.clone()) {
                return Err(HleError::Config(format!(
                    "Duplicate controller profile `{}`",
                    entry.id
                )));
            }
            profiles.push(profile_from_entry(entry)?);
        }
        Ok(Self { profiles })
    }

    pub fn profiles(&self) -> &[ControllerProfile] {
        &self.profiles
    }

    pub fn get(&self, id: &str) -> Option<&ControllerProfile> {
        self.profiles.iter().find(|profile| profile.id == id)
    }

    /// Mapping handed to controllers that only look generic.
    pub fn generic_mapping(&self) -> ButtonMapping {
        self.get(GENERIC_PROFILE_ID)
            .map(|profile| profile.mapping.clone())
            .unwrap_or_else(ButtonMapping::identity)
    }

    /// Profiles grouped by half-decade of release, oldest first.
    pub fn by_era(&self) -> BTreeMap<u16, Vec<&ControllerProfile>> {
        let mut eras: BTreeMap<u16, Vec<&ControllerProfile>> = BTreeMap::new();
        for profile in &self.profiles {
            eras.entry(era_of(profile.release_year))
                .or_default()
                .push(profile);
        }
        for group in eras.values_mut() {
            group.sort_by_key(|profile| profile.release_year);
        }
        eras
    }

    /// Human-readable catalog listing.
    pub fn render_listing(&self) -> String {
        let mut out = String::new();
        for (era, profiles) in self.by_era() {
            out.push_str(&format!("{era}-{}\n", era.saturating_add(4)));
            for profile in profiles {
                let marker = if profile.is_priority { "*" } else { " " };
                let layout = match profile.mapping {
                    ButtonMapping::Native => " [native]",
                    ButtonMapping::Remap(_) => "",
                };
                out.push_str(&format!(
                    "  {marker} {:<20} {} ({}){layout}\n",
                    profile.id, profile.display_name, profile.release_year
                ));
            }
        }
        out.push_str(&format!(
            "{} profiles; * = preferred when several controllers are attached\n",
            self.profiles.len()
        ));
        out
    }
}

/// Four-digit years keep era labels well-formed.
const MAX_RELEASE_YEAR: u16 = 9999;

fn era_of(year: u16) -> u16 {
    year - year % 5
}

fn profile_from_seed(seed: &ProfileSeed) -> ControllerProfile {
    ControllerProfile {
        id: seed.id.to_string(),
        display_name: seed.name.to_string(),
        release_year: seed.year,
        name_patterns: seed
            .patterns
            .iter()
            .map(|pattern| pattern.to_lowercase())
            .collect(),
        vendor_ids: seed.vendor_ids.to_vec(),
        product_ids: seed.product_ids.to_vec(),
        mapping: match seed.mapping {
            None => ButtonMapping::Native,
            Some(pairs) => ButtonMapping::remap(pairs.iter().copied()),
        },
        is_priority: seed.priority,
    }
}

fn profile_from_entry(entry: ProfileEntry) -> Result<ControllerProfile> {
    let id = entry.id;
    let ids = |raw: Vec<String>, kind: &str| -> Result<Vec<u16>> {
        raw.iter()
            .map(|value| {
                parse_usb_id(value).ok_or_else(|| {
                    HleError::Config(format!("Profile `{id}` has invalid {kind} `{value}`"))
                })
            })
            .collect()
    };
    if entry.year > MAX_RELEASE_YEAR {
        return Err(HleError::Config(format!(
            "Profile `{id}` has release year {} beyond {MAX_RELEASE_YEAR}",
            entry.year
        )));
    }
    let vendor_ids = ids(entry.vendor_ids, "vendor id")?;
    let product_ids = ids(entry.product_ids, "product id")?;

    let mapping = match entry.mapping {
        MappingEntry::Keyword(word) if word.eq_ignore_ascii_case(NATIVE_KEYWORD) => {
            ButtonMapping::Native
        }
        MappingEntry::Keyword(word) => {
            return Err(HleError::Config(format!(
                "Profile `{id}` mapping must be a table or \"native\" (got `{word}`)"
            )));
        }
        MappingEntry::Table(table) => {
            let mut pairs = Vec::with_capacity(table.len());
            for (target, source) in table {
                let target: TargetButton = target
                    .parse()
                    .map_err(|err| HleError::Config(format!("Profile `{id}`: {err}")))?;
                pairs.push((target, source));
            }
            ButtonMapping::remap(pairs)
        }
    };

    Ok(ControllerProfile {
        display_name: entry.name,
        release_year: entry.year,
        name_patterns: entry
            .patterns
            .iter()
            .map(|pattern| pattern.to_lowercase())
            .collect(),
        vendor_ids,
        product_ids,
        mapping,
        is_priority: entry.priority,
        id,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn registry_from(raw: &str) -> ControllerRegistry {
        ControllerRegistry::from_toml(raw).unwrap()
    }

    #[test]
    fn builtin_registry_normalises_patterns() {
        let registry = ControllerRegistry::builtin();
        assert!(registry.profiles().len() >= 45);
        let series = registry.get("xbox_series").unwrap();
        assert!(series.is_priority);
        assert!(series
            .name_patterns
            .iter()
            .all(|pattern| *pattern == pattern.to_lowercase()));
        assert_eq!(registry.get("n64").unwrap().mapping, ButtonMapping::Native);
    }

    #[test]
    fn generic_mapping_comes_from_catalog() {
        let registry = ControllerRegistry::builtin();
        assert_eq!(
            registry.generic_mapping().source_for(TargetButton::Z),
            Some("LT")
        );

        let bare = registry_from(
            r#"
            [[profile]]
            id = "pad"
            name = "Pad"
            year = 1999
            mapping = "native"
            "#,
        );
        assert_eq!(bare.generic_mapping(), ButtonMapping::identity());
    }

    #[test]
    fn toml_catalog_parses_ids_and_tables() {
        let registry = registry_from(
            r#"
            [[profile]]
            id = "switch_pro"
            name = "Switch Pro"
            year = 2017
            patterns = ["Pro Controller"]
            vendor_ids = ["0x057E"]
            product_ids = ["2009"]
            priority = true
            mapping = { a = "A", c_up = "X", z = "ZL" }
            "#,
        );
        let profile = &registry.profiles()[0];
        assert_eq!(profile.name_patterns, vec!["pro controller".to_string()]);
        assert_eq!(profile.vendor_ids, vec![0x057E]);
        assert_eq!(profile.product_ids, vec![0x2009]);
        assert_eq!(profile.mapping.source_for(TargetButton::CUp), Some("X"));
        assert!(profile.is_priority);
    }

    #[test]
    fn malformed_catalogs_are_rejected() {
        for raw in [
            "",
            "[[profile]]\nid = \"x\"\nname = \"X\"\nyear = 1990\nmapping = \"bogus\"\n",
            "[[profile]]\nid = \"x\"\nname = \"X\"\nyear = 1990\nmapping = { q = \"A\" }\n",
            "[[profile]]\nid = \"x\"\nname = \"X\"\nyear = 65535\nmapping = \"native\"\n",
            "[[profile]]\nid = \"x\"\nname = \"X\"\nyear = 70000\nmapping = \"native\"\n",
            "[[profile]]\nid = \"x\"\nname = \"X\"\nyear = 1990\nvendor_ids = [\"zz\"]\nmapping = \"native\"\n",
            "[[profile]]\nid = \"x\"\nname = \"X\"\nyear = 1990\nmapping = \"native\"\n\
             [[profile]]\nid = \"x\"\nname = \"Y\"\nyear = 1991\nmapping = \"native\"\n",
        ] {
            assert!(
                matches!(ControllerRegistry::from_toml(raw), Err(HleError::Config(_))),
                "accepted {raw:?}"
            );
        }
    }

    #[test]
    fn listing_groups_by_era() {
        let registry = ControllerRegistry::builtin();
        let eras = registry.by_era();
        assert!(eras.contains_key(&1985));
        assert!(eras[&2020].iter().any(|profile| profile.id == "ps5"));
        let listing = registry.render_listing();
        assert!(listing.starts_with("1980-1984\n"));
        assert!(listing.contains("* ps5"));
    }

    #[test]
    fn listing_accepts_latest_four_digit_year() {
        let registry = registry_from(
            r#"
            [[profile]]
            id = "far_future"
            name = "Far Future Pad"
            year = 9999
            mapping = "native"
            "#,
        );
        let listing = registry.render_listing();
        assert!(listing.starts_with("9995-9999\n"), "{listing}");
        assert!(listing.contains("far_future"));
    }
}
