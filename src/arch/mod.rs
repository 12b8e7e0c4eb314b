/*============================================================
  Synavera Project: Syn-HLE
  Module: synhle_core::arch
  Etiquette: Synavera Script Etiquette (Rust Profile v1.1.1)
  ------------------------------------------------------------
  Purpose:
    Architecture reconciliation between the RetroArch host
    process and the installed emulation core.

  Security / Safety Notes:
    Pure classification in this module; I/O lives in the
    probe, preferences and acquire submodules.

  Dependencies:
    serde for report serialization.

  Operational Scope:
    Shared vocabulary for the prober, resolver, validator and
    remediation loop.

  Revision History:
    2026-03-02 COD  Introduced variant and verdict types.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Closed enumerations for every decision outcome
    - Unknown treated as advisory, never as failure
============================================================*/

pub mod acquire;
pub mod native;
pub mod preferences;
pub mod probe;
pub mod remediation;
pub mod resolver;

use std::fmt;

use serde::Serialize;

/// Instruction-set flavour of a binary artifact or running process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ArchitectureVariant {
    #[serde(rename = "arm64")]
    Arm64,
    #[serde(rename = "x86_64")]
    X86_64,
    /// Artifact bundles more than one concrete variant.
    #[serde(rename = "universal")]
    Universal,
    #[serde(rename = "unknown")]
    Unknown,
}

impl ArchitectureVariant {
    /// Map one architecture tag reported by a platform tool.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "arm64" | "arm64e" | "aarch64" => Some(Self::Arm64),
            "x86_64" | "x86_64h" | "amd64" | "x64" => Some(Self::X86_64),
            _ => None,
        }
    }

    /// Collapse a list of tags into a single variant.
    ///
    /// Unrecognised tags are ignored; two or more distinct concrete
    /// variants make the artifact `Universal`.
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut found: Option<Self> = None;
        for variant in tags.into_iter().filter_map(|tag| Self::from_tag(tag.as_ref())) {
            match found {
                None => found = Some(variant),
                Some(existing) if existing != variant => return Self::Universal,
                Some(_) => {}
            }
        }
        found.unwrap_or(Self::Unknown)
    }

    pub fn is_concrete(self) -> bool {
        matches!(self, Self::Arm64 | Self::X86_64)
    }

    /// The other concrete variant, i.e. what a translation layer would run.
    pub fn counterpart(self) -> Option<Self> {
        match self {
            Self::Arm64 => Some(Self::X86_64),
            Self::X86_64 => Some(Self::Arm64),
            Self::Universal | Self::Unknown => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Arm64 => "arm64",
            Self::X86_64 => "x86_64",
            Self::Universal => "universal",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ArchitectureVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of comparing a plugin's variant with the resolved host variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityVerdict {
    Compatible,
    CompatibleViaUniversal,
    Mismatched,
    /// One side could not be probed; reconciliation is a no-op.
    Indeterminate,
}

impl CompatibilityVerdict {
    /// Whether the pair may be launched without repair.
    pub fn is_acceptable(self) -> bool {
        !matches!(self, Self::Mismatched)
    }
}

/// Classify a plugin/host variant pair.
pub fn validate(plugin: ArchitectureVariant, host: ArchitectureVariant) -> CompatibilityVerdict {
    use ArchitectureVariant::{Unknown, Universal};

    match (plugin, host) {
        (Unknown, _) | (_, Unknown) => CompatibilityVerdict::Indeterminate,
        (plugin, host) if plugin == host => CompatibilityVerdict::Compatible,
        (Universal, _) => CompatibilityVerdict::CompatibleViaUniversal,
        _ => CompatibilityVerdict::Mismatched,
    }
}

#[cfg(test)]
mod tests {
    use super::ArchitectureVariant::*;
    use super::*;

    const KNOWN: [ArchitectureVariant; 3] = [Arm64, X86_64, Universal];

    #[test]
    fn equal_known_variants_are_compatible() {
        for variant in KNOWN {
            assert_eq!(validate(variant, variant), CompatibilityVerdict::Compatible);
        }
    }

    #[test]
    fn universal_plugin_satisfies_any_concrete_host() {
        for host in [Arm64, X86_64] {
            assert_eq!(
                validate(Universal, host),
                CompatibilityVerdict::CompatibleViaUniversal
            );
        }
    }

    #[test]
    fn differing_concrete_variants_mismatch() {
        assert_eq!(validate(X86_64, Arm64), CompatibilityVerdict::Mismatched);
        assert_eq!(validate(Arm64, X86_64), CompatibilityVerdict::Mismatched);
    }

    #[test]
    fn unknown_on_either_side_is_indeterminate() {
        for other in [Arm64, X86_64, Universal, Unknown] {
            assert_eq!(validate(Unknown, other), CompatibilityVerdict::Indeterminate);
            assert_eq!(validate(other, Unknown), CompatibilityVerdict::Indeterminate);
        }
        assert!(CompatibilityVerdict::Indeterminate.is_acceptable());
    }

    #[test]
    fn tags_collapse_to_single_variant() {
        assert_eq!(ArchitectureVariant::from_tags(["arm64"]), Arm64);
        assert_eq!(ArchitectureVariant::from_tags(["x86_64", "x86_64h"]), X86_64);
        assert_eq!(ArchitectureVariant::from_tags(["x86_64", "arm64"]), Universal);
        assert_eq!(ArchitectureVariant::from_tags(["i386", "ppc"]), Unknown);
        assert_eq!(ArchitectureVariant::from_tags(Vec::<String>::new()), Unknown);
    }

    #[test]
    fn counterpart_only_for_concrete_variants() {
        assert_eq!(Arm64.counterpart(), Some(X86_64));
        assert_eq!(X86_64.counterpart(), Some(Arm64));
        assert_eq!(Universal.counterpart(), None);
    }
}
