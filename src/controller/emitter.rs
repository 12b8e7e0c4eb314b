/*============================================================
  Synavera Project: Syn-HLE
  Module: synhle_core::controller::emitter
  Etiquette: Synavera Script Etiquette (Rust Profile v1.1.1)
  ------------------------------------------------------------
  Purpose:
    Express the active controller's layout on every N64
    button and render it as a RetroArch append-config.

  Security / Safety Notes:
    Source button names come from the catalog; quotes are
    stripped before rendering into the config file.

  Dependencies:
    serde for report output.

  Operational Scope:
    Final stage of controller identification; the rendered
    config is persisted by the launcher.

  Revision History:
    2026-03-16 COD  Emitter with identity pass-through.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Native layouts emit nothing
    - Every target button accounted for
============================================================*/

use std::collections::BTreeMap;

use serde::Serialize;

use super::{ButtonMapping, TargetButton};

/// Binding for every N64 button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EmittedMapping {
    bindings: BTreeMap<TargetButton, String>,
}

impl EmittedMapping {
    pub fn source_for(&self, target: TargetButton) -> &str {
        self.bindings
            .get(&target)
            .map(String::as_str)
            .unwrap_or_else(|| target.name())
    }

    /// RetroArch append-config for player one.
    pub fn render_retroarch(&self, controller_name: &str) -> String {
        let mut out = format!(
            "# Generated by Syn-HLE {}\n# Controller: {}\n\n",
            env!("CARGO_PKG_VERSION"),
            sanitize(controller_name)
        );
        for target in TargetButton::ALL {
            if let Some(key) = retroarch_key(target) {
                out.push_str(&format!(
                    "input_player1_{key} = \"{}\"\n",
                    sanitize(self.source_for(target))
                ));
            }
        }
        out
    }
}

/// Emit the full binding table, or `None` for a native layout.
pub fn emit_mapping(mapping: &ButtonMapping) -> Option<EmittedMapping> {
    match mapping {
        ButtonMapping::Native => None,
        ButtonMapping::Remap(_) => Some(EmittedMapping {
            bindings: TargetButton::ALL
                .into_iter()
                .map(|target| {
                    let source = mapping.source_for(target).unwrap_or(target.name());
                    (target, source.to_string())
                })
                .collect(),
        }),
    }
}

/// RetroArch input key suffix for an N64 button; stick groups have none.
fn retroarch_key(target: TargetButton) -> Option<&'static str> {
    match target {
        TargetButton::A => Some("a"),
        TargetButton::B => Some("b"),
        TargetButton::Z => Some("l2"),
        TargetButton::L => Some("l"),
        TargetButton::R => Some("r"),
        TargetButton::Start => Some("start"),
        TargetButton::CUp => Some("r_y_minus"),
        TargetButton::CDown => Some("r_y_plus"),
        TargetButton::CLeft => Some("r_x_minus"),
        TargetButton::CRight => Some("r_x_plus"),
        TargetButton::Analog | TargetButton::CButtons | TargetButton::Dpad => None,
    }
}

fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '"' && !c.is_control())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unspecified_buttons_pass_through() {
        let mapping = ButtonMapping::remap([(TargetButton::A, "x"), (TargetButton::B, "y")]);
        let emitted = emit_mapping(&mapping).unwrap();
        assert_eq!(emitted.source_for(TargetButton::A), "x");
        assert_eq!(emitted.source_for(TargetButton::B), "y");
        assert_eq!(emitted.source_for(TargetButton::CUp), "c_up");
        let value = serde_json::to_value(&emitted).unwrap();
        assert_eq!(value.as_object().unwrap().len(), TargetButton::COUNT);
    }

    #[test]
    fn native_layout_emits_nothing() {
        assert!(emit_mapping(&ButtonMapping::Native).is_none());
    }

    #[test]
    fn retroarch_render_uses_player_one_keys() {
        let mapping = ButtonMapping::remap([(TargetButton::Z, "LT"), (TargetButton::A, "Cro\"ss")]);
        let rendered = emit_mapping(&mapping)
            .unwrap()
            .render_retroarch("Pad \"One\"");
        assert!(rendered.contains("# Controller: Pad One\n"));
        assert!(rendered.contains("input_player1_a = \"Cross\"\n"));
        assert!(rendered.contains("input_player1_l2 = \"LT\"\n"));
        assert!(rendered.contains("input_player1_start = \"start\"\n"));
        assert!(!rendered.contains("analog"));
    }

    #[test]
    fn report_form_is_keyed_by_button_name() {
        let mapping = ButtonMapping::remap([(TargetButton::CButtons, "Right Stick")]);
        let value = serde_json::to_value(emit_mapping(&mapping).unwrap()).unwrap();
        assert_eq!(value["c_buttons"], "Right Stick");
        assert_eq!(value["dpad"], "dpad");
    }
}
