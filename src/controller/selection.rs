/*============================================================
  Synavera Project: Syn-HLE
  Module: synhle_core::controller::selection
  Etiquette: Synavera Script Etiquette (Rust Profile v1.1.1)
  ------------------------------------------------------------
  Purpose:
    Choose the active controller from a scan snapshot.

  Security / Safety Notes:
    Pure function.

  Dependencies:
    None.

  Operational Scope:
    Runs once per snapshot, before the mapping emitter.

  Revision History:
    2026-03-15 COD  Priority-then-year selection.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Deterministic for identical input
============================================================*/

use super::scanner::ScanSnapshot;
use super::DetectedController;

/// Active controller: priority profiles first, then oldest release year.
///
/// Ties keep scan order.
pub fn select_active<'s, 'r>(snapshot: &'s ScanSnapshot<'r>) -> Option<&'s DetectedController<'r>> {
    let mut candidates: Vec<_> = snapshot
        .matched()
        .filter_map(|controller| {
            let profile = controller.matched.as_ref()?;
            Some(((!profile.is_priority(), profile.release_year()), controller))
        })
        .collect();
    candidates.sort_by_key(|(key, _)| *key);
    candidates.into_iter().next().map(|(_, controller)| controller)
}
