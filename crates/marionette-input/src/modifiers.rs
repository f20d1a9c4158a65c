//! Modifier masks.

use marionette_toolkit::Modifiers;

/// Combines modifier flags into one mask. An empty slice yields no modifiers.
pub fn unify(modifiers: &[Modifiers]) -> Modifiers {
    modifiers.iter().copied().collect()
}
