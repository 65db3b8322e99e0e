//! Naming reconciliation between the physics layer and the ledger.
//!
//! The physics layer occasionally reports a combatant under a decorated name
//! (a clone counter or a renamed wreck). Resolution is conservative: exact
//! match first, then a single stripped numeric suffix that must match exactly
//! one ledger name. Anything ambiguous is flagged and skipped — a wrong merge
//! is worse than a dropped contact.

use tracing::warn;

/// Resolve a physics-reported name against the ledger's known names.
pub fn resolve_name<'a>(
    reported: &str,
    known: impl Iterator<Item = &'a str> + Clone,
) -> Option<String> {
    if known.clone().any(|k| k == reported) {
        return Some(reported.to_string());
    }

    let base = strip_numeric_suffix(reported)?;
    if known.clone().any(|k| k == base) {
        warn!(reported, resolved = base, "reconciled decorated combatant name");
        return Some(base.to_string());
    }

    // Last resort: a unique ledger name the stripped base is a prefix of.
    // Two plausible owners is exactly the silent-merge trap; flag and drop.
    let mut prefixed = known.filter(|k| k.starts_with(base));
    match (prefixed.next(), prefixed.next()) {
        (Some(only), None) => {
            warn!(reported, resolved = only, "reconciled combatant name by prefix");
            Some(only.to_string())
        }
        (Some(_), Some(_)) => {
            warn!(reported, "ambiguous combatant name, contact dropped");
            None
        }
        (None, _) => None,
    }
}

/// Strip one trailing ` (N)` or `_N` decoration, if present.
fn strip_numeric_suffix(name: &str) -> Option<&str> {
    if let Some(open) = name.rfind(" (") {
        if let Some(inner) = name[open + 2..].strip_suffix(')') {
            if !inner.is_empty() && inner.chars().all(|c| c.is_ascii_digit()) {
                return Some(&name[..open]);
            }
        }
    }
    if let Some(underscore) = name.rfind('_') {
        let tail = &name[underscore + 1..];
        if !tail.is_empty() && tail.chars().all(|c| c.is_ascii_digit()) {
            return Some(&name[..underscore]);
        }
    }
    None
}
