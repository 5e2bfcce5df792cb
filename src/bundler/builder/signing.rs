//! Signing passphrase resolution.
//!
//! Packages are never signed here; this module only finds the passphrase a
//! backend needs to unlock its key. Lookup order for definition `id` and
//! packager `fmt`:
//!
//! 1. `NFPM_<ID>_<FMT>_PASSPHRASE`
//! 2. `NFPM_<ID>_PASSPHRASE`
//!
//! Empty values count as unset.

use std::collections::HashMap;

/// Resolves the signing passphrase for `packager` in definition `id`.
///
/// Returns an empty string when neither variable is set.
pub fn passphrase_from_env(env: &HashMap<String, String>, packager: &str, id: &str) -> String {
    let id = id.to_uppercase();
    let packager = packager.to_uppercase();

    [
        format!("NFPM_{id}_{packager}_PASSPHRASE"),
        format!("NFPM_{id}_PASSPHRASE"),
    ]
    .iter()
    .filter_map(|key| env.get(key))
    .find(|value| !value.is_empty())
    .cloned()
    .unwrap_or_default()
}
