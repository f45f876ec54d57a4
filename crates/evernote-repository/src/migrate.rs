//! Upgrade steps between plugin versions.

use crate::prefs::{PreferenceKey, Preferences};

/// Version at which preferences moved to the `repository_evernote_` prefix.
pub const UPGRADE_SAVEPOINT: i64 = 2013090600;

/// Bring stored preferences from `old_version` up to date.
///
/// A preference that cannot be renamed is logged and left behind; the
/// upgrade always completes. Returns the version reached.
pub fn upgrade(prefs: &dyn Preferences, old_version: i64) -> i64 {
    if old_version >= UPGRADE_SAVEPOINT {
        return old_version;
    }

    for key in PreferenceKey::ALL {
        if let Err(err) = prefs.rename(&key.legacy_name(), &key.name()) {
            tracing::warn!("Could not migrate preference {}: {}", key.legacy_name(), err);
        }
    }
    tracing::info!("Preferences migrated to savepoint {}", UPGRADE_SAVEPOINT);
    UPGRADE_SAVEPOINT
}
