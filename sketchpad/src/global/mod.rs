//! Global singletons.

pub mod settings;

use settings::LoadedSettings;

/// Shared settings, loaded from user preferences on first access.
/// (Or defaulted, if unavailable for some reason)
pub fn settings() -> &'static LoadedSettings {
    static ONCE: std::sync::OnceLock<LoadedSettings> = std::sync::OnceLock::new();
    ONCE.get_or_init(LoadedSettings::load)
}

