//! Tests for the runtime config registry


use crate::app::models::LanguagesConfig;
use crate::app::services::decoders::DecoderRegistry;
use crate::app::services::registry::ConfigRegistry;

/// Shorthand for the one built-in record type
pub fn language(id: &str, lang_key: &str, text: &str) -> LanguagesConfig {
    LanguagesConfig {
        id: id.to_string(),
        lang_key: lang_key.to_string(),
        text: text.to_string(),
    }
}

/// Registry preloaded with a handful of language records
pub fn seeded_registry() -> ConfigRegistry {
    let mut registry = ConfigRegistry::new();
    registry.insert(Box::new(language("ui.start", "en", "Start")));
    registry.insert(Box::new(language("ui.quit", "en", "Quit")));
    registry
}

/// Decoders for the built-in type plus a dynamic test type
pub fn test_decoders() -> DecoderRegistry {
    let mut decoders = DecoderRegistry::new();
    decoders.register::<LanguagesConfig>();
    decoders.register_dynamic("ItemConfig");
    decoders
}
