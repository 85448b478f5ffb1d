//! Localization on top of the config registry.
//!
//! Translated texts are authored as ordinary config rows (one text key per
//! row, with a language key column, one sheet per language). At startup the
//! store reads the language payloads of the resource group into per-language
//! lookup tables, restores the persisted language selection, and then
//! evicts the raw records from the registry since nothing reads them again.

use crate::app::adapters::{filesystem, prefs::Prefs};
use crate::app::models::LanguagesConfig;
use crate::app::services::decoders::DecoderRegistry;
use crate::app::services::registry::ConfigRegistry;
use crate::constants::{LANGUAGES_TYPE_NAME, LANGUAGE_INDEX_KEY};
use crate::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Languages the store supports, in persisted-index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    SimplifiedChinese,
    English,
}

impl Language {
    /// Supported languages; a persisted index selects into this list
    pub const SUPPORTED: [Language; 2] = [Language::SimplifiedChinese, Language::English];

    /// The language key as authored in the sheets
    pub fn lang_key(self) -> &'static str {
        match self {
            Language::SimplifiedChinese => "cn",
            Language::English => "en",
        }
    }

    /// Resolve a sheet language key, case-insensitively
    pub fn from_lang_key(key: &str) -> Option<Language> {
        Self::SUPPORTED
            .into_iter()
            .find(|lang| lang.lang_key().eq_ignore_ascii_case(key.trim()))
    }

    /// Position in the supported list, used as the persisted index
    pub fn index(self) -> i64 {
        match self {
            Language::SimplifiedChinese => 0,
            Language::English => 1,
        }
    }
}

type LanguageListener = Box<dyn Fn(Language) + Send + Sync>;

/// Per-language text tables plus the current selection
pub struct LocaleStore {
    texts: HashMap<Language, HashMap<String, String>>,
    current: Language,
    prefs: Prefs,
    listeners: Vec<LanguageListener>,
    initialized: bool,
}

impl LocaleStore {
    /// Create an uninitialized store over a preference file
    pub fn new(prefs: Prefs) -> Self {
        Self {
            texts: HashMap::new(),
            current: Language::SUPPORTED[0],
            prefs,
            listeners: Vec::new(),
            initialized: false,
        }
    }

    /// Build the text tables from the group's language payloads.
    ///
    /// Idempotent; the second call is a no-op. The same text key appears
    /// once per language sheet, so the payload files are read directly
    /// rather than through the registry's id-keyed buckets; afterwards the
    /// language bucket the group load produced is evicted from the
    /// registry, nothing reads it again.
    pub fn init(
        &mut self,
        registry: &mut ConfigRegistry,
        decoders: &DecoderRegistry,
        group_dir: &Path,
    ) -> Result<()> {
        if self.initialized {
            debug!("Localization already initialized");
            return Ok(());
        }

        registry.ensure_loaded(group_dir, decoders)?;

        let mut total = 0usize;
        for file in filesystem::payload_files(group_dir)? {
            let is_language_payload = file
                .file_stem()
                .map(|s| {
                    s.to_string_lossy()
                        .to_lowercase()
                        .starts_with(&format!("{}_", LANGUAGES_TYPE_NAME.to_lowercase()))
                })
                .unwrap_or(false);
            if !is_language_payload {
                continue;
            }

            match self.load_language_payload(&file) {
                Ok(count) => total += count,
                Err(e) => warn!("Skipping language payload {}: {e}", file.display()),
            }
        }

        if total == 0 {
            warn!("No language texts found in {}", group_dir.display());
        }

        let saved = self.prefs.get_int(LANGUAGE_INDEX_KEY, 0);
        let index = usize::try_from(saved)
            .ok()
            .filter(|i| *i < Language::SUPPORTED.len())
            .unwrap_or(0);
        self.current = Language::SUPPORTED[index];

        // The reshaped tables are the only consumer of these records
        registry.remove::<LanguagesConfig>(None);

        self.initialized = true;
        info!(
            "Localization initialized with {total} text(s), current language '{}'",
            self.current.lang_key()
        );
        Ok(())
    }

    /// Fold one language payload file into the text tables.
    ///
    /// Rows with an empty id, language key, or text are warned and skipped;
    /// unsupported language keys likewise.
    fn load_language_payload(&mut self, file: &Path) -> Result<usize> {
        let text = std::fs::read_to_string(file)
            .map_err(|e| Error::io(format!("reading language payload {}", file.display()), e))?;
        let payload: HashMap<String, LanguagesConfig> = serde_json::from_str(&text)?;

        let mut loaded = 0usize;
        for entry in payload.values() {
            if entry.id.trim().is_empty() || entry.lang_key.is_empty() || entry.text.is_empty() {
                warn!(
                    "Language record in {} has an empty id, language key, or text, skipping",
                    file.display()
                );
                continue;
            }

            let Some(language) = Language::from_lang_key(&entry.lang_key) else {
                warn!(
                    "Unsupported language key '{}' in {}, skipping",
                    entry.lang_key,
                    file.display()
                );
                continue;
            };

            self.texts
                .entry(language)
                .or_default()
                .insert(entry.id.trim().to_string(), entry.text.clone());
            loaded += 1;
        }

        Ok(loaded)
    }

    /// The currently selected language
    pub fn current_language(&self) -> Language {
        self.current
    }

    /// Switch language, persist the choice, and notify listeners
    pub fn set_language(&mut self, language: Language) -> Result<()> {
        self.current = language;
        self.prefs.set_int(LANGUAGE_INDEX_KEY, language.index())?;
        for listener in &self.listeners {
            listener(language);
        }
        debug!("Language switched to '{}'", language.lang_key());
        Ok(())
    }

    /// Translated text for a key in the current language.
    ///
    /// Missing keys fall back to the key itself so untranslated text stays
    /// visible instead of vanishing.
    pub fn text<'a>(&'a self, key: &'a str) -> &'a str {
        match self.texts.get(&self.current).and_then(|table| table.get(key)) {
            Some(text) => text,
            None => {
                warn!(
                    "No '{}' text for key '{key}', falling back to the key",
                    self.current.lang_key()
                );
                key
            }
        }
    }

    /// Register a callback fired after every language switch
    pub fn on_language_changed<F>(&mut self, listener: F)
    where
        F: Fn(Language) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }
}

impl std::fmt::Debug for LocaleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleStore")
            .field("current", &self.current)
            .field("languages", &self.texts.keys().collect::<Vec<_>>())
            .field("listeners", &self.listeners.len())
            .field("initialized", &self.initialized)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn write_language_payload(dir: &Path) {
        let payload = json!({
            "ui.start": {
                "$type": "LanguagesConfig",
                "id": "ui.start",
                "langKey": "en",
                "text": "Start"
            },
            "ui.start.cn": {
                "$type": "LanguagesConfig",
                "id": "ui.start",
                "langKey": "cn",
                "text": "开始"
            },
            "ui.weird": {
                "$type": "LanguagesConfig",
                "id": "ui.weird",
                "langKey": "xx",
                "text": "?"
            }
        });
        std::fs::write(
            dir.join("LanguagesConfig_Sheet1.json"),
            serde_json::to_string_pretty(&payload).unwrap(),
        )
        .unwrap();
    }

    fn decoders() -> DecoderRegistry {
        let mut decoders = DecoderRegistry::new();
        decoders.register::<LanguagesConfig>();
        decoders
    }

    fn store(prefs_dir: &Path) -> LocaleStore {
        LocaleStore::new(Prefs::open(&prefs_dir.join("prefs.json")))
    }

    #[test]
    fn test_init_builds_tables_and_evicts_source_records() {
        let temp_dir = TempDir::new().unwrap();
        write_language_payload(temp_dir.path());

        let mut registry = ConfigRegistry::new();
        let mut locale = store(temp_dir.path());
        locale
            .init(&mut registry, &decoders(), temp_dir.path())
            .unwrap();

        assert_eq!(locale.current_language(), Language::SimplifiedChinese);
        assert_eq!(locale.text("ui.start"), "开始");
        assert_eq!(registry.type_len(LANGUAGES_TYPE_NAME), 0);
    }

    #[test]
    fn test_missing_key_falls_back_to_key() {
        let temp_dir = TempDir::new().unwrap();
        write_language_payload(temp_dir.path());

        let mut registry = ConfigRegistry::new();
        let mut locale = store(temp_dir.path());
        locale
            .init(&mut registry, &decoders(), temp_dir.path())
            .unwrap();

        assert_eq!(locale.text("ui.unknown"), "ui.unknown");
    }

    #[test]
    fn test_language_switch_persists_and_notifies() {
        let temp_dir = TempDir::new().unwrap();
        write_language_payload(temp_dir.path());

        let mut registry = ConfigRegistry::new();
        let mut locale = store(temp_dir.path());
        locale
            .init(&mut registry, &decoders(), temp_dir.path())
            .unwrap();

        let fired = Arc::new(AtomicUsize::new(0));
        let observed = Arc::clone(&fired);
        locale.on_language_changed(move |_| {
            observed.fetch_add(1, Ordering::SeqCst);
        });

        locale.set_language(Language::English).unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(locale.text("ui.start"), "Start");

        // A fresh store over the same preference file restores the choice
        let mut registry = ConfigRegistry::new();
        let mut reopened = store(temp_dir.path());
        reopened
            .init(&mut registry, &decoders(), temp_dir.path())
            .unwrap();
        assert_eq!(reopened.current_language(), Language::English);
    }

    #[test]
    fn test_out_of_range_persisted_index_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        write_language_payload(temp_dir.path());
        let mut prefs = Prefs::open(&temp_dir.path().join("prefs.json"));
        prefs.set_int(LANGUAGE_INDEX_KEY, 99).unwrap();

        let mut registry = ConfigRegistry::new();
        let mut locale = LocaleStore::new(prefs);
        locale
            .init(&mut registry, &decoders(), temp_dir.path())
            .unwrap();

        assert_eq!(locale.current_language(), Language::SimplifiedChinese);
    }

    #[test]
    fn test_init_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        write_language_payload(temp_dir.path());

        let mut registry = ConfigRegistry::new();
        let mut locale = store(temp_dir.path());
        locale
            .init(&mut registry, &decoders(), temp_dir.path())
            .unwrap();
        locale
            .init(&mut registry, &decoders(), temp_dir.path())
            .unwrap();

        assert_eq!(locale.text("ui.start"), "开始");
    }

    #[test]
    fn test_language_key_resolution() {
        assert_eq!(Language::from_lang_key("en"), Some(Language::English));
        assert_eq!(Language::from_lang_key(" CN "), Some(Language::SimplifiedChinese));
        assert_eq!(Language::from_lang_key("fr"), None);
    }
}
