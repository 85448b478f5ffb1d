//! Integration tests for the full compile-and-load pipeline
//!
//! These tests drive the pipeline from a planned table through row
//! compilation, payload writing, registry loading, and localization, the
//! way a game host consumes it after the generate step.

use calamine::Data;
use serde::{Deserialize, Serialize};
use sheetconf::app::adapters::prefs::Prefs;
use sheetconf::app::models::{
    ConfigRecord, DynRecord, FieldSpec, LanguagesConfig, StaticRecord, TablePlan,
};
use sheetconf::app::services::localization::{Language, LocaleStore};
use sheetconf::app::services::row_compiler::{compile_rows, RowCompiler};
use sheetconf::app::services::schema_generator::{GenerateOutcome, SchemaGenerator};
use sheetconf::{ConfigRegistry, DecoderRegistry};
use std::any::Any;
use std::path::PathBuf;
use tempfile::TempDir;

/// A record type as the host would hold it after generation and rebuild
#[allow(non_snake_case)]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ItemsConfig {
    id: String,
    name: String,
    price: i32,
    onSale: bool,
    tags: Vec<String>,
}

impl ConfigRecord for ItemsConfig {
    fn id(&self) -> &str {
        &self.id
    }

    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl StaticRecord for ItemsConfig {
    const TYPE_NAME: &'static str = "ItemsConfig";
}

fn field(name: &str, declared_type: &str) -> FieldSpec {
    FieldSpec {
        name: name.to_string(),
        declared_type: declared_type.to_string(),
        comment: String::new(),
    }
}

fn items_plan() -> TablePlan {
    TablePlan {
        type_name: "ItemsConfig".to_string(),
        payload_name: "ItemsConfig_Sheet1".to_string(),
        columns: vec![
            field("id", "string"),
            field("name", "string"),
            field("price", "int"),
            field("onSale", "bool"),
            field("tags", "string[]"),
        ],
        source_file: PathBuf::from("Items.xlsx"),
        sheet_name: "Sheet1".to_string(),
    }
}

fn string_row(cells: &[&str]) -> Vec<Data> {
    cells
        .iter()
        .map(|cell| Data::String(cell.to_string()))
        .collect()
}

#[test]
fn test_compile_write_load_query() {
    let temp_dir = TempDir::new().unwrap();
    let payload_dir = temp_dir.path().join("configs");

    // Compile rows the way the compile command does, with dynamic decoders
    let plan = items_plan();
    let mut decoders = DecoderRegistry::new();
    decoders.register_dynamic("ItemsConfig");

    let rows = vec![
        string_row(&["sword", "Iron Sword", "120", "true", "fire,ice"]),
        string_row(&["bow", "Short Bow", "80", "false", ""]),
        string_row(&["", "No Id", "1", "false", ""]),
    ];
    let compiled = compile_rows(&plan, &rows, &decoders).unwrap();
    assert_eq!(compiled.rows_skipped, 1);

    let compiler = RowCompiler::new(&payload_dir);
    compiler.prepare_output_dir().unwrap();
    compiler.write_payload(&plan, &compiled).unwrap();

    // Load the payload the way the game host does, with the typed decoder
    let mut host_decoders = DecoderRegistry::new();
    host_decoders.register::<ItemsConfig>();

    let mut registry = ConfigRegistry::new();
    registry.ensure_loaded(&payload_dir, &host_decoders).unwrap();

    let sword = registry.get::<ItemsConfig>("sword").unwrap();
    assert_eq!(sword.name, "Iron Sword");
    assert_eq!(sword.price, 120);
    assert!(sword.onSale);
    assert_eq!(sword.tags, vec!["fire", "ice"]);

    let bow = registry.get::<ItemsConfig>("  bow  ").unwrap();
    assert!(bow.tags.is_empty());

    assert!(registry.get::<ItemsConfig>("axe").is_none());
    assert_eq!(registry.get_all::<ItemsConfig>().len(), 2);
}

#[test]
fn test_generated_type_matches_compiled_payload_shape() {
    let temp_dir = TempDir::new().unwrap();
    let types_dir = temp_dir.path().join("generated");

    let plan = items_plan();
    let mut generator = SchemaGenerator::new(&types_dir);
    let outcome = generator.generate(&plan).unwrap();

    let GenerateOutcome::Written(path) = outcome else {
        panic!("expected a written definition, got {outcome:?}");
    };

    // The generated struct must declare exactly the members the compiler
    // emits for this plan
    let source = std::fs::read_to_string(&path).unwrap();
    assert!(source.contains("pub id: String,"));
    assert!(source.contains("pub name: String,"));
    assert!(source.contains("pub price: i32,"));
    assert!(source.contains("pub onSale: bool,"));
    assert!(source.contains("pub tags: Vec<String>,"));
}

#[test]
fn test_untyped_consumer_sees_same_records() {
    let temp_dir = TempDir::new().unwrap();
    let payload_dir = temp_dir.path().join("configs");

    let plan = items_plan();
    let mut decoders = DecoderRegistry::new();
    decoders.register_dynamic("ItemsConfig");

    let rows = vec![string_row(&["sword", "Iron Sword", "120", "true", "fire"])];
    let compiled = compile_rows(&plan, &rows, &decoders).unwrap();

    let compiler = RowCompiler::new(&payload_dir);
    compiler.prepare_output_dir().unwrap();
    compiler.write_payload(&plan, &compiled).unwrap();

    let mut registry = ConfigRegistry::new();
    registry.ensure_loaded(&payload_dir, &decoders).unwrap();

    let record = registry.get_raw("ItemsConfig", "sword").unwrap();
    let dynamic = record.as_any().downcast_ref::<DynRecord>().unwrap();
    assert_eq!(dynamic.field_str("name"), Some("Iron Sword"));
    assert_eq!(dynamic.field("price"), Some(&serde_json::json!(120)));
}

#[test]
fn test_localization_over_compiled_payloads() {
    let temp_dir = TempDir::new().unwrap();
    let payload_dir = temp_dir.path().join("configs");

    let plan = TablePlan {
        type_name: "LanguagesConfig".to_string(),
        payload_name: "LanguagesConfig_Sheet1".to_string(),
        columns: vec![
            field("id", "string"),
            field("langKey", "string"),
            field("text", "string"),
        ],
        source_file: PathBuf::from("Languages.xlsx"),
        sheet_name: "Sheet1".to_string(),
    };

    let mut decoders = DecoderRegistry::new();
    decoders.register_dynamic("LanguagesConfig");

    // One sheet per language in a real workbook; one suffices here because
    // ids are unique within a payload file
    let rows = vec![
        string_row(&["ui.start", "en", "Start"]),
        string_row(&["ui.quit", "en", "Quit"]),
    ];
    let compiled = compile_rows(&plan, &rows, &decoders).unwrap();

    let compiler = RowCompiler::new(&payload_dir);
    compiler.prepare_output_dir().unwrap();
    compiler.write_payload(&plan, &compiled).unwrap();

    let mut host_decoders = DecoderRegistry::new();
    host_decoders.register::<LanguagesConfig>();

    let mut registry = ConfigRegistry::new();
    let mut locale = LocaleStore::new(Prefs::open(&temp_dir.path().join("prefs.json")));
    locale
        .init(&mut registry, &host_decoders, &payload_dir)
        .unwrap();

    locale.set_language(Language::English).unwrap();
    assert_eq!(locale.text("ui.start"), "Start");
    assert_eq!(locale.text("ui.nothere"), "ui.nothere");

    // The raw language bucket is gone after the one-way transfer
    assert_eq!(registry.type_len(LanguagesConfig::TYPE_NAME), 0);
}
