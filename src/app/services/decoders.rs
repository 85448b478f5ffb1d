//! Record decoder registry.
//!
//! Payload files carry heterogeneous record types behind a `$type`
//! discriminator. Rather than runtime type reflection, decoding goes
//! through an explicit registry of constructor functions populated at
//! startup: the game host registers its generated record types, tools
//! without linked-in types register dynamic decoders instead.

use crate::app::models::{ConfigRecord, DynRecord, StaticRecord};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Constructor function turning a payload JSON value into a record
type DecodeFn = Box<dyn Fn(&serde_json::Value) -> Result<Box<dyn ConfigRecord>> + Send + Sync>;

/// Mapping from record type name to its decoder
#[derive(Default)]
pub struct DecoderRegistry {
    decoders: HashMap<String, DecodeFn>,
}

impl DecoderRegistry {
    /// Create an empty decoder registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the decoder for a generated record type
    pub fn register<T>(&mut self)
    where
        T: StaticRecord + DeserializeOwned,
    {
        self.decoders.insert(
            T::TYPE_NAME.to_string(),
            Box::new(|value| {
                let record: T = serde_json::from_value(value.clone())
                    .map_err(|e| Error::decode(T::TYPE_NAME, e.to_string()))?;
                Ok(Box::new(record) as Box<dyn ConfigRecord>)
            }),
        );
    }

    /// Register a schema-less decoder for a type name.
    ///
    /// Used when the concrete generated type is not linked into the current
    /// binary; records come back as [`DynRecord`]s.
    pub fn register_dynamic(&mut self, type_name: &str) {
        let name = type_name.to_string();
        self.decoders.insert(
            type_name.to_string(),
            Box::new(move |value| {
                let record = DynRecord::from_value(&name, value)?;
                Ok(Box::new(record) as Box<dyn ConfigRecord>)
            }),
        );
    }

    /// Whether a decoder is registered for a type name
    pub fn contains(&self, type_name: &str) -> bool {
        self.decoders.contains_key(type_name)
    }

    /// Decode one payload record through its registered decoder
    pub fn decode(&self, type_name: &str, value: &serde_json::Value) -> Result<Box<dyn ConfigRecord>> {
        let decoder = self.decoders.get(type_name).ok_or_else(|| {
            Error::type_resolution(
                type_name,
                "no decoder registered; regenerate the record types and rebuild the host",
            )
        })?;
        decoder(value)
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.decoders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}
