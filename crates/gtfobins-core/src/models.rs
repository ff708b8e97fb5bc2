//! Data model for the two generated artifacts.
//!
//! `api.json` deserializes into a [`BinaryIndex`] and `functions.json` into a
//! [`FunctionCatalog`]. All maps are [`IndexMap`]s so that key order survives a
//! load/serialize cycle exactly as the builder wrote it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Binary name → entry. Keys are case-sensitive and matched exactly.
pub type BinaryIndex = IndexMap<String, BinaryEntry>;

/// One concrete invocation demonstrating a function for a binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechniqueEntry {
    #[serde(default)]
    pub code: String,
    /// Copied from the function catalog at build time.
    #[serde(default)]
    pub description: String,
}

/// Everything known about a single binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryEntry {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub functions: IndexMap<String, Vec<TechniqueEntry>>,
}

impl BinaryEntry {
    /// Returns the technique entries for `function`, if this binary declares it.
    pub fn techniques(&self, function: &str) -> Option<&[TechniqueEntry]> {
        self.functions.get(function).map(Vec::as_slice)
    }
}

/// Catalog description of a function category such as `suid` or `file-read`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    #[serde(default)]
    pub description: String,
}

/// Contents of `functions.json`: `{"functions": {name: {description}}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCatalog {
    #[serde(default)]
    pub functions: IndexMap<String, FunctionInfo>,
}
