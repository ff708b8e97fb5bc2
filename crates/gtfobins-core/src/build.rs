//! Build transform: corpus headers → [`BinaryIndex`] + [`FunctionCatalog`].
//!
//! The caller parses each corpus document's front matter into a
//! [`BinaryDocument`] and the catalog document into [`FunctionDeclarations`],
//! then feeds them to an [`IndexBuilder`] in directory-scan order. The
//! builder is format-agnostic: any serde deserializer can produce its inputs.
//!
//! Per entry, only `code` survives; the entry `description` is copied from
//! the catalog (empty when the function is not declared there).

use indexmap::IndexMap;
use serde::Deserialize;

use crate::models::{BinaryEntry, BinaryIndex, FunctionCatalog, FunctionInfo, TechniqueEntry};

/// One function declaration from the catalog document.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionDeclaration {
    pub description: String,
}

/// The catalog document: function name → declaration.
pub type FunctionDeclarations = IndexMap<String, FunctionDeclaration>;

/// A technique entry as written in a corpus document.
///
/// Fields other than `code` are accepted and discarded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTechnique {
    #[serde(default)]
    pub code: Option<String>,
}

/// The structured header of one per-binary document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BinaryDocument {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub functions: Option<IndexMap<String, Vec<RawTechnique>>>,
}

/// Result of a completed build.
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub index: BinaryIndex,
    pub catalog: FunctionCatalog,
    /// Functions referenced by some binary but absent from the catalog document.
    pub undeclared: Vec<String>,
}

/// Accumulates binaries in encounter order.
#[derive(Debug)]
pub struct IndexBuilder {
    declarations: FunctionDeclarations,
    index: BinaryIndex,
    functions: IndexMap<String, FunctionInfo>,
    undeclared: Vec<String>,
}

impl IndexBuilder {
    pub fn new(declarations: FunctionDeclarations) -> Self {
        Self {
            declarations,
            index: BinaryIndex::new(),
            functions: IndexMap::new(),
            undeclared: Vec::new(),
        }
    }

    fn describe(&self, function: &str) -> String {
        self.declarations
            .get(function)
            .map(|d| d.description.clone())
            .unwrap_or_default()
    }

    /// Normalizes one document and records it under `name`.
    pub fn add_binary(&mut self, name: impl Into<String>, document: BinaryDocument) {
        let mut functions: IndexMap<String, Vec<TechniqueEntry>> = IndexMap::new();

        for (function, entries) in document.functions.unwrap_or_default() {
            let description = self.describe(&function);
            let techniques = entries
                .into_iter()
                .map(|entry| TechniqueEntry {
                    code: entry.code.unwrap_or_default(),
                    description: description.clone(),
                })
                .collect();

            if !self.functions.contains_key(&function) {
                if !self.declarations.contains_key(&function) {
                    self.undeclared.push(function.clone());
                }
                self.functions
                    .insert(function.clone(), FunctionInfo { description });
            }

            functions.insert(function, techniques);
        }

        self.index.insert(
            name.into(),
            BinaryEntry {
                description: document.description.unwrap_or_default(),
                functions,
            },
        );
    }

    /// Number of binaries recorded so far.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn finish(self) -> BuildOutput {
        BuildOutput {
            index: self.index,
            catalog: FunctionCatalog {
                functions: self.functions,
            },
            undeclared: self.undeclared,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn declarations(pairs: &[(&str, &str)]) -> FunctionDeclarations {
        pairs
            .iter()
            .map(|(name, description)| {
                (
                    name.to_string(),
                    FunctionDeclaration {
                        description: description.to_string(),
                    },
                )
            })
            .collect()
    }

    fn document(value: serde_json::Value) -> BinaryDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_base64_example() {
        let mut builder = IndexBuilder::new(declarations(&[("file-read", "read file")]));
        builder.add_binary(
            "base64",
            document(json!({
                "description": "Encode and decode",
                "functions": { "file-read": [{ "code": "base64 file | base64 --decode" }] }
            })),
        );
        let out = builder.finish();

        assert_eq!(
            serde_json::to_value(&out.index).unwrap(),
            json!({
                "base64": {
                    "description": "Encode and decode",
                    "functions": {
                        "file-read": [
                            { "code": "base64 file | base64 --decode", "description": "read file" }
                        ]
                    }
                }
            })
        );
        assert_eq!(
            serde_json::to_value(&out.catalog).unwrap(),
            json!({ "functions": { "file-read": { "description": "read file" } } })
        );
        assert!(out.undeclared.is_empty());
    }

    #[test]
    fn test_missing_fields_default() {
        let mut builder = IndexBuilder::new(FunctionDeclarations::new());
        builder.add_binary("empty", BinaryDocument::default());
        builder.add_binary("nocode", document(json!({ "functions": { "shell": [{}] } })));
        let out = builder.finish();

        assert_eq!(out.index["empty"], BinaryEntry::default());
        let shell = out.index["nocode"].techniques("shell").unwrap();
        assert_eq!(shell[0].code, "");
        assert_eq!(shell[0].description, "");
    }

    #[test]
    fn test_extra_entry_fields_dropped() {
        let mut builder = IndexBuilder::new(declarations(&[("suid", "setuid bit")]));
        builder.add_binary(
            "find",
            document(json!({
                "functions": {
                    "suid": [{ "code": "./find . -exec /bin/sh -p \\; -quit", "contexts": { "unprivileged": true }, "comment": "x" }]
                }
            })),
        );
        let out = builder.finish();
        assert_eq!(
            serde_json::to_value(&out.index["find"].functions["suid"][0]).unwrap(),
            json!({ "code": "./find . -exec /bin/sh -p \\; -quit", "description": "setuid bit" })
        );
    }

    #[test]
    fn test_undeclared_functions_recorded_once_with_empty_description() {
        let mut builder = IndexBuilder::new(declarations(&[("shell", "spawn shell")]));
        builder.add_binary(
            "a",
            document(json!({ "functions": { "mystery": [{ "code": "a" }], "shell": [{ "code": "a" }] } })),
        );
        builder.add_binary(
            "b",
            document(json!({ "functions": { "mystery": [{ "code": "b" }] } })),
        );
        let out = builder.finish();

        assert_eq!(out.undeclared, vec!["mystery".to_string()]);
        let names: Vec<&String> = out.catalog.functions.keys().collect();
        assert_eq!(names, vec!["mystery", "shell"]);
        assert_eq!(out.catalog.functions["mystery"].description, "");
        assert_eq!(out.index["b"].functions["mystery"][0].description, "");
    }

    #[test]
    fn test_declared_but_unused_functions_omitted() {
        let mut builder = IndexBuilder::new(declarations(&[("shell", "s"), ("sudo", "t")]));
        builder.add_binary("vi", document(json!({ "functions": { "sudo": [{ "code": "sudo vi" }] } })));
        let out = builder.finish();
        assert_eq!(out.catalog.functions.len(), 1);
        assert!(out.catalog.functions.contains_key("sudo"));
    }

    #[test]
    fn test_encounter_order_preserved() {
        let mut builder = IndexBuilder::new(FunctionDeclarations::new());
        for name in ["zsh", "awk", "m"] {
            builder.add_binary(name, BinaryDocument::default());
        }
        assert_eq!(builder.len(), 3);
        let out = builder.finish();
        let names: Vec<&String> = out.index.keys().collect();
        assert_eq!(names, vec!["zsh", "awk", "m"]);
    }
}
