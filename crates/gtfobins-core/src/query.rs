//! Query operations over loaded artifacts.
//!
//! These functions take already-parsed artifacts and never touch storage;
//! the application loads a fresh copy for every call and hands it here.
//! Payloads that carry technique snippets are returned as JSON values with
//! their `code` fields fenced by [`format_code_blocks`].

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Operation, QueryError};
use crate::format::format_code_blocks;
use crate::models::{BinaryIndex, FunctionCatalog, FunctionInfo};

fn formatted<T: Serialize + ?Sized>(operation: Operation, value: &T) -> Result<Value, QueryError> {
    serde_json::to_value(value)
        .map(format_code_blocks)
        .map_err(|e| QueryError::failed(operation, e))
}

/// All binary names, ascending.
pub fn list_binaries(index: &BinaryIndex) -> Vec<String> {
    let mut names: Vec<String> = index.keys().cloned().collect();
    names.sort();
    names
}

/// Binary → formatted technique list, for every binary declaring `function`.
///
/// Binaries appear in index order.
pub fn binaries_by_function(
    index: &BinaryIndex,
    function: &str,
) -> Result<IndexMap<String, Value>, QueryError> {
    let mut matching = IndexMap::new();
    for (binary, entry) in index {
        if let Some(techniques) = entry.techniques(function) {
            matching.insert(
                binary.clone(),
                formatted(Operation::ListBinariesByFunction, techniques)?,
            );
        }
    }

    if matching.is_empty() {
        return Err(QueryError::NoBinariesWithFunction(function.to_string()));
    }
    Ok(matching)
}

/// The catalog's function map, unformatted.
pub fn list_functions(catalog: &FunctionCatalog) -> IndexMap<String, FunctionInfo> {
    catalog.functions.clone()
}

/// The formatted entry for `binary`.
pub fn query_binary(index: &BinaryIndex, binary: &str) -> Result<Value, QueryError> {
    let entry = index
        .get(binary)
        .ok_or_else(|| QueryError::BinaryNotFound(binary.to_string()))?;
    formatted(Operation::QueryBinary, entry)
}

/// The catalog description of `function`.
pub fn query_function(catalog: &FunctionCatalog, function: &str) -> Result<FunctionInfo, QueryError> {
    catalog
        .functions
        .get(function)
        .cloned()
        .ok_or_else(|| QueryError::FunctionNotFound(function.to_string()))
}
