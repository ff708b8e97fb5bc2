//! Typed query errors and their `{"Error": "..."}` wire form.
//!
//! Every query operation returns `Result<T, QueryError>`. Callers that speak
//! the JSON tool protocol convert the result with [`into_wire`], which yields
//! either the success payload or a single-key `{"Error": message}` object.
//! The `Display` text of each variant is exactly that message.

use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use thiserror::Error;

/// The five read-only operations exposed by the query service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListBinaries,
    ListBinariesByFunction,
    ListFunctions,
    QueryBinary,
    QueryFunction,
}

impl Operation {
    /// Prefix used when an unexpected failure is wrapped for this operation.
    pub fn failure_prefix(&self) -> &'static str {
        match self {
            Operation::ListBinaries => "Could not retrieve binaries",
            Operation::ListBinariesByFunction => "Could not retrieve binaries by function",
            Operation::ListFunctions => "Could not retrieve functions",
            Operation::QueryBinary => "Could not query binary",
            Operation::QueryFunction => "Could not query function",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::ListBinaries => "list_binaries",
            Operation::ListBinariesByFunction => "list_binaries_by_function",
            Operation::ListFunctions => "list_functions",
            Operation::QueryBinary => "query_binary",
            Operation::QueryFunction => "query_function",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// An artifact file is absent. Passed through every operation unchanged.
    #[error("{path} does not exist. Please ensure the file is in the correct location.")]
    MissingArtifact { path: String },

    #[error("No binaries found with the function '{0}'.")]
    NoBinariesWithFunction(String),

    #[error("Binary '{0}' not found in api.json.")]
    BinaryNotFound(String),

    #[error("Function '{0}' not found in functions.json.")]
    FunctionNotFound(String),

    /// Any other failure (unreadable file, malformed JSON) while serving `operation`.
    #[error("{}", failure_message(.operation, .message))]
    Failed {
        operation: Operation,
        message: String,
    },
}

fn failure_message(operation: &Operation, message: &str) -> String {
    match operation {
        // The list endpoint has always ended its failure text with '!'.
        Operation::ListBinaries => format!("{}: {}!", operation.failure_prefix(), message),
        _ => format!("{}: {}", operation.failure_prefix(), message),
    }
}

impl QueryError {
    /// Wraps an arbitrary failure for `operation`.
    pub fn failed(operation: Operation, err: impl fmt::Display) -> Self {
        QueryError::Failed {
            operation,
            message: err.to_string(),
        }
    }

    /// Returns the `{"Error": message}` object for this error.
    pub fn to_sentinel(&self) -> Value {
        json!({ "Error": self.to_string() })
    }
}

/// Converts the result of `operation` to its JSON wire shape.
///
/// A payload that fails to serialize is reported like any other failure of
/// that operation.
pub fn into_wire<T: Serialize>(operation: Operation, result: Result<T, QueryError>) -> Value {
    match result.and_then(|payload| {
        serde_json::to_value(payload).map_err(|e| QueryError::failed(operation, e))
    }) {
        Ok(value) => value,
        Err(err) => err.to_sentinel(),
    }
}
