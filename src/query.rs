//! The query service: five read-only operations over the artifacts.
//!
//! Each call loads the artifact it needs from disk, runs the matching
//! operation from [`gtfobins_core::query`], and returns a typed result.
//! A missing artifact surfaces as [`QueryError::MissingArtifact`]; any
//! other load failure is wrapped as [`QueryError::Failed`] for the calling
//! operation. Nothing here panics on bad input.

use gtfobins_core::query as ops;
use gtfobins_core::{BinaryIndex, FunctionCatalog, FunctionInfo, Operation, QueryError};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::artifacts::{load_artifact, ArtifactError};
use crate::config::Config;

#[derive(Debug, Clone)]
pub struct QueryService {
    api_path: PathBuf,
    functions_path: PathBuf,
}

fn load<T: DeserializeOwned>(path: &Path, operation: Operation) -> Result<T, QueryError> {
    load_artifact(path).map_err(|err| match err {
        ArtifactError::Missing { path } => QueryError::MissingArtifact { path },
        other => {
            tracing::warn!("{} failed: {}", operation, other);
            QueryError::failed(operation, other)
        }
    })
}

impl QueryService {
    pub fn new(api_path: impl Into<PathBuf>, functions_path: impl Into<PathBuf>) -> Self {
        Self {
            api_path: api_path.into(),
            functions_path: functions_path.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.artifacts.api_path.clone(),
            config.artifacts.functions_path.clone(),
        )
    }

    fn index(&self, operation: Operation) -> Result<BinaryIndex, QueryError> {
        load(&self.api_path, operation)
    }

    fn catalog(&self, operation: Operation) -> Result<FunctionCatalog, QueryError> {
        load(&self.functions_path, operation)
    }

    /// Every binary name, sorted ascending.
    pub fn list_binaries(&self) -> Result<Vec<String>, QueryError> {
        let index = self.index(Operation::ListBinaries)?;
        Ok(ops::list_binaries(&index))
    }

    /// Binaries declaring `function_name`, each mapped to its formatted entries.
    pub fn list_binaries_by_function(
        &self,
        function_name: &str,
    ) -> Result<IndexMap<String, Value>, QueryError> {
        let index = self.index(Operation::ListBinariesByFunction)?;
        ops::binaries_by_function(&index, function_name)
    }

    pub fn list_functions(&self) -> Result<IndexMap<String, FunctionInfo>, QueryError> {
        let catalog = self.catalog(Operation::ListFunctions)?;
        Ok(ops::list_functions(&catalog))
    }

    /// The entry for `binary_name` with its code snippets fenced.
    pub fn query_binary(&self, binary_name: &str) -> Result<Value, QueryError> {
        let index = self.index(Operation::QueryBinary)?;
        ops::query_binary(&index, binary_name)
    }

    pub fn query_function(&self, function_name: &str) -> Result<FunctionInfo, QueryError> {
        let catalog = self.catalog(Operation::QueryFunction)?;
        ops::query_function(&catalog, function_name)
    }
}
