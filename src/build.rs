//! Offline index build.
//!
//! Reads the function catalog (`functions.yml`) and every document directly
//! inside the corpus directory matching `[build].include_globs` (`*.md` by
//! default, symlinks followed), flattens them through [`IndexBuilder`], and
//! writes `api.json` and `functions.json`.
//!
//! The build is all-or-nothing. Any unreadable catalog or malformed document
//! aborts the run before anything is written. Both artifacts are then staged
//! as `<name>.tmp` siblings and renamed into place only once both staged
//! writes have succeeded, so a failed build leaves the previous pair intact.
//! Documents are visited in file-name order, so rebuilding an unchanged
//! corpus produces byte-identical artifacts.

use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use gtfobins_core::build::{FunctionDeclarations, IndexBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::frontmatter;

/// Counts reported after a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub binaries: usize,
    pub functions: usize,
    pub undeclared: Vec<String>,
    pub api_path: PathBuf,
    pub functions_path: PathBuf,
}

/// Parses the catalog document: function name → `{description, ...}`.
pub fn load_function_declarations(path: &Path) -> Result<FunctionDeclarations> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read function catalog: {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse function catalog: {}", path.display()))
}

/// Lists the corpus documents whose file names match `include_globs`, in
/// file-name order.
pub fn scan_corpus(corpus_dir: &Path, include_globs: &[String]) -> Result<Vec<PathBuf>> {
    if !corpus_dir.is_dir() {
        bail!("Corpus directory does not exist: {}", corpus_dir.display());
    }

    let include_set = build_globset(include_globs)?;
    let mut documents = Vec::new();

    let walker = WalkDir::new(corpus_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if hidden || !include_set.is_match(entry.file_name()) {
            continue;
        }

        documents.push(entry.into_path());
    }

    Ok(documents)
}

fn binary_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Runs the full build described by `config.build` and writes the artifacts
/// to `config.artifacts`.
pub fn run_build(config: &Config) -> Result<BuildSummary> {
    let declarations = load_function_declarations(&config.build.functions_yml)?;
    tracing::debug!(
        "loaded {} function declarations from {}",
        declarations.len(),
        config.build.functions_yml.display()
    );

    let documents = scan_corpus(&config.build.corpus_dir, &config.build.include_globs)?;
    let mut builder = IndexBuilder::new(declarations);

    for path in &documents {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read document: {}", path.display()))?;
        let document = frontmatter::parse_binary_document(&text)
            .with_context(|| format!("Failed to parse document: {}", path.display()))?;
        builder.add_binary(binary_name(path), document);
    }

    let output = builder.finish();
    if !output.undeclared.is_empty() {
        tracing::warn!(
            "functions missing from catalog (empty descriptions): {}",
            output.undeclared.join(", ")
        );
    }

    let api_json = serde_json::to_string_pretty(&output.index)?;
    let functions_json = serde_json::to_string_pretty(&output.catalog)?;

    write_artifacts(&[
        (config.artifacts.api_path.as_path(), api_json.as_str()),
        (config.artifacts.functions_path.as_path(), functions_json.as_str()),
    ])?;

    let summary = BuildSummary {
        binaries: output.index.len(),
        functions: output.catalog.functions.len(),
        undeclared: output.undeclared,
        api_path: config.artifacts.api_path.clone(),
        functions_path: config.artifacts.functions_path.clone(),
    };
    tracing::info!(
        binaries = summary.binaries,
        functions = summary.functions,
        "wrote {} and {}",
        summary.api_path.display(),
        summary.functions_path.display()
    );

    Ok(summary)
}

/// Writes every artifact or none of them.
fn write_artifacts(artifacts: &[(&Path, &str)]) -> Result<()> {
    for (path, _) in artifacts {
        if path.is_dir() {
            bail!("Artifact path is a directory: {}", path.display());
        }
    }

    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(artifacts.len());
    for (path, json) in artifacts {
        match stage_artifact(path, json) {
            Ok(tmp) => staged.push((tmp, *path)),
            Err(e) => {
                discard(&staged);
                return Err(e);
            }
        }
    }

    for (i, (tmp, path)) in staged.iter().enumerate() {
        if let Err(e) = std::fs::rename(tmp, path) {
            discard(&staged[i..]);
            return Err(e).with_context(|| format!("Failed to replace: {}", path.display()));
        }
    }
    Ok(())
}

/// Writes `json` to the `.tmp` sibling of `path` and returns that sibling.
fn stage_artifact(path: &Path, json: &str) -> Result<PathBuf> {
    let Some(file_name) = path.file_name() else {
        bail!("Artifact path has no file name: {}", path.display());
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);
    std::fs::write(&tmp, json).with_context(|| format!("Failed to write: {}", tmp.display()))?;
    Ok(tmp)
}

fn discard(staged: &[(PathBuf, &Path)]) {
    for (tmp, _) in staged {
        if let Err(e) = std::fs::remove_file(tmp) {
            tracing::warn!("failed to remove {}: {}", tmp.display(), e);
        }
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(
            Glob::new(pattern).with_context(|| format!("Invalid include glob: {}", pattern))?,
        );
    }
    Ok(builder.build()?)
}
