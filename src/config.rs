//! TOML configuration.
//!
//! Every section is optional. Relative paths in a config file are resolved
//! against the directory containing that file. Without a config file the
//! artifacts live next to the `gtfo` executable and the builder expects a
//! GTFOBins checkout at `./GTFOBins.github.io`.
//!
//! ```toml
//! [artifacts]
//! api_path = "data/api.json"
//! functions_path = "data/functions.json"
//!
//! [build]
//! corpus_dir = "GTFOBins.github.io/_gtfobins"
//! functions_yml = "GTFOBins.github.io/_data/functions.yml"
//! include_globs = ["*.md"]
//!
//! [server]
//! bind = "127.0.0.1:7340"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Locations of the two generated JSON artifacts.
#[derive(Debug, Deserialize, Clone)]
pub struct ArtifactsConfig {
    #[serde(default = "default_api_path")]
    pub api_path: PathBuf,
    #[serde(default = "default_functions_path")]
    pub functions_path: PathBuf,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            api_path: default_api_path(),
            functions_path: default_functions_path(),
        }
    }
}

impl ArtifactsConfig {
    pub fn resolve_relative_to(&mut self, base: &Path) {
        resolve(base, &mut self.api_path);
        resolve(base, &mut self.functions_path);
    }
}

fn default_api_path() -> PathBuf {
    PathBuf::from("api.json")
}
fn default_functions_path() -> PathBuf {
    PathBuf::from("functions.json")
}

/// Inputs of the offline index build.
#[derive(Debug, Deserialize, Clone)]
pub struct BuildConfig {
    #[serde(default = "default_corpus_dir")]
    pub corpus_dir: PathBuf,
    #[serde(default = "default_functions_yml")]
    pub functions_yml: PathBuf,
    /// File-name globs selecting corpus documents.
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            corpus_dir: default_corpus_dir(),
            functions_yml: default_functions_yml(),
            include_globs: default_include_globs(),
        }
    }
}

impl BuildConfig {
    pub fn resolve_relative_to(&mut self, base: &Path) {
        resolve(base, &mut self.corpus_dir);
        resolve(base, &mut self.functions_yml);
    }
}

fn default_corpus_dir() -> PathBuf {
    PathBuf::from("GTFOBins.github.io/_gtfobins")
}
fn default_functions_yml() -> PathBuf {
    PathBuf::from("GTFOBins.github.io/_data/functions.yml")
}
fn default_include_globs() -> Vec<String> {
    vec!["*.md".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7340".to_string()
}

impl Config {
    /// Defaults for every section, used when no config file exists.
    pub fn minimal() -> Self {
        Self::default()
    }

    /// Rewrites every relative path as `base.join(path)`.
    pub fn resolve_relative_to(&mut self, base: &Path) {
        self.artifacts.resolve_relative_to(base);
        self.build.resolve_relative_to(base);
    }
}

fn resolve(base: &Path, path: &mut PathBuf) {
    if path.is_relative() {
        *path = base.join(&*path);
    }
}

/// Loads `path`, resolving its relative paths against the file's directory.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;

    if let Some(dir) = path.parent() {
        config.resolve_relative_to(dir);
    }
    Ok(config)
}

/// Loads `path` if it exists, otherwise falls back to [`Config::minimal`]
/// with the artifacts placed next to the running executable.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!("no config at {}, using defaults", path.display());
    let mut config = Config::minimal();
    match service_dir() {
        Some(dir) => config.artifacts.resolve_relative_to(&dir),
        None => tracing::warn!(
            "cannot locate executable, artifacts resolve against the working directory"
        ),
    }
    Ok(config)
}

/// Directory containing the running executable.
fn service_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(Path::to_path_buf)
}

fn validate(config: &Config) -> Result<()> {
    let paths = [
        ("artifacts.api_path", &config.artifacts.api_path),
        ("artifacts.functions_path", &config.artifacts.functions_path),
        ("build.corpus_dir", &config.build.corpus_dir),
        ("build.functions_yml", &config.build.functions_yml),
    ];
    for (key, path) in paths {
        if path.as_os_str().is_empty() {
            anyhow::bail!("{} must not be empty", key);
        }
    }

    if config.build.include_globs.is_empty() {
        anyhow::bail!("build.include_globs must name at least one pattern");
    }

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.artifacts.api_path, PathBuf::from("api.json"));
        assert_eq!(cfg.artifacts.functions_path, PathBuf::from("functions.json"));
        assert_eq!(cfg.server.bind, "127.0.0.1:7340");
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn test_partial_section() {
        let cfg: Config = toml::from_str("[artifacts]\napi_path = \"data/api.json\"\n").unwrap();
        assert_eq!(cfg.artifacts.api_path, PathBuf::from("data/api.json"));
        assert_eq!(cfg.artifacts.functions_path, PathBuf::from("functions.json"));
    }

    #[test]
    fn test_rejects_empty_values() {
        let cfg: Config = toml::from_str("[server]\nbind = \" \"\n").unwrap();
        assert!(validate(&cfg).is_err());

        let cfg: Config = toml::from_str("[build]\ncorpus_dir = \"\"\n").unwrap();
        let err = validate(&cfg).unwrap_err().to_string();
        assert!(err.contains("build.corpus_dir"));

        let cfg: Config = toml::from_str("[build]\ninclude_globs = []\n").unwrap();
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("gtfo.toml");
        std::fs::write(
            &path,
            "[artifacts]\napi_path = \"data/api.json\"\nfunctions_path = \"/srv/functions.json\"\n\n[build]\ncorpus_dir = \"corpus\"\ninclude_globs = [\"*.markdown\"]\n",
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.artifacts.api_path, tmp.path().join("data/api.json"));
        assert_eq!(cfg.artifacts.functions_path, PathBuf::from("/srv/functions.json"));
        assert_eq!(cfg.build.corpus_dir, tmp.path().join("corpus"));
        assert_eq!(
            cfg.build.functions_yml,
            tmp.path().join("GTFOBins.github.io/_data/functions.yml")
        );
        assert_eq!(cfg.build.include_globs, vec!["*.markdown".to_string()]);
    }

    #[test]
    fn test_missing_config_places_artifacts_next_to_executable() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cfg = load_or_default(&tmp.path().join("absent.toml")).unwrap();

        let exe_dir = service_dir().unwrap();
        assert_eq!(cfg.artifacts.api_path, exe_dir.join("api.json"));
        assert_eq!(cfg.artifacts.functions_path, exe_dir.join("functions.json"));
        assert_eq!(cfg.build.corpus_dir, default_corpus_dir());
    }
}
