//! Layered configuration loading
//!
//! Every layer is optional; later layers override individual keys of earlier
//! ones rather than replacing whole sections.

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_CONFIG_FILES: [&str; 2] = ["witness.toml", ".witness.toml"];
const ENV_PREFIX: &str = "WITNESS_";

/// Discovers configuration layers and merges them into a [`FileConfig`].
pub struct ConfigLoader;

impl ConfigLoader {
    /// Merge and extract every configuration layer.
    ///
    /// Priority (highest to lowest):
    /// 1. `WITNESS_*` environment variables, e.g. `WITNESS_ENGINE__GRACE_PERIOD_MS=500`
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./witness.toml` or `./.witness.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/witness-quorum/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path.map(PathBuf::as_path))
            .extract()
            .map_err(Box::new)
    }

    /// Build the merged figment without extracting it.
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Built-in defaults only (`--no-config`).
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// `<config dir>/witness-quorum/config.toml`, whether or not it exists.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("witness-quorum").join("config.toml"))
    }

    /// First of `./witness.toml` and `./.witness.toml` that exists.
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print each layer and whether it was found (`--show-config`).
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");
        println!("  [     ] Env:     {}* variables", ENV_PREFIX);

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./witness.toml or ./.witness.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.engine.collection_window_ms, 30_000);
        assert_eq!(config.witnesses.count, 10);
    }

    #[test]
    fn test_global_config_path_names_the_tool() {
        if let Some(path) = ConfigLoader::global_config_path() {
            assert!(path.ends_with("witness-quorum/config.toml"));
        }
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let file = write_config(
            r#"
[engine]
grace_period_ms = 250

[witnesses]
count = 4
silent = ["witness-02"]
"#,
        );

        let config: FileConfig = ConfigLoader::figment(Some(file.path()))
            .extract()
            .unwrap();
        assert_eq!(config.engine.grace_period_ms, 250);
        assert_eq!(config.engine.collection_window_ms, 30_000);
        assert_eq!(config.witnesses.count, 4);
        assert_eq!(config.witnesses.silent, vec!["witness-02".to_string()]);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let file = write_config("[engine]\ncollection_window_ms = \"soon\"\n");
        let result = ConfigLoader::load(Some(&file.path().to_path_buf()));
        assert!(result.is_err());
    }
}
