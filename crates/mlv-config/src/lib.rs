//! Configuration management for mlv.
//!
//! Parses `mlv.toml` with serde and discovers the file in the working
//! directory or its parents. CLI flags are layered on top through
//! [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! These string values support `${VAR}` (error if unset) and
//! `${VAR:-default}`:
//!
//! - `server.host`
//! - `content.root`
//! - `progress.dir`
//!
//! Relative paths are resolved against the directory holding the config
//! file, or the working directory when no file is found.

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mlv.toml";

/// Default content directory, relative to the config directory.
const DEFAULT_CONTENT_ROOT: &str = "content";

/// Default progress directory, relative to the config directory.
const DEFAULT_PROGRESS_DIR: &str = ".mlv/progress";

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Override the content root.
    pub content_root: Option<PathBuf>,
    /// Override the progress directory.
    pub progress_dir: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(rename = "content")]
    content_raw: ContentConfigRaw,
    #[serde(rename = "progress")]
    progress_raw: ProgressConfigRaw,
    pub navigation: NavigationConfig,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content: ContentConfig,
    /// Resolved progress configuration (set after loading).
    #[serde(skip)]
    pub progress: ProgressConfig,
    /// Path to the config file, when one was loaded.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
        }
    }
}

/// `[content]` as written in TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    root: Option<String>,
    chapter_priority: Vec<String>,
    collections: Option<Vec<String>>,
    linear_algebra_chapter: Option<String>,
}

/// Resolved content configuration.
///
/// `None` leaves the site's built-in default in place.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ContentConfig {
    /// Directory holding chapter and collection directories.
    pub root: PathBuf,
    /// Chapters read first, in this order.
    pub chapter_priority: Vec<String>,
    /// Flat directories served as standalone collections.
    pub collections: Option<Vec<String>>,
    /// Chapter directory served as the linear-algebra track.
    pub linear_algebra_chapter: Option<String>,
}

/// `[progress]` as written in TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ProgressConfigRaw {
    dir: Option<String>,
}

/// Resolved progress configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProgressConfig {
    /// Directory holding persisted progress files.
    pub dir: PathBuf,
}

/// Navigation ordering overrides.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct NavigationConfig {
    /// Sections listed first, in this order.
    pub section_order: Option<Vec<String>>,
    /// Groups pinned to the top of a section, keyed by section.
    pub pinned_groups: Option<BTreeMap<String, Vec<String>>>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g. "`content.root`").
        field: String,
        /// Error message (e.g. "${`MLV_CONTENT`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration with optional CLI settings.
    ///
    /// With `config_path`, loads that file; otherwise searches for `mlv.toml`
    /// in the current directory and its parents, falling back to defaults.
    /// CLI settings are applied last.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` doesn't exist, or if
    /// parsing, expansion or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Self::load_from_file(path)?,
            None => match Self::discover_config() {
                Some(found) => Self::load_from_file(&found)?,
                None => Self::default_with_cwd(),
            },
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(root) = &settings.content_root {
            self.content.root.clone_from(root);
        }
        if let Some(dir) = &settings.progress_dir {
            self.progress.dir.clone_from(dir);
        }
    }

    /// Check values that would otherwise fail later at bind or scan time.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` describing the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }
        if let Some(chapter) = &self.content.linear_algebra_chapter {
            require_non_empty(chapter, "content.linear_algebra_chapter")?;
        }
        for collection in self.content.collections.iter().flatten() {
            require_non_empty(collection, "content.collections")?;
        }
        Ok(())
    }

    /// Nearest `mlv.toml` in the working directory or its ancestors.
    fn discover_config() -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        cwd.ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            content_raw: ContentConfigRaw::default(),
            progress_raw: ProgressConfigRaw::default(),
            navigation: NavigationConfig::default(),
            content: ContentConfig {
                root: base.join(DEFAULT_CONTENT_ROOT),
                ..ContentConfig::default()
            },
            progress: ProgressConfig {
                dir: base.join(DEFAULT_PROGRESS_DIR),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        if let Some(root) = &self.content_raw.root {
            self.content_raw.root = Some(expand::expand_env(root, "content.root")?);
        }
        if let Some(dir) = &self.progress_raw.dir {
            self.progress_raw.dir = Some(expand::expand_env(dir, "progress.dir")?);
        }
        Ok(())
    }

    /// Resolve raw sections against `config_dir`.
    ///
    /// Absolute paths are kept as written.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.content = ContentConfig {
            root: resolve(self.content_raw.root.as_deref(), DEFAULT_CONTENT_ROOT),
            chapter_priority: self.content_raw.chapter_priority.clone(),
            collections: self.content_raw.collections.clone(),
            linear_algebra_chapter: self.content_raw.linear_algebra_chapter.clone(),
        };
        self.progress = ProgressConfig {
            dir: resolve(self.progress_raw.dir.as_deref(), DEFAULT_PROGRESS_DIR),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/site"));

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.content.root, PathBuf::from("/site/content"));
        assert_eq!(config.progress.dir, PathBuf::from("/site/.mlv/progress"));
        assert_eq!(config.content.collections, None);
        assert_eq!(config.navigation, NavigationConfig::default());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 8080

[content]
root = "lessons"
chapter_priority = ["chapter1", "optimization"]
collections = ["mistake-bounded", "extras"]
linear_algebra_chapter = "linalg"

[progress]
dir = "state"

[navigation]
section_order = ["bootcamps", "lectures"]
pinned_groups = { lectures = ["Algorithms", "Theory"] }
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.content,
            ContentConfig {
                root: PathBuf::from("/project/lessons"),
                chapter_priority: vec!["chapter1".to_owned(), "optimization".to_owned()],
                collections: Some(vec!["mistake-bounded".to_owned(), "extras".to_owned()]),
                linear_algebra_chapter: Some("linalg".to_owned()),
            }
        );
        assert_eq!(config.progress.dir, PathBuf::from("/project/state"));
        assert_eq!(
            config.navigation.section_order,
            Some(vec!["bootcamps".to_owned(), "lectures".to_owned()])
        );
        assert_eq!(
            config.navigation.pinned_groups,
            Some(BTreeMap::from([(
                "lectures".to_owned(),
                vec!["Algorithms".to_owned(), "Theory".to_owned()]
            )]))
        );
    }

    #[test]
    fn test_resolve_paths_keeps_absolute() {
        let toml = r#"
[content]
root = "/srv/content"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.content.root, PathBuf::from("/srv/content"));
        assert_eq!(config.progress.dir, PathBuf::from("/project/.mlv/progress"));
    }

    #[test]
    fn test_unknown_field_type_is_parse_error() {
        let result: Result<Config, _> = toml::from_str("[server]\nport = \"high\"\n");

        assert!(result.is_err());
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/site"));
        let settings = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(9000),
            content_root: Some(PathBuf::from("/elsewhere")),
            progress_dir: None,
        };

        config.apply_cli_settings(&settings);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.content.root, PathBuf::from("/elsewhere"));
        assert_eq!(config.progress.dir, PathBuf::from("/site/.mlv/progress"));
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/site"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.content.root, PathBuf::from("/site/content"));
    }

    #[test]
    fn test_expand_env_vars_in_paths() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MLV_TEST_CONTENT", "/data/content");
        }
        let toml = r#"
[content]
root = "${MLV_TEST_CONTENT}"

[progress]
dir = "${MLV_TEST_PROGRESS_UNSET:-progress}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.content.root, PathBuf::from("/data/content"));
        assert_eq!(config.progress.dir, PathBuf::from("/project/progress"));
        unsafe {
            std::env::remove_var("MLV_TEST_CONTENT");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MLV_TEST_HOST_MISSING");
        }
        let toml = r#"
[server]
host = "${MLV_TEST_HOST_MISSING}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();

        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("server.host"));
    }

    #[test]
    fn test_validate_default_passes() {
        assert!(Config::default_with_base(Path::new("/site")).validate().is_ok());
    }

    #[test]
    fn test_validate_host_empty() {
        let mut config = Config::default_with_base(Path::new("/site"));
        config.server.host = "  ".to_owned();

        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("server.host cannot be empty"));
    }

    #[test]
    fn test_validate_port_zero() {
        let mut config = Config::default_with_base(Path::new("/site"));
        config.server.port = 0;

        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("server.port cannot be 0"));
    }

    #[test]
    fn test_validate_empty_collection_name() {
        let mut config = Config::default_with_base(Path::new("/site"));
        config.content.collections = Some(vec![String::new()]);

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let result = Config::load(Some(Path::new("/nonexistent/mlv.toml")), None);

        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_explicit_file_resolves_against_its_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mlv.toml");
        std::fs::write(&path, "[server]\nport = 4000\n\n[content]\nroot = \"lessons\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.content.root, dir.path().join("lessons"));
        assert_eq!(config.progress.dir, dir.path().join(".mlv/progress"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mlv.toml");
        std::fs::write(&path, "[server]\nport = 0\n").unwrap();

        let result = Config::load(Some(&path), None);

        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_cli_settings_override_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mlv.toml");
        std::fs::write(&path, "[server]\nport = 4000\n").unwrap();
        let settings = CliSettings {
            port: Some(5000),
            ..CliSettings::default()
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.server.port, 5000);
    }
}
