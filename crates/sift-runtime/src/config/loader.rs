//! Layered configuration loading.
//!
//! Sources, from weakest to strongest:
//!
//! 1. [`SiftConfig::default`]
//! 2. The profile file next to the main file (`sift.{profile}.toml`)
//! 3. The main file (`sift.toml` or `config.toml`, or their YAML forms)
//! 4. `SIFT_*` environment variables
//! 5. Values passed to [`ConfigLoader::set`] or [`ConfigLoader::merge`]
//!
//! Every source only replaces the keys it actually sets. Tables such as
//! `[logging]` are merged key by key.
//!
//! The main file is looked up in the current directory, then in the `sift`
//! directory under the user config dir. Custom search paths replace both.
//!
//! Environment variables use `__` between nesting levels:
//!
//! - `SIFT_BOT_USERNAME=mybot` sets `bot_username`
//! - `SIFT_LOGGING__LEVEL=debug` sets `logging.level`
//!
//! `SIFT_PROFILE` selects the profile and is not part of the config itself.
//!
//! ```rust,ignore
//! use sift_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .profile("prod")
//!     .file("/etc/sift/sift.toml")
//!     .load()?;
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "toml-config", feature = "yaml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::SiftConfig;
use super::validation::validate_config;

const ENV_PREFIX: &str = "SIFT_";
const PROFILE_VAR: &str = "SIFT_PROFILE";

/// Selects the optional `sift.{profile}.*` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    #[default]
    Development,
    Production,
    Custom(String),
}

impl Profile {
    /// Returns the name used in profile file names.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Parses a profile name. `dev` and `prod` are accepted as short forms.
    pub fn parse(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        match name.as_str() {
            "dev" | "development" => Self::Development,
            "prod" | "production" => Self::Production,
            _ => Self::Custom(name),
        }
    }

    /// Reads `SIFT_PROFILE`, falling back to development.
    pub fn from_env() -> Self {
        std::env::var(PROFILE_VAR)
            .ok()
            .filter(|name| !name.trim().is_empty())
            .map(|name| Self::parse(&name))
            .unwrap_or_default()
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File formats compiled into this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    #[cfg(feature = "toml-config")]
    Toml,
    #[cfg(feature = "yaml-config")]
    Yaml,
}

impl FileFormat {
    /// Formats in lookup order.
    const ENABLED: &'static [FileFormat] = &[
        #[cfg(feature = "toml-config")]
        FileFormat::Toml,
        #[cfg(feature = "yaml-config")]
        FileFormat::Yaml,
    ];

    fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            #[cfg(feature = "toml-config")]
            "toml" => Some(Self::Toml),
            #[cfg(feature = "yaml-config")]
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    fn main_files(self) -> &'static [&'static str] {
        match self {
            #[cfg(feature = "toml-config")]
            Self::Toml => &["sift.toml", "config.toml"],
            #[cfg(feature = "yaml-config")]
            Self::Yaml => &["sift.yaml", "sift.yml", "config.yaml", "config.yml"],
        }
    }

    fn merge_into(self, figment: Figment, path: &Path) -> Figment {
        match self {
            #[cfg(feature = "toml-config")]
            Self::Toml => figment.merge(Toml::file(path)),
            #[cfg(feature = "yaml-config")]
            Self::Yaml => figment.merge(Yaml::file(path)),
        }
    }
}

/// A discovered main file and the profile file beside it, if any.
#[derive(Debug)]
struct Discovered {
    format: FileFormat,
    main: PathBuf,
    profile: Option<PathBuf>,
}

/// Builder for loading a [`SiftConfig`] from layered sources.
#[derive(Debug)]
pub struct ConfigLoader {
    profile: Profile,
    search_paths: Vec<PathBuf>,
    explicit_file: Option<PathBuf>,
    read_env: bool,
    overrides: Figment,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader using the profile from `SIFT_PROFILE`.
    pub fn new() -> Self {
        Self {
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            explicit_file: None,
            read_env: true,
            overrides: Figment::new(),
        }
    }

    /// Overrides the profile.
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::parse(profile.as_ref());
        self
    }

    /// Adds a directory to search for the main file. Once any is added the
    /// default locations are no longer searched.
    pub fn search_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_paths.push(dir.into());
        self
    }

    /// Loads exactly this file instead of searching. It must exist.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(path.into());
        self
    }

    /// Reads `SIFT_*` environment variables (the default).
    pub fn with_env(mut self) -> Self {
        self.read_env = true;
        self
    }

    /// Ignores environment variables.
    pub fn without_env(mut self) -> Self {
        self.read_env = false;
        self
    }

    /// Sets one value over every other source. Dotted keys reach into
    /// tables, e.g. `set("logging.level", "debug")`.
    pub fn set(mut self, key: &str, value: impl Serialize) -> Self {
        self.overrides = self.overrides.merge(Serialized::default(key, value));
        self
    }

    /// Layers every key `overrides` serializes to over every other source.
    ///
    /// Pass a map or a struct holding only the keys to change. A whole
    /// [`SiftConfig`] sets every key, its empty `rules` included.
    pub fn merge(mut self, overrides: impl Serialize) -> Self {
        self.overrides = self.overrides.merge(Serialized::defaults(overrides));
        self
    }

    /// Merges all sources, then extracts and validates the result.
    pub fn load(self) -> ConfigResult<SiftConfig> {
        let profile = self.profile.clone();
        let config: SiftConfig = self.figment()?.extract()?;
        validate_config(&config)?;

        debug!(
            %profile,
            level = %config.logging.level,
            rules = config.rules.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    fn figment(self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(SiftConfig::default()));

        match &self.explicit_file {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::FileNotFound(path.clone()));
                }
                let format = FileFormat::from_path(path).ok_or_else(|| {
                    ConfigError::ParseError(format!(
                        "{}: unsupported or disabled configuration format",
                        path.display()
                    ))
                })?;
                info!(path = %path.display(), "Loading configuration file");
                figment = format.merge_into(figment, path);
            }
            None => match self.discover() {
                Some(found) => {
                    if let Some(profile_file) = &found.profile {
                        debug!(path = %profile_file.display(), "Loading profile configuration");
                        figment = found.format.merge_into(figment, profile_file);
                    }
                    info!(path = %found.main.display(), "Loading configuration file");
                    figment = found.format.merge_into(figment, &found.main);
                }
                None => warn!("No configuration file found, using defaults"),
            },
        }

        if self.read_env {
            trace!(prefix = ENV_PREFIX, "Reading environment variables");
            figment = figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["PROFILE"]).split("__"));
        }

        Ok(figment.merge(self.overrides))
    }

    fn directories(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }

        std::env::current_dir()
            .ok()
            .into_iter()
            .chain(dirs::config_dir().map(|dir| dir.join("sift")))
            .collect()
    }

    /// Finds the first main file, trying directories in order and formats in
    /// [`FileFormat::ENABLED`] order within each directory.
    fn discover(&self) -> Option<Discovered> {
        for dir in self.directories() {
            for &format in FileFormat::ENABLED {
                for name in format.main_files() {
                    let main = dir.join(name);
                    if !main.is_file() {
                        continue;
                    }

                    let profile = Path::new(name)
                        .file_stem()
                        .zip(main.extension())
                        .map(|(stem, ext)| {
                            dir.join(format!(
                                "{}.{}.{}",
                                stem.to_string_lossy(),
                                self.profile,
                                ext.to_string_lossy()
                            ))
                        })
                        .filter(|path| path.is_file());

                    return Some(Discovered {
                        format,
                        main,
                        profile,
                    });
                }
            }
        }
        None
    }
}

/// Loads configuration from the default locations.
pub fn load_config() -> ConfigResult<SiftConfig> {
    ConfigLoader::new().load()
}

/// Loads configuration from `path`, still honouring `SIFT_*` variables.
pub fn load_config_from_file(path: impl Into<PathBuf>) -> ConfigResult<SiftConfig> {
    ConfigLoader::new().file(path).load()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{LogFormat, LogLevel, RuleKind};
    use figment::Jail;

    fn jailed(result: ConfigResult<SiftConfig>) -> figment::error::Result<SiftConfig> {
        result.map_err(|e| figment::Error::from(e.to_string()))
    }

    #[test]
    fn test_default_config() {
        Jail::expect_with(|jail| {
            let config = jailed(
                ConfigLoader::new()
                    .search_path(jail.directory())
                    .without_env()
                    .load(),
            )?;

            assert_eq!(config.logging.level.as_str(), "info");
            assert!(config.rules.is_empty());
            Ok(())
        });
    }

    #[test]
    fn test_load_rules_from_toml() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "sift.toml",
                r#"
                bot_username = "mybot"

                [logging]
                level = "debug"

                [[rules]]
                name = "start"
                kind = "command"
                names = ["start", "help"]

                [[rules]]
                name = "admins"
                kind = "whitelist"
                ids = [1, 2]
                "#,
            )?;

            let config = jailed(
                ConfigLoader::new()
                    .search_path(jail.directory())
                    .without_env()
                    .load(),
            )?;

            assert_eq!(config.bot_username, "mybot");
            assert_eq!(config.logging.level, LogLevel::Debug);
            assert_eq!(config.rules.len(), 2);
            assert_eq!(config.rules[1].kind, RuleKind::Whitelist { ids: vec![1, 2] });
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("sift.toml", r#"bot_username = "filebot""#)?;
            jail.set_env("SIFT_BOT_USERNAME", "envbot");
            jail.set_env("SIFT_LOGGING__LEVEL", "warn");

            let config = jailed(ConfigLoader::new().search_path(jail.directory()).load())?;

            assert_eq!(config.bot_username, "envbot");
            assert_eq!(config.logging.level, LogLevel::Warn);
            Ok(())
        });
    }

    #[test]
    fn test_profile_file_is_merged() {
        Jail::expect_with(|jail| {
            jail.create_file("sift.production.toml", r#"bot_username = "prodbot""#)?;
            jail.create_file("sift.toml", "[logging]\nlevel = \"error\"")?;

            let config = jailed(
                ConfigLoader::new()
                    .profile("prod")
                    .search_path(jail.directory())
                    .without_env()
                    .load(),
            )?;

            assert_eq!(config.bot_username, "prodbot");
            assert_eq!(config.logging.level, LogLevel::Error);
            Ok(())
        });
    }

    #[test]
    fn test_programmatic_override_wins() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "sift.toml",
                r#"
                bot_username = "filebot"

                [logging]
                level = "debug"

                [[rules]]
                name = "hello"
                kind = "text"
                text = "hi"
                "#,
            )?;

            let config = jailed(
                ConfigLoader::new()
                    .search_path(jail.directory())
                    .without_env()
                    .set("bot_username", "codebot")
                    .load(),
            )?;

            assert_eq!(config.bot_username, "codebot");
            assert_eq!(config.logging.level, LogLevel::Debug);
            assert_eq!(config.rules.len(), 1);
            assert_eq!(config.rules[0].name, "hello");
            Ok(())
        });
    }

    #[test]
    fn test_partial_merge_keeps_file_values() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "sift.toml",
                r#"
                bot_username = "filebot"

                [logging]
                level = "debug"

                [[rules]]
                name = "hello"
                kind = "text"
                text = "hi"
                "#,
            )?;

            let config = jailed(
                ConfigLoader::new()
                    .search_path(jail.directory())
                    .without_env()
                    .merge(serde_json::json!({ "logging": { "format": "pretty" } }))
                    .set("logging.thread_ids", true)
                    .load(),
            )?;

            assert_eq!(config.bot_username, "filebot");
            assert_eq!(config.logging.level, LogLevel::Debug);
            assert_eq!(config.logging.format, LogFormat::Pretty);
            assert!(config.logging.thread_ids);
            assert_eq!(config.rules.len(), 1);
            Ok(())
        });
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigLoader::new()
            .file("/definitely/not/here/sift.toml")
            .without_env()
            .load();
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_invalid_rules_fail_validation() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "sift.toml",
                r#"
                [[rules]]
                name = "a"
                kind = "always"

                [[rules]]
                name = "a"
                kind = "never"
                "#,
            )?;

            let result = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load();
            assert!(matches!(result, Err(ConfigError::DuplicateRule(_))));
            Ok(())
        });
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!(Profile::parse("PROD"), Profile::Production);
        assert_eq!(Profile::parse("dev"), Profile::Development);
        assert_eq!(Profile::parse("staging").as_str(), "staging");
    }
}
