//! Configuration resolution for input files.
//!
//! Resolves the formatting configuration for a file using a deterministic
//! priority order:
//!
//! 1. `--config` flag (explicit path)
//! 2. Nearest `protofmt.toml`, searching upward from the file's directory
//! 3. No config found → defaults
//!
//! Lookups are cached. Directories map to the config file that governs them
//! and config files map to their parsed contents, so a tree of inputs sharing
//! one `protofmt.toml` reads it once. A directory with no config above it is
//! not cached and will be searched again. An explicit `--config` file goes
//! through the same file cache.

use protofmt_core::{Config, ConfigError, FormatConfig, CONFIG_FILE_NAME};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::debug;

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified via `--config` flag.
    Explicit(PathBuf),
    /// Found by searching upward from the input.
    Discovered(PathBuf),
    /// No config found; defaults will be used.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Discovered(p) => Some(p),
            Self::Default => None,
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Explicit(p) => write!(f, "{} (--config)", p.display()),
            Self::Discovered(p) => write!(f, "{}", p.display()),
            Self::Default => write!(f, "built-in defaults"),
        }
    }
}

type Slot<V> = Arc<Mutex<Option<V>>>;
type SlotMap<V> = RwLock<HashMap<PathBuf, Slot<V>>>;

/// Caching resolver shared by every input of one run.
///
/// Safe to use from several threads. Both caches hold one slot per key, and
/// a caller filling a slot holds its lock, so concurrent misses on the same
/// directory or file do the work once. Keys are lexically normalized.
#[derive(Debug, Default)]
pub struct ConfigProvider {
    dir_to_file: SlotMap<PathBuf>,
    file_to_config: SlotMap<FormatConfig>,
}

impl ConfigProvider {
    /// Creates a provider with empty caches.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves where the configuration for `input` comes from.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotAbsolute`] if `input` or `explicit` is
    /// relative.
    pub fn resolve(
        &self,
        input: &Path,
        explicit: Option<&Path>,
    ) -> Result<ConfigSource, ConfigError> {
        if let Some(p) = explicit {
            require_absolute(p)?;
            return Ok(ConfigSource::Explicit(normalize(p)));
        }
        require_absolute(input)?;
        let start = if input.is_dir() {
            input
        } else {
            input.parent().unwrap_or(input)
        };
        Ok(match self.config_file_for_dir(start)? {
            Some(file) => ConfigSource::Discovered(file),
            None => ConfigSource::Default,
        })
    }

    /// Returns the formatting configuration for `input`.
    ///
    /// # Errors
    ///
    /// Returns an error if a path is relative, or if the governing config
    /// file cannot be read, parsed or validated.
    pub fn format_config_for(
        &self,
        input: &Path,
        explicit: Option<&Path>,
    ) -> Result<FormatConfig, ConfigError> {
        let source = self.resolve(input, explicit)?;
        self.config_for_source(&source)
    }

    /// Returns the formatting configuration a resolved source stands for.
    ///
    /// # Errors
    ///
    /// Returns an error if the source's file cannot be loaded.
    pub fn config_for_source(&self, source: &ConfigSource) -> Result<FormatConfig, ConfigError> {
        match source.path() {
            Some(file) => self.load(file),
            None => Ok(FormatConfig::default()),
        }
    }

    /// Finds the nearest config file at or above `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotAbsolute`] if `dir` is relative.
    pub fn config_file_for_dir(&self, dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
        require_absolute(dir)?;
        Ok(self.lookup_dir(&normalize(dir)))
    }

    /// Loads and validates a config file, reusing an earlier load.
    ///
    /// A successful load also records the file for its own directory.
    /// Failed loads are not cached.
    ///
    /// # Errors
    ///
    /// Returns an error if `file` is relative or cannot be loaded.
    pub fn load(&self, file: &Path) -> Result<FormatConfig, ConfigError> {
        require_absolute(file)?;
        let file = normalize(file);

        let file_slot = slot(&self.file_to_config, &file);
        let mut guard = file_slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(config) = guard.as_ref() {
            return Ok(config.clone());
        }
        debug!("Loading config file {}", file.display());
        let config = Config::from_file(&file)?.format_config()?;
        *guard = Some(config.clone());
        drop(guard);

        if let Some(dir) = file.parent() {
            let dir_slot = slot(&self.dir_to_file, dir);
            let mut cached = dir_slot.lock().unwrap_or_else(PoisonError::into_inner);
            if cached.is_none() {
                debug!("Adding {} to config cache", dir.display());
                *cached = Some(file.clone());
            }
        }
        Ok(config)
    }

    /// Searches `dir` and its ancestors, holding each directory's slot while
    /// its answer is computed. Locks are taken child before parent.
    fn lookup_dir(&self, dir: &Path) -> Option<PathBuf> {
        let dir_slot = slot(&self.dir_to_file, dir);
        let mut guard = dir_slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(file) = guard.as_ref() {
            debug!("Config cache hit for {}", dir.display());
            return Some(file.clone());
        }

        let candidate = dir.join(CONFIG_FILE_NAME);
        let found = if candidate.is_file() {
            debug!("Found config: {}", candidate.display());
            Some(candidate)
        } else {
            dir.parent().and_then(|parent| self.lookup_dir(parent))
        };

        if let Some(file) = &found {
            debug!("Adding {} to config cache", dir.display());
            *guard = Some(file.clone());
        }
        found
    }
}

/// Returns the slot for `key`, creating an empty one on first use.
fn slot<V>(map: &SlotMap<V>, key: &Path) -> Slot<V> {
    if let Some(slot) = map
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(key)
    {
        return Arc::clone(slot);
    }
    let mut slots = map.write().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(slots.entry(key.to_path_buf()).or_default())
}

/// Lexically cleans an absolute path: drops `.` and resolves `..`.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn require_absolute(path: &Path) -> Result<(), ConfigError> {
    if path.is_absolute() {
        Ok(())
    } else {
        Err(ConfigError::NotAbsolute {
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILE_NAME);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn explicit_takes_priority_over_discovered() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), "");
        let explicit = tmp.path().join("custom.toml");

        let provider = ConfigProvider::new();
        let result = provider
            .resolve(&tmp.path().join("a.json"), Some(&explicit))
            .unwrap();
        assert_eq!(result, ConfigSource::Explicit(explicit));
    }

    #[test]
    fn nearest_config_above_input_is_found() {
        let tmp = TempDir::new().unwrap();
        let config = write_config(tmp.path(), "");
        let nested = tmp.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();

        let provider = ConfigProvider::new();
        let result = provider.resolve(&nested.join("x.json"), None).unwrap();
        assert_eq!(result, ConfigSource::Discovered(config));
    }

    #[test]
    fn closer_config_shadows_outer_one() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), "[format]\nindent = \"4s\"\n");
        let inner_dir = tmp.path().join("inner");
        fs::create_dir(&inner_dir).unwrap();
        write_config(&inner_dir, "[format]\nindent = \"1t\"\n");

        let provider = ConfigProvider::new();
        let outer = provider
            .format_config_for(&tmp.path().join("a.json"), None)
            .unwrap();
        let inner = provider
            .format_config_for(&inner_dir.join("b.json"), None)
            .unwrap();
        assert_eq!(outer.indent, "    ");
        assert_eq!(inner.indent, "\t");
    }

    #[test]
    fn traversed_directories_are_cached() {
        let tmp = TempDir::new().unwrap();
        let config = write_config(tmp.path(), "");
        let nested = tmp.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();

        let provider = ConfigProvider::new();
        provider.config_file_for_dir(&nested).unwrap();

        // Removing the file does not affect cached directories.
        fs::remove_file(&config).unwrap();
        assert_eq!(
            provider.config_file_for_dir(&tmp.path().join("a")).unwrap(),
            Some(config)
        );
    }

    #[test]
    fn parsed_configs_are_cached() {
        let tmp = TempDir::new().unwrap();
        let config = write_config(tmp.path(), "[format]\nrpc_use_semicolons = true\n");

        let provider = ConfigProvider::new();
        assert!(provider.load(&config).unwrap().rpc_use_semicolons);

        fs::write(&config, "[format]\nrpc_use_semicolons = false\n").unwrap();
        assert!(provider.load(&config).unwrap().rpc_use_semicolons);
    }

    #[test]
    fn failed_loads_are_retried() {
        let tmp = TempDir::new().unwrap();
        let config = write_config(tmp.path(), "[format]\nindent = \"0s\"\n");

        let provider = ConfigProvider::new();
        assert!(matches!(
            provider.load(&config),
            Err(ConfigError::InvalidIndent { .. })
        ));

        fs::write(&config, "[format]\nindent = \"3s\"\n").unwrap();
        assert_eq!(provider.load(&config).unwrap().indent, "   ");
    }

    #[test]
    fn default_source_yields_default_config() {
        let provider = ConfigProvider::new();
        assert_eq!(
            provider.config_for_source(&ConfigSource::Default).unwrap(),
            FormatConfig::default()
        );
    }

    #[test]
    fn explicit_config_is_loaded_once() {
        let tmp = TempDir::new().unwrap();
        let explicit = tmp.path().join("custom.toml");
        fs::write(&explicit, "[format]\nindent = \"4s\"\n").unwrap();
        let input = tmp.path().join("a.json");

        let provider = ConfigProvider::new();
        let first = provider.format_config_for(&input, Some(&explicit)).unwrap();
        fs::write(&explicit, "[format]\nindent = \"1t\"\n").unwrap();
        let second = provider.format_config_for(&input, Some(&explicit)).unwrap();
        assert_eq!(first.indent, "    ");
        assert_eq!(second, first);
    }

    #[test]
    fn relative_explicit_config_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let provider = ConfigProvider::new();
        let err = provider
            .resolve(&tmp.path().join("a.json"), Some(Path::new("custom.toml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotAbsolute { .. }));
    }

    #[test]
    fn unclean_directories_share_cache_entries() {
        let tmp = TempDir::new().unwrap();
        let config = write_config(tmp.path(), "");
        let nested = tmp.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();

        let provider = ConfigProvider::new();
        let messy = tmp.path().join("a/./b/../b");
        assert_eq!(provider.config_file_for_dir(&messy).unwrap(), Some(config.clone()));

        fs::remove_file(&config).unwrap();
        assert_eq!(provider.config_file_for_dir(&nested).unwrap(), Some(config));
    }

    #[test]
    fn loading_a_file_caches_its_directory() {
        let tmp = TempDir::new().unwrap();
        let config = write_config(tmp.path(), "");

        let provider = ConfigProvider::new();
        provider.load(&config).unwrap();

        fs::remove_file(&config).unwrap();
        assert_eq!(
            provider.config_file_for_dir(tmp.path()).unwrap(),
            Some(config)
        );
    }

    #[test]
    fn concurrent_directory_lookups_agree() {
        let tmp = TempDir::new().unwrap();
        let config = write_config(tmp.path(), "");
        let nested = tmp.path().join("x/y/z");
        fs::create_dir_all(&nested).unwrap();
        let provider = ConfigProvider::new();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let dir = if i % 2 == 0 {
                        nested.clone()
                    } else {
                        tmp.path().join("x")
                    };
                    let provider = &provider;
                    scope.spawn(move || provider.config_file_for_dir(&dir))
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap().unwrap(), Some(config.clone()));
            }
        });
    }

    #[test]
    fn normalize_resolves_dot_components() {
        assert_eq!(
            normalize(Path::new("/a/./b/../c/")),
            PathBuf::from("/a/c")
        );
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
    }

    #[test]
    fn relative_paths_are_rejected() {
        let provider = ConfigProvider::new();
        let err = provider
            .config_file_for_dir(Path::new("relative/dir"))
            .unwrap_err();
        assert_eq!(err.to_string(), "relative/dir is not an absolute path");
        assert!(matches!(
            provider.load(Path::new("protofmt.toml")),
            Err(ConfigError::NotAbsolute { .. })
        ));
    }

    #[test]
    fn concurrent_callers_see_the_same_config() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), "[format]\nindent = \"2t\"\n");
        let provider = ConfigProvider::new();
        let input = tmp.path().join("x.json");

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| provider.format_config_for(&input, None)))
                .collect();
            for handle in handles {
                let config = handle.join().unwrap().unwrap();
                assert_eq!(config.indent, "\t\t");
            }
        });
    }

    #[test]
    fn config_source_path() {
        let p = PathBuf::from("/tmp/protofmt.toml");
        assert_eq!(ConfigSource::Explicit(p.clone()).path(), Some(p.as_path()));
        assert_eq!(ConfigSource::Discovered(p.clone()).path(), Some(p.as_path()));
        assert!(ConfigSource::Default.path().is_none());
    }
}
