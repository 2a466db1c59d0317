//! Configuration for Quill, read from `~/.quill/config.toml`.
//!
//! ```toml
//! [store]
//! path = "${HOME}/contracts/store.json"
//!
//! [signature]
//! timestamp_format = "%Y-%m-%d %H:%M"
//!
//! [demo]
//! seed = false
//! ```
//!
//! Every section is optional; a missing file means defaults throughout.

use std::path::{Path, PathBuf};
use std::{env, fs, io};

use quill_types::{InvalidTimestampFormat, TimestampFormat};
use serde::Deserialize;
use thiserror::Error;

const QUILL_DIR: &str = ".quill";
const CONFIG_FILE: &str = "config.toml";
const STORE_FILE: &str = "store.json";

const fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct QuillConfig {
    pub store: Option<StoreConfig>,
    pub signature: Option<SignatureConfig>,
    pub demo: Option<DemoConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StoreConfig {
    /// Location of the JSON store. `${VAR}` references are expanded.
    pub path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SignatureConfig {
    /// strftime pattern for the timestamp line of a signature.
    pub timestamp_format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DemoConfig {
    /// Seed the demo blueprint and contract into an empty store.
    #[serde(default = "default_true")]
    pub seed: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self { seed: true }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("config at {}: {source}", path.display())]
    TimestampFormat {
        path: PathBuf,
        source: InvalidTimestampFormat,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::TimestampFormat { path, .. } => path,
        }
    }
}

/// Replace `${VAR}` with the variable's value. Unset variables become empty.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

/// `~/.quill`, or `None` when no home directory can be determined.
#[must_use]
pub fn quill_home() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(QUILL_DIR))
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    quill_home().map(|dir| dir.join(CONFIG_FILE))
}

/// Store location used when the config does not name one.
#[must_use]
pub fn default_store_path() -> PathBuf {
    quill_home()
        .unwrap_or_else(|| PathBuf::from(QUILL_DIR))
        .join(STORE_FILE)
}

impl QuillConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    /// Parse the file at `path`. A missing file is `Ok(None)`.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {}: {source}", path.display());
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|source| {
            tracing::warn!("Failed to parse config at {}: {source}", path.display());
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;

        // Surface a bad pattern at load time rather than at the first signature.
        config
            .timestamp_format()
            .map_err(|source| ConfigError::TimestampFormat {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(Some(config))
    }

    /// Configured store path with `${VAR}` expanded, else [`default_store_path`].
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.store
            .as_ref()
            .and_then(|store| store.path.as_deref())
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map_or_else(default_store_path, |raw| PathBuf::from(expand_env_vars(raw)))
    }

    pub fn timestamp_format(&self) -> Result<TimestampFormat, InvalidTimestampFormat> {
        match self
            .signature
            .as_ref()
            .and_then(|sig| sig.timestamp_format.as_deref())
        {
            Some(pattern) => TimestampFormat::new(pattern),
            None => Ok(TimestampFormat::default()),
        }
    }

    #[must_use]
    pub fn seed_demo(&self) -> bool {
        self.demo.as_ref().is_none_or(|demo| demo.seed)
    }

    /// Record `store` as `[store].path` in the user config file.
    pub fn persist_store_path(store: &Path) -> io::Result<()> {
        let path = config_path().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "Could not determine config path")
        })?;
        persist_store_path_to(&path, store)
    }
}

/// Set `[store].path` in the config file at `config`, keeping its comments and
/// layout. Creates the file and its directory if needed.
pub fn persist_store_path_to(config: &Path, store: &Path) -> io::Result<()> {
    if let Some(parent) = config.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
        tighten_dir_permissions(parent)?;
    }

    let content = if config.exists() {
        fs::read_to_string(config)?
    } else {
        String::new()
    };

    let mut doc = content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    if !doc.contains_key("store") {
        doc["store"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["store"]["path"] = toml_edit::value(store.to_string_lossy().into_owned());

    quill_utils::atomic_write_with_options(
        config,
        doc.to_string().as_bytes(),
        quill_utils::WriteOptions {
            mode: Some(0o600),
            ..quill_utils::WriteOptions::default()
        },
    )?;
    tracing::info!(config = %config.display(), store = %store.display(), "Store path saved");
    Ok(())
}

/// Drop group/other access on a directory we own.
#[cfg(unix)]
fn tighten_dir_permissions(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::{MetadataExt, PermissionsExt};

    let metadata = fs::metadata(dir)?;
    // SAFETY: getuid has no preconditions and cannot fail.
    let our_uid = unsafe { libc::getuid() };
    if metadata.uid() == our_uid && metadata.permissions().mode() & 0o077 != 0 {
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn tighten_dir_permissions(_dir: &Path) -> io::Result<()> {
    Ok(())
}
