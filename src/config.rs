use std::{
    env, fs, io,
    net::SocketAddr,
    path::{Path, PathBuf},
};

use serde::Deserialize;

/// Where to reach the comment backend.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Env {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a valid env document: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} is missing a value for `{field}`", .path.display())]
    Missing { path: PathBuf, field: &'static str },

    #[error("invalid listen address `{value}`: {source}")]
    Addr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

impl Env {
    /// Read and check the env document at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let env: Env = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;

        let missing = |field| ConfigError::Missing {
            path: path.to_owned(),
            field,
        };
        if env.base_url.trim().is_empty() {
            return Err(missing("baseUrl"));
        }
        if env.api_key.trim().is_empty() {
            return Err(missing("apiKey"));
        }

        Ok(env)
    }
}

/// Process settings taken from environment variables.
#[derive(Clone, Debug)]
pub struct Settings {
    pub env_file: PathBuf,
    pub storage_file: PathBuf,
    pub addr: SocketAddr,
}

#[cfg(debug_assertions)]
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[cfg(not(debug_assertions))]
const DEFAULT_ADDR: &str = "0.0.0.0:80";

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let var = |name: &str, default: &str| env::var(name).unwrap_or_else(|_| default.to_owned());

        let addr = var("CODENOTES_ADDR", DEFAULT_ADDR);
        let addr = addr
            .parse()
            .map_err(|source| ConfigError::Addr { value: addr, source })?;

        Ok(Settings {
            env_file: var("CODENOTES_ENV", "env.json").into(),
            storage_file: var("CODENOTES_STORAGE", "local-storage.json").into(),
            addr,
        })
    }
}
