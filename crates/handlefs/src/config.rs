// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Store configuration
//!
//! Read from the environment for the process-wide store, or from YAML:
//!
//! ```yaml
//! backend: host
//! root: /var/lib/app/store
//! quota_bytes: 1073741824
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const BACKEND_ENV: &str = "HANDLEFS_BACKEND";
pub const ROOT_ENV: &str = "HANDLEFS_ROOT";
pub const QUOTA_ENV: &str = "HANDLEFS_QUOTA";

/// Which backing store a [`crate::Store`] is built on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Memory,
    Host,
}

impl std::str::FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "host" => Ok(BackendKind::Host),
            other => Err(Error::Config(format!("unknown backend '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: BackendKind,
    /// Host directory for the host backend
    pub root: Option<PathBuf>,
    pub quota_bytes: Option<u64>,
}

impl StoreConfig {
    /// Build a config from `HANDLEFS_BACKEND`, `HANDLEFS_ROOT` and `HANDLEFS_QUOTA`.
    ///
    /// Setting only `HANDLEFS_ROOT` selects the host backend.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`StoreConfig::from_env`] with an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let root = lookup(ROOT_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let backend = match lookup(BACKEND_ENV) {
            Some(value) => value.parse()?,
            None if root.is_some() => BackendKind::Host,
            None => BackendKind::Memory,
        };
        let quota_bytes = lookup(QUOTA_ENV)
            .map(|value| {
                value.trim().parse::<u64>().map_err(|e| {
                    Error::Config(format!("{QUOTA_ENV} must be a byte count: {e}"))
                })
            })
            .transpose()?;

        let config = Self {
            backend,
            root,
            quota_bytes,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml_ng::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend == BackendKind::Host && self.root.is_none() {
            return Err(Error::Config(format!(
                "the host backend needs a root directory ({ROOT_ENV})"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_to_memory() {
        let config = StoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.backend, BackendKind::Memory);
    }

    #[test]
    fn test_root_implies_host() {
        let config = StoreConfig::from_lookup(lookup(&[
            (ROOT_ENV, "/tmp/store"),
            (QUOTA_ENV, "4096"),
        ]))
        .unwrap();
        assert_eq!(config.backend, BackendKind::Host);
        assert_eq!(config.root, Some(PathBuf::from("/tmp/store")));
        assert_eq!(config.quota_bytes, Some(4096));
    }

    #[test]
    fn test_invalid_values() {
        let err = StoreConfig::from_lookup(lookup(&[(BACKEND_ENV, "s3")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = StoreConfig::from_lookup(lookup(&[(QUOTA_ENV, "lots")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = StoreConfig::from_lookup(lookup(&[(BACKEND_ENV, "host")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_yaml() {
        let config = StoreConfig::from_yaml_str("backend: host\nroot: /data\n").unwrap();
        assert_eq!(config.backend, BackendKind::Host);
        assert_eq!(config.quota_bytes, None);

        let config = StoreConfig::from_yaml_str("quota_bytes: 10\n").unwrap();
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.quota_bytes, Some(10));

        assert!(StoreConfig::from_yaml_str("backend: tape\n").is_err());
    }
}
