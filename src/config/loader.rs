// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Configuration loading.

use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::types::Config;

impl Config {
    /// Load the inventory at `path`. A missing file yields an empty inventory.
    pub async fn load(path: &Path) -> Result<Self> {
        let expanded_path = expand_tilde(path);

        if !expanded_path.exists() {
            tracing::debug!(
                "Config file not found at {:?}, using defaults",
                expanded_path
            );
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&expanded_path)
            .await
            .with_context(|| {
                format!(
                    "Failed to read configuration file at {}",
                    expanded_path.display()
                )
            })?;

        Self::from_yaml(&content).with_context(|| {
            format!(
                "Failed to parse YAML configuration file at {}",
                expanded_path.display()
            )
        })
    }

    /// Load from `path` when given, otherwise from [`Config::default_path`].
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path).await,
            None => match Self::default_path() {
                Some(path) => Self::load(&path).await,
                None => Ok(Self::default()),
            },
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// `$XDG_CONFIG_HOME/rhost/config.yaml`, or the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME") {
            if !xdg_config_home.is_empty() {
                return Some(PathBuf::from(xdg_config_home).join("rhost").join("config.yaml"));
            }
        }
        ProjectDirs::from("", "", "rhost").map(|dirs| dirs.config_dir().join("config.yaml"))
    }
}

/// Expand a leading `~/` to the home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match BaseDirs::new() {
            Some(dirs) => dirs.home_dir().join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Accept a YAML string or boolean (`true`/`false`) as a string setting.
pub(super) fn deserialize_yaml_scalar<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_yaml::Value>::deserialize(deserializer)? {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::Bool(true)) => Ok(Some("yes".to_string())),
        Some(serde_yaml::Value::Bool(false)) => Ok(Some("no".to_string())),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(D::Error::custom(format!(
            "expected yes, no or a known_hosts path, found {other:?}"
        ))),
    }
}
