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

//! Configuration type definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Host inventory loaded from `config.yaml`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub hosts: BTreeMap<String, HostEntry>,
}

/// Settings applied to every host unless the host overrides them.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Defaults {
    pub user: Option<String>,
    pub port: Option<u16>,
    /// `yes`, `no`, or a path to a known_hosts file.
    #[serde(default, deserialize_with = "super::loader::deserialize_yaml_scalar")]
    pub host_key_checking: Option<String>,
}

/// One named host.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct HostEntry {
    pub address: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub user: Option<String>,
    /// Name of the environment variable holding the password.
    #[serde(default)]
    pub password_env: Option<String>,
    #[serde(default, deserialize_with = "super::loader::deserialize_yaml_scalar")]
    pub host_key_checking: Option<String>,
}
