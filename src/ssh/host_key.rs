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

//! Server host key verification.

use directories::BaseDirs;
use russh::keys::PublicKey;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How a transport decides whether to trust the server's host key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HostKeyPolicy {
    /// Verify against `~/.ssh/known_hosts`. Unknown or changed keys are rejected.
    #[default]
    KnownHosts,
    /// Verify against a specific known_hosts file.
    KnownHostsFile(PathBuf),
    /// Pin a base64 encoded public key (without type prefix or comment).
    PublicKey(String),
    /// Accept any host key. Only use on trusted networks.
    AcceptAny,
}

impl HostKeyPolicy {
    pub fn is_insecure(&self) -> bool {
        matches!(self, Self::AcceptAny)
    }

    /// Check `server_key` presented by `host:port` against this policy.
    ///
    /// Lookup failures (unreadable known_hosts, malformed pinned key) count
    /// as a rejection.
    pub fn verify(&self, host: &str, port: u16, server_key: &PublicKey) -> bool {
        match self {
            Self::AcceptAny => true,
            Self::KnownHosts => match default_known_hosts_path() {
                Some(path) => check_known_hosts_file(host, port, server_key, &path),
                None => {
                    tracing::warn!("Could not determine known_hosts path, rejecting host key");
                    false
                }
            },
            Self::KnownHostsFile(path) => check_known_hosts_file(host, port, server_key, path),
            Self::PublicKey(encoded) => match russh::keys::parse_public_key_base64(encoded) {
                Ok(pinned) => pinned == *server_key,
                Err(e) => {
                    tracing::warn!("Pinned host key is not valid base64 key data: {e}");
                    false
                }
            },
        }
    }
}

fn check_known_hosts_file(host: &str, port: u16, server_key: &PublicKey, path: &Path) -> bool {
    match russh::keys::check_known_hosts_path(host, port, server_key, path) {
        Ok(known) => {
            if !known {
                tracing::warn!("Host key for {host}:{port} not found in {path:?}");
            }
            known
        }
        Err(e) => {
            tracing::warn!("Host key check for {host}:{port} against {path:?} failed: {e}");
            false
        }
    }
}

/// Get the default known_hosts file path
pub fn default_known_hosts_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(".ssh").join("known_hosts"))
}

impl FromStr for HostKeyPolicy {
    type Err = std::convert::Infallible;

    /// `yes`/`strict` verify against the default known_hosts file,
    /// `no`/`insecure` accept any key, anything else is a known_hosts path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "yes" | "true" | "strict" => Self::KnownHosts,
            "no" | "false" | "insecure" => Self::AcceptAny,
            _ => Self::KnownHostsFile(PathBuf::from(s)),
        })
    }
}
