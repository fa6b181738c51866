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

//! Target resolution against the inventory.

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

use super::loader::expand_tilde;
use super::types::{Config, HostEntry};
use crate::host::{split_host_port, HostIdentity, DEFAULT_SSH_PORT};
use crate::ssh::HostKeyPolicy;

/// Environment variable consulted when no other password source applies.
pub const PASSWORD_ENV: &str = "RHOST_PASSWORD";

impl Config {
    pub fn get_host(&self, name: &str) -> Option<&HostEntry> {
        self.hosts.get(name)
    }

    /// Resolve `target` to a host identity.
    ///
    /// `target` is an inventory name, or else `[user@]address[:port]`.
    /// The password comes from the entry's `password_env`, then
    /// `password`, then `RHOST_PASSWORD`.
    pub fn resolve(&self, target: &str, password: Option<&str>) -> Result<HostIdentity> {
        match self.get_host(target) {
            Some(entry) => self.resolve_entry(target, entry, password),
            None => self.resolve_adhoc(target, password),
        }
    }

    fn resolve_entry(
        &self,
        name: &str,
        entry: &HostEntry,
        password: Option<&str>,
    ) -> Result<HostIdentity> {
        // Reuse target parsing for the default user fallback.
        let parsed = HostIdentity::parse(
            &entry.address,
            entry.user.as_deref().or(self.defaults.user.as_deref()),
            "",
        )
        .with_context(|| format!("Invalid address for host '{name}'"))?;
        let port = entry
            .port
            .or_else(|| has_explicit_port(&entry.address).then_some(parsed.port()))
            .or(self.defaults.port)
            .unwrap_or(DEFAULT_SSH_PORT);

        let password = match &entry.password_env {
            Some(var) => env::var(var).with_context(|| {
                format!("Host '{name}' reads its password from ${var}, which is not set")
            })?,
            None => fallback_password(name, password)?,
        };

        Ok(HostIdentity::new(
            name,
            parsed.address(),
            port,
            parsed.username(),
            password,
        ))
    }

    fn resolve_adhoc(&self, target: &str, password: Option<&str>) -> Result<HostIdentity> {
        let password = fallback_password(target, password)?;
        let parsed = HostIdentity::parse(target, self.defaults.user.as_deref(), &password)?;

        if has_explicit_port(target) {
            return Ok(parsed);
        }
        let port = self.defaults.port.unwrap_or(DEFAULT_SSH_PORT);
        Ok(HostIdentity::new(
            parsed.hostname(),
            parsed.address(),
            port,
            parsed.username(),
            password,
        ))
    }

    /// Host key policy for `target`: host entry, then defaults, then verify.
    pub fn host_key_policy(&self, target: &str) -> HostKeyPolicy {
        let setting = self
            .get_host(target)
            .and_then(|entry| entry.host_key_checking.as_deref())
            .or(self.defaults.host_key_checking.as_deref());

        match setting {
            None => HostKeyPolicy::default(),
            Some(value) => match HostKeyPolicy::from_str(value) {
                Ok(HostKeyPolicy::KnownHostsFile(path)) => {
                    HostKeyPolicy::KnownHostsFile(expand_tilde(&path))
                }
                Ok(policy) => policy,
                Err(never) => match never {},
            },
        }
    }
}

fn fallback_password(target: &str, password: Option<&str>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password.to_string());
    }
    env::var(PASSWORD_ENV).with_context(|| {
        format!("No password for '{target}'. Pass --password or set ${PASSWORD_ENV}")
    })
}

fn has_explicit_port(target: &str) -> bool {
    let host_part = target.split_once('@').map_or(target, |(_, host)| host);
    matches!(split_host_port(host_part), Some((_, Some(_))))
}
