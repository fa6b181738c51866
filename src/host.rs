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

//! Host identity: who to connect to and with which credentials.

use anyhow::{Context, Result};
use std::fmt;
use zeroize::Zeroizing;

pub const DEFAULT_SSH_PORT: u16 = 22;

/// Identity and password credential of one remote host.
///
/// The value is immutable once built. The password is zeroized when the
/// identity is dropped and is never rendered by `Debug` or `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct HostIdentity {
    hostname: String,
    address: String,
    port: u16,
    username: String,
    password: Zeroizing<String>,
}

impl HostIdentity {
    pub fn new(
        hostname: impl Into<String>,
        address: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            address: address.into(),
            port,
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    /// Parse a `[user@]address[:port]` target.
    ///
    /// IPv6 addresses are written bare (`::1`, always port 22) or in
    /// brackets (`[::1]`, `[::1]:2222`); brackets are stripped. The address
    /// doubles as the display hostname. A missing user falls back to
    /// `default_user`, then `$USER`/`$USERNAME`, then `root`.
    pub fn parse(target: &str, default_user: Option<&str>, password: &str) -> Result<Self> {
        let (user_part, host_part) = match target.split_once('@') {
            Some((user, rest)) => (Some(user), rest),
            None => (None, target),
        };

        let (address, port_str) = split_host_port(host_part)
            .with_context(|| format!("Malformed bracketed address in '{target}'"))?;
        let port = match port_str {
            Some(port) => port
                .parse::<u16>()
                .with_context(|| format!("Invalid port number in '{target}'"))?,
            None => DEFAULT_SSH_PORT,
        };

        if address.is_empty() {
            anyhow::bail!("Missing host address in '{target}'");
        }

        let username = user_part
            .filter(|u| !u.is_empty())
            .or(default_user)
            .map(str::to_string)
            .unwrap_or_else(current_username);

        Ok(Self::new(address, address, port, username, password))
    }

    /// Display label used in error messages and logs.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    /// `address:port`, the dial target. IPv6 addresses are bracketed.
    pub fn socket_label(&self) -> String {
        format!("{}:{}", bracketed(&self.address), self.port)
    }
}

/// Split `address[:port]` into the address and the unparsed port.
///
/// Returns `None` for a `[` without its closing `]`, or for anything but
/// `:port` after the `]`.
pub(crate) fn split_host_port(host_part: &str) -> Option<(&str, Option<&str>)> {
    if let Some(rest) = host_part.strip_prefix('[') {
        let (address, after) = rest.split_once(']')?;
        return match after {
            "" => Some((address, None)),
            _ => after.strip_prefix(':').map(|port| (address, Some(port))),
        };
    }

    match host_part.rsplit_once(':') {
        // Bare IPv6 literals contain colons but no port.
        Some((address, port)) if !address.contains(':') => Some((address, Some(port))),
        _ => Some((host_part, None)),
    }
}

fn bracketed(address: &str) -> std::borrow::Cow<'_, str> {
    if address.contains(':') {
        format!("[{address}]").into()
    } else {
        address.into()
    }
}

fn current_username() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "root".to_string())
}

impl fmt::Debug for HostIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostIdentity")
            .field("hostname", &self.hostname)
            .field("address", &self.address)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for HostIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.username, self.socket_label())
    }
}
