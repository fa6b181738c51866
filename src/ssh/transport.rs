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

//! SSH transport establishment and teardown.
//!
//! A [`Transport`] is one authenticated connection to one host. It is dialed
//! fresh for every facade operation and closed when that operation ends.

use russh::client::{Config, Handle, Handler, Msg};
use russh::Channel;
use std::fmt::Debug;
use std::sync::Arc;

use super::error::{ConnectFailure, Error, Result};
use super::host_key::HostKeyPolicy;
use crate::host::HostIdentity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Open,
    Closed,
}

/// An authenticated SSH connection to a remote host.
pub struct Transport {
    handle: Handle<ClientHandler>,
    host: String,
    address: String,
    state: TransportState,
}

impl Transport {
    /// Dial and authenticate with password credentials.
    ///
    /// Every call opens a new TCP connection and performs a full handshake;
    /// nothing is cached between calls. Any failure, including a rejected
    /// host key or password, is reported as [`Error::Connection`] naming the
    /// dialed `address:port`.
    pub async fn dial(identity: &HostIdentity, host_key: &HostKeyPolicy) -> Result<Self> {
        let address = identity.socket_label();
        let connection_error = |source: ConnectFailure| Error::Connection {
            address: address.clone(),
            source,
        };

        if host_key.is_insecure() {
            tracing::warn!(
                "Host key verification disabled for {}; the server identity is not checked",
                address
            );
        }

        tracing::debug!("Dialing {} ({})", address, identity.hostname());

        let handler = ClientHandler {
            host: identity.address().to_string(),
            port: identity.port(),
            host_key: host_key.clone(),
        };
        let config = Arc::new(Config::default());

        let mut handle = russh::client::connect(
            config,
            (identity.address(), identity.port()),
            handler,
        )
        .await
        .map_err(|e| match e {
            russh::Error::UnknownKey => connection_error(ConnectFailure::HostKeyRejected),
            other => connection_error(ConnectFailure::Ssh(other)),
        })?;

        let auth = handle
            .authenticate_password(identity.username(), identity.password())
            .await
            .map_err(|e| connection_error(ConnectFailure::Ssh(e)))?;
        if !auth.success() {
            return Err(connection_error(ConnectFailure::PasswordRejected(
                identity.username().to_string(),
            )));
        }

        tracing::debug!("Connected and authenticated to {}", address);

        Ok(Self {
            handle,
            host: identity.hostname().to_string(),
            address,
            state: TransportState::Open,
        })
    }

    /// Display label of the connected host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// `address:port` this transport was dialed at.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn state(&self) -> TransportState {
        if self.state == TransportState::Open && self.handle.is_closed() {
            TransportState::Closed
        } else {
            self.state
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == TransportState::Open
    }

    /// Open a session channel. Fails with [`Error::ChannelOpen`] once closed.
    pub(crate) async fn open_session(&self) -> Result<Channel<Msg>> {
        if !self.is_open() {
            return Err(Error::ChannelOpen {
                host: self.host.clone(),
                source: "transport is closed".into(),
            });
        }

        self.handle
            .channel_open_session()
            .await
            .map_err(|e| Error::ChannelOpen {
                host: self.host.clone(),
                source: Box::new(e),
            })
    }

    /// Disconnect from the remote host.
    ///
    /// Idempotent. Disconnect failures are logged, not returned: the
    /// connection is unusable afterwards either way.
    pub async fn close(&mut self) {
        if self.state == TransportState::Closed {
            return;
        }
        self.state = TransportState::Closed;

        if let Err(e) = self
            .handle
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await
        {
            tracing::debug!("Disconnect from {} reported: {}", self.address, e);
        }
        tracing::debug!("Closed transport to {}", self.address);
    }
}

impl Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("host", &self.host)
            .field("address", &self.address)
            .field("state", &self.state)
            .field("handle", &"Handle<ClientHandler>")
            .finish()
    }
}

/// SSH client handler for managing server key verification.
#[derive(Debug, Clone)]
pub struct ClientHandler {
    host: String,
    port: u16,
    host_key: HostKeyPolicy,
}

impl Handler for ClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &russh::keys::PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        Ok(self
            .host_key
            .verify(&self.host, self.port, server_public_key))
    }
}
