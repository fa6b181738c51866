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

//! Per-host facade: every operation dials, works and closes on its own.

use std::fmt;

use super::command::CommandChannel;
use super::error::Result;
use super::file_channel::FileChannel;
use super::host_key::HostKeyPolicy;
use super::transfer::{run_batch, Download, FileTransfer, Upload};
use super::transport::Transport;
use crate::host::HostIdentity;

/// Phases of a single facade operation, traced at debug level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Dialing,
    Connected,
    ChannelOpen,
    Executing,
    Closed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Dialing => "dialing",
            Phase::Connected => "connected",
            Phase::ChannelOpen => "channel open",
            Phase::Executing => "executing",
            Phase::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// A remote host reachable over SSH with password credentials.
///
/// Holds no connection. Each method opens a fresh [`Transport`], uses it
/// for exactly one command or one transfer batch, and closes it before
/// returning, including on failure. Clones are independent and may be
/// used from separate tasks.
#[derive(Debug, Clone)]
pub struct RemoteHost {
    identity: HostIdentity,
    host_key: HostKeyPolicy,
}

impl RemoteHost {
    /// Facade verifying host keys against `~/.ssh/known_hosts`.
    pub fn new(identity: HostIdentity) -> Self {
        Self {
            identity,
            host_key: HostKeyPolicy::default(),
        }
    }

    pub fn with_host_key_policy(mut self, host_key: HostKeyPolicy) -> Self {
        self.host_key = host_key;
        self
    }

    pub fn identity(&self) -> &HostIdentity {
        &self.identity
    }

    pub fn host_key_policy(&self) -> &HostKeyPolicy {
        &self.host_key
    }

    /// Run `command` and succeed only if it exits with status 0. Output is discarded.
    pub async fn run_command(&self, command: &str) -> Result<()> {
        self.execute(command, false).await.map(|_| ())
    }

    /// Run `command` and return its stdout with surrounding newlines removed.
    ///
    /// On failure the returned [`Error::Command`](super::Error::Command)
    /// carries the trimmed stdout and stderr.
    pub async fn run_command_capture(&self, command: &str) -> Result<String> {
        self.execute(command, true).await
    }

    /// Upload each file into its remote directory, in order, over one connection.
    pub async fn upload_files(&self, uploads: &[Upload]) -> Result<Vec<u64>> {
        let transfers: Vec<FileTransfer> = uploads.iter().cloned().map(Into::into).collect();
        self.transfer_files(&transfers).await
    }

    /// Download each remote file into its local directory, in order, over one connection.
    pub async fn download_files(&self, downloads: &[Download]) -> Result<Vec<u64>> {
        let transfers: Vec<FileTransfer> = downloads.iter().cloned().map(Into::into).collect();
        self.transfer_files(&transfers).await
    }

    /// Run a mixed batch of uploads and downloads over one SFTP session.
    ///
    /// Stops at the first failing descriptor; see
    /// [`Error::completed_transfers`](super::Error::completed_transfers).
    pub async fn transfer_files(&self, transfers: &[FileTransfer]) -> Result<Vec<u64>> {
        let mut transport = self.dial().await?;
        let result = Self::transfer_on(&transport, transfers).await;
        self.finish(&mut transport, result.is_ok()).await;
        result
    }

    async fn execute(&self, command: &str, capture: bool) -> Result<String> {
        let mut transport = self.dial().await?;
        let result = self.execute_on(&transport, command, capture).await;
        self.finish(&mut transport, result.is_ok()).await;
        result
    }

    async fn execute_on(&self, transport: &Transport, command: &str, capture: bool) -> Result<String> {
        let channel = CommandChannel::open(transport).await?;
        self.trace(Phase::ChannelOpen);

        self.trace(Phase::Executing);
        let output = channel.run(command).await?;
        let captured = output.into_result(transport.host(), command, capture)?;
        Ok(captured.stdout)
    }

    async fn transfer_on(transport: &Transport, transfers: &[FileTransfer]) -> Result<Vec<u64>> {
        let channel = FileChannel::open(transport).await?;
        tracing::debug!("[{}] {}", transport.host(), Phase::ChannelOpen);

        tracing::debug!("[{}] {}", transport.host(), Phase::Executing);
        let result = run_batch(&channel, transfers).await;
        channel.close().await;
        result
    }

    async fn dial(&self) -> Result<Transport> {
        self.trace(Phase::Dialing);
        let transport = Transport::dial(&self.identity, &self.host_key).await?;
        self.trace(Phase::Connected);
        Ok(transport)
    }

    async fn finish(&self, transport: &mut Transport, success: bool) {
        transport.close().await;
        let outcome = if success { "success" } else { "failure" };
        tracing::debug!("[{}] {} ({})", self.identity.hostname(), Phase::Closed, outcome);
    }

    fn trace(&self, phase: Phase) {
        tracing::debug!("[{}] {}", self.identity.hostname(), phase);
    }
}
