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

//! Error types for remote host sessions.
//!
//! Every variant carries the context needed to act on it (host, command or
//! path, underlying cause) as fields, so callers can match on them instead
//! of parsing messages.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use super::command::{CapturedOutput, ExitOutcome};

/// Boxed underlying cause for channel and remote file failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced by [`RemoteHost`](super::RemoteHost) operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Dialing or authenticating against the host failed.
    #[error("connect to {address} failed: {source}")]
    Connection {
        /// `address:port` that was dialed.
        address: String,
        #[source]
        source: ConnectFailure,
    },

    /// Opening a session or SFTP channel failed after a successful connection.
    #[error("[{host}]: open channel failed: {source}")]
    ChannelOpen {
        host: String,
        #[source]
        source: BoxError,
    },

    /// A remote command could not run or did not exit cleanly.
    #[error("[{host}]: run `{command}` failed: {failure}")]
    Command {
        host: String,
        command: String,
        failure: CommandFailure,
        /// Trimmed output captured before the failure. Empty in fire-and-forget mode.
        output: CapturedOutput,
    },

    /// A local filesystem operation failed while transferring to or from `host`.
    #[error("[{host}]: local file {} failed: {source}", .path.display())]
    LocalFile {
        host: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Creating or opening a remote file failed.
    #[error("[{host}]: remote file {path} failed: {source}")]
    RemoteFile {
        host: String,
        path: String,
        #[source]
        source: BoxError,
    },

    /// Copying bytes failed after both ends were open.
    #[error("[{host}]: transfer to {path} failed: {source}")]
    Transfer {
        host: String,
        /// Destination path of the interrupted copy.
        path: String,
        #[source]
        source: io::Error,
    },

    /// A batch stopped at the descriptor at `index` (zero-based).
    #[error("transfer {} of {total} failed: {source}", .index + 1)]
    Batch {
        index: usize,
        total: usize,
        /// Byte counts of the descriptors before `index`, in order.
        completed: Vec<u64>,
        #[source]
        source: Box<Error>,
    },

    /// The blocking facade was called from inside an async runtime.
    #[error("blocking host operation called from within an async runtime")]
    BlockingInRuntime,

    /// The blocking facade could not start its runtime.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] io::Error),
}

impl Error {
    /// Number of batch descriptors that completed before the failure.
    pub fn completed_transfers(&self) -> Option<usize> {
        match self {
            Error::Batch { completed, .. } => Some(completed.len()),
            _ => None,
        }
    }

    /// Byte counts of the batch descriptors that completed before the failure.
    pub fn transferred_bytes(&self) -> Option<&[u64]> {
        match self {
            Error::Batch { completed, .. } => Some(completed),
            _ => None,
        }
    }

    /// The innermost non-batch error.
    pub fn root(&self) -> &Error {
        match self {
            Error::Batch { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Why a dial did not produce an authenticated transport.
#[derive(Debug, Error)]
pub enum ConnectFailure {
    #[error("{0}")]
    Ssh(#[from] russh::Error),

    #[error("host key verification failed")]
    HostKeyRejected,

    #[error("password authentication rejected for user {0}")]
    PasswordRejected(String),
}

/// Why a remote command is considered failed.
#[derive(Debug, Error)]
pub enum CommandFailure {
    /// The exec request or the channel itself failed.
    #[error("{0}")]
    Ssh(#[from] russh::Error),

    /// The command ran but did not exit successfully.
    #[error("{0}")]
    Exit(ExitOutcome),
}

pub type Result<T> = std::result::Result<T, Error>;
