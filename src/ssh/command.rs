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

//! Single-use remote command execution.

use russh::client::Msg;
use russh::{Channel, ChannelMsg};
use std::fmt;

use super::error::{CommandFailure, Error, Result};
use super::transport::Transport;

// 8KB matches typical SSH channel window sizes; stderr is usually short.
const SSH_CMD_BUFFER_SIZE: usize = 8192;
const SSH_RESPONSE_BUFFER_SIZE: usize = 1024;

/// How a remote command ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    /// The unix exit status (`$?` in bash).
    Status(u32),
    /// Terminated by a signal.
    Signal(String),
    /// The channel closed without reporting an exit status.
    Unknown,
}

impl ExitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Status(0))
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "exit status {code}"),
            Self::Signal(signal) => write!(f, "killed by signal {signal}"),
            Self::Unknown => write!(f, "command did not report an exit status"),
        }
    }
}

/// Raw result of one remote command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit: ExitOutcome,
}

impl CommandOutput {
    /// Stdout and stderr as lossy UTF-8 with surrounding newlines removed.
    pub fn captured(&self) -> CapturedOutput {
        CapturedOutput {
            stdout: trim_newlines(&String::from_utf8_lossy(&self.stdout)).to_string(),
            stderr: trim_newlines(&String::from_utf8_lossy(&self.stderr)).to_string(),
        }
    }

    /// Turn a non-successful exit into [`Error::Command`].
    ///
    /// With `capture` set the error carries the trimmed output; otherwise
    /// the output is discarded.
    pub fn into_result(self, host: &str, command: &str, capture: bool) -> Result<CapturedOutput> {
        let output = if capture {
            self.captured()
        } else {
            CapturedOutput::default()
        };

        if self.exit.is_success() {
            Ok(output)
        } else {
            Err(Error::Command {
                host: host.to_string(),
                command: command.to_string(),
                failure: CommandFailure::Exit(self.exit),
                output,
            })
        }
    }
}

/// Trimmed stdout and stderr of a remote command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Strip leading and trailing `\n` characters and nothing else.
pub fn trim_newlines(s: &str) -> &str {
    s.trim_matches('\n')
}

/// A session channel that runs exactly one command.
///
/// [`run`](Self::run) consumes the channel, so a second command needs a
/// new channel.
pub struct CommandChannel {
    channel: Channel<Msg>,
    host: String,
}

impl CommandChannel {
    pub async fn open(transport: &Transport) -> Result<Self> {
        let channel = transport.open_session().await?;
        Ok(Self {
            channel,
            host: transport.host().to_string(),
        })
    }

    /// Execute `command` and wait for it to finish.
    ///
    /// There is no timeout: a command that never exits keeps this future
    /// pending until the transport fails. Wrap the call in
    /// `tokio::time::timeout` to bound it.
    ///
    /// Returns `Err` only when the command could not be run or the channel
    /// failed; a non-zero exit is reported through [`CommandOutput::exit`].
    pub async fn run(mut self, command: &str) -> Result<CommandOutput> {
        let mut stdout = Vec::with_capacity(SSH_CMD_BUFFER_SIZE);
        let mut stderr = Vec::with_capacity(SSH_RESPONSE_BUFFER_SIZE);

        self.channel
            .exec(true, command)
            .await
            .map_err(|e| Error::Command {
                host: self.host.clone(),
                command: command.to_string(),
                failure: CommandFailure::Ssh(e),
                output: CapturedOutput::default(),
            })?;

        let mut exit = ExitOutcome::Unknown;

        while let Some(msg) = self.channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
                ChannelMsg::ExtendedData { ref data, ext } => {
                    if ext == 1 {
                        stderr.extend_from_slice(data)
                    }
                }

                // The exit status may arrive before the remaining data, so
                // keep reading until the channel closes.
                ChannelMsg::ExitStatus { exit_status } => exit = ExitOutcome::Status(exit_status),
                ChannelMsg::ExitSignal { signal_name, .. } => {
                    exit = ExitOutcome::Signal(format!("{signal_name:?}"))
                }
                _ => {}
            }
        }

        tracing::debug!("[{}] `{}` finished: {}", self.host, command, exit);

        Ok(CommandOutput {
            stdout,
            stderr,
            exit,
        })
    }
}
