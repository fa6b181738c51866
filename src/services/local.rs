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

//! Local shell command runner.

use tokio::process::Command;

use super::ServiceError;
use crate::ssh::command::trim_newlines;

const SHELL: &str = "bash";

/// Output of a local command, with surrounding newlines removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code; `None` when the process was killed by a signal.
    pub status: Option<i32>,
}

/// Run `command` with `bash -c` and wait for it.
///
/// A non-zero exit is returned as [`ServiceError::LocalCommand`] carrying
/// the trimmed stdout and stderr.
pub async fn run_local(command: &str) -> Result<LocalOutput, ServiceError> {
    tracing::debug!("Running local command: {}", command);

    let output = Command::new(SHELL)
        .arg("-c")
        .arg(command)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|source| ServiceError::LocalSpawn {
            command: command.to_string(),
            source,
        })?;

    let stdout = trim_newlines(&String::from_utf8_lossy(&output.stdout)).to_string();
    let stderr = trim_newlines(&String::from_utf8_lossy(&output.stderr)).to_string();
    let status = output.status.code();

    if !output.status.success() {
        return Err(ServiceError::LocalCommand {
            command: command.to_string(),
            status,
            stdout,
            stderr,
        });
    }

    Ok(LocalOutput {
        stdout,
        stderr,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_local_trims_output() {
        let output = run_local("printf '\\nhello\\n\\n'; echo oops >&2")
            .await
            .unwrap();
        assert_eq!(output.stdout, "hello");
        assert_eq!(output.stderr, "oops");
        assert_eq!(output.status, Some(0));
    }

    #[tokio::test]
    async fn test_run_local_keeps_inner_whitespace() {
        let output = run_local("printf '  a\\n b  \\n'").await.unwrap();
        assert_eq!(output.stdout, "  a\n b  ");
    }

    #[tokio::test]
    async fn test_run_local_failure_carries_output() {
        let err = run_local("echo partial; echo broken >&2; exit 3")
            .await
            .unwrap_err();

        match err {
            ServiceError::LocalCommand {
                status,
                stdout,
                stderr,
                ..
            } => {
                assert_eq!(status, Some(3));
                assert_eq!(stdout, "partial");
                assert_eq!(stderr, "broken");
            }
            other => panic!("Expected local command error, got {other:?}"),
        }
    }
}
