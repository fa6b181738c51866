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

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::ssh::{Error, RemoteHost};

/// Run `command` and report success or failure; output is discarded.
pub async fn execute_command(host: &RemoteHost, command: &str) -> Result<()> {
    host.run_command(command).await?;
    eprintln!(
        "{} {} {}",
        "✔".green(),
        host.identity().hostname().bold(),
        command.dimmed()
    );
    Ok(())
}

/// Run `command` and print its trimmed stdout.
///
/// On a failed command the captured stdout and stderr are echoed before the
/// error is returned.
pub async fn capture_command(host: &RemoteHost, command: &str) -> Result<()> {
    match host.run_command_capture(command).await {
        Ok(stdout) => {
            if !stdout.is_empty() {
                println!("{stdout}");
            }
            Ok(())
        }
        Err(err) => {
            if let Error::Command { output, .. } = &err {
                if !output.stdout.is_empty() {
                    println!("{}", output.stdout);
                }
                if !output.stderr.is_empty() {
                    eprintln!("{}", output.stderr.red());
                }
            }
            Err(err.into())
        }
    }
}
