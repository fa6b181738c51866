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
use std::path::Path;

use super::report_transfers;
use crate::ssh::{Download, FileTransfer, RemoteHost};

pub async fn download_files(host: &RemoteHost, files: &[String], local_dir: &Path) -> Result<()> {
    if !local_dir.is_dir() {
        anyhow::bail!("Local directory does not exist: {}", local_dir.display());
    }

    let transfers: Vec<FileTransfer> = files
        .iter()
        .map(|file| Download::new(file.as_str(), local_dir).into())
        .collect();

    eprintln!(
        "\n{} {} {} file(s) from {} to {}",
        "▶".cyan(),
        "Downloading".cyan().bold(),
        transfers.len().to_string().yellow(),
        host.identity().hostname().bold(),
        local_dir.display().to_string().green()
    );

    let result = host.transfer_files(&transfers).await;
    report_transfers(&transfers, result)
}
