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
use std::path::PathBuf;

use super::report_transfers;
use crate::ssh::{FileTransfer, RemoteHost, Upload};
use crate::utils::format_bytes;

pub async fn upload_files(host: &RemoteHost, files: &[PathBuf], remote_dir: &str) -> Result<()> {
    let uploads: Vec<Upload> = files
        .iter()
        .map(|file| Upload::new(file.clone(), remote_dir))
        .collect();

    eprintln!(
        "\n{} {} {} file(s) to {}:{}",
        "▶".cyan(),
        "Uploading".cyan().bold(),
        uploads.len().to_string().yellow(),
        host.identity().hostname().bold(),
        remote_dir.green()
    );
    for upload in &uploads {
        let size = std::fs::metadata(&upload.local_file)
            .map_or_else(|_| "unknown".to_string(), |m| format_bytes(m.len()));
        eprintln!("  {} {} ({})", "•".dimmed(), upload.local_file.display(), size.yellow());
    }

    let transfers: Vec<FileTransfer> = uploads.into_iter().map(Into::into).collect();
    let result = host.transfer_files(&transfers).await;
    report_transfers(&transfers, result)
}
