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

//! Handlers behind the `rhost` subcommands.

pub mod download;
pub mod exec;
pub mod list;
pub mod upload;

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::ssh::{Error, FileTransfer};
use crate::utils::format_bytes;

/// Print one line per finished transfer, then the failing one if any.
fn report_transfers(transfers: &[FileTransfer], result: crate::ssh::Result<Vec<u64>>) -> Result<()> {
    for (transfer, bytes) in transfers.iter().zip(completed_sizes(&result)) {
        eprintln!(
            "  {} {}{}",
            "✔".green(),
            transfer,
            format!(" ({})", format_bytes(*bytes)).dimmed()
        );
    }

    match result {
        Ok(_) => Ok(()),
        Err(err) => {
            if let Error::Batch { index, .. } = &err {
                if let Some(transfer) = transfers.get(*index) {
                    eprintln!("  {} {}", "✗".red(), transfer);
                }
                let skipped = transfers.len().saturating_sub(index + 1);
                if skipped > 0 {
                    eprintln!("  {} {} not attempted", "-".dimmed(), skipped);
                }
            }
            Err(err.into())
        }
    }
}

/// Byte counts of the transfers that finished, whether or not the batch did.
fn completed_sizes(result: &crate::ssh::Result<Vec<u64>>) -> &[u64] {
    match result {
        Ok(bytes) => bytes,
        Err(err) => err.transferred_bytes().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssh::Upload;
    use std::io;
    use std::path::PathBuf;

    fn batch_failure(index: usize, completed: Vec<u64>) -> Error {
        Error::Batch {
            index,
            total: 3,
            completed,
            source: Box::new(Error::LocalFile {
                host: "web1".to_string(),
                path: PathBuf::from("/srv/b.txt"),
                source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
            }),
        }
    }

    #[test]
    fn test_completed_sizes_on_success() {
        let result = Ok(vec![10, 20]);
        assert_eq!(completed_sizes(&result), &[10, 20]);
    }

    #[test]
    fn test_completed_sizes_survive_batch_failure() {
        let result = Err(batch_failure(2, vec![1024, 2048]));
        assert_eq!(completed_sizes(&result), &[1024, 2048]);
    }

    #[test]
    fn test_completed_sizes_empty_for_non_batch_failure() {
        let result = Err(Error::BlockingInRuntime);
        assert!(completed_sizes(&result).is_empty());
    }

    #[test]
    fn test_report_transfers_returns_batch_error() {
        let transfers: Vec<FileTransfer> = vec![
            Upload::new("/srv/a.txt", "/tmp").into(),
            Upload::new("/srv/b.txt", "/tmp").into(),
            Upload::new("/srv/c.txt", "/tmp").into(),
        ];

        let err = report_transfers(&transfers, Err(batch_failure(1, vec![5]))).unwrap_err();

        assert!(err.to_string().starts_with("transfer 2 of 3 failed"));
        assert!(report_transfers(&transfers, Ok(vec![1, 2, 3])).is_ok());
    }
}
