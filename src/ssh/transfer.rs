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

//! Transfer descriptors, target path construction and batch execution.

use std::fmt;
use std::path::{Path, PathBuf};

use super::error::{Error, Result};
use super::file_channel::{download, upload, RemoteFiles};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Upload,
    Download,
}

/// Copy a local file into a remote directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub local_file: PathBuf,
    pub remote_dir: String,
}

/// Copy a remote file into a local directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub remote_file: String,
    pub local_dir: PathBuf,
}

impl Upload {
    pub fn new(local_file: impl Into<PathBuf>, remote_dir: impl Into<String>) -> Self {
        Self {
            local_file: local_file.into(),
            remote_dir: remote_dir.into(),
        }
    }
}

impl Download {
    pub fn new(remote_file: impl Into<String>, local_dir: impl Into<PathBuf>) -> Self {
        Self {
            remote_file: remote_file.into(),
            local_dir: local_dir.into(),
        }
    }
}

/// One entry of a transfer batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileTransfer {
    Upload(Upload),
    Download(Download),
}

impl FileTransfer {
    pub fn direction(&self) -> Direction {
        match self {
            Self::Upload(_) => Direction::Upload,
            Self::Download(_) => Direction::Download,
        }
    }

    /// The local file (upload) or local directory (download).
    pub fn local_path(&self) -> &Path {
        match self {
            Self::Upload(u) => &u.local_file,
            Self::Download(d) => &d.local_dir,
        }
    }

    /// The remote directory (upload) or remote file (download).
    pub fn remote_path(&self) -> &str {
        match self {
            Self::Upload(u) => &u.remote_dir,
            Self::Download(d) => &d.remote_file,
        }
    }
}

impl From<Upload> for FileTransfer {
    fn from(upload: Upload) -> Self {
        Self::Upload(upload)
    }
}

impl From<Download> for FileTransfer {
    fn from(download: Download) -> Self {
        Self::Download(download)
    }
}

impl fmt::Display for FileTransfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload(u) => write!(f, "{} -> {}", u.local_file.display(), u.remote_dir),
            Self::Download(d) => write!(f, "{} -> {}", d.remote_file, d.local_dir.display()),
        }
    }
}

/// Join a remote (POSIX) directory and a file name.
///
/// Trailing separators on `dir` do not change the result.
pub fn join_remote(dir: &str, name: &str) -> String {
    let trimmed = dir.trim_end_matches('/');
    if !trimmed.is_empty() {
        format!("{trimmed}/{name}")
    } else if dir.starts_with('/') {
        format!("/{name}")
    } else {
        name.to_string()
    }
}

/// `remote_dir` joined with the base name of `local_file`.
///
/// `host` only labels the error when `local_file` has no base name.
pub fn remote_target_path(host: &str, remote_dir: &str, local_file: &Path) -> Result<String> {
    let name = local_file.file_name().ok_or_else(|| Error::LocalFile {
        host: host.to_string(),
        path: local_file.to_path_buf(),
        source: std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "local path has no file name",
        ),
    })?;
    Ok(join_remote(remote_dir, &name.to_string_lossy()))
}

/// Base name of a remote (POSIX) path, ignoring trailing separators.
pub fn remote_base_name(remote_file: &str) -> Option<&str> {
    let name = remote_file.trim_end_matches('/').rsplit('/').next()?;
    match name {
        "" | "." | ".." => None,
        name => Some(name),
    }
}

/// `local_dir` joined with a remote file's base name.
pub fn local_target_path(local_dir: &Path, remote_name: &str) -> PathBuf {
    local_dir.join(remote_name)
}

/// Run `transfers` in order over one remote, stopping at the first failure.
///
/// Returns the byte count of each transfer. On failure the error is an
/// [`Error::Batch`] whose `index` is the failing descriptor; every earlier
/// descriptor completed, with its byte count kept in `completed`, and no
/// later one was attempted.
pub async fn run_batch<R>(remote: &R, transfers: &[FileTransfer]) -> Result<Vec<u64>>
where
    R: RemoteFiles + Sync,
{
    let total = transfers.len();
    let mut transferred = Vec::with_capacity(total);

    for (index, transfer) in transfers.iter().enumerate() {
        tracing::debug!("[{}] transfer {}/{}: {}", remote.host(), index + 1, total, transfer);

        let result = match transfer {
            FileTransfer::Upload(u) => upload(remote, &u.local_file, &u.remote_dir).await,
            FileTransfer::Download(d) => download(remote, &d.local_dir, &d.remote_file).await,
        };

        match result {
            Ok(bytes) => transferred.push(bytes),
            Err(source) => {
                return Err(Error::Batch {
                    index,
                    total,
                    completed: transferred,
                    source: Box::new(source),
                })
            }
        }
    }

    Ok(transferred)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssh::file_channel::tests::DirRemote;
    use tempfile::TempDir;

    #[test]
    fn test_remote_target_path_ignores_trailing_separator() {
        let local = Path::new("/home/user/a.txt");
        assert_eq!(remote_target_path("web1", "/tmp", local).unwrap(), "/tmp/a.txt");
        assert_eq!(remote_target_path("web1", "/tmp/", local).unwrap(), "/tmp/a.txt");
        assert_eq!(remote_target_path("web1", "/tmp//", local).unwrap(), "/tmp/a.txt");
    }

    #[test]
    fn test_join_remote_edge_cases() {
        assert_eq!(join_remote("/", "a.txt"), "/a.txt");
        assert_eq!(join_remote("", "a.txt"), "a.txt");
        assert_eq!(join_remote("upload", "a.txt"), "upload/a.txt");
    }

    #[test]
    fn test_remote_target_path_requires_file_name() {
        let err = remote_target_path("web1", "/tmp", Path::new("/")).unwrap_err();
        match err {
            Error::LocalFile { host, path, .. } => {
                assert_eq!(host, "web1");
                assert_eq!(path, Path::new("/"));
            }
            other => panic!("Expected local file error, got {other:?}"),
        }
    }

    #[test]
    fn test_remote_base_name() {
        assert_eq!(remote_base_name("/var/log/syslog"), Some("syslog"));
        assert_eq!(remote_base_name("/var/log/"), Some("log"));
        assert_eq!(remote_base_name("notes.txt"), Some("notes.txt"));
        assert_eq!(remote_base_name("/"), None);
        assert_eq!(remote_base_name("/tmp/.."), None);
    }

    #[test]
    fn test_local_target_path() {
        assert_eq!(
            local_target_path(Path::new("/data"), "syslog"),
            PathBuf::from("/data/syslog")
        );
    }

    #[test]
    fn test_descriptor_accessors() {
        let up: FileTransfer = Upload::new("/home/a.txt", "/tmp").into();
        assert_eq!(up.direction(), Direction::Upload);
        assert_eq!(up.local_path(), Path::new("/home/a.txt"));
        assert_eq!(up.remote_path(), "/tmp");
        assert_eq!(up.to_string(), "/home/a.txt -> /tmp");

        let down: FileTransfer = Download::new("/var/log/syslog", "/data").into();
        assert_eq!(down.direction(), Direction::Download);
        assert_eq!(down.local_path(), Path::new("/data"));
        assert_eq!(down.remote_path(), "/var/log/syslog");
    }

    #[tokio::test]
    async fn test_batch_halts_at_first_failure() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("remote/tmp")).unwrap();
        let remote = DirRemote::new(&temp.path().join("remote"));

        let first = temp.path().join("one.txt");
        let third = temp.path().join("three.txt");
        std::fs::write(&first, b"1").unwrap();
        std::fs::write(&third, b"333").unwrap();

        let batch: Vec<FileTransfer> = vec![
            Upload::new(&first, "/tmp").into(),
            Upload::new(temp.path().join("missing.txt"), "/tmp").into(),
            Upload::new(&third, "/tmp").into(),
        ];

        let err = run_batch(&remote, &batch).await.unwrap_err();

        match &err {
            Error::Batch {
                index,
                total,
                completed,
                source,
            } => {
                assert_eq!(*index, 1);
                assert_eq!(*total, 3);
                assert_eq!(completed, &vec![1]);
                match &**source {
                    Error::LocalFile { host, .. } => assert_eq!(host, "testhost"),
                    other => panic!("Expected local file error, got {other:?}"),
                }
            }
            other => panic!("Expected batch error, got {other:?}"),
        }
        assert_eq!(err.completed_transfers(), Some(1));
        assert_eq!(*remote.created.lock().unwrap(), vec!["/tmp/one.txt"]);
        assert!(temp.path().join("remote/tmp/one.txt").exists());
        assert!(!temp.path().join("remote/tmp/three.txt").exists());
    }

    #[tokio::test]
    async fn test_batch_runs_mixed_directions_in_order() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("remote/srv")).unwrap();
        std::fs::create_dir_all(temp.path().join("out")).unwrap();
        let remote = DirRemote::new(&temp.path().join("remote"));

        let local = temp.path().join("config.yaml");
        std::fs::write(&local, b"key: value\n").unwrap();

        let batch: Vec<FileTransfer> = vec![
            Upload::new(&local, "/srv").into(),
            Download::new("/srv/config.yaml", temp.path().join("out")).into(),
        ];

        let bytes = run_batch(&remote, &batch).await.unwrap();

        assert_eq!(bytes, vec![11, 11]);
        assert_eq!(
            std::fs::read(temp.path().join("out/config.yaml")).unwrap(),
            b"key: value\n"
        );
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let temp = TempDir::new().unwrap();
        let remote = DirRemote::new(temp.path());
        assert!(run_batch(&remote, &[]).await.unwrap().is_empty());
    }
}
