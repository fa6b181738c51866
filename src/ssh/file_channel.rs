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

//! SFTP file transfer operations.
//!
//! Uploads and downloads stream bytes between one local and one remote file.
//! The copy logic is written against [`RemoteFiles`] so it does not depend
//! on the SFTP backend; [`FileChannel`] is the SFTP implementation.
//!
//! Some sshd_config does not enable sftp by default. A config line like
//! `Subsystem sftp internal-sftp` or `Subsystem sftp /usr/lib/openssh/sftp-server`
//! is needed in the sshd_config on the remote machine.

use async_trait::async_trait;
use russh_sftp::client::fs::File;
use russh_sftp::client::SftpSession;
use std::path::Path;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use super::error::{BoxError, Error, Result};
use super::transfer::{local_target_path, remote_base_name, remote_target_path};
use super::transport::Transport;

/// Remote side of a file transfer.
#[async_trait]
pub trait RemoteFiles {
    type Reader: AsyncRead + Unpin + Send;
    type Writer: AsyncWrite + Unpin + Send;

    /// Host label used in error messages.
    fn host(&self) -> &str;

    /// Create or truncate `path` for writing. Parent directories are not created.
    async fn create(&self, path: &str) -> std::result::Result<Self::Writer, BoxError>;

    /// Open an existing `path` for reading.
    async fn open(&self, path: &str) -> std::result::Result<Self::Reader, BoxError>;
}

/// Copy `local_file` into `remote_dir`, keeping its base name.
///
/// Returns the number of bytes written to the remote file.
pub async fn upload<R>(remote: &R, local_file: &Path, remote_dir: &str) -> Result<u64>
where
    R: RemoteFiles + Sync,
{
    let local_error = |source| Error::LocalFile {
        host: remote.host().to_string(),
        path: local_file.to_path_buf(),
        source,
    };

    let mut local = tokio::fs::File::open(local_file)
        .await
        .map_err(local_error)?;
    let metadata = local.metadata().await.map_err(local_error)?;
    if !metadata.is_file() {
        return Err(local_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }

    let remote_path = remote_target_path(remote.host(), remote_dir, local_file)?;

    tracing::debug!(
        "Uploading {:?} to {}:{}",
        local_file,
        remote.host(),
        remote_path
    );

    let mut writer = remote
        .create(&remote_path)
        .await
        .map_err(|source| Error::RemoteFile {
            host: remote.host().to_string(),
            path: remote_path.clone(),
            source,
        })?;

    let transfer_error = |source| Error::Transfer {
        host: remote.host().to_string(),
        path: remote_path.clone(),
        source,
    };

    let bytes = tokio::io::copy(&mut local, &mut writer)
        .await
        .map_err(transfer_error)?;
    writer.flush().await.map_err(transfer_error)?;
    writer.shutdown().await.map_err(transfer_error)?;

    tracing::debug!("Uploaded {} bytes to {}:{}", bytes, remote.host(), remote_path);
    Ok(bytes)
}

/// Copy `remote_file` into `local_dir`, keeping its base name.
///
/// Returns the number of bytes written to the local file.
pub async fn download<R>(remote: &R, local_dir: &Path, remote_file: &str) -> Result<u64>
where
    R: RemoteFiles + Sync,
{
    let file_name = remote_base_name(remote_file).ok_or_else(|| Error::RemoteFile {
        host: remote.host().to_string(),
        path: remote_file.to_string(),
        source: "remote path has no file name".into(),
    })?;
    let local_path = local_target_path(local_dir, file_name);

    tracing::debug!(
        "Downloading {}:{} to {:?}",
        remote.host(),
        remote_file,
        local_path
    );

    let mut local = tokio::fs::File::create(&local_path)
        .await
        .map_err(|source| Error::LocalFile {
            host: remote.host().to_string(),
            path: local_path.clone(),
            source,
        })?;

    let mut reader = remote
        .open(remote_file)
        .await
        .map_err(|source| Error::RemoteFile {
            host: remote.host().to_string(),
            path: remote_file.to_string(),
            source,
        })?;

    let transfer_error = |source| Error::Transfer {
        host: remote.host().to_string(),
        path: local_path.display().to_string(),
        source,
    };

    let bytes = tokio::io::copy(&mut reader, &mut local)
        .await
        .map_err(transfer_error)?;
    local.flush().await.map_err(transfer_error)?;

    tracing::debug!("Downloaded {} bytes to {:?}", bytes, local_path);
    Ok(bytes)
}

/// An SFTP session on top of a [`Transport`].
pub struct FileChannel {
    sftp: SftpSession,
    host: String,
}

impl FileChannel {
    /// Start the `sftp` subsystem on a new session channel.
    pub async fn open(transport: &Transport) -> Result<Self> {
        let channel = transport.open_session().await?;
        let channel_error = |source: BoxError| Error::ChannelOpen {
            host: transport.host().to_string(),
            source,
        };

        channel
            .request_subsystem(true, "sftp")
            .await
            .map_err(|e| channel_error(Box::new(e)))?;
        let sftp = SftpSession::new(channel.into_stream())
            .await
            .map_err(|e| channel_error(Box::new(e)))?;

        Ok(Self {
            sftp,
            host: transport.host().to_string(),
        })
    }

    pub async fn upload(&self, local_file: &Path, remote_dir: &str) -> Result<u64> {
        upload(self, local_file, remote_dir).await
    }

    pub async fn download(&self, local_dir: &Path, remote_file: &str) -> Result<u64> {
        download(self, local_dir, remote_file).await
    }

    /// End the SFTP session. Failures are logged; the transport is closed next anyway.
    pub async fn close(self) {
        if let Err(e) = self.sftp.close().await {
            tracing::debug!("[{}] SFTP session close reported: {}", self.host, e);
        }
    }
}

#[async_trait]
impl RemoteFiles for FileChannel {
    type Reader = File;
    type Writer = File;

    fn host(&self) -> &str {
        &self.host
    }

    async fn create(&self, path: &str) -> std::result::Result<File, BoxError> {
        Ok(self.sftp.create(path).await?)
    }

    async fn open(&self, path: &str) -> std::result::Result<File, BoxError> {
        Ok(self.sftp.open(path).await?)
    }
}
