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

//! Synchronous wrapper around [`super::RemoteHost`].
//!
//! Each call blocks the calling thread until the operation finishes. The
//! wrapper owns a current-thread runtime and must not be used from inside
//! another tokio runtime; such calls return [`Error::BlockingInRuntime`].
//! Dropping the wrapper is allowed anywhere, including inside a runtime.

use std::future::Future;
use tokio::runtime::{Builder, Runtime};

use super::error::{Error, Result};
use super::host_key::HostKeyPolicy;
use super::transfer::{Download, FileTransfer, Upload};
use crate::host::HostIdentity;

pub struct RemoteHost {
    inner: super::RemoteHost,
    // Always `Some` until drop.
    runtime: Option<Runtime>,
}

impl RemoteHost {
    pub fn new(identity: HostIdentity) -> Result<Self> {
        Self::from_async(super::RemoteHost::new(identity))
    }

    /// Wrap an already configured async facade.
    pub fn from_async(inner: super::RemoteHost) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Runtime)?;
        Ok(Self {
            inner,
            runtime: Some(runtime),
        })
    }

    pub fn with_host_key_policy(mut self, host_key: HostKeyPolicy) -> Self {
        self.inner = self.inner.clone().with_host_key_policy(host_key);
        self
    }

    pub fn identity(&self) -> &HostIdentity {
        self.inner.identity()
    }

    pub fn run_command(&self, command: &str) -> Result<()> {
        self.block_on(self.inner.run_command(command))
    }

    pub fn run_command_capture(&self, command: &str) -> Result<String> {
        self.block_on(self.inner.run_command_capture(command))
    }

    pub fn upload_files(&self, uploads: &[Upload]) -> Result<Vec<u64>> {
        self.block_on(self.inner.upload_files(uploads))
    }

    pub fn download_files(&self, downloads: &[Download]) -> Result<Vec<u64>> {
        self.block_on(self.inner.download_files(downloads))
    }

    pub fn transfer_files(&self, transfers: &[FileTransfer]) -> Result<Vec<u64>> {
        self.block_on(self.inner.transfer_files(transfers))
    }

    fn block_on<F, T>(&self, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(Error::BlockingInRuntime);
        }
        match &self.runtime {
            Some(runtime) => runtime.block_on(future),
            None => Err(Error::BlockingInRuntime),
        }
    }
}

impl Drop for RemoteHost {
    fn drop(&mut self) {
        // A plain drop blocks on shutdown, which panics inside another runtime.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

impl std::fmt::Debug for RemoteHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteHost")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}
