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

//! Remote host sessions over SSH.
//!
//! [`RemoteHost`] runs one command or one batch of SFTP transfers per call
//! against a single host, authenticating with a password. Each call opens
//! its own connection and closes it before returning. A synchronous
//! variant lives in [`ssh::blocking`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod host;
pub mod services;
pub mod ssh;
pub mod utils;

pub use config::Config;
pub use host::HostIdentity;
pub use ssh::{Error, HostKeyPolicy, RemoteHost, Result};
