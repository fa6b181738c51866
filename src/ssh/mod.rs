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

pub mod blocking;
pub mod command;
pub mod error;
pub mod file_channel;
pub mod host_key;
pub mod session;
#[cfg(test)]
pub(crate) mod test_server;
pub mod transfer;
pub mod transport;

pub use command::{CapturedOutput, CommandChannel, CommandOutput, ExitOutcome};
pub use error::{CommandFailure, ConnectFailure, Error, Result};
pub use file_channel::{FileChannel, RemoteFiles};
pub use host_key::HostKeyPolicy;
pub use session::RemoteHost;
pub use transfer::{Direction, Download, FileTransfer, Upload};
pub use transport::{Transport, TransportState};
