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

//! Collaborators used alongside remote hosts: a local shell runner, a
//! chat webhook notifier and a search query passthrough.

pub mod local;
pub mod search;
pub mod webhook;

use thiserror::Error;

pub use local::{run_local, LocalOutput};
pub use search::SearchClient;
pub use webhook::Webhook;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to start local command `{command}`: {source}")]
    LocalSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("local command `{command}` failed: {}", describe_status(.status))]
    LocalCommand {
        command: String,
        status: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("webhook signing key rejected")]
    SigningKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no search address configured")]
    NoSearchAddress,
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    /// A client that ignores proxy environment variables.
    pub(crate) fn direct_client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    #[test]
    fn test_local_command_error_message() {
        let err = super::ServiceError::LocalCommand {
            command: "false".to_string(),
            status: Some(1),
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "local command `false` failed: exit status 1");
    }
}
