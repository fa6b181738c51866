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

use tracing_subscriber::EnvFilter;

/// Build the log filter for a `-v` count. `RUST_LOG` always wins.
pub fn create_env_filter(verbosity: u8) -> EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(filter_directives(verbosity))
    }
}

fn filter_directives(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "rhost=warn",
        1 => "rhost=info",
        // -vv: connection and channel state transitions, plus russh handshake
        2 => "rhost=debug,russh=debug",
        _ => "rhost=trace,russh=trace,russh_sftp=debug",
    }
}

/// Install a stderr fmt subscriber. Stdout is left for command output.
pub fn init_logging(verbosity: u8) {
    let filter = create_env_filter(verbosity);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives_by_verbosity() {
        assert_eq!(filter_directives(0), "rhost=warn");
        assert_eq!(filter_directives(1), "rhost=info");
        assert!(filter_directives(2).contains("russh=debug"));
        assert_eq!(filter_directives(3), filter_directives(9));
    }

    #[test]
    fn test_create_env_filter() {
        for verbosity in 0..4 {
            let _ = create_env_filter(verbosity);
        }
    }
}
