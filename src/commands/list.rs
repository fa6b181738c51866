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

use owo_colors::OwoColorize;

use crate::config::Config;
use crate::host::DEFAULT_SSH_PORT;

pub fn list_hosts(config: &Config) {
    if config.hosts.is_empty() {
        println!("{}", "No hosts configured".dimmed());
        return;
    }

    println!("\n{} {}\n", "▶".cyan(), "Configured hosts".bold());
    for (name, entry) in &config.hosts {
        let user = entry
            .user
            .as_deref()
            .or(config.defaults.user.as_deref())
            .unwrap_or("-");
        let port = entry
            .port
            .or(config.defaults.port)
            .unwrap_or(DEFAULT_SSH_PORT);
        println!(
            "  {} {} {}",
            "●".blue(),
            name.bold(),
            format!("{user}@{}:{port}", entry.address).dimmed()
        );
    }
    println!();
}
