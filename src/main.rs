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

use anyhow::{Context, Result};
use clap::Parser;

use rhost::{
    cli::{Cli, Commands},
    commands::{
        download::download_files,
        exec::{capture_command, execute_command},
        list::list_hosts,
        upload::upload_files,
    },
    config::Config,
    ssh::{HostKeyPolicy, RemoteHost},
    utils::init_logging,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if let Some(path) = &cli.config {
        let expanded = rhost::config::expand_tilde(path);
        if !expanded.exists() {
            anyhow::bail!("Config file not found: {}", expanded.display());
        }
    }
    let config = Config::load_or_default(cli.config.as_deref()).await?;

    if let Commands::List = cli.command {
        list_hosts(&config);
        return Ok(());
    }

    let target = cli
        .host
        .as_deref()
        .context("No target host. Pass -H <name|[user@]address[:port]>")?;
    let identity = config
        .resolve(target, cli.password.as_deref())
        .with_context(|| format!("Failed to resolve host '{target}'"))?;
    let host_key = if cli.insecure_ignore_host_key {
        HostKeyPolicy::AcceptAny
    } else {
        config.host_key_policy(target)
    };

    tracing::debug!("Target {} with host key policy {:?}", identity, host_key);
    let host = RemoteHost::new(identity).with_host_key_policy(host_key);

    match &cli.command {
        Commands::Exec { .. } => {
            let command = cli.remote_command().unwrap_or_default();
            execute_command(&host, &command).await
        }
        Commands::Capture { .. } => {
            let command = cli.remote_command().unwrap_or_default();
            capture_command(&host, &command).await
        }
        Commands::Upload { files, remote_dir } => upload_files(&host, files, remote_dir).await,
        Commands::Download { files, local_dir } => download_files(&host, files, local_dir).await,
        Commands::List => Ok(()),
    }
}
