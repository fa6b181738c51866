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

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "rhost",
    version,
    about = "Run commands and copy files on a remote host over SSH",
    long_about = "rhost runs one command or one batch of file transfers per invocation against a single\nremote host, authenticating with a password. Every invocation opens its own SSH connection\nand closes it before exiting.",
    after_help = "EXAMPLES:\n  Run a command:              rhost -H admin@10.0.0.5 exec \"systemctl restart app\"\n  Print command output:       rhost -H web1 capture \"uname -r\"\n  Upload files to a dir:      rhost -H web1 upload app.tar.gz app.env --to /srv/app\n  Download files to a dir:    rhost -H web1 download /var/log/syslog --to ./logs\n  List inventory hosts:       rhost list"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'H',
        long = "host",
        global = true,
        help = "Target host: an inventory name or [user@]address[:port]"
    )]
    pub host: Option<String>,

    #[arg(
        short = 'c',
        long,
        global = true,
        help = "Configuration file path [default: $XDG_CONFIG_HOME/rhost/config.yaml]"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        env = "RHOST_PASSWORD",
        hide_env_values = true,
        help = "Password for hosts without password_env in the inventory"
    )]
    pub password: Option<String>,

    #[arg(
        long,
        global = true,
        help = "Accept any server host key (insecure, trusted networks only)"
    )]
    pub insecure_ignore_host_key: bool,

    #[arg(
        short = 'v',
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Run a command and report only success or failure",
        long_about = "Runs the command on the target host and waits for it to finish.\nOutput is discarded. Exit code is 0 only if the remote command exits with status 0."
    )]
    Exec {
        #[arg(trailing_var_arg = true, required = true)]
        command: Vec<String>,
    },

    #[command(
        about = "Run a command and print its stdout",
        long_about = "Runs the command on the target host and prints its stdout with leading and trailing\nnewlines removed. On failure the captured stdout and stderr are shown with the error."
    )]
    Capture {
        #[arg(trailing_var_arg = true, required = true)]
        command: Vec<String>,
    },

    #[command(
        about = "Upload local files into a remote directory",
        long_about = "Uploads each file over one SFTP session, in order. Each file keeps its base name.\nThe remote directory must already exist. Stops at the first failing file."
    )]
    Upload {
        #[arg(required = true, help = "Local files to upload")]
        files: Vec<PathBuf>,

        #[arg(long = "to", value_name = "REMOTE_DIR", help = "Existing remote directory")]
        remote_dir: String,
    },

    #[command(
        about = "Download remote files into a local directory",
        long_about = "Downloads each file over one SFTP session, in order. Each file keeps its base name.\nThe local directory must already exist. Stops at the first failing file."
    )]
    Download {
        #[arg(required = true, help = "Remote files to download")]
        files: Vec<String>,

        #[arg(long = "to", value_name = "LOCAL_DIR", help = "Existing local directory")]
        local_dir: PathBuf,
    },

    #[command(about = "List hosts defined in the configuration file")]
    List,
}

impl Cli {
    /// The command words of `exec`/`capture` joined into one command line.
    pub fn remote_command(&self) -> Option<String> {
        match &self.command {
            Commands::Exec { command } | Commands::Capture { command } => Some(command.join(" ")),
            _ => None,
        }
    }
}
