//! CLI for resq.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use resq_core::config;
use resq_core::{DecodeMode, Method, RequestOptions};

use commands::{run_completions, run_config, run_man, run_request};

/// Top-level CLI for resq.
#[derive(Debug, Parser)]
#[command(name = "resq")]
#[command(about = "resq: fetch a resource, retrying transient network failures", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Options shared by every request command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct RequestArgs {
    /// Retry transient failures (connection errors, no response).
    #[arg(long)]
    pub retry: bool,
    /// Retries allowed after the first attempt (needs --retry). Defaults to the config value.
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u32>,
    /// Print the body as-is instead of parsing it as JSON.
    #[arg(long)]
    pub raw: bool,
    /// Override the wait between attempts, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,
}

impl RequestArgs {
    pub fn to_options(&self, default_max_retries: u32) -> RequestOptions {
        RequestOptions {
            retry: self.retry,
            max_retries: self.max_retries.unwrap_or(default_max_retries),
            decode: if self.raw {
                DecodeMode::Raw
            } else {
                DecodeMode::Json
            },
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// GET a resource.
    Get {
        url: String,
        #[command(flatten)]
        args: RequestArgs,
    },

    /// POST a body to a resource.
    Post {
        url: String,
        /// Request body.
        #[arg(long, short = 'd', default_value = "")]
        data: String,
        #[command(flatten)]
        args: RequestArgs,
    },

    /// PUT a body to a resource.
    Put {
        url: String,
        /// Request body.
        #[arg(long, short = 'd', default_value = "")]
        data: String,
        #[command(flatten)]
        args: RequestArgs,
    },

    /// DELETE a resource.
    Delete {
        url: String,
        #[command(flatten)]
        args: RequestArgs,
    },

    /// Show the config file path and effective settings.
    Config,

    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the man page (roff).
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        cfg.apply_defaults();

        match cli.command {
            CliCommand::Get { url, args } => {
                run_request(&cfg, Method::Get, &url, None, &args).await?
            }
            CliCommand::Post { url, data, args } => {
                run_request(&cfg, Method::Post, &url, Some(data), &args).await?
            }
            CliCommand::Put { url, data, args } => {
                run_request(&cfg, Method::Put, &url, Some(data), &args).await?
            }
            CliCommand::Delete { url, args } => {
                run_request(&cfg, Method::Delete, &url, None, &args).await?
            }
            CliCommand::Config => run_config(&cfg)?,
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
