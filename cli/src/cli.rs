//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, OutputFlags, ProjectFlags};
use crate::commands;
use crate::infra::twitter::DEFAULT_API_URL;

/// Declarative Twitter filtered-stream collection
#[derive(Parser)]
#[command(
    name = "twitter-compose",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Compose file describing the streams
    #[arg(
        short = 'f',
        long = "file",
        global = true,
        env = "TWCOMPOSE_FILE",
        default_value = "twitter-compose.yml"
    )]
    pub file: PathBuf,

    /// Project name [default: name of the current directory]
    #[arg(short = 'p', long, global = true)]
    pub project_name: Option<String>,

    /// Credentials file holding the Twitter bearer token
    #[arg(
        short = 'c',
        long,
        global = true,
        env = "TWCOMPOSE_CREDENTIALS",
        default_value = "credentials.yml"
    )]
    pub credentials: PathBuf,

    /// Log filter for diagnostics on stderr (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,

    #[arg(long, hide = true, global = true, env = "TWCOMPOSE_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the parsed compose file
    Config,

    /// Update stream rules and start the collector
    Up(commands::up::UpArgs),

    /// Show active rules and collector state
    Status,

    /// Stop the collector
    Stop,

    /// Estimate the monthly tweet volume of rules
    Volume(commands::volume::VolumeArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            file,
            project_name,
            credentials,
            quiet,
            no_color,
            api_url,
            command,
            log_level: _,
        } = self;
        let app = AppContext::new(AppFlags {
            output: OutputFlags { no_color, quiet },
            project: ProjectFlags {
                file,
                project_name,
                credentials,
                api_url,
            },
        })?;

        match command {
            Command::Config => commands::config::run(&app),
            Command::Up(args) => commands::up::run(&app, &args).await,
            Command::Status => commands::status::run(&app).await,
            Command::Stop => commands::stop::run(&app).await,
            Command::Volume(args) => commands::volume::run(&app, &args).await,
        }
    }
}
