use anyhow::Result;
use clap::{Parser, Subcommand};
use readme_genie::logging::{self, LogFormat};
use std::path::PathBuf;

mod cmd;

#[derive(Parser)]
#[command(name = "readme-genie")]
#[command(
    version,
    about = "Generate READMEs and resume bullet points from GitHub repositories"
)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to ./genie.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Also write logs to <DIR>/readme-genie.log
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP service
    Serve {
        /// Interface to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to serve on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Permissive CORS for local front-end development
        #[arg(long)]
        dev: bool,
    },
    /// Generate output for one repository and print it
    Generate {
        /// Repository owner
        #[arg(short, long)]
        user: String,

        /// Repository name
        #[arg(short, long)]
        repo: String,

        /// README, B<count> for resume bullets, or a custom instruction
        #[arg(short = 't', long = "type", default_value = "README")]
        output_type: String,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Check the configuration for problems
    Validate,
    /// Write a default genie.toml
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_format, cli.log_dir.as_deref())?;

    let config_path = cli.config.as_deref();
    match &cli.command {
        Commands::Serve { host, port, dev } => {
            cmd::cmd_serve(config_path, host.clone(), *port, *dev).await?;
        }
        Commands::Generate {
            user,
            repo,
            output_type,
        } => {
            cmd::cmd_generate(config_path, user, repo, output_type).await?;
        }
        Commands::Config { command } => cmd::cmd_config(config_path, command.clone())?,
    }

    Ok(())
}
