//! pagesmith CLI - build, edit and export one-page sites.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

use config::ConfigFile;

#[derive(Parser)]
#[command(name = "pagesmith")]
#[command(about = "Build, edit and export one-page marketing sites")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to pagesmith.toml config file
    #[arg(short, long, default_value = "pagesmith.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default pagesmith.toml
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        yes: bool,
    },

    /// Run the content API server
    Serve {
        /// Port to listen on (defaults to config or 3001)
        #[arg(short, long)]
        port: Option<u16>,

        /// Data directory (defaults to config or "data")
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// Export the page as a single HTML file
    Export {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,

        /// Open the exported file in a browser
        #[arg(long)]
        open: bool,
    },

    /// Print the current page as JSON
    Show,

    /// Interactive editing session
    Edit,

    /// Store an API token and sign in
    Login {
        /// Bearer token issued by the content API
        token: String,
    },

    /// Forget the stored API token
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    if let Commands::Init { yes } = cli.command {
        return commands::init::run(&cli.config, yes).await;
    }

    let config = ConfigFile::load(&cli.config)?;

    match cli.command {
        Commands::Init { .. } => {}
        Commands::Serve { port, data } => {
            commands::serve::run(&config, port, data).await?;
        }
        Commands::Export {
            output,
            no_minify,
            open,
        } => {
            let minify = if no_minify { Some(false) } else { None };
            commands::export::run(&config, output, minify, open).await?;
        }
        Commands::Show => {
            commands::show::run(&config).await?;
        }
        Commands::Edit => {
            commands::edit::run(&config).await?;
        }
        Commands::Login { token } => {
            commands::login::sign_in(&config, token).await?;
        }
        Commands::Logout => {
            commands::login::sign_out(&config).await?;
        }
    }

    Ok(())
}
