//! CLI entry point for novaworks

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "novaworks")]
#[command(author = "Nova Works")]
#[command(version)]
#[command(about = "Agency website backed by the Cosmic headless CMS", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Serve content from a JSON fixtures file instead of the CMS
        #[arg(short, long)]
        fixtures: Option<PathBuf>,

        /// Reload the fixtures file when it changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Export the site as static files
    #[command(alias = "g")]
    Generate {
        /// Read content from a JSON fixtures file instead of the CMS
        #[arg(short, long)]
        fixtures: Option<PathBuf>,
    },

    /// List CMS content
    List {
        /// Type of content to list (projects, posts, team, all)
        #[arg(default_value = "all")]
        r#type: String,

        /// Read content from a JSON fixtures file instead of the CMS
        #[arg(short, long)]
        fixtures: Option<PathBuf>,
    },

    /// Remove the exported site
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "novaworks=debug,tower_http=debug,info"
    } else {
        "novaworks=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Serve {
            port,
            ip,
            fixtures,
            watch,
        } => {
            let site = novaworks::Site::new(&base_dir)?;
            let backend = site.backend(fixtures.as_deref())?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            novaworks::server::start(&site, backend, &ip, port, watch).await?;
        }

        Commands::Generate { fixtures } => {
            let site = novaworks::Site::new(&base_dir)?;
            tracing::info!("Generating static files...");
            site.generate(fixtures.as_deref()).await?;
            println!("Generated successfully into {:?}", site.public_dir);
        }

        Commands::List { r#type, fixtures } => {
            let site = novaworks::Site::new(&base_dir)?;
            novaworks::commands::list::run(&site, &r#type, fixtures.as_deref()).await?;
        }

        Commands::Clean => {
            let site = novaworks::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("novaworks version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
