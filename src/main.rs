//! CLI entry point for polyblog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "polyblog")]
#[command(version)]
#[command(about = "A localized static blog generator with tag filtering and search", long_about = None)]
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
    /// Initialize a new polyblog site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Locale of the new post (defaults to the site default)
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,
    },

    /// Clean the public folder
    Clean,

    /// List site information
    List {
        /// Type of content to list (post, tag)
        #[arg(default_value = "post")]
        r#type: String,

        /// Restrict the listing to a locale
        #[arg(short, long)]
        locale: Option<String>,

        /// Filter posts by tag (unknown tags are ignored)
        #[arg(short, long)]
        tag: Option<String>,

        /// Free-text search over title, summary and tags
        #[arg(short, long)]
        search: Option<String>,

        /// 1-based page of the listing to print
        #[arg(short, long)]
        page: Option<usize>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "polyblog=debug,info"
    } else {
        "polyblog=info"
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
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing polyblog site in {:?}", target_dir);
            polyblog::commands::init::init_site(&target_dir)?;
            println!("Initialized empty polyblog site in {:?}", target_dir);
        }

        Commands::New { title, lang } => {
            let app = polyblog::Polyblog::new(&base_dir)?;
            tracing::info!("Creating new post: {}", title);
            app.new_post(&title, lang.as_deref())?;
        }

        Commands::Generate { watch } => {
            let app = polyblog::Polyblog::new(&base_dir)?;
            tracing::info!("Generating static files...");

            polyblog::commands::generate::run(&app)?;
            println!("Generated successfully!");

            if watch {
                tracing::info!("Watching for file changes...");
                polyblog::commands::generate::watch(&app).await?;
            }
        }

        Commands::Server {
            port,
            ip,
            r#static,
        } => {
            let app = polyblog::Polyblog::new(&base_dir)?;

            // Generate first
            tracing::info!("Generating static files...");
            app.generate()?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            polyblog::server::start(&app, &ip, port, !r#static).await?;
        }

        Commands::Clean => {
            let app = polyblog::Polyblog::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            app.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List {
            r#type,
            locale,
            tag,
            search,
            page,
        } => {
            let app = polyblog::Polyblog::new(&base_dir)?;
            let filters = polyblog::commands::list::ListFilters {
                locale: locale.as_deref(),
                tag: tag.as_deref(),
                search: search.as_deref(),
                page,
            };
            polyblog::commands::list::run(&app, &r#type, &filters)?;
        }

        Commands::Version => {
            println!("polyblog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
