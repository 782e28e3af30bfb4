use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod commands;
mod repl;

use app::App;

#[derive(Parser)]
#[command(name = "allki")]
#[command(about = "ALL-KI - AI personas that remember what you tell them", long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/allki/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Keep config and data below this directory instead of the platform locations
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    /// Owner of the profiles
    #[arg(long, global = true, default_value = "local")]
    user: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage profiles
    Profiles {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Inspect and edit what a profile remembers
    Memories {
        #[command(subcommand)]
        action: MemoryAction,
    },
    /// Chat with a profile
    Chat {
        /// Profile id
        profile: String,
        /// Continue an existing conversation
        #[arg(long)]
        conversation: Option<String>,
    },
    /// List conversations with a profile
    Conversations {
        /// Profile id
        profile: String,
    },
    /// Create a profile through a guided interview
    Interview,
    /// Show what would be learned from a message
    Analyze {
        /// Message text
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Show or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// List active profiles
    List,
    /// List built-in templates
    Templates,
    /// Create a profile from a template
    Create {
        /// Template category (developer, student, business, creative, personal, general)
        category: String,
    },
    /// Show a profile and its generated system prompt
    Show { id: String },
    /// Deactivate a profile
    Delete { id: String },
}

#[derive(Subcommand)]
enum MemoryAction {
    /// List active memories
    List { profile: String },
    /// One-line summary of goals, preferences, expertise and style
    Summary { profile: String },
    /// Remove a single memory
    Remove { profile: String, memory_id: String },
    /// Forget everything about a profile
    Clear { profile: String },
    /// List every recorded context, unfinished interviews included
    Contexts,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, paths) = app::resolve(cli.config.as_deref(), cli.home.as_deref())?;
    init_tracing(&config.logging.level);
    tracing::debug!(
        config = %paths.config_file().display(),
        data = %paths.data_dir().display(),
        model = %config.llm.model,
        "Resolved configuration"
    );
    let app = App::new(config, paths, cli.user);

    match cli.command {
        Commands::Profiles { action } => match action {
            ProfileAction::List => commands::profiles::list(&app).await?,
            ProfileAction::Templates => commands::profiles::templates(),
            ProfileAction::Create { category } => commands::profiles::create(&app, &category).await?,
            ProfileAction::Show { id } => commands::profiles::show(&app, &id).await?,
            ProfileAction::Delete { id } => commands::profiles::delete(&app, &id).await?,
        },
        Commands::Memories { action } => match action {
            MemoryAction::List { profile } => commands::memories::list(&app, &profile).await?,
            MemoryAction::Summary { profile } => commands::memories::summary(&app, &profile).await?,
            MemoryAction::Remove { profile, memory_id } => {
                commands::memories::remove(&app, &profile, &memory_id).await?
            }
            MemoryAction::Clear { profile } => commands::memories::clear(&app, &profile).await?,
            MemoryAction::Contexts => commands::memories::contexts(&app).await?,
        },
        Commands::Chat {
            profile,
            conversation,
        } => commands::chat::run(&app, &profile, conversation).await?,
        Commands::Conversations { profile } => commands::chat::list_conversations(&app, &profile).await?,
        Commands::Interview => commands::interview::run(&app).await?,
        Commands::Analyze { message } => commands::analyze::run(&message.join(" ")),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&app)?,
            ConfigAction::Init { force } => commands::config::init(&app, force)?,
        },
    }

    Ok(())
}
