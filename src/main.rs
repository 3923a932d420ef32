use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::{error, info};

mod application;
mod domain;
mod infrastructure;

use application::messaging::{CompetingBot, MessageRouter};
use application::services::BotSession;
use domain::entities::BotIdentity;
use infrastructure::adapters::TwitchChatChannel;
use infrastructure::config::Config;

#[derive(Parser)]
#[command(name = "banterbot")]
#[command(about = "A single-channel Twitch chat bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "banterbot.json")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => run_bot(&cli.config).await,
        Commands::Version => {
            println!("banterbot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => init_config(&cli.config),
    }
}

async fn run_bot(config_path: &str) {
    let config = if std::path::Path::new(config_path).exists() {
        match Config::load(config_path) {
            Ok(config) => config,
            Err(e) => {
                error!("Config file could not be loaded: {}", e);
                return;
            }
        }
    } else {
        // First run: put a fillable template where the user expects it.
        match Config::template().save(config_path) {
            Ok(()) => info!("Created {}, fill it in and start again", config_path),
            Err(e) => error!("Could not create config file: {}", e),
        }
        return;
    };

    info!("Validating config file...");
    if config.validate().is_err() {
        error!("Config file invalid. Cannot continue");
        return;
    }

    info!(
        "Starting banterbot as {} on #{}",
        config.bot_username, config.channel
    );

    let competing = config
        .competing_bot
        .as_ref()
        .filter(|_| config.has_competing_bot())
        .map(|rival| {
            CompetingBot::new(
                &rival.username,
                &rival.command,
                rival.reaction_messages.clone(),
            )
        });

    let router = MessageRouter::new(
        &config.bot_username,
        &config.command,
        config.messages.clone(),
        &config.channel,
        competing,
    );

    let identity = BotIdentity::new(&config.bot_username, &config.oauth_token);
    let mut session = BotSession::new(TwitchChatChannel::new(), identity, &config.channel, router)
        .with_greeting(&config.greeting)
        .with_goodbye(&config.goodbye)
        .with_test_mode(config.test_mode);

    // Best-effort stop on Ctrl-C: the run loop drains, says goodbye and
    // disconnects before the process exits.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    if let Err(e) = session.run(shutdown_rx).await {
        error!("Bot terminated: {}", e);
    }
}

fn init_config(config_path: &str) {
    if std::path::Path::new(config_path).exists() {
        error!("{} already exists, not overwriting", config_path);
        return;
    }

    match Config::template().save(config_path) {
        Ok(()) => info!("Created {}", config_path),
        Err(e) => error!("Could not create config file: {}", e),
    }
}
