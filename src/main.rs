use clap::{Parser, Subcommand};
use std::sync::Arc;

mod domain;
mod application;
mod infrastructure;

use application::errors::BotError;
use application::messaging::{
    stat_check, ChatLineParser, CommandDispatcher, ExternalRelay, Outbox, ReplyPolicy,
    ThrottleRecoveryScheduler,
};
use domain::entities::Route;
use infrastructure::adapters::console::{ConsoleAdapter, ConsoleRelayEcho};
use infrastructure::config::Config;
use infrastructure::hypixel::StatsLookupClient;

#[derive(Parser)]
#[command(name = "statcheck-relay")]
#[command(about = "Chat relay that answers Bedwars stat checks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Hypixel API key (overrides config and environment)
    #[arg(short = 'k', long)]
    api_key: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read chat lines from stdin and answer commands
    Run,
    /// Look up one player and print the reply
    Check {
        username: String,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => load_config(&cli.config, cli.api_key).and_then(run_bot),
        Commands::Check { username } => {
            load_config(&cli.config, cli.api_key).and_then(|config| check_player(config, &username))
        }
        Commands::Version => {
            println!("statcheck-relay v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(&cli.config),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(path: &str, api_key: Option<String>) -> Result<Config, BotError> {
    let mut config = if std::path::Path::new(path).exists() {
        let mut config = Config::load(path)?;
        config.apply_env()?;
        config
    } else {
        tracing::info!("{} not found, using defaults", path);
        Config::load_env()?
    };

    if let Some(key) = api_key {
        config.lookup.api_key = Some(key);
    }

    config.validate()?;
    Ok(config)
}

fn runtime() -> Result<tokio::runtime::Runtime, BotError> {
    tokio::runtime::Runtime::new().map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))
}

fn run_bot(config: Config) -> Result<(), BotError> {
    tracing::info!(
        "Starting {}: scopes {:?}, command {}, replies {:?}",
        config.bot.name,
        config.chat.scope_prefixes,
        config.chat.command,
        config.reply.mode
    );

    let adapter = Arc::new(ConsoleAdapter::new(&config.bot.name));
    let outbox = Outbox::new(adapter.clone());
    let channel = Route::channel(&config.reply.channel_command);

    let parser = ChatLineParser::new(config.chat.scope_prefixes.clone(), &config.chat.command)
        .with_rejection_prefix(&config.chat.rejection_prefix);
    let lookup = Arc::new(StatsLookupClient::from_config(&config.lookup));
    let recovery = ThrottleRecoveryScheduler::new(outbox.clone(), config.recovery.plan(), channel.clone());

    let mut dispatcher = CommandDispatcher::new(parser, lookup, outbox.clone(), recovery, channel.clone())
        .with_policy(config.reply.mode)
        .with_direct_command(&config.reply.direct_command);
    if config.reply.mode == ReplyPolicy::RelayEcho {
        dispatcher = dispatcher.with_echo(Arc::new(ConsoleRelayEcho));
    }

    let relay = match (config.relay.enabled, &config.relay.channel_id) {
        (true, Some(channel_id)) => {
            tracing::info!("Relaying external channel {}", channel_id);
            Some(ExternalRelay::new(outbox, channel, channel_id))
        }
        _ => None,
    };

    runtime()?.block_on(adapter.run(&dispatcher, relay.as_ref()))
}

fn check_player(config: Config, username: &str) -> Result<(), BotError> {
    let client = StatsLookupClient::from_config(&config.lookup);

    match runtime()?.block_on(stat_check(&client, username)) {
        Some(reply) => {
            println!("{}", reply);
            Ok(())
        }
        None => Err(BotError::Internal(format!("No stats found for {}", username))),
    }
}

fn init_config(path: &str) -> Result<(), BotError> {
    if std::path::Path::new(path).exists() {
        return Err(BotError::Internal(format!("{} already exists", path)));
    }

    let yaml = Config::default().to_yaml()?;
    std::fs::write(path, yaml)?;
    println!("Wrote default config to {}", path);
    Ok(())
}
