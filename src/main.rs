use anyhow::Context;
use clap::Parser;
use colored::*;
use playgate::config::Config;

mod cli;
mod commands;

use cli::{Cli, Commands, CommandsAction, ConfigAction};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "[ERROR]".red().bold(), e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    if let Some(concurrency) = cli.concurrency {
        config.probe_concurrency = concurrency;
    }
    if let Some(timeout) = cli.probe_timeout {
        config.probe_timeout_secs = timeout;
    }

    if cli.debug {
        eprintln!("{} {:?}", "DEBUG:".yellow(), cli);
    }

    let code = match cli.command {
        Commands::Run {
            inventory,
            playbook,
            extra_args,
        } => commands::run::run_playbook(&config, inventory, playbook, extra_args).await?,
        Commands::Exec {
            inventory,
            saved,
            argv,
        } => commands::run::exec_command(&config, inventory, saved, argv).await?,
        Commands::Inventories => {
            commands::inventories::list(&config)?;
            0
        }
        Commands::Commands { action } => {
            match action {
                CommandsAction::List => commands::saved::list(&config)?,
                CommandsAction::Add { command } => commands::saved::add(&config, &command)?,
            }
            0
        }
        Commands::History { limit, json } => {
            commands::history::show(&config, limit, json)?;
            0
        }
        Commands::Sync => {
            commands::sync::sync_repo(&config)
                .await
                .context("repository sync failed")?;
            0
        }
        Commands::Config { action } => {
            match action {
                ConfigAction::Show => commands::config::show(&config, &config_path)?,
                ConfigAction::Init { force } => commands::config::init(&config_path, force)?,
            }
            0
        }
    };

    Ok(code)
}
