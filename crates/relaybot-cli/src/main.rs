use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use relaybot_core::{
    build_bridge, build_driver, history_from_thread, http_client, AppSettings, ConversationMessage, EnvSecretStore,
    Mode, ProcessEnv, SettingsFile, SettingsLevel, SharedLogger, ThreadMessage, TracingLogger, TurnRequest,
};
use serde_json::json;

mod cli;
mod settings;

use cli::{Cli, Commands, ConfigCommands};

fn init_tracing(default_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cwd = settings::current_dir();
    let file = settings::discover(cli.config.as_deref(), &cwd);
    let logger: SharedLogger = Arc::new(TracingLogger::new());

    match cli.command {
        Commands::Ask {
            message,
            thread,
            user,
            mode,
            project,
            backend,
            model,
            json,
        } => {
            let mut settings = settings::load(&file, &ProcessEnv)?;
            if let Some(backend) = backend {
                settings.llm.backend = backend;
            }
            if let Some(model) = model {
                settings.llm.model = model;
            }

            let mut history = match thread {
                Some(path) => history_from_thread(&read_thread(&path)?),
                None => Vec::new(),
            };
            let text = message.join(" ");
            if !text.trim().is_empty() {
                history.push(ConversationMessage::user(format!("[{}]: {}", user, text)));
            }
            if history.is_empty() {
                bail!("nothing to ask: pass a MESSAGE or a --thread file");
            }

            let driver = build_driver(&settings, &EnvSecretStore::new(), Arc::new(ProcessEnv), logger)?;
            let mut request = TurnRequest::new(history).with_model(settings.llm.model.clone());
            if let Some(mode) = mode {
                request = request.with_mode(mode);
            }
            if let Some(project) = project.or_else(|| settings.redmine.default_project_id.clone()) {
                request = request.with_project(project);
            }

            let report = driver.run_turn_detailed(request).await;
            if json {
                let summary = json!({
                    "reply": report.reply,
                    "mode": report.mode,
                    "iterations": report.iterations,
                    "ended_by": format!("{:?}", report.ended_by),
                    "messages": report.transcript.len(),
                });
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", report.reply);
            }
        }

        Commands::Tools { discover } => {
            for mode in Mode::all() {
                println!("{}:", mode);
                for tool in mode.tools() {
                    match tool.definition() {
                        Some(def) => println!("  {:<28} {}", def.name, first_line(&def.description)),
                        None => println!("  {:<28} (built-in)", tool.name()),
                    }
                }
            }

            if discover {
                let settings = settings::load(&file, &ProcessEnv)?;
                let bridge = build_bridge(&settings, Arc::new(ProcessEnv), http_client(&settings)?, logger);
                let report = bridge.discover().await;

                println!(
                    "\nremote ({} server(s), {} tool(s)):",
                    report.servers_queried(),
                    report.len()
                );
                for entry in report.entries() {
                    println!("  {:<40} {}", entry.key, first_line(&entry.description));
                }
                for failure in report.failures() {
                    println!("  ! {}: {}", failure.server_id, failure.error);
                }
            }
        }

        Commands::Config { command } => match command {
            ConfigCommands::Init { workspace, force } => {
                let target = match (cli.config, workspace) {
                    (Some(path), _) => SettingsFile::new(path, SettingsLevel::Workspace),
                    (None, true) => SettingsFile::workspace(&cwd),
                    (None, false) => SettingsFile::user(),
                };
                if target.exists() && !force {
                    bail!("{} already exists (use --force to overwrite)", target.path().display());
                }
                target
                    .save(&AppSettings::default())
                    .with_context(|| format!("writing {}", target.path().display()))?;
                println!("Wrote {} settings to {}", target.level().as_str(), target.path().display());
            }
            ConfigCommands::Show => {
                let settings = settings::load(&file, &ProcessEnv)?;
                println!("# {} ({})", file.path().display(), file.level().as_str());
                println!("{}", serde_json::to_string_pretty(&settings)?);
            }
        },
    }

    Ok(())
}

fn read_thread(path: &Path) -> Result<Vec<ThreadMessage>> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing thread {}", path.display()))
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}
