//! plotweave - terminal shell around the narrative session engine
//!
//! Plays the navigation-shell role: scenario picker, action prompt, HUD line,
//! and the reset confirmation. Everything rendered comes from committed
//! engine state.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use dialoguer::{Confirm, Input, Select};
use plotweave_core::{
    ChatEntry, EngineConfig, FileSessionStore, GenerationClient, HttpNarrativeBackend,
    LlmSettings, NarrativeEngine, Phase, ResetConfirm, Role, TurnStatus, SCENARIOS,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plotweave", version, about = "LLM-backed text adventure")]
struct Cli {
    /// Generation backend base URL
    #[arg(long, env = "PLOTWEAVE_BASE_URL", default_value = "http://127.0.0.1:8000")]
    base_url: String,

    /// Bearer token forwarded to the backend
    #[arg(long, env = "PLOTWEAVE_AUTH_TOKEN")]
    auth_token: Option<String>,

    /// LLM settings file (defaults to ~/.config/plotweave/settings.json)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Save slot file (defaults to ~/.config/plotweave/adventure_save.json)
    #[arg(long)]
    save: Option<PathBuf>,
}

struct TerminalConfirm;

impl ResetConfirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings_path = match cli.settings {
        Some(path) => path,
        None => LlmSettings::default_path()?,
    };
    let settings = LlmSettings::load(&settings_path);

    let mut config = EngineConfig::new(cli.base_url);
    if let Some(token) = cli.auth_token {
        config = config.with_auth_token(token);
    }

    let client = GenerationClient::new(&config)?;
    let backend = Arc::new(HttpNarrativeBackend::new(client));
    let store = match cli.save {
        Some(path) => Arc::new(FileSessionStore::new(path)),
        None => Arc::new(FileSessionStore::default_path()?),
    };

    let engine = NarrativeEngine::new(backend, store, settings);
    engine.mount().await?;
    if engine.phase() != Phase::Unselected {
        println!("{}", "已恢复存档。".green());
    }

    let mut printed = 0usize;
    loop {
        if engine.phase() == Phase::Unselected {
            printed = 0;
            if !pick_scenario(&engine).await? {
                break;
            }
        }

        printed = render(&engine, printed);

        let input: String = Input::new()
            .with_prompt(hud_line(&engine))
            .allow_empty(true)
            .interact_text()?;
        let input = input.trim();

        match input {
            "/quit" | "/q" => break,
            "/reset" => {
                engine.reset(&TerminalConfirm).await?;
                continue;
            }
            _ => {}
        }

        let action = resolve_choice(&engine, input).unwrap_or_else(|| input.to_string());
        match engine.submit_action(&action).await? {
            TurnStatus::RejectedEmpty => {
                println!("{}", "(输入一个行动，或 /reset、/quit)".dimmed());
            }
            TurnStatus::RejectedBusy => {
                println!("{}", "(上一回合还在进行中)".dimmed());
            }
            _ => {}
        }
    }

    Ok(())
}

/// Show the scenario picker; false means the player backed out
async fn pick_scenario(engine: &NarrativeEngine) -> Result<bool> {
    println!("\n{}", "选择你的平行宇宙".bold());
    let mut items: Vec<String> = SCENARIOS
        .iter()
        .map(|s| format!("{} - {}", s.name, s.desc))
        .collect();
    items.push("退出".to_string());

    let picked = Select::new().items(&items).default(0).interact()?;
    if picked >= SCENARIOS.len() {
        return Ok(false);
    }

    println!("{}", "命运的齿轮开始转动...".dimmed());
    engine.start_scenario(SCENARIOS[picked].id).await?;
    Ok(true)
}

/// Print any log entries committed since the last render; returns the new
/// printed count
fn render(engine: &NarrativeEngine, printed: usize) -> usize {
    let log = engine.display_log();
    for entry in &log[printed.min(log.len())..] {
        print_entry(entry);
    }

    let choices = engine.pending_choices();
    if !choices.is_empty() {
        for (i, choice) in choices.iter().enumerate() {
            println!("  {} {}", format!("[{}]", i + 1).yellow(), choice);
        }
    }

    log.len()
}

fn print_entry(entry: &ChatEntry) {
    match entry.role {
        Role::User => println!("\n{}", format!("> {}", entry.content).red().bold()),
        _ => println!("\n{}", entry.content),
    }
}

fn hud_line(engine: &NarrativeEngine) -> String {
    match engine.session() {
        Some(s) => format!("HP {}/{} | {} | {}", s.hp, s.max_hp, s.location, s.status),
        None => "...".to_string(),
    }
}

/// Map a numeric input onto the matching suggested choice
fn resolve_choice(engine: &NarrativeEngine, input: &str) -> Option<String> {
    let index: usize = input.parse().ok()?;
    let choices = engine.pending_choices();
    choices.get(index.checked_sub(1)?).cloned()
}
