//! Tribunal CLI - replay scripted Reverse Turing Test games through the judge panel

mod config;
mod script;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tribunal_council::{GameHistory, JudgePanel};
use tribunal_generator::mock::FailingGenerator;
use tribunal_generator::{OpenAiGenerator, TextGenerator};

use crate::config::AppConfig;
use crate::script::GameScript;

#[derive(Parser)]
#[command(name = "tribunal")]
#[command(about = "Tribunal - AI judges hunting for the human among AI characters")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Replay a scripted game and print transcripts and the verdict as JSON
    Play {
        /// Game script (JSON)
        #[arg(short, long)]
        script: PathBuf,
        /// Configuration file path
        #[arg(short, long, default_value = "config/tribunal.toml")]
        config: PathBuf,
        /// Run without a model; every judge falls back
        #[arg(long)]
        offline: bool,
    },
    /// Check configuration validity
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "config/tribunal.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Play {
            script,
            config,
            offline,
        } => play(&script, &config, offline).await,
        Commands::Check { config } => check(&config),
    }
}

async fn play(script_path: &Path, config_path: &Path, offline: bool) -> Result<()> {
    let config = AppConfig::load_or_default(config_path)?;
    let script = GameScript::load(script_path)?;
    let contexts = script.contexts()?;

    let generator: Arc<dyn TextGenerator> = if offline {
        Arc::new(FailingGenerator::default())
    } else {
        Arc::new(OpenAiGenerator::new(config.generator.clone()).context("creating text generator")?)
    };

    let mut panel_config = config.panel;
    if panel_config.expected_rounds.is_none() {
        panel_config.expected_rounds = Some(contexts.len());
    }

    let mut panel = JudgePanel::new(panel_config, script.roster.clone(), generator)
        .context("creating judge panel")?;
    info!(
        session = %panel.session_id(),
        rounds = contexts.len(),
        offline,
        "game starting"
    );

    let mut history = GameHistory::new();
    for ctx in contexts {
        let transcript = panel
            .run_round(&ctx)
            .await
            .with_context(|| format!("running round {}", ctx.round_number()))?;
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "round": ctx.round_number(),
                "question": ctx.question(),
                "transcript": transcript,
            }))?
        );
        history.record(ctx, transcript)?;
    }

    let verdict = panel
        .final_verdict(&history, &script.human)
        .await
        .context("reaching verdict")?;
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "session": panel.session_id(),
            "human": script.human,
            "verdict": verdict,
        }))?
    );

    if verdict.human_won() {
        info!(accused = verdict.accused(), "the human escaped detection");
    } else {
        info!(human = %script.human, "the judges found the human");
    }
    Ok(())
}

fn check(config_path: &Path) -> Result<()> {
    let config = AppConfig::load(config_path)?;
    println!(
        "{}: OK ({} judges, {} discussion rounds, model {})",
        config_path.display(),
        config.panel.judges.len(),
        config.panel.discussion_rounds,
        config.generator.model
    );
    Ok(())
}
