//! Plangen - personalized weekly training plan generator
//!
//! CLI entry point: generate a week, show the latest week, import records.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use planstore::PlanStore;
use tracing::{debug, info};

use plangen::cli::{Cli, Command, ImportCommand, OutputFormat};
use plangen::config::Config;
use plangen::domain::{SessionsRecord, UserProfile, Variation};
use plangen::llm::create_client;
use plangen::pipeline::GenerationEngine;
use plangen::prompts::PromptLoader;

fn setup_logging(cli_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("plangen")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let level = match cli_log_level.map(|s| s.to_uppercase()) {
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{s}', defaulting to INFO");
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("plangen.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(provider = %config.llm.provider, model = %config.llm.model, "Plangen loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Generate {
            user,
            start_date,
            prompts_dir,
        } => cmd_generate(&config, &user, start_date, prompts_dir).await,
        Command::Show { user, format } => cmd_show(&config, &user, format),
        Command::Import { command } => match command {
            ImportCommand::Profile { file } => cmd_import_profile(&config, &file),
            ImportCommand::Variations { file } => cmd_import_variations(&config, &file),
        },
    }
}

async fn cmd_generate(
    config: &Config,
    user: &str,
    start_date: Option<chrono::NaiveDate>,
    prompts_dir: Option<PathBuf>,
) -> Result<()> {
    config.validate()?;

    let store = PlanStore::open(config.storage.resolve_data_dir()).context("Failed to open plan store")?;
    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let prompts = match prompts_dir {
        Some(dir) => PromptLoader::with_dir(dir)?,
        None => PromptLoader::new()?,
    };

    let start_date = start_date.unwrap_or_else(|| Utc::now().date_naive());
    let engine = GenerationEngine::new(store, llm, prompts, config.generation.clone(), config.llm.max_tokens);

    println!("Generating week for {} starting {}...", user.bold(), start_date);
    let report = engine
        .run(user, start_date)
        .await
        .with_context(|| format!("Generation run failed for {user}"))?;

    println!("{} {}", "Generated".green().bold(), report.record_id);
    for session in &report.sessions {
        println!("\n{} ({})", session.date.to_string().bold(), session.discipline);
        print_phase("warmup", &session.warmup);
        print_phase("workout", &session.workout);
        print_phase("cooldown", &session.cooldown);
    }
    println!(
        "\n{} {} input / {} output tokens",
        "Usage:".dimmed(),
        report.usage.input_tokens,
        report.usage.output_tokens
    );
    Ok(())
}

fn print_phase(label: &str, chosen: &[plangen::domain::ChosenVariation]) {
    let names: Vec<&str> = chosen.iter().map(|c| c.name.as_str()).collect();
    println!("  {}: {}", label.cyan(), names.join(", "));
}

fn cmd_show(config: &Config, user: &str, format: OutputFormat) -> Result<()> {
    let store = PlanStore::open(config.storage.resolve_data_dir()).context("Failed to open plan store")?;

    let records: Vec<SessionsRecord> = store.list().context("Failed to list sessions records")?;
    // Record ids embed the generation timestamp, so file-name order is
    // chronological per user
    let latest = records
        .into_iter()
        .filter(|r| r.user_id == user)
        .next_back()
        .ok_or_else(|| eyre::eyre!("No generated weeks found for {user}"))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&latest)?);
        }
        OutputFormat::Text => {
            println!("{} ({})", latest.id.bold(), latest.weekly_plan.system_rationale);
            for (day, session) in latest.weekly_plan.days.iter().zip(&latest.sessions) {
                println!("\n{} - {}", session.date.to_string().bold(), day.purpose);
                print_phase("warmup", &session.warmup);
                print_phase("workout", &session.workout);
                print_phase("cooldown", &session.cooldown);
            }
        }
    }
    Ok(())
}

fn cmd_import_profile(config: &Config, file: &PathBuf) -> Result<()> {
    let store = PlanStore::open(config.storage.resolve_data_dir()).context("Failed to open plan store")?;

    let content = fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let mut profile: UserProfile = serde_yaml::from_str(&content).context("Failed to parse profile YAML")?;
    profile.updated_at = planstore::now_ms();

    store.put(&profile).context("Failed to write profile")?;
    println!("{} profile {}", "Imported".green().bold(), profile.user_id);
    Ok(())
}

fn cmd_import_variations(config: &Config, file: &PathBuf) -> Result<()> {
    let store = PlanStore::open(config.storage.resolve_data_dir()).context("Failed to open plan store")?;

    let content = fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let variations: Vec<Variation> = serde_yaml::from_str(&content).context("Failed to parse variations YAML")?;

    let count = variations.len();
    for variation in &variations {
        store
            .put(variation)
            .with_context(|| format!("Failed to write variation {}", variation.id))?;
    }
    println!("{} {count} variations", "Imported".green().bold());
    Ok(())
}
