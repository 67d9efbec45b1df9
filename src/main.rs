use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use football_writer::ai::AiAnalyst;
use football_writer::api::{self, AppState};
use football_writer::config::{AppConfig, Secrets};
use football_writer::data::{fixtures, RandomStats};
use football_writer::db::Store;
use football_writer::experts::{generate_comprehensive_analysis, generate_expert_article, ExpertCatalog};
use football_writer::monitoring::{init_logging, HealthState};
use football_writer::writer::{LengthTarget, PredictionWriter, TemplateVersion};

#[derive(Debug, Parser)]
#[command(name = "football-writer", version, about = "Football prediction article service")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config/default.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API (default).
    Serve,
    /// Print the demo prediction article.
    Demo {
        /// `classic` or `enhanced`; defaults to the configured template.
        #[arg(long, value_parser = parse_template)]
        template: Option<TemplateVersion>,
    },
    /// List the expert catalog.
    Experts,
    /// Print one expert's article for the sample match.
    Expert {
        key: String,
        /// Write the long-form nine-section analysis instead.
        #[arg(long)]
        comprehensive: bool,
    },
}

fn parse_template(value: &str) -> Result<TemplateVersion, String> {
    match value {
        "classic" => Ok(TemplateVersion::Classic),
        "enhanced" => Ok(TemplateVersion::Enhanced),
        other => Err(format!("unknown template '{other}', expected classic or enhanced")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, secrets) = AppConfig::load(&cli.config)?;

    init_logging(&config.monitoring)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run_server(config, secrets).await,
        Command::Demo { template } => {
            run_demo(&config, template.unwrap_or(config.writer.template));
            Ok(())
        }
        Command::Experts => {
            list_experts();
            Ok(())
        }
        Command::Expert { key, comprehensive } => run_expert(&config, &key, comprehensive),
    }
}

async fn run_server(config: AppConfig, secrets: Secrets) -> Result<()> {
    tracing::info!(
        template = ?config.writer.template,
        ai_enabled = config.ai.enabled,
        database = %config.database.path,
        "Football writer starting"
    );

    if let Some(parent) = Path::new(&config.database.path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let store = Arc::new(Store::new(&config.database.path).await?);
    let health = HealthState::new();
    let analyst = AiAnalyst::from_config(&config.ai, &secrets, Some(store.clone()))?
        .with_health(health.clone());

    let state = AppState {
        catalog: Arc::new(ExpertCatalog::builtin()),
        store,
        analyst: Arc::new(analyst),
        health,
        writer: config.writer.clone(),
    };
    api::serve(state, &config.server).await
}

fn length_target(config: &AppConfig) -> LengthTarget {
    LengthTarget {
        min_chars: config.writer.target_min_chars,
        max_chars: config.writer.target_max_chars,
    }
}

fn run_demo(config: &AppConfig, template: TemplateVersion) {
    let article = PredictionWriter::new(template)
        .with_target(length_target(config))
        .generate_prediction(
            &fixtures::demo_match(),
            &fixtures::demo_odds(),
            &fixtures::demo_history(),
            fixtures::DEMO_CONFIDENCE,
            Some(fixtures::demo_insights().as_slice()),
        );

    println!("{}", article.full_article);
    println!(
        "字数：{}（目标 {}-{}）",
        article.length.chars, article.length.target_min, article.length.target_max
    );
}

fn list_experts() {
    for expert in ExpertCatalog::builtin().all() {
        println!(
            "{:<16} {}（{}） {} 胜率{:.1}%",
            expert.key,
            expert.name,
            expert.nickname,
            expert.primary_expertise,
            expert.win_rate
        );
    }
}

fn run_expert(config: &AppConfig, key: &str, comprehensive: bool) -> Result<()> {
    let catalog = ExpertCatalog::builtin();
    let mut stats = RandomStats::new(config.writer.seed);
    let m = fixtures::sample_match();
    let odds = fixtures::sample_odds();

    if comprehensive {
        let expert = catalog
            .get(key)
            .with_context(|| format!("Expert {key} not found"))?;
        let analysis = generate_comprehensive_analysis(expert, &m, Some(&odds), &mut stats);
        println!("{}\n\n{}", analysis.title, analysis.content);
        println!("字数：{}", analysis.word_count);
    } else {
        let article = generate_expert_article(
            &catalog,
            key,
            &m,
            &odds,
            &fixtures::sample_history(),
            &mut stats,
            &length_target(config),
        )?;
        println!("{}", article.full_article);
        println!("字数：{}", article.length.chars);
    }
    Ok(())
}
