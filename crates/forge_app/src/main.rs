use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{error, info};

use forge_ai::{AiProvider, GeminiProvider, ProviderError};
use forge_core::config::GEMINI_API_KEY_ENV;
use forge_core::{ForgeConfig, ForgeError, logging};
use forge_learn::{
    AnswerEvaluator, AnswerSet, EvaluatorConfig, LearnError, Level, Quiz, StudyAssistant,
};

/// Quiz evaluation and study tools for ConceptForge.
#[derive(Parser, Debug)]
#[command(name = "conceptforge", version)]
struct Cli {
    /// Config file to use instead of ~/.conceptforge/config.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Never contact the text-generation provider
    #[arg(long, global = true)]
    offline: bool,

    /// Write logs to this directory instead of ~/.conceptforge/logs (no console output)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a set of answers against a quiz and print the level
    Evaluate {
        /// Quiz JSON file
        #[arg(long)]
        quiz: PathBuf,
        /// Answers JSON file (object of question id to answer)
        #[arg(long)]
        answers: PathBuf,
        /// Print the full score result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize a concept and extract keywords
    Analyze {
        concept: String,
        #[arg(long = "domain", required = true)]
        domains: Vec<String>,
        /// Lecture transcript file
        #[arg(long)]
        transcript: Option<PathBuf>,
    },
    /// Generate a seven-question quiz
    Quiz {
        concept: String,
        #[arg(long = "domain", required = true)]
        domains: Vec<String>,
        #[arg(long)]
        summary: String,
    },
    /// Suggest projects for a learner
    Projects {
        concept: String,
        #[arg(long)]
        domain: String,
        #[arg(long, default_value = "Beginner")]
        level: Level,
    },
    /// Progressive hints for a project
    Hints {
        concept: String,
        #[arg(long)]
        title: String,
    },
    /// Step-by-step walkthrough of a project
    Solution {
        title: String,
        #[arg(long, default_value = "Beginner")]
        level: Level,
    },
    /// Ask the mentor a free-form question
    Mentor { question: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::from(3);
        }
    };

    let installed = match cli.log_dir.as_deref() {
        Some(dir) => logging::init_logging_to_dir(dir, &config.log_level),
        None => logging::init_logging(&config),
    };
    let _log_guard = match installed {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Logging disabled: {e:#}");
            None
        }
    };

    info!(version = env!("CARGO_PKG_VERSION"), "Starting conceptforge");

    match run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<ForgeError>() {
            Some(forge) => {
                error!(category = ?forge.category(), "{forge}");
                eprintln!("{}", forge.user_message());
                ExitCode::from(forge.exit_code() as u8)
            }
            None => {
                error!("{e:#}");
                eprintln!("Error: {e:#}");
                ExitCode::FAILURE
            }
        },
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ForgeConfig> {
    match path {
        Some(path) => {
            let mut config = ForgeConfig::load_from_path(path)?;
            config.apply_env();
            Ok(config)
        }
        None => ForgeConfig::load(),
    }
}

async fn run(cli: Cli, config: &ForgeConfig) -> anyhow::Result<()> {
    let provider = if cli.offline {
        None
    } else {
        build_provider(config)
    };

    match cli.command {
        Command::Evaluate {
            quiz,
            answers,
            json,
        } => {
            let quiz: Quiz = read_json(&quiz)?;
            let answers: AnswerSet = read_json(&answers)?;
            let evaluator = AnswerEvaluator::new(
                provider,
                EvaluatorConfig {
                    model: config.gemini_model.clone(),
                    timeout: config.evaluation_timeout(),
                    refine: config.level_refinement,
                },
            );
            let result = evaluator
                .evaluate(&quiz, &answers)
                .await
                .map_err(to_forge_error)?;
            if json {
                print_json(&result)?;
            } else {
                println!(
                    "{} ({}/{} points, {:.1}%)",
                    result.level, result.points_earned, result.points_possible, result.percentage
                );
            }
        }
        Command::Analyze {
            concept,
            domains,
            transcript,
        } => {
            let transcript = transcript
                .map(|path| {
                    std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read transcript: {}", path.display()))
                })
                .transpose()?;
            let analysis = assistant(provider, config)?
                .analyze_concept(&concept, transcript.as_deref(), &domains)
                .await
                .map_err(to_forge_error)?;
            print_json(&analysis)?;
        }
        Command::Quiz {
            concept,
            domains,
            summary,
        } => {
            let quiz = assistant(provider, config)?
                .generate_quiz(&concept, &domains, &summary)
                .await
                .map_err(to_forge_error)?;
            print_json(&quiz)?;
        }
        Command::Projects {
            concept,
            domain,
            level,
        } => {
            let suggestions = assistant(provider, config)?
                .suggest_projects(level, &domain, &concept)
                .await
                .map_err(to_forge_error)?;
            print_json(&suggestions)?;
        }
        Command::Hints { concept, title } => {
            let hints = assistant(provider, config)?
                .project_hints(&concept, &title)
                .await
                .map_err(to_forge_error)?;
            print_json(&hints)?;
        }
        Command::Solution { title, level } => {
            let solution = assistant(provider, config)?
                .reveal_solution(&title, level)
                .await
                .map_err(to_forge_error)?;
            print_json(&solution)?;
        }
        Command::Mentor { question } => {
            let answer = assistant(provider, config)?
                .mentor_help(&question)
                .await
                .map_err(to_forge_error)?;
            println!("{answer}");
        }
    }
    Ok(())
}

fn build_provider(config: &ForgeConfig) -> Option<Arc<dyn AiProvider>> {
    let key = config.gemini_api_key.clone().filter(|k| !k.trim().is_empty())?;
    let provider: Arc<dyn AiProvider> = Arc::new(
        GeminiProvider::new(key)
            .with_base_url(config.gemini_base_url.clone())
            .with_timeout(config.request_timeout()),
    );
    Some(provider)
}

/// Generation commands cannot run without a provider.
fn assistant(
    provider: Option<Arc<dyn AiProvider>>,
    config: &ForgeConfig,
) -> Result<StudyAssistant, ForgeError> {
    let provider = provider.ok_or_else(|| {
        ForgeError::Config(format!(
            "this command needs the text-generation provider; set {GEMINI_API_KEY_ENV} and drop --offline"
        ))
    })?;
    Ok(StudyAssistant::new(provider, config.gemini_model.clone()))
}

fn to_forge_error(err: LearnError) -> ForgeError {
    match err {
        LearnError::InvalidQuiz(msg) | LearnError::InvalidInput(msg) => {
            ForgeError::InvalidInput(msg)
        }
        LearnError::Provider(e) => match e {
            ProviderError::Network(msg) => ForgeError::Network(msg),
            ProviderError::Timeout => ForgeError::Network("request timed out".into()),
            ProviderError::InvalidKey => {
                ForgeError::Config(format!("{GEMINI_API_KEY_ENV} was rejected by the provider"))
            }
            other => ForgeError::AiProvider(other.to_string()),
        },
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ForgeError::FileSystem(format!("{}: {e}", path.display())))?;
    let value = serde_json::from_str(&content)
        .map_err(|e| ForgeError::InvalidInput(format!("{}: {e}", path.display())))?;
    Ok(value)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
