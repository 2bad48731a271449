//! Resume scorer: ATS-style resume scoring and ranking tool

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_scorer::cli::{self, Cli, Commands, ConfigAction, ModelAction};
use resume_scorer::config::{Config, OutputFormat};
use resume_scorer::error::{Result, ResumeScorerError};
use resume_scorer::input::manager::InputManager;
use resume_scorer::output::formatter::{save_report_to_file, suggest_filename, ReportGenerator};
use resume_scorer::output::report::{AnalysisReport, RankingReport, ReportMetadata};
use resume_scorer::processing::analyzer::AnalysisEngine;
use resume_scorer::processing::document::DocumentRole;
use resume_scorer::processing::embedding_manager::{resolve_catalog_entry, EmbeddingModelManager};
use resume_scorer::processing::tagger::{download_tagger, tagger_download_url, TAGGER_MODEL_ID};
use resume_scorer::BatchOutcome;
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        if e.is_fatal() {
            error!("Model initialization failed, nothing was scored: {}", e);
        } else {
            error!("Command failed: {}", e);
        }
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_file: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Score {
            resume,
            job,
            output,
            save,
            detailed,
        } => {
            cli::validate_file_extension(&resume, cli::RESUME_EXTENSIONS)
                .map_err(|e| ResumeScorerError::InvalidInput(format!("Resume file: {}", e)))?;
            cli::validate_file_extension(&job, cli::JOB_EXTENSIONS)
                .map_err(|e| ResumeScorerError::InvalidInput(format!("Job description file: {}", e)))?;
            let format = output_format(output.as_deref(), &config)?;

            info!("Scoring {} against {}", resume.display(), job.display());

            let mut input_manager = InputManager::new();
            let resume_doc = input_manager.load_document(&resume, DocumentRole::Resume).await?;
            let job_doc = input_manager.load_document(&job, DocumentRole::JobDescription).await?;

            let engine = AnalysisEngine::new(&config);
            let analysis = engine.analyze(&resume_doc, &job_doc).await?;

            let report = AnalysisReport::new(
                report_metadata(&config, &job),
                resume.to_string_lossy(),
                analysis,
            );
            let generator = ReportGenerator::with_options(
                config.output.color_output,
                detailed || config.output.detailed,
            );
            let rendered = generator.generate_analysis(&report, format)?;
            emit(&rendered, save.as_deref(), format, &resume)?;
        }

        Commands::Rank {
            job,
            resumes,
            top,
            output,
            save,
            detailed,
        } => {
            cli::validate_file_extension(&job, cli::JOB_EXTENSIONS)
                .map_err(|e| ResumeScorerError::InvalidInput(format!("Job description file: {}", e)))?;
            let format = output_format(output.as_deref(), &config)?;

            info!("Ranking {} resumes against {}", resumes.len(), job.display());

            let mut input_manager = InputManager::new();
            let job_doc = input_manager.load_document(&job, DocumentRole::JobDescription).await?;
            let submissions = input_manager.load_resumes(&resumes).await;

            let engine = AnalysisEngine::new(&config);
            let mut ranker = engine.ranker().await?;
            if format == OutputFormat::Console {
                ranker = ranker.with_progress(progress_bar(submissions.len() as u64));
            }
            let outcome = ranker.rank(job_doc.content(), submissions).await?;

            // stdout carries only the rendered report
            if let BatchOutcome::NoResults { failures, .. } = &outcome {
                warn!("No results: none of the {} resumes could be scored", failures.len());
            }

            let report = RankingReport::new(report_metadata(&config, &job), outcome, top);
            let generator = ReportGenerator::with_options(
                config.output.color_output,
                detailed || config.output.detailed,
            );
            let rendered = generator.generate_ranking(&report, format)?;
            emit(&rendered, save.as_deref(), format, &job)?;
        }

        Commands::Models { action } => run_models(action, &config).await?,

        Commands::Config { action } => {
            let config_path = config_file.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    println!("Configuration ({})\n", config_path.display());
                    println!("Models Directory: {}", config.models_dir().display());
                    println!("Embedding Model: {}", config.models.embedding_model);
                    println!("Tagger Model: {}", config.models.tagger_model.display());
                    println!("Allow Download: {}", config.models.allow_download);
                    println!("Max Concurrency: {}", config.processing.max_concurrency);
                    println!("Output Format: {:?}", config.output.format);
                    println!("Detailed Output: {}", config.output.detailed);
                    println!("Colored Output: {}", config.output.color_output);
                }
                Some(ConfigAction::Reset) => {
                    Config::default().save_to(&config_path)?;
                    println!("Configuration reset to defaults: {}", config_path.display());
                }
                Some(ConfigAction::Path) => {
                    println!("{}", config_path.display());
                }
            }
        }
    }

    Ok(())
}

async fn run_models(action: ModelAction, config: &Config) -> Result<()> {
    let mut manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;

    match action {
        ModelAction::List => {
            println!("Embedding Models ({})\n", config.models_dir().display());
            for (id, model) in manager.list_available_models() {
                let status = if manager.is_model_downloaded(id) {
                    "downloaded"
                } else {
                    "available"
                };
                let default_marker = if id == config.models.embedding_model { " (default)" } else { "" };
                println!("  • {}{} - {} MB, {} dims [{}]", id, default_marker, model.size_mb, model.dimensions, status);
                println!("    {}", model.description);
            }

            let tagger = &config.models.tagger_model;
            println!(
                "\nTagger ({}): {} [{}]",
                TAGGER_MODEL_ID,
                tagger.display(),
                if tagger.exists() { "downloaded" } else { "available" }
            );
        }
        ModelAction::Download { model, force } if model == TAGGER_MODEL_ID => {
            let path = download_tagger(&config.models.tagger_model, force).await?;
            println!("Tagger ready at {}", path.display());
        }
        ModelAction::Download { model, force } => {
            let path = manager.download_model(&model, force).await?;
            println!("Model '{}' ready at {}", model, path.display());
        }
        ModelAction::Remove { model } if model == TAGGER_MODEL_ID => {
            let tagger = &config.models.tagger_model;
            if !tagger.exists() {
                return Err(ResumeScorerError::InvalidInput(format!(
                    "Tagger is not downloaded: {}",
                    tagger.display()
                )));
            }
            tokio::fs::remove_file(tagger).await?;
            println!("Tagger removed from {}", tagger.display());
        }
        ModelAction::Remove { model } => {
            manager.remove_model(&model).await?;
            println!("Model '{}' removed", model);
        }
        ModelAction::Info { model } if model == TAGGER_MODEL_ID => {
            println!("Name: nlprule English tokenizer");
            println!("Source: {}", tagger_download_url());
            println!("Path: {}", config.models.tagger_model.display());
            let status = if config.models.tagger_model.exists() {
                "downloaded"
            } else {
                "available for download"
            };
            println!("Status: {}", status);
        }
        ModelAction::Info { model } => {
            let (id, info) = resolve_catalog_entry(&model).ok_or_else(|| {
                ResumeScorerError::InvalidInput(format!("Unknown embedding model: {}", model))
            })?;

            println!("Name: {}", info.name);
            println!("Repository: {}", info.repo_id);
            println!("Size: {} MB", info.size_mb);
            println!("Dimensions: {}", info.dimensions);
            println!("Description: {}", info.description);
            match manager.get_model_path(&id) {
                Some(path) => println!("Status: downloaded ({})", path.display()),
                None => println!("Status: available for download"),
            }
        }
    }

    Ok(())
}

fn output_format(requested: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match requested {
        Some(format) => cli::parse_output_format(format).map_err(ResumeScorerError::InvalidInput),
        None => Ok(config.output.format),
    }
}

fn report_metadata(config: &Config, job: &Path) -> ReportMetadata {
    let tagger = config
        .models
        .tagger_model
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| config.models.tagger_model.display().to_string());

    ReportMetadata::new(job.to_string_lossy(), config.models.embedding_model.clone(), tagger)
}

fn progress_bar(len: u64) -> ProgressBar {
    let progress = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template("{spinner} scoring [{bar:30}] {pos}/{len} resumes") {
        progress.set_style(style.progress_chars("=> "));
    }
    progress
}

/// Print the report, or write it to `save`. A directory gets a generated file name.
fn emit(rendered: &str, save: Option<&Path>, format: OutputFormat, source: &Path) -> Result<()> {
    match save {
        Some(path) => {
            let path = if path.is_dir() {
                path.join(suggest_filename(format, &source.to_string_lossy(), true))
            } else {
                path.to_path_buf()
            };
            save_report_to_file(rendered, &path)?;
            println!("Report ({:?}) saved to {}", format, path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
