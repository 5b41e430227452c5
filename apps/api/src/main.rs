mod batch;
mod cli;
mod config;
mod errors;
mod export;
mod models;
mod normalization;
mod otpm;
mod routes;
mod sources;
mod state;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::batch::{run_batch, BatchRequest};
use crate::cli::{default_output_path, Cli, Commands, OverrideArgs};
use crate::config::Config;
use crate::export::{analysis_path, export_analysis, export_jobs};
use crate::models::NormalizedResume;
use crate::routes::build_router;
use crate::sources::file::FileJobSource;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState::new(config);

    match cli.into_command() {
        Commands::Serve => serve(state).await,
        Commands::Batch {
            postings,
            query,
            location,
            limit,
            resume,
            overrides,
            out,
        } => {
            let request = BatchRequest {
                query,
                location,
                limit,
            };
            batch_command(&state, &postings, request, resume, overrides, out).await
        }
        Commands::Resume { path, overrides } => show_resume(&state, path, overrides).await,
    }
}

async fn serve(state: AppState) -> Result<()> {
    info!("Starting OA Trigger API v{}", env!("CARGO_PKG_VERSION"));

    let port = state.config.port;
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn batch_command(
    state: &AppState,
    postings: &Path,
    request: BatchRequest,
    resume: Option<PathBuf>,
    overrides: OverrideArgs,
    out: Option<PathBuf>,
) -> Result<()> {
    let source = FileJobSource::load(postings).await?;

    let resume = match resume {
        Some(path) => Some(load_resume(state, path, overrides).await?),
        None => None,
    };

    let report = run_batch(&source, &request, resume.as_ref(), state.scorer.as_ref()).await?;
    if report.rows.is_empty() {
        println!("No jobs matched '{}'. Nothing exported.", request.query);
        return Ok(());
    }

    let out = out.unwrap_or_else(|| default_output_path(&state.config.export_dir, &request.query));
    let written = export_jobs(&report.rows, &out)?;
    let analysis = analysis_path(&out);
    export_analysis(&report.summary, &analysis)?;

    println!("Exported {written} jobs to {}", out.display());
    println!("Analysis written to {}", analysis.display());
    for (metric, value) in report.summary.metrics() {
        println!("  {metric}: {value}");
    }
    Ok(())
}

async fn show_resume(state: &AppState, path: PathBuf, overrides: OverrideArgs) -> Result<()> {
    let resume = load_resume(state, path, overrides).await?;

    println!("Role family:         {}", resume.role_family);
    println!("Visa status:         {}", resume.visa_status);
    println!("Years of experience: {}", resume.years_of_experience);
    println!("Skills:              {}", resume.skills.join(", "));
    println!("Education entries:   {}", resume.education.len());
    println!("Experience bullets:  {}", resume.experience_bullets.len());
    for bullet in resume.experience_bullets.iter().take(3) {
        println!("  {bullet}");
    }
    Ok(())
}

/// PDF parsing is CPU-bound, so résumé files are read on the blocking pool.
async fn load_resume(
    state: &AppState,
    path: PathBuf,
    overrides: OverrideArgs,
) -> Result<NormalizedResume> {
    let parser = state.resume_parser.clone();
    let overrides = overrides.into_overrides();
    let resume = tokio::task::spawn_blocking(move || parser.parse_file(&path, overrides.as_ref()))
        .await
        .context("spawn_blocking failed while parsing résumé")??;
    Ok(resume)
}
