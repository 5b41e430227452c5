use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::batch::DEFAULT_LIMIT;
use crate::models::ResumeOverrides;

#[derive(Parser, Debug)]
#[command(name = "oa-trigger")]
#[command(about = "OA Trigger Engine - score job postings against a résumé")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// `serve` when no subcommand is given.
    pub fn into_command(self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API
    Serve,

    /// Normalize and score a file of scraped postings, then export CSV
    Batch {
        /// JSON array of raw postings
        #[arg(long, value_name = "FILE")]
        postings: PathBuf,

        /// Keywords matched against title and description (empty matches all)
        #[arg(long, default_value = "")]
        query: String,

        /// Substring matched against the posting location (empty matches all)
        #[arg(long, default_value = "")]
        location: String,

        /// Maximum number of postings to process
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        /// Résumé (PDF or text) to score against; without it jobs are exported unscored
        #[arg(long, value_name = "FILE")]
        resume: Option<PathBuf>,

        #[command(flatten)]
        overrides: OverrideArgs,

        /// Output CSV (defaults to <EXPORT_DIR>/jobs_<query>.csv)
        #[arg(long, short, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Parse a résumé and print what was extracted
    Resume {
        path: PathBuf,

        #[command(flatten)]
        overrides: OverrideArgs,
    },
}

/// Manual corrections applied after résumé extraction.
#[derive(Args, Debug, Default, Clone)]
pub struct OverrideArgs {
    /// Years of experience (replaces the extracted value)
    #[arg(long)]
    pub years: Option<String>,

    /// Visa status, e.g. "US Citizen" or "Visa Required"
    #[arg(long)]
    pub visa: Option<String>,

    /// Target role family
    #[arg(long)]
    pub role: Option<String>,
}

impl OverrideArgs {
    pub fn into_overrides(self) -> Option<ResumeOverrides> {
        let overrides = ResumeOverrides {
            years_of_experience: self.years,
            visa_status: self.visa,
            role: self.role,
        };
        (!overrides.is_empty()).then_some(overrides)
    }
}

/// `<dir>/jobs_<query>.csv`, spaces in the query replaced by underscores.
pub fn default_output_path(export_dir: &Path, query: &str) -> PathBuf {
    let query = query.trim();
    let stem = if query.is_empty() {
        "all".to_string()
    } else {
        query.replace(' ', "_")
    };
    export_dir.join(format!("jobs_{stem}.csv"))
}
