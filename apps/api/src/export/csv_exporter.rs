use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::AppError;
use crate::export::{BatchSummary, ExportRow};

pub const JOB_HEADERS: &[&str] = &[
    "Company",
    "Role",
    "Location",
    "Status",
    "Posted Text",
    "OTPM Probability",
    "Recommendation",
    "Visa Sponsorship",
    "Experience (Years)",
    "Skills Found",
    "URL",
];

const NOT_SCORED: &str = "N/A";

/// Writes the jobs sheet to `path`, returning the number of rows written.
pub fn export_jobs(rows: &[ExportRow], path: &Path) -> Result<usize, AppError> {
    let file = std::fs::File::create(path)?;
    let written = write_jobs(rows, file)?;
    info!("Exported {written} jobs to {}", path.display());
    Ok(written)
}

/// Writes the analysis sheet (Metric, Value) to `path`.
pub fn export_analysis(summary: &BatchSummary, path: &Path) -> Result<(), AppError> {
    let file = std::fs::File::create(path)?;
    write_analysis(summary, file)?;
    info!("Exported batch analysis to {}", path.display());
    Ok(())
}

/// `jobs.csv` → `jobs_analysis.csv`, next to the jobs file.
pub fn analysis_path(jobs_path: &Path) -> PathBuf {
    let stem = jobs_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("jobs_export");
    jobs_path.with_file_name(format!("{stem}_analysis.csv"))
}

pub fn write_jobs<W: Write>(rows: &[ExportRow], writer: W) -> Result<usize, AppError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(JOB_HEADERS)?;

    for row in rows {
        wtr.write_record([
            row.company.clone(),
            row.role.clone(),
            row.location.clone(),
            row.status.to_string(),
            row.posted_text.clone(),
            row.probability
                .map(|p| format!("{p:.2}"))
                .unwrap_or_else(|| NOT_SCORED.to_string()),
            row.recommendation
                .map(|r| r.label().to_string())
                .unwrap_or_else(|| NOT_SCORED.to_string()),
            row.visa_sponsorship.to_string(),
            format!("{:?}", row.experience_years),
            row.skills.join(", "),
            row.url.clone(),
        ])?;
    }

    wtr.flush()?;
    Ok(rows.len())
}

pub fn write_analysis<W: Write>(summary: &BatchSummary, writer: W) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Metric", "Value"])?;
    for (metric, value) in summary.metrics() {
        wtr.write_record([metric, value.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}
