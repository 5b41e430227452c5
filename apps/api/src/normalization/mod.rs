// Normalization: raw job/résumé text → structured records.
// Both normalizers compose the same Extractor; neither keeps state between calls.

pub mod extractor;
pub mod job_parser;
pub mod resume_parser;
pub mod text_extract;

pub use job_parser::{normalize_job, JobParser};
pub use resume_parser::{normalize_resume, ResumeInput, ResumeParser};
