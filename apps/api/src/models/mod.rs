pub mod job;
pub mod resume;

pub use job::{NormalizedJob, RawJobPosting, VisaSignal};
pub use resume::{NormalizedResume, ResumeOverrides};
