//! Prompt builders for the two analysis tasks.
//!
//! Each prompt embeds the labeled-segment markers (`JOB:`, `RESUME:`,
//! `EXPERIENCE:`) and the dispatch words (`keyword`, `improve`) that the
//! fallback synthesizer keys on, so a degraded run still produces output
//! in the same grammar the parser expects.

use crate::analysis::truncate_chars;

/// Segment lengths embedded in the prompts. The scorer matches against
/// the same résumé prefix length.
pub const JOB_SEGMENT_CHARS: usize = 200;
pub const RESUME_SEGMENT_CHARS: usize = 200;
const EXPERIENCE_SEGMENT_CHARS: usize = 100;
const BULLET_JOB_SEGMENT_CHARS: usize = 100;

/// Prompt asking for missing keywords as pipe-delimited lines.
pub fn keyword_prompt(job_description: &str, resume_text: &str) -> String {
    format!(
        "Analyze the job description for missing resume keywords.\n\
         Format: keyword|importance|frequency|context\n\
         JOB: {}\n\
         RESUME: {}",
        truncate_chars(job_description, JOB_SEGMENT_CHARS),
        truncate_chars(resume_text, RESUME_SEGMENT_CHARS),
    )
}

/// Prompt asking to improve experience bullets as ORIGINAL/IMPROVED/
/// REASON/IMPACT blocks.
pub fn bullet_prompt(experience_text: &str, job_description: &str) -> String {
    let experience = truncate_chars(experience_text, EXPERIENCE_SEGMENT_CHARS);
    let experience = if experience.trim().is_empty() {
        "General work experience"
    } else {
        experience
    };
    format!(
        "Improve resume bullet points for job requirements.\n\
         Format:\n\
         ORIGINAL: [text]\n\
         IMPROVED: [text]\n\
         REASON: [explanation]\n\
         IMPACT: [1-10]\n\n\
         EXPERIENCE: {}\n\
         JOB: {}",
        experience,
        truncate_chars(job_description, BULLET_JOB_SEGMENT_CHARS),
    )
}
