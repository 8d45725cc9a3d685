//! Deterministic local synthesis used whenever the generative service is
//! skipped or fails. Output is always syntactically valid input for the
//! response grammars, so downstream parsing never needs a special case.

use crate::analysis::truncate_chars;

/// Technology vocabulary scanned by the keyword fallback.
const TECH_KEYWORDS: &[&str] = &[
    "python",
    "javascript",
    "react",
    "nodejs",
    "node.js",
    "java",
    "aws",
    "docker",
    "sql",
    "git",
    "agile",
    "typescript",
    "kubernetes",
    "mongodb",
    "express",
    "angular",
    "vue",
];

/// At most this many missing-keyword lines are emitted.
const MAX_FALLBACK_KEYWORDS: usize = 3;

/// Segment prefix lengths, matching what the prompt builders embed.
const SEGMENT_CHARS: usize = 200;
const EXPERIENCE_CHARS: usize = 100;

/// Dispatches on marker words in the prompt. Unrecognized prompts get a
/// generic line the parsers turn into their sentinels.
pub fn fallback_analysis(prompt: &str) -> String {
    let lower = prompt.to_lowercase();
    if lower.contains("keyword") {
        fallback_keyword_analysis(prompt)
    } else if lower.contains("bullet") || lower.contains("improve") {
        fallback_bullet_analysis(prompt)
    } else {
        "No analysis available".to_string()
    }
}

/// Emits `term|importance|frequency|reason` lines for vocabulary terms
/// present in the job segment but absent from the résumé segment.
fn fallback_keyword_analysis(prompt: &str) -> String {
    let job = lowered_segment(prompt, "JOB:", &["RESUME:"], SEGMENT_CHARS);
    let resume = lowered_segment(prompt, "RESUME:", &[], SEGMENT_CHARS);

    if job.is_empty() {
        return "None|low|0|No job description provided".to_string();
    }

    let mut lines = Vec::new();
    for keyword in TECH_KEYWORDS {
        if job.contains(keyword) && !resume.contains(keyword) {
            let frequency = job.matches(keyword).count();
            let importance = if frequency > 2 {
                "high"
            } else if frequency > 1 {
                "medium"
            } else {
                "low"
            };
            lines.push(format!("{keyword}|{importance}|{frequency}|Required skill"));
        }
    }
    lines.truncate(MAX_FALLBACK_KEYWORDS);

    if lines.is_empty() {
        "None|low|0|All key skills present".to_string()
    } else {
        lines.join("\n")
    }
}

/// Paraphrases the first bullet found in the experience segment into the
/// canonical ORIGINAL/IMPROVED/REASON/IMPACT block.
fn fallback_bullet_analysis(prompt: &str) -> String {
    let experience = segment(prompt, "EXPERIENCE:", &["JOB:"]).unwrap_or("").trim();
    let experience = truncate_chars(experience, EXPERIENCE_CHARS);

    let bullet = experience
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('•') || line.starts_with('-'))
        .map(|line| line.trim_start_matches(['•', '-', ' ']).trim())
        .find(|line| !line.is_empty());

    match bullet {
        Some(original) => {
            let improved = format!("Enhanced {} with modern technologies", original.to_lowercase());
            format!(
                "ORIGINAL: {original}\nIMPROVED: {improved}\nREASON: Added impact\nIMPACT: 8"
            )
        }
        None => "ORIGINAL: Developed software\n\
                 IMPROVED: Developed scalable software solutions\n\
                 REASON: Added specificity\n\
                 IMPACT: 7"
            .to_string(),
    }
}

/// Trimmed, lowercased, prefix-bounded segment — empty if the marker is
/// missing.
fn lowered_segment(prompt: &str, start: &str, ends: &[&str], max_chars: usize) -> String {
    let lowered = segment(prompt, start, ends)
        .unwrap_or("")
        .trim()
        .to_lowercase();
    truncate_chars(&lowered, max_chars).to_string()
}

/// Extracts the text between `start` and the earliest of `ends` (or the
/// end of input). Marker search is ASCII case-insensitive.
fn segment<'a>(text: &'a str, start: &str, ends: &[&str]) -> Option<&'a str> {
    let from = find_ci(text, start, 0)? + start.len();
    let mut to = text.len();
    for end in ends {
        if let Some(pos) = find_ci(text, end, from) {
            to = to.min(pos);
        }
    }
    Some(&text[from..to])
}

/// ASCII case-insensitive substring search starting at byte offset `from`.
fn find_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let haystack = &haystack.as_bytes()[from..];
    let needle = needle.as_bytes();
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
        .map(|pos| pos + from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_deterministic() {
        let prompt = "keyword JOB: Python and AWS needed RESUME: I write Java";
        assert_eq!(fallback_analysis(prompt), fallback_analysis(prompt));
    }

    #[test]
    fn test_missing_terms_get_importance_from_frequency() {
        let prompt = "keyword\nJOB: Python Python Python and AWS required, docker docker\nRESUME: Java only";
        let output = fallback_analysis(prompt);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "python|high|3|Required skill");
        assert_eq!(lines[1], "aws|low|1|Required skill");
        assert_eq!(lines[2], "docker|medium|2|Required skill");
    }

    #[test]
    fn test_terms_already_on_resume_are_not_missing() {
        let prompt = "keyword JOB: Python required RESUME: Python expert";
        assert_eq!(fallback_analysis(prompt), "None|low|0|All key skills present");
    }

    #[test]
    fn test_output_is_capped_at_three_terms() {
        let prompt = "keyword JOB: python javascript react docker sql RESUME: none of those";
        let output = fallback_analysis(prompt);
        assert_eq!(output.lines().count(), 3);
    }

    #[test]
    fn test_empty_job_segment_yields_sentinel_line() {
        assert_eq!(
            fallback_analysis("keyword JOB: RESUME: something"),
            "None|low|0|No job description provided"
        );
        assert_eq!(
            fallback_analysis("keyword no markers at all"),
            "None|low|0|No job description provided"
        );
    }

    #[test]
    fn test_marker_search_is_case_insensitive() {
        let prompt = "keyword job: Kubernetes resume: Java";
        let output = fallback_analysis(prompt);
        assert_eq!(output, "kubernetes|low|1|Required skill");
    }

    #[test]
    fn test_bullet_fallback_paraphrases_first_bullet() {
        let prompt = "improve EXPERIENCE:\n• Built billing APIs\n• Led team\nJOB: Rust";
        let output = fallback_analysis(prompt);
        assert!(output.starts_with("ORIGINAL: Built billing APIs"));
        assert!(output.contains("IMPROVED: Enhanced built billing apis with modern technologies"));
        assert!(output.contains("IMPACT: 8"));
    }

    #[test]
    fn test_bullet_fallback_without_bullets_is_canned() {
        let output = fallback_analysis("improve EXPERIENCE: prose only JOB: Rust");
        assert!(output.starts_with("ORIGINAL: Developed software"));
        assert!(output.contains("IMPACT: 7"));
    }

    #[test]
    fn test_dash_bullets_are_recognized() {
        let prompt = "improve EXPERIENCE:\n- Shipped the feature\nJOB: Rust";
        let output = fallback_analysis(prompt);
        assert!(output.starts_with("ORIGINAL: Shipped the feature"));
    }

    #[test]
    fn test_unrecognized_prompt_gets_generic_line() {
        assert_eq!(fallback_analysis("tell me a story"), "No analysis available");
    }
}
