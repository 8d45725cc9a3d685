//! Weighted keyword match scoring.

use crate::analysis::models::{Keyword, KeywordDetail, MatchResult};
use crate::analysis::truncate_chars;

/// Matching compares the same résumé prefix the extraction step observed.
const MATCH_PREFIX_CHARS: usize = 200;
/// Reserved baseline for structural-quality heuristics (bullet density,
/// length) that are not implemented yet.
const QUALITY_BASELINE: u32 = 50;
/// Score granted when there are no real keywords to judge.
const NO_KEYWORD_SCORE: u32 = 85;
const KEYWORD_BLEND: f64 = 0.7;
const QUALITY_BLEND: f64 = 0.3;

/// Combines parsed keywords with the résumé text into a 0–100 fit score.
/// Never fails: an unexpected panic inside the computation degrades to
/// `MatchResult::neutral()` instead of unwinding into the pipeline.
///
/// The job description is part of the scoring contract but unused until
/// the structural-quality heuristics land.
pub fn score(resume_text: &str, keywords: &[Keyword], _job_description: &str) -> MatchResult {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        compute_score(resume_text, keywords)
    }))
    .unwrap_or_else(|_| {
        tracing::error!("Match scoring failed; returning neutral result");
        MatchResult::neutral()
    })
}

fn compute_score(resume_text: &str, keywords: &[Keyword]) -> MatchResult {
    let resume_lower = {
        let lowered = resume_text.to_lowercase();
        truncate_chars(&lowered, MATCH_PREFIX_CHARS).to_string()
    };

    let mut matched_weight: u32 = 0;
    let mut total_weight: u32 = 0;
    let mut keyword_details = Vec::with_capacity(keywords.len());

    for keyword in keywords {
        if keyword.is_sentinel() {
            continue;
        }
        let weight = keyword.importance.weight() * keyword.frequency;
        total_weight += weight;

        let matched = resume_lower.contains(&keyword.keyword.to_lowercase());
        if matched {
            matched_weight += weight;
        }
        keyword_details.push(KeywordDetail {
            keyword: keyword.keyword.clone(),
            matched,
            importance: keyword.importance,
            weight,
        });
    }

    let keyword_score = if total_weight > 0 {
        ((matched_weight as f64 / total_weight as f64) * 100.0).round() as u32
    } else {
        NO_KEYWORD_SCORE
    };
    let quality_score = QUALITY_BASELINE;
    let overall_score = (keyword_score as f64 * KEYWORD_BLEND
        + quality_score as f64 * QUALITY_BLEND)
        .round() as u32;

    MatchResult {
        overall_score,
        keyword_score,
        quality_score,
        keyword_details,
        recommendations: vec![
            "Add relevant technical keywords from the job description".to_string(),
            "Include quantifiable achievements".to_string(),
        ],
    }
}
