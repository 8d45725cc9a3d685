//! Typed records flowing through the analysis pipeline.

use serde::{Deserialize, Serialize};

/// Relative importance of a keyword in the job description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    #[default]
    Medium,
    Low,
}

impl Importance {
    /// Lenient parse for untrusted labels: anything unrecognized is Medium.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "high" => Importance::High,
            "low" => Importance::Low,
            _ => Importance::Medium,
        }
    }

    pub fn weight(self) -> u32 {
        match self {
            Importance::High => 3,
            Importance::Medium => 2,
            Importance::Low => 1,
        }
    }
}

/// One job-relevant term and its relevance. Immutable after parsing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyword {
    pub keyword: String,
    pub importance: Importance,
    pub frequency: u32,
    pub context: String,
}

impl Keyword {
    /// Placeholder terms emitted when nothing real was found; the scorer
    /// excludes these from weight accumulation.
    pub fn is_sentinel(&self) -> bool {
        let term = self.keyword.to_lowercase();
        term == "none" || term == "analysis error"
    }
}

/// One candidate rewrite of a résumé achievement line. Both `original`
/// and `improved` are non-empty by construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulletImprovement {
    pub original: String,
    pub improved: String,
    pub reason: String,
    pub impact_score: u8,
}

/// Per-keyword breakdown carried in a `MatchResult`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordDetail {
    pub keyword: String,
    pub matched: bool,
    pub importance: Importance,
    pub weight: u32,
}

/// Aggregate scoring output for one analysis request. Built fresh per
/// request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub overall_score: u32,
    pub keyword_score: u32,
    pub quality_score: u32,
    pub keyword_details: Vec<KeywordDetail>,
    pub recommendations: Vec<String>,
}

impl MatchResult {
    /// Neutral result applied at the pipeline boundary when scoring
    /// cannot complete. Keeps the pipeline total.
    pub fn neutral() -> Self {
        MatchResult {
            overall_score: 50,
            keyword_score: 50,
            quality_score: 50,
            keyword_details: Vec::new(),
            recommendations: vec!["Error in analysis".to_string()],
        }
    }
}

/// Response body for the analyze endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub match_score: u32,
    pub missing_keywords: Vec<Keyword>,
    pub improved_bullets: Vec<BulletImprovement>,
    pub suggestions: Vec<String>,
}
