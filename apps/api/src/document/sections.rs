//! Section classification — assigns each line of a plain-text résumé to
//! one of four fixed sections using heading-detection heuristics.
//!
//! Résumés carry no reliable layout metadata once flattened to text, so
//! this stays a lightweight, explainable line scan: good enough to drive
//! the downstream prompts, not an exact segmentation.

use serde::Serialize;

/// Headings longer than this are treated as body text.
const MAX_HEADING_CHARS: usize = 60;

/// The four fixed résumé sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Experience,
    Skills,
    Education,
    Summary,
}

impl SectionKind {
    /// Detection order doubles as the tie-break: the first section whose
    /// keyword set matches a heading line wins.
    pub const DETECTION_ORDER: [SectionKind; 4] = [
        SectionKind::Experience,
        SectionKind::Skills,
        SectionKind::Education,
        SectionKind::Summary,
    ];

    fn keywords(self) -> &'static [&'static str] {
        match self {
            SectionKind::Experience => &["experience", "work", "employment", "professional"],
            SectionKind::Skills => &["skills"],
            SectionKind::Education => &["education", "degree", "university", "academic"],
            SectionKind::Summary => &["summary", "contact", "objective", "profile"],
        }
    }
}

/// Classified section bodies. Every field is always present; a section
/// that never matched is simply empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResumeSections {
    pub summary: String,
    pub experience: String,
    pub skills: String,
    pub education: String,
}

impl ResumeSections {
    fn buffer_mut(&mut self, kind: SectionKind) -> &mut String {
        match kind {
            SectionKind::Summary => &mut self.summary,
            SectionKind::Experience => &mut self.experience,
            SectionKind::Skills => &mut self.skills,
            SectionKind::Education => &mut self.education,
        }
    }
}

/// A heading is short and either fully upper-case or free of
/// sentence-ending punctuation.
fn is_heading_shaped(line: &str) -> bool {
    if line.chars().count() >= MAX_HEADING_CHARS {
        return false;
    }
    let has_letters = line.chars().any(|c| c.is_alphabetic());
    let all_upper = has_letters && !line.chars().any(|c| c.is_lowercase());
    all_upper || !line.chars().any(|c| matches!(c, '.' | '!' | '?'))
}

/// Scans the text line by line. A recognized heading switches the current
/// section and is consumed; every other non-blank line is appended to the
/// current section's body. The cursor starts at `summary`.
pub fn classify(text: &str) -> ResumeSections {
    let mut sections = ResumeSections::default();
    let mut current = SectionKind::Summary;

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let heading = if is_heading_shaped(line) {
            let line_lower = line.to_lowercase();
            SectionKind::DETECTION_ORDER
                .into_iter()
                .find(|kind| kind.keywords().iter().any(|kw| line_lower.contains(kw)))
        } else {
            None
        };

        match heading {
            Some(kind) => current = kind,
            None => {
                let buffer = sections.buffer_mut(current);
                buffer.push_str(line);
                buffer.push('\n');
            }
        }
    }

    for kind in SectionKind::DETECTION_ORDER {
        let buffer = sections.buffer_mut(kind);
        *buffer = buffer.trim().to_string();
    }
    sections
}
