//! Tolerant grammars over raw gateway output.
//!
//! Model output is untrusted, loosely structured text: the recovery rule
//! is always "drop the malformed unit and continue", and both parsers
//! return at least one record, so callers never special-case "empty".

use crate::analysis::models::{BulletImprovement, Importance, Keyword};

const DEFAULT_IMPACT: u8 = 7;
const MAX_IMPACT: u8 = 10;

/// Parses `term|importance|frequency|context` lines. Lines with fewer
/// than 3 fields are dropped; bad field values are coerced, never fatal.
pub fn parse_keywords(response: &str) -> Vec<Keyword> {
    if response.trim().is_empty() {
        return vec![Keyword {
            keyword: "None".to_string(),
            importance: Importance::Low,
            frequency: 0,
            context: "No analysis available".to_string(),
        }];
    }

    let mut keywords = Vec::new();
    for line in response.lines() {
        let line = line.trim();
        if line.is_empty() || !line.contains('|') {
            continue;
        }
        let parts: Vec<&str> = line.split('|').map(str::trim).collect();
        if parts.len() < 3 {
            continue;
        }

        let keyword = parts[0].to_string();
        let context = match parts.get(3) {
            Some(context) => context.to_string(),
            None => format!("{keyword} skill"),
        };
        keywords.push(Keyword {
            importance: Importance::parse_lenient(parts[1]),
            frequency: parts[2].parse().unwrap_or(1),
            keyword,
            context,
        });
    }

    if keywords.is_empty() {
        keywords.push(Keyword {
            keyword: "None".to_string(),
            importance: Importance::Low,
            frequency: 0,
            context: "No keywords identified".to_string(),
        });
    }
    keywords
}

/// Parses ORIGINAL/IMPROVED/REASON/IMPACT blocks. A block is accepted
/// only if both original and improved are non-empty; rejected blocks are
/// silently dropped.
pub fn parse_improvements(response: &str) -> Vec<BulletImprovement> {
    if response.trim().is_empty() {
        return vec![BulletImprovement {
            original: "No experience".to_string(),
            improved: "Enhanced experience".to_string(),
            reason: "Added language".to_string(),
            impact_score: 5,
        }];
    }

    let mut improvements: Vec<BulletImprovement> = split_blocks(response)
        .iter()
        .filter_map(|block| parse_block(block))
        .collect();

    if improvements.is_empty() {
        improvements.push(BulletImprovement {
            original: "Performed duties".to_string(),
            improved: "Delivered results".to_string(),
            reason: "Added specificity".to_string(),
            impact_score: 7,
        });
    }
    improvements
}

/// A blank line ends the current block; a line starting with `ORIGINAL:`
/// begins a new one, so blocks need not be blank-line-separated.
fn split_blocks(response: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in response.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }
        if line.starts_with("ORIGINAL:") && !current.is_empty() {
            blocks.push(std::mem::take(&mut current));
        }
        current.push(line);
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn parse_block(lines: &[&str]) -> Option<BulletImprovement> {
    let mut original = "";
    let mut improved = "";
    let mut reason = "";
    let mut impact_score = DEFAULT_IMPACT;

    for line in lines {
        if let Some(rest) = line.strip_prefix("ORIGINAL:") {
            original = rest.trim();
        } else if let Some(rest) = line.strip_prefix("IMPROVED:") {
            improved = rest.trim();
        } else if let Some(rest) = line.strip_prefix("REASON:") {
            reason = rest.trim();
        } else if line.starts_with("IMPACT:") {
            impact_score = parse_impact(line);
        }
    }

    if original.is_empty() || improved.is_empty() {
        return None;
    }
    Some(BulletImprovement {
        original: original.to_string(),
        improved: improved.to_string(),
        reason: if reason.is_empty() {
            "Enhanced impact".to_string()
        } else {
            reason.to_string()
        },
        impact_score,
    })
}

/// First run of digits on the line, clamped to `MAX_IMPACT`;
/// `DEFAULT_IMPACT` when absent or unparsable.
fn parse_impact(line: &str) -> u8 {
    let digits: String = line
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits
        .parse::<u64>()
        .map(|n| n.min(MAX_IMPACT as u64) as u8)
        .unwrap_or(DEFAULT_IMPACT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_keyword_lines_parse() {
        let keywords = parse_keywords("python|high|3|Core requirement\naws|low|1|Cloud platform");
        assert_eq!(keywords.len(), 2);
        assert_eq!(keywords[0].keyword, "python");
        assert_eq!(keywords[0].importance, Importance::High);
        assert_eq!(keywords[0].frequency, 3);
        assert_eq!(keywords[0].context, "Core requirement");
    }

    #[test]
    fn test_keyword_noise_and_short_lines_are_dropped() {
        let keywords = parse_keywords("noise without pipes\nterm|high\npython|high|2");
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].keyword, "python");
    }

    #[test]
    fn test_keyword_bad_fields_are_coerced() {
        let keywords = parse_keywords("docker|critical|many");
        assert_eq!(keywords[0].importance, Importance::Medium);
        assert_eq!(keywords[0].frequency, 1);
    }

    #[test]
    fn test_keyword_missing_context_gets_default() {
        let keywords = parse_keywords("docker|high|2");
        assert_eq!(keywords[0].context, "docker skill");
    }

    #[test]
    fn test_garbage_input_yields_sentinel_not_panic() {
        let keywords = parse_keywords("garbage\n\n123");
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].keyword, "None");
        assert_eq!(keywords[0].context, "No keywords identified");
    }

    #[test]
    fn test_empty_input_yields_sentinel() {
        let keywords = parse_keywords("   ");
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].keyword, "None");
        assert_eq!(keywords[0].frequency, 0);
        assert_eq!(keywords[0].context, "No analysis available");
    }

    #[test]
    fn test_blank_line_separated_improvement_blocks() {
        let response = "ORIGINAL: Did work\nIMPROVED: Delivered outcomes\nREASON: Stronger verb\nIMPACT: 9\n\nORIGINAL: Helped team\nIMPROVED: Enabled team of 5\nIMPACT: 6";
        let improvements = parse_improvements(response);
        assert_eq!(improvements.len(), 2);
        assert_eq!(improvements[0].impact_score, 9);
        assert_eq!(improvements[1].reason, "Enhanced impact");
        assert_eq!(improvements[1].impact_score, 6);
    }

    #[test]
    fn test_original_marker_starts_a_new_block_without_blank_line() {
        let response = "ORIGINAL: First\nIMPROVED: First better\nORIGINAL: Second\nIMPROVED: Second better";
        let improvements = parse_improvements(response);
        assert_eq!(improvements.len(), 2);
        assert_eq!(improvements[0].original, "First");
        assert_eq!(improvements[1].original, "Second");
    }

    #[test]
    fn test_block_missing_improved_is_dropped() {
        let response = "ORIGINAL: Lonely line\nREASON: No rewrite\n\nORIGINAL: Kept\nIMPROVED: Kept better";
        let improvements = parse_improvements(response);
        assert_eq!(improvements.len(), 1);
        assert_eq!(improvements[0].original, "Kept");
    }

    #[test]
    fn test_impact_is_clamped_and_defaulted() {
        let high = parse_improvements("ORIGINAL: A\nIMPROVED: B\nIMPACT: 15");
        assert_eq!(high[0].impact_score, 10);

        let missing = parse_improvements("ORIGINAL: A\nIMPROVED: B");
        assert_eq!(missing[0].impact_score, 7);

        let unparsable = parse_improvements("ORIGINAL: A\nIMPROVED: B\nIMPACT: huge");
        assert_eq!(unparsable[0].impact_score, 7);
    }

    #[test]
    fn test_no_valid_blocks_yields_sentinel() {
        let improvements = parse_improvements("completely unrelated text\nmore noise");
        assert_eq!(improvements.len(), 1);
        assert_eq!(improvements[0].original, "Performed duties");
        assert_eq!(improvements[0].improved, "Delivered results");
    }

    #[test]
    fn test_empty_improvement_input_yields_sentinel() {
        let improvements = parse_improvements("");
        assert_eq!(improvements.len(), 1);
        assert_eq!(improvements[0].original, "No experience");
        assert_eq!(improvements[0].impact_score, 5);
    }

    #[test]
    fn test_every_record_has_nonempty_fields_and_bounded_impact() {
        let noisy = "ORIGINAL:\nIMPROVED: orphan\n\nORIGINAL: ok\nIMPROVED: better\nIMPACT: 99999999999999999999";
        for improvement in parse_improvements(noisy) {
            assert!(!improvement.original.is_empty());
            assert!(!improvement.improved.is_empty());
            assert!(improvement.impact_score <= 10);
        }
    }
}
