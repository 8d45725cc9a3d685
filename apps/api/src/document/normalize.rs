//! Text cleanup applied to decoded résumé text before anything else sees
//! it. Pure functions — they never fail and touch no state.

/// Ordered, case-sensitive terminology corrections, applied after
/// whitespace and character cleanup. Order matters: `NodeJS` must be
/// rewritten before the bare `NODE` rule can match what remains.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("ReactJS", "React"),
    ("NodeJS", "Node.js"),
    ("Javascript", "JavaScript"),
    ("Node JS", "Node.js"),
    ("REACT", "React"),
    ("NODE", "Node.js"),
    ("Typescript", "TypeScript"),
];

/// Characters that survive cleanup: word characters, whitespace, and a
/// small punctuation set common in contact lines and tech names.
fn is_allowed(c: char) -> bool {
    c.is_alphanumeric()
        || c == '_'
        || c.is_whitespace()
        || matches!(c, '-' | '.' | ',' | ';' | '@' | '(' | ')')
}

/// Collapses whitespace runs to a single space, replaces disallowed
/// characters with a space, applies the terminology corrections, trims.
pub fn normalize(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut last_was_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                collapsed.push(' ');
            }
            last_was_space = true;
        } else {
            collapsed.push(c);
            last_was_space = false;
        }
    }

    let mut cleaned: String = collapsed
        .chars()
        .map(|c| if is_allowed(c) { c } else { ' ' })
        .collect();

    for (from, to) in REPLACEMENTS {
        cleaned = cleaned.replace(from, to);
    }

    cleaned.trim().to_string()
}

/// Per-line `normalize` that preserves line breaks, so the section
/// classifier still sees the document's line structure.
pub fn normalize_lines(text: &str) -> String {
    text.lines().map(normalize).collect::<Vec<_>>().join("\n")
}
