//! Text normalization applied before similarity scoring.
//!
//! Resume and JD text arrives with PDF artifacts: bullets, box-drawing
//! characters, smart quotes, stray control bytes. `clean_text` reduces both
//! sides to the same plain vocabulary so neither extraction nor embedding
//! sees noise the other side lacks.

/// Characters allowed through in addition to letters, digits and whitespace.
/// Covers the punctuation that carries meaning in skill names ("C++", "C#",
/// "CI/CD", "Node.js") and in dates/ranges ("2019 - 2021").
fn is_allowed_punct(c: char) -> bool {
    matches!(c, '.' | ',' | '-' | '+' | '#' | '(' | ')' | '/' | '&')
}

/// Strips every character outside the allow-list, collapses whitespace runs
/// to a single space, and trims. Idempotent: applying it twice yields the
/// same string as applying it once.
pub fn clean_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if !c.is_alphanumeric() && !is_allowed_punct(c) {
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }

    out
}
