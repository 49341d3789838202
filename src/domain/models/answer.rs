#[cfg(test)]
#[path = "answer_test.rs"]
mod tests;

use once_cell::sync::Lazy;
use regex::Regex;

static BULLET_REGEX: Lazy<Regex> = Lazy::new(|| {
    return Regex::new(r"(?m)^\s*[-*+]\s").unwrap();
});

/// A normalized inference result, flagged when the text carries markdown
/// formatting worth rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub markdown: bool,
}

impl Answer {
    pub fn new(text: &str) -> Answer {
        return Answer {
            text: text.to_string(),
            markdown: contains_rich_formatting(text),
        };
    }
}

fn contains_rich_formatting(text: &str) -> bool {
    if text.contains("```") {
        return true;
    }

    return BULLET_REGEX.is_match(text);
}
