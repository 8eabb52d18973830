use crate::error::ValidationError;

pub const MIN_REASON_CHARS: usize = 10;
pub const WORD_LIMIT: usize = 1000;

/// Counts whitespace-separated, non-empty tokens.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClampedInput {
    pub text: String,
    pub words: usize,
    pub truncated: bool,
}

/// Applies the live input limit: text over `WORD_LIMIT` words is cut to the
/// first `WORD_LIMIT` words joined by single spaces. Text within the limit is
/// left untouched.
pub fn clamp_to_word_limit(text: &str) -> ClampedInput {
    let words = count_words(text);
    if words <= WORD_LIMIT {
        return ClampedInput {
            text: text.to_string(),
            words,
            truncated: false,
        };
    }

    let text = text
        .split_whitespace()
        .take(WORD_LIMIT)
        .collect::<Vec<_>>()
        .join(" ");
    ClampedInput {
        text,
        words: WORD_LIMIT,
        truncated: true,
    }
}

/// Checks an exit reason before submission and returns it trimmed.
pub fn validate_reason(reason: &str) -> Result<String, ValidationError> {
    let reason = reason.trim();
    let chars = reason.chars().count();
    if chars < MIN_REASON_CHARS {
        return Err(ValidationError::ReasonTooShort { actual: chars });
    }
    let words = count_words(reason);
    if words > WORD_LIMIT {
        return Err(ValidationError::TooManyWords { actual: words });
    }
    Ok(reason.to_string())
}

pub(crate) fn require(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(value.to_string())
}
