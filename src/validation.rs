use thiserror::Error;

/// The longest identifier the weight table can cover.
pub const MAX_IDENTIFIER_LENGTH: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckDigitError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(InvalidIdentifierReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidIdentifierReason {
    #[error("nothing is left after removing separators")]
    Empty,

    #[error("it contains characters that are not decimal digits")]
    NonDigit,

    #[error("it has {length} digits, the maximum is {max}")]
    TooLong { length: usize, max: usize },
}

impl From<InvalidIdentifierReason> for CheckDigitError {
    fn from(reason: InvalidIdentifierReason) -> Self {
        CheckDigitError::InvalidIdentifier(reason)
    }
}

impl CheckDigitError {
    pub fn reason(&self) -> InvalidIdentifierReason {
        match self {
            CheckDigitError::InvalidIdentifier(reason) => *reason,
        }
    }
}

#[inline]
fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '.' | '-')
}

/// Removes whitespace, commas, periods and hyphens. Every other character is kept,
/// so the result still has to be checked with `validate_identifier`.
pub fn clean_identifier(raw: &str) -> String {
    raw.chars().filter(|c| !is_separator(*c)).collect()
}

/// Cleans `raw` and checks that what remains is a NIT the weight table can handle.
pub fn validate_identifier(raw: &str) -> Result<String, CheckDigitError> {
    let cleaned = clean_identifier(raw);

    if cleaned.is_empty() {
        return Err(InvalidIdentifierReason::Empty.into());
    }
    if !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Err(InvalidIdentifierReason::NonDigit.into());
    }
    // all ASCII at this point, so the byte length is the digit count
    if cleaned.len() > MAX_IDENTIFIER_LENGTH {
        return Err(InvalidIdentifierReason::TooLong {
            length: cleaned.len(),
            max: MAX_IDENTIFIER_LENGTH,
        }
        .into());
    }

    Ok(cleaned)
}
