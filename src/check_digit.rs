use crate::validation::{validate_identifier, CheckDigitError, MAX_IDENTIFIER_LENGTH};

/// DIAN weights, applied from the rightmost digit of the NIT leftwards.
pub const CHECK_DIGIT_WEIGHTS: [u32; MAX_IDENTIFIER_LENGTH] =
    [3, 7, 13, 17, 19, 23, 29, 37, 41, 43, 47, 53, 59, 67, 71];

/// Computes the DIAN verification digit ("DV") of a NIT.
///
/// Separators (whitespace, `,`, `.` and `-`) are ignored. Every remaining digit is
/// treated as part of the NIT: a check digit already appended to `raw` is not
/// recognized and will be weighted like the others. Use
/// [`DianNitChecksum`](crate::DianNitChecksum) to verify that form.
///
/// The result is always in `0..=10`.
pub fn compute_check_digit(raw: &str) -> Result<u8, CheckDigitError> {
    let nit = validate_identifier(raw)?;
    Ok(check_digit_of_digits(nit.bytes().map(|b| u32::from(b - b'0'))))
}

/// `digits` must be ordered most significant first and hold at most
/// `MAX_IDENTIFIER_LENGTH` items.
pub(crate) fn check_digit_of_digits(digits: impl DoubleEndedIterator<Item = u32>) -> u8 {
    let sum: u32 = digits
        .rev()
        .zip(CHECK_DIGIT_WEIGHTS.iter())
        .map(|(digit, weight)| digit * weight)
        .sum();

    match sum % 11 {
        remainder @ (0 | 1) => remainder as u8,
        remainder => (11 - remainder) as u8,
    }
}
