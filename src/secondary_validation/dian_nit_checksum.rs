use crate::check_digit::compute_check_digit;
use crate::secondary_validation::{get_previous_digit, Validator};
use crate::validation::clean_identifier;

/// Validates a NIT written together with its verification digit, e.g. `900.123.456-8`.
pub struct DianNitChecksum;

impl Validator for DianNitChecksum {
    fn is_valid_match(&self, candidate: &str) -> bool {
        let cleaned = clean_identifier(candidate);
        if !cleaned.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }

        let mut chars = cleaned.chars();
        let Some(actual_check_digit) = get_previous_digit(&mut chars) else {
            return false;
        };

        // an empty or too long NIT fails here
        compute_check_digit(chars.as_str()) == Ok(actual_check_digit as u8)
    }
}
