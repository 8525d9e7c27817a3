mod dian_nit_checksum;

pub use crate::secondary_validation::dian_nit_checksum::DianNitChecksum;

use serde::{Deserialize, Serialize};
use std::str::Chars;

pub trait Validator: Send + Sync {
    fn is_valid_match(&self, candidate: &str) -> bool;
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum SecondaryValidator {
    DianNitChecksum,
}

impl Validator for SecondaryValidator {
    fn is_valid_match(&self, candidate: &str) -> bool {
        match self {
            SecondaryValidator::DianNitChecksum => DianNitChecksum.is_valid_match(candidate),
        }
    }
}

/// Returns the next digit reading right to left, skipping anything that isn't one.
fn get_previous_digit(chars: &mut Chars<'_>) -> Option<u32> {
    while let Some(char) = chars.next_back() {
        if let Some(digit) = char.to_digit(10) {
            return Some(digit);
        }
    }
    None
}
