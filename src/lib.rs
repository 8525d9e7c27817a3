// This blocks accidental use of `println`. If one is actually needed, you can
// override with `#[allow(clippy::print_stdout)]`.
#![deny(clippy::print_stdout)]

mod check_digit;
mod derived_field;
mod observability;
mod record;
mod secondary_validation;
mod stats;
mod tercero;
mod validation;

#[cfg(any(test, feature = "testing", feature = "bench"))]
mod simple_record;

// This is the public API of the library
pub use check_digit::{compute_check_digit, CHECK_DIGIT_WEIGHTS};
pub use derived_field::{
    check_digit_rule::CheckDigitRuleConfig,
    config::{DerivedFieldRule, InvalidIdentifierPolicy, RuleConfig, UpdaterConfig},
    error::{CreateUpdaterError, UpdateError},
    full_name_rule::FullNameRuleConfig,
    CompiledRule, DerivedFieldUpdater, DerivedFieldUpdaterBuilder, DerivedValue, FieldUpdate,
    FormEvent,
};
pub use observability::labels::Labels;
pub use record::Record;
pub use secondary_validation::{DianNitChecksum, SecondaryValidator, Validator};
pub use tercero::{party_label, Tercero, TerceroField, NAME_PART_FIELDS, UNKNOWN_PARTY};
pub use validation::{
    clean_identifier, validate_identifier, CheckDigitError, InvalidIdentifierReason,
    MAX_IDENTIFIER_LENGTH,
};

#[cfg(any(feature = "testing", feature = "bench"))]
pub use crate::simple_record::SimpleRecord;
