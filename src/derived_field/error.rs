use thiserror::Error;

use crate::validation::CheckDigitError;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum CreateUpdaterError {
    /// The rule has no field to be computed from
    #[error("Rule {rule_index} has no source field")]
    NoSourceFields { rule_index: usize },

    /// A source or target field name is empty
    #[error("Rule {rule_index} uses an empty field name")]
    EmptyFieldName { rule_index: usize },

    /// The rule would retrigger itself
    #[error("Rule {rule_index} uses its target field `{field}` as a source")]
    TargetIsSource { rule_index: usize, field: String },

    /// Two rules write the same field, the last one would silently win
    #[error("Rules {first_rule_index} and {rule_index} both write the field `{field}`")]
    DuplicateTarget {
        first_rule_index: usize,
        rule_index: usize,
        field: String,
    },

    /// The rule reads a field another rule writes. Rules are not chained, so
    /// the value derived from it would go stale.
    #[error("Rule {rule_index} reads the field `{field}` written by rule {target_rule_index}")]
    SourceIsDerived {
        target_rule_index: usize,
        rule_index: usize,
        field: String,
    },
}

/// Only returned with [InvalidIdentifierPolicy::Report](crate::InvalidIdentifierPolicy::Report).
/// The dependent field has already been cleared when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    #[error("Field `{source_field}` holds an invalid identifier, `{target_field}` was cleared: {error}")]
    InvalidIdentifier {
        source_field: String,
        target_field: String,
        error: CheckDigitError,
    },
}
