use crate::derived_field::check_digit_rule::CheckDigitRuleConfig;
use crate::derived_field::error::CreateUpdaterError;
use crate::derived_field::full_name_rule::FullNameRuleConfig;
use crate::derived_field::{CompiledRule, DerivedFieldUpdater, DerivedFieldUpdaterBuilder};
use crate::observability::labels::Labels;
use crate::tercero::{TerceroField, NAME_PART_FIELDS};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use serde_with::DefaultOnNull;
use std::sync::Arc;

pub trait RuleConfig: Send + Sync {
    fn convert_to_compiled_rule(
        &self,
        rule_index: usize,
        labels: Labels,
    ) -> Result<Box<dyn CompiledRule>, CreateUpdaterError>;
}

/// What to do when a check-digit rule finds an identifier it can't compute a digit for.
/// The dependent field is cleared either way.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvalidIdentifierPolicy {
    #[default]
    Clear,
    /// Also return an error to the caller once every triggered rule has run
    Report,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum DerivedFieldRule {
    CheckDigit(CheckDigitRuleConfig),
    FullName(FullNameRuleConfig),
}

impl RuleConfig for DerivedFieldRule {
    fn convert_to_compiled_rule(
        &self,
        rule_index: usize,
        labels: Labels,
    ) -> Result<Box<dyn CompiledRule>, CreateUpdaterError> {
        match self {
            DerivedFieldRule::CheckDigit(config) => {
                config.convert_to_compiled_rule(rule_index, labels)
            }
            DerivedFieldRule::FullName(config) => config.convert_to_compiled_rule(rule_index, labels),
        }
    }
}

#[serde_as]
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct UpdaterConfig {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub rules: Vec<DerivedFieldRule>,

    #[serde(default)]
    pub invalid_identifier_policy: InvalidIdentifierPolicy,
}

impl UpdaterConfig {
    /// The rules of the DIAN tercero form: `nit` -> `div` and the name parts -> `nombre_completo`.
    pub fn dian_tercero() -> Self {
        Self {
            rules: vec![
                DerivedFieldRule::CheckDigit(CheckDigitRuleConfig::new(
                    TerceroField::Nit.as_ref(),
                    TerceroField::Div.as_ref(),
                )),
                DerivedFieldRule::FullName(FullNameRuleConfig::new(
                    &NAME_PART_FIELDS,
                    TerceroField::NombreCompleto.as_ref(),
                )),
            ],
            invalid_identifier_policy: InvalidIdentifierPolicy::Clear,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn invalid_identifier_policy(mut self, policy: InvalidIdentifierPolicy) -> Self {
        self.invalid_identifier_policy = policy;
        self
    }

    pub fn rule_configs(&self) -> Vec<Arc<dyn RuleConfig>> {
        self.rules
            .iter()
            .cloned()
            .map(|rule| Arc::new(rule) as Arc<dyn RuleConfig>)
            .collect()
    }

    pub fn build(&self) -> Result<DerivedFieldUpdater, CreateUpdaterError> {
        self.build_with_labels(Labels::empty())
    }

    pub fn build_with_labels(
        &self,
        labels: Labels,
    ) -> Result<DerivedFieldUpdater, CreateUpdaterError> {
        let rules = self.rule_configs();
        DerivedFieldUpdaterBuilder::new(&rules)
            .labels(labels)
            .invalid_identifier_policy(self.invalid_identifier_policy)
            .build()
    }
}

/// Checks the field names of a single rule.
pub(crate) fn validate_rule_fields(
    rule_index: usize,
    sources: &[String],
    target: &str,
) -> Result<(), CreateUpdaterError> {
    if sources.is_empty() {
        return Err(CreateUpdaterError::NoSourceFields { rule_index });
    }
    if target.is_empty() || sources.iter().any(String::is_empty) {
        return Err(CreateUpdaterError::EmptyFieldName { rule_index });
    }
    if sources.iter().any(|source| source == target) {
        return Err(CreateUpdaterError::TargetIsSource {
            rule_index,
            field: target.to_string(),
        });
    }
    Ok(())
}
