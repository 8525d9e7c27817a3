use crate::check_digit::compute_check_digit;
use crate::derived_field::config::{validate_rule_fields, RuleConfig};
use crate::derived_field::error::CreateUpdaterError;
use crate::derived_field::metrics::RuleMetrics;
use crate::derived_field::{CompiledRule, DerivedValue};
use crate::observability::labels::Labels;
use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const TYPE: &str = "type";

/// Keeps `target` equal to the verification digit of the NIT in `source`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CheckDigitRuleConfig {
    pub source: String,
    pub target: String,
}

impl CheckDigitRuleConfig {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.to_owned(),
            target: target.to_owned(),
        }
    }

    pub fn source(&self, source: &str) -> Self {
        self.mutate_clone(|x| x.source = source.to_owned())
    }

    pub fn target(&self, target: &str) -> Self {
        self.mutate_clone(|x| x.target = target.to_owned())
    }

    pub fn build(&self) -> Arc<dyn RuleConfig> {
        Arc::new(self.clone())
    }

    fn mutate_clone(&self, modify: impl FnOnce(&mut Self)) -> Self {
        let mut clone = self.clone();
        modify(&mut clone);
        clone
    }
}

impl RuleConfig for CheckDigitRuleConfig {
    fn convert_to_compiled_rule(
        &self,
        rule_index: usize,
        labels: Labels,
    ) -> Result<Box<dyn CompiledRule>, CreateUpdaterError> {
        let sources = vec![self.source.clone()];
        validate_rule_fields(rule_index, &sources, &self.target)?;

        Ok(Box::new(CheckDigitCompiledRule {
            sources,
            target: self.target.clone(),
            metrics: RuleMetrics::new(&labels.clone_with_labels(&[(TYPE, "check_digit")])),
        }))
    }
}

pub struct CheckDigitCompiledRule {
    // always a single field, kept as a list for `source_fields`
    sources: Vec<String>,
    target: String,
    metrics: RuleMetrics,
}

impl CompiledRule for CheckDigitCompiledRule {
    fn source_fields(&self) -> &[String] {
        &self.sources
    }

    fn target_field(&self) -> &str {
        &self.target
    }

    fn derive_value(&self, record: &dyn Record) -> DerivedValue {
        self.metrics.recomputations.increment(1);

        let source = &self.sources[0];
        let nit = match record.field(source) {
            Some(nit) if !nit.is_empty() => nit,
            _ => return DerivedValue::Value(String::new()),
        };

        match compute_check_digit(&nit) {
            Ok(check_digit) => DerivedValue::Value(check_digit.to_string()),
            Err(error) => {
                self.metrics.invalid_identifiers.increment(1);
                DerivedValue::InvalidIdentifier {
                    source_field: source.clone(),
                    error,
                }
            }
        }
    }
}
