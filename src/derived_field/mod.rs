use crate::derived_field::config::{InvalidIdentifierPolicy, RuleConfig};
use crate::derived_field::error::{CreateUpdaterError, UpdateError};
use crate::derived_field::metrics::UpdaterMetrics;
use crate::observability::labels::Labels;
use crate::record::Record;
use crate::stats::GLOBAL_STATS;
use crate::validation::CheckDigitError;
use ahash::AHashMap;
use std::sync::Arc;

pub mod check_digit_rule;
pub mod config;
pub mod error;
pub mod full_name_rule;
pub mod metrics;

#[cfg(test)]
mod test;

/// A rule that computes one field of a record from other fields of the same record.
pub trait CompiledRule: Send + Sync {
    /// Changing any of these fields triggers the rule.
    fn source_fields(&self) -> &[String];

    fn target_field(&self) -> &str;

    fn derive_value(&self, record: &dyn Record) -> DerivedValue;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerivedValue {
    Value(String),
    /// The source can't produce a value; the target gets cleared.
    InvalidIdentifier {
        source_field: String,
        error: CheckDigitError,
    },
}

/// A notification from the host that renders the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent<'a> {
    /// The user (or the host) changed the value of a field.
    FieldChanged(&'a str),
    /// The record is being displayed; every rule runs.
    Refresh,
}

/// A write performed on the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdate {
    /// The index of the rule that produced this update. This preserves the order
    /// of rules that were passed into the builder.
    pub rule_index: usize,
    pub field: String,
    pub value: String,
    /// Set when the field was cleared because its identifier is not computable.
    pub invalid_identifier: Option<CheckDigitError>,
}

pub struct DerivedFieldUpdaterBuilder<'a> {
    rules: &'a [Arc<dyn RuleConfig>],
    labels: Labels,
    invalid_identifier_policy: InvalidIdentifierPolicy,
}

impl DerivedFieldUpdaterBuilder<'_> {
    pub fn new(rules: &[Arc<dyn RuleConfig>]) -> DerivedFieldUpdaterBuilder<'_> {
        DerivedFieldUpdaterBuilder {
            rules,
            labels: Labels::empty(),
            invalid_identifier_policy: InvalidIdentifierPolicy::default(),
        }
    }

    pub fn labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn invalid_identifier_policy(mut self, policy: InvalidIdentifierPolicy) -> Self {
        self.invalid_identifier_policy = policy;
        self
    }

    pub fn build(self) -> Result<DerivedFieldUpdater, CreateUpdaterError> {
        let rules = self
            .rules
            .iter()
            .enumerate()
            .map(|(rule_index, config)| {
                config.convert_to_compiled_rule(rule_index, self.labels.clone())
            })
            .collect::<Result<Vec<_>, CreateUpdaterError>>()?;

        let mut targets: AHashMap<&str, usize> = AHashMap::new();
        for (rule_index, rule) in rules.iter().enumerate() {
            if let Some(first_rule_index) = targets.insert(rule.target_field(), rule_index) {
                return Err(CreateUpdaterError::DuplicateTarget {
                    first_rule_index,
                    rule_index,
                    field: rule.target_field().to_string(),
                });
            }
        }
        for (rule_index, rule) in rules.iter().enumerate() {
            if let Some((field, &target_rule_index)) = rule
                .source_fields()
                .iter()
                .find_map(|source| targets.get_key_value(source.as_str()))
            {
                return Err(CreateUpdaterError::SourceIsDerived {
                    target_rule_index,
                    rule_index,
                    field: field.to_string(),
                });
            }
        }

        let triggers = TriggerIndex::new(&rules);

        GLOBAL_STATS.record_updater_created(rules.len());

        Ok(DerivedFieldUpdater {
            rules,
            triggers,
            invalid_identifier_policy: self.invalid_identifier_policy,
            metrics: UpdaterMetrics::new(&self.labels),
        })
    }
}

/// Maps a source field to the rules it triggers, in rule order.
struct TriggerIndex {
    rules_by_field: AHashMap<String, Vec<usize>>,
}

impl TriggerIndex {
    fn new(rules: &[Box<dyn CompiledRule>]) -> Self {
        let mut rules_by_field: AHashMap<String, Vec<usize>> = AHashMap::new();
        for (rule_index, rule) in rules.iter().enumerate() {
            for field in rule.source_fields() {
                let indices = rules_by_field.entry(field.clone()).or_default();
                // a rule may list the same source twice
                if indices.last() != Some(&rule_index) {
                    indices.push(rule_index);
                }
            }
        }
        Self { rules_by_field }
    }

    fn rules_for(&self, field: &str) -> &[usize] {
        self.rules_by_field
            .get(field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Keeps derived fields of a record in sync with their sources.
pub struct DerivedFieldUpdater {
    rules: Vec<Box<dyn CompiledRule>>,
    triggers: TriggerIndex,
    invalid_identifier_policy: InvalidIdentifierPolicy,
    metrics: UpdaterMetrics,
}

impl DerivedFieldUpdater {
    pub fn builder(rules: &[Arc<dyn RuleConfig>]) -> DerivedFieldUpdaterBuilder<'_> {
        DerivedFieldUpdaterBuilder::new(rules)
    }

    pub fn handle(
        &self,
        record: &mut dyn Record,
        event: FormEvent<'_>,
    ) -> Result<Vec<FieldUpdate>, UpdateError> {
        match event {
            FormEvent::FieldChanged(field) => self.on_field_change(record, field),
            FormEvent::Refresh => self.on_refresh(record),
        }
    }

    /// Runs the rules that use `field` as a source. A field no rule depends on changes nothing.
    pub fn on_field_change(
        &self,
        record: &mut dyn Record,
        field: &str,
    ) -> Result<Vec<FieldUpdate>, UpdateError> {
        self.apply_rules(record, self.triggers.rules_for(field).iter().copied())
    }

    /// Runs every rule, in order. This is what the host calls when the record is first displayed.
    pub fn on_refresh(&self, record: &mut dyn Record) -> Result<Vec<FieldUpdate>, UpdateError> {
        self.apply_rules(record, 0..self.rules.len())
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    fn apply_rules(
        &self,
        record: &mut dyn Record,
        rule_indices: impl Iterator<Item = usize>,
    ) -> Result<Vec<FieldUpdate>, UpdateError> {
        self.metrics.num_events.increment(1);

        let mut updates = vec![];
        let mut first_error = None;

        for rule_index in rule_indices {
            let rule = &self.rules[rule_index];
            let target = rule.target_field();

            let (value, invalid_identifier) = match rule.derive_value(&*record) {
                DerivedValue::Value(value) => (value, None),
                DerivedValue::InvalidIdentifier {
                    source_field,
                    error,
                } => {
                    tracing::debug!(
                        rule_index,
                        source_field = %source_field,
                        target_field = %target,
                        error = %error,
                        "identifier is not computable, clearing the dependent field"
                    );
                    if first_error.is_none() {
                        first_error = Some(UpdateError::InvalidIdentifier {
                            source_field,
                            target_field: target.to_string(),
                            error: error.clone(),
                        });
                    }
                    (String::new(), Some(error))
                }
            };

            record.set_field(target, value.clone());
            updates.push(FieldUpdate {
                rule_index,
                field: target.to_string(),
                value,
                invalid_identifier,
            });
        }

        self.metrics.field_updates.increment(updates.len() as u64);

        match (self.invalid_identifier_policy, first_error) {
            (InvalidIdentifierPolicy::Report, Some(err)) => Err(err),
            _ => Ok(updates),
        }
    }
}

impl Drop for DerivedFieldUpdater {
    fn drop(&mut self) {
        GLOBAL_STATS.record_updater_dropped();
    }
}
